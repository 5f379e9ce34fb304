//! File Bag Module
//!
//! Upload collection keyed by form field name, nested for array-style fields
//! such as `files[group][name]`.

use std::collections::btree_map::{self, BTreeMap};
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, UploadError};
use crate::upload::{UploadDescriptor, UploadedFile};

// == Upload Entry ==
/// One value of an upload collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEntry {
    /// Raw record from a multipart parser
    Descriptor(UploadDescriptor),
    /// Handle on a spooled file
    File(UploadedFile),
    /// Nested group produced by an array-style field name
    Group(FileBag),
}

impl UploadEntry {
    /// Temporary path carried directly by this entry; groups carry none.
    pub fn temp_path(&self) -> Option<&Path> {
        match self {
            UploadEntry::Descriptor(descriptor) => descriptor.temp_path(),
            UploadEntry::File(file) => Some(file.path()),
            UploadEntry::Group(_) => None,
        }
    }
}

impl From<UploadDescriptor> for UploadEntry {
    fn from(descriptor: UploadDescriptor) -> Self {
        UploadEntry::Descriptor(descriptor)
    }
}

impl From<UploadedFile> for UploadEntry {
    fn from(file: UploadedFile) -> Self {
        UploadEntry::File(file)
    }
}

impl From<FileBag> for UploadEntry {
    fn from(group: FileBag) -> Self {
        UploadEntry::Group(group)
    }
}

// == File Bag ==
/// Upload collection of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBag {
    entries: BTreeMap<String, UploadEntry>,
}

impl FileBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entry under a literal key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, entry: impl Into<UploadEntry>) {
        self.entries.insert(key.into(), entry.into());
    }

    /// Stores an entry under a form field name.
    ///
    /// Bracketed segments nest (`files[group][name]`) and an empty segment
    /// (`files[]`) appends under the next free numeric key. An intermediate
    /// segment holding a non-group entry is replaced by a group.
    pub fn insert(&mut self, field_name: &str, entry: impl Into<UploadEntry>) {
        let segments = field_path(field_name);
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        let mut bag = self;
        for segment in parents {
            let key = bag.resolve_key(segment);
            let slot = bag
                .entries
                .entry(key)
                .or_insert_with(|| UploadEntry::Group(FileBag::new()));
            if !matches!(slot, UploadEntry::Group(_)) {
                *slot = UploadEntry::Group(FileBag::new());
            }
            let UploadEntry::Group(group) = slot else {
                return;
            };
            bag = group;
        }

        let key = bag.resolve_key(last);
        bag.entries.insert(key, entry.into());
    }

    pub fn get(&self, key: &str) -> Option<&UploadEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, UploadEntry> {
        self.entries.iter()
    }

    pub fn values(&self) -> btree_map::Values<'_, String, UploadEntry> {
        self.entries.values()
    }

    /// Collects every temporary path reachable from this bag, depth first.
    pub fn temp_paths(&self) -> Vec<&Path> {
        let mut paths = Vec::new();
        let mut pending: Vec<&UploadEntry> = self.entries.values().rev().collect();

        while let Some(entry) = pending.pop() {
            match entry {
                UploadEntry::Group(group) => pending.extend(group.entries.values().rev()),
                other => paths.extend(other.temp_path()),
            }
        }

        paths
    }

    /// Decodes a `$_FILES`-shaped JSON document.
    ///
    /// Objects with a `tmp_name` key are descriptors, other objects and arrays
    /// are nested groups, and scalars are skipped. The transposed multi-file
    /// layout (`tmp_name` holding an object or array) is normalized into a
    /// group of descriptors.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Self::from_json_map(map),
            Value::Array(items) => Self::from_json_array(items),
            other => Err(UploadError::InvalidDescriptor(format!(
                "upload collection must be an object, got {}",
                other
            ))),
        }
    }

    fn from_json_map(map: Map<String, Value>) -> Result<Self> {
        let mut bag = Self::new();
        for (key, value) in map {
            if let Some(entry) = entry_from_json(value)? {
                bag.entries.insert(key, entry);
            }
        }
        Ok(bag)
    }

    fn from_json_array(items: Vec<Value>) -> Result<Self> {
        let mut bag = Self::new();
        for (index, value) in items.into_iter().enumerate() {
            if let Some(entry) = entry_from_json(value)? {
                bag.entries.insert(index.to_string(), entry);
            }
        }
        Ok(bag)
    }

    fn resolve_key(&self, segment: &str) -> String {
        if segment.is_empty() {
            self.next_index().to_string()
        } else {
            segment.to_string()
        }
    }

    fn next_index(&self) -> usize {
        self.entries
            .keys()
            .filter_map(|key| key.parse::<usize>().ok())
            .max()
            .map_or(0, |max| max + 1)
    }
}

impl FromIterator<(String, UploadEntry)> for FileBag {
    fn from_iter<I: IntoIterator<Item = (String, UploadEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileBag {
    type Item = (&'a String, &'a UploadEntry);
    type IntoIter = btree_map::Iter<'a, String, UploadEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// == Field Names ==
/// Splits an array-style form field name into its segments.
///
/// `files[group][]` yields `["files", "group", ""]`. Anything after an
/// unclosed bracket is dropped.
pub fn field_path(name: &str) -> Vec<&str> {
    let Some(open) = name.find('[') else {
        return vec![name];
    };

    let mut segments = vec![&name[..open]];
    let mut rest = &name[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    segments
}

// == JSON Decoding ==
fn entry_from_json(value: Value) -> Result<Option<UploadEntry>> {
    let map = match value {
        Value::Object(map) => map,
        Value::Array(items) => return FileBag::from_json_array(items).map(|g| Some(g.into())),
        _ => return Ok(None),
    };

    // Some(true) marks the transposed multi-file layout; a null tmp_name
    // counts as absent, so the object is a group
    let transposed = map
        .get("tmp_name")
        .filter(|tmp_name| !tmp_name.is_null())
        .map(|tmp_name| tmp_name.is_object() || tmp_name.is_array());

    match transposed {
        None => FileBag::from_json_map(map).map(|group| Some(group.into())),
        Some(true) => transpose(map).map(|group| Some(group.into())),
        Some(false) => serde_json::from_value::<UploadDescriptor>(Value::Object(map))
            .map(|descriptor| Some(descriptor.into()))
            .map_err(|e| UploadError::InvalidDescriptor(e.to_string())),
    }
}

/// Turns `{tmp_name: {a: .., b: ..}, name: {a: .., b: ..}}` into
/// `{a: {tmp_name: .., name: ..}, b: {..}}`.
fn transpose(map: Map<String, Value>) -> Result<FileBag> {
    let keys: Vec<String> = match map.get("tmp_name") {
        Some(Value::Object(inner)) => inner.keys().cloned().collect(),
        Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    };

    let mut bag = FileBag::new();
    for key in keys {
        let mut record = Map::new();
        for (field, values) in &map {
            if let Some(value) = child(values, &key) {
                record.insert(field.clone(), value);
            }
        }
        if let Some(entry) = entry_from_json(Value::Object(record))? {
            bag.entries.insert(key, entry);
        }
    }
    Ok(bag)
}

fn child(value: &Value, key: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(key).cloned(),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)).cloned(),
        _ => None,
    }
}
