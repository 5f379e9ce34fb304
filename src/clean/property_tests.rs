//! Property-Based Tests for Clean Module
//!
//! Uses proptest to check that cleanup removes every reachable upload, however
//! the collection is shaped.

use proptest::prelude::*;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::clean::clean_files;
use crate::upload::{FileBag, UploadDescriptor, UploadEntry, UploadedFile};

// == Strategies ==
/// Shape of a generated entry; paths are assigned once a scratch dir exists.
#[derive(Debug, Clone)]
enum Shape {
    Descriptor { exists: bool },
    Handle { exists: bool },
    Group(Vec<(String, Shape)>),
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(|exists| Shape::Descriptor { exists }),
        any::<bool>().prop_map(|exists| Shape::Handle { exists }),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec((key_strategy(), inner), 0..4).prop_map(Shape::Group)
    })
}

fn bag_strategy() -> impl Strategy<Value = Vec<(String, Shape)>> {
    prop::collection::vec((key_strategy(), shape_strategy()), 0..6)
}

// == Materialization ==
/// Builds a bag from the generated shapes, creating the files that should
/// exist. Returns the number of files created.
fn materialize(dir: &Path, shapes: &[(String, Shape)], counter: &mut usize) -> (FileBag, usize) {
    let mut bag = FileBag::new();
    let mut created = 0;

    for (key, shape) in shapes {
        *counter += 1;
        let path = dir.join(format!("upload_{}", counter));
        let entry: UploadEntry = match shape {
            Shape::Descriptor { exists } => {
                if *exists {
                    fs::write(&path, b"x").unwrap();
                    created += 1;
                }
                UploadDescriptor::new(&path).into()
            }
            Shape::Handle { exists } => {
                if *exists {
                    fs::write(&path, b"x").unwrap();
                    created += 1;
                }
                UploadedFile::new(&path, "client.bin", None, 1).into()
            }
            Shape::Group(children) => {
                let (group, inner_created) = materialize(dir, children, counter);
                created += inner_created;
                group.into()
            }
        };
        bag.set(key.clone(), entry);
    }

    (bag, created)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // *For any* upload collection, every reachable temporary file that existed
    // before cleanup SHALL be gone afterwards.
    #[test]
    fn prop_reachable_uploads_are_removed(shapes in bag_strategy()) {
        let dir = TempDir::new().unwrap();
        let mut counter = 0;
        let (bag, _) = materialize(dir.path(), &shapes, &mut counter);

        clean_files(&bag);

        for path in bag.temp_paths() {
            prop_assert!(!path.exists(), "{} survived cleanup", path.display());
        }
    }

    // *For any* upload collection, the report SHALL count exactly the files
    // that were still reachable on disk as removed, and nothing as failed.
    #[test]
    fn prop_report_counts_removed_files(shapes in bag_strategy()) {
        let dir = TempDir::new().unwrap();
        let mut counter = 0;
        let (bag, created) = materialize(dir.path(), &shapes, &mut counter);

        let report = clean_files(&bag);

        prop_assert_eq!(report.removed + report.missing, bag.temp_paths().len());
        prop_assert!(report.is_clean());
        prop_assert!(report.removed <= created);
    }

    // *For any* upload collection, cleanup SHALL leave files that are not
    // referenced by the collection untouched.
    #[test]
    fn prop_unreferenced_files_survive(shapes in bag_strategy()) {
        let dir = TempDir::new().unwrap();
        let bystander = dir.path().join("bystander");
        fs::write(&bystander, b"keep").unwrap();
        let mut counter = 0;
        let (bag, _) = materialize(dir.path(), &shapes, &mut counter);

        clean_files(&bag);

        prop_assert!(bystander.exists());
    }
}
