use birdcrop::archive::{load_archive, save_archive};
use birdcrop::assemble::SkipReason;
use birdcrop::split::{split_dataset, SplitOptions};
use birdcrop::{build_dataset, BirdcropError, CategoryId};

mod common;

#[test]
fn build_save_load_split() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_fixture_tree(temp.path(), &common::bird_fixtures());

    let (dataset, report) = build_dataset(
        &temp.path().join("images"),
        &temp.path().join("images.txt"),
        &temp.path().join("bounding_boxes.txt"),
    )
    .expect("build dataset");

    assert_eq!(report.total, 6);
    assert_eq!(report.valid, 4);
    assert_eq!(report.uniform_side, Some(40));
    assert_eq!(report.unresizable_count(), 1);
    assert_eq!(report.color_skipped_count(), 1);
    assert!(matches!(
        report.skipped[1].reason,
        SkipReason::NotRgb { .. }
    ));
    assert_eq!(dataset.uniform_side().unwrap(), Some(40));

    let archive = temp.path().join("birds.npz");
    save_archive(&archive, &dataset).expect("save archive");
    let restored = load_archive(&archive).expect("load archive");
    assert_eq!(restored, dataset);

    let opts = SplitOptions {
        seed: Some(12345),
        ..Default::default()
    };
    let split = split_dataset(restored, &opts).expect("split");
    assert_eq!(split.total(), 4);
    assert_eq!(split.train.len(), 2);
    assert!(split.test.is_empty());
    assert_eq!(split.valid.len(), 2);
    assert_eq!(split.train[0].category, CategoryId(1));
    assert_eq!(split.train[1].category, CategoryId(2));
}

#[test]
fn short_manifest_line_aborts_the_build() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_fixture_tree(temp.path(), &common::bird_fixtures());
    std::fs::write(
        temp.path().join("bounding_boxes.txt"),
        "1 50.0 50.0 20.0 40.0\n2 80.0 10.0 10.0\n",
    )
    .expect("overwrite boxes");

    let err = build_dataset(
        &temp.path().join("images"),
        &temp.path().join("images.txt"),
        &temp.path().join("bounding_boxes.txt"),
    )
    .unwrap_err();
    assert!(matches!(err, BirdcropError::ManifestFormat { line: 2, .. }));
}

#[test]
fn manifests_of_different_length_are_rejected() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::write_fixture_tree(temp.path(), &common::bird_fixtures());
    std::fs::write(
        temp.path().join("bounding_boxes.txt"),
        "1 50.0 50.0 20.0 40.0\n",
    )
    .expect("overwrite boxes");

    let err = build_dataset(
        &temp.path().join("images"),
        &temp.path().join("images.txt"),
        &temp.path().join("bounding_boxes.txt"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        BirdcropError::ManifestMismatch { images: 6, boxes: 1 }
    ));
}
