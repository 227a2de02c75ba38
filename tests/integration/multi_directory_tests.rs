use dupsweep::actions::Decision;
use dupsweep::hashing::StrategyPreference;
use dupsweep::options::DedupOptions;
use dupsweep::pipeline::run_pipeline;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn builtin(mut options: DedupOptions) -> DedupOptions {
    options.tuning.hash_strategy = StrategyPreference::Builtin;
    options
}

fn no_prompt(_: &Path) -> Decision {
    panic!("prompt must not be called");
}

#[test]
fn test_duplicates_across_two_roots() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    fs::write(dir1.path().join("a.txt"), "dup").unwrap();
    fs::write(dir2.path().join("b.txt"), "dup").unwrap();

    let options = builtin(DedupOptions::new([dir1.path(), dir2.path()]));
    let summary = run_pipeline(&options, no_prompt, Vec::new()).unwrap();

    assert_eq!(summary.scan.files, 2);
    assert_eq!(summary.grouping.duplicate_groups, 1);
}

#[test]
fn test_overlapping_roots_do_not_pair_a_file_with_itself() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("a.txt"), "content").unwrap();
    fs::write(sub.join("b.txt"), "content").unwrap();
    fs::write(sub.join("lonely.txt"), "other!!").unwrap();

    let options = builtin(DedupOptions::new([dir.path(), sub.as_path(), dir.path()]));
    let mut out = Vec::new();
    let summary = run_pipeline(&options, no_prompt, &mut out).unwrap();

    assert_eq!(summary.scan.files, 3);
    assert_eq!(summary.grouping.duplicate_groups, 1);
    assert_eq!(summary.grouping.records, 3);
}

#[test]
fn test_auto_delete_directory_is_also_scanned() {
    let keep = tempdir().unwrap();
    let trash = tempdir().unwrap();
    let original = keep.path().join("photo.jpg");
    let copy = trash.path().join("photo (1).jpg");
    fs::write(&original, "pixels").unwrap();
    fs::write(&copy, "pixels").unwrap();

    let mut options = builtin(DedupOptions::new([keep.path()]));
    options.auto_delete = vec![trash.path().to_path_buf()];
    options.really_delete = true;

    let summary = run_pipeline(&options, no_prompt, Vec::new()).unwrap();

    assert_eq!(summary.resolution.deleted, 1);
    assert!(original.exists());
    assert!(!copy.exists());
}

#[test]
fn test_unusable_roots_are_skipped() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    fs::write(&file, "x").unwrap();
    fs::write(dir.path().join("a"), "same").unwrap();
    fs::write(dir.path().join("b"), "same").unwrap();

    let options = builtin(DedupOptions::new([
        dir.path().join("missing"),
        file,
        dir.path().to_path_buf(),
    ]));
    let summary = run_pipeline(&options, no_prompt, Vec::new()).unwrap();

    assert_eq!(summary.grouping.duplicate_groups, 1);
}
