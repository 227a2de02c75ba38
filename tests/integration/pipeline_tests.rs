use dupsweep::actions::Decision;
use dupsweep::hashing::StrategyPreference;
use dupsweep::options::DedupOptions;
use dupsweep::pipeline::{run_pipeline, RunSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn options(root: &Path) -> DedupOptions {
    let mut options = DedupOptions::new([root]);
    options.tuning.hash_strategy = StrategyPreference::Builtin;
    options
}

fn no_prompt(_: &Path) -> Decision {
    panic!("prompt must not be called");
}

fn run(options: &DedupOptions) -> (RunSummary, String) {
    let mut out = Vec::new();
    let summary = run_pipeline(options, no_prompt, &mut out).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

/// project/bar2, git/.git/bar222, .yetanotherproject/bar22
fn three_copies() -> (TempDir, Vec<PathBuf>) {
    let dir = tempdir().unwrap();
    let paths = vec![
        write(dir.path(), "project/bar2", "bar"),
        write(dir.path(), "git/.git/bar222", "bar"),
        write(dir.path(), ".yetanotherproject/bar22", "bar"),
    ];
    (dir, paths)
}

#[test]
fn test_auto_delete_dir_without_duplicates_deletes_nothing() {
    let dir = tempdir().unwrap();
    let files = [
        write(dir.path(), "bar", "123"),
        write(dir.path(), "baz", "123"),
        write(dir.path(), "foo", "123"),
        write(dir.path(), "tmp/zoo", "1234"),
    ];
    fs::create_dir(dir.path().join("tmp/tmp")).unwrap();

    let mut options = options(dir.path());
    options.auto_delete = vec![dir.path().join("tmp/tmp")];
    options.really_delete = true;

    let (summary, text) = run(&options);

    assert!(files.iter().all(|f| f.exists()));
    assert_eq!(summary.resolution.deleted, 0);
    assert_eq!(summary.scan.candidates, 3);
    assert_eq!(summary.grouping.duplicate_groups, 1);
    assert!(text.contains("Number of files deleted: 0"));
}

#[test]
fn test_auto_delete_removes_only_copies_inside_directory() {
    let (dir, paths) = three_copies();

    let mut options = options(dir.path());
    options.include_dotfiles = true;
    options.auto_delete = vec![dir.path().join("project")];
    options.really_delete = true;

    let (summary, text) = run(&options);

    assert!(!paths[0].exists());
    assert!(paths[1].exists());
    assert!(paths[2].exists());
    assert_eq!(summary.resolution.deleted, 1);
    assert!(text.contains(&format!("Deleting {}", paths[0].display())));
    assert!(text.contains("Number of files deleted: 1"));
}

#[test]
fn test_interactive_keeps_declined_file() {
    let (dir, paths) = three_copies();

    let mut options = options(dir.path());
    options.include_dotfiles = true;
    options.interactive = true;
    options.really_delete = true;

    let prompt = |p: &Path| {
        if p.to_string_lossy().contains("git") {
            Decision::Keep
        } else {
            Decision::Delete
        }
    };
    let summary = run_pipeline(&options, prompt, Vec::new()).unwrap();

    assert!(!paths[0].exists());
    assert!(paths[1].exists());
    assert!(!paths[2].exists());
    assert_eq!(summary.resolution.deleted, 2);
}

#[test]
fn test_interactive_all_yes_keeps_one_copy() {
    let (dir, paths) = three_copies();

    let mut options = options(dir.path());
    options.include_dotfiles = true;
    options.interactive = true;
    options.really_delete = true;

    let summary = run_pipeline(&options, |_: &Path| Decision::Delete, Vec::new()).unwrap();

    assert_eq!(paths.iter().filter(|p| p.exists()).count(), 1);
    assert_eq!(summary.resolution.deleted, 2);
}

#[test]
fn test_dot_entries_are_skipped_by_default() {
    let (dir, paths) = three_copies();

    let mut options = options(dir.path());
    options.interactive = true;
    options.really_delete = true;

    let summary = run_pipeline(&options, |_: &Path| Decision::Delete, Vec::new()).unwrap();

    // Only project/bar2 is visible, so it has no twin.
    assert_eq!(summary.scan.files, 1);
    assert_eq!(summary.resolution.deleted, 0);
    assert!(paths.iter().all(|p| p.exists()));
}

#[test]
fn test_dry_run_is_repeatable_and_matches_real_run() {
    let dir = tempdir().unwrap();
    let mut doomed = Vec::new();
    for i in 0..5 {
        let content = format!("content number {i}");
        write(dir.path(), &format!("keep/{i}.txt"), &content);
        doomed.push(write(dir.path(), &format!("old/{i}.txt"), &content));
    }
    write(dir.path(), "keep/unique.bin", "no twin anywhere");

    let mut options = options(dir.path());
    options.auto_delete = vec![dir.path().join("old")];

    let (first, first_text) = run(&options);
    let (second, second_text) = run(&options);

    let would = |text: &str| {
        let mut lines: Vec<String> = text
            .lines()
            .filter(|l| l.starts_with("Would have deleted"))
            .map(str::to_string)
            .collect();
        lines.sort();
        lines
    };

    assert_eq!(first.resolution.deleted, 5);
    assert_eq!(first.resolution.deleted, second.resolution.deleted);
    assert_eq!(would(&first_text), would(&second_text));
    assert!(doomed.iter().all(|p| p.exists()));

    options.really_delete = true;
    let (real, _) = run(&options);
    assert_eq!(real.resolution.deleted, first.resolution.deleted);
    assert!(doomed.iter().all(|p| !p.exists()));
}

#[test]
fn test_unique_sizes_are_never_hashed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", "1");
    write(dir.path(), "b", "22");
    write(dir.path(), "c", "333");

    let (summary, text) = run(&options(dir.path()));

    assert_eq!(summary.scan.files, 3);
    assert_eq!(summary.scan.unique_sizes, 3);
    assert_eq!(summary.hashing.hashed, 0);
    assert_eq!(summary.grouping.emissions, 0);
    assert!(text.contains("Number of files that would have been deleted with --reallyDelete: 0"));
}

#[test]
fn test_excluded_directory_is_not_scanned() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/a.txt", "same");
    write(dir.path(), "node_modules/a.txt", "same");

    let mut options = options(dir.path());
    options.exclude = vec!["node_modules".to_string()];

    let (summary, _) = run(&options);
    assert_eq!(summary.scan.files, 1);
    assert_eq!(summary.grouping.duplicate_groups, 0);
}

#[test]
fn test_abort_is_reported_as_abort() {
    let (dir, paths) = three_copies();

    let mut options = options(dir.path());
    options.include_dotfiles = true;
    options.interactive = true;
    options.really_delete = true;

    let err = run_pipeline(&options, |_: &Path| Decision::Abort, Vec::new()).unwrap_err();
    assert!(err.is_abort());
    assert!(paths.iter().all(|p| p.exists()));
}

#[cfg(unix)]
#[test]
fn test_followed_symlink_is_not_a_second_copy() {
    let dir = tempdir().unwrap();
    let real = write(dir.path(), "a.txt", "only copy");
    let link = dir.path().join("z.txt");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let mut options = options(dir.path());
    options.follow_symlinks = true;
    options.interactive = true;
    options.really_delete = true;

    let summary = run_pipeline(&options, |_: &Path| Decision::Delete, Vec::new()).unwrap();

    assert_eq!(summary.scan.files, 1);
    assert_eq!(summary.resolution.deleted, 0);
    assert!(real.exists());
    assert_eq!(fs::read_to_string(&link).unwrap(), "only copy");
}

#[cfg(unix)]
#[test]
fn test_followed_symlink_keeps_a_real_copy_when_all_answers_are_yes() {
    let dir = tempdir().unwrap();
    let first = write(dir.path(), "a.txt", "shared");
    let second = write(dir.path(), "b.txt", "shared");
    std::os::unix::fs::symlink(&first, dir.path().join("z.txt")).unwrap();

    let mut options = options(dir.path());
    options.follow_symlinks = true;
    options.interactive = true;
    options.really_delete = true;

    let summary = run_pipeline(&options, |_: &Path| Decision::Delete, Vec::new()).unwrap();

    assert_eq!(summary.scan.files, 2);
    assert_eq!(summary.resolution.deleted, 1);
    let real_copies = [&first, &second]
        .iter()
        .filter(|p| fs::read_to_string(p).is_ok_and(|c| c == "shared"))
        .count();
    assert_eq!(real_copies, 1);
}
