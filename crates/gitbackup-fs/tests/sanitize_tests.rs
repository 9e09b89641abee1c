//! Tests for clearing a workspace while keeping its history

use gitbackup_fs::{NormalizedPath, clean_except_history};
use std::fs;
use tempfile::TempDir;

fn entry_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn only_history_dir_survives() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("P1.git");
    fs::create_dir_all(ws.join(".git/objects")).unwrap();
    fs::write(ws.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
    fs::write(ws.join("main.tex"), "old").unwrap();
    fs::write(ws.join(".latexmkrc"), "old").unwrap();
    fs::create_dir_all(ws.join("chapters/appendix")).unwrap();
    fs::write(ws.join("chapters/appendix/a.tex"), "old").unwrap();

    let removed = clean_except_history(&NormalizedPath::new(&ws)).unwrap();

    assert_eq!(removed, 3);
    assert_eq!(entry_names(&ws), vec![".git".to_string()]);
    assert!(ws.join(".git/HEAD").exists());
    assert!(ws.join(".git/objects").is_dir());
}

#[test]
fn missing_workspace_is_noop() {
    let temp = TempDir::new().unwrap();
    let ws = NormalizedPath::new(temp.path().join("never-created.git"));
    assert_eq!(clean_except_history(&ws).unwrap(), 0);
    assert!(!ws.exists());
}

#[test]
fn plain_file_named_git_is_removed() {
    // A `.git` file (not a directory) is not a history directory
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("P2.git");
    fs::create_dir_all(&ws).unwrap();
    fs::write(ws.join(".git"), "gitdir: elsewhere").unwrap();

    clean_except_history(&NormalizedPath::new(&ws)).unwrap();
    assert!(entry_names(&ws).is_empty());
}

#[cfg(unix)]
#[test]
fn symlinked_directory_is_unlinked_not_followed() {
    let temp = TempDir::new().unwrap();
    let outside = temp.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    fs::write(outside.join("keep.txt"), "must survive").unwrap();

    let ws = temp.path().join("P3.git");
    fs::create_dir_all(ws.join(".git")).unwrap();
    std::os::unix::fs::symlink(&outside, ws.join("link")).unwrap();

    clean_except_history(&NormalizedPath::new(&ws)).unwrap();

    assert_eq!(entry_names(&ws), vec![".git".to_string()]);
    assert!(outside.join("keep.txt").exists());
}
