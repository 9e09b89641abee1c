use gitbackup_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file_and_parents() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("bob/projects.git/projects.txt"));

    io::write_atomic(&path, b"R1 ; \"Thesis\"\n").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "R1 ; \"Thesis\"\n");
}

#[test]
fn test_write_atomic_overwrites_without_leftovers() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("projects.txt");
    fs::write(&file_path, "original").unwrap();

    io::write_text(&NormalizedPath::new(&file_path), "updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".tmp")
        })
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_write_atomic_failure_removes_temp_file() {
    let temp = TempDir::new().unwrap();
    // A non-empty directory in the way makes the final rename fail
    let target = temp.path().join("projects.txt");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep"), "x").unwrap();

    let result = io::write_text(&NormalizedPath::new(&target), "R1 ; \"Thesis\"\n");

    assert!(result.is_err());
    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["projects.txt".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_ensure_private_dir_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("alice/P1.git");
    io::ensure_private_dir(&NormalizedPath::new(&dir)).unwrap();

    let mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
    // umask can only clear bits
    assert_eq!(mode & !0o700, 0);
    assert!(dir.is_dir());
}

#[test]
fn test_ensure_private_dir_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path().join("x"));
    io::ensure_private_dir(&dir).unwrap();
    io::ensure_private_dir(&dir).unwrap();
    assert!(dir.is_dir());
}
