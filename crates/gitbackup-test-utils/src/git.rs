//! History repository fixtures and inspection helpers.

use std::fs;
use std::path::Path;

/// Creates a minimal `.git` directory structure **without** initialising a real
/// git repository.
///
/// Use for: sanitizer tests that only need the history directory to exist.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises a real git repository using `git2` (no initial commit).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Number of commits reachable from HEAD; zero for an unborn branch.
///
/// # Panics
/// Panics if `path` is not a git repository.
pub fn commit_count(path: &Path) -> usize {
    let repo = git2::Repository::open(path)
        .unwrap_or_else(|e| panic!("commit_count: {} is not a repository: {e}", path.display()));
    let mut walk = repo.revwalk().expect("revwalk");
    if walk.push_head().is_err() {
        return 0;
    }
    walk.count()
}

/// Message of the HEAD commit.
///
/// # Panics
/// Panics if the repository has no HEAD commit.
pub fn head_message(path: &Path) -> String {
    let repo = git2::Repository::open(path).expect("open repository");
    let head = repo.head().expect("HEAD").peel_to_commit().expect("HEAD commit");
    head.message().unwrap_or_default().to_string()
}

/// Paths tracked by the HEAD commit, sorted.
///
/// # Panics
/// Panics if the repository has no HEAD commit.
pub fn head_tree_paths(path: &Path) -> Vec<String> {
    let repo = git2::Repository::open(path).expect("open repository");
    let tree = repo
        .head()
        .expect("HEAD")
        .peel_to_tree()
        .expect("HEAD tree");
    let mut paths = Vec::new();
    tree.walk(git2::TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(git2::ObjectType::Blob) {
            paths.push(format!("{}{}", root, entry.name().unwrap_or_default()));
        }
        git2::TreeWalkResult::Ok
    })
    .expect("tree walk");
    paths.sort();
    paths
}
