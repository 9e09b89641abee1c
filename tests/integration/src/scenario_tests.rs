//! End-to-end scenarios
//!
//! Each test runs a full session (store, runtime, workspace, history)
//! against the in-memory store and the scripted runtime, then inspects the
//! host directory the way an operator would.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gitbackup_core::pipeline::history;
use gitbackup_core::{BackupConfig, ErrorKind, Session};
use gitbackup_fs::clean_except_history;
use gitbackup_store::{MemoryProject, MemoryStore, UserId};
use gitbackup_test_utils::git::{commit_count, fake_git_dir, head_message, head_tree_paths};
use gitbackup_test_utils::runtime::{FakeRuntime, RuntimeCall};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use walkdir::WalkDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// A host root with a store and runtime describing one platform instance.
struct Deployment {
    root: TempDir,
    store: Arc<MemoryStore>,
    runtime: Arc<FakeRuntime>,
}

impl Deployment {
    fn new(store: MemoryStore, files: &[(&str, &[u8])]) -> Self {
        Self {
            root: TempDir::new().unwrap(),
            store: Arc::new(store),
            runtime: Arc::new(FakeRuntime::serving(files)),
        }
    }

    fn config(&self) -> BackupConfig {
        BackupConfig {
            host_path: self.root.path().to_path_buf(),
            container_name: Some("sharelatex".into()),
            lock_wait_secs: 0,
            ..BackupConfig::default()
        }
    }

    fn session(&self) -> Session {
        Session::new(self.config(), self.store.clone()).with_runtime(self.runtime.clone())
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    fn entries(&self) -> usize {
        fs::read_dir(self.root.path()).unwrap().count()
    }
}

fn alice_owns_p1() -> MemoryStore {
    let u1 = UserId::new("U1");
    let u4 = UserId::new("U4");
    MemoryStore::new()
        .with_user("alice@example.com", &u1)
        .with_user("dave@example.com", &u4)
        .with_project(MemoryProject::new("P1", "Paper").owned_by(&u1))
}

const PAPER: &[(&str, &[u8])] = &[
    ("main.tex", b"\\documentclass{article}".as_slice()),
    ("sections/", b"".as_slice()),
    ("sections/intro.tex", b"\\section{Intro}".as_slice()),
];

fn relative_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap();
            rel.to_string_lossy().replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

// =============================================================================
// Project export
// =============================================================================

#[tokio::test]
async fn alice_exports_p1() {
    let deployment = Deployment::new(alice_owns_p1(), PAPER);

    let report = deployment
        .session()
        .export_project("alice@example.com", "P1")
        .await
        .unwrap();

    let ws = deployment.path("alice@example.com/P1.git");
    assert_eq!(report.workspace, ws);
    assert_eq!(
        relative_files(&ws),
        vec!["main.tex", "sections/intro.tex"]
    );
    assert!(ws.join(".git").is_dir());
    assert_eq!(commit_count(&ws), 1);
    assert_eq!(head_message(&ws), "by Overleaf CEP");
    assert_eq!(head_tree_paths(&ws), vec!["main.tex", "sections/intro.tex"]);

    assert!(deployment.runtime.calls().contains(&RuntimeCall::Fetch(
        "/var/lib/overleaf/U1_P1.zip".into()
    )));
    assert_eq!(deployment.store.close_count(), 1);
    assert_eq!(deployment.runtime.close_count(), 1);
}

#[tokio::test]
async fn repeated_export_without_remote_change_adds_no_snapshot() {
    let deployment = Deployment::new(alice_owns_p1(), PAPER);

    let first = deployment
        .session()
        .export_project("alice@example.com", "P1")
        .await
        .unwrap();
    let second = deployment
        .session()
        .export_project("alice@example.com", "P1")
        .await
        .unwrap();

    assert!(first.created_snapshot());
    assert!(!second.created_snapshot());
    assert_eq!(commit_count(&deployment.path("alice@example.com/P1.git")), 1);
}

#[tokio::test]
async fn unwrapped_export_leaves_no_archive_files() {
    let deployment = Deployment::new(alice_owns_p1(), PAPER);

    deployment
        .session()
        .export_project("alice@example.com", "P1")
        .await
        .unwrap();

    let ws = deployment.path("alice@example.com/P1.git");
    assert!(!ws.join("U1_P1.zip").exists());
    assert!(!ws.join("U1_P1.zip.tar").exists());
    assert!(relative_files(&ws).iter().all(|f| !f.ends_with(".zip") && !f.ends_with(".tar")));
}

#[tokio::test]
async fn unknown_identity_touches_nothing() {
    let deployment = Deployment::new(alice_owns_p1(), PAPER);

    let err = deployment
        .session()
        .export_project("eve@example.com", "P1")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.exit_code(), 67);
    assert!(deployment.runtime.calls().is_empty());
    assert_eq!(deployment.entries(), 0);
    assert_eq!(deployment.store.close_count(), 1);
}

#[tokio::test]
async fn identity_without_membership_never_triggers_export() {
    let deployment = Deployment::new(alice_owns_p1(), PAPER);

    let err = deployment
        .session()
        .export_project("dave@example.com", "P1")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(!err.kind().is_retryable());
    assert!(!deployment.runtime.exported());
    assert_eq!(deployment.entries(), 0);
}

#[tokio::test]
async fn collaborators_and_readers_may_export() {
    let u1 = UserId::new("U1");
    let u5 = UserId::new("U5");
    let u6 = UserId::new("U6");
    let store = MemoryStore::new()
        .with_user("erin@example.com", &u5)
        .with_user("frank@example.com", &u6)
        .with_project(
            MemoryProject::new("P1", "Paper")
                .owned_by(&u1)
                .shared_with(&u5)
                .read_only_for(&u6),
        );
    let deployment = Deployment::new(store, PAPER);

    for identity in ["erin@example.com", "frank@example.com"] {
        let report = deployment.session().export_project(identity, "P1").await.unwrap();
        assert!(report.created_snapshot(), "{identity} should get a snapshot");
    }
    assert!(deployment.path("erin@example.com/P1.git/main.tex").is_file());
    assert!(deployment.path("frank@example.com/P1.git/main.tex").is_file());
}

#[tokio::test]
async fn history_reports_exported_snapshots() {
    let deployment = Deployment::new(alice_owns_p1(), PAPER);
    deployment
        .session()
        .export_project("alice@example.com", "P1")
        .await
        .unwrap();
    deployment.runtime.set_files(&[("main.tex", b"\\documentclass{book}".as_slice())]);
    deployment
        .session()
        .export_project("alice@example.com", "P1")
        .await
        .unwrap();

    let entries = history(&deployment.config(), "alice@example.com", Some("P1"), 10).unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.message == "by Overleaf CEP"));
    assert_eq!(entries[0].author, "gitbackup");
    let json = serde_json::to_value(&entries).unwrap();
    assert_eq!(json[0]["hash"].as_str().unwrap().len(), 7);
}

// =============================================================================
// Sanitizer
// =============================================================================

#[test]
fn sanitizer_keeps_only_history() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("P1.git");
    fs::create_dir_all(ws.join("old/nested")).unwrap();
    fake_git_dir(&ws);
    fs::write(ws.join("stale.tex"), "x").unwrap();
    fs::write(ws.join("old/nested/figure.png"), "png").unwrap();
    fs::write(ws.join(".hidden"), "h").unwrap();

    clean_except_history(&ws.as_path().into()).unwrap();

    let names: Vec<String> = fs::read_dir(&ws)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![".git"]);
    assert!(ws.join(".git/HEAD").is_file());
}

// =============================================================================
// Project listing
// =============================================================================

#[tokio::test]
async fn listing_for_u2_writes_exact_manifest() {
    let u2 = UserId::new("U2");
    let store = MemoryStore::new()
        .with_user("bob@example.com", &u2)
        .with_project(MemoryProject::new("R1", "Thesis").owned_by(&u2))
        .with_project(MemoryProject::new("R2", "Notes").shared_with(&u2));
    let deployment = Deployment::new(store, &[]);

    let report = Session::new(deployment.config(), deployment.store.clone())
        .snapshot_project_list("bob@example.com")
        .await
        .unwrap();

    let ws = deployment.path("bob@example.com/projects.git");
    assert_eq!(report.projects, 2);
    assert_eq!(
        fs::read_to_string(ws.join("projects.txt")).unwrap(),
        "R1 ; \"Thesis\"\nR2 ; \"Notes\"\n"
    );
    assert_eq!(commit_count(&ws), 1);
    assert_eq!(deployment.store.close_count(), 1);

    let entries = history(&deployment.config(), "bob@example.com", None, 5).unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn listing_follows_access_changes() {
    let u2 = UserId::new("U2");
    let before = MemoryStore::new()
        .with_user("bob@example.com", &u2)
        .with_project(MemoryProject::new("R1", "Thesis").owned_by(&u2))
        .with_project(MemoryProject::new("R2", "Notes").owned_by(&u2));
    let deployment = Deployment::new(before, &[]);
    Session::new(deployment.config(), deployment.store.clone())
        .snapshot_project_list("bob@example.com")
        .await
        .unwrap();

    let after = MemoryStore::new()
        .with_user("bob@example.com", &u2)
        .with_project(MemoryProject::new("R1", "Thesis").owned_by(&u2))
        .with_project(MemoryProject::new("R2", "Notes").owned_by(&u2).archived());
    let report = Session::new(deployment.config(), Arc::new(after))
        .snapshot_project_list("bob@example.com")
        .await
        .unwrap();

    let ws = deployment.path("bob@example.com/projects.git");
    assert!(report.created_snapshot());
    assert_eq!(
        fs::read_to_string(ws.join("projects.txt")).unwrap(),
        "R1 ; \"Thesis\"\n"
    );
    assert_eq!(commit_count(&ws), 2);
}
