//! Recursive permission normalization

use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result};

/// Mode applied to unpacked export content so later tooling can read it.
pub const SHARED_TREE_MODE: u32 = 0o755;

/// Mode applied to the listing workspace after each snapshot.
pub const PRIVATE_TREE_MODE: u32 = 0o700;

/// Set `mode` on `root` and everything below it.
///
/// Symlinks are skipped; changing their mode would change their target.
#[cfg(unix)]
pub fn set_mode_recursive(root: &NormalizedPath, mode: u32) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    for entry in WalkDir::new(root.to_native()).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(|p| p.to_path_buf()).unwrap_or_else(|| root.to_native());
            Error::io(path, e.into())
        })?;
        if entry.path_is_symlink() {
            continue;
        }
        fs::set_permissions(entry.path(), fs::Permissions::from_mode(mode))
            .map_err(|e| Error::io(entry.path(), e))?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn set_mode_recursive(root: &NormalizedPath, _mode: u32) -> Result<()> {
    for entry in WalkDir::new(root.to_native()) {
        entry.map_err(|e| Error::io(root.to_native(), e.into()))?;
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn mode_of(path: &std::path::Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn applies_mode_to_nested_entries() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("ws");
        fs::create_dir_all(root.join("figures")).unwrap();
        fs::write(root.join("main.tex"), "\\documentclass{article}").unwrap();
        fs::write(root.join("figures/plot.pdf"), "%PDF").unwrap();
        fs::set_permissions(root.join("main.tex"), fs::Permissions::from_mode(0o600)).unwrap();

        set_mode_recursive(&NormalizedPath::new(&root), SHARED_TREE_MODE).unwrap();

        assert_eq!(mode_of(&root), 0o755);
        assert_eq!(mode_of(&root.join("main.tex")), 0o755);
        assert_eq!(mode_of(&root.join("figures/plot.pdf")), 0o755);
    }
}
