use anyhow::Context;
use goalpath_core::db::open_db;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE: &str = "goalpath.sqlite3";

/// Resolve the database file.
///
/// Priority:
/// 1. `--db` flag / `GOALPATH_DB_PATH` env var (passed in as `explicit`)
/// 2. `<temp>/goalpath.sqlite3`
pub fn resolve_db_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => std::env::temp_dir().join(DEFAULT_DB_FILE),
    }
}

pub fn open(path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    open_db(path).with_context(|| format!("failed to open database {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::resolve_db_path;
    use std::path::Path;

    #[test]
    fn explicit_path_wins() {
        assert_eq!(
            resolve_db_path(Some(Path::new("/tmp/custom.db"))),
            Path::new("/tmp/custom.db")
        );
        assert!(resolve_db_path(None).ends_with("goalpath.sqlite3"));
    }
}
