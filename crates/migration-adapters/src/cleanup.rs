//! Borrado de artefactos de una migración anterior.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::context::{MigrationContext, ACEDB_DUMP_DIR, BACKUP_DIR, EDN_LOGS_DIR, HOMOL_EDN_LOGS_DIR};

/// Directorios que produce una corrida y que `clean_previous_state` elimina.
/// Los datos descargados (`acedb_database`, catálogo de ids) se conservan.
pub const GENERATED_DIRS: &[&str] =
    &[ACEDB_DUMP_DIR, EDN_LOGS_DIR, HOMOL_EDN_LOGS_DIR, BACKUP_DIR, "logs/archive"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Elimina los directorios generados y el archivo de estado. Lo ausente se
/// ignora; los fallos se registran y se reportan sin abortar.
pub fn clean_previous_state(ctx: &MigrationContext, state_path: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();
    for name in GENERATED_DIRS {
        let dir = ctx.path(name);
        info!("removing directory: {}", dir.display());
        record(&mut report, dir.clone(), fs::remove_dir_all(&dir));
    }
    record(&mut report, state_path.to_path_buf(), fs::remove_file(state_path));
    report
}

fn record(report: &mut CleanupReport, path: PathBuf, result: std::io::Result<()>) {
    match result {
        Ok(()) => report.removed.push(path),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            warn!("could not remove {}: {e}", path.display());
            report.failed.push((path, e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_generated_state_and_keeps_source_data() {
        let dir = tempdir().unwrap();
        let ctx = MigrationContext::new(dir.path(), "WS260");
        for name in ["acedb-dump", "edn-logs", "logs/archive/run", "acedb_database"] {
            fs::create_dir_all(ctx.path(name)).unwrap();
        }
        let state = dir.path().join(".db-migration.json");
        fs::write(&state, "{}").unwrap();

        let report = clean_previous_state(&ctx, &state);
        assert!(report.failed.is_empty());
        assert_eq!(report.removed.len(), 4);
        assert!(!ctx.path("acedb-dump").exists());
        assert!(!state.exists());
        assert!(ctx.path("acedb_database").is_dir());
    }

    #[test]
    fn nothing_to_clean_is_fine() {
        let dir = tempdir().unwrap();
        let ctx = MigrationContext::new(dir.path(), "WS260");
        let report = clean_previous_state(&ctx, &dir.path().join("absent.json"));
        assert_eq!(report, CleanupReport::default());
    }
}
