//! Copia del log de migración tras cada paso.
//!
//! Destino: `<archive_dir>/<run_id>/step-<NN>-<ok|failed>.log`.

use std::fs;
use std::io;
use std::path::PathBuf;

use migration_core::LogArchiver;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FileLogArchiver {
    log_file: PathBuf,
    archive_dir: PathBuf,
}

impl FileLogArchiver {
    pub fn new(log_file: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self { log_file: log_file.into(),
               archive_dir: archive_dir.into() }
    }
}

impl LogArchiver for FileLogArchiver {
    fn archive(&self, run_id: Uuid, step_n: usize, succeeded: bool) -> io::Result<Option<PathBuf>> {
        if !self.log_file.is_file() {
            return Ok(None);
        }
        let run_dir = self.archive_dir.join(run_id.to_string());
        fs::create_dir_all(&run_dir)?;
        let outcome = if succeeded { "ok" } else { "failed" };
        let target = run_dir.join(format!("step-{step_n:02}-{outcome}.log"));
        fs::copy(&self.log_file, &target)?;
        log::debug!("archived {} to {}", self.log_file.display(), target.display());
        Ok(Some(target))
    }
}
