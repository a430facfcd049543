//! Journal de eventos append-only en JSON lines.
//!
//! Una línea por `PipelineEvent`, fsync tras cada append. Los errores de
//! escritura se registran con `log::error!` y el evento se conserva en
//! memoria; el journal nunca detiene la migración.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use migration_core::{EventStore, PipelineEvent, PipelineEventKind};
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::fsync::fsync_file;

#[derive(Debug)]
pub struct JsonlEventStore {
    path: PathBuf,
    file: Option<File>,
    by_run: HashMap<Uuid, Vec<PipelineEvent>>,
}

impl JsonlEventStore {
    /// Abre el journal en `path` y carga los eventos existentes. Líneas
    /// ilegibles se saltan con un warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
        let by_run = load(&path)?;
        let file = OpenOptions::new().create(true)
                                     .append(true)
                                     .open(&path)
                                     .map_err(|e| PersistenceError::io(&path, e))?;
        Ok(Self { path,
                  file: Some(file),
                  by_run })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Todas las ejecuciones registradas, en orden de primer evento.
    pub fn run_ids(&self) -> Vec<Uuid> {
        let mut runs: Vec<(&Uuid, &PipelineEvent)> =
            self.by_run.iter().filter_map(|(id, evs)| evs.first().map(|e| (id, e))).collect();
        runs.sort_by_key(|(_, first)| first.ts);
        runs.into_iter().map(|(id, _)| *id).collect()
    }

    fn write_line(&mut self, event: &PipelineEvent) -> Result<(), PersistenceError> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        file.write_all(&line).map_err(|e| PersistenceError::io(&self.path, e))?;
        fsync_file(file).map_err(|e| PersistenceError::io(&self.path, e))
    }
}

fn load(path: &Path) -> Result<HashMap<Uuid, Vec<PipelineEvent>>, PersistenceError> {
    let mut by_run: HashMap<Uuid, Vec<PipelineEvent>> = HashMap::new();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(by_run),
        Err(e) => return Err(PersistenceError::io(path, e)),
    };
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| PersistenceError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PipelineEvent>(&line) {
            Ok(ev) => by_run.entry(ev.run_id).or_default().push(ev),
            Err(e) => log::warn!("skipping unreadable journal line {} in {}: {e}", lineno + 1, path.display()),
        }
    }
    Ok(by_run)
}

impl EventStore for JsonlEventStore {
    fn append_kind(&mut self, run_id: Uuid, kind: PipelineEventKind) -> PipelineEvent {
        let seq = self.by_run.get(&run_id).map(|v| v.len() as u64).unwrap_or(0);
        let ev = PipelineEvent { seq,
                                 run_id,
                                 kind,
                                 ts: Utc::now() };
        if let Err(e) = self.write_line(&ev) {
            log::error!("could not append to event journal: {e}");
        }
        self.by_run.entry(run_id).or_default().push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<PipelineEvent> {
        self.by_run.get(&run_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn appends_survive_reopen_and_skip_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let run = Uuid::new_v4();
        {
            let mut journal = JsonlEventStore::open(&path).unwrap();
            journal.append_kind(run, PipelineEventKind::RunCompleted { pipeline: "full".into() });
        }
        let mut raw = fs::read_to_string(&path).unwrap();
        raw.push_str("not json\n");
        fs::write(&path, raw).unwrap();

        let mut journal = JsonlEventStore::open(&path).unwrap();
        let ev = journal.append_kind(run, PipelineEventKind::MarkerReset { from: 4, to: 2 });
        assert_eq!(ev.seq, 1);
        assert_eq!(journal.list(run).len(), 2);
        assert_eq!(journal.run_ids(), vec![run]);
    }
}
