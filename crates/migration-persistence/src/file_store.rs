//! `FileStateStore`: mapa JSON `{clave: valor}` en un único archivo.
//!
//! Cada `set`/`remove` reescribe el archivo completo de forma atómica:
//! `<archivo>.tmp` + fsync + rename + fsync del directorio padre. Un lector
//! ve el archivo viejo o el nuevo, nunca uno a medias.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use migration_core::{StateError, StateStore};
use serde_json::Value;

use crate::error::PersistenceError;
use crate::fsync::{fsync_dir, fsync_file};

#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl FileStateStore {
    /// Abre (o prepara) el store en `path`. Un archivo inexistente o vacío
    /// equivale a un mapa vacío; no se crea nada hasta la primera escritura.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => {
                let parsed: Value = serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt { path: path.clone(),
                                                                                                          reason: e.to_string() })?;
                match parsed {
                    Value::Object(map) => map.into_iter().collect(),
                    other => {
                        return Err(PersistenceError::Corrupt { path,
                                                               reason: format!("expected a JSON object, found {other}") })
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PersistenceError::io(&path, e)),
        };
        log::debug!("state store opened at {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borra el archivo de estado. Ausente no es error.
    pub fn destroy(path: &Path) -> Result<bool, PersistenceError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PersistenceError::io(path, e)),
        }
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| PersistenceError::io(&parent, e))?;

        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        {
            let mut file = OpenOptions::new().write(true)
                                             .create(true)
                                             .truncate(true)
                                             .open(&tmp_path)
                                             .map_err(|e| PersistenceError::io(&tmp_path, e))?;
            file.write_all(&bytes).map_err(|e| PersistenceError::io(&tmp_path, e))?;
            fsync_file(&file).map_err(|e| PersistenceError::io(&tmp_path, e))?;
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| PersistenceError::io(&self.path, e))?;
        fsync_dir(&parent).map_err(|e| PersistenceError::io(&parent, e))?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StateError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StateError> {
        let previous = self.entries.insert(key.to_string(), value);
        if let Err(e) = self.persist() {
            // Sin persistir no hay cambio: la vista en memoria vuelve atrás.
            match previous {
                Some(v) => self.entries.insert(key.to_string(), v),
                None => self.entries.remove(key),
            };
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StateError> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist() {
            self.entries.insert(key.to_string(), previous);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty_and_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileStateStore::open(&path).unwrap();
        assert_eq!(store.get("last-step-ok-idx").unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn set_leaves_no_tmp_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = FileStateStore::open(&path).unwrap();
        store.set("k", json!(1)).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/state.json");
        let mut store = FileStateStore::open(&path).unwrap();
        store.set("k", json!("v")).unwrap();
        assert_eq!(FileStateStore::open(&path).unwrap().get("k").unwrap(), Some(json!("v")));
    }

    #[test]
    fn non_object_content_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(FileStateStore::open(&path), Err(PersistenceError::Corrupt { .. })));
    }

    #[test]
    fn destroy_reports_whether_file_existed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert!(!FileStateStore::destroy(&path).unwrap());
        fs::write(&path, "{}").unwrap();
        assert!(FileStateStore::destroy(&path).unwrap());
        assert!(!path.exists());
    }
}
