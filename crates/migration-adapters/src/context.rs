//! Contexto explícito de una migración.

use std::path::PathBuf;

/// Directorios conocidos bajo `base_path`.
pub const ACEDB_DATABASE_DIR: &str = "acedb_database";
pub const ACEDB_ID_CATALOG_DIR: &str = "acedb_id_catalog";
pub const ACEDB_DUMP_DIR: &str = "acedb-dump";
pub const EDN_LOGS_DIR: &str = "edn-logs";
pub const HOMOL_EDN_LOGS_DIR: &str = "homol-edn-logs";
pub const DATOMIC_DIR: &str = "datomic_free";
pub const BACKUP_DIR: &str = "datomic-db-backup";
pub const PSEUDOACE_DIR: &str = "pseudoace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationContext {
    pub base_path: PathBuf,
    /// Release de datos ACeDB, p.ej. `WS260`.
    pub release: String,
    pub datomic_uri: String,
    pub java_cmd: String,
    pub pseudoace_version: String,
    /// Paralelismo para `xargs -P`.
    pub cpus: usize,
}

impl MigrationContext {
    /// Contexto con los defaults habituales para `release` bajo `base_path`.
    pub fn new(base_path: impl Into<PathBuf>, release: impl Into<String>) -> Self {
        let release = release.into();
        Self { base_path: base_path.into(),
               datomic_uri: default_datomic_uri(&release),
               release,
               java_cmd: "java -server".to_string(),
               pseudoace_version: "0.5.7".to_string(),
               cpus: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1) }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// URI de la base de homología: la principal con sufijo `-homol`.
    pub fn homol_datomic_uri(&self) -> String {
        format!("{}-homol", self.datomic_uri)
    }

    pub fn pseudoace_dir(&self) -> PathBuf {
        self.path(PSEUDOACE_DIR)
    }

    pub fn pseudoace_jar(&self) -> PathBuf {
        self.pseudoace_dir().join(format!("pseudoace-{}.jar", self.pseudoace_version))
    }
}

pub fn default_datomic_uri(release: &str) -> String {
    format!("datomic:free://localhost:4334/{release}")
}
