//! Configuración de la herramienta.
//! Carga variables de entorno (.env) y las combina con los flags de la CLI.

use std::env;
use std::path::{Path, PathBuf};

use migration_adapters::context::default_datomic_uri;
use migration_adapters::MigrationContext;
use migration_persistence::config::home_dir;
use migration_persistence::{init_dotenv, StoreConfig};

use crate::errors::CliError;

/// Configuración resuelta de una invocación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Raíz de todos los artefactos en disco.
    pub base_path: PathBuf,
    /// Archivo con el marcador de reanudación.
    pub state_path: PathBuf,
    pub journal_path: PathBuf,
    /// Release de datos ACeDB (p.ej. `WS260`).
    pub release: Option<String>,
    pub datomic_uri: Option<String>,
    pub slack_webhook_url: Option<String>,
    pub slack_channel: Option<String>,
    pub log_file: PathBuf,
    pub pseudoace_version: String,
    pub java_cmd: String,
}

/// Valores explícitos de la CLI; tienen prioridad sobre el entorno.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_path: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
    pub release: Option<String>,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl MigrationConfig {
    pub fn from_env() -> Self {
        init_dotenv();
        let store = StoreConfig::from_env();
        let base_path = non_empty_var("MIGRATION_BASE_PATH").map(PathBuf::from)
                                                            .unwrap_or_else(|| home_dir().join("wormbase"));
        let log_file = non_empty_var("MIGRATION_LOG_FILE").map(PathBuf::from)
                                                          .unwrap_or_else(|| default_log_file(&base_path));
        Self { base_path,
               state_path: store.state_path,
               journal_path: store.journal_path,
               release: non_empty_var("WS_RELEASE"),
               datomic_uri: non_empty_var("DATOMIC_URI"),
               slack_webhook_url: non_empty_var("SLACK_WEBHOOK_URL"),
               slack_channel: non_empty_var("SLACK_CHANNEL"),
               log_file,
               pseudoace_version: non_empty_var("PSEUDOACE_VERSION").unwrap_or_else(|| "0.5.7".to_string()),
               java_cmd: non_empty_var("JAVA_CMD").unwrap_or_else(|| "java -server".to_string()) }
    }

    /// Aplica los flags de la CLI. Si cambia la base y el log no venía del
    /// entorno, el log se mueve con ella.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(base) = overrides.base_path {
            if self.log_file == default_log_file(&self.base_path) {
                self.log_file = default_log_file(&base);
            }
            self.base_path = base;
        }
        if let Some(state) = overrides.state_path {
            self.state_path = state;
        }
        if overrides.release.is_some() {
            self.release = overrides.release;
        }
        self
    }

    pub fn release(&self) -> Result<&str, CliError> {
        self.release
            .as_deref()
            .ok_or_else(|| CliError::Config("data release not set (use --release or WS_RELEASE)".to_string()))
    }

    /// Contexto de migración; requiere la release.
    pub fn context(&self) -> Result<MigrationContext, CliError> {
        let release = self.release()?;
        let mut ctx = MigrationContext::new(&self.base_path, release);
        ctx.datomic_uri = self.datomic_uri.clone().unwrap_or_else(|| default_datomic_uri(release));
        ctx.pseudoace_version = self.pseudoace_version.clone();
        ctx.java_cmd = self.java_cmd.clone();
        Ok(ctx)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.base_path.join("logs").join("archive")
    }
}

fn default_log_file(base: &Path) -> PathBuf {
    base.join("logs").join("migration.log")
}
