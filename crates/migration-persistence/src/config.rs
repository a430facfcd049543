//! Rutas de persistencia desde variables de entorno.
//! `MIGRATION_STATE_PATH` y `MIGRATION_JOURNAL_PATH`, con defaults bajo `$HOME`.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Nombre del archivo de estado por defecto (en `$HOME`).
pub const DEFAULT_STATE_FILE: &str = ".db-migration.json";
pub const DEFAULT_JOURNAL_FILE: &str = ".db-migration.events.jsonl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub state_path: PathBuf,
    pub journal_path: PathBuf,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let home = home_dir();
        let state_path = env::var_os("MIGRATION_STATE_PATH").map(PathBuf::from)
                                                            .unwrap_or_else(|| home.join(DEFAULT_STATE_FILE));
        let journal_path = env::var_os("MIGRATION_JOURNAL_PATH").map(PathBuf::from)
                                                                .unwrap_or_else(|| home.join(DEFAULT_JOURNAL_FILE));
        Self { state_path,
               journal_path }
    }
}

/// `$HOME`, o el directorio actual si no está definido.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
