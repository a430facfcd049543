//! Inicialización de `env_logger`.
//!
//! Nivel desde `--log-level`, sobreescribible con `RUST_LOG`. Con archivo
//! configurado los registros van ahí (append); los mensajes al operador
//! siguen saliendo por stdout.

use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Target};

use crate::errors::CliError;

pub fn init(level: &str, log_file: Option<&Path>) -> Result<(), CliError> {
    let mut builder = Builder::new();
    builder.parse_filters(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.try_init()
           .map_err(|e| CliError::Config(format!("logger already initialised: {e}")))
}
