//! Acciones de los pasos de migración.
//!
//! Cada acción es una función `fn(&StepArgs) -> Result<StepOutcome, StepActionError>`;
//! todo lo que necesita (rutas, URI de Datomic, comando java) viaja en los
//! argumentos del `Step`, así que una acción no lee estado global.

pub mod convert;
pub mod import;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use migration_core::{StepActionError, StepArgs};

use crate::command::{quote, LocalCommand};
use crate::context::MigrationContext;

pub use convert::{ace_to_edn, acedb_compress_dump, acedb_dump, create_database, fetch_check, sort_edn_logs};
pub use import::{apply_patches, backup_db, homol_import, import_logs, qa_report, BackupGate};

/// Argumentos comunes a todos los pasos que invocan pseudoace.
pub fn pseudoace_args(ctx: &MigrationContext) -> StepArgs {
    StepArgs::new().with("java_cmd", ctx.java_cmd.as_str())
                   .with("pseudoace_jar", ctx.pseudoace_jar().to_string_lossy().into_owned())
                   .with("datomic_uri", ctx.datomic_uri.as_str())
}

/// Línea de comando pseudoace: `<java> -jar <jar> --url=<uri> <extra...>`.
pub fn pseudoace_command(args: &StepArgs, extra: &[String]) -> Result<String, StepActionError> {
    let mut parts = vec![args.str("java_cmd")?.to_string(),
                         "-jar".to_string(),
                         quote(args.str("pseudoace_jar")?),
                         quote(&format!("--url={}", args.str("datomic_uri")?))];
    parts.extend(extra.iter().map(|a| quote(a)));
    Ok(parts.join(" "))
}

pub(crate) fn run_pseudoace(args: &StepArgs, extra: &[String]) -> Result<String, StepActionError> {
    let cmd = pseudoace_command(args, extra)?;
    LocalCommand::shell(cmd).run()
}

/// Ruta `<target>.partial` donde se escribe antes de publicar el resultado.
/// Un resto de una ejecución anterior se borra.
pub(crate) fn staging_path(target: &Path) -> Result<PathBuf, StepActionError> {
    let mut name = target.file_name()
                         .ok_or_else(|| StepActionError::new(format!("{} has no file name", target.display())))?
                         .to_os_string();
    name.push(".partial");
    let staging = target.with_file_name(name);
    let cleanup = if staging.is_dir() {
        fs::remove_dir_all(&staging)
    } else if staging.exists() {
        fs::remove_file(&staging)
    } else {
        return Ok(staging);
    };
    info!("removing leftover {}", staging.display());
    cleanup.map_err(|e| StepActionError::new(format!("could not remove {}: {e}", staging.display())))?;
    Ok(staging)
}

/// Publica `staging` como `target`. Sólo se llama cuando el comando terminó bien.
pub(crate) fn publish(staging: &Path, target: &Path) -> Result<(), StepActionError> {
    fs::rename(staging, target).map_err(|e| {
                                   StepActionError::new(format!("could not move {} to {}: {e}",
                                                                staging.display(),
                                                                target.display()))
                               })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudoace_command_line() {
        let ctx = MigrationContext::new("/data/wb", "WS260");
        let args = pseudoace_args(&ctx);
        let cmd = pseudoace_command(&args, &["--verbose".into(), "create-database".into()]).unwrap();
        assert_eq!(cmd,
                   "java -server -jar /data/wb/pseudoace/pseudoace-0.5.7.jar \
                    --url=datomic:free://localhost:4334/WS260 --verbose create-database");
    }

    #[test]
    fn staging_path_clears_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("acedb-dump");
        let leftover = dir.path().join("acedb-dump.partial");
        fs::create_dir(&leftover).unwrap();
        fs::write(leftover.join("half.ace"), "").unwrap();

        let staging = staging_path(&target).unwrap();
        assert_eq!(staging, leftover);
        assert!(!staging.exists());

        fs::write(&staging, "archive bytes").unwrap();
        assert!(!staging_path(&target).unwrap().exists());
    }

    #[test]
    fn missing_argument_is_an_action_error() {
        let err = pseudoace_command(&StepArgs::new(), &[]).unwrap_err();
        assert!(err.message.contains("java_cmd"));
    }
}
