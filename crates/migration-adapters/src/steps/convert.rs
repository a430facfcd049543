//! Pasos de conversión: ACeDB → dump `.ace` → logs EDN ordenados.

use std::fs;

use log::info;
use migration_core::{StepActionError, StepArgs, StepOutcome};

use super::{publish, run_pseudoace, staging_path};
use crate::command::{quote_path, LocalCommand};

/// Opciones por defecto del comando `Dump` de tace.
pub const TACE_DUMP_OPTIONS: &str = "-s -T -C";

/// La descarga de la release es externa; aquí sólo se comprueba que exista.
pub fn fetch_check(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let acedb_dir = args.path("acedb_dir")?;
    if !acedb_dir.is_dir() {
        return Err(StepActionError::new(format!("ACeDB database not found at {}; fetch the release first",
                                                acedb_dir.display())));
    }
    Ok(StepOutcome::Message(format!("ACeDB data present in {}", acedb_dir.display())))
}

/// `tace <acedb_dir>` con `Dump <opciones> <dir>` por stdin. Si el
/// directorio de dump ya existe, el paso no hace nada.
///
/// tace escribe en `<dump_dir>.partial`, que sólo se renombra a `dump_dir`
/// cuando tace termina bien.
pub fn acedb_dump(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let dump_dir = args.path("dump_dir")?;
    if dump_dir.is_dir() {
        info!("dump directory {} already exists, skipping tace dump", dump_dir.display());
        return Ok(StepOutcome::Message(format!("reusing existing dump in {}", dump_dir.display())));
    }
    let acedb_dir = args.path("acedb_dir")?;
    let options = args.opt_str("tace_dump_options")?.unwrap_or(TACE_DUMP_OPTIONS);
    let tace = args.opt_str("tace_cmd")?.unwrap_or("tace");
    let staging = staging_path(&dump_dir)?;
    fs::create_dir_all(&staging).map_err(|e| {
                                    StepActionError::new(format!("could not create {}: {e}", staging.display()))
                                })?;
    info!("dumping ACeDB files to {}", staging.display());
    LocalCommand::shell(format!("{tace} {}", quote_path(&acedb_dir))).input(format!("Dump {options} {}",
                                                                                    staging.display()))
                                                                     .run()?;
    publish(&staging, &dump_dir)?;
    Ok(StepOutcome::Message(format!("ACeDB dumped to {}", dump_dir.display())))
}

/// gzip en paralelo de todos los `.ace` del dump.
pub fn acedb_compress_dump(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let dump_dir = args.path("dump_dir")?;
    let cpus = args.u64("cpus")?.max(1);
    LocalCommand::shell(format!("find {} -type f -name \"*.ace\" | xargs --no-run-if-empty -n 1 -P {cpus} gzip",
                                quote_path(&dump_dir))).run()?;
    info!("compressed all .ace files in {}", dump_dir.display());
    Ok(StepOutcome::Nothing)
}

pub fn create_database(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let models = args.path("models_path")?;
    info!("creating datomic database {}", args.str("datomic_uri")?);
    run_pseudoace(args,
                  &["--models-filename".to_string(),
                    models.to_string_lossy().into_owned(),
                    "--verbose".to_string(),
                    "create-database".to_string()])?;
    Ok(StepOutcome::Message("Created".to_string()))
}

pub fn ace_to_edn(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let dump_dir = args.path("dump_dir")?;
    let logs_dir = args.path("edn_logs_dir")?;
    fs::create_dir_all(&logs_dir).map_err(|e| {
                                     StepActionError::new(format!("could not create {}: {e}", logs_dir.display()))
                                 })?;
    info!("converting ACeDB files to EDN logs");
    run_pseudoace(args,
                  &[format!("--acedump-dir={}", dump_dir.display()),
                    format!("--log-dir={}", logs_dir.display()),
                    "--verbose".to_string(),
                    "acedump-to-edn-logs".to_string()])?;
    Ok(StepOutcome::Message(logs_dir.display().to_string()))
}

/// Ordena cada log por timestamp con el script de pseudoace.
pub fn sort_edn_logs(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let logs_dir = args.path("edn_logs_dir")?;
    let script = args.path("sort_script")?;
    let cpus = args.u64("cpus")?.max(1);
    info!("sorting EDN logs");
    LocalCommand::shell(format!("find {} -type f -name \"*.edn.gz\" | xargs --no-run-if-empty -n 1 -P {cpus} {}",
                                quote_path(&logs_dir),
                                quote_path(&script))).run()?;
    info!("finished sorting EDN logs");
    Ok(StepOutcome::Nothing)
}
