//! Pasos de importación: logs EDN → Datomic, reporte QA y backup.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use log::info;
use migration_core::{Attachment, Operator, StepAction, StepActionError, StepArgs, StepOutcome};

use super::{publish, run_pseudoace, staging_path};
use crate::command::{quote, quote_path, LocalCommand};

pub const QA_PRETEXT: &str = "*Please check this looks correct before backing-up the datomic database*";

pub fn import_logs(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let logs_dir = args.path("edn_logs_dir")?;
    run_pseudoace(args,
                  &[format!("--log-dir={}", logs_dir.display()),
                    "--verbose".to_string(),
                    "import-logs".to_string()])?;
    Ok(StepOutcome::Nothing)
}

/// Reporte QA contra el catálogo de ids de ACeDB. El adjunto devuelto viaja
/// en la notificación de paso completado.
pub fn qa_report(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let class_report = args.path("class_report")?;
    let report_path = args.path("report_path")?;
    let release = args.str("release")?;
    run_pseudoace(args,
                  &[format!("--acedb-class-report={}", class_report.display()),
                    format!("--report-filename={}", report_path.display()),
                    "generate-report".to_string()])?;
    let title = format!("QA report for {release} available in <{}>", report_path.display());
    Ok(StepOutcome::Report(Attachment::new(title).with_pretext(QA_PRETEXT)))
}

/// Parches ACe de la release: pseudoace los convierte a EDN y los transacciona.
pub fn apply_patches(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    info!("applying ACe patches to {}", args.str("datomic_uri")?);
    run_pseudoace(args, &["--verbose".to_string(), "apply-patches".to_string()])?;
    Ok(StepOutcome::Nothing)
}

/// Base de homología, separada de la principal, construida desde el mismo dump.
pub fn homol_import(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let dump_dir = args.path("dump_dir")?;
    let logs_dir = args.path("homol_logs_dir")?;
    fs::create_dir_all(&logs_dir).map_err(|e| {
                                     StepActionError::new(format!("could not create {}: {e}", logs_dir.display()))
                                 })?;
    info!("creating homology database {}", args.str("datomic_uri")?);
    run_pseudoace(args,
                  &[format!("--acedump-dir={}", dump_dir.display()),
                    format!("--log-dir={}", logs_dir.display()),
                    "--verbose".to_string(),
                    "homol-import".to_string()])?;
    Ok(StepOutcome::Message(format!("homology database created from {}", dump_dir.display())))
}

/// Backup local de la base Datomic y archivo `.tar.xz` para subirlo.
///
/// La base se llama como la release, o `<release>-<db_name_suffix>`. Cada
/// fase escribe primero en una ruta `.partial` y la publica al terminar bien,
/// así que re-ejecutar el paso tras un fallo sólo rehace lo que falta.
pub fn backup_db(args: &StepArgs) -> Result<StepOutcome, StepActionError> {
    let datomic_dir = args.path("datomic_dir")?;
    let backup_root = args.path("backup_root")?;
    let release = args.str("release")?;
    let uri = args.str("datomic_uri")?;
    let db_name = match args.opt_str("db_name_suffix")? {
        Some(suffix) => format!("{release}-{suffix}"),
        None => release.to_string(),
    };
    let date_stamp = match args.opt_str("date_stamp")? {
        Some(d) => d.to_string(),
        None => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };
    let dated_dir = backup_root.join(&date_stamp);
    let local_backup = dated_dir.join(&db_name);
    let archive = dated_dir.join(format!("{db_name}.tar.xz"));

    if !local_backup.is_dir() {
        fs::create_dir_all(&dated_dir).map_err(|e| {
                                          StepActionError::new(format!("could not create {}: {e}",
                                                                       dated_dir.display()))
                                      })?;
        let staging = staging_path(&local_backup)?;
        info!("backing up database {uri} to {}", staging.display());
        LocalCommand::shell(format!("bin/datomic backup-db {} {}",
                                    quote(uri),
                                    quote(&format!("file:{}", staging.display())))).current_dir(&datomic_dir)
                                                                                   .run()?;
        publish(&staging, &local_backup)?;
        info!("database backup complete");
    }
    if !archive.is_file() {
        info!("creating archive {} for upload", archive.display());
        let staging = staging_path(&archive)?;
        archive_dir(&local_backup, &staging)?;
        publish(&staging, &archive)?;
    }
    Ok(StepOutcome::Message(format!("Datomic database compressed to {}.", archive.display())))
}

/// Pausa antes del backup: el operador confirma que el reporte QA es correcto.
pub struct BackupGate {
    operator: Arc<dyn Operator>,
}

impl BackupGate {
    pub fn new(operator: Arc<dyn Operator>) -> Self {
        Self { operator }
    }
}

impl StepAction for BackupGate {
    fn run(&self, args: &StepArgs) -> Result<StepOutcome, StepActionError> {
        if let Some(report) = args.opt_str("report_path")? {
            self.operator.say(&format!("QA report: {report}"));
        }
        self.operator.say("Please check the QA report looks correct.");
        let approved = self.operator
                           .confirm("Back up the Datomic database now?")
                           .map_err(|e| StepActionError::new(format!("could not read operator answer: {e}")))?;
        if approved {
            Ok(StepOutcome::Message("backup approved by operator".to_string()))
        } else {
            Err(StepActionError::new("backup declined by operator"))
        }
    }
}
