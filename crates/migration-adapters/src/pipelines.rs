//! Fábricas de pipelines de migración.
//!
//! `convert` lleva de la base ACeDB a logs EDN ordenados; `import` carga
//! esos logs en Datomic, aplica los parches, genera el reporte QA, hace el
//! backup y construye y respalda la base de homología. `full` es la
//! concatenación de ambas y comparte el mismo marcador de reanudación.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use migration_core::{Operator, Pipeline, Step, StepArgs};

use crate::context::{
    MigrationContext, ACEDB_DATABASE_DIR, ACEDB_DUMP_DIR, ACEDB_ID_CATALOG_DIR, BACKUP_DIR, DATOMIC_DIR, EDN_LOGS_DIR,
    HOMOL_EDN_LOGS_DIR,
};
use crate::steps::{self, pseudoace_args, BackupGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Full,
    Convert,
    Import,
}

impl PipelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineKind::Full => "full",
            PipelineKind::Convert => "convert",
            PipelineKind::Import => "import",
        }
    }

    /// Construye la pipeline. `gate` habilita la confirmación previa al backup.
    pub fn build(self, ctx: &MigrationContext, gate: Option<Arc<dyn Operator>>) -> Pipeline {
        match self {
            PipelineKind::Full => full_pipeline(ctx, gate),
            PipelineKind::Convert => convert_pipeline(ctx),
            PipelineKind::Import => import_pipeline(ctx, gate),
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(PipelineKind::Full),
            "convert" => Ok(PipelineKind::Convert),
            "import" => Ok(PipelineKind::Import),
            other => Err(format!("unknown pipeline '{other}' (expected full, convert or import)")),
        }
    }
}

pub fn migration_title(release: &str) -> String {
    format!("Migrating ACeDB {release} to Datomic")
}

fn path_arg(ctx: &MigrationContext, name: &str) -> String {
    ctx.path(name).to_string_lossy().into_owned()
}

pub fn convert_pipeline(ctx: &MigrationContext) -> Pipeline {
    let acedb_dir = path_arg(ctx, ACEDB_DATABASE_DIR);
    let dump_dir = path_arg(ctx, ACEDB_DUMP_DIR);
    let logs_dir = path_arg(ctx, EDN_LOGS_DIR);
    let models = ctx.path(ACEDB_DATABASE_DIR).join("wspec").join("models.wrm");
    let sort_script = ctx.pseudoace_dir().join("sort-edn-log.sh");

    let steps = vec![Step::new("Fetch ACeDB data for release",
                               steps::fetch_check,
                               StepArgs::new().with("acedb_dir", acedb_dir.as_str())),
                     Step::new("Dumping all ACeDB files",
                               steps::acedb_dump,
                               StepArgs::new().with("acedb_dir", acedb_dir.as_str())
                                              .with("dump_dir", dump_dir.as_str())
                                              .with("tace_dump_options", steps::convert::TACE_DUMP_OPTIONS)),
                     Step::new("Compressing all ACeDB files",
                               steps::acedb_compress_dump,
                               StepArgs::new().with("dump_dir", dump_dir.as_str()).with("cpus", ctx.cpus)),
                     Step::new("Creating Datomic database",
                               steps::create_database,
                               pseudoace_args(ctx).with("models_path", models.to_string_lossy().into_owned())),
                     Step::new("Converting ACeDB files to EDN logs",
                               steps::ace_to_edn,
                               pseudoace_args(ctx).with("dump_dir", dump_dir.as_str())
                                                  .with("edn_logs_dir", logs_dir.as_str())),
                     Step::new("Sorting EDN logs by timestamp",
                               steps::sort_edn_logs,
                               StepArgs::new().with("edn_logs_dir", logs_dir.as_str())
                                              .with("sort_script", sort_script.to_string_lossy().into_owned())
                                              .with("cpus", ctx.cpus))];
    Pipeline::new(PipelineKind::Convert.as_str(), migration_title(&ctx.release), steps)
        .with_completion_headline(format!("{} migration", ctx.release))
}

pub fn import_pipeline(ctx: &MigrationContext, gate: Option<Arc<dyn Operator>>) -> Pipeline {
    let logs_dir = path_arg(ctx, EDN_LOGS_DIR);
    let class_report = ctx.path(ACEDB_ID_CATALOG_DIR)
                          .join(format!("all_classes_report.{}.txt", ctx.release));
    let report_path = ctx.base_path.join(format!("{}-report.csv", ctx.release));
    let report_path = report_path.to_string_lossy().into_owned();
    let homol_uri = ctx.homol_datomic_uri();
    let backup_args = StepArgs::new().with("datomic_dir", path_arg(ctx, DATOMIC_DIR))
                                     .with("backup_root", path_arg(ctx, BACKUP_DIR))
                                     .with("release", ctx.release.as_str());

    let mut steps = vec![Step::new("Import EDN logs into Datomic database",
                                   steps::import_logs,
                                   pseudoace_args(ctx).with("edn_logs_dir", logs_dir.as_str())),
                         Step::new("Apply ACe patches from the PATCHES directory",
                                   steps::apply_patches,
                                   pseudoace_args(ctx)),
                         Step::new("Running QA report on Datomic database",
                                   steps::qa_report,
                                   pseudoace_args(ctx).with("class_report", class_report.to_string_lossy().into_owned())
                                                      .with("report_path", report_path.as_str())
                                                      .with("release", ctx.release.as_str()))];
    if let Some(operator) = gate {
        steps.push(Step::new("Confirm QA report before backup",
                             BackupGate::new(operator),
                             StepArgs::new().with("report_path", report_path.as_str())));
    }
    steps.push(Step::new("Backup main migration database",
                         steps::backup_db,
                         backup_args.clone().with("datomic_uri", ctx.datomic_uri.as_str())));
    steps.push(Step::new("Create the homology database",
                         steps::homol_import,
                         pseudoace_args(ctx).with("datomic_uri", homol_uri.as_str())
                                            .with("dump_dir", path_arg(ctx, ACEDB_DUMP_DIR))
                                            .with("homol_logs_dir", path_arg(ctx, HOMOL_EDN_LOGS_DIR))));
    steps.push(Step::new("Backup the homology database",
                         steps::backup_db,
                         backup_args.with("datomic_uri", homol_uri.as_str()).with("db_name_suffix", "homol")));
    Pipeline::new(PipelineKind::Import.as_str(), migration_title(&ctx.release), steps)
        .with_completion_headline(format!("{} migration", ctx.release))
}

pub fn full_pipeline(ctx: &MigrationContext, gate: Option<Arc<dyn Operator>>) -> Pipeline {
    Pipeline::concat(PipelineKind::Full.as_str(), convert_pipeline(ctx), import_pipeline(ctx, gate))
}
