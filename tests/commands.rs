use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use migration_adapters::PipelineKind;
use migration_core::state::{read_marker, write_marker};
use migration_core::{ConsoleOperator, EventStore, Operator, PipelineError, PipelineEventKind};
use migration_persistence::{FileStateStore, JsonlEventStore};
use tempfile::tempdir;
use wb_migration::{commands, CliError, MigrationConfig, PipelineSelection};

fn config(root: &Path) -> MigrationConfig {
    MigrationConfig { base_path: root.join("wormbase"),
                      state_path: root.join(".db-migration.json"),
                      journal_path: root.join(".db-migration.events.jsonl"),
                      release: Some("WS260".into()),
                      datomic_uri: None,
                      slack_webhook_url: None,
                      slack_channel: None,
                      log_file: root.join("wormbase/logs/migration.log"),
                      pseudoace_version: "0.5.7".into(),
                      java_cmd: "java -server".into() }
}

fn operator(input: &str) -> Arc<dyn Operator> {
    Arc::new(ConsoleOperator::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()))
}

const CONVERT: PipelineSelection = PipelineSelection { kind: PipelineKind::Convert,
                                                       gate: false };

#[test]
fn run_without_release_data_fails_first_step_with_exit_code_one() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    fs::create_dir_all(cfg.log_file.parent().unwrap()).unwrap();
    fs::write(&cfg.log_file, "log line\n").unwrap();

    let err = commands::run(&cfg, CONVERT, operator("")).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(matches!(err, CliError::Pipeline(PipelineError::StepFailed { step_n: 1, .. })));

    let state = FileStateStore::open(&cfg.state_path).unwrap();
    assert_eq!(read_marker(&state).unwrap(), 0);

    let archived: Vec<_> = fs::read_dir(cfg.archive_dir()).unwrap().collect();
    assert_eq!(archived.len(), 1, "one run directory with the failed step log");
}

#[test]
fn status_lists_done_and_pending_steps() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    {
        let mut state = FileStateStore::open(&cfg.state_path).unwrap();
        write_marker(&mut state, 2).unwrap();
    }
    let mut out = Vec::new();
    commands::status(&cfg, CONVERT, operator(""), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Migrating ACeDB WS260 to Datomic [convert] (6 steps)"));
    assert!(text.contains("Last successful step: 2"));
    assert!(text.contains("[x]  2. Dumping all ACeDB files"));
    assert!(text.contains("[ ]  3. Compressing all ACeDB files  <- next"));
}

#[test]
fn status_before_any_run() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    let mut out = Vec::new();
    commands::status(&cfg, CONVERT, operator(""), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Migration has not been run yet."));
    assert!(text.contains("[ ]  1. Fetch ACeDB data for release  <- next"));
}

#[test]
fn reset_rewinds_file_marker_and_journals_it() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    {
        let mut state = FileStateStore::open(&cfg.state_path).unwrap();
        write_marker(&mut state, 4).unwrap();
    }
    let target = commands::reset(&cfg, CONVERT, operator("2\ny\n")).unwrap();
    assert_eq!(target, 2);
    assert_eq!(read_marker(&FileStateStore::open(&cfg.state_path).unwrap()).unwrap(), 2);

    let journal = JsonlEventStore::open(&cfg.journal_path).unwrap();
    let runs = journal.run_ids();
    assert_eq!(runs.len(), 1);
    let events = journal.list(runs[0]);
    assert_eq!(events[0].kind, PipelineEventKind::MarkerReset { from: 4, to: 2 });
}

#[test]
fn reset_without_history_exits_with_code_four() {
    let dir = tempdir().unwrap();
    let err = commands::reset(&config(dir.path()), CONVERT, operator("")).unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn clean_requires_confirmation_unless_forced() {
    let dir = tempdir().unwrap();
    let cfg = config(dir.path());
    fs::create_dir_all(cfg.base_path.join("edn-logs")).unwrap();
    fs::write(&cfg.state_path, "{}").unwrap();

    assert!(!commands::clean(&cfg, false, operator("n\n").as_ref()).unwrap());
    assert!(cfg.state_path.exists());

    assert!(commands::clean(&cfg, true, operator("").as_ref()).unwrap());
    assert!(!cfg.state_path.exists());
    assert!(!cfg.base_path.join("edn-logs").exists());
}
