use std::fs;
use std::sync::Arc;

use migration_adapters::{convert_pipeline, full_pipeline, import_pipeline, MigrationContext, PipelineKind};
use migration_core::{
    ConsoleOperator, EngineBuilder, InMemoryNotifier, InMemoryStateStore, Operator, PipelineError, StateStore,
};
use std::io::Cursor;
use tempfile::tempdir;

fn ctx() -> MigrationContext {
    MigrationContext::new("/data/wormbase", "WS260")
}

fn operator(answer: &str) -> Arc<dyn Operator> {
    Arc::new(ConsoleOperator::new(Cursor::new(answer.as_bytes().to_vec()), Vec::new()))
}

#[test]
fn step_counts_and_order() {
    let convert = convert_pipeline(&ctx());
    assert_eq!(convert.len(), 6);
    assert_eq!(convert.step(1).unwrap().description, "Fetch ACeDB data for release");
    assert_eq!(convert.step(6).unwrap().description, "Sorting EDN logs by timestamp");

    let import = import_pipeline(&ctx(), None);
    assert_eq!(import.len(), 6);
    assert_eq!(import.step(2).unwrap().description, "Apply ACe patches from the PATCHES directory");
    assert_eq!(import.step(4).unwrap().description, "Backup main migration database");
    assert_eq!(import.step(5).unwrap().description, "Create the homology database");
    assert_eq!(import.step(6).unwrap().description, "Backup the homology database");
    let gated = import_pipeline(&ctx(), Some(operator("")));
    assert_eq!(gated.len(), 7);
    assert_eq!(gated.step(4).unwrap().description, "Confirm QA report before backup");
    assert_eq!(gated.step(5).unwrap().description, "Backup main migration database");

    let full = full_pipeline(&ctx(), Some(operator("")));
    assert_eq!(full.len(), 13);
    assert_eq!(full.name, "full");
    assert_eq!(full.step(7).unwrap().description, "Import EDN logs into Datomic database");
    assert_eq!(full.headline(7), "Migrating ACeDB WS260 to Datomic, *Step 7*");
    assert_eq!(full.completion_headline(), "WS260 migration");
}

#[test]
fn arguments_are_bound_from_context() {
    let convert = convert_pipeline(&ctx());
    let dump = convert.step(2).unwrap();
    assert_eq!(dump.arguments.str("dump_dir").unwrap(), "/data/wormbase/acedb-dump");
    assert_eq!(dump.arguments.str("tace_dump_options").unwrap(), "-s -T -C");

    let create = convert.step(4).unwrap();
    assert_eq!(create.arguments.str("datomic_uri").unwrap(), "datomic:free://localhost:4334/WS260");
    assert_eq!(create.arguments.str("models_path").unwrap(),
               "/data/wormbase/acedb_database/wspec/models.wrm");

    let import = import_pipeline(&ctx(), None);
    let qa = import.step(3).unwrap();
    assert_eq!(qa.arguments.str("class_report").unwrap(),
               "/data/wormbase/acedb_id_catalog/all_classes_report.WS260.txt");
    assert_eq!(qa.arguments.str("report_path").unwrap(), "/data/wormbase/WS260-report.csv");

    let main_backup = import.step(4).unwrap();
    assert_eq!(main_backup.arguments.str("datomic_uri").unwrap(), "datomic:free://localhost:4334/WS260");
    assert!(main_backup.arguments.get("db_name_suffix").is_none());

    let homol = import.step(5).unwrap();
    assert_eq!(homol.arguments.str("datomic_uri").unwrap(), "datomic:free://localhost:4334/WS260-homol");
    assert_eq!(homol.arguments.str("dump_dir").unwrap(), "/data/wormbase/acedb-dump");
    assert_eq!(homol.arguments.str("homol_logs_dir").unwrap(), "/data/wormbase/homol-edn-logs");

    let homol_backup = import.step(6).unwrap();
    assert_eq!(homol_backup.arguments.str("datomic_uri").unwrap(),
               "datomic:free://localhost:4334/WS260-homol");
    assert_eq!(homol_backup.arguments.str("db_name_suffix").unwrap(), "homol");
}

#[test]
fn definition_hash_depends_on_gate() {
    let gated = PipelineKind::Full.build(&ctx(), Some(operator("")));
    let ungated = PipelineKind::Full.build(&ctx(), None);
    assert_ne!(gated.definition_hash(), ungated.definition_hash());
    assert_eq!(ungated.definition_hash(), PipelineKind::Full.build(&ctx(), None).definition_hash());
}

#[test]
fn missing_acedb_database_fails_first_step_and_keeps_marker() {
    let dir = tempdir().unwrap();
    let ctx = MigrationContext::new(dir.path(), "WS260");
    let pipeline = convert_pipeline(&ctx);
    let notifier = InMemoryNotifier::new();
    let mut engine = EngineBuilder::new(InMemoryStateStore::new()).notifier(notifier.clone()).build();

    let err = engine.run(&pipeline).unwrap_err();
    assert!(matches!(err, PipelineError::StepFailed { step_n: 1, .. }));
    assert!(err.step_error().unwrap().message.contains("ACeDB database not found"));
    assert_eq!(engine.marker().unwrap(), 0);
    drop(engine);
    assert_eq!(notifier.headlines().len(), 2);
}

#[test]
fn dump_step_is_skipped_when_resuming_with_existing_dump() {
    let dir = tempdir().unwrap();
    let ctx = MigrationContext::new(dir.path(), "WS260");
    fs::create_dir_all(ctx.path("acedb_database")).unwrap();
    fs::create_dir_all(ctx.path("acedb-dump")).unwrap();
    fs::write(ctx.path("acedb-dump").join("genes.ace"), "Gene : \"WBGene1\"\n").unwrap();

    let pipeline = convert_pipeline(&ctx);
    let mut state = InMemoryStateStore::new();
    {
        let mut engine = EngineBuilder::new(&mut state).build();
        // 1: fetch check, 2: dump reusado, 3: gzip. El 4 necesita java y falla.
        let err = engine.run(&pipeline).unwrap_err();
        assert!(matches!(err, PipelineError::StepFailed { step_n: 4, .. }));
        assert_eq!(engine.marker().unwrap(), 3);
    }
    assert!(ctx.path("acedb-dump").join("genes.ace.gz").exists());
    assert_eq!(state.get("last-step-ok-idx").unwrap(), Some(serde_json::json!(3)));
}
