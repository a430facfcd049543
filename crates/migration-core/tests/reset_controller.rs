mod common;

use std::io::Cursor;

use common::{executed, traced_pipeline, Trace};
use migration_core::state::{read_marker, write_marker};
use migration_core::{available_reset_steps, ConsoleOperator, EventStore, InMemoryEventStore, InMemoryStateStore,
                     MigrationEngine, PipelineError, PipelineEventKind, ResetController};

fn console(input: &str) -> ConsoleOperator<Cursor<Vec<u8>>, Vec<u8>> {
    ConsoleOperator::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn store_at(marker: usize) -> InMemoryStateStore {
    let mut store = InMemoryStateStore::new();
    if marker > 0 {
        write_marker(&mut store, marker).unwrap();
    }
    store
}

#[test]
fn reset_without_history_fails_and_writes_nothing() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let mut store = store_at(0);
    let op = console("1\ny\n");
    let err = ResetController::new(&mut store, &op).reset(&pipeline).unwrap_err();
    assert!(matches!(err, PipelineError::NoPriorRun));
    assert!(store.writes.is_empty());
    let (_, out) = op.into_inner();
    assert!(String::from_utf8(out).unwrap().contains("Migration has not been run"));
}

#[test]
fn reset_to_earlier_step_then_run_replays_suffix() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let mut store = store_at(4);
    let op = console("2\ny\n");
    let new_marker = ResetController::new(&mut store, &op).reset(&pipeline).unwrap();
    assert_eq!(new_marker, 2);
    assert_eq!(read_marker(&store).unwrap(), 2);

    let (_, out) = op.into_inner();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Step 1: step 1"));
    assert!(out.contains("Step 3: step 3"));
    assert!(!out.contains("Step 4: step 4"));
    assert!(out.contains("the next run starts at step 3"));

    let trace = Trace::default();
    let mut engine = MigrationEngine::builder(store).build();
    engine.run(&traced_pipeline(5, None, &trace)).unwrap();
    assert_eq!(executed(&trace), vec![3, 4, 5]);
}

#[test]
fn future_target_is_rejected() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let mut store = store_at(4);
    let op = console("5\ny\n");
    let err = ResetController::new(&mut store, &op).reset(&pipeline).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidResetTarget { requested: 5, marker: 4 }));
    assert_eq!(read_marker(&store).unwrap(), 4);
    assert_eq!(store.writes.len(), 1);
}

#[test]
fn declined_confirmation_leaves_marker() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let mut store = store_at(4);
    let op = console("1\nn\n");
    let err = ResetController::new(&mut store, &op).reset(&pipeline).unwrap_err();
    assert!(matches!(err, PipelineError::ResetDeclined));
    assert_eq!(read_marker(&store).unwrap(), 4);
}

#[test]
fn default_target_redoes_last_completed_step() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let mut store = store_at(4);
    let op = console("\ny\n");
    assert_eq!(ResetController::new(&mut store, &op).reset(&pipeline).unwrap(), 3);
}

#[test]
fn target_equal_to_marker_is_allowed_with_confirmation() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let mut store = store_at(4);
    let op = console("4\nyes\n");
    assert_eq!(ResetController::new(&mut store, &op).reset(&pipeline).unwrap(), 4);
}

#[test]
fn offered_steps_are_strictly_before_marker() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let offered: Vec<usize> = available_reset_steps(&pipeline, 4).into_iter().map(|(n, _)| n).collect();
    assert_eq!(offered, vec![1, 2, 3]);
    assert!(available_reset_steps(&pipeline, 1).is_empty());
    assert_eq!(available_reset_steps(&pipeline, 40).len(), 5);
}

#[test]
fn applied_reset_is_journaled() {
    let pipeline = traced_pipeline(5, None, &Trace::default());
    let mut store = store_at(3);
    let mut journal = InMemoryEventStore::default();
    let run_id = uuid::Uuid::new_v4();
    let op = console("0\ny\n");
    ResetController::new(&mut store, &op).with_journal(&mut journal, run_id)
                                         .reset(&pipeline)
                                         .unwrap();
    let events = journal.list(run_id);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, PipelineEventKind::MarkerReset { from: 3, to: 0 });
}
