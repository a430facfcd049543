//! Tipos de evento de una ejecución y estructura `PipelineEvent`.
//!
//! Los eventos son sólo observabilidad: el marcador del `StateStore` sigue
//! siendo la única fuente de verdad para reanudar.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEventKind {
    /// Inicio de una invocación del driver.
    RunStarted {
        pipeline: String,
        definition_hash: String,
        resume_from: usize,
        step_count: usize,
    },
    /// Un paso comenzó. No implica éxito.
    StepStarted { step_n: usize, description: String },
    /// La acción terminó bien y el marcador quedó en `marker`.
    StepFinished { step_n: usize, marker: usize },
    /// La acción falló; el marcador no se movió.
    StepFailed { step_n: usize, error: String },
    /// Todos los pasos restantes terminaron.
    RunCompleted { pipeline: String },
    /// El operador rebobinó el marcador.
    MarkerReset { from: usize, to: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub seq: u64,
    pub run_id: Uuid,
    pub kind: PipelineEventKind,
    pub ts: DateTime<Utc>,
}
