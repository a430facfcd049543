//! Constantes del motor.
//!
//! Las claves del store son parte del formato en disco: cambiarlas deja
//! huérfano el progreso de migraciones ya iniciadas.

/// Clave del marcador de reanudación: índice (1-based) del último paso cuya
/// acción terminó sin error. Ausente o `0` significa "nunca se completó nada".
pub const LAST_STEP_OK_STATE_KEY: &str = "last-step-ok-idx";

/// Clave bajo la cual se guarda el hash de la definición de la pipeline que
/// produjo el marcador actual.
pub const PIPELINE_DEFINITION_KEY: &str = "pipeline-definition-hash";

/// Versión lógica del motor. Forma parte del hash de definición.
pub const ENGINE_VERSION: &str = "M1.0";
