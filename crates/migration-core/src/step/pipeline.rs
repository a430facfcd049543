use serde_json::json;

use super::Step;
use crate::constants::ENGINE_VERSION;
use crate::hashing::hash_value;

/// Secuencia finita y ordenada de pasos, indexada desde 1.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Nombre corto de la variante (`convert`, `import`, `full`).
    pub name: String,
    /// Titular usado en las notificaciones, p.ej. `Migrating ACeDB WS260 to Datomic`.
    pub title: String,
    /// Titular de la notificación de fin; por defecto `title`.
    pub completion_headline: Option<String>,
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self { name: name.into(),
               title: title.into(),
               completion_headline: None,
               steps }
    }

    pub fn with_completion_headline(mut self, headline: impl Into<String>) -> Self {
        self.completion_headline = Some(headline.into());
        self
    }

    /// Concatena dos variantes (p.ej. `convert` ++ `import`).
    pub fn concat(name: impl Into<String>, first: Pipeline, second: Pipeline) -> Self {
        let mut steps = first.steps;
        steps.extend(second.steps);
        Self { name: name.into(),
               title: first.title,
               completion_headline: first.completion_headline.or(second.completion_headline),
               steps }
    }

    pub fn completion_headline(&self) -> &str {
        self.completion_headline.as_deref().unwrap_or(&self.title)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Paso número `step_n` (1-based).
    pub fn step(&self, step_n: usize) -> Option<&Step> {
        step_n.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Titular de la notificación para el paso `step_n`.
    pub fn headline(&self, step_n: usize) -> String {
        format!("{}, *Step {}*", self.title, step_n)
    }

    /// Hash de la definición: versión del motor, nombre y descripciones en orden.
    pub fn definition_hash(&self) -> String {
        let descriptions: Vec<&str> = self.steps.iter().map(|s| s.description.as_str()).collect();
        hash_value(&json!({
            "engine_version": ENGINE_VERSION,
            "pipeline": self.name,
            "steps": descriptions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{StepArgs, StepOutcome};

    fn noop(desc: &str) -> Step {
        Step::new(desc, |_: &StepArgs| Ok(StepOutcome::Nothing), StepArgs::new())
    }

    #[test]
    fn steps_are_one_based() {
        let p = Pipeline::new("convert", "Migrating ACeDB WS260 to Datomic", vec![noop("a"), noop("b")]);
        assert!(p.step(0).is_none());
        assert_eq!(p.step(1).unwrap().description, "a");
        assert_eq!(p.step(2).unwrap().description, "b");
        assert!(p.step(3).is_none());
        assert_eq!(p.headline(2), "Migrating ACeDB WS260 to Datomic, *Step 2*");
    }

    #[test]
    fn concat_keeps_order_and_changes_hash() {
        let convert = Pipeline::new("convert", "t", vec![noop("dump"), noop("convert")]);
        let import = Pipeline::new("import", "t", vec![noop("import")]);
        let full = Pipeline::concat("full", convert.clone(), import);
        let names: Vec<&str> = full.steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(names, ["dump", "convert", "import"]);
        assert_ne!(full.definition_hash(), convert.definition_hash());
        assert_eq!(convert.definition_hash(), convert.clone().definition_hash());
    }

    #[test]
    fn completion_headline_defaults_to_title() {
        let convert = Pipeline::new("convert", "t", vec![]).with_completion_headline("WS260 migration");
        assert_eq!(Pipeline::new("import", "t", vec![]).completion_headline(), "t");
        let full = Pipeline::concat("full", convert, Pipeline::new("import", "t", vec![]));
        assert_eq!(full.completion_headline(), "WS260 migration");
    }
}
