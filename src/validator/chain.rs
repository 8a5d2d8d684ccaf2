//! Ordered transform chains.

use serde_json::Value;

use crate::error::ErrorNode;

type Step = Box<dyn Fn(Value, Option<&str>) -> Result<Value, ErrorNode> + Send + Sync>;

/// An ordered list of transform/check steps over a single value.
///
/// Each step receives the output of the previous one plus the validator's
/// display name (bound late, so a name set after steps were added still
/// applies) and either transforms the value or fails. The first failure
/// stops the chain.
#[derive(Default)]
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step to the chain.
    pub fn add<F>(&mut self, step: F)
    where
        F: Fn(Value, Option<&str>) -> Result<Value, ErrorNode> + Send + Sync + 'static,
    {
        self.steps.push(Box::new(step));
    }

    /// Runs every step in order, short-circuiting on the first failure.
    pub fn run(&self, mut value: Value, name: Option<&str>) -> Result<Value, ErrorNode> {
        for step in &self.steps {
            value = step(value, name)?;
        }
        Ok(value)
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain").field("steps", &self.steps.len()).finish()
    }
}
