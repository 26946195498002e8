mod policy;

pub use policy::{StrengthBand, credential_policy, strength_score};

use crate::error::ConfigError;
use std::fmt;

/// One named policy requirement over a credential string.
///
/// The predicate is a pure function; rules are immutable once registered and
/// the set of rules is fixed configuration, not runtime-mutable state.
pub struct Rule {
    name: String,
    description: String,
    predicate: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_satisfied_by(&self, input: &str) -> bool {
        (self.predicate)(input)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Outcome of one rule against one input. Ephemeral: recomputed on every
/// change, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEvaluation {
    pub name: String,
    pub satisfied: bool,
}

/// Result of evaluating a full rule set, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub evaluations: Vec<RuleEvaluation>,
    pub all_satisfied: bool,
}

impl ValidationResult {
    /// Evaluations that did not pass, in registration order.
    pub fn failing(&self) -> impl Iterator<Item = &RuleEvaluation> {
        self.evaluations.iter().filter(|e| !e.satisfied)
    }
}

/// An ordered collection of uniquely named rules.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule. Names must be unique within the set; a duplicate is a
    /// configuration failure, not a silent replacement.
    pub fn register(&mut self, rule: Rule) -> Result<(), ConfigError> {
        if self.rules.iter().any(|r| r.name == rule.name) {
            return Err(ConfigError::DuplicateRule(rule.name));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Apply every registered rule to `input`.
    ///
    /// Never short-circuits: each rule runs even after a failure so the UI
    /// can show per-rule status rather than only the first miss. An empty
    /// input is evaluated like any other; it never panics.
    pub fn evaluate(&self, input: &str) -> ValidationResult {
        let evaluations: Vec<RuleEvaluation> = self
            .rules
            .iter()
            .map(|rule| RuleEvaluation {
                name: rule.name.clone(),
                satisfied: rule.is_satisfied_by(input),
            })
            .collect();
        let all_satisfied = evaluations.iter().all(|e| e.satisfied);
        ValidationResult {
            evaluations,
            all_satisfied,
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
