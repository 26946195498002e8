use super::{Field, FormSurface, Mark, Tone};
use crate::rules::StrengthBand;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Everything a surface would currently display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleState {
    pub marks: BTreeMap<Field, Mark>,
    pub statuses: BTreeMap<Field, (Tone, String)>,
    pub rule_marks: BTreeMap<String, Mark>,
    pub strength: Option<StrengthBand>,
    pub form_validated: bool,
}

/// Surface that records writes so tests can assert on visible state.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    state: Mutex<VisibleState>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> VisibleState {
        self.state.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl FormSurface for RecordingSurface {
    fn set_field_mark(&self, field: Field, mark: Mark) {
        if let Ok(mut guard) = self.state.lock() {
            guard.marks.insert(field, mark);
        }
    }

    fn set_status(&self, field: Field, tone: Tone, text: &str) {
        if let Ok(mut guard) = self.state.lock() {
            guard.statuses.insert(field, (tone, text.to_string()));
        }
    }

    fn clear_status(&self, field: Field) {
        if let Ok(mut guard) = self.state.lock() {
            guard.statuses.remove(&field);
        }
    }

    fn set_rule_mark(&self, rule: &str, mark: Mark) {
        if let Ok(mut guard) = self.state.lock() {
            guard.rule_marks.insert(rule.to_string(), mark);
        }
    }

    fn set_strength(&self, band: Option<StrengthBand>) {
        if let Ok(mut guard) = self.state.lock() {
            guard.strength = band;
        }
    }

    fn set_form_validated(&self, validated: bool) {
        if let Ok(mut guard) = self.state.lock() {
            guard.form_validated = validated;
        }
    }
}
