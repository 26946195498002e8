mod recording;

pub use recording::{RecordingSurface, VisibleState};

use crate::checker::CheckState;
use crate::error::{CheckError, SubmitError};
use crate::remote::SubmitReceipt;
use crate::rules::{StrengthBand, ValidationResult};
use strum::Display;

/// Status line shown while an availability check is in flight.
pub const STATUS_CHECKING: &str = "Checking availability...";
/// Status line shown when an availability check fails.
pub const STATUS_CHECK_FAILED: &str = "Error checking availability";
/// Status line shown when the anti-forgery token is absent.
pub const STATUS_TOKEN_MISSING: &str = "Error: security token missing";
/// Form-level fallback when a submit fails without a server-provided message.
pub const STATUS_SUBMIT_FAILED: &str = "Submission failed";

/// Fields the engine projects state onto. `Form` is the form-level status
/// line used for submit outcomes.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Password,
    Confirmation,
    Identifier,
    Form,
}

/// Visual validity mark on a field or checklist entry. `Neutral` is the
/// cleared state shown for empty input.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Mark {
    Neutral,
    Valid,
    Invalid,
}

/// Tone of a status line.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// Write sink for everything the engine wants visible.
///
/// Implementations hold whatever handle the host UI needs; the engine only
/// ever writes. The optional methods cover surface features not every
/// deployment renders (requirements checklist, strength meter, the
/// submit-attempt styling hook) and default to no-ops.
pub trait FormSurface: Send + Sync {
    fn set_field_mark(&self, field: Field, mark: Mark);
    fn set_status(&self, field: Field, tone: Tone, text: &str);
    fn clear_status(&self, field: Field);

    fn set_rule_mark(&self, _rule: &str, _mark: Mark) {}
    fn set_strength(&self, _band: Option<StrengthBand>) {}
    fn set_form_validated(&self, _validated: bool) {}
}

/// Surface that drops every write. For headless use.
pub struct NullSurface;

impl FormSurface for NullSurface {
    #[inline(always)]
    fn set_field_mark(&self, _field: Field, _mark: Mark) {}

    #[inline(always)]
    fn set_status(&self, _field: Field, _tone: Tone, _text: &str) {}

    #[inline(always)]
    fn clear_status(&self, _field: Field) {}
}

fn mark_for(satisfied: bool, empty: bool) -> Mark {
    if empty {
        Mark::Neutral
    } else if satisfied {
        Mark::Valid
    } else {
        Mark::Invalid
    }
}

// ── Projections ───────────────────────────────────────────────────
//
// Pure writes from engine state. Re-applying the same state writes the
// same visible state; nothing here reads back from the surface.

/// Project password state: field mark, checklist marks when enabled, and
/// the strength band. Empty input clears marks instead of showing failures.
pub fn project_password(
    surface: &dyn FormSurface,
    value: &str,
    result: &ValidationResult,
    checklist: bool,
) {
    let empty = value.is_empty();
    surface.set_field_mark(Field::Password, mark_for(result.all_satisfied, empty));
    if checklist {
        for eval in &result.evaluations {
            surface.set_rule_mark(&eval.name, mark_for(eval.satisfied, empty));
        }
    }
    surface.set_strength(StrengthBand::rate(value));
}

/// Project the confirmation field from the current pair of values.
pub fn project_confirmation(surface: &dyn FormSurface, password: &str, confirmation: &str) {
    surface.set_field_mark(
        Field::Confirmation,
        mark_for(password == confirmation, confirmation.is_empty()),
    );
}

/// Project the identifier field from the canonical check state.
///
/// A failed check leaves the mark neutral: an error is not a verdict on the
/// identifier, and the status line carries the problem.
pub fn project_availability(surface: &dyn FormSurface, state: &CheckState) {
    match state {
        CheckState::Idle => {
            surface.set_field_mark(Field::Identifier, Mark::Neutral);
            surface.clear_status(Field::Identifier);
        }
        CheckState::Pending { .. } => {
            surface.set_field_mark(Field::Identifier, Mark::Neutral);
            surface.set_status(Field::Identifier, Tone::Info, STATUS_CHECKING);
        }
        CheckState::Resolved { available, message } => {
            let (mark, tone) = if *available {
                (Mark::Valid, Tone::Success)
            } else {
                (Mark::Invalid, Tone::Error)
            };
            surface.set_field_mark(Field::Identifier, mark);
            surface.set_status(Field::Identifier, tone, message);
        }
        CheckState::Failed(err) => {
            surface.set_field_mark(Field::Identifier, Mark::Neutral);
            let text = match err {
                CheckError::MissingToken => STATUS_TOKEN_MISSING,
                _ => STATUS_CHECK_FAILED,
            };
            surface.set_status(Field::Identifier, Tone::Error, text);
        }
    }
}

/// Project a submit failure onto the form-level status line. Server
/// rejections are surfaced verbatim.
pub fn project_submit_failure(surface: &dyn FormSurface, error: &SubmitError) {
    let text = match error {
        SubmitError::MissingToken => STATUS_TOKEN_MISSING,
        SubmitError::Rejected(message) => message.as_str(),
        SubmitError::Transport(_) | SubmitError::Decode(_) => STATUS_SUBMIT_FAILED,
    };
    surface.set_status(Field::Form, Tone::Error, text);
}

/// Project an accepted submit onto the form-level status line.
pub fn project_submit_receipt(surface: &dyn FormSurface, receipt: &SubmitReceipt) {
    surface.set_status(Field::Form, Tone::Success, &receipt.message);
}
