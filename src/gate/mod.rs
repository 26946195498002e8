use crate::checker::CheckState;
use crate::error::SubmitError;
use crate::remote::SubmitReceipt;
use crate::rules::ValidationResult;
use std::collections::BTreeSet;
use strum::Display;

/// One reason a submission is currently blocked. Reasons accumulate; the
/// gate never stops at the first failure.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureReason {
    #[strum(to_string = "rule '{rule}' unsatisfied")]
    RuleUnsatisfied { rule: String },
    #[strum(to_string = "confirmation does not match")]
    ConfirmationMismatch,
    #[strum(to_string = "identifier not yet checked")]
    IdentifierUnchecked,
    #[strum(to_string = "availability check pending")]
    AvailabilityPending,
    #[strum(to_string = "identifier unavailable")]
    IdentifierUnavailable,
    #[strum(to_string = "availability check failed")]
    AvailabilityCheckFailed,
}

/// Gate state, recomputed from scratch on every contributing change and on
/// every submit attempt. Never cached across inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Blocked(BTreeSet<FailureReason>),
    Ready,
}

/// Everything the gate reads. Borrowed views of session state; the gate
/// itself owns nothing.
#[derive(Debug, Clone, Copy)]
pub struct GateInputs<'a> {
    /// False only while the form is untouched (no input, no submit attempt).
    pub touched: bool,
    pub password: &'a str,
    pub confirmation: &'a str,
    pub identifier: &'a str,
    pub validation: &'a ValidationResult,
    pub check_state: &'a CheckState,
    pub availability_enabled: bool,
}

impl GateState {
    #[must_use]
    pub fn evaluate(inputs: &GateInputs<'_>) -> Self {
        if !inputs.touched {
            return Self::Idle;
        }

        let mut reasons = BTreeSet::new();
        for failing in inputs.validation.failing() {
            reasons.insert(FailureReason::RuleUnsatisfied {
                rule: failing.name.clone(),
            });
        }
        if inputs.confirmation != inputs.password {
            reasons.insert(FailureReason::ConfirmationMismatch);
        }

        // An empty identifier is left to server-side required-field
        // handling; availability only gates a value the user actually typed.
        if inputs.availability_enabled && !inputs.identifier.trim().is_empty() {
            match inputs.check_state {
                CheckState::Idle => {
                    reasons.insert(FailureReason::IdentifierUnchecked);
                }
                CheckState::Pending { .. } => {
                    reasons.insert(FailureReason::AvailabilityPending);
                }
                CheckState::Resolved {
                    available: false, ..
                } => {
                    reasons.insert(FailureReason::IdentifierUnavailable);
                }
                CheckState::Resolved {
                    available: true, ..
                } => {}
                CheckState::Failed(_) => {
                    reasons.insert(FailureReason::AvailabilityCheckFailed);
                }
            }
        }

        if reasons.is_empty() {
            Self::Ready
        } else {
            Self::Blocked(reasons)
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// What a submit attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Intercepted before any network activity.
    Blocked(BTreeSet<FailureReason>),
    /// Forwarded and accepted by the server.
    Forwarded(SubmitReceipt),
    /// Forwarded but the attempt failed; rejection text comes back verbatim.
    Failed(SubmitError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::rules::credential_policy;

    fn validation(password: &str) -> ValidationResult {
        credential_policy(&PolicyConfig::default()).evaluate(password)
    }

    fn inputs<'a>(
        password: &'a str,
        confirmation: &'a str,
        identifier: &'a str,
        validation: &'a ValidationResult,
        check_state: &'a CheckState,
    ) -> GateInputs<'a> {
        GateInputs {
            touched: true,
            password,
            confirmation,
            identifier,
            validation,
            check_state,
            availability_enabled: true,
        }
    }

    fn reasons(state: &GateState) -> BTreeSet<FailureReason> {
        match state {
            GateState::Blocked(reasons) => reasons.clone(),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[test]
    fn untouched_form_is_idle() {
        let validation = validation("");
        let state = CheckState::Idle;
        let mut gate_inputs = inputs("", "", "", &validation, &state);
        gate_inputs.touched = false;
        assert_eq!(GateState::evaluate(&gate_inputs), GateState::Idle);
    }

    #[test]
    fn weak_password_blocks_with_every_failing_rule() {
        let validation = validation("pass");
        let state = CheckState::Idle;
        let gate = GateState::evaluate(&inputs("pass", "pass", "", &validation, &state));
        let reasons = reasons(&gate);
        assert!(reasons.contains(&FailureReason::RuleUnsatisfied {
            rule: "length".into()
        }));
        assert!(reasons.contains(&FailureReason::RuleUnsatisfied {
            rule: "number".into()
        }));
        assert!(reasons.contains(&FailureReason::RuleUnsatisfied {
            rule: "special".into()
        }));
        assert!(!reasons.contains(&FailureReason::ConfirmationMismatch));
    }

    #[test]
    fn mismatched_confirmation_blocks() {
        let validation = validation("Password1!");
        let state = CheckState::Idle;
        let gate = GateState::evaluate(&inputs(
            "Password1!",
            "Password1",
            "",
            &validation,
            &state,
        ));
        assert_eq!(
            reasons(&gate),
            BTreeSet::from([FailureReason::ConfirmationMismatch])
        );
    }

    #[test]
    fn empty_identifier_does_not_block_on_availability() {
        let validation = validation("Password1!");
        let state = CheckState::Idle;
        let gate = GateState::evaluate(&inputs(
            "Password1!",
            "Password1!",
            "   ",
            &validation,
            &state,
        ));
        assert_eq!(gate, GateState::Ready);
    }

    #[test]
    fn unchecked_identifier_blocks_fail_closed() {
        let validation = validation("Password1!");
        let state = CheckState::Idle;
        let gate = GateState::evaluate(&inputs(
            "Password1!",
            "Password1!",
            "ab",
            &validation,
            &state,
        ));
        assert_eq!(
            reasons(&gate),
            BTreeSet::from([FailureReason::IdentifierUnchecked])
        );
    }

    #[test]
    fn pending_and_failed_checks_block() {
        let validation = validation("Password1!");

        let pending = CheckState::Pending { seq: 3 };
        let gate = GateState::evaluate(&inputs(
            "Password1!",
            "Password1!",
            "neo",
            &validation,
            &pending,
        ));
        assert_eq!(
            reasons(&gate),
            BTreeSet::from([FailureReason::AvailabilityPending])
        );

        let failed = CheckState::Failed(crate::error::CheckError::Timeout);
        let gate = GateState::evaluate(&inputs(
            "Password1!",
            "Password1!",
            "neo",
            &validation,
            &failed,
        ));
        assert_eq!(
            reasons(&gate),
            BTreeSet::from([FailureReason::AvailabilityCheckFailed])
        );
    }

    #[test]
    fn unavailable_identifier_blocks_and_available_releases() {
        let validation = validation("Password1!");

        let taken = CheckState::Resolved {
            available: false,
            message: "Username is already taken".into(),
        };
        let gate = GateState::evaluate(&inputs(
            "Password1!",
            "Password1!",
            "neo",
            &validation,
            &taken,
        ));
        assert_eq!(
            reasons(&gate),
            BTreeSet::from([FailureReason::IdentifierUnavailable])
        );

        let free = CheckState::Resolved {
            available: true,
            message: "Username is available".into(),
        };
        let gate = GateState::evaluate(&inputs(
            "Password1!",
            "Password1!",
            "neo",
            &validation,
            &free,
        ));
        assert_eq!(gate, GateState::Ready);
    }

    #[test]
    fn disabled_availability_never_contributes_reasons() {
        let validation = validation("Password1!");
        let state = CheckState::Idle;
        let mut gate_inputs = inputs("Password1!", "Password1!", "neo", &validation, &state);
        gate_inputs.availability_enabled = false;
        assert_eq!(GateState::evaluate(&gate_inputs), GateState::Ready);
    }

    #[test]
    fn reasons_accumulate_across_aspects() {
        let validation = validation("pass");
        let state = CheckState::Resolved {
            available: false,
            message: "taken".into(),
        };
        let gate = GateState::evaluate(&inputs("pass", "nope", "neo", &validation, &state));
        let reasons = reasons(&gate);
        assert!(reasons.contains(&FailureReason::ConfirmationMismatch));
        assert!(reasons.contains(&FailureReason::IdentifierUnavailable));
        assert!(reasons.len() >= 3);
    }

    #[test]
    fn reason_text_is_stable() {
        let reason = FailureReason::RuleUnsatisfied {
            rule: "length".into(),
        };
        assert_eq!(reason.to_string(), "rule 'length' unsatisfied");
        assert_eq!(
            FailureReason::AvailabilityPending.to_string(),
            "availability check pending"
        );
    }
}
