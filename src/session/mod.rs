use crate::checker::{CheckOutcome, CheckState, DebouncedChecker};
use crate::config::FormConfig;
use crate::error::Result;
use crate::gate::{GateInputs, GateState, SubmitDecision};
use crate::remote::{
    AvailabilityProbe, HttpAvailabilityProbe, HttpSubmitSink, Submission, SubmitSink,
};
use crate::rules::{RuleSet, credential_policy};
use crate::surface::{
    FormSurface, project_availability, project_confirmation, project_password,
    project_submit_failure, project_submit_receipt,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// One interactive form instance: owns the field values, the rule set, the
/// debounced checker, and the gate. Every mutation goes through `&mut self`,
/// so a session has exactly one execution context by construction; the only
/// things shared with spawned work are the checker's counter and its
/// outcome channel.
pub struct FormSession {
    config: FormConfig,
    rules: RuleSet,
    checker: DebouncedChecker,
    surface: Arc<dyn FormSurface>,
    sink: Arc<dyn SubmitSink>,
    gate: GateState,
    password: String,
    confirmation: String,
    identifier: String,
    touched: bool,
}

impl FormSession {
    /// Wire a session against the HTTP collaborators from config. The
    /// anti-forgery token comes from page metadata, not config; `None` (or
    /// empty) makes checks and submits fail closed.
    pub fn new(
        config: FormConfig,
        surface: Arc<dyn FormSurface>,
        token: Option<String>,
    ) -> Result<Self> {
        let probe = Arc::new(HttpAvailabilityProbe::new(
            &config.availability,
            token.clone(),
        ));
        let sink = Arc::new(HttpSubmitSink::new(&config.submit, token));
        Self::with_collaborators(config, surface, probe, sink)
    }

    /// Wire a session against explicit collaborators.
    pub fn with_collaborators(
        config: FormConfig,
        surface: Arc<dyn FormSurface>,
        probe: Arc<dyn AvailabilityProbe>,
        sink: Arc<dyn SubmitSink>,
    ) -> Result<Self> {
        config.validate()?;
        let rules = credential_policy(&config.policy);
        let checker = DebouncedChecker::new(&config.availability, probe);
        Ok(Self {
            config,
            rules,
            checker,
            surface,
            sink,
            gate: GateState::Idle,
            password: String::new(),
            confirmation: String::new(),
            identifier: String::new(),
            touched: false,
        })
    }

    pub fn gate(&self) -> &GateState {
        &self.gate
    }

    pub fn check_state(&self) -> &CheckState {
        self.checker.state()
    }

    /// Record a password edit: re-evaluate every rule, project the password
    /// field, and re-project the confirmation when one has been typed.
    pub fn password_changed(&mut self, value: &str) {
        self.touched = true;
        self.password = value.to_string();
        let result = self.rules.evaluate(&self.password);
        project_password(
            self.surface.as_ref(),
            &self.password,
            &result,
            self.config.checklist,
        );
        if !self.confirmation.is_empty() {
            project_confirmation(self.surface.as_ref(), &self.password, &self.confirmation);
        }
        self.recompute_gate();
    }

    /// Record a confirmation edit.
    pub fn confirmation_changed(&mut self, value: &str) {
        self.touched = true;
        self.confirmation = value.to_string();
        project_confirmation(self.surface.as_ref(), &self.password, &self.confirmation);
        self.recompute_gate();
    }

    /// Record an identifier edit. Must be called from within a Tokio
    /// runtime; the checker schedules its debounce task here.
    pub fn identifier_changed(&mut self, value: &str) {
        self.touched = true;
        self.identifier = value.trim().to_string();
        self.checker.input_changed(value);
        project_availability(self.surface.as_ref(), self.checker.state());
        self.recompute_gate();
    }

    /// Wait for the next check outcome and apply it under the staleness
    /// guard. Returns whether visible state changed.
    pub async fn next_check(&mut self) -> bool {
        match self.checker.next_outcome().await {
            Some(outcome) => self.absorb(outcome),
            None => false,
        }
    }

    /// Apply already-delivered outcomes without waiting. Returns how many
    /// were applied (stale ones are dropped silently).
    pub fn poll_checks(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.checker.poll_outcome() {
            if self.absorb(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Attempt a submission. A blocked form is intercepted with the full
    /// reason set and nothing is sent; a ready form is forwarded to the
    /// sink and the server's answer projected onto the form status line.
    pub async fn submit(&mut self) -> SubmitDecision {
        self.touched = true;
        self.surface.set_form_validated(true);
        self.recompute_gate();

        if let GateState::Blocked(reasons) = self.gate.clone() {
            self.reproject_all();
            debug!(count = reasons.len(), "submit intercepted");
            return SubmitDecision::Blocked(reasons);
        }

        let submission = Submission {
            identifier: self.identifier.clone(),
            credential: self.password.clone(),
        };
        match self.sink.submit(&submission).await {
            Ok(receipt) => {
                project_submit_receipt(self.surface.as_ref(), &receipt);
                SubmitDecision::Forwarded(receipt)
            }
            Err(error) => {
                warn!(%error, "submit failed");
                project_submit_failure(self.surface.as_ref(), &error);
                SubmitDecision::Failed(error)
            }
        }
    }

    fn absorb(&mut self, outcome: CheckOutcome) -> bool {
        if !self.checker.apply(outcome) {
            return false;
        }
        project_availability(self.surface.as_ref(), self.checker.state());
        self.recompute_gate();
        true
    }

    fn recompute_gate(&mut self) {
        let validation = self.rules.evaluate(&self.password);
        self.gate = GateState::evaluate(&GateInputs {
            touched: self.touched,
            password: &self.password,
            confirmation: &self.confirmation,
            identifier: &self.identifier,
            validation: &validation,
            check_state: self.checker.state(),
            availability_enabled: self.checker.enabled(),
        });
    }

    fn reproject_all(&self) {
        let result = self.rules.evaluate(&self.password);
        project_password(
            self.surface.as_ref(),
            &self.password,
            &result,
            self.config.checklist,
        );
        project_confirmation(self.surface.as_ref(), &self.password, &self.confirmation);
        project_availability(self.surface.as_ref(), self.checker.state());
    }
}
