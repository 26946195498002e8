#![allow(dead_code)]

use async_trait::async_trait;
use formgate::FormConfig;
use formgate::error::{CheckError, SubmitError};
use formgate::remote::{
    AvailabilityProbe, AvailabilityVerdict, SubmitReceipt, SubmitSink, Submission,
};
use formgate::session::FormSession;
use formgate::surface::{FormSurface, RecordingSurface};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub type CheckResult = Result<AvailabilityVerdict, CheckError>;
pub type SubmitResult = Result<SubmitReceipt, SubmitError>;

/// Install a debug-level subscriber; later calls are no-ops.
pub fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn available(message: &str) -> AvailabilityVerdict {
    AvailabilityVerdict {
        available: true,
        message: message.into(),
    }
}

pub fn unavailable(message: &str) -> AvailabilityVerdict {
    AvailabilityVerdict {
        available: false,
        message: message.into(),
    }
}

/// One scripted probe response: sleep `delay`, then answer.
pub struct ScriptedCall {
    pub delay: Duration,
    pub result: CheckResult,
}

impl ScriptedCall {
    pub fn instant(result: CheckResult) -> Self {
        Self {
            delay: Duration::ZERO,
            result,
        }
    }

    pub fn delayed(delay: Duration, result: CheckResult) -> Self {
        Self { delay, result }
    }
}

/// Probe that records every identifier it is asked about and answers from a
/// script, falling back to a fixed verdict once the script runs out. Delays
/// use the Tokio clock, so paused-time tests drive them with `advance`.
pub struct ScriptedProbe {
    calls: Mutex<Vec<String>>,
    script: Mutex<VecDeque<ScriptedCall>>,
    fallback: AvailabilityVerdict,
}

impl ScriptedProbe {
    pub fn always(fallback: AvailabilityVerdict) -> Arc<Self> {
        Self::with_script(Vec::new(), fallback)
    }

    pub fn with_script(calls: Vec<ScriptedCall>, fallback: AvailabilityVerdict) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(calls.into()),
            fallback,
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AvailabilityProbe for ScriptedProbe {
    async fn check(&self, identifier: &str) -> CheckResult {
        self.calls.lock().unwrap().push(identifier.to_string());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(call) => {
                if !call.delay.is_zero() {
                    tokio::time::sleep(call.delay).await;
                }
                call.result
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Sink that records every forwarded submission.
pub struct RecordingSink {
    submissions: Mutex<Vec<Submission>>,
    response: SubmitResult,
}

impl RecordingSink {
    pub fn accepting(message: &str) -> Arc<Self> {
        Arc::new(Self {
            submissions: Mutex::new(Vec::new()),
            response: Ok(SubmitReceipt {
                message: message.into(),
            }),
        })
    }

    pub fn rejecting(error: &str) -> Arc<Self> {
        Arc::new(Self {
            submissions: Mutex::new(Vec::new()),
            response: Err(SubmitError::Rejected(error.into())),
        })
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl SubmitSink for RecordingSink {
    async fn submit(&self, submission: &Submission) -> SubmitResult {
        self.submissions.lock().unwrap().push(submission.clone());
        self.response.clone()
    }
}

/// Session over a recording surface with explicit collaborators.
pub fn session_with(
    probe: Arc<dyn AvailabilityProbe>,
    sink: Arc<dyn SubmitSink>,
) -> (FormSession, Arc<RecordingSurface>) {
    session_with_config(FormConfig::default(), probe, sink)
}

pub fn session_with_config(
    config: FormConfig,
    probe: Arc<dyn AvailabilityProbe>,
    sink: Arc<dyn SubmitSink>,
) -> (FormSession, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::new());
    let session = FormSession::with_collaborators(
        config,
        Arc::clone(&surface) as Arc<dyn FormSurface>,
        probe,
        sink,
    )
    .expect("config is valid");
    (session, surface)
}
