#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default
)]

pub mod checker;
pub mod config;
pub mod error;
pub mod gate;
pub mod remote;
pub mod rules;
pub mod session;
pub mod surface;

pub use config::FormConfig;
pub use error::{CheckError, ConfigError, FormError, Result, SubmitError};
pub use gate::{FailureReason, GateState, SubmitDecision};
pub use session::FormSession;
