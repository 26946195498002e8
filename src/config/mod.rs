pub mod schema;

pub use schema::{AvailabilityConfig, FormConfig, PolicyConfig, SubmitConfig};
