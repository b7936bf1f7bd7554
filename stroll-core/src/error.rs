use thiserror::Error;

/// Errors raised while assembling a [`Profile`](crate::Profile).
///
/// All of these are reported synchronously during construction. A builder which returned one of
/// these is left exactly as it was before the failing call.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Task `{0}` is already registered.")]
    DuplicateTask(String),

    #[error("Task `{name}` has weight {weight}; weight must be at least 1.")]
    InvalidWeight { name: String, weight: i64 },

    #[error("Invalid think time: min={min}s max={max}s. Expected 0 <= min <= max.")]
    InvalidRange { min: f64, max: f64 },

    #[error("Invalid host `{host}`: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Task `{task}` has path `{path}`; paths must start with `/`.")]
    InvalidPath { task: String, path: String },

    #[error("Task `{0}` has no requests.")]
    EmptyTask(String),

    #[error("Profile `{0}` has no tasks.")]
    EmptyProfile(String),

    #[error("Unknown profile `{0}`.")]
    UnknownProfile(String),

    #[error("Failed to decode profile: {0}")]
    Decode(#[from] serde_json::Error),
}
