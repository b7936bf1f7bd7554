use std::time::Duration;

/// Host used when a profile does not declare one.
pub const DEFAULT_HOST: &str = "http://localhost:3000";

/// Lower think-time bound used when a profile does not declare one.
pub const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(1);

/// Upper think-time bound used when a profile does not declare one.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(5);

/// Weight given to tasks which do not declare one.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Number of virtual users spawned by a run unless told otherwise.
pub const DEFAULT_USERS: usize = 1;

/// How long a run lasts unless told otherwise.
pub const DEFAULT_RUN_DURATION: Duration = Duration::from_secs(60);
