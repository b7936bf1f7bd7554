//! Behavior profiles: named, weighted HTTP tasks plus a think-time policy and a target host.
//!
//! A [`Profile`] is assembled with a [`ProfileBuilder`] (or decoded from a [`ProfileConfig`]),
//! sealed, and then only read. Execution belongs to the `stroll` crate.
mod builtin;
mod config;
mod constants;
mod error;
mod host;
mod profile;
mod stats;
mod task;
mod think_time;

pub use builtin::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use host::*;
pub use profile::*;
pub use stats::*;
pub use task::*;
pub use think_time::*;
