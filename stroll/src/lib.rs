#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod client;
pub mod run;

pub(crate) mod transaction;
pub(crate) mod user;

pub use client::{ClientError, HttpClient, LocalHttpClient, ReqwestClient, Response};
pub use run::{ConfigurableRun, Run};
pub use stroll_core as core;

pub mod prelude {
    pub use crate::client::{ClientError, HttpClient, ReqwestClient, Response};
    pub use crate::run::{ConfigurableRun, Run};

    pub use stroll_core::{
        builtin, Method, Profile, ProfileBuilder, ProfileConfig, ProfileError, Request,
        RunStatistics, ThinkTime,
    };
}
