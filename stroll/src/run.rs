//! Running a profile with concurrent virtual users.
use crate::client::{HttpClient, ReqwestClient};
use crate::user::{RunAtomics, UserSet};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};
use stroll_core::{Profile, RunConfig, RunStatistics};
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

/// One execution of a [`Profile`].
///
/// `Run` is a future: configure it with the [`ConfigurableRun`] methods, then `.await` it to get
/// the [`RunStatistics`]. Dropping it before completion stops every virtual user.
#[pin_project::pin_project]
pub struct Run<C = ReqwestClient> {
    profile: Arc<Profile>,
    client: Arc<C>,
    config: RunConfig,
    runner_fut: Option<Pin<Box<dyn Future<Output = RunStatistics> + Send>>>,
}

impl Run<ReqwestClient> {
    pub fn new(profile: impl Into<Arc<Profile>>) -> Self {
        Self::with_client(profile, ReqwestClient::default())
    }
}

impl<C> Run<C> {
    pub fn with_client(profile: impl Into<Arc<Profile>>, client: C) -> Self {
        Self {
            profile: profile.into(),
            client: Arc::new(client),
            config: RunConfig::default(),
            runner_fut: None,
        }
    }

    /// Swap the HTTP client used by the virtual users.
    pub fn client<D>(self, client: D) -> Run<D> {
        Run {
            profile: self.profile,
            client: Arc::new(client),
            config: self.config,
            runner_fut: None,
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

impl<C> Future for Run<C>
where
    C: HttpClient + Send + Sync + 'static,
{
    type Output = RunStatistics;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if this.runner_fut.is_none() {
            let runner = run_profile(this.profile.clone(), this.client.clone(), this.config.clone());
            *this.runner_fut = Some(Box::pin(runner));
        }

        if let Some(runner) = this.runner_fut {
            runner.as_mut().poll(cx)
        } else {
            unreachable!()
        }
    }
}

pub trait ConfigurableRun: Future<Output = RunStatistics> + Sized + Send {
    fn users(self, users: usize) -> Self;
    fn duration(self, duration: Duration) -> Self;
    fn seed(self, seed: u64) -> Self;
}

impl<C> ConfigurableRun for Run<C>
where
    C: HttpClient + Send + Sync + 'static,
{
    /// Number of concurrent virtual users.
    ///
    /// # Example
    /// ```no_run
    /// use stroll::prelude::*;
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), ProfileError> {
    ///     Run::new(builtin("my_user")?)
    ///         .users(50)
    ///         .duration(Duration::from_secs(300))
    ///         .await;
    ///     Ok(())
    /// }
    /// ```
    fn users(mut self, users: usize) -> Self {
        self.config.users = users;
        self
    }

    /// How long the virtual users keep running. Defaults to one minute.
    fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Seed the virtual users' random sources. User `n` is seeded with `seed + n`, so a seeded
    /// run makes the same task choices and waits every time.
    fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }
}

#[instrument(name = "run", skip_all, fields(profile = profile.name()))]
pub(crate) async fn run_profile<C>(
    profile: Arc<Profile>,
    client: Arc<C>,
    config: RunConfig,
) -> RunStatistics
where
    C: HttpClient + Send + Sync + 'static,
{
    info!(
        "Running {} against {} with config {:?}",
        profile.name(),
        profile.host(),
        &config
    );

    #[cfg(feature = "metrics")]
    crate::transaction::describe_metrics();

    let seed = config.seed.unwrap_or_else(rand::random);
    debug!("Seed {seed}");

    let atomics = RunAtomics::new(&profile);
    let start = Instant::now();
    let users = UserSet::spawn(&profile, &client, &atomics, config.users, seed);
    debug!("Spawned {} virtual users", users.len());

    tokio::time::sleep(config.duration).await;
    users.shutdown().await;

    let stats = atomics.collect(&profile, config.users, start.elapsed());
    info!("Run complete: {stats}");
    stats
}
