use crate::client::{ClientError, HttpClient, Response};
use crate::transaction::{transaction_hook, TransactionData, TRANSACTION_HOOK};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use stroll_core::{Profile, Request, RunStatistics, Task};
use tokio::task::JoinHandle;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

/// Counters shared by every virtual user of one run.
pub(crate) struct RunAtomics {
    transactions: TransactionData,
    tasks: Arc<TaskCounters>,
}

impl RunAtomics {
    pub fn new(profile: &Profile) -> Self {
        Self {
            transactions: TransactionData::default(),
            tasks: Arc::new(TaskCounters::new(profile)),
        }
    }

    pub fn collect(&self, profile: &Profile, users: usize, elapsed: Duration) -> RunStatistics {
        RunStatistics {
            profile: profile.name().to_string(),
            users,
            elapsed,
            success: self.transactions.success.load(Ordering::Relaxed),
            error: self.transactions.error.load(Ordering::Relaxed),
            tasks: self.tasks.snapshot(),
        }
    }
}

/// Executions per task, indexed in registration order.
pub(crate) struct TaskCounters {
    counts: Vec<(String, AtomicU64)>,
}

impl TaskCounters {
    fn new(profile: &Profile) -> Self {
        Self {
            counts: profile
                .tasks()
                .iter()
                .map(|task| (task.name().to_string(), AtomicU64::new(0)))
                .collect(),
        }
    }

    fn increment(&self, name: &str) {
        if let Some((_, count)) = self.counts.iter().find(|(task, _)| task == name) {
            count.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> Vec<(String, u64)> {
        self.counts
            .iter()
            .map(|(task, count)| (task.clone(), count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// The virtual users of a run. Dropping the set aborts them.
pub(crate) struct UserSet {
    handles: Vec<JoinHandle<()>>,
}

impl UserSet {
    pub fn spawn<C>(
        profile: &Arc<Profile>,
        client: &Arc<C>,
        atomics: &RunAtomics,
        users: usize,
        seed: u64,
    ) -> Self
    where
        C: HttpClient + Send + Sync + 'static,
    {
        let handles = (0..users)
            .map(|id| {
                let profile = profile.clone();
                let client = client.clone();
                let tasks = atomics.tasks.clone();
                let rng = SmallRng::seed_from_u64(seed.wrapping_add(id as u64));

                tokio::spawn(TRANSACTION_HOOK.scope(
                    atomics.transactions.clone(),
                    virtual_user(id, profile, client, tasks, rng),
                ))
            })
            .collect();

        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Abort every user and wait for them to unwind.
    pub async fn shutdown(mut self) {
        for handle in &self.handles {
            handle.abort();
        }

        for handle in self.handles.drain(..) {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    error!("Virtual user panicked: {err}");
                }
            }
        }
    }
}

impl Drop for UserSet {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

async fn virtual_user<C: HttpClient>(
    id: usize,
    profile: Arc<Profile>,
    client: Arc<C>,
    tasks: Arc<TaskCounters>,
    mut rng: SmallRng,
) {
    debug!("Virtual user {id} started");
    loop {
        let wait = profile.sample_wait(&mut rng);
        if wait.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(wait).await;
        }

        let task = profile.select_task(&mut rng);
        trace!("User {id} running {}", task.name());
        tasks.increment(task.name());
        execute(&profile, task, client.as_ref()).await;
    }
}

/// Run a task's requests in order. A failed request does not stop the ones after it.
async fn execute<C: HttpClient>(profile: &Profile, task: &Task, client: &C) {
    for request in task.requests() {
        match transaction_hook(task.name(), send(profile, request, client)).await {
            Ok(response) => debug!("{} {} -> {}", task.name(), request, response.status),
            Err(err) => warn!("{} {} failed: {}", task.name(), request, err),
        }
    }
}

async fn send<C: HttpClient>(
    profile: &Profile,
    request: &Request,
    client: &C,
) -> Result<Response, ClientError> {
    let url = profile.resolve(request)?;
    let response = client
        .send(request.method, url, request.body.as_ref())
        .await?;

    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(response.status))
    }
}
