use crate::{Host, ProfileConfig, ProfileError, Request, Task, ThinkTime};
use rand::RngCore;
use std::time::Duration;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};
use url::Url;

/// Collects task registrations before sealing them into a [`Profile`].
///
/// # Example
/// ```
/// use stroll_core::{ProfileBuilder, Request};
/// use std::time::Duration;
///
/// # fn main() -> Result<(), stroll_core::ProfileError> {
/// let profile = ProfileBuilder::new("docs")
///     .set_host("http://localhost:3000")?
///     .set_think_time(Duration::from_secs(1), Duration::from_secs(5))?
///     .register("index", 1, [Request::get("/")])?
///     .register("about", 3, [Request::get("/about")])?
///     .build()?;
///
/// assert_eq!(profile.total_weight(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    name: String,
    host: Option<Host>,
    think_time: ThinkTime,
    tasks: Vec<Task>,
}

impl ProfileBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            host: None,
            think_time: ThinkTime::default(),
            tasks: vec![],
        }
    }

    /// Add a task. Fails without modifying the builder if the name is taken, the weight is zero,
    /// or a request is malformed.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        weight: u32,
        requests: impl IntoIterator<Item = Request>,
    ) -> Result<&mut Self, ProfileError> {
        let name = name.into();
        trace!("{} register: {} (weight {})", self.name, name, weight);

        if weight < 1 {
            return Err(ProfileError::InvalidWeight {
                name,
                weight: weight.into(),
            });
        }

        if self.tasks.iter().any(|task| task.name == name) {
            return Err(ProfileError::DuplicateTask(name));
        }

        let requests: Vec<Request> = requests.into_iter().collect();
        if requests.is_empty() {
            return Err(ProfileError::EmptyTask(name));
        }
        if let Some(request) = requests.iter().find(|r| !r.path.starts_with('/')) {
            return Err(ProfileError::InvalidPath {
                task: name,
                path: request.path.clone(),
            });
        }

        self.tasks.push(Task {
            name,
            weight,
            requests,
        });
        Ok(self)
    }

    pub fn set_think_time(
        &mut self,
        min: Duration,
        max: Duration,
    ) -> Result<&mut Self, ProfileError> {
        trace!("{} set_think_time: min {:?} max {:?}", self.name, min, max);
        self.think_time = ThinkTime::between(min, max)?;
        Ok(self)
    }

    pub fn set_think_time_policy(&mut self, think_time: ThinkTime) -> &mut Self {
        trace!("{} set_think_time: {}", self.name, think_time);
        self.think_time = think_time;
        self
    }

    pub fn set_host(&mut self, base_url: &str) -> Result<&mut Self, ProfileError> {
        trace!("{} set_host: {}", self.name, base_url);
        self.host = Some(Host::parse(base_url)?);
        Ok(self)
    }

    /// Seal the registrations into an immutable [`Profile`].
    pub fn build(&self) -> Result<Profile, ProfileError> {
        if self.tasks.is_empty() {
            return Err(ProfileError::EmptyProfile(self.name.clone()));
        }

        let host = match &self.host {
            Some(host) => host.clone(),
            None => Host::default_host()?,
        };

        let mut running = 0u64;
        let cumulative = self
            .tasks
            .iter()
            .map(|task| {
                running += u64::from(task.weight);
                running
            })
            .collect();

        debug!(
            "Sealed profile {} with {} tasks against {}",
            self.name,
            self.tasks.len(),
            host
        );

        Ok(Profile {
            name: self.name.clone(),
            host,
            think_time: self.think_time,
            tasks: self.tasks.clone(),
            cumulative,
        })
    }
}

/// A sealed behavior profile.
///
/// Read-only once built, so one instance can be shared by any number of virtual users.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    name: String,
    host: Host,
    think_time: ThinkTime,
    tasks: Vec<Task>,
    // Running sum of weights; the last entry is the total.
    cumulative: Vec<u64>,
}

impl Profile {
    pub fn builder(name: &str) -> ProfileBuilder {
        ProfileBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn think_time(&self) -> ThinkTime {
        self.think_time
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub fn total_weight(&self) -> u64 {
        // A sealed profile always has at least one task.
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// The task owning slot `r` of the cumulative weight line, with `r` taken modulo the total
    /// weight. Same `r`, same task.
    pub fn task_at(&self, r: u64) -> &Task {
        let r = r % self.total_weight();
        let idx = self.cumulative.partition_point(|&upper| upper <= r);
        &self.tasks[idx]
    }

    /// Pick a task with probability proportional to its weight.
    pub fn select_task<R: RngCore + ?Sized>(&self, rng: &mut R) -> &Task {
        self.task_at(rng.next_u64())
    }

    /// Draw the think time taken before the next task.
    pub fn sample_wait<R: RngCore + ?Sized>(&self, rng: &mut R) -> Duration {
        self.think_time.sample(rng)
    }

    /// Absolute URL for `request` against this profile's host.
    pub fn resolve(&self, request: &Request) -> Result<Url, url::ParseError> {
        self.host.join(&request.path)
    }

    /// Copy of this profile aimed at another host.
    pub fn with_host(&self, base_url: &str) -> Result<Profile, ProfileError> {
        Ok(Profile {
            host: Host::parse(base_url)?,
            ..self.clone()
        })
    }

    pub fn with_think_time(&self, think_time: ThinkTime) -> Profile {
        Profile {
            think_time,
            ..self.clone()
        }
    }

    pub fn to_config(&self) -> ProfileConfig {
        ProfileConfig::from(self)
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        self.to_config().to_json()
    }

    pub fn from_json(source: &str) -> Result<Profile, ProfileError> {
        ProfileConfig::from_json(source)?.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn a1_b3() -> Profile {
        ProfileBuilder::new("ab")
            .register("A", 1, [Request::get("/a")])
            .unwrap()
            .register("B", 3, [Request::get("/b")])
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn fixed_draws() {
        let profile = a1_b3();
        assert_eq!(profile.total_weight(), 4);

        assert_eq!(profile.select_task(&mut StepRng::new(0, 0)).name(), "A");
        assert_eq!(profile.select_task(&mut StepRng::new(1, 0)).name(), "B");

        let names: Vec<&str> = (0..8).map(|r| profile.task_at(r).name()).collect();
        assert_eq!(names, ["A", "B", "B", "B", "A", "B", "B", "B"]);
    }

    #[test]
    #[ntest::timeout(10_000)]
    fn selection_converges_to_weights() {
        let profile = ProfileBuilder::new("converge")
            .register("a", 1, [Request::get("/a")])
            .unwrap()
            .register("b", 3, [Request::get("/b")])
            .unwrap()
            .register("c", 6, [Request::get("/c")])
            .unwrap()
            .build()
            .unwrap();

        let draws = 200_000;
        let mut rng = SmallRng::seed_from_u64(42);
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            match profile.select_task(&mut rng).name() {
                "a" => counts[0] += 1,
                "b" => counts[1] += 1,
                "c" => counts[2] += 1,
                other => panic!("unexpected task {other}"),
            }
        }

        for (count, expected) in counts.iter().zip([0.1, 0.3, 0.6]) {
            let freq = *count as f64 / draws as f64;
            assert!((freq - expected).abs() < 0.01, "{freq} vs {expected}");
        }
    }

    #[test]
    fn seeded_selection_is_deterministic() {
        let profile = a1_b3();
        let picks = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..64)
                .map(|_| profile.select_task(&mut rng).name().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(9), picks(9));
    }

    #[test]
    fn zero_weight_leaves_builder_untouched() {
        let mut builder = ProfileBuilder::new("weights");
        builder.register("index", 1, [Request::get("/")]).unwrap();

        let err = builder.register("zero", 0, [Request::get("/zero")]).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidWeight { weight: 0, .. }));

        let profile = builder.build().unwrap();
        assert_eq!(profile.tasks().len(), 1);
        assert_eq!(profile.total_weight(), 1);
    }

    #[test]
    fn duplicate_keeps_first_registration() {
        let mut builder = ProfileBuilder::new("dupes");
        builder.register("index", 2, [Request::get("/")]).unwrap();

        let err = builder
            .register("index", 5, [Request::get("/other")])
            .unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateTask(ref name) if name == "index"));

        let profile = builder.build().unwrap();
        let task = profile.task("index").unwrap();
        assert_eq!(task.weight(), 2);
        assert_eq!(task.requests(), &[Request::get("/")]);
    }

    #[test]
    fn malformed_tasks_are_rejected() {
        let mut builder = ProfileBuilder::new("bad");
        assert!(matches!(
            builder.register("empty", 1, Vec::<Request>::new()),
            Err(ProfileError::EmptyTask(_))
        ));
        assert!(matches!(
            builder.register("relative", 1, [Request::get("about")]),
            Err(ProfileError::InvalidPath { .. })
        ));
        assert!(matches!(builder.build(), Err(ProfileError::EmptyProfile(_))));
    }

    #[test]
    fn think_time_and_host_validation() {
        let mut builder = ProfileBuilder::new("cfg");
        assert!(matches!(
            builder.set_think_time(Duration::from_secs(3), Duration::from_secs(2)),
            Err(ProfileError::InvalidRange { .. })
        ));
        assert!(matches!(
            builder.set_host("localhost"),
            Err(ProfileError::InvalidHost { .. })
        ));

        builder.register("index", 1, [Request::get("/")]).unwrap();
        let profile = builder.build().unwrap();
        assert_eq!(profile.think_time(), ThinkTime::default());
        assert_eq!(profile.host().as_str(), "http://localhost:3000");
    }

    #[test]
    fn default_host_resolution() {
        let profile = ProfileBuilder::new("resolve")
            .register("index", 1, [Request::get("/")])
            .unwrap()
            .register(
                "post_data",
                1,
                [Request::post("/api/data", json!({ "key": "value" }))],
            )
            .unwrap()
            .build()
            .unwrap();

        let index = &profile.task("index").unwrap().requests()[0];
        assert_eq!(index.method, Method::Get);
        assert_eq!(
            profile.resolve(index).unwrap().as_str(),
            "http://localhost:3000/"
        );

        let post = &profile.task("post_data").unwrap().requests()[0];
        assert_eq!(
            profile.resolve(post).unwrap().as_str(),
            "http://localhost:3000/api/data"
        );
    }

    #[test]
    fn with_host_retargets() {
        let profile = a1_b3().with_host("http://127.0.0.1:8080").unwrap();
        let request = &profile.task("B").unwrap().requests()[0];
        assert_eq!(
            profile.resolve(request).unwrap().as_str(),
            "http://127.0.0.1:8080/b"
        );
        assert!(a1_b3().with_host("nope").is_err());
    }

    #[test]
    fn wait_bounds() {
        let profile = a1_b3();
        assert_eq!(
            profile.sample_wait(&mut StepRng::new(0, 0)),
            Duration::from_secs(1)
        );
        assert_eq!(
            profile.sample_wait(&mut StepRng::new(u64::MAX, 0)),
            Duration::from_secs(5)
        );
    }

    #[tracing_test::traced_test]
    #[test]
    fn sealing_is_logged() {
        let _ = a1_b3();
        assert!(logs_contain("Sealed profile ab with 2 tasks"));
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Profile>();
    }
}
