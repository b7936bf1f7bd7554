use crate::{
    Profile, ProfileBuilder, ProfileError, Request, ThinkTime, DEFAULT_HOST, DEFAULT_RUN_DURATION,
    DEFAULT_USERS, DEFAULT_WEIGHT,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serialized form of a [`Profile`].
///
/// Building goes through [`ProfileBuilder`], so a config is held to the same rules as
/// programmatic registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub think_time: ThinkTimeConfig,
    pub tasks: Vec<TaskConfig>,
}

/// Think-time bounds in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThinkTimeConfig {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    // Signed so that negative weights in a file surface as `InvalidWeight` rather than a decode
    // error.
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub requests: Vec<Request>,
}

impl ProfileConfig {
    pub fn from_json(source: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build(&self) -> Result<Profile, ProfileError> {
        let mut builder = ProfileBuilder::new(&self.name);
        builder.set_host(&self.host)?;
        builder.set_think_time_policy(self.think_time.to_think_time()?);

        for task in &self.tasks {
            let weight = u32::try_from(task.weight)
                .ok()
                .filter(|w| *w >= 1)
                .ok_or_else(|| ProfileError::InvalidWeight {
                    name: task.name.clone(),
                    weight: task.weight,
                })?;
            builder.register(task.name.as_str(), weight, task.requests.iter().cloned())?;
        }

        builder.build()
    }
}

impl From<&Profile> for ProfileConfig {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name().to_string(),
            host: profile.host().to_string(),
            think_time: profile.think_time().into(),
            tasks: profile
                .tasks()
                .iter()
                .map(|task| TaskConfig {
                    name: task.name().to_string(),
                    weight: task.weight().into(),
                    requests: task.requests().to_vec(),
                })
                .collect(),
        }
    }
}

impl ThinkTimeConfig {
    pub fn to_think_time(self) -> Result<ThinkTime, ProfileError> {
        ThinkTime::from_secs_f64(self.min, self.max)
    }
}

impl Default for ThinkTimeConfig {
    fn default() -> Self {
        ThinkTime::default().into()
    }
}

impl From<ThinkTime> for ThinkTimeConfig {
    fn from(think_time: ThinkTime) -> Self {
        Self {
            min: think_time.min().as_secs_f64(),
            max: think_time.max().as_secs_f64(),
        }
    }
}

/// How the engine drives a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub users: usize,
    pub duration: Duration,
    /// Seed for the virtual users' random sources. `None` draws one per run.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            users: DEFAULT_USERS,
            duration: DEFAULT_RUN_DURATION,
            seed: None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_weight() -> i64 {
    DEFAULT_WEIGHT.into()
}
