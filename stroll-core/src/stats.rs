use std::fmt;
use std::time::Duration;

/// Counters gathered over one run of a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    pub profile: String,
    pub users: usize,
    pub elapsed: Duration,
    /// Requests answered with a 2xx or 3xx status.
    pub success: u64,
    /// Requests which failed in transport or were answered with any other status.
    pub error: u64,
    /// Executions per task, in registration order.
    pub tasks: Vec<(String, u64)>,
}

impl RunStatistics {
    pub fn total(&self) -> u64 {
        self.success + self.error
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.
        } else {
            self.error as f64 / self.total() as f64
        }
    }

    pub fn task_count(&self, name: &str) -> Option<u64> {
        self.tasks
            .iter()
            .find(|(task, _)| task == name)
            .map(|(_, count)| *count)
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Profile={}, Users={}, Elapsed={}, Requests={}, Errors={}, ErrorRate={:.2}",
            self.profile,
            self.users,
            humantime::format_duration(self.elapsed),
            self.total(),
            self.error,
            self.error_rate(),
        )?;
        for (task, count) in &self.tasks {
            write!(f, ", {task}={count}")?;
        }
        Ok(())
    }
}
