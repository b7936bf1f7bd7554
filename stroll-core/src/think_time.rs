use crate::{ProfileError, DEFAULT_MAX_WAIT, DEFAULT_MIN_WAIT};
use rand::RngCore;
use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Pause taken by a virtual user before each task, drawn uniformly from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTime {
    min: Duration,
    max: Duration,
}

impl ThinkTime {
    pub fn between(min: Duration, max: Duration) -> Result<Self, ProfileError> {
        if min > max {
            return Err(ProfileError::InvalidRange {
                min: min.as_secs_f64(),
                max: max.as_secs_f64(),
            });
        }
        Ok(Self { min, max })
    }

    /// Validate bounds given in (possibly fractional) seconds.
    pub fn from_secs_f64(min: f64, max: f64) -> Result<Self, ProfileError> {
        let invalid = || ProfileError::InvalidRange { min, max };
        if min.is_nan() || max.is_nan() || min > max {
            return Err(invalid());
        }
        let lower = Duration::try_from_secs_f64(min).map_err(|_| invalid())?;
        let upper = Duration::try_from_secs_f64(max).map_err(|_| invalid())?;
        Self::between(lower, upper)
    }

    pub fn constant(wait: Duration) -> Self {
        Self {
            min: wait,
            max: wait,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draw a wait from `[min, max]`, both ends inclusive.
    ///
    /// Consumes one `u64` from `rng`: `0` maps to `min` and `u64::MAX` maps to `max`.
    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> Duration {
        let span = (self.max - self.min).as_nanos();
        let x = rng.next_u64() as u128;
        if span == 0 {
            return self.min;
        }

        let offset = match span.checked_mul(x) {
            Some(product) => product / u64::MAX as u128,
            None => span / u64::MAX as u128 * x,
        };
        self.min + duration_from_nanos(offset.min(span))
    }
}

impl Default for ThinkTime {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WAIT,
            max: DEFAULT_MAX_WAIT,
        }
    }
}

impl fmt::Display for ThinkTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            humantime::format_duration(self.min),
            humantime::format_duration(self.max)
        )
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = (nanos / NANOS_PER_SEC).min(u64::MAX as u128) as u64;
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}
