use crate::random::RandomSource;

/// `Idle` until first polled, then armed with the next due time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SpawnTimer {
    #[default]
    Idle,
    Armed {
        due_at_ms: f64,
    },
}

impl SpawnTimer {
    pub fn due_at_ms(self) -> Option<f64> {
        match self {
            Self::Idle => None,
            Self::Armed { due_at_ms } => Some(due_at_ms),
        }
    }

    /// Sets the next due time to `now + interval + uniform(0, variance)`.
    pub fn arm<R: RandomSource>(
        &mut self,
        now_ms: f64,
        interval_ms: f64,
        variance_ms: f64,
        rng: &mut R,
    ) {
        let due_at_ms = now_ms + interval_ms + rng.range_f64(0.0, variance_ms);
        *self = Self::Armed { due_at_ms };
    }

    /// Returns true when the timer fires at `now_ms`, re-arming it from `now_ms`.
    /// An idle timer is armed and does not fire on the same poll.
    pub fn poll<R: RandomSource>(
        &mut self,
        now_ms: f64,
        interval_ms: f64,
        variance_ms: f64,
        rng: &mut R,
    ) -> bool {
        match *self {
            Self::Idle => {
                self.arm(now_ms, interval_ms, variance_ms, rng);
                false
            }
            Self::Armed { due_at_ms } if now_ms >= due_at_ms => {
                self.arm(now_ms, interval_ms, variance_ms, rng);
                true
            }
            Self::Armed { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;

    #[test]
    fn first_poll_arms_without_firing() {
        let mut timer = SpawnTimer::default();
        let fired = timer.poll(1_000.0, 4_000.0, 6_000.0, &mut ScriptedSource::constant(0.5));
        assert!(!fired);
        assert_eq!(timer.due_at_ms(), Some(8_000.0));
    }

    #[test]
    fn fires_once_due_and_rearms_from_now() {
        let mut rng = ScriptedSource::constant(0.0);
        let mut timer = SpawnTimer::Armed { due_at_ms: 500.0 };

        assert!(!timer.poll(499.0, 100.0, 0.0, &mut rng));
        assert!(timer.poll(500.0, 100.0, 0.0, &mut rng));
        assert_eq!(timer.due_at_ms(), Some(600.0));
        assert!(!timer.poll(599.0, 100.0, 0.0, &mut rng));
    }
}
