//! Timer-driven ambient traffic crossing the sky: bird flocks and planes.
//!
//! Spawners are advanced once per frame by the caller's clock. Nothing here owns time;
//! `now_ms` is whatever monotonic timestamp the frame loop supplies.

mod birds;
mod planes;
mod timer;

pub use birds::BirdFlockSpawner;
pub use planes::PlaneSpawner;
pub use timer::SpawnTimer;

use crate::model::Heading;
use crate::random::RandomSource;

/// What one spawner update changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrafficUpdate {
    pub spawned: usize,
    pub culled: usize,
}

fn pick_heading<R: RandomSource>(rng: &mut R) -> Heading {
    if rng.chance(0.5) { Heading::Right } else { Heading::Left }
}
