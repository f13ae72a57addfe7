use std::f32::consts::TAU;

use crate::arena::{BirdId, EntityArena};
use crate::config::{BirdConfig, ConfigError};
use crate::model::{Bird, BirdDistance, Heading};
use crate::random::RandomSource;

use super::{SpawnTimer, TrafficUpdate, pick_heading};

/// Spawns loose flocks on a jittered timer and flies them across the scene.
#[derive(Clone, Debug)]
pub struct BirdFlockSpawner {
    config: BirdConfig,
    scene_width: f32,
    timer: SpawnTimer,
    birds: EntityArena<BirdId, Bird>,
}

impl BirdFlockSpawner {
    /// Fails when `config` does not validate.
    pub fn new(config: BirdConfig, scene_width: f32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, scene_width, timer: SpawnTimer::Idle, birds: EntityArena::new() })
    }

    pub fn birds(&self) -> &EntityArena<BirdId, Bird> {
        &self.birds
    }

    pub fn timer(&self) -> SpawnTimer {
        self.timer
    }

    /// One frame: maybe spawn a flock, integrate every bird, cull the ones that left.
    pub fn update<R: RandomSource>(&mut self, now_ms: f64, rng: &mut R) -> TrafficUpdate {
        let mut update = TrafficUpdate::default();
        let (interval_ms, variance_ms) =
            (self.config.spawn_interval_ms, self.config.spawn_variance_ms);
        if self.timer.poll(now_ms, interval_ms, variance_ms, rng) {
            update.spawned = self.spawn_flock(rng);
        }

        for bird in self.birds.values_mut() {
            advance_bird(bird);
        }

        let (scene_width, margin) = (self.scene_width, self.config.offscreen_margin);
        update.culled = self
            .birds
            .retain(|bird| !Heading::of_speed(bird.speed).has_exited(bird.x, scene_width, margin));
        update
    }

    fn spawn_flock<R: RandomSource>(&mut self, rng: &mut R) -> usize {
        let weights = self.config.distance_weights.as_array();
        let distance = rng
            .weighted_index(&weights)
            .and_then(|index| BirdDistance::ALL.get(index).copied())
            .unwrap_or(BirdDistance::Far);
        let class = self.config.class(distance);
        let heading = pick_heading(rng);
        let speed = class.speed.sample(rng) * heading.sign();
        let flock_y = class.y_band.sample(rng);
        let entry_x = heading.entry_x(self.scene_width, self.config.offscreen_margin);
        let size = self.config.flock_size.sample(rng);

        for _ in 0..size {
            // Members trail the leader so the whole flock enters from offscreen.
            let trail = rng.range_f32(0.0, self.config.formation_spread_x);
            let half_spread_y = self.config.formation_spread_y / 2.0;
            let base_y = flock_y + rng.range_f32(-half_spread_y, half_spread_y);
            let waver_amplitude = class.waver_amplitude.sample(rng);
            let waver_frequency = class.waver_frequency.sample(rng);
            let phase = rng.range_f32(0.0, TAU);

            self.birds.insert(Bird {
                x: entry_x - heading.sign() * trail,
                y: base_y + phase.sin() * waver_amplitude,
                base_y,
                size: class.size,
                speed,
                waver_amplitude,
                waver_frequency,
                phase,
                distance,
            });
        }

        log::trace!("spawned {size} {distance:?} bird(s) heading {heading:?} at y={flock_y}");
        size
    }
}

fn advance_bird(bird: &mut Bird) {
    bird.x += bird.speed;
    bird.phase += bird.waver_frequency;
    bird.y = bird.base_y + bird.phase.sin() * bird.waver_amplitude;
}
