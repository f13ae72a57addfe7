use crate::arena::{EntityArena, PlaneId};
use crate::config::{ConfigError, PlaneConfig};
use crate::model::{Heading, Plane, PlaneClass};
use crate::random::RandomSource;

use super::{SpawnTimer, TrafficUpdate, pick_heading};

/// Spawns single planes into a level's plane arena, up to `max_active` at a time.
#[derive(Clone, Debug)]
pub struct PlaneSpawner {
    config: PlaneConfig,
    scene_width: f32,
    timer: SpawnTimer,
}

impl PlaneSpawner {
    pub fn new(config: PlaneConfig, scene_width: f32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, scene_width, timer: SpawnTimer::Idle })
    }

    pub fn timer(&self) -> SpawnTimer {
        self.timer
    }

    /// One frame over `planes` (normally `Level::planes`). A due timer is always re-armed,
    /// even when the cap suppresses the spawn.
    pub fn update<R: RandomSource>(
        &mut self,
        now_ms: f64,
        planes: &mut EntityArena<PlaneId, Plane>,
        rng: &mut R,
    ) -> TrafficUpdate {
        let mut update = TrafficUpdate::default();
        let (interval_ms, variance_ms) =
            (self.config.spawn_interval_ms, self.config.spawn_variance_ms);
        if self.timer.poll(now_ms, interval_ms, variance_ms, rng) {
            if planes.len() < self.config.max_active {
                planes.insert(self.spawn_plane(rng));
                update.spawned = 1;
            } else {
                log::trace!("plane spawn skipped: {} active", planes.len());
            }
        }

        for plane in planes.values_mut() {
            plane.x += plane.speed;
        }

        let (scene_width, margin) = (self.scene_width, self.config.offscreen_margin);
        update.culled = planes.retain(|plane| {
            !Heading::of_speed(plane.speed).has_exited(plane.x, scene_width, margin)
        });
        update
    }

    fn spawn_plane<R: RandomSource>(&self, rng: &mut R) -> Plane {
        let class = rng.choose(&PlaneClass::ALL).copied().unwrap_or(PlaneClass::Medium);
        let class_config = self.config.class(class);
        let heading = pick_heading(rng);
        let speed = class_config.speed.sample(rng) * heading.sign();
        let y = self.config.y_band.sample(rng);
        let x = heading.entry_x(self.scene_width, self.config.offscreen_margin);

        log::trace!("spawned {class:?} plane heading {heading:?} at y={y}");
        Plane { x, y, size: class_config.size, speed, class }
    }
}
