//! Level orchestration: building row, clouds and skyline composed into one [`Level`], plus
//! the bounded acceptance loop.

use std::mem;

use crate::arena::EntityArena;
use crate::config::{ConfigError, SceneConfig};
use crate::model::{BuildingId, Level};
use crate::random::RandomSource;

use super::background::generate_background_metropolis;
use super::building::BuildingGenerator;
use super::clouds::generate_cloud_clusters;
use super::layout::{
    buildings_within_bounds, ensure_navigation_gaps, plan_building_row, validate_building_gaps,
};

/// Result of [`LevelGenerator::generate_validated_level`].
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedLevel {
    pub level: Level,
    /// Candidate layouts drawn, including the accepted one.
    pub attempts: u32,
    /// True when no candidate passed and the last one was repaired instead.
    pub used_fallback: bool,
}

pub struct LevelGenerator<'a> {
    config: &'a SceneConfig,
    buildings: BuildingGenerator<'a>,
}

impl<'a> LevelGenerator<'a> {
    pub fn new(config: &'a SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, buildings: BuildingGenerator::from_validated(config) })
    }

    pub fn config(&self) -> &SceneConfig {
        self.config
    }

    pub fn max_height_for_difficulty(&self, difficulty: u32) -> f32 {
        self.config.level.max_height_for_difficulty(difficulty)
    }

    /// Draws one candidate level. The result is not checked against the gap rule; see
    /// [`LevelGenerator::validate_level`].
    pub fn generate_level<R: RandomSource>(
        &self,
        scene_width: f32,
        difficulty: u32,
        rng: &mut R,
    ) -> Level {
        let level_config = &self.config.level;
        let count = level_config.building_count.sample(rng);
        let max_height = self.max_height_for_difficulty(difficulty);

        let buildings = plan_building_row(level_config, scene_width, count)
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                let id = BuildingId(index as u32 + 1);
                self.buildings.generate(id, slot.x, slot.width, max_height, rng)
            })
            .collect();
        let clouds = generate_cloud_clusters(&self.config.clouds, scene_width, rng);
        let background = generate_background_metropolis(&self.config.background, scene_width, rng);

        Level {
            buildings,
            clouds,
            background,
            planes: EntityArena::new(),
            width: scene_width,
            height: level_config.height,
        }
    }

    /// Gap rule only: every pair of horizontally adjacent buildings keeps the minimum gap.
    pub fn validate_level(&self, level: &Level) -> bool {
        validate_building_gaps(&level.buildings, self.config.level.min_building_gap)
    }

    fn accepts(&self, level: &Level) -> bool {
        self.validate_level(level) && buildings_within_bounds(&level.buildings, level.width)
    }

    /// Rejection-samples up to `max_layout_attempts` candidates. When every candidate fails,
    /// the last one has its row repaired with [`ensure_navigation_gaps`].
    pub fn generate_validated_level<R: RandomSource>(
        &self,
        scene_width: f32,
        difficulty: u32,
        rng: &mut R,
    ) -> AcceptedLevel {
        let max_attempts = self.config.level.max_layout_attempts;
        let mut attempts = 0;
        loop {
            attempts += 1;
            let mut level = self.generate_level(scene_width, difficulty, rng);
            if self.accepts(&level) {
                log::debug!("layout accepted after {attempts} attempt(s)");
                return AcceptedLevel { level, attempts, used_fallback: false };
            }

            if attempts >= max_attempts {
                log::warn!(
                    "no valid layout for width={scene_width} difficulty={difficulty} after \
                     {attempts} attempts; repairing gaps"
                );
                level.buildings = ensure_navigation_gaps(
                    mem::take(&mut level.buildings),
                    scene_width,
                    self.config.level.min_building_gap,
                );
                return AcceptedLevel { level, attempts, used_fallback: true };
            }
        }
    }
}
