//! Procedural scene generation split into coherent submodules.

pub mod layout;

mod background;
mod building;
mod clouds;
mod generator;

pub use building::{BuildingGenerator, WindowGridLayout};
pub use clouds::drift_clouds;
pub use generator::{AcceptedLevel, LevelGenerator};
pub use layout::{RowSlot, ensure_navigation_gaps, plan_building_row, validate_building_gaps};

use crate::config::{ConfigError, SceneConfig};
use crate::random::{LEVEL_STREAM, SceneRng};

/// Generates and accepts a level for a run seed, drawing from the seed's level stream.
pub fn generate_level(
    config: &SceneConfig,
    seed: u64,
    scene_width: f32,
    difficulty: u32,
) -> Result<AcceptedLevel, ConfigError> {
    let generator = LevelGenerator::new(config)?;
    let mut rng = SceneRng::for_stream(seed, LEVEL_STREAM);
    Ok(generator.generate_validated_level(scene_width, difficulty, &mut rng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_level_matches_level_generator_output() {
        let config = SceneConfig::default();
        let seed = 123_u64;

        let from_helper = generate_level(&config, seed, 700.0, 2).expect("defaults validate");
        let from_generator = LevelGenerator::new(&config)
            .expect("defaults validate")
            .generate_validated_level(700.0, 2, &mut SceneRng::for_stream(seed, LEVEL_STREAM));

        assert_eq!(from_helper, from_generator);
    }
}
