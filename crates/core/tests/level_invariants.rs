use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use skyline::generation::layout::validate_building_gaps;
use skyline::{CloudLayer, Level, LevelGenerator, SceneConfig, SceneRng, SkylineDepth, drift_clouds};

fn check_level(config: &SceneConfig, level: &Level, max_height: f32) -> Result<(), String> {
    let level_config = &config.level;

    if !validate_building_gaps(&level.buildings, level_config.min_building_gap) {
        return Err(format!("gap rule violated: {:?}", level.buildings));
    }

    for building in &level.buildings {
        let rect = building.rect;
        if rect.x < 0.0 || rect.right() > level.width {
            return Err(format!("{} out of bounds: {rect:?}", building.id));
        }
        if rect.bottom() != level_config.ground_level {
            return Err(format!("{} floats above ground: {rect:?}", building.id));
        }
        if !level_config.building_widths.contains(&rect.width) {
            return Err(format!("{} has off-grid width {}", building.id, rect.width));
        }
        if building.is_tall {
            if rect.height > level_config.tall_ceiling() {
                return Err(format!("{} exceeds ceiling: {}", building.id, rect.height));
            }
        } else if !level_config.building_heights.contains(&rect.height) || rect.height > max_height
        {
            return Err(format!("{} has unexpected height {}", building.id, rect.height));
        }

        let bounds = building.local_bounds();
        let escaped = building.windows.iter().find(|window| !bounds.contains(&window.rect));
        if let Some(window) = escaped {
            return Err(format!("{} window escapes footprint: {window:?}", building.id));
        }
    }

    for cloud in &level.clouds {
        if cloud.x < 0.0 || cloud.x > level.width {
            return Err(format!("cloud outside scene: {cloud:?}"));
        }
        if !config.clouds.alpha.band(cloud.layer).contains(cloud.alpha) {
            return Err(format!("cloud alpha outside its band: {cloud:?}"));
        }
    }

    for building in &level.background {
        let layer = match building.depth {
            SkylineDepth::Far => &config.background.far,
            SkylineDepth::VeryFar => &config.background.very_far,
        };
        if building.rect.x < -layer.overscan || building.rect.x > level.width + layer.overscan {
            return Err(format!("skyline building beyond overscan: {building:?}"));
        }
    }

    Ok(())
}

#[test]
fn test_fuzz_accepted_levels_hold_invariants() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(64));
    let config = SceneConfig::default();
    let generator = LevelGenerator::new(&config).expect("defaults validate");
    let inputs = (any::<u64>(), 360.0_f32..1600.0, 0_u32..20);

    runner
        .run(&inputs, |(seed, width, difficulty)| {
            let mut rng = SceneRng::from_seed(seed);
            let accepted = generator.generate_validated_level(width, difficulty, &mut rng);
            let max_height = generator.max_height_for_difficulty(difficulty);
            check_level(&config, &accepted.level, max_height).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("accepted levels should preserve layout invariants");
}

#[test]
fn test_fuzz_overridden_config_still_terminates_with_valid_layout() {
    let config = SceneConfig::from_toml_str(
        r#"
        [level]
        min_building_gap = 260.0
        max_layout_attempts = 3
        building_count = { min = 3, max = 3 }
        "#,
    )
    .expect("override parses");
    let generator = LevelGenerator::new(&config).expect("override validates");
    let mut runner = TestRunner::new(ProptestConfig::with_cases(32));

    runner
        .run(&(any::<u64>(), 500.0_f32..900.0), |(seed, width)| {
            let mut rng = SceneRng::from_seed(seed);
            let accepted = generator.generate_validated_level(width, 3, &mut rng);
            if accepted.attempts > 3 {
                return Err(TestCaseError::fail(format!("{} attempts", accepted.attempts)));
            }
            check_level(&config, &accepted.level, generator.max_height_for_difficulty(3))
                .map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("bounded acceptance should always terminate with a valid layout");
}

#[test]
fn test_every_cloud_layer_appears_across_seeds() {
    let config = SceneConfig::default();
    let generator = LevelGenerator::new(&config).expect("defaults validate");
    let mut seen = Vec::new();
    for seed in 0..20 {
        let level = generator.generate_level(700.0, 1, &mut SceneRng::from_seed(seed));
        for cloud in &level.clouds {
            if !seen.contains(&cloud.layer) {
                seen.push(cloud.layer);
            }
        }
    }
    for layer in CloudLayer::ALL {
        assert!(seen.contains(&layer), "{layer:?} never sampled");
    }
}

#[test]
fn test_drifting_clouds_stay_within_wrap_bounds() {
    let config = SceneConfig::default();
    let generator = LevelGenerator::new(&config).expect("defaults validate");
    let mut level = generator.generate_level(700.0, 1, &mut SceneRng::from_seed(5));

    for _ in 0..20_000 {
        drift_clouds(&mut level.clouds, level.width);
        for cloud in &level.clouds {
            assert!(cloud.x >= -cloud.width && cloud.x <= level.width + cloud.width + cloud.speed);
        }
    }
}
