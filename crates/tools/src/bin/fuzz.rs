use anyhow::Result;
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use skyline::generation::layout::{buildings_within_bounds, validate_building_gaps};
use skyline::random::{BIRD_STREAM, PLANE_STREAM};
use skyline::{
    BirdFlockSpawner, Level, LevelGenerator, PlaneSpawner, SceneConfig, SceneRng, drift_clouds,
};

const FRAME_MS: f64 = 1000.0 / 60.0;
const WIDTHS: [f32; 5] = [360.0, 540.0, 700.0, 1024.0, 1600.0];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    levels: u32,
    #[arg(short, long, default_value_t = 3000)]
    frames: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_level(config: &SceneConfig, level: &Level) {
    let level_config = &config.level;
    assert!(
        validate_building_gaps(&level.buildings, level_config.min_building_gap),
        "Invariant failed: buildings closer than the minimum gap"
    );
    assert!(
        buildings_within_bounds(&level.buildings, level.width),
        "Invariant failed: building outside the scene"
    );
    for building in &level.buildings {
        assert!(
            building.rect.bottom() == level_config.ground_level,
            "Invariant failed: {} not standing on the ground",
            building.id
        );
        let bounds = building.local_bounds();
        assert!(
            building.windows.iter().all(|window| bounds.contains(&window.rect)),
            "Invariant failed: {} has a window outside its footprint",
            building.id
        );
    }
    for cloud in &level.clouds {
        assert!(cloud.x >= 0.0 && cloud.x <= level.width, "Invariant failed: cloud off scene");
        assert!(
            config.clouds.alpha.band(cloud.layer).contains(cloud.alpha),
            "Invariant failed: cloud alpha outside its layer band"
        );
    }
}

fn run_traffic(
    config: &SceneConfig,
    level: &mut Level,
    seed: u64,
    frames: u32,
) -> Result<(usize, usize)> {
    let mut birds = BirdFlockSpawner::new(config.birds.clone(), level.width)?;
    let mut planes = PlaneSpawner::new(config.planes.clone(), level.width)?;
    let mut bird_rng = SceneRng::for_stream(seed, BIRD_STREAM);
    let mut plane_rng = SceneRng::for_stream(seed, PLANE_STREAM);
    let bird_reach = config.birds.offscreen_margin + config.birds.formation_spread_x;
    let (mut birds_spawned, mut planes_spawned) = (0, 0);

    for frame in 0..frames {
        let now_ms = f64::from(frame) * FRAME_MS;
        drift_clouds(&mut level.clouds, level.width);
        birds_spawned += birds.update(now_ms, &mut bird_rng).spawned;
        planes_spawned += planes.update(now_ms, &mut level.planes, &mut plane_rng).spawned;

        assert!(
            level.planes.len() <= config.planes.max_active,
            "Invariant failed: {} planes active",
            level.planes.len()
        );
        for plane in level.planes.values() {
            let speed = config.planes.class(plane.class).speed;
            assert!(speed.contains(plane.speed.abs()), "Invariant failed: plane speed");
            assert!(
                plane.x >= -config.planes.offscreen_margin - speed.max
                    && plane.x <= level.width + config.planes.offscreen_margin + speed.max,
                "Invariant failed: plane escaped culling at x={}",
                plane.x
            );
        }
        for bird in birds.birds().values() {
            let class = config.birds.class(bird.distance);
            assert!(class.speed.contains(bird.speed.abs()), "Invariant failed: bird speed");
            assert!(
                (bird.y - bird.base_y).abs() <= bird.waver_amplitude + 1e-3,
                "Invariant failed: bird wavered past its amplitude"
            );
            assert!(
                bird.x >= -bird_reach - class.speed.max
                    && bird.x <= level.width + bird_reach + class.speed.max,
                "Invariant failed: bird escaped culling at x={}",
                bird.x
            );
        }
        for cloud in &level.clouds {
            assert!(
                cloud.x >= -cloud.width && cloud.x <= level.width + cloud.width + cloud.speed,
                "Invariant failed: cloud drifted past its wrap bounds"
            );
        }
    }

    log::debug!("seed {seed}: {birds_spawned} birds, {planes_spawned} planes");
    Ok((birds_spawned, planes_spawned))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!(
        "Starting Fuzz harness on seed {} for {} levels x {} frames...",
        args.seed, args.levels, args.frames
    );
    let config = SceneConfig::default();
    let generator = LevelGenerator::new(&config)?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let (mut fallbacks, mut total_attempts) = (0, 0);
    let (mut total_birds, mut total_planes) = (0, 0);
    for _ in 0..args.levels {
        let width = choose(&mut rng, &WIDTHS);
        let difficulty = (rng.next_u64() % 16) as u32;
        let level_seed = rng.next_u64();

        let mut level_rng = SceneRng::from_seed(level_seed);
        let accepted = generator.generate_validated_level(width, difficulty, &mut level_rng);
        total_attempts += accepted.attempts;
        if accepted.used_fallback {
            log::warn!(
                "seed {level_seed} width {width} difficulty {difficulty} needed the fallback layout"
            );
            fallbacks += 1;
        }

        let mut level = accepted.level;
        check_level(&config, &level);
        let (birds, planes) = run_traffic(&config, &mut level, level_seed, args.frames)?;
        total_birds += birds;
        total_planes += planes;
    }

    println!("Levels: {} Attempts: {} Fallbacks: {}", args.levels, total_attempts, fallbacks);
    println!("Birds spawned: {} Planes spawned: {}", total_birds, total_planes);
    println!("Fuzzing completed successfully.");
    Ok(())
}
