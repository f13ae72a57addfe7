mod level_file;

use anyhow::{Context, Result};
use clap::Parser;
use level_file::LevelFile;
use skyline::random::{BIRD_STREAM, PLANE_STREAM};
use skyline::{
    BirdFlockSpawner, PlaneSpawner, SceneConfig, SceneRng, drift_clouds, generate_level,
};
use std::fs;
use std::path::PathBuf;

/// Frame length used when simulating ambient traffic.
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 700.0)]
    width: f32,
    #[arg(short, long, default_value_t = 1)]
    difficulty: u32,
    /// TOML file overriding the default generation tables
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the accepted level as JSON to this path
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Simulate this many frames of clouds, birds and planes after generation
    #[arg(short, long, default_value_t = 0)]
    frames: u32,
}

fn load_config(path: Option<&PathBuf>) -> Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    SceneConfig::from_toml_str(&source)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let mut accepted = generate_level(&config, args.seed, args.width, args.difficulty)
        .context("Failed to set up level generation")?;
    let level = &accepted.level;

    println!("Level generated.");
    println!("Seed: {} Width: {} Difficulty: {}", args.seed, level.width, args.difficulty);
    println!("Attempts: {} Fallback: {}", accepted.attempts, accepted.used_fallback);
    for building in &level.buildings {
        let lit = building.windows.iter().filter(|window| window.lit).count();
        println!(
            "  {} x={:.1} width={} height={} tall={} {:?} {} windows={} lit={}",
            building.id,
            building.rect.x,
            building.rect.width,
            building.rect.height,
            building.is_tall,
            building.material,
            building.color,
            building.windows.len(),
            lit,
        );
    }
    println!("Clouds: {} Skyline: {}", level.clouds.len(), level.background.len());
    println!("Fingerprint: 0x{:016x}", level.fingerprint());

    if args.frames > 0 {
        let level = &mut accepted.level;
        let mut birds = BirdFlockSpawner::new(config.birds.clone(), level.width)?;
        let mut planes = PlaneSpawner::new(config.planes.clone(), level.width)?;
        let mut bird_rng = SceneRng::for_stream(args.seed, BIRD_STREAM);
        let mut plane_rng = SceneRng::for_stream(args.seed, PLANE_STREAM);
        let (mut flocks, mut planes_spawned) = (0, 0);

        for frame in 0..args.frames {
            let now_ms = f64::from(frame) * FRAME_MS;
            drift_clouds(&mut level.clouds, level.width);
            if birds.update(now_ms, &mut bird_rng).spawned > 0 {
                flocks += 1;
            }
            planes_spawned += planes.update(now_ms, &mut level.planes, &mut plane_rng).spawned;
        }

        println!("Simulated {} frames.", args.frames);
        println!("Flocks spawned: {} Birds alive: {}", flocks, birds.birds().len());
        println!("Planes spawned: {} Planes alive: {}", planes_spawned, level.planes.len());
    }

    if let Some(out) = &args.out {
        LevelFile::new(args.seed, args.difficulty, accepted)
            .write_atomic(out)
            .with_context(|| format!("Failed to write level file: {}", out.display()))?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}
