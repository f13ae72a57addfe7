pub mod arena;
pub mod config;
pub mod generation;
pub mod model;
pub mod navigation;
pub mod random;
pub mod traffic;

pub use arena::{BirdId, EntityArena, PlaneId};
pub use config::{ConfigError, SceneConfig};
pub use generation::{
    AcceptedLevel, BuildingGenerator, LevelGenerator, drift_clouds, generate_level,
};
pub use model::*;
pub use navigation::{NavigationPath, NavigationValidator, Platform, PlatformId, PlatformKind};
pub use random::{RandomSource, SceneRng, ScriptedSource};
pub use traffic::{BirdFlockSpawner, PlaneSpawner, SpawnTimer, TrafficUpdate};
