//! Read-only generation tables, their shipped defaults, and the TOML override loader.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{BirdDistance, CloudLayer, Color, Material, PlaneClass};
use crate::random::RandomSource;

/// Sky, sunset, horizon and cloud colors.
pub mod palette {
    use crate::model::Color;

    pub const CREAM: Color = Color(0xffd89a);
    pub const SUNSET_GOLD: Color = Color(0xf5ba2e);
    pub const SUNSET_ORANGE: Color = Color(0xfa782d);
    pub const SUNSET_RED: Color = Color(0xdf4d3e);
    pub const DEEP_RED: Color = Color(0xbc4241);
    pub const DUSK_PURPLE: Color = Color(0x97374a);
    pub const TWILIGHT_PURPLE: Color = Color(0x7c4b61);
    pub const NIGHT_PURPLE: Color = Color(0x63395d);

    pub const DARK_PURPLE_GRAY: Color = Color(0x372a3b);
    pub const OLIVE_GREEN: Color = Color(0x777b3c);
    pub const DARK_OLIVE: Color = Color(0x545225);
    pub const FOREST_GREEN: Color = Color(0x384024);
    pub const DEEP_FOREST: Color = Color(0x1d2d22);
    pub const DARK_TEAL: Color = Color(0x0b1f2a);
    pub const DARK_BROWN: Color = Color(0x291911);
    pub const BROWN: Color = Color(0x522e20);
    pub const DARK_GRAY: Color = Color(0x252526);
    pub const CHARCOAL: Color = Color(0x1f1f1f);
    pub const ALMOST_BLACK: Color = Color(0x141414);

    /// Building fills.
    pub const ENVIRONMENT: [Color; 11] = [
        DARK_PURPLE_GRAY,
        OLIVE_GREEN,
        DARK_OLIVE,
        FOREST_GREEN,
        DEEP_FOREST,
        DARK_TEAL,
        DARK_BROWN,
        BROWN,
        DARK_GRAY,
        CHARCOAL,
        ALMOST_BLACK,
    ];
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("{name} must not be empty")]
    EmptySet { name: &'static str },

    #[error("{name} must be sorted in strictly ascending order")]
    NotAscending { name: &'static str },

    #[error("{name} range is inverted: min {min} > max {max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("max_layout_attempts must be at least 1")]
    ZeroAttempts,

    #[error("tall building ceiling {ceiling} rises above the ground level {ground_level}")]
    CeilingAboveGround { ceiling: f32, ground_level: f32 },
}

/// Closed float interval sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: RandomSource>(self, rng: &mut R) -> f32 {
        rng.range_f32(self.min, self.max)
    }

    pub fn contains(self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max || self.min.is_nan() || self.max.is_nan() {
            return Err(ConfigError::InvalidRange { name, min: self.min, max: self.max });
        }
        Ok(())
    }
}

/// Inclusive integer range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn sample<R: RandomSource>(self, rng: &mut R) -> usize {
        rng.range_usize(self.min, self.max)
    }

    pub fn contains(self, value: usize) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min as f32,
                max: self.max as f32,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub level: LevelConfig,
    pub windows: WindowGridConfig,
    pub clouds: CloudConfig,
    pub background: BackgroundConfig,
    pub birds: BirdConfig,
    pub planes: PlaneConfig,
    pub navigation: NavigationConfig,
}

impl SceneConfig {
    /// Parses a (possibly partial) TOML table on top of the defaults and validates it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        self.windows.validate()?;
        self.clouds.validate()?;
        self.background.validate()?;
        self.birds.validate()?;
        self.planes.validate()?;
        self.navigation.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Height of the rendered scene.
    pub height: f32,
    /// Ground line every foreground building stands on.
    pub ground_level: f32,
    /// Allowed building widths, ascending.
    pub building_widths: Vec<f32>,
    /// Allowed building heights, ascending.
    pub building_heights: Vec<f32>,
    pub min_building_height: f32,
    pub max_building_height: f32,
    /// Extra height allowance per difficulty step.
    pub height_per_difficulty: f32,
    pub building_count: CountRange,
    /// Share of the level width reserved for gaps.
    pub gap_fraction: f32,
    pub min_building_gap: f32,
    pub tall_chance: f32,
    pub tall_multiplier: f32,
    /// Space kept free above the tallest boosted building.
    pub top_margin: f32,
    pub materials: Vec<Material>,
    pub building_colors: Vec<Color>,
    pub max_layout_attempts: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            height: 300.0,
            ground_level: 280.0,
            building_widths: vec![64.0, 96.0, 128.0, 192.0, 224.0],
            building_heights: vec![60.0, 85.0, 110.0, 135.0, 160.0, 185.0, 210.0],
            min_building_height: 60.0,
            max_building_height: 210.0,
            height_per_difficulty: 30.0,
            building_count: CountRange::new(2, 3),
            gap_fraction: 0.3,
            min_building_gap: 80.0,
            tall_chance: 0.3,
            tall_multiplier: 1.5,
            top_margin: 20.0,
            materials: vec![Material::Plain, Material::Brick, Material::Concrete],
            building_colors: palette::ENVIRONMENT.to_vec(),
            max_layout_attempts: 16,
        }
    }
}

impl LevelConfig {
    /// Hard ceiling for boosted buildings.
    pub fn tall_ceiling(&self) -> f32 {
        self.height - self.top_margin
    }

    pub fn smallest_height(&self) -> f32 {
        self.building_heights.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn smallest_width(&self) -> f32 {
        self.building_widths.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Height cap for a difficulty step.
    pub fn max_height_for_difficulty(&self, difficulty: u32) -> f32 {
        self.max_building_height
            .min(self.min_building_height + difficulty as f32 * self.height_per_difficulty)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("level.height", self.height)?;
        positive("level.ground_level", self.ground_level)?;
        ascending("level.building_widths", &self.building_widths)?;
        ascending("level.building_heights", &self.building_heights)?;
        positive("level.building_widths", self.smallest_width())?;
        positive("level.building_heights", self.smallest_height())?;
        Span::new(self.min_building_height, self.max_building_height)
            .check("level.building_height")?;
        self.building_count.check("level.building_count")?;
        if self.building_count.min == 0 {
            return Err(ConfigError::NonPositive { name: "level.building_count.min", value: 0.0 });
        }
        probability("level.gap_fraction", self.gap_fraction)?;
        probability("level.tall_chance", self.tall_chance)?;
        positive("level.tall_multiplier", self.tall_multiplier)?;
        if self.tall_ceiling() > self.ground_level {
            return Err(ConfigError::CeilingAboveGround {
                ceiling: self.tall_ceiling(),
                ground_level: self.ground_level,
            });
        }
        if self.materials.is_empty() {
            return Err(ConfigError::EmptySet { name: "level.materials" });
        }
        if self.building_colors.is_empty() {
            return Err(ConfigError::EmptySet { name: "level.building_colors" });
        }
        if self.max_layout_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

/// Implicit window grid applied to foreground buildings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowGridConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub horizontal_spacing: f32,
    /// Floor-to-floor distance.
    pub floor_height: f32,
    pub edge_margin: f32,
    /// Roof allowance subtracted before counting floors.
    pub floor_top_margin: f32,
    /// Distance from the roof to the first window row.
    pub first_row_offset: f32,
    pub lit_chance: f32,
}

impl Default for WindowGridConfig {
    fn default() -> Self {
        Self {
            window_width: 12.0,
            window_height: 16.0,
            horizontal_spacing: 8.0,
            floor_height: 25.0,
            edge_margin: 8.0,
            floor_top_margin: 10.0,
            first_row_offset: 8.0,
            lit_chance: 0.5,
        }
    }
}

impl WindowGridConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("windows.window_width", self.window_width)?;
        positive("windows.window_height", self.window_height)?;
        positive("windows.floor_height", self.floor_height)?;
        positive("windows.column_pitch", self.window_width + self.horizontal_spacing)?;
        probability("windows.lit_chance", self.lit_chance)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub cluster_count: usize,
    pub clouds_per_cluster: CountRange,
    pub cluster_spread: f32,
    /// Vertical spread as a fraction of the horizontal spread.
    pub vertical_spread_factor: f32,
    pub y_range: Span,
    pub width: Span,
    pub height: f32,
    pub speed: Span,
    pub alpha: CloudAlphaBands,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            cluster_count: 4,
            clouds_per_cluster: CountRange::new(2, 5),
            cluster_spread: 120.0,
            vertical_spread_factor: 0.6,
            y_range: Span::new(20.0, 120.0),
            width: Span::new(40.0, 90.0),
            height: 20.0,
            speed: Span::new(0.05, 0.25),
            alpha: CloudAlphaBands::default(),
        }
    }
}

impl CloudConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.clouds_per_cluster.check("clouds.clouds_per_cluster")?;
        self.y_range.check("clouds.y_range")?;
        self.width.check("clouds.width")?;
        self.speed.check("clouds.speed")?;
        positive("clouds.height", self.height)?;
        for layer in CloudLayer::ALL {
            let band = self.alpha.band(layer);
            band.check("clouds.alpha")?;
            probability("clouds.alpha.min", band.min)?;
            probability("clouds.alpha.max", band.max)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudAlphaBands {
    pub background: Span,
    pub midground: Span,
    pub foreground: Span,
}

impl Default for CloudAlphaBands {
    fn default() -> Self {
        Self {
            background: Span::new(0.2, 0.35),
            midground: Span::new(0.35, 0.55),
            foreground: Span::new(0.55, 0.8),
        }
    }
}

impl CloudAlphaBands {
    pub fn band(&self, layer: CloudLayer) -> Span {
        match layer {
            CloudLayer::Background => self.background,
            CloudLayer::Midground => self.midground,
            CloudLayer::Foreground => self.foreground,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Line the skyline buildings stand on.
    pub horizon_y: f32,
    pub far: SkylineLayerConfig,
    pub very_far: SkylineLayerConfig,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            horizon_y: 260.0,
            far: SkylineLayerConfig {
                count: 14,
                width: Span::new(30.0, 70.0),
                height: Span::new(60.0, 140.0),
                alpha: 0.55,
                colors: vec![
                    palette::TWILIGHT_PURPLE,
                    palette::NIGHT_PURPLE,
                    palette::DUSK_PURPLE,
                ],
                window_chance: 0.4,
                window_spacing: 4.0,
                window_width: 3.0,
                window_height: 4.0,
                window_margin: 2.0,
                floor_slab: 2.0,
                lit_chance: 0.4,
                overscan: 100.0,
            },
            very_far: SkylineLayerConfig {
                count: 18,
                width: Span::new(20.0, 50.0),
                height: Span::new(40.0, 110.0),
                alpha: 0.35,
                colors: vec![palette::SUNSET_RED, palette::DEEP_RED, palette::DUSK_PURPLE],
                window_chance: 0.2,
                window_spacing: 5.0,
                window_width: 2.0,
                window_height: 3.0,
                window_margin: 2.0,
                floor_slab: 2.0,
                lit_chance: 0.4,
                overscan: 200.0,
            },
        }
    }
}

impl BackgroundConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.far.validate("background.far")?;
        self.very_far.validate("background.very_far")
    }
}

/// One depth class of the decorative skyline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkylineLayerConfig {
    pub count: usize,
    pub width: Span,
    pub height: Span,
    pub alpha: f32,
    pub colors: Vec<Color>,
    pub window_chance: f32,
    pub window_spacing: f32,
    pub window_width: f32,
    pub window_height: f32,
    pub window_margin: f32,
    /// Structure between window rows.
    pub floor_slab: f32,
    pub lit_chance: f32,
    /// How far buildings may be placed beyond either screen edge.
    pub overscan: f32,
}

impl SkylineLayerConfig {
    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        self.width.check(name)?;
        self.height.check(name)?;
        probability(name, self.alpha)?;
        probability(name, self.window_chance)?;
        probability(name, self.lit_chance)?;
        positive(name, self.window_width)?;
        positive(name, self.window_height)?;
        if self.count > 0 && self.colors.is_empty() {
            return Err(ConfigError::EmptySet { name });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub spawn_interval_ms: f64,
    pub spawn_variance_ms: f64,
    pub flock_size: CountRange,
    /// Horizontal scatter of flock members behind the leader.
    pub formation_spread_x: f32,
    pub formation_spread_y: f32,
    pub distance_weights: BirdDistanceWeights,
    pub far: BirdClassConfig,
    pub medium: BirdClassConfig,
    pub close: BirdClassConfig,
    pub offscreen_margin: f32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 4_000.0,
            spawn_variance_ms: 6_000.0,
            flock_size: CountRange::new(3, 7),
            formation_spread_x: 30.0,
            formation_spread_y: 15.0,
            distance_weights: BirdDistanceWeights::default(),
            far: BirdClassConfig {
                size: 2.0,
                speed: Span::new(0.3, 0.5),
                waver_amplitude: Span::new(1.0, 2.0),
                waver_frequency: Span::new(0.02, 0.04),
                y_band: Span::new(30.0, 90.0),
            },
            medium: BirdClassConfig {
                size: 3.0,
                speed: Span::new(0.5, 0.8),
                waver_amplitude: Span::new(2.0, 4.0),
                waver_frequency: Span::new(0.03, 0.05),
                y_band: Span::new(50.0, 120.0),
            },
            close: BirdClassConfig {
                size: 5.0,
                speed: Span::new(0.8, 1.2),
                waver_amplitude: Span::new(3.0, 6.0),
                waver_frequency: Span::new(0.04, 0.07),
                y_band: Span::new(70.0, 150.0),
            },
            offscreen_margin: 40.0,
        }
    }
}

impl BirdConfig {
    pub fn class(&self, distance: BirdDistance) -> &BirdClassConfig {
        match distance {
            BirdDistance::Far => &self.far,
            BirdDistance::Medium => &self.medium,
            BirdDistance::Close => &self.close,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        non_negative("birds.spawn_interval_ms", self.spawn_interval_ms)?;
        non_negative("birds.spawn_variance_ms", self.spawn_variance_ms)?;
        self.flock_size.check("birds.flock_size")?;
        let weights = self.distance_weights.as_array();
        if weights.iter().all(|&weight| weight <= 0.0) {
            return Err(ConfigError::EmptySet { name: "birds.distance_weights" });
        }
        for distance in BirdDistance::ALL {
            self.class(distance).validate()?;
        }
        Ok(())
    }
}

/// Relative odds of each bird distance class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdDistanceWeights {
    pub far: f32,
    pub medium: f32,
    pub close: f32,
}

impl Default for BirdDistanceWeights {
    fn default() -> Self {
        Self { far: 0.6, medium: 0.25, close: 0.15 }
    }
}

impl BirdDistanceWeights {
    /// Weights in [`BirdDistance::ALL`] order.
    pub fn as_array(&self) -> [f32; 3] {
        [self.far, self.medium, self.close]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BirdClassConfig {
    pub size: f32,
    pub speed: Span,
    pub waver_amplitude: Span,
    /// Phase advance per frame.
    pub waver_frequency: Span,
    pub y_band: Span,
}

impl BirdClassConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("birds.size", self.size)?;
        self.speed.check("birds.speed")?;
        self.waver_amplitude.check("birds.waver_amplitude")?;
        self.waver_frequency.check("birds.waver_frequency")?;
        self.y_band.check("birds.y_band")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    pub spawn_interval_ms: f64,
    pub spawn_variance_ms: f64,
    pub max_active: usize,
    pub y_band: Span,
    pub small: PlaneClassConfig,
    pub medium: PlaneClassConfig,
    pub large: PlaneClassConfig,
    pub offscreen_margin: f32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 15_000.0,
            spawn_variance_ms: 20_000.0,
            max_active: 2,
            y_band: Span::new(20.0, 80.0),
            small: PlaneClassConfig { size: 8.0, speed: Span::new(1.0, 1.4) },
            medium: PlaneClassConfig { size: 12.0, speed: Span::new(0.8, 1.1) },
            large: PlaneClassConfig { size: 16.0, speed: Span::new(0.5, 0.8) },
            offscreen_margin: 60.0,
        }
    }
}

impl PlaneConfig {
    pub fn class(&self, class: PlaneClass) -> &PlaneClassConfig {
        match class {
            PlaneClass::Small => &self.small,
            PlaneClass::Medium => &self.medium,
            PlaneClass::Large => &self.large,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        non_negative("planes.spawn_interval_ms", self.spawn_interval_ms)?;
        non_negative("planes.spawn_variance_ms", self.spawn_variance_ms)?;
        self.y_band.check("planes.y_band")?;
        for class in PlaneClass::ALL {
            let class_config = self.class(class);
            positive("planes.size", class_config.size)?;
            class_config.speed.check("planes.speed")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneClassConfig {
    pub size: f32,
    pub speed: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Buffer added around every building before line-of-sight tests.
    pub clearance: f32,
    pub safe_landing_clearance: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { clearance: 20.0, safe_landing_clearance: 30.0 }
    }
}

impl NavigationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("navigation.clearance", f64::from(self.clearance))?;
        positive("navigation.safe_landing_clearance", self.safe_landing_clearance)
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value: value as f32 })
    }
}

fn probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn ascending(name: &'static str, values: &[f32]) -> Result<(), ConfigError> {
    if values.is_empty() {
        return Err(ConfigError::EmptySet { name });
    }
    if let Some(&value) = values.iter().find(|value| !value.is_finite()) {
        return Err(ConfigError::NonPositive { name, value });
    }
    if values.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ConfigError::NotAscending { name });
    }
    Ok(())
}
