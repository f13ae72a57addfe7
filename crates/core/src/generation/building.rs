//! Single-building generation: discrete height choice, material, color and window grid.

use crate::config::{ConfigError, LevelConfig, SceneConfig, WindowGridConfig, palette};
use crate::model::{Building, BuildingId, Rect, Window, WindowKind};
use crate::random::RandomSource;

/// Builds one foreground building at a time against a validated [`SceneConfig`].
#[derive(Clone, Copy, Debug)]
pub struct BuildingGenerator<'a> {
    config: &'a SceneConfig,
}

impl<'a> BuildingGenerator<'a> {
    pub fn new(config: &'a SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub(super) fn from_validated(config: &'a SceneConfig) -> Self {
        Self { config }
    }

    /// Generates a building whose base sits on the ground line.
    ///
    /// The height is drawn from the configured discrete set filtered to `<= max_height`;
    /// when nothing fits, the smallest configured height is used instead.
    pub fn generate<R: RandomSource>(
        &self,
        id: BuildingId,
        x: f32,
        width: f32,
        max_height: f32,
        rng: &mut R,
    ) -> Building {
        let level = &self.config.level;
        let material = rng.choose(&level.materials).copied().unwrap_or_default();
        let rolled_tall = rng.chance(level.tall_chance);
        let (height, is_tall) = select_height(level, max_height, rolled_tall, rng);
        let color = rng.choose(&level.building_colors).copied().unwrap_or(palette::CHARCOAL);

        let rect = Rect::new(x, level.ground_level - height, width, height);
        let windows = generate_window_grid(&self.config.windows, rect, rng);

        log::debug!(
            "{id}: x={x} width={width} height={height} tall={is_tall} material={material:?} \
             windows={}",
            windows.len()
        );

        Building { id, rect, windows, color, material, is_tall }
    }
}

fn select_height<R: RandomSource>(
    level: &LevelConfig,
    max_height: f32,
    rolled_tall: bool,
    rng: &mut R,
) -> (f32, bool) {
    let mut options: Vec<f32> =
        level.building_heights.iter().copied().filter(|&height| height <= max_height).collect();
    if options.is_empty() {
        let fallback = level.smallest_height();
        log::warn!("no building height fits max_height={max_height}; using {fallback}");
        options.push(fallback);
    }

    let base = options[rng.index(options.len())];
    if rolled_tall && options.len() > 1 {
        let taller = &options[options.len() / 2..];
        let boosted = taller[rng.index(taller.len())] * level.tall_multiplier;
        return (boosted.min(level.tall_ceiling()), true);
    }
    (base, false)
}

/// Column/floor arithmetic of the implicit window grid for one footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowGridLayout {
    pub columns: usize,
    pub floors: usize,
    /// Offset of the first column from the building's left edge.
    pub first_column_x: f32,
}

impl WindowGridLayout {
    pub fn for_footprint(grid: &WindowGridConfig, width: f32, height: f32) -> Self {
        let available = width - 2.0 * grid.edge_margin;
        let pitch = grid.window_width + grid.horizontal_spacing;
        let columns = (available / pitch).floor().max(0.0) as usize;
        let floors =
            ((height - grid.floor_top_margin) / grid.floor_height).floor().max(0.0) as usize;

        let block = if columns == 0 {
            0.0
        } else {
            columns as f32 * grid.window_width + (columns - 1) as f32 * grid.horizontal_spacing
        };
        let first_column_x = grid.edge_margin + (available - block) / 2.0;

        Self { columns, floors, first_column_x }
    }
}

fn generate_window_grid<R: RandomSource>(
    grid: &WindowGridConfig,
    footprint: Rect,
    rng: &mut R,
) -> Vec<Window> {
    let layout = WindowGridLayout::for_footprint(grid, footprint.width, footprint.height);
    let bounds = Rect::new(0.0, 0.0, footprint.width, footprint.height);
    let pitch = grid.window_width + grid.horizontal_spacing;

    let mut windows = Vec::with_capacity(layout.columns * layout.floors);
    for floor in 0..layout.floors {
        for column in 0..layout.columns {
            let rect = Rect::new(
                layout.first_column_x + column as f32 * pitch,
                grid.first_row_offset + floor as f32 * grid.floor_height,
                grid.window_width,
                grid.window_height,
            );
            // Grid arithmetic can still land a window on an edge; drop rather than clip.
            if !bounds.contains(&rect) {
                continue;
            }
            let lit = rng.chance(grid.lit_chance);
            windows.push(Window { rect, lit, kind: WindowKind::Standard });
        }
    }
    windows
}
