//! Decorative two-layer skyline behind the playable buildings.

use crate::config::{BackgroundConfig, SkylineLayerConfig, palette};
use crate::model::{BackgroundBuilding, BackgroundWindow, Rect, SkylineDepth};
use crate::random::RandomSource;

pub(super) fn generate_background_metropolis<R: RandomSource>(
    config: &BackgroundConfig,
    scene_width: f32,
    rng: &mut R,
) -> Vec<BackgroundBuilding> {
    let mut skyline = Vec::with_capacity(config.far.count + config.very_far.count);
    let layers = [(SkylineDepth::Far, &config.far), (SkylineDepth::VeryFar, &config.very_far)];
    for (depth, layer) in layers {
        for _ in 0..layer.count {
            let building =
                generate_skyline_building(layer, depth, config.horizon_y, scene_width, rng);
            skyline.push(building);
        }
    }
    skyline
}

fn generate_skyline_building<R: RandomSource>(
    layer: &SkylineLayerConfig,
    depth: SkylineDepth,
    horizon_y: f32,
    scene_width: f32,
    rng: &mut R,
) -> BackgroundBuilding {
    let width = layer.width.sample(rng);
    let height = layer.height.sample(rng);
    let x = rng.range_f32(-layer.overscan, scene_width + layer.overscan);
    let color = rng.choose(&layer.colors).copied().unwrap_or(palette::NIGHT_PURPLE);
    let rect = Rect::new(x, horizon_y - height, width, height);

    let windows =
        rng.chance(layer.window_chance).then(|| generate_skyline_windows(layer, rect, rng));

    BackgroundBuilding { rect, color, alpha: layer.alpha, depth, windows }
}

fn generate_skyline_windows<R: RandomSource>(
    layer: &SkylineLayerConfig,
    footprint: Rect,
    rng: &mut R,
) -> Vec<BackgroundWindow> {
    let margin = layer.window_margin;
    let available = footprint.width - 2.0 * margin;
    let pitch = layer.window_width + layer.window_spacing;
    let columns = (available / pitch).floor();
    if columns < 1.0 {
        return Vec::new();
    }
    let columns = columns as usize;

    let block = columns as f32 * layer.window_width + (columns - 1) as f32 * layer.window_spacing;
    let first_column_x = margin + (available - block) / 2.0;
    let floor_height = layer.window_height + layer.window_spacing + layer.floor_slab;
    let floors = ((footprint.height - 2.0 * margin) / floor_height).floor().max(0.0) as usize;
    let bounds = Rect::new(0.0, 0.0, footprint.width, footprint.height);

    let mut windows = Vec::with_capacity(columns * floors);
    for floor in 0..floors {
        for column in 0..columns {
            let rect = Rect::new(
                first_column_x + column as f32 * pitch,
                margin + floor as f32 * floor_height,
                layer.window_width,
                layer.window_height,
            );
            if bounds.contains(&rect) {
                windows.push(BackgroundWindow { rect, lit: rng.chance(layer.lit_chance) });
            }
        }
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SceneRng, ScriptedSource};

    #[test]
    fn both_depth_classes_are_populated_in_order() {
        let config = BackgroundConfig::default();
        let skyline = generate_background_metropolis(&config, 700.0, &mut SceneRng::from_seed(5));

        assert_eq!(skyline.len(), config.far.count + config.very_far.count);
        let (far, very_far) = skyline.split_at(config.far.count);
        assert!(far.iter().all(|building| building.depth == SkylineDepth::Far));
        assert!(very_far.iter().all(|building| building.depth == SkylineDepth::VeryFar));
        assert!(far.iter().all(|building| building.alpha == config.far.alpha));
        assert!(very_far.iter().all(|building| building.alpha == config.very_far.alpha));
    }

    #[test]
    fn skyline_buildings_stand_on_horizon_within_overscan() {
        let config = BackgroundConfig::default();
        let mut rng = SceneRng::from_seed(77);
        for _ in 0..20 {
            for building in generate_background_metropolis(&config, 700.0, &mut rng) {
                let layer = match building.depth {
                    SkylineDepth::Far => &config.far,
                    SkylineDepth::VeryFar => &config.very_far,
                };
                assert!((building.rect.bottom() - config.horizon_y).abs() < 1e-3);
                assert!(building.rect.x >= -layer.overscan);
                assert!(building.rect.x <= 700.0 + layer.overscan);
                assert!(layer.width.contains(building.rect.width));
                assert!(layer.height.contains(building.rect.height));
                assert!(layer.colors.contains(&building.color));
            }
        }
    }

    #[test]
    fn skyline_windows_stay_inside_their_building() {
        let config = BackgroundConfig::default();
        let mut rng = SceneRng::from_seed(2_024);
        let mut windowed = 0;
        for _ in 0..20 {
            for building in generate_background_metropolis(&config, 700.0, &mut rng) {
                let Some(windows) = &building.windows else { continue };
                windowed += 1;
                let bounds = Rect::new(0.0, 0.0, building.rect.width, building.rect.height);
                for window in windows {
                    assert!(bounds.contains(&window.rect), "{window:?} escapes {bounds:?}");
                }
            }
        }
        assert!(windowed > 0, "expected at least one windowed skyline building");
    }

    #[test]
    fn failed_window_roll_leaves_building_without_windows() {
        let layer = BackgroundConfig::default().far;
        let building = generate_skyline_building(
            &layer,
            SkylineDepth::Far,
            260.0,
            700.0,
            &mut ScriptedSource::constant(0.99),
        );
        assert_eq!(building.windows, None);
    }

    #[test]
    fn window_grid_fills_wide_skyline_building() {
        let layer = BackgroundConfig::default().far;
        // width 36 -> 32 available / 7 pitch = 4 columns; height 100 -> 96 / 10 = 9 floors.
        let windows = generate_skyline_windows(
            &layer,
            Rect::new(0.0, 160.0, 36.0, 100.0),
            &mut ScriptedSource::constant(0.5),
        );
        assert_eq!(windows.len(), 36);
        assert!(windows.iter().all(|window| !window.lit));
    }
}
