//! Cloud clusters scattered around sampled centers, plus their per-frame drift.

use crate::config::CloudConfig;
use crate::model::{Cloud, CloudLayer};
use crate::random::RandomSource;

pub(super) fn generate_cloud_clusters<R: RandomSource>(
    config: &CloudConfig,
    scene_width: f32,
    rng: &mut R,
) -> Vec<Cloud> {
    let mut clouds = Vec::new();
    let horizontal_spread = config.cluster_spread;
    let vertical_spread = config.cluster_spread * config.vertical_spread_factor;

    for cluster in 0..config.cluster_count {
        let center_x = rng.range_f32(0.0, scene_width);
        let center_y = config.y_range.sample(rng);
        let members = config.clouds_per_cluster.sample(rng);

        for _ in 0..members {
            let offset_x = (rng.next_unit() as f32 - 0.5) * horizontal_spread;
            let offset_y = (rng.next_unit() as f32 - 0.5) * vertical_spread;
            let layer = rng.choose(&CloudLayer::ALL).copied().unwrap_or(CloudLayer::Midground);

            clouds.push(Cloud {
                x: (center_x + offset_x).clamp(0.0, scene_width.max(0.0)),
                y: (center_y + offset_y).clamp(config.y_range.min, config.y_range.max),
                width: config.width.sample(rng),
                height: config.height,
                alpha: config.alpha.band(layer).sample(rng),
                speed: config.speed.sample(rng),
                cluster_id: cluster as u32,
                layer,
            });
        }
    }
    clouds
}

/// Advances every cloud by its speed. A cloud that has fully left the right edge re-enters
/// just beyond the left edge, so the sky never empties.
pub fn drift_clouds(clouds: &mut [Cloud], scene_width: f32) {
    for cloud in clouds {
        cloud.x += cloud.speed;
        if cloud.x > scene_width + cloud.width {
            cloud.x = -cloud.width;
        }
    }
}
