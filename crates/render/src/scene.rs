use glam::{Mat4, Quat, Vec3};
use wara_common::Transform;

use crate::config::SceneConfig;

/// A textured quad floating above the ground, spinning about +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    pub transform: Transform,
    /// Accumulated spin in degrees, kept within [0, 360).
    pub spin_degrees: f32,
    pub color: [f32; 3],
}

impl Icon {
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    fn set_spin(&mut self, degrees: f32) {
        self.spin_degrees = degrees.rem_euclid(360.0);
        self.transform.rotation = Quat::from_rotation_y(self.spin_degrees.to_radians());
    }
}

/// Ground plane plus a ring of icons centred on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    icons: Vec<Icon>,
    icon_half_size: f32,
    ground_half_extent: f32,
    spin_degrees_per_second: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

impl Scene {
    /// Lay out `icon_count` icons evenly around a ring, cycling palette colors.
    pub fn from_config(config: &SceneConfig) -> Self {
        let count = config.icon_count;
        let icons = (0..count)
            .map(|i| {
                let angle = (360.0 / count as f32 * i as f32).to_radians();
                let position = Vec3::new(
                    config.ring_radius * angle.cos(),
                    config.icon_height,
                    config.ring_radius * angle.sin(),
                );
                let color = config
                    .palette
                    .get(i % config.palette.len().max(1))
                    .copied()
                    .unwrap_or([1.0, 1.0, 1.0]);
                Icon {
                    transform: Transform::from_position(position),
                    spin_degrees: 0.0,
                    color,
                }
            })
            .collect();

        Self {
            icons,
            icon_half_size: config.icon_half_size,
            ground_half_extent: config.ground_half_extent,
            spin_degrees_per_second: config.spin_degrees_per_second,
        }
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    pub fn icon_half_size(&self) -> f32 {
        self.icon_half_size
    }

    pub fn ground_half_extent(&self) -> f32 {
        self.ground_half_extent
    }

    /// Advance every icon's spin by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let step = self.spin_degrees_per_second * dt;
        for icon in &mut self.icons {
            icon.set_spin(icon.spin_degrees + step);
        }
    }
}
