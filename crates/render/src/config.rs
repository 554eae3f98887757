use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Orbit camera parameters. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Degrees of rotation per pixel of drag, shared by yaw and pitch.
    pub sensitivity: f32,
    /// Vertical field of view.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Pitch is clamped to `[-pitch_limit_degrees, pitch_limit_degrees]`.
    pub pitch_limit_degrees: f32,
    pub initial_yaw_degrees: f32,
    pub initial_pitch_degrees: f32,
    pub initial_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fractional distance change per scroll line.
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            pitch_limit_degrees: 89.0,
            initial_yaw_degrees: -90.0,
            initial_pitch_degrees: -20.0,
            initial_distance: 5.0,
            min_distance: 1.0,
            max_distance: 50.0,
            zoom_step: 0.1,
        }
    }
}

impl CameraConfig {
    /// Check every parameter the projection and orbit math depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("sensitivity", self.sensitivity)?;
        finite("initial_yaw_degrees", self.initial_yaw_degrees)?;
        finite("initial_pitch_degrees", self.initial_pitch_degrees)?;
        open_range("fov_y_degrees", self.fov_y_degrees, 0.0, 180.0)?;
        // 90 would put the eye on the pole, where look-at has no defined right axis.
        open_range("pitch_limit_degrees", self.pitch_limit_degrees, 0.0, 90.0)?;
        open_range("near", self.near, 0.0, f32::MAX)?;
        finite("far", self.far)?;
        if self.far <= self.near {
            return Err(ConfigError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        open_range("min_distance", self.min_distance, 0.0, f32::MAX)?;
        finite("max_distance", self.max_distance)?;
        if self.max_distance < self.min_distance {
            return Err(ConfigError::DistanceRange {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        closed_range(
            "initial_distance",
            self.initial_distance,
            self.min_distance,
            self.max_distance,
        )?;
        closed_range("zoom_step", self.zoom_step, 0.0, 0.9)?;
        Ok(())
    }
}

/// Layout of the ground plane and the ring of icons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub icon_count: usize,
    pub ring_radius: f32,
    /// Height of icon centres above the ground plane.
    pub icon_height: f32,
    /// Half the edge length of an icon quad.
    pub icon_half_size: f32,
    pub spin_degrees_per_second: f32,
    /// The ground spans `[-ground_half_extent, ground_half_extent]` in x and z.
    pub ground_half_extent: f32,
    /// Tint colors, cycled over the icons.
    pub palette: Vec<[f32; 3]>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            icon_count: 8,
            ring_radius: 3.0,
            icon_height: 1.5,
            icon_half_size: 0.3,
            spin_degrees_per_second: 50.0,
            ground_half_extent: 5.0,
            palette: vec![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 0.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [1.0, 0.5, 0.0],
                [0.5, 0.0, 1.0],
            ],
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        closed_range("ring_radius", self.ring_radius, 0.0, f32::MAX)?;
        finite("icon_height", self.icon_height)?;
        finite("spin_degrees_per_second", self.spin_degrees_per_second)?;
        open_range("icon_half_size", self.icon_half_size, 0.0, f32::MAX)?;
        open_range("ground_half_extent", self.ground_half_extent, 0.0, f32::MAX)?;
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for color in &self.palette {
            for &c in color {
                closed_range("palette", c, 0.0, 1.0)?;
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn open_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > min && value < max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn closed_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
