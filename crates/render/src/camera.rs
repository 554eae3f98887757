use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Orbit camera circling the world origin.
///
/// Orientation is stored in degrees. Yaw is unbounded and wraps through the
/// trig functions; pitch is clamped to the configured limit after every
/// mutation so the eye never reaches a pole.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    config: CameraConfig,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn new(config: CameraConfig) -> Self {
        let mut camera = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: config.initial_distance,
            config,
        };
        camera.reset();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Set yaw and pitch directly. Pitch is clamped.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.clamp_pitch();
    }

    /// Set the orbit radius.
    ///
    /// The radius is clamped to `[min_distance, max_distance]`, so the eye
    /// only moves farther with `distance` inside the zoom range. Widen the
    /// range in the config to place the camera outside it.
    pub fn set_distance(&mut self, distance: f32) {
        let (min, max) = self.distance_range();
        self.distance = distance.clamp(min, max);
    }

    /// Apply a drag of `(dx, dy)` pixels.
    ///
    /// Dragging right increases yaw; dragging up (negative `dy` in screen
    /// space) increases pitch. The caller decides whether a drag is active.
    pub fn handle_drag(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.config.sensitivity;
        self.pitch -= dy * self.config.sensitivity;
        self.clamp_pitch();
        tracing::trace!(yaw = self.yaw, pitch = self.pitch, "orbit");
    }

    /// Scale the orbit radius by `1 - lines * zoom_step`. Positive `lines`
    /// (scrolling up) moves the eye closer.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - lines * self.config.zoom_step).max(0.0);
        self.set_distance(self.distance * factor);
        tracing::trace!(distance = self.distance, "zoom");
    }

    /// Return to the configured initial orientation and distance.
    pub fn reset(&mut self) {
        self.set_orientation(
            self.config.initial_yaw_degrees,
            self.config.initial_pitch_degrees,
        );
        self.set_distance(self.config.initial_distance);
    }

    /// Eye position on the sphere of radius `distance` around the origin.
    pub fn eye_position(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            self.distance * pitch.cos() * yaw.cos(),
            self.distance * pitch.sin(),
            self.distance * pitch.cos() * yaw.sin(),
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), Vec3::ZERO, Vec3::Y)
    }

    /// Right-handed perspective with wgpu's [0, 1] depth range.
    ///
    /// `aspect_ratio` must be > 0; clamp the framebuffer size before calling.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_y_degrees.to_radians(),
            aspect_ratio,
            self.config.near,
            self.config.far,
        )
    }

    /// Combined `projection * view` for column vectors.
    pub fn view_proj(&self, aspect_ratio: f32) -> Mat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }

    fn clamp_pitch(&mut self) {
        let limit = self.pitch_limit();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    // Config fields are public and may skip `validate()`; bounds fed to
    // `f32::clamp` must be ordered and not NaN.
    fn pitch_limit(&self) -> f32 {
        let limit = self.config.pitch_limit_degrees;
        if (0.0..90.0).contains(&limit) {
            limit
        } else {
            CameraConfig::default().pitch_limit_degrees
        }
    }

    fn distance_range(&self) -> (f32, f32) {
        let defaults = CameraConfig::default();
        let min = match self.config.min_distance {
            d if d.is_finite() && d > 0.0 => d,
            _ => defaults.min_distance,
        };
        let max = match self.config.max_distance {
            d if d.is_finite() && d > 0.0 => d,
            _ => defaults.max_distance,
        };
        (min.min(max), min.max(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn level_camera() -> OrbitCamera {
        let mut cam = OrbitCamera::default();
        cam.set_orientation(-90.0, 0.0);
        cam
    }

    #[test]
    fn default_camera() {
        let cam = OrbitCamera::default();
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), -20.0);
        assert_eq!(cam.distance(), 5.0);
        let vp = cam.view_proj(4.0 / 3.0);
        assert!(vp.is_finite());
    }

    #[test]
    fn horizontal_drag_changes_only_yaw() {
        let mut cam = level_camera();
        cam.handle_drag(10.0, 0.0);
        assert!((cam.yaw() - -89.0).abs() < EPS);
        assert_eq!(cam.pitch(), 0.0);

        cam.handle_drag(-35.0, 0.0);
        assert!((cam.yaw() - -92.5).abs() < EPS);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn vertical_drag_changes_only_pitch() {
        let mut cam = level_camera();
        cam.handle_drag(0.0, -50.0);
        assert!((cam.pitch() - 5.0).abs() < EPS);
        assert_eq!(cam.yaw(), -90.0);

        cam.handle_drag(0.0, 120.0);
        assert!((cam.pitch() - -7.0).abs() < EPS);
        assert_eq!(cam.yaw(), -90.0);
    }

    #[test]
    fn pitch_clamps_at_poles() {
        let mut cam = level_camera();
        cam.handle_drag(0.0, -10_000.0);
        assert_eq!(cam.pitch(), 89.0);
        cam.handle_drag(0.0, 100_000.0);
        assert_eq!(cam.pitch(), -89.0);
    }

    #[test]
    fn pitch_stays_in_range_for_any_drag_sequence() {
        let mut cam = OrbitCamera::default();
        let deltas = [
            (3.0, -400.0),
            (-12.5, 900.0),
            (0.0, -2_000.0),
            (55.0, 13.0),
            (-1.0, 1_781.0),
            (7.0, -0.5),
        ];
        for _ in 0..50 {
            for &(dx, dy) in &deltas {
                cam.handle_drag(dx, dy);
                assert!((-89.0..=89.0).contains(&cam.pitch()));
            }
        }
    }

    #[test]
    fn view_proj_is_pure() {
        let mut cam = OrbitCamera::default();
        cam.handle_drag(37.0, -12.0);
        let a = cam.view_proj(16.0 / 9.0);
        let b = cam.view_proj(16.0 / 9.0);
        assert_eq!(a, b);
    }

    #[test]
    fn reference_eye_position() {
        let cam = level_camera();
        let eye = cam.eye_position();
        assert!(eye.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), EPS));

        // The origin sits straight ahead of the eye, 5 units down the view axis.
        let target_in_view = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(target_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), EPS));
    }

    #[test]
    fn eye_scales_linearly_with_distance() {
        let mut cam = OrbitCamera::default();
        cam.handle_drag(123.0, 45.0);
        let near_eye = cam.eye_position();
        cam.set_distance(10.0);
        let far_eye = cam.eye_position();
        assert!(far_eye.abs_diff_eq(near_eye * 2.0, EPS));
        assert!(far_eye.length() > near_eye.length());
        assert!(far_eye.normalize().abs_diff_eq(near_eye.normalize(), EPS));
    }

    #[test]
    fn clip_planes_map_to_depth_range() {
        let cam = OrbitCamera::default();
        let vp = cam.view_proj(1.5);
        let eye = cam.eye_position();
        let forward = -eye.normalize();

        let near_center = vp.project_point3(eye + forward * 0.1);
        assert!(near_center.abs_diff_eq(Vec3::ZERO, EPS));

        let far_center = vp.project_point3(eye + forward * 100.0);
        assert!((far_center.z - 1.0).abs() < EPS);
    }

    #[test]
    fn projection_matches_field_of_view() {
        let cam = OrbitCamera::default();
        let aspect = 2.0;
        let proj = cam.projection_matrix(aspect);
        let half_fov = 22.5_f32.to_radians().tan();
        let z = 10.0;

        let top = proj.project_point3(Vec3::new(0.0, half_fov * z, -z));
        assert!((top.y - 1.0).abs() < EPS);

        let right = proj.project_point3(Vec3::new(aspect * half_fov * z, 0.0, -z));
        assert!((right.x - 1.0).abs() < EPS);
    }

    #[test]
    fn yaw_wraps_without_failure() {
        let mut cam = OrbitCamera::default();
        for _ in 0..1_000 {
            cam.handle_drag(100.0, 0.0);
        }
        assert!(cam.yaw() > 360.0);
        assert!(cam.view_proj(1.0).is_finite());
        assert!((cam.eye_position().length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_clamps_to_configured_range() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1.0);
        assert!((cam.distance() - 4.5).abs() < EPS);
        cam.zoom(100.0);
        assert_eq!(cam.distance(), 1.0);
        for _ in 0..200 {
            cam.zoom(-1.0);
        }
        assert_eq!(cam.distance(), 50.0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut cam = OrbitCamera::default();
        cam.handle_drag(400.0, 300.0);
        cam.zoom(3.0);
        cam.reset();
        assert_eq!(cam, OrbitCamera::default());
    }

    #[test]
    fn initial_pitch_outside_limit_is_clamped() {
        let cam = OrbitCamera::new(CameraConfig {
            initial_pitch_degrees: 120.0,
            ..CameraConfig::default()
        });
        assert_eq!(cam.pitch(), 89.0);
    }

    #[test]
    fn inverted_distance_range_is_reordered() {
        let mut cam = OrbitCamera::new(CameraConfig {
            min_distance: 10.0,
            max_distance: 1.0,
            ..CameraConfig::default()
        });
        assert_eq!(cam.distance(), 5.0);
        cam.set_distance(100.0);
        assert_eq!(cam.distance(), 10.0);
        cam.set_distance(0.0);
        assert_eq!(cam.distance(), 1.0);
    }

    #[test]
    fn unusable_distance_bounds_fall_back_to_defaults() {
        let mut cam = OrbitCamera::new(CameraConfig {
            min_distance: f32::NAN,
            max_distance: -3.0,
            ..CameraConfig::default()
        });
        cam.set_distance(1000.0);
        assert_eq!(cam.distance(), 50.0);
        cam.set_distance(0.0);
        assert_eq!(cam.distance(), 1.0);
    }

    #[test]
    fn unusable_pitch_limit_falls_back_to_default() {
        for limit in [f32::NAN, -10.0, 90.0, f32::INFINITY] {
            let mut cam = OrbitCamera::new(CameraConfig {
                pitch_limit_degrees: limit,
                ..CameraConfig::default()
            });
            assert_eq!(cam.pitch(), -20.0);
            cam.handle_drag(0.0, -10_000.0);
            assert_eq!(cam.pitch(), 89.0, "limit {limit}");
        }
    }
}
