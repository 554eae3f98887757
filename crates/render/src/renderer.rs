use glam::Vec3;
use wara_common::Viewport;

use crate::camera::OrbitCamera;
use crate::scene::Scene;

/// Renderer-agnostic interface.
///
/// A renderer reads the scene and the camera, then produces output. It never
/// mutates either.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene` as seen by `camera` in `viewport`.
    fn render(&self, scene: &Scene, camera: &OrbitCamera, viewport: Viewport) -> Self::Output;
}

/// Text renderer for headless inspection.
///
/// Reports the camera state and, for each icon, where its centre lands in
/// normalized device coordinates.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &OrbitCamera, viewport: Viewport) -> String {
        let aspect = viewport.aspect_ratio();
        let vp = camera.view_proj(aspect);
        let eye = camera.eye_position();

        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene ({}x{}, aspect={:.3}) ===\n",
            viewport.width, viewport.height, aspect
        ));
        out.push_str(&format!(
            "Camera: yaw={:.1} pitch={:.1} distance={:.2} eye=({:.2}, {:.2}, {:.2})\n",
            camera.yaw(),
            camera.pitch(),
            camera.distance(),
            eye.x,
            eye.y,
            eye.z
        ));
        out.push_str(&format!(
            "Ground: {0:.1}x{0:.1}\n",
            scene.ground_half_extent() * 2.0
        ));
        out.push_str(&format!("Icons: {}\n", scene.icons().len()));

        for (i, icon) in scene.icons().iter().enumerate() {
            let p = icon.transform.position;
            let clip = vp * p.extend(1.0);
            let visibility = if clip.w > 0.0 {
                let ndc = clip.truncate() / clip.w;
                if on_screen(ndc) { "visible" } else { "offscreen" }
            } else {
                "behind"
            };
            out.push_str(&format!(
                "  [{i}] pos=({:.2}, {:.2}, {:.2}) spin={:.1} {visibility}\n",
                p.x, p.y, p.z, icon.spin_degrees
            ));
        }

        out
    }
}

fn on_screen(ndc: Vec3) -> bool {
    (-1.0..=1.0).contains(&ndc.x) && (-1.0..=1.0).contains(&ndc.y) && (0.0..=1.0).contains(&ndc.z)
}
