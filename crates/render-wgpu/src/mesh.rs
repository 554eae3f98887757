use bytemuck::{Pod, Zeroable};
use wara_render::Scene;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub tint_strength: f32,
    pub _padding: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct GroundVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct IconInstance {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub tint: [f32; 4],
}

/// Ground color in sRGB, as authored.
pub(crate) const GROUND_COLOR: [f32; 4] = [0.80, 0.82, 0.88, 1.0];

/// Decode one sRGB channel to linear.
pub(crate) fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert an sRGB color for output to a surface.
///
/// An sRGB surface encodes on write, so shader outputs must be linear. Other
/// surfaces store values as given. Alpha is never converted.
pub(crate) fn surface_color(srgb: [f32; 4], srgb_surface: bool) -> [f32; 4] {
    if !srgb_surface {
        return srgb;
    }
    let [r, g, b, a] = srgb;
    [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
}

/// Flat square at y = 0 spanning `[-half_extent, half_extent]` in x and z.
pub(crate) fn ground_mesh(half_extent: f32, color: [f32; 4]) -> Vec<GroundVertex> {
    let e = half_extent;
    #[rustfmt::skip]
    let corners = [
        [-e, 0.0, -e], [ e, 0.0, -e], [ e, 0.0,  e],
        [-e, 0.0, -e], [ e, 0.0,  e], [-e, 0.0,  e],
    ];
    corners
        .into_iter()
        .map(|position| GroundVertex { position, color })
        .collect()
}

/// Square in the local XY plane centred on the origin.
///
/// Texture row 0 is the top of the image, so the top edge gets v = 0.
pub(crate) fn quad_mesh(half_size: f32) -> Vec<QuadVertex> {
    let h = half_size;
    #[rustfmt::skip]
    let vertices = vec![
        QuadVertex { position: [-h,  h, 0.0], uv: [0.0, 0.0] },
        QuadVertex { position: [ h,  h, 0.0], uv: [1.0, 0.0] },
        QuadVertex { position: [ h, -h, 0.0], uv: [1.0, 1.0] },
        QuadVertex { position: [-h,  h, 0.0], uv: [0.0, 0.0] },
        QuadVertex { position: [ h, -h, 0.0], uv: [1.0, 1.0] },
        QuadVertex { position: [-h, -h, 0.0], uv: [0.0, 1.0] },
    ];
    vertices
}

/// Per-icon model matrix and tint, in scene order.
pub(crate) fn icon_instances(scene: &Scene, srgb_surface: bool) -> Vec<IconInstance> {
    scene
        .icons()
        .iter()
        .map(|icon| {
            let cols = icon.model_matrix().to_cols_array_2d();
            let [r, g, b] = icon.color;
            IconInstance {
                model_0: cols[0],
                model_1: cols[1],
                model_2: cols[2],
                model_3: cols[3],
                tint: surface_color([r, g, b, 1.0], srgb_surface),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn uniforms_match_wgsl_layout() {
        // mat4x4<f32> + f32, rounded up to the struct's 16-byte alignment.
        assert_eq!(std::mem::size_of::<Uniforms>(), 80);
    }

    #[test]
    fn ground_covers_extent_at_zero_height() {
        let verts = ground_mesh(5.0, GROUND_COLOR);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert_eq!(v.position[1], 0.0);
            assert_eq!(v.position[0].abs(), 5.0);
            assert_eq!(v.position[2].abs(), 5.0);
            assert_eq!(v.color, GROUND_COLOR);
        }
    }

    #[test]
    fn quad_is_centered_with_full_uv_range() {
        let verts = quad_mesh(0.3);
        assert_eq!(verts.len(), 6);
        for v in &verts {
            assert!((v.position[0].abs() - 0.3).abs() < 1e-6);
            assert!((v.position[1].abs() - 0.3).abs() < 1e-6);
            assert_eq!(v.position[2], 0.0);
            // Top edge samples the first texture row.
            let expected_v = if v.position[1] > 0.0 { 0.0 } else { 1.0 };
            assert_eq!(v.uv[1], expected_v);
        }
    }

    #[test]
    fn instances_follow_scene_icons() {
        let mut scene = Scene::default();
        scene.update(0.25);
        let instances = icon_instances(&scene, false);
        assert_eq!(instances.len(), scene.icons().len());

        for (instance, icon) in instances.iter().zip(scene.icons()) {
            let model = Mat4::from_cols_array_2d(&[
                instance.model_0,
                instance.model_1,
                instance.model_2,
                instance.model_3,
            ]);
            assert_eq!(model, icon.model_matrix());
            assert_eq!(&instance.tint[..3], &icon.color[..]);
            assert_eq!(instance.tint[3], 1.0);
        }
    }

    #[test]
    fn srgb_decode_endpoints_and_midpoint() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_to_linear(0.5) - 0.2140).abs() < 1e-4);
        // Linear segment near black.
        assert!((srgb_to_linear(0.04) - 0.04 / 12.92).abs() < 1e-7);
    }

    #[test]
    fn surface_color_linearizes_only_for_srgb_surfaces() {
        let clear = [0.976, 0.965, 1.0, 1.0];
        assert_eq!(surface_color(clear, false), clear);

        let linear = surface_color(clear, true);
        assert!(linear[0] < clear[0] && linear[1] < clear[1]);
        assert!((linear[0] - 0.9465).abs() < 1e-3);
        assert!((linear[2] - 1.0).abs() < 1e-6);
        assert_eq!(linear[3], 1.0);
    }

    #[test]
    fn tints_are_linear_on_srgb_surfaces() {
        let scene = Scene::default();
        for (instance, icon) in icon_instances(&scene, true).iter().zip(scene.icons()) {
            for (c, s) in instance.tint.iter().zip(icon.color) {
                assert!((c - srgb_to_linear(s)).abs() < 1e-6);
            }
        }
    }
}
