use std::path::Path;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::error::RenderError;

/// Decoded icon pixels, RGBA8 with row 0 at the top.
pub type IconImage = RgbaImage;

/// Decode an icon image from disk into RGBA8.
pub fn load_icon_image(path: &Path) -> Result<IconImage, RenderError> {
    let img = image::open(path)
        .map_err(|source| RenderError::Texture {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(RenderError::EmptyTexture {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(
        "decoded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// White disc on a transparent background with a one-pixel soft edge.
///
/// Used when no icon texture is available; the tint colors carry the look.
pub fn placeholder_icon(size: u32) -> IconImage {
    let size = size.max(1);
    let center = size as f32 / 2.0;
    let radius = center - 1.0;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
        Rgba([255, 255, 255, (coverage * 255.0).round() as u8])
    })
}

/// Downscale `img` so neither side exceeds `max_dimension`, keeping aspect.
pub(crate) fn fit_to_limit(img: IconImage, max_dimension: u32) -> IconImage {
    let (w, h) = img.dimensions();
    let longest = w.max(h);
    if longest <= max_dimension {
        return img;
    }
    let scale = max_dimension as f32 / longest as f32;
    let nw = ((w as f32 * scale).round() as u32).clamp(1, max_dimension);
    let nh = ((h as f32 * scale).round() as u32).clamp(1, max_dimension);
    tracing::warn!("icon texture {w}x{h} exceeds device limit, resizing to {nw}x{nh}");
    image::imageops::resize(&img, nw, nh, FilterType::Triangle)
}

/// Full mip chain for `img`, halving each side down to 1x1.
///
/// Level 0 is `img` itself. Icons are drawn far smaller than their source
/// resolution, so sampling without the chain aliases as they spin.
pub(crate) fn mip_chain(img: &IconImage) -> Vec<IconImage> {
    let mut levels = vec![img.clone()];
    loop {
        let Some(prev) = levels.last() else { break };
        let (w, h) = prev.dimensions();
        if w <= 1 && h <= 1 {
            break;
        }
        let next = image::imageops::resize(
            prev,
            (w / 2).max(1),
            (h / 2).max(1),
            FilterType::Triangle,
        );
        levels.push(next);
    }
    levels
}

/// Icon texture resident on the GPU.
pub(crate) struct IconTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl IconTexture {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, img: &IconImage) -> Self {
        let img = fit_to_limit(img.clone(), device.limits().max_texture_dimension_2d);
        let levels = mip_chain(&img);
        let (width, height) = img.dimensions();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("icon_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (w, h) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }
        tracing::debug!(width, height, mips = levels.len(), "uploaded icon texture");

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("icon_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { view, sampler }
    }
}
