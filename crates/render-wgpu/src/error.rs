use std::path::PathBuf;

/// Errors from preparing GPU resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to load texture {}: {source}", path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {} has no pixels", path.display())]
    EmptyTexture { path: PathBuf },
}
