/// Errors from validating camera or scene parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} = {value} is outside {min}..{max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("far plane ({far}) must be beyond near plane ({near})")]
    ClipPlanes { near: f32, far: f32 },
    #[error("max_distance ({max}) is below min_distance ({min})")]
    DistanceRange { min: f32, max: f32 },
    #[error("icon palette is empty")]
    EmptyPalette,
}
