use layers::BuildError;

/// Errors surfaced by map configuration and composition.
///
/// Construction-time errors abort initialization entirely; no partially
/// built scene is kept. Per-feature errors during a composition pass
/// propagate and abort that pass.
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// The projection-anchor region code is not in the injected dataset.
    RegionNotFound { adcode: u64 },
    /// Label text was requested before the font resource arrived.
    FontNotReady,
    /// A marker placement point is outside the projection domain.
    InvalidLocation { lon_deg: f64, lat_deg: f64 },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::RegionNotFound { adcode } => {
                write!(f, "region {adcode} not found in dataset")
            }
            MapError::FontNotReady => write!(f, "font resource not initialized"),
            MapError::InvalidLocation { lon_deg, lat_deg } => {
                write!(f, "location ({lon_deg}, {lat_deg}) cannot be projected")
            }
        }
    }
}

impl std::error::Error for MapError {}

impl From<BuildError> for MapError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::InvalidLocation { lon_deg, lat_deg } => {
                MapError::InvalidLocation { lon_deg, lat_deg }
            }
        }
    }
}
