/// Continuous rotation about the entity's vertical (z) axis.
///
/// Applied per frame as `rate_rad_per_s * dt`, never as a fixed per-frame
/// increment, so the angular speed is independent of frame rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Spin {
    pub rate_rad_per_s: f64,
}

impl Spin {
    pub fn new(rate_rad_per_s: f64) -> Self {
        Self { rate_rad_per_s }
    }
}

/// Marks an entity whose rotation is overwritten with the camera's rotation
/// every frame so it always faces the viewer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Billboard;
