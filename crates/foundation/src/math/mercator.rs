use super::Vec2;

/// Default projection scale, matching the conventional web default
/// (961 / 2π world units per radian at the equator).
pub const DEFAULT_SCALE: f64 = 961.0 / (2.0 * std::f64::consts::PI);

/// A geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// Raw spherical-Mercator x for a longitude in radians (unit sphere).
pub fn mercator_x(lon_rad: f64) -> f64 {
    lon_rad
}

/// Raw spherical-Mercator y for a latitude in radians (unit sphere).
///
/// Diverges to infinity at the poles; callers that accept arbitrary input
/// go through [`Projector::project_checked`].
pub fn mercator_y(lat_rad: f64) -> f64 {
    (std::f64::consts::FRAC_PI_4 + lat_rad * 0.5).tan().ln()
}

/// Fixed-center conformal projector for one map instance.
///
/// Wraps spherical Mercator centered on `center` with the default scale; the
/// configured center always projects to the planar origin. The raw Mercator
/// output is screen-down; `project` flips y so the scene axis points up
/// (north of center is +y).
///
/// Determinism contract: the same center and input always yield bit-identical
/// output (pure function of configuration + input).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projector {
    center_x: f64,
    center_y: f64,
    scale: f64,
}

impl Projector {
    pub fn new(center: GeoPoint) -> Self {
        Self::with_scale(center, DEFAULT_SCALE)
    }

    pub fn with_scale(center: GeoPoint, scale: f64) -> Self {
        Self {
            center_x: mercator_x(center.lon_deg.to_radians()),
            center_y: mercator_y(center.lat_deg.to_radians()),
            scale,
        }
    }

    pub fn project(&self, point: GeoPoint) -> Vec2 {
        let x = self.scale * (mercator_x(point.lon_deg.to_radians()) - self.center_x);
        let y = self.scale * (mercator_y(point.lat_deg.to_radians()) - self.center_y);
        Vec2::new(x, y)
    }

    /// `None` when the input is outside the projection domain: at or beyond
    /// the poles (where Mercator diverges), or non-finite.
    pub fn project_checked(&self, point: GeoPoint) -> Option<Vec2> {
        if !(point.lat_deg.abs() < 90.0) || !point.lon_deg.is_finite() {
            return None;
        }
        let p = self.project(point);
        p.is_finite().then_some(p)
    }
}
