use foundation::math::GeoPoint;

/// Map configuration surface.
///
/// The dataset itself is injected separately at construction; options only
/// carry the knobs. Texture and font fields are host-side sources (paths or
/// URLs) fetched through the load queue, `None` to skip that decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Render surface size in pixels.
    pub width: f64,
    pub height: f64,
    /// Base thickness of the map body; labels, beacons and markers stack
    /// above it.
    pub depth: f64,
    /// Projection anchor by coordinate; takes precedence over `adcode`.
    pub center: Option<GeoPoint>,
    /// Projection anchor by region lookup.
    pub adcode: Option<u64>,
    /// Camera position; the camera always looks at the scene origin.
    pub camera: [f64; 3],
    pub map_texture: Option<String>,
    pub ground_texture: Option<String>,
    pub marker_texture: Option<String>,
    pub font_source: Option<String>,
    /// Region codes decorated with an animated beacon.
    pub actives: Vec<u64>,
    /// Free-standing point markers.
    pub locations: Vec<GeoPoint>,
    pub light_intensity: f32,
    /// Diagnostic overlays (axes).
    pub debug: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            depth: 0.1,
            center: None,
            adcode: None,
            camera: [0.0, -4.0, 4.0],
            map_texture: None,
            ground_texture: None,
            marker_texture: None,
            font_source: None,
            actives: Vec::new(),
            locations: Vec::new(),
            light_intensity: 1.8,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MapOptions;

    #[test]
    fn defaults_are_sane() {
        let options = MapOptions::default();
        assert_eq!(options.light_intensity, 1.8);
        assert!(options.center.is_none());
        assert!(!options.debug);
    }
}
