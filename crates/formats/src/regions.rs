use foundation::math::GeoPoint;
use serde_json::Value;

/// One ring: a closed loop of geographic points. The closing duplicate point
/// is optional in the input; geometry builders drop it when present.
pub type Ring = Vec<GeoPoint>;
/// One polygon: an outer ring followed by any interior rings.
pub type Polygon = Vec<Ring>;

/// One administrative region feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub adcode: u64,
    pub name: String,
    pub center: GeoPoint,
    pub level: Option<String>,
    pub polygons: Vec<Polygon>,
}

impl Region {
    /// The outer ring of every polygon, skipping interior rings.
    pub fn outer_rings(&self) -> Vec<&Ring> {
        self.polygons.iter().filter_map(|p| p.first()).collect()
    }
}

/// A parsed region dataset: the features of one administrative area, plus the
/// area's own metadata and boundary geometry when the provider includes them.
///
/// This is plain data handed to the composer at construction; nothing in the
/// engine reaches for an ambient dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSet {
    pub name: Option<String>,
    pub adcode: Option<u64>,
    pub center: Option<GeoPoint>,
    /// The whole area's own outline (outer polygons), when present.
    pub boundary: Vec<Polygon>,
    pub regions: Vec<Region>,
}

impl RegionSet {
    pub fn find(&self, adcode: u64) -> Option<&Region> {
        self.regions.iter().find(|r| r.adcode == adcode)
    }

    /// Outer rings for boundary-band decoration: the dataset's own boundary
    /// when the provider ships one, otherwise every region's outer rings.
    pub fn boundary_rings(&self) -> Vec<&Ring> {
        if !self.boundary.is_empty() {
            return self.boundary.iter().filter_map(|p| p.first()).collect();
        }
        self.regions
            .iter()
            .flat_map(|r| r.outer_rings())
            .collect()
    }
}

#[derive(Debug)]
pub enum RegionSetError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for RegionSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionSetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            RegionSetError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for RegionSetError {}

impl RegionSet {
    pub fn from_geojson_str(payload: &str) -> Result<Self, RegionSetError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| RegionSetError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, RegionSetError> {
        let obj = value
            .as_object()
            .ok_or(RegionSetError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(RegionSetError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(RegionSetError::NotAFeatureCollection);
        }

        let mut set = RegionSet::default();

        // Some providers attach the collection's own metadata and outline.
        if let Some(props) = obj.get("properties").and_then(|v| v.as_object()) {
            set.name = props
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            set.adcode = props.get("adcode").and_then(|v| v.as_u64());
            set.center = props
                .get("center")
                .and_then(|v| parse_position(v).ok());
        }
        if let Some(geometry) = obj.get("geometry") {
            set.boundary = parse_polygons(geometry).map_err(|reason| {
                RegionSetError::InvalidFeature { index: 0, reason }
            })?;
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(RegionSetError::NotAFeatureCollection)?;

        for (index, feat_val) in features_val.iter().enumerate() {
            let region = parse_feature(feat_val)
                .map_err(|reason| RegionSetError::InvalidFeature { index, reason })?;
            set.regions.push(region);
        }

        Ok(set)
    }
}

fn parse_feature(value: &Value) -> Result<Region, String> {
    let obj = value.as_object().ok_or("feature must be an object")?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type")?;
    if ty != "Feature" {
        return Err(format!("unexpected feature type: {ty}"));
    }

    let props = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .ok_or("feature missing properties")?;
    let adcode = props
        .get("adcode")
        .and_then(|v| v.as_u64())
        .ok_or("properties missing numeric adcode")?;
    let name = props
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or("properties missing name")?
        .to_string();
    let center = parse_position(props.get("center").ok_or("properties missing center")?)?;
    let level = props
        .get("level")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let geometry = obj.get("geometry").ok_or("feature missing geometry")?;
    let polygons = parse_polygons(geometry)?;

    Ok(Region {
        adcode,
        name,
        center,
        level,
        polygons,
    })
}

fn parse_polygons(geometry: &Value) -> Result<Vec<Polygon>, String> {
    let obj = geometry.as_object().ok_or("geometry must be an object")?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type")?;
    let coords = obj.get("coordinates").ok_or("geometry missing coordinates")?;

    match ty {
        "Polygon" => Ok(vec![parse_rings(coords)?]),
        "MultiPolygon" => {
            let arr = coords
                .as_array()
                .ok_or("MultiPolygon coordinates must be an array")?;
            arr.iter().map(parse_rings).collect()
        }
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_rings(value: &Value) -> Result<Polygon, String> {
    let arr = value.as_array().ok_or("polygon must be an array of rings")?;
    arr.iter()
        .map(|ring| {
            let pts = ring.as_array().ok_or("ring must be an array of positions")?;
            pts.iter().map(parse_position).collect::<Result<Ring, _>>()
        })
        .collect()
}

fn parse_position(value: &Value) -> Result<GeoPoint, String> {
    let arr = value.as_array().ok_or("position must be an array")?;
    if arr.len() < 2 {
        return Err("position needs [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("longitude must be a number")?;
    let lat = arr[1].as_f64().ok_or("latitude must be a number")?;
    Ok(GeoPoint::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::{RegionSet, RegionSetError};
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    const CITY: &str = r#"{
        "type": "FeatureCollection",
        "properties": { "adcode": 320600, "name": "Demo City", "center": [120.85, 32.0] },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[120.8, 31.9], [120.9, 31.9], [120.9, 32.1], [120.8, 32.1], [120.8, 31.9]]]
        },
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "adcode": 320602,
                    "name": "East District",
                    "center": [120.88, 32.01],
                    "level": "district"
                },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[120.86, 31.95], [120.9, 31.95], [120.9, 32.05], [120.86, 32.05]]]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_collection_metadata_and_features() {
        let set = RegionSet::from_geojson_str(CITY).expect("parse");
        assert_eq!(set.adcode, Some(320600));
        assert_eq!(set.center, Some(GeoPoint::new(120.85, 32.0)));
        assert_eq!(set.boundary.len(), 1);
        assert_eq!(set.regions.len(), 1);

        let region = set.find(320602).expect("region");
        assert_eq!(region.name, "East District");
        assert_eq!(region.level.as_deref(), Some("district"));
        assert_eq!(region.polygons[0][0].len(), 4);
    }

    #[test]
    fn boundary_rings_prefer_the_collection_outline() {
        let set = RegionSet::from_geojson_str(CITY).expect("parse");
        let rings = set.boundary_rings();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 5);
    }

    #[test]
    fn missing_adcode_is_an_invalid_feature() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "nameless", "center": [0.0, 0.0] },
                "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0]]] }
            }]
        }"#;
        let err = RegionSet::from_geojson_str(payload).unwrap_err();
        assert!(matches!(
            err,
            RegionSetError::InvalidFeature { index: 0, .. }
        ));
    }

    #[test]
    fn non_collections_are_rejected() {
        let err = RegionSet::from_geojson_str(r#"{ "type": "Feature" }"#).unwrap_err();
        assert!(matches!(err, RegionSetError::NotAFeatureCollection));
    }
}
