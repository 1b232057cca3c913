use super::geometry::GeometryId;
use super::material::Material;

/// Drawable component: a geometry reference plus its material slots.
///
/// Extruded solids carry two slots (cap fill + side fill); everything else
/// uses `material` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDrawable {
    pub geometry: GeometryId,
    pub material: Material,
    pub side_material: Option<Material>,
}

impl ComponentDrawable {
    pub fn new(geometry: GeometryId, material: Material) -> Self {
        Self {
            geometry,
            material,
            side_material: None,
        }
    }

    pub fn with_side_material(mut self, material: Material) -> Self {
        self.side_material = Some(material);
        self
    }
}
