use foundation::color::Color;
use foundation::math::{Projector, Vec3};
use formats::Ring;
use scene::World;
use scene::components::{ComponentDrawable, Geometry, Material, Polyline, Transform};
use scene::entity::EntityId;

/// Outline-only decoration band at a fixed depth. No picking identifier is
/// assigned and no bounds are set; these are never interactive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundaryStyle {
    /// Resting z of the band entities.
    pub z: f64,
    pub color: Color,
    pub width: f32,
    /// z of the polyline points themselves (the rings' base plane).
    pub base_depth: f64,
}

/// Build one stacked outline band from a set of outer rings.
pub fn build_boundary_band(
    world: &mut World,
    projector: &Projector,
    rings: &[&Ring],
    style: &BoundaryStyle,
) -> Vec<EntityId> {
    let mut out = Vec::new();
    for ring in rings {
        let points: Vec<Vec3> = ring
            .iter()
            .map(|p| {
                let planar = projector.project(*p);
                Vec3::new(planar.x, planar.y, style.base_depth)
            })
            .collect();
        if points.len() < 2 {
            continue;
        }

        let geometry = world.add_geometry(Geometry::Polyline(Polyline { points }));
        let entity = world.spawn();
        world.set_transform(entity, Transform::translate(Vec3::new(0.0, 0.0, style.z)));
        world.set_drawable(
            entity,
            ComponentDrawable::new(geometry, Material::line(style.color, style.width)),
        );
        out.push(entity);
    }
    out
}
