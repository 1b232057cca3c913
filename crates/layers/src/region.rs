use earcutr::earcut;
use foundation::color::Color;
use foundation::math::{Projector, Vec2, Vec3};
use formats::{Region, Ring};
use scene::World;
use scene::components::{
    ComponentBounds, ComponentDrawable, Geometry, Material, Polyline, SolidMesh, Tag, Transform,
};
use scene::entity::EntityId;

/// Depth offset keeping a border outline above its ring's cap.
const OUTLINE_LIFT: f64 = 0.01;

/// Per-feature build parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStyle {
    /// Extrusion thickness of each ring solid.
    pub extrude_depth: f64,
    /// Material for the cap faces (slot 0).
    pub cap_material: Material,
    /// Fill for the extrusion sides (slot 1) and the border outline.
    pub border_color: Color,
    pub border_width: f32,
    /// Resting z of the ring solids.
    pub z_offset: f64,
    /// z of the border polyline's points (the ring's base plane).
    pub base_depth: f64,
}

/// Entities built for one feature: every ring of every polygon yields one
/// solid plus one border outline, all sharing the feature's code suffix.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RegionEntities {
    pub solids: Vec<EntityId>,
    /// `(adcode, outline entity)`, for the composer's outline registry.
    pub outlines: Vec<(u64, EntityId)>,
}

/// Build one feature's extruded solids and paired border outlines.
///
/// Interior rings are not subtracted: each ring independently becomes its own
/// solid, so a hole renders as an overlapping separate solid. The data
/// producer's ring convention is ambiguous, so nothing is subtracted here.
pub fn build_region(
    world: &mut World,
    projector: &Projector,
    region: &Region,
    style: &RegionStyle,
) -> RegionEntities {
    let mut out = RegionEntities::default();

    for polygon in &region.polygons {
        for ring in polygon {
            let projected = project_ring(projector, ring);
            let shape = open_ring(&projected);
            let Some(mesh) = extrude_ring(&shape, style.extrude_depth) else {
                continue;
            };
            let Some(bounds) = ComponentBounds::from_points(&mesh.positions) else {
                continue;
            };
            let geometry = world.add_geometry(Geometry::Solid(mesh));
            let solid = world.spawn();
            world.set_transform(
                solid,
                Transform::translate(Vec3::new(0.0, 0.0, style.z_offset)),
            );
            world.set_drawable(
                solid,
                ComponentDrawable::new(geometry, style.cap_material.clone())
                    .with_side_material(Material::basic(style.border_color)),
            );
            world.set_tag(solid, Tag::area(region.adcode));
            world.set_bounds(solid, bounds);
            out.solids.push(solid);

            // Border outline along the full ring (closing duplicate kept so
            // the strip visually closes), lifted off the cap.
            let points = projected
                .iter()
                .map(|p| Vec3::new(p.x, p.y, style.base_depth))
                .collect();
            let geometry = world.add_geometry(Geometry::Polyline(Polyline { points }));
            let outline = world.spawn();
            world.set_transform(
                outline,
                Transform::translate(Vec3::new(0.0, 0.0, OUTLINE_LIFT)),
            );
            world.set_drawable(
                outline,
                ComponentDrawable::new(
                    geometry,
                    Material::line(style.border_color, style.border_width),
                ),
            );
            world.set_tag(outline, Tag::line(region.adcode));
            out.outlines.push((region.adcode, outline));
        }
    }

    out
}

/// Project a ring into scene coordinates, in input order.
pub fn project_ring(projector: &Projector, ring: &Ring) -> Vec<Vec2> {
    ring.iter().map(|p| projector.project(*p)).collect()
}

/// Drop the closing duplicate point when the input ring carries one.
fn open_ring(points: &[Vec2]) -> Vec<Vec2> {
    let mut out = points.to_vec();
    if out.len() >= 2 {
        let first = out[0];
        let last = *out.last().unwrap();
        if (first.x - last.x).abs() < 1e-9 && (first.y - last.y).abs() < 1e-9 {
            out.pop();
        }
    }
    out
}

/// Extrude a flat ring into a solid: triangulated caps at z = 0 and
/// z = `depth`, plus sharp-edged side quads (no bevel) between them.
///
/// Returns `None` for degenerate rings (fewer than 3 distinct points or a
/// failed triangulation).
pub fn extrude_ring(ring: &[Vec2], depth: f64) -> Option<SolidMesh> {
    if ring.len() < 3 {
        return None;
    }

    // Normalize to counter-clockwise so top-cap winding faces +z.
    let mut ring = ring.to_vec();
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }

    let mut coords = Vec::with_capacity(ring.len() * 2);
    for p in &ring {
        coords.push(p.x);
        coords.push(p.y);
    }
    let holes: Vec<usize> = Vec::new();
    let cap = match earcut(&coords, &holes, 2) {
        Ok(indices) if !indices.is_empty() => indices,
        _ => return None,
    };

    let n = ring.len();
    let mut positions: Vec<Vec3> = Vec::with_capacity(2 * n + 4 * n);
    for p in &ring {
        positions.push(Vec3::new(p.x, p.y, 0.0));
    }
    for p in &ring {
        positions.push(Vec3::new(p.x, p.y, depth));
    }

    let mut indices: Vec<u32> = Vec::with_capacity(2 * cap.len() + 6 * n);
    // Bottom cap, wound to face -z.
    for tri in cap.chunks_exact(3) {
        indices.push(tri[0] as u32);
        indices.push(tri[2] as u32);
        indices.push(tri[1] as u32);
    }
    // Top cap.
    for tri in cap.chunks_exact(3) {
        indices.push((tri[0] + n) as u32);
        indices.push((tri[1] + n) as u32);
        indices.push((tri[2] + n) as u32);
    }
    let cap_index_count = indices.len();

    // Side walls: 4 dedicated vertices per edge for sharp silhouettes.
    for i in 0..n {
        let j = (i + 1) % n;
        let base = positions.len() as u32;
        positions.push(Vec3::new(ring[i].x, ring[i].y, 0.0));
        positions.push(Vec3::new(ring[j].x, ring[j].y, 0.0));
        positions.push(Vec3::new(ring[j].x, ring[j].y, depth));
        positions.push(Vec3::new(ring[i].x, ring[i].y, depth));
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Some(SolidMesh {
        positions,
        indices,
        cap_index_count,
    })
}

fn signed_area(ring: &[Vec2]) -> f64 {
    let mut area = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

#[cfg(test)]
mod tests {
    use super::{RegionStyle, build_region, extrude_ring, signed_area};
    use foundation::color::Color;
    use foundation::math::{GeoPoint, Projector, Vec2};
    use formats::Region;
    use scene::World;
    use scene::components::Material;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    fn style() -> RegionStyle {
        RegionStyle {
            extrude_depth: 0.005,
            cap_material: Material::basic(Color::WHITE),
            border_color: Color::from_hex(0x85BFEF),
            border_width: 2.0,
            z_offset: 0.1,
            base_depth: 0.1,
        }
    }

    #[test]
    fn extruded_square_has_caps_and_sides() {
        let mesh = extrude_ring(&square(), 0.5).expect("mesh");
        // 4 cap vertices per cap + 4 per edge.
        assert_eq!(mesh.positions.len(), 8 + 16);
        // Two triangles per cap, two caps.
        assert_eq!(mesh.cap_index_count, 12);
        // Two triangles per side wall.
        assert_eq!(mesh.side_indices().len(), 24);
        assert!(mesh.positions.iter().any(|p| p.z == 0.5));
    }

    #[test]
    fn clockwise_input_is_normalized() {
        let mut ring = square();
        ring.reverse();
        assert!(signed_area(&ring) < 0.0);
        let mesh = extrude_ring(&ring, 0.1).expect("mesh");
        assert_eq!(mesh.cap_index_count, 12);
    }

    #[test]
    fn degenerate_rings_build_nothing() {
        assert!(extrude_ring(&square()[..2], 0.1).is_none());
        assert!(extrude_ring(&[], 0.1).is_none());
    }

    #[test]
    fn feature_solids_and_outlines_share_the_code() {
        let region = Region {
            adcode: 320600,
            name: "Demo".to_string(),
            center: GeoPoint::new(120.85, 32.0),
            level: None,
            polygons: vec![vec![vec![
                GeoPoint::new(120.8, 31.9),
                GeoPoint::new(120.9, 31.9),
                GeoPoint::new(120.9, 32.1),
                GeoPoint::new(120.8, 32.1),
                GeoPoint::new(120.8, 31.9),
            ]]],
        };
        let projector = Projector::new(GeoPoint::new(120.85, 32.0));

        let mut world = World::new();
        let built = build_region(&mut world, &projector, &region, &style());
        assert_eq!(built.solids.len(), 1);
        assert_eq!(built.outlines.len(), 1);

        let solid_tag = world.tag(built.solids[0]).expect("solid tag");
        assert_eq!(solid_tag.as_str(), "area_320600");
        let (code, outline) = built.outlines[0];
        assert_eq!(code, 320600);
        assert_eq!(world.tag(outline).expect("line tag").as_str(), "line_320600");

        // Ring's first point is south-west of center: both signs negative.
        let bounds = world.bounds(built.solids[0]).expect("bounds");
        assert!(bounds.min.x < 0.0);
        assert!(bounds.min.y < 0.0);

        // Solid rests at the configured z offset; outline floats above its base.
        assert_eq!(world.transform(built.solids[0]).unwrap().position.z, 0.1);
        assert_eq!(world.transform(outline).unwrap().position.z, 0.01);
    }

    #[test]
    fn interior_rings_become_their_own_solids() {
        let region = Region {
            adcode: 1,
            name: "Holed".to_string(),
            center: GeoPoint::new(0.0, 0.0),
            level: None,
            polygons: vec![vec![
                vec![
                    GeoPoint::new(-1.0, -1.0),
                    GeoPoint::new(1.0, -1.0),
                    GeoPoint::new(1.0, 1.0),
                    GeoPoint::new(-1.0, 1.0),
                ],
                vec![
                    GeoPoint::new(-0.2, -0.2),
                    GeoPoint::new(0.2, -0.2),
                    GeoPoint::new(0.2, 0.2),
                    GeoPoint::new(-0.2, 0.2),
                ],
            ]],
        };
        let projector = Projector::new(GeoPoint::new(0.0, 0.0));

        let mut world = World::new();
        let built = build_region(&mut world, &projector, &region, &style());
        assert_eq!(built.solids.len(), 2);
        assert_eq!(built.outlines.len(), 2);
    }
}
