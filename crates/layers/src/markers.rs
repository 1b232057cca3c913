use foundation::color::Color;
use foundation::math::{GeoPoint, Projector, Vec2, Vec3};
use scene::World;
use scene::components::{
    Attached, ComponentDrawable, Geometry, LineSegments, Material, SolidMesh, Spin, TextureRef,
    Transform,
};
use scene::entity::EntityId;

use crate::BuildError;

const BEACON_FILL: u32 = 0x1DBAA9;
const BEACON_RADIUS: f64 = 0.1;
const BEACON_SPIN_RATE: f64 = 1.0; // rad/s
const LOCATION_COLOR: u32 = 0x00FFF0;
const LOCATION_RADIUS: f64 = 0.02;
const GLOW_SCALE: f64 = 4.5;

/// Build a beacon: two open cone shells on a shared vertical axis, each with
/// a wireframe overlay for a faceted look, spinning as one rigid unit.
///
/// `anchor` is the beacon group's origin; the upper shell floats above it.
pub fn build_beacon(world: &mut World, anchor: Vec3) -> Vec<EntityId> {
    let fill = Material::Basic {
        color: Color::from_hex(BEACON_FILL),
        opacity: 0.8,
    };
    let wire = Material::Line {
        color: Color::WHITE,
        width: 1.0,
        opacity: 0.5,
    };

    let mut out = Vec::new();
    // Upper shell points up and floats; lower shell points down at the origin.
    for (height, point_up, lift) in [(0.1, true, 0.15), (0.2, false, 0.0)] {
        let position = anchor + Vec3::new(0.0, 0.0, lift);

        let shell = cone_shell(BEACON_RADIUS, height, point_up);
        let edges = cone_edges(&shell);

        let geometry = world.add_geometry(Geometry::Solid(shell));
        let solid = world.spawn();
        world.set_transform(solid, Transform::translate(position));
        world.set_drawable(solid, ComponentDrawable::new(geometry, fill.clone()));
        world.set_spin(solid, Spin::new(BEACON_SPIN_RATE));
        out.push(solid);

        let geometry = world.add_geometry(Geometry::Segments(edges));
        let overlay = world.spawn();
        world.set_transform(overlay, Transform::translate(position));
        world.set_drawable(overlay, ComponentDrawable::new(geometry, wire.clone()));
        world.set_spin(overlay, Spin::new(BEACON_SPIN_RATE));
        out.push(overlay);
    }
    out
}

/// Build a free-standing point marker: a small sphere at the projected
/// location plus an additive glow sprite attached at the same anchor.
pub fn build_location_marker(
    world: &mut World,
    projector: &Projector,
    location: GeoPoint,
    glow_texture: &str,
    depth: f64,
) -> Result<Vec<EntityId>, BuildError> {
    let planar = projector
        .project_checked(location)
        .ok_or(BuildError::InvalidLocation {
            lon_deg: location.lon_deg,
            lat_deg: location.lat_deg,
        })?;
    let color = Color::from_hex(LOCATION_COLOR);
    let position = Vec3::new(planar.x, planar.y, depth + LOCATION_RADIUS * 4.0);

    let geometry = world.add_geometry(Geometry::Sphere {
        radius: LOCATION_RADIUS,
        width_segments: 32,
        height_segments: 16,
    });
    let sphere = world.spawn();
    world.set_transform(sphere, Transform::translate(position));
    world.set_drawable(sphere, ComponentDrawable::new(geometry, Material::basic(color)));

    let glow_extent = LOCATION_RADIUS * GLOW_SCALE;
    let geometry = world.add_geometry(Geometry::Sprite {
        scale: Vec2::new(glow_extent, glow_extent),
    });
    let glow = world.spawn();
    world.set_transform(glow, Transform::identity());
    world.set_attached(glow, Attached::to(sphere));
    world.set_drawable(
        glow,
        ComponentDrawable::new(
            geometry,
            Material::Sprite {
                texture: TextureRef::new(glow_texture),
                color,
                additive: true,
                depth_test: false,
            },
        ),
    );

    Ok(vec![sphere, glow])
}

/// Open-ended cone shell: 4 base vertices and an apex, no caps.
///
/// Centered on its own z extent: the base ring and apex sit at -height/2 and
/// +height/2, swapped by `point_up`.
fn cone_shell(radius: f64, height: f64, point_up: bool) -> SolidMesh {
    const SEGMENTS: usize = 4;
    let (apex_z, base_z) = if point_up {
        (height * 0.5, -height * 0.5)
    } else {
        (-height * 0.5, height * 0.5)
    };

    let mut positions = Vec::with_capacity(SEGMENTS + 1);
    positions.push(Vec3::new(0.0, 0.0, apex_z));
    for i in 0..SEGMENTS {
        let theta = std::f64::consts::TAU * i as f64 / SEGMENTS as f64;
        positions.push(Vec3::new(
            radius * theta.cos(),
            radius * theta.sin(),
            base_z,
        ));
    }

    let mut indices = Vec::with_capacity(SEGMENTS * 3);
    for i in 0..SEGMENTS as u32 {
        let a = 1 + i;
        let b = 1 + (i + 1) % SEGMENTS as u32;
        indices.extend_from_slice(&[0, a, b]);
    }

    SolidMesh {
        positions,
        indices,
        cap_index_count: 0,
    }
}

/// Wireframe edges of a cone shell: apex spokes plus the base ring.
fn cone_edges(shell: &SolidMesh) -> LineSegments {
    let apex = shell.positions[0];
    let base = &shell.positions[1..];
    let mut points = Vec::with_capacity(base.len() * 4);
    for (i, p) in base.iter().enumerate() {
        points.push(apex);
        points.push(*p);
        points.push(*p);
        points.push(base[(i + 1) % base.len()]);
    }
    LineSegments { points }
}
