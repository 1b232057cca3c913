use foundation::color::Color;
use foundation::math::Vec3;
use scene::World;
use scene::components::{
    ComponentDrawable, Geometry, Material, Polyline, TextureRef, Transform,
};
use scene::entity::EntityId;

const GROUND_WIDTH: f64 = 40.0;
const GROUND_HEIGHT: f64 = 20.0;

/// Build the textured ground plane under the map.
pub fn build_ground(world: &mut World, texture_key: &str) -> EntityId {
    let geometry = world.add_geometry(Geometry::Plane {
        width: GROUND_WIDTH,
        height: GROUND_HEIGHT,
    });
    let entity = world.spawn();
    world.set_transform(entity, Transform::identity());
    world.set_drawable(
        entity,
        ComponentDrawable::new(
            geometry,
            Material::Standard {
                texture: Some(TextureRef::new(texture_key).with_repeat(16.0, 8.0)),
                color: None,
                opacity: 0.5,
            },
        ),
    );
    entity
}

/// Diagnostic overlay: one colored polyline per world axis.
pub fn build_axes(world: &mut World, size: f64) -> Vec<EntityId> {
    let axes = [
        (Vec3::new(size, 0.0, 0.0), Color::from_hex(0xFF0000)),
        (Vec3::new(0.0, size, 0.0), Color::from_hex(0x00FF00)),
        (Vec3::new(0.0, 0.0, size), Color::from_hex(0x0000FF)),
    ];

    let mut out = Vec::new();
    for (tip, color) in axes {
        let geometry = world.add_geometry(Geometry::Polyline(Polyline {
            points: vec![Vec3::ZERO, tip],
        }));
        let entity = world.spawn();
        world.set_transform(entity, Transform::identity());
        world.set_drawable(entity, ComponentDrawable::new(geometry, Material::line(color, 1.0)));
        out.push(entity);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{build_axes, build_ground};
    use scene::World;
    use scene::components::{Geometry, Material};

    #[test]
    fn ground_plane_is_textured_and_translucent() {
        let mut world = World::new();
        let entity = build_ground(&mut world, "texture:ground");

        let drawable = world
            .drawables_by_entity()
            .into_iter()
            .find(|(e, _, _)| *e == entity)
            .unwrap()
            .2;
        match world.geometry(drawable.geometry) {
            Some(Geometry::Plane { width, height }) => {
                assert_eq!((*width, *height), (40.0, 20.0));
            }
            _ => panic!("expected plane geometry"),
        }
        match drawable.material {
            Material::Standard {
                texture: Some(texture),
                opacity,
                ..
            } => {
                assert_eq!(texture.key, "texture:ground");
                assert_eq!(texture.repeat.x, 16.0);
                assert_eq!(opacity, 0.5);
            }
            other => panic!("unexpected material: {other:?}"),
        }
    }

    #[test]
    fn axes_overlay_has_three_lines() {
        let mut world = World::new();
        assert_eq!(build_axes(&mut world, 5.0).len(), 3);
    }
}
