use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::World;
use crate::components::ComponentBounds;
use crate::entity::EntityId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
        }
    }
}

/// Deterministic ray intersection over pickable entities.
///
/// Ordering contract:
/// - Hits are returned nearest-first along the (normalized) ray.
/// - If two entities are hit at the same distance, the lower
///   `EntityId::index()` comes first.
///
/// Notes:
/// - Intersection uses entity bounds offset by the entity's transform, so a
///   raised entity is tested at its raised position.
/// - Entities without explicit bounds are never hit.
/// - Visibility gating is inherited from `World::pickables_by_entity()`.
pub fn intersect_ray(world: &World, ray: Ray, opts: PickOptions) -> Vec<PickHit> {
    let Some(dir) = normalize(ray.dir) else {
        return Vec::new();
    };
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let dir_a = [dir.x, dir.y, dir.z];

    let mut hits: Vec<PickHit> = Vec::new();
    for (entity, transform, bounds) in world.pickables_by_entity() {
        let world_bounds = bounds.offset(transform.position);
        let Some(t) = ray_aabb_hit_t(origin, dir_a, world_bounds, 0.0, opts.max_distance) else {
            continue;
        };
        hits.push(PickHit {
            entity,
            distance: t,
            point: ray.origin + dir.scale(t),
        });
    }

    hits.sort_by(|a, b| {
        stable_total_cmp_f64(a.distance, b.distance)
            .then_with(|| a.entity.index().cmp(&b.entity.index()))
    });
    hits
}

/// Nearest hit only.
pub fn pick_ray(world: &World, ray: Ray, opts: PickOptions) -> Option<PickHit> {
    intersect_ray(world, ray, opts).into_iter().next()
}

fn normalize(v: Vec3) -> Option<Vec3> {
    let l2 = v.dot(v);
    if l2 <= 0.0 {
        return None;
    }
    let inv = 1.0 / l2.sqrt();
    Some(Vec3::new(v.x * inv, v.y * inv, v.z * inv))
}

fn ray_aabb_hit_t(
    origin: [f64; 3],
    dir: [f64; 3],
    bounds: ComponentBounds,
    mut t_min: f64,
    mut t_max: f64,
) -> Option<f64> {
    // Slabs intersection; returns entry distance.
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (min, max) = match axis {
            0 => (bounds.min.x, bounds.max.x),
            1 => (bounds.min.y, bounds.max.y),
            _ => (bounds.min.z, bounds.max.z),
        };

        if d.abs() < 1e-12 {
            if o < min || o > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min - o) * inv;
        let mut t2 = (max - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_max < t_min {
            return None;
        }
    }

    Some(t_min.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, Ray, intersect_ray, pick_ray};
    use crate::World;
    use crate::components::{ComponentBounds, Transform};
    use foundation::math::Vec3;

    fn spawn_box(world: &mut World, min: Vec3, max: Vec3) -> crate::entity::EntityId {
        let entity = world.spawn();
        world.set_transform(entity, Transform::identity());
        world.set_bounds(entity, ComponentBounds::new(min, max));
        entity
    }

    #[test]
    fn hits_come_back_nearest_first() {
        let mut world = World::new();
        let far = spawn_box(
            &mut world,
            Vec3::new(9.0, -1.0, -1.0),
            Vec3::new(11.0, 1.0, 1.0),
        );
        let near = spawn_box(
            &mut world,
            Vec3::new(4.0, -1.0, -1.0),
            Vec3::new(6.0, 1.0, 1.0),
        );

        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let hits = intersect_ray(&world, ray, PickOptions::default());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, near);
        assert_eq!(hits[1].entity, far);
        assert!(hits[0].distance >= 4.0 && hits[0].distance <= 6.0);
    }

    #[test]
    fn tie_breaks_by_entity_index() {
        let mut world = World::new();
        let first = spawn_box(
            &mut world,
            Vec3::new(4.0, -1.0, -1.0),
            Vec3::new(6.0, 1.0, 1.0),
        );
        let _second = spawn_box(
            &mut world,
            Vec3::new(4.0, -1.0, -1.0),
            Vec3::new(6.0, 1.0, 1.0),
        );

        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        let hit = pick_ray(&world, ray, PickOptions::default()).expect("hit");
        assert_eq!(hit.entity, first);
    }

    #[test]
    fn raised_entity_is_tested_at_its_raised_position() {
        let mut world = World::new();
        let entity = spawn_box(
            &mut world,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.1),
        );
        // A ray grazing just above the resting top face.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 0.15), Vec3::new(1.0, 0.0, 0.0));
        assert!(pick_ray(&world, ray, PickOptions::default()).is_none());

        world.translate_z(entity, 0.1);
        assert!(pick_ray(&world, ray, PickOptions::default()).is_some());
    }

    #[test]
    fn zero_direction_hits_nothing() {
        let mut world = World::new();
        spawn_box(
            &mut world,
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(intersect_ray(&world, ray, PickOptions::default()).is_empty());
    }
}
