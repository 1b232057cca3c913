use earcutr::earcut;
use foundation::color::Color;
use foundation::math::{Vec2, Vec3};
use formats::Font;
use scene::World;
use scene::components::{ComponentDrawable, Geometry, Material, TextMesh, Transform};
use scene::entity::EntityId;

/// Lay out and triangulate `text` as a flat mesh, then place it at `anchor`
/// as a camera-facing billboard.
///
/// Glyphs the font does not carry are skipped. The finished geometry is
/// re-centered so the label anchors at its own midpoint rather than its
/// baseline start.
pub fn build_label(
    world: &mut World,
    font: &Font,
    text: &str,
    size: f64,
    color: Color,
    anchor: Vec3,
) -> EntityId {
    let scale = font.scale_for(size);
    let mut positions: Vec<Vec2> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let mut pen_x = 0.0;
    for ch in text.chars() {
        let Some(glyph) = font.glyph(ch) else {
            continue;
        };
        let contours: Vec<Vec<Vec2>> = glyph
            .contours
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|p| Vec2::new(p.x * scale + pen_x, p.y * scale))
                    .collect()
            })
            .collect();
        triangulate_contours(&contours, &mut positions, &mut indices);
        pen_x += glyph.advance * scale;
    }

    // Anchor at the glyph run's own midpoint.
    if let Some((min, max)) = bounding_box(&positions) {
        let x_mid = -0.5 * (max.x - min.x);
        let y_mid = -0.5 * (max.y - min.y);
        for p in &mut positions {
            p.x += x_mid;
            p.y += y_mid;
        }
    }

    let geometry = world.add_geometry(Geometry::Text(TextMesh { positions, indices }));
    let entity = world.spawn();
    world.set_transform(entity, Transform::translate(anchor));
    world.set_drawable(
        entity,
        ComponentDrawable::new(geometry, Material::basic(color)),
    );
    world.set_billboard(entity);
    entity
}

/// Copy the camera rotation onto every billboarded entity. Runs once per
/// frame, before the render collect.
pub fn face_camera(world: &mut World, camera_rotation: Vec3) {
    for entity in world.billboards_by_entity() {
        world.set_rotation(entity, camera_rotation);
    }
}

/// Triangulate one glyph's contours, treating counter-wound interior
/// contours as holes of the outer contour that contains them.
fn triangulate_contours(contours: &[Vec<Vec2>], positions: &mut Vec<Vec2>, indices: &mut Vec<u32>) {
    if contours.is_empty() {
        return;
    }

    let areas: Vec<f64> = contours.iter().map(|c| signed_area(c)).collect();
    let dominant = areas
        .iter()
        .enumerate()
        .max_by(|a, b| {
            a.1.abs()
                .partial_cmp(&b.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    let outer_sign = areas[dominant].signum();

    let mut hole_used = vec![false; contours.len()];
    for (i, contour) in contours.iter().enumerate() {
        if contour.len() < 3 || areas[i].signum() != outer_sign {
            continue;
        }

        let bbox = bounding_box(contour);
        let mut ring_points: Vec<&Vec2> = contour.iter().collect();
        let mut hole_starts: Vec<usize> = Vec::new();
        for (j, hole) in contours.iter().enumerate() {
            if hole.len() < 3 || areas[j].signum() == outer_sign || hole_used[j] {
                continue;
            }
            let inside = bbox.is_some_and(|(min, max)| {
                let p = hole[0];
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            });
            if inside {
                hole_used[j] = true;
                hole_starts.push(ring_points.len());
                ring_points.extend(hole.iter());
            }
        }

        let mut coords = Vec::with_capacity(ring_points.len() * 2);
        for p in &ring_points {
            coords.push(p.x);
            coords.push(p.y);
        }
        let Ok(local) = earcut(&coords, &hole_starts, 2) else {
            continue;
        };

        let base = positions.len() as u32;
        positions.extend(ring_points.iter().map(|p| **p));
        indices.extend(local.iter().map(|i| base + *i as u32));
    }
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

fn bounding_box(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    let mut min = first;
    let mut max = first;
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}
