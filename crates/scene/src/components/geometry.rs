use foundation::math::{Vec2, Vec3};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GeometryId(pub u32);

/// An extruded solid: cap faces plus sharp-edged side walls.
///
/// The index buffer is split into two material groups: `indices[..cap_index_count]`
/// are the cap faces (material slot 0), the remainder are the extrusion sides
/// (material slot 1).
#[derive(Debug, Clone, PartialEq)]
pub struct SolidMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub cap_index_count: usize,
}

impl SolidMesh {
    pub fn cap_indices(&self) -> &[u32] {
        &self.indices[..self.cap_index_count]
    }

    pub fn side_indices(&self) -> &[u32] {
        &self.indices[self.cap_index_count..]
    }
}

/// An ordered run of points rendered as a connected line strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec3>,
}

/// Disconnected line segments (pairs of points), e.g. wireframe overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegments {
    pub points: Vec<Vec3>,
}

/// Triangulated flat glyph shapes in the local xy plane.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMesh {
    pub positions: Vec<Vec2>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Solid(SolidMesh),
    Polyline(Polyline),
    Segments(LineSegments),
    Text(TextMesh),
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    Plane {
        width: f64,
        height: f64,
    },
    /// Camera-facing quad; `scale` is the world-space width/height.
    Sprite {
        scale: Vec2,
    },
}

#[cfg(test)]
mod tests {
    use super::SolidMesh;
    use foundation::math::Vec3;

    #[test]
    fn index_groups_split_at_cap_count() {
        let mesh = SolidMesh {
            positions: vec![Vec3::ZERO; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
            cap_index_count: 3,
        };
        assert_eq!(mesh.cap_indices(), &[0, 1, 2]);
        assert_eq!(mesh.side_indices(), &[0, 2, 3]);
    }
}
