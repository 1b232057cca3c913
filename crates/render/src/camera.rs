use foundation::math::{Vec2, Vec3};
use scene::picking::Ray;

/// Perspective camera looking at a fixed target (the scene origin for a
/// composed map). Orbit-style movement is the host's business; the engine
/// only reads position/orientation back out of it.
///
/// The scene is z-up: polygons lie in the xy plane and extrusion is +z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn look_at(
        position: Vec3,
        target: Vec3,
        fov_y_rad: f64,
        aspect: f64,
        near: f64,
        far: f64,
    ) -> Self {
        Self {
            position,
            target,
            fov_y_rad,
            aspect,
            near,
            far,
        }
    }

    /// Orthonormal view basis `(right, up, back)`; `back` is away from the
    /// look direction.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position).normalized();
        let up_hint = if forward.z.abs() > 0.999 {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        };
        let right = forward.cross(up_hint).normalized();
        let up = right.cross(forward);
        (right, up, Vec3::ZERO - forward)
    }

    /// A world-space ray through the given normalized device coordinates
    /// (both axes in [-1, 1], y up).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let (right, up, back) = self.basis();
        let forward = Vec3::ZERO - back;
        let tan = (0.5 * self.fov_y_rad).tan();
        let px = ndc.x * self.aspect * tan;
        let py = ndc.y * tan;
        let dir = (forward + right.scale(px) + up.scale(py)).normalized();
        Ray::new(self.position, dir)
    }

    /// Camera orientation as intrinsic XYZ Euler angles, for copying onto
    /// billboarded transforms.
    pub fn rotation(&self) -> Vec3 {
        let (right, up, back) = self.basis();
        // Rotation matrix columns: right, up, back.
        let m13 = back.x;
        let y = m13.clamp(-1.0, 1.0).asin();
        if m13.abs() < 0.9999995 {
            let x = (-back.y).atan2(back.z);
            let z = (-up.x).atan2(right.x);
            Vec3::new(x, y, z)
        } else {
            let x = up.z.atan2(up.y);
            Vec3::new(x, y, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Camera;
    use foundation::math::{Vec2, Vec3};

    fn overhead() -> Camera {
        Camera::look_at(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            75f64.to_radians(),
            16.0 / 9.0,
            0.1,
            1000.0,
        )
    }

    #[test]
    fn center_ray_points_at_the_target() {
        let camera = Camera::look_at(
            Vec3::new(0.0, -5.0, 5.0),
            Vec3::ZERO,
            75f64.to_radians(),
            1.0,
            0.1,
            1000.0,
        );
        let ray = camera.ray_from_ndc(Vec2::new(0.0, 0.0));
        let expected = (Vec3::ZERO - camera.position).normalized();
        assert!((ray.dir - expected).length() < 1e-12);
    }

    #[test]
    fn positive_ndc_x_leans_right() {
        let camera = overhead();
        let center = camera.ray_from_ndc(Vec2::new(0.0, 0.0));
        let side = camera.ray_from_ndc(Vec2::new(1.0, 0.0));
        assert!((center.dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
        assert!(side.dir.x > 0.0);
    }

    #[test]
    fn ray_origin_is_the_camera_position() {
        let camera = overhead();
        let ray = camera.ray_from_ndc(Vec2::new(0.3, -0.7));
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn overhead_rotation_is_identity() {
        // Straight down: the view basis lines up with the world axes.
        let rot = overhead().rotation();
        assert!(rot.x.abs() < 1e-9);
        assert!(rot.y.abs() < 1e-9);
        assert!(rot.z.abs() < 1e-9);
    }

    #[test]
    fn tilted_camera_pitches_about_x() {
        let camera = Camera::look_at(
            Vec3::new(0.0, -5.0, 5.0),
            Vec3::ZERO,
            75f64.to_radians(),
            1.0,
            0.1,
            1000.0,
        );
        let rot = camera.rotation();
        assert!(rot.x > 0.0);
        assert!(rot.y.abs() < 1e-9);
    }
}
