//! Thin-lens camera for ray generation.

use crate::random::Random;
use glint_math::{Frame, FrameError, Mat3, Ray, Vec3};
use thiserror::Error;

/// Direction the camera looks along in its own frame.
const FORWARD: Vec3 = Vec3::NEG_Z;

/// Errors raised while positioning a camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("look_at target coincides with the camera position {0:?}")]
    DegenerateDirection(Vec3),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Camera for generating rays into the scene.
///
/// The pinhole sits at the frame origin looking down −Z with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians
    pub vertical_fov: f32,
    /// Film size in pixels (only the aspect ratio matters)
    pub film_width: u32,
    pub film_height: u32,
    /// Distance to the plane of perfect focus
    pub focal_length: f32,
    /// Lens radius; 0 disables depth of field
    pub aperture_size: f32,
    pub frame: Frame,
}

impl Camera {
    /// Create a camera at the origin looking down −Z.
    pub fn new(
        vertical_fov: f32,
        film_width: u32,
        film_height: u32,
        focal_length: f32,
        aperture_size: f32,
    ) -> Self {
        Self {
            vertical_fov,
            film_width,
            film_height,
            focal_length,
            aperture_size,
            frame: Frame::default(),
        }
    }

    /// Set the film resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.film_width = width;
        self.film_height = height;
        self
    }

    /// Set the lens radius.
    pub fn with_aperture(mut self, aperture_size: f32) -> Self {
        self.aperture_size = aperture_size;
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.film_width as f32 / self.film_height.max(1) as f32
    }

    /// Generate the world-space ray through normalized device coordinates (u, v).
    ///
    /// (0, 0) is the bottom-left corner of the film and (1, 1) the top-right.
    pub fn generate_ray(&self, u: f32, v: f32, rng: &mut Random) -> Ray {
        let half_height = self.focal_length * (self.vertical_fov / 2.0).tan();
        let half_width = self.aspect_ratio() * half_height;

        let local = Vec3::new(
            (2.0 * u - 1.0) * half_width,
            (2.0 * v - 1.0) * half_height,
            -self.focal_length,
        );

        let origin = self.frame.point_to_world(Vec3::ZERO);
        let direction = self.frame.direction_to_world(local).normalize_or_zero();

        if self.aperture_size <= 0.0 {
            return Ray::new(origin, direction);
        }

        // Jitter the origin across the lens and re-aim at the point on the focal plane
        let focal_point = self.frame.point_to_world(local);
        let jittered = self
            .frame
            .point_to_world(self.aperture_size * rng.point_in_disc());
        Ray::new(jittered, focal_point - jittered)
    }

    /// Place the camera at `from` looking towards `to`.
    ///
    /// The focal length becomes the distance between the two points and the
    /// frame is re-locked.
    pub fn look_at(&mut self, from: Vec3, to: Vec3) -> Result<(), CameraError> {
        let direction = to - from;
        let distance = direction.length();
        if distance <= f32::EPSILON {
            return Err(CameraError::DegenerateDirection(from));
        }

        let rotation = rotation_between(FORWARD, direction / distance);

        let mut frame = self.frame;
        frame.origin = from;
        frame.rotation = euler_from_matrix(&rotation);
        self.frame = frame.locked()?;
        self.focal_length = distance;

        Ok(())
    }
}

/// Rodrigues rotation taking unit vector `a` onto unit vector `b`.
fn rotation_between(a: Vec3, b: Vec3) -> Mat3 {
    let cross = a.cross(b);
    let cos_angle = a.dot(b).clamp(-1.0, 1.0);

    if cross.length_squared() < 1e-12 {
        return if cos_angle > 0.0 {
            Mat3::IDENTITY
        } else {
            // Half turn about an axis perpendicular to `a`
            let axis = a.any_orthonormal_vector();
            Mat3::from_axis_angle(axis, std::f32::consts::PI)
        };
    }

    let axis = cross.normalize();
    let sin_angle = cross.length();

    let k = Mat3::from_cols(
        Vec3::new(0.0, axis.z, -axis.y),
        Vec3::new(-axis.z, 0.0, axis.x),
        Vec3::new(axis.y, -axis.x, 0.0),
    );

    Mat3::IDENTITY + k * sin_angle + (k * k) * (1.0 - cos_angle)
}

/// Decompose `R = Rz(yaw) * Ry(pitch) * Rx(roll)` into `(roll, pitch, yaw)`.
fn euler_from_matrix(m: &Mat3) -> Vec3 {
    let sin_pitch = -m.x_axis.z.clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();

    if sin_pitch.abs() > 0.9999 {
        // Gimbal lock: yaw and roll share an axis, fold everything into roll
        let roll = (-m.z_axis.y).atan2(m.y_axis.y);
        return Vec3::new(roll, pitch, 0.0);
    }

    let yaw = m.x_axis.y.atan2(m.x_axis.x);
    let roll = m.y_axis.z.atan2(m.z_axis.z);
    Vec3::new(roll, pitch, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn camera() -> Camera {
        Camera::new(FRAC_PI_2, 100, 100, 1.0, 0.0)
    }

    #[test]
    fn test_center_ray_looks_down_neg_z() {
        let camera = camera();
        let mut rng = Random::new(1);
        let ray = camera.generate_ray(0.5, 0.5, &mut rng);

        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_corner_rays_follow_fov() {
        // 90 degree vertical fov: top edge is 45 degrees up
        let camera = camera();
        let mut rng = Random::new(1);

        let top = camera.generate_ray(0.5, 1.0, &mut rng);
        assert!((top.direction - Vec3::new(0.0, 1.0, -1.0).normalize()).length() < 1e-5);

        let left = camera.generate_ray(0.0, 0.5, &mut rng);
        assert!((left.direction - Vec3::new(-1.0, 0.0, -1.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_aspect_ratio_widens_horizontally() {
        let camera = camera().with_resolution(200, 100);
        let mut rng = Random::new(1);
        assert_eq!(camera.aspect_ratio(), 2.0);

        let right = camera.generate_ray(1.0, 0.5, &mut rng);
        assert!((right.direction - Vec3::new(2.0, 0.0, -1.0).normalize()).length() < 1e-5);
    }

    #[test]
    fn test_aperture_rays_converge_on_focal_plane() {
        let mut camera = camera().with_aperture(0.2);
        camera.focal_length = 3.0;
        let mut rng = Random::new(9);

        let target = Vec3::new(0.0, 0.0, -3.0);
        for _ in 0..32 {
            let ray = camera.generate_ray(0.5, 0.5, &mut rng);
            assert!(ray.origin.length() <= 0.2 + 1e-5);

            // Every jittered ray passes through the focal point
            let t = (target.z - ray.origin.z) / ray.direction.z;
            assert!((ray.at(t) - target).length() < 1e-4);
        }
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let targets = [
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(-3.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, -4.0, 0.0),
            Vec3::new(1.0, 2.0, -3.0),
            Vec3::new(-2.0, -1.0, 0.5),
        ];
        let from = Vec3::new(0.5, 1.0, 2.0);

        for offset in targets {
            let mut camera = camera();
            camera.look_at(from, from + offset).unwrap();

            let forward = camera.frame.direction_to_world(FORWARD);
            assert!(
                (forward - offset.normalize()).length() < 1e-4,
                "offset {:?} -> forward {:?}",
                offset,
                forward
            );
            assert!((camera.focal_length - offset.length()).abs() < 1e-5);
            assert!((camera.frame.point_to_world(Vec3::ZERO) - from).length() < 1e-5);
        }
    }

    #[test]
    fn test_look_at_same_point_is_rejected() {
        let mut camera = camera();
        let before = camera.frame;

        let err = camera.look_at(Vec3::ONE, Vec3::ONE).unwrap_err();
        assert_eq!(err, CameraError::DegenerateDirection(Vec3::ONE));
        assert_eq!(camera.frame, before);
    }

    #[test]
    fn test_look_at_failed_lock_keeps_camera() {
        let mut camera = camera();
        camera.frame.scale = Vec3::new(1.0, 0.0, 1.0);
        let before = camera.frame;

        let err = camera
            .look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO)
            .unwrap_err();
        assert!(matches!(err, CameraError::Frame(FrameError::SingularMatrix { .. })));

        // Pose and matrices untouched, so rays still come from the old origin
        assert_eq!(camera.frame, before);
        assert_eq!(camera.focal_length, 1.0);
        let ray = camera.generate_ray(0.5, 0.5, &mut Random::new(1));
        assert_eq!(ray.origin, Vec3::ZERO);
    }

    #[test]
    fn test_euler_round_trip() {
        let angles = Vec3::new(0.3, -0.7, 1.1);
        let frame = Frame::new().with_rotation(angles).locked().unwrap();
        let m = Mat3::from_mat4(frame.frame_to_world());

        let recovered = euler_from_matrix(&m);
        assert!((recovered - angles).length() < 1e-4);
    }
}
