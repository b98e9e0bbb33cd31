//! Cameras.
//!
//! Materials only ever see a [`Camera`] through its view and projection
//! matrices. The viewer drives an [`OrbitCamera`] around the origin.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Anything that can provide view and projection matrices.
pub trait Camera {
    fn view_matrix(&self) -> Mat4;
    fn projection_matrix(&self) -> Mat4;

    /// The eye position in world space.
    fn eye_position(&self) -> Vec3 {
        self.view_matrix().inverse().w_axis.truncate()
    }
}

/// Initial orbit camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    /// Degrees around the Y axis, zero looks down -Z.
    pub yaw: f32,
    /// Degrees above the horizon.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraConfig {
    /// The closest and farthest orbit distances the near and far planes allow.
    pub fn distance_range(&self) -> (f32, f32) {
        (self.near * 2.0, self.far * 0.8)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 2.0,
            yaw: -30.0,
            pitch: 15.0,
            fov: 60.0,
            near: 0.1,
            far: 10.0,
        }
    }
}

/// A camera orbiting a target point with Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,   // radians
    pub pitch: f32, // radians
    pub fov: f32,   // degrees
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), 16.0 / 9.0)
    }
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig, aspect_ratio: f32) -> Self {
        let (min_distance, max_distance) = config.distance_range();
        let mut camera = Self {
            target: Vec3::ZERO,
            distance: config.distance,
            yaw: config.yaw.to_radians(),
            pitch: 0.0,
            fov: config.fov,
            aspect_ratio,
            near: config.near,
            far: config.far,
            min_distance,
            max_distance,
        };
        camera.orbit(0.0, config.pitch.to_radians());
        camera.zoom(0.0);
        camera
    }

    pub fn update_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;

        let limit = 89.0f32.to_radians();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    pub fn zoom(&mut self, delta: f32) {
        // `clamp` panics on an inverted range.
        self.distance = (self.distance - delta).max(self.min_distance).min(self.max_distance);
    }

    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        let offset = Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance;
        self.target + offset
    }
}

impl Camera for OrbitCamera {
    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    fn eye_position(&self) -> Vec3 {
        self.position()
    }
}
