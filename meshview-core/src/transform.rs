//! World transforms of scene entities.

use glam::{Mat4, Quat, Vec3};

/// Translation, rotation and scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The local to world matrix: scale, then rotate, then translate.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Inverse transpose of the world matrix, for transforming normals.
    pub fn normal_matrix(&self) -> Mat4 {
        self.world_matrix().inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_matrix_order() {
        let transform =
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::splat(0.5));
        let point = transform.world_matrix().transform_point3(Vec3::X);
        assert!((point - Vec3::new(1.5, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let transform = Transform::IDENTITY.with_scale(Vec3::new(2.0, 1.0, 1.0));
        let normal = transform.normal_matrix().transform_vector3(Vec3::X);
        assert!((normal - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    }
}
