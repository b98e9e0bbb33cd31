//! Scene lights and the [`LightManager`] interface materials read them through.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The kind of a light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Point,
    Directional,
}

impl LightKind {
    /// The value of the `lightType` shader uniform. Zero means no light.
    pub fn shader_code(kind: Option<LightKind>) -> i32 {
        match kind {
            None => 0,
            Some(LightKind::Point) => 1,
            Some(LightKind::Directional) => 2,
        }
    }
}

/// The light a lit material shades with during one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveLight {
    pub kind: LightKind,
    /// World position for point lights, direction towards the light for
    /// directional lights.
    pub position: Vec3,
    pub color: Vec3,
}

/// Provides light data to materials at draw time.
pub trait LightManager {
    fn ambient_intensity(&self) -> Vec3;
    fn active_light(&self) -> Option<ActiveLight>;
}

/// A light entity in the scene. Its visibility is toggled, it is never
/// recreated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightEntity {
    pub kind: LightKind,
    pub position: Vec3,
    pub color: Vec3,
    pub visible: bool,
}

impl LightEntity {
    fn active(&self) -> Option<ActiveLight> {
        self.visible.then_some(ActiveLight {
            kind: self.kind,
            position: self.position,
            color: self.color,
        })
    }
}

/// Light setup from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient: Vec3,
    pub position: Vec3,
    pub color: Vec3,
    /// Radius of the marker sphere drawn at the light position, zero hides it.
    pub marker_radius: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.2),
            position: Vec3::new(0.75, 1.1, 1.0),
            color: Vec3::ONE,
            marker_radius: 0.05,
        }
    }
}

/// The lights of the viewer scene: an ambient term plus one point and one
/// directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub ambient: Vec3,
    pub point: LightEntity,
    pub directional: LightEntity,
}

impl Lights {
    /// Both lights share the configured position and color. The point light
    /// starts visible.
    pub fn new(config: &LightingConfig) -> Self {
        Self {
            ambient: config.ambient,
            point: LightEntity {
                kind: LightKind::Point,
                position: config.position,
                color: config.color,
                visible: true,
            },
            directional: LightEntity {
                kind: LightKind::Directional,
                position: config.position,
                color: config.color,
                visible: false,
            },
        }
    }
}

impl LightManager for Lights {
    fn ambient_intensity(&self) -> Vec3 {
        self.ambient
    }

    fn active_light(&self) -> Option<ActiveLight> {
        self.point.active().or_else(|| self.directional.active())
    }
}
