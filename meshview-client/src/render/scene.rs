//! The scene the viewer draws each frame.

use std::rc::Rc;

use meshview_core::{camera::Camera, light::Lights, transform::Transform};

use super::material::MaterialHandle;
use crate::abs::{GpuMesh, GraphicsContext};

/// A mesh placed in the scene with the material it is drawn with.
#[derive(Debug, Clone)]
pub struct MeshEntity {
    pub name: String,
    pub mesh: Rc<GpuMesh>,
    pub transform: Transform,
    pub material: MaterialHandle,
    pub visible: bool,
}

impl MeshEntity {
    pub fn new(name: impl Into<String>, mesh: Rc<GpuMesh>, material: MaterialHandle) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Transform::IDENTITY,
            material,
            visible: true,
        }
    }
}

/// Catalogue models, fixed props and the lights.
#[derive(Debug)]
pub struct Scene {
    /// One entity per catalogue model, in catalogue order.
    pub models: Vec<MeshEntity>,
    /// Entities the selection never touches, such as the light marker.
    pub props: Vec<MeshEntity>,
    pub lights: Lights,
}

impl Scene {
    pub fn new(lights: Lights) -> Self {
        Self {
            models: Vec::new(),
            props: Vec::new(),
            lights,
        }
    }

    pub fn model(&self, name: &str) -> Option<&MeshEntity> {
        self.models.iter().find(|entity| entity.name == name)
    }

    /// Draws every visible entity, models first.
    pub fn render(&self, gl: &mut dyn GraphicsContext, camera: &dyn Camera) {
        for entity in self.models.iter().chain(&self.props) {
            if entity.visible {
                entity
                    .material
                    .draw(gl, &entity.mesh, &entity.transform, camera, &self.lights);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use meshview_core::selection::ShadingStyle;

    use super::*;
    use crate::render::material::{test_support::Fixture, UnlitMaterial};

    #[test]
    fn test_render_skips_invisible_entities() {
        let mut fixture = Fixture::new();
        let program = fixture.program(ShadingStyle::Unlit);
        let material = UnlitMaterial::new(&mut fixture.gl, &program).unwrap();
        let material = Rc::new(RefCell::new(material));
        let cube = Rc::new(fixture.cube.clone());

        let mut scene = Scene::new(fixture.lights);
        scene.models.push(MeshEntity::new("a", Rc::clone(&cube), material.clone().into()));
        scene.models.push(MeshEntity::new("b", Rc::clone(&cube), material.clone().into()));
        scene.props.push(MeshEntity::new("marker", cube, material.into()));
        scene.models[1].visible = false;

        scene.render(&mut fixture.gl, &fixture.camera);
        assert_eq!(fixture.gl.draw_count(), 2);
        assert!(scene.model("b").is_some());
        assert!(scene.model("c").is_none());
    }
}
