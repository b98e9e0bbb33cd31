use std::rc::Rc;

use glam::Vec4;
use meshview_core::{camera::Camera, light::LightManager, transform::Transform, Side};

use super::{draw_indexed, skip_draw, CommonLocations};
use crate::abs::{
    GpuMesh, GraphicsContext, ShaderCompileError, SharedProgram, Texture, Uniform, UniformLocation,
};

/// A flat color, optionally modulated by a texture. Ignores lights.
#[derive(Debug)]
pub struct UnlitMaterial {
    pub visible: bool,
    pub side: Side,
    pub texture: Option<Rc<Texture>>,
    color: Vec4,
    program: SharedProgram,
    locations: CommonLocations,
    material_color: Option<UniformLocation>,
}

impl UnlitMaterial {
    /// Creates a white material drawing with `program`, compiling it if needed.
    pub fn new(
        gl: &mut dyn GraphicsContext,
        program: &SharedProgram,
    ) -> Result<Self, ShaderCompileError> {
        let mut shader = program.borrow_mut();
        let locations = CommonLocations::resolve(&mut shader, gl)?;
        let material_color = shader.uniform_location(gl, "materialColor")?;

        Ok(Self {
            visible: true,
            side: Side::Front,
            texture: None,
            color: Vec4::ONE,
            program: Rc::clone(program),
            locations,
            material_color,
        })
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    pub fn program(&self) -> &SharedProgram {
        &self.program
    }

    pub fn draw(
        &self,
        gl: &mut dyn GraphicsContext,
        mesh: &GpuMesh,
        transform: &Transform,
        camera: &dyn Camera,
        _lights: &dyn LightManager,
    ) {
        if skip_draw(self.visible, mesh) {
            return;
        }

        self.locations.begin(gl, self.side, transform, camera);
        self.color.set_uniform(gl, self.material_color);
        self.locations.bind_positions(gl, mesh);
        self.locations.bind_colors(gl, mesh);
        self.locations.bind_texture(gl, self.texture.as_deref(), mesh);
        draw_indexed(gl, mesh);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use meshview_core::selection::ShadingStyle;

    use super::*;
    use crate::{abs::recording::GlCall, render::material::test_support::Fixture};

    fn material(fixture: &mut Fixture) -> UnlitMaterial {
        let program = fixture.program(ShadingStyle::Unlit);
        UnlitMaterial::new(&mut fixture.gl, &program).unwrap()
    }

    fn draw(fixture: &mut Fixture, material: &UnlitMaterial) {
        material.draw(
            &mut fixture.gl,
            &fixture.cube,
            &Transform::IDENTITY,
            &fixture.camera,
            &fixture.lights,
        );
    }

    #[test]
    fn test_untextured_draw_sequence() {
        let mut fixture = Fixture::new();
        let mut material = material(&mut fixture);
        let color = Vec4::new(1.0, 0.4, 0.4, 1.0);
        material.set_color(color);
        fixture.gl.calls.clear();

        draw(&mut fixture, &material);

        let gl = &mut fixture.gl;
        let program = material.program().borrow().id().unwrap();
        let position = gl.attribute("position");
        let color_slot = gl.attribute("color");
        let tex_coord = gl.attribute("texCoord");
        let expected = vec![
            GlCall::UseProgram(program),
            GlCall::CullSide(Side::Front),
            GlCall::UniformMatrix4(gl.uniform("modelViewMatrix"), fixture.camera.view_matrix()),
            GlCall::UniformMatrix4(
                gl.uniform("projectionMatrix"),
                fixture.camera.projection_matrix(),
            ),
            GlCall::Uniform4f(gl.uniform("materialColor"), color),
            GlCall::BindVertexBuffer(fixture.cube.positions),
            GlCall::AttribPointer(position, 3),
            GlCall::EnableAttrib(position),
            GlCall::BindVertexBuffer(fixture.cube.colors),
            GlCall::AttribPointer(color_slot, 4),
            GlCall::EnableAttrib(color_slot),
            GlCall::Uniform1i(gl.uniform("useTexture"), 0),
            GlCall::DisableAttrib(tex_coord),
            GlCall::BindIndexBuffer(fixture.cube.indices),
            GlCall::DrawTriangles(36),
        ];
        assert_eq!(gl.calls, expected);
        assert_eq!(gl.draw_count(), 1);
    }

    #[test]
    fn test_textured_draw_binds_unit_and_tex_coords() {
        let mut fixture = Fixture::new();
        let mut material = material(&mut fixture);
        material.texture = Some(Rc::clone(&fixture.texture));
        fixture.gl.calls.clear();

        draw(&mut fixture, &material);

        let gl = &mut fixture.gl;
        let tex_coord = gl.attribute("texCoord");
        assert_eq!(
            gl.uploads("useTexture"),
            vec![GlCall::Uniform1i(gl.uniform("useTexture"), 1)]
        );
        assert_eq!(
            gl.uploads("textureImage"),
            vec![GlCall::Uniform1i(gl.uniform("textureImage"), 2)]
        );
        assert!(gl.calls.contains(&GlCall::BindTexture(2, fixture.texture.id())));
        assert!(gl.calls.contains(&GlCall::AttribPointer(tex_coord, 2)));
        assert!(gl.is_enabled("texCoord"));
    }

    #[test]
    fn test_texture_toggle_on_one_instance() {
        let mut fixture = Fixture::new();
        let material = Rc::new(RefCell::new(material(&mut fixture)));
        material.borrow_mut().texture = Some(Rc::clone(&fixture.texture));

        draw(&mut fixture, &material.borrow());
        assert!(fixture.gl.is_enabled("texCoord"));

        material.borrow_mut().texture = None;
        fixture.gl.calls.clear();
        draw(&mut fixture, &material.borrow());

        let use_texture = fixture.gl.uniform("useTexture");
        assert_eq!(fixture.gl.uploads("useTexture"), vec![GlCall::Uniform1i(use_texture, 0)]);
        assert!(!fixture.gl.is_enabled("texCoord"));
        assert!(!fixture.gl.calls.iter().any(|call| matches!(call, GlCall::BindTexture(..))));
    }

    #[test]
    fn test_back_side_is_applied() {
        let mut fixture = Fixture::new();
        let mut material = material(&mut fixture);
        material.side = Side::Back;
        fixture.gl.calls.clear();
        draw(&mut fixture, &material);
        assert_eq!(fixture.gl.calls[1], GlCall::CullSide(Side::Back));
    }

    #[test]
    fn test_missing_color_uniform_is_skipped() {
        let gl = crate::abs::recording::RecordingContext::new().without(&["materialColor"]);
        let mut fixture = Fixture::with_context(gl);
        let material = material(&mut fixture);
        fixture.gl.calls.clear();
        draw(&mut fixture, &material);
        assert!(!fixture.gl.calls.iter().any(|call| matches!(call, GlCall::Uniform4f(..))));
        assert_eq!(fixture.gl.draw_count(), 1);
    }
}
