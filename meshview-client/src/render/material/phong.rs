use meshview_core::selection::ShadingStyle;

use super::{LightingModel, LitMaterial};

/// Lighting evaluated per fragment from interpolated normals.
#[derive(Debug, Clone, Copy)]
pub struct PerPixel;

impl LightingModel for PerPixel {
    const STYLE: ShadingStyle = ShadingStyle::Phong;
}

/// Per-pixel lit material.
pub type PhongMaterial = LitMaterial<PerPixel>;

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glam::Vec3;
    use meshview_core::{transform::Transform, Side};

    use super::*;
    use crate::{
        abs::recording::GlCall,
        render::material::{test_support::Fixture, GouraudMaterial},
    };

    fn draw_calls(fixture: &mut Fixture, style: ShadingStyle) -> Vec<GlCall> {
        let program = fixture.program(style);
        fixture.gl.calls.clear();
        match style {
            ShadingStyle::Gouraud => GouraudMaterial::new(&mut fixture.gl, &program).unwrap().draw(
                &mut fixture.gl,
                &fixture.cube,
                &Transform::IDENTITY,
                &fixture.camera,
                &fixture.lights,
            ),
            _ => PhongMaterial::new(&mut fixture.gl, &program).unwrap().draw(
                &mut fixture.gl,
                &fixture.cube,
                &Transform::IDENTITY,
                &fixture.camera,
                &fixture.lights,
            ),
        }
        std::mem::take(&mut fixture.gl.calls)
    }

    #[test]
    fn test_same_protocol_as_per_vertex_lighting() {
        let mut fixture = Fixture::new();
        let gouraud = draw_calls(&mut fixture, ShadingStyle::Gouraud);
        let phong = draw_calls(&mut fixture, ShadingStyle::Phong);

        // Only the program differs.
        assert!(matches!(gouraud[0], GlCall::UseProgram(_)));
        assert_ne!(gouraud[0], phong[0]);
        assert_eq!(gouraud[1..], phong[1..]);
    }

    #[test]
    fn test_double_sided_with_directional_light() {
        let mut fixture = Fixture::new();
        fixture.lights.point.visible = false;
        fixture.lights.directional.visible = true;
        let program = fixture.program(ShadingStyle::Phong);
        let mut material = PhongMaterial::new(&mut fixture.gl, &program).unwrap();
        material.side = Side::Double;
        material.texture = Some(Rc::clone(&fixture.texture));
        material.diffuse_color = Vec3::new(0.25, 0.5, 1.0);

        material.draw(
            &mut fixture.gl,
            &fixture.cube,
            &Transform::IDENTITY,
            &fixture.camera,
            &fixture.lights,
        );

        let gl = &mut fixture.gl;
        assert_eq!(gl.calls[1], GlCall::CullSide(Side::Double));
        assert_eq!(gl.uploads("lightType"), vec![GlCall::Uniform1i(gl.uniform("lightType"), 2)]);
        assert_eq!(
            gl.uploads("kDiffuse"),
            vec![GlCall::Uniform3f(gl.uniform("kDiffuse"), Vec3::new(0.25, 0.5, 1.0))]
        );
        assert!(gl.calls.contains(&GlCall::BindTexture(2, fixture.texture.id())));
        assert_eq!(material.style(), ShadingStyle::Phong);
    }
}
