//! The lit materials.
//!
//! [`GouraudMaterial`](super::GouraudMaterial) and [`PhongMaterial`](super::PhongMaterial) bind
//! exactly the same uniforms and attributes. They differ only in where their shaders evaluate
//! the lighting, so both are a [`LitMaterial`] tagged with a [`LightingModel`].

use std::{fmt, marker::PhantomData, rc::Rc};

use glam::Vec3;
use meshview_core::{
    camera::Camera,
    light::{LightKind, LightManager},
    selection::ShadingStyle,
    transform::Transform,
    Side,
};

use super::{bind_attribute, draw_indexed, skip_draw, CommonLocations};
use crate::abs::{
    AttributeSlot, GpuMesh, GraphicsContext, ShaderCompileError, ShaderProgram, SharedProgram,
    Texture, Uniform, UniformLocation,
};

/// Where the lighting equation is evaluated.
pub trait LightingModel {
    const STYLE: ShadingStyle;
}

#[derive(Debug, Clone, Copy)]
struct LightLocations {
    model: Option<UniformLocation>,
    normal_matrix: Option<UniformLocation>,
    eye_position: Option<UniformLocation>,
    ambient_color: Option<UniformLocation>,
    diffuse_color: Option<UniformLocation>,
    specular_color: Option<UniformLocation>,
    shininess: Option<UniformLocation>,
    ambient_intensity: Option<UniformLocation>,
    light_type: Option<UniformLocation>,
    light_position: Option<UniformLocation>,
    light_color: Option<UniformLocation>,
    normal: Option<AttributeSlot>,
}

impl LightLocations {
    fn resolve(
        program: &mut ShaderProgram,
        gl: &mut dyn GraphicsContext,
    ) -> Result<Self, ShaderCompileError> {
        Ok(Self {
            model: program.uniform_location(gl, "modelMatrix")?,
            normal_matrix: program.uniform_location(gl, "normalMatrix")?,
            eye_position: program.uniform_location(gl, "eyePosition")?,
            ambient_color: program.uniform_location(gl, "kAmbient")?,
            diffuse_color: program.uniform_location(gl, "kDiffuse")?,
            specular_color: program.uniform_location(gl, "kSpecular")?,
            shininess: program.uniform_location(gl, "shininess")?,
            ambient_intensity: program.uniform_location(gl, "ambientIntensity")?,
            light_type: program.uniform_location(gl, "lightType")?,
            light_position: program.uniform_location(gl, "lightPosition")?,
            light_color: program.uniform_location(gl, "lightColor")?,
            normal: program.attribute_location(gl, "normal")?,
        })
    }
}

/// A material lit by the scene's ambient term and its active light.
pub struct LitMaterial<M> {
    pub visible: bool,
    pub side: Side,
    pub texture: Option<Rc<Texture>>,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub shininess: f32,
    program: SharedProgram,
    locations: CommonLocations,
    lighting: LightLocations,
    _model: PhantomData<M>,
}

impl<M: LightingModel> LitMaterial<M> {
    /// Creates a white, moderately shiny material drawing with `program`, compiling it if needed.
    pub fn new(
        gl: &mut dyn GraphicsContext,
        program: &SharedProgram,
    ) -> Result<Self, ShaderCompileError> {
        let mut shader = program.borrow_mut();
        let locations = CommonLocations::resolve(&mut shader, gl)?;
        let lighting = LightLocations::resolve(&mut shader, gl)?;

        Ok(Self {
            visible: true,
            side: Side::Front,
            texture: None,
            ambient_color: Vec3::ONE,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            shininess: 30.0,
            program: Rc::clone(program),
            locations,
            lighting,
            _model: PhantomData,
        })
    }

    pub fn style(&self) -> ShadingStyle {
        M::STYLE
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
        lights: &dyn LightManager,
    ) {
        if skip_draw(self.visible, mesh) {
            return;
        }

        self.locations.begin(gl, self.side, transform, camera);

        let lighting = &self.lighting;
        transform.world_matrix().set_uniform(gl, lighting.model);
        transform.normal_matrix().set_uniform(gl, lighting.normal_matrix);
        camera.eye_position().set_uniform(gl, lighting.eye_position);

        self.ambient_color.set_uniform(gl, lighting.ambient_color);
        self.diffuse_color.set_uniform(gl, lighting.diffuse_color);
        self.specular_color.set_uniform(gl, lighting.specular_color);
        self.shininess.set_uniform(gl, lighting.shininess);

        lights.ambient_intensity().set_uniform(gl, lighting.ambient_intensity);
        let light = lights.active_light();
        LightKind::shader_code(light.map(|light| light.kind)).set_uniform(gl, lighting.light_type);
        if let Some(light) = light {
            light.position.set_uniform(gl, lighting.light_position);
            light.color.set_uniform(gl, lighting.light_color);
        }

        self.locations.bind_positions(gl, mesh);
        bind_attribute(gl, lighting.normal, mesh.normals, 3);
        self.locations.bind_colors(gl, mesh);
        self.locations.bind_texture(gl, self.texture.as_deref(), mesh);
        draw_indexed(gl, mesh);
    }
}

impl<M: LightingModel> fmt::Debug for LitMaterial<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LitMaterial")
            .field("style", &M::STYLE)
            .field("visible", &self.visible)
            .field("side", &self.side)
            .field("texture", &self.texture)
            .field("ambient_color", &self.ambient_color)
            .field("diffuse_color", &self.diffuse_color)
            .field("specular_color", &self.specular_color)
            .field("shininess", &self.shininess)
            .finish_non_exhaustive()
    }
}
