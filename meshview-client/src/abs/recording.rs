//! A [`GraphicsContext`] that records calls instead of issuing them, for tests.

use std::{
    collections::{HashMap, HashSet},
    num::NonZeroU32,
};

use glam::{Mat4, Vec3, Vec4};
use meshview_core::Side;

use super::{
    gpu::{
        AttributeSlot, BufferId, BufferTarget, GpuError, GraphicsContext, ProgramId, TextureId,
        UniformLocation,
    },
    shader::{ShaderCompileError, ShaderStage},
};

/// One recorded state change or draw.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    UseProgram(ProgramId),
    CullSide(Side),
    Uniform1i(UniformLocation, i32),
    Uniform1f(UniformLocation, f32),
    Uniform3f(UniformLocation, Vec3),
    Uniform4f(UniformLocation, Vec4),
    UniformMatrix4(UniformLocation, Mat4),
    BindVertexBuffer(BufferId),
    AttribPointer(AttributeSlot, i32),
    EnableAttrib(AttributeSlot),
    DisableAttrib(AttributeSlot),
    BindTexture(u32, TextureId),
    BindIndexBuffer(BufferId),
    DrawTriangles(i32),
}

/// Records draw-time calls in `calls` and tracks which attribute slots are enabled.
///
/// Every program sees the same name registry, so a uniform or attribute name resolves to the
/// same location in all programs. Resource creation is counted, not recorded.
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub calls: Vec<GlCall>,
    pub enabled: HashSet<AttributeSlot>,
    pub programs_created: usize,
    pub buffers_created: usize,
    pub textures_created: usize,
    pub location_queries: usize,
    missing: HashSet<String>,
    failure: Option<(ShaderStage, String)>,
    uniforms: HashMap<String, UniformLocation>,
    attributes: HashMap<String, AttributeSlot>,
    next_id: u32,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose programs do not declare `names`.
    pub fn without(mut self, names: &[&str]) -> Self {
        self.missing.extend(names.iter().map(|name| name.to_string()));
        self
    }

    /// A context where every program creation fails at `stage`.
    pub fn failing(stage: ShaderStage, log: &str) -> Self {
        Self {
            failure: Some((stage, log.to_string())),
            ..Self::default()
        }
    }

    /// The location the uniform `name` resolves to.
    pub fn uniform(&mut self, name: &str) -> UniformLocation {
        let next = self.uniforms.len() as u32;
        *self
            .uniforms
            .entry(name.to_string())
            .or_insert(UniformLocation(next))
    }

    /// The slot the attribute `name` resolves to.
    pub fn attribute(&mut self, name: &str) -> AttributeSlot {
        let next = self.attributes.len() as AttributeSlot;
        *self.attributes.entry(name.to_string()).or_insert(next)
    }

    pub fn is_enabled(&mut self, attribute: &str) -> bool {
        let slot = self.attribute(attribute);
        self.enabled.contains(&slot)
    }

    /// Every value uploaded to the uniform `name`, in order.
    pub fn uploads(&mut self, name: &str) -> Vec<GlCall> {
        let location = self.uniform(name);
        self.calls
            .iter()
            .filter(|call| match call {
                GlCall::Uniform1i(loc, _)
                | GlCall::Uniform1f(loc, _)
                | GlCall::Uniform3f(loc, _)
                | GlCall::Uniform4f(loc, _)
                | GlCall::UniformMatrix4(loc, _) => *loc == location,
                _ => false,
            })
            .cloned()
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, GlCall::DrawTriangles(_)))
            .count()
    }

    fn next_id(&mut self) -> NonZeroU32 {
        self.next_id += 1;
        NonZeroU32::new(self.next_id).unwrap()
    }
}

impl GraphicsContext for RecordingContext {
    fn create_program(
        &mut self,
        _vertex_source: &str,
        _fragment_source: &str,
    ) -> Result<ProgramId, ShaderCompileError> {
        if let Some((stage, log)) = &self.failure {
            return Err(ShaderCompileError {
                stage: *stage,
                log: log.clone(),
            });
        }
        self.programs_created += 1;
        Ok(ProgramId(self.next_id()))
    }

    fn uniform_location(&mut self, _program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.location_queries += 1;
        (!self.missing.contains(name)).then(|| self.uniform(name))
    }

    fn attribute_location(&mut self, _program: ProgramId, name: &str) -> Option<AttributeSlot> {
        self.location_queries += 1;
        (!self.missing.contains(name)).then(|| self.attribute(name))
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(GlCall::UseProgram(program));
    }

    fn set_cull_side(&mut self, side: Side) {
        self.calls.push(GlCall::CullSide(side));
    }

    fn uniform_1_i32(&mut self, location: UniformLocation, value: i32) {
        self.calls.push(GlCall::Uniform1i(location, value));
    }

    fn uniform_1_f32(&mut self, location: UniformLocation, value: f32) {
        self.calls.push(GlCall::Uniform1f(location, value));
    }

    fn uniform_3_f32(&mut self, location: UniformLocation, value: Vec3) {
        self.calls.push(GlCall::Uniform3f(location, value));
    }

    fn uniform_4_f32(&mut self, location: UniformLocation, value: Vec4) {
        self.calls.push(GlCall::Uniform4f(location, value));
    }

    fn uniform_matrix_4_f32(&mut self, location: UniformLocation, value: &Mat4) {
        self.calls.push(GlCall::UniformMatrix4(location, *value));
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId) {
        self.calls.push(GlCall::BindVertexBuffer(buffer));
    }

    fn vertex_attrib_pointer_f32(&mut self, slot: AttributeSlot, components: i32) {
        self.calls.push(GlCall::AttribPointer(slot, components));
    }

    fn enable_vertex_attrib_array(&mut self, slot: AttributeSlot) {
        self.enabled.insert(slot);
        self.calls.push(GlCall::EnableAttrib(slot));
    }

    fn disable_vertex_attrib_array(&mut self, slot: AttributeSlot) {
        self.enabled.remove(&slot);
        self.calls.push(GlCall::DisableAttrib(slot));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.calls.push(GlCall::BindTexture(unit, texture));
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.calls.push(GlCall::BindIndexBuffer(buffer));
    }

    fn draw_triangles(&mut self, index_count: i32) {
        self.calls.push(GlCall::DrawTriangles(index_count));
    }

    fn create_buffer(&mut self, _target: BufferTarget, _data: &[u8]) -> Result<BufferId, GpuError> {
        self.buffers_created += 1;
        Ok(BufferId(self.next_id()))
    }

    fn create_texture(
        &mut self,
        _width: u32,
        _height: u32,
        _rgba: &[u8],
    ) -> Result<TextureId, GpuError> {
        self.textures_created += 1;
        Ok(TextureId(self.next_id()))
    }
}
