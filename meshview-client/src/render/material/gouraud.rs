use meshview_core::selection::ShadingStyle;

use super::{LightingModel, LitMaterial};

/// Lighting evaluated per vertex and interpolated across each triangle.
#[derive(Debug, Clone, Copy)]
pub struct PerVertex;

impl LightingModel for PerVertex {
    const STYLE: ShadingStyle = ShadingStyle::Gouraud;
}

/// Per-vertex lit material.
pub type GouraudMaterial = LitMaterial<PerVertex>;
