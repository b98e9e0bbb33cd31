//! Module for anything related to rendering.
//!
//! This module contains the materials, the shader programs they share and the scene they draw.

pub mod material;
pub mod programs;
pub mod scene;
