//! The meshview client: the GPU layer, the materials and the viewer controller.
//!
//! The `meshview` binary opens a window and drives a [`controller::ViewerController`] built by
//! [`viewer::build`] from the configuration.

pub mod abs;
pub mod controller;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod viewer;
