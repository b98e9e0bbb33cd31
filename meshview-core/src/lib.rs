//! The core of the meshview viewer. This crate holds everything that does not
//! touch the GPU: the selection axes, the model and texture catalogue, mesh
//! data and its loaders, cameras, transforms and lights.

use serde::{Deserialize, Serialize};

pub mod camera;
pub mod catalog;
pub mod light;
pub mod mesh;
pub mod selection;
pub mod transform;

/// Which triangle faces a material renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Only counter-clockwise (front facing) triangles.
    #[default]
    Front,
    /// Only clockwise (back facing) triangles.
    Back,
    /// Both faces, culling disabled.
    Double,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_serde_names() {
        assert_eq!(serde_json::to_string(&Side::Double).unwrap(), "\"double\"");
        let side: Side = serde_json::from_str("\"back\"").unwrap();
        assert_eq!(side, Side::Back);
        assert_eq!(Side::default(), Side::Front);
    }
}
