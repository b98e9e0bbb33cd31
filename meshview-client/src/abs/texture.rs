//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct, a GPU texture bound to a fixed texture unit.

use glam::Vec3;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use super::gpu::{GpuError, GraphicsContext, TextureId};

/// A texture stored on the GPU, together with the unit it binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    id: TextureId,
    unit: u32,
    width: u32,
    height: u32,
}

impl Texture {
    /// Creates a new texture from the given [`image::DynamicImage`].
    pub fn new(
        gl: &mut dyn GraphicsContext,
        image: &DynamicImage,
        unit: u32,
    ) -> Result<Self, GpuError> {
        let (width, height) = image.dimensions();
        let data = image.to_rgba8().into_raw();
        Self::from_rgba(gl, width, height, &data, unit)
    }

    /// Creates a new texture from tightly packed RGBA8 pixels.
    pub fn from_rgba(
        gl: &mut dyn GraphicsContext,
        width: u32,
        height: u32,
        data: &[u8],
        unit: u32,
    ) -> Result<Self, GpuError> {
        let id = gl.create_texture(width, height, data)?;
        Ok(Self {
            id,
            unit,
            width,
            height,
        })
    }

    /// Creates a square checkerboard texture with `cells` cells per side.
    pub fn checker(
        gl: &mut dyn GraphicsContext,
        size: u32,
        cells: u32,
        even: Vec3,
        odd: Vec3,
        unit: u32,
    ) -> Result<Self, GpuError> {
        let image = checker_image(size, cells, even, odd);
        Self::new(gl, &DynamicImage::ImageRgba8(image), unit)
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    /// The texture unit this texture binds to.
    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to its unit.
    pub fn bind(&self, gl: &mut dyn GraphicsContext) {
        gl.bind_texture(self.unit, self.id);
    }
}

fn checker_image(size: u32, cells: u32, even: Vec3, odd: Vec3) -> RgbaImage {
    let size = size.max(1);
    let cell = (size / cells.clamp(1, size)).max(1);
    let to_pixel = |color: Vec3| {
        let [r, g, b] = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round().to_array();
        Rgba([r as u8, g as u8, b as u8, 255])
    };
    let (even, odd) = (to_pixel(even), to_pixel(odd));

    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { even } else { odd }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::recording::{GlCall, RecordingContext};

    #[test]
    fn test_checker_alternates_cells() {
        let image = checker_image(8, 4, Vec3::ONE, Vec3::ZERO);
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
        assert_eq!(image.get_pixel(2, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(2, 2), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_checker_with_more_cells_than_pixels() {
        let image = checker_image(4, 64, Vec3::ONE, Vec3::ZERO);
        assert_eq!(image.dimensions(), (4, 4));
        assert_ne!(image.get_pixel(0, 0), image.get_pixel(1, 0));
    }

    #[test]
    fn test_bind_uses_own_unit() {
        let mut gl = RecordingContext::new();
        let texture = Texture::checker(&mut gl, 16, 2, Vec3::ONE, Vec3::ZERO, 3).unwrap();
        assert_eq!((texture.width(), texture.height()), (16, 16));
        assert_eq!(gl.textures_created, 1);

        texture.bind(&mut gl);
        assert_eq!(gl.calls, vec![GlCall::BindTexture(3, texture.id())]);
    }
}
