//! Builds a ready-to-render [`ViewerController`] from a [`ViewerConfig`].

use std::rc::Rc;

use glam::{Vec3, Vec4};
use meshview_core::{
    catalog::{ModelEntry, ModelSource, TextureEntry, TextureSource, ViewerConfig},
    light::Lights,
    mesh::{obj, shapes, MeshData},
    selection::ShadingStyle,
    transform::Transform,
};

use crate::{
    abs::{GpuMesh, GraphicsContext, Texture},
    controller::{CatalogModel, CatalogTexture, MaterialSet, ViewerController},
    error::ViewerError,
    render::{
        material::UnlitMaterial,
        programs::ShaderLibrary,
        scene::{MeshEntity, Scene},
    },
};

const MARKER_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);
const FALLBACK_CHECKER: (Vec3, Vec3) = (Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO);

/// Validates the configuration, compiles the shaders, uploads the catalogue and
/// applies the initial selection.
pub fn build(
    gl: &mut dyn GraphicsContext,
    config: &ViewerConfig,
) -> Result<ViewerController, ViewerError> {
    config.validate()?;
    let library = ShaderLibrary::new();
    library.compile_all(gl)?;
    let materials = MaterialSet::new(gl, &library)?;

    let textures = config
        .textures
        .iter()
        .enumerate()
        .map(|(unit, entry)| load_texture(gl, entry, unit as u32))
        .collect::<Result<Vec<_>, _>>()?;

    let models = config
        .models
        .iter()
        .map(|entry| load_model(gl, entry))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Loaded {} models and {} textures", models.len(), textures.len());

    let mut scene = Scene::new(Lights::new(&config.lighting));
    if config.lighting.marker_radius > 0.0 {
        scene.props.push(light_marker(gl, &library, config)?);
    }

    let controller = ViewerController::new(
        materials,
        models,
        textures,
        scene,
        config.untextured,
        &config.initial,
    )?;
    Ok(controller)
}

fn load_texture(
    gl: &mut dyn GraphicsContext,
    entry: &TextureEntry,
    unit: u32,
) -> Result<CatalogTexture, ViewerError> {
    let texture = match &entry.source {
        TextureSource::Image(path) => match image::open(path) {
            Ok(image) => Texture::new(gl, &image, unit)?,
            Err(err) => {
                log::warn!(
                    "Could not load texture '{}' from {}: {}. Using a placeholder",
                    entry.name,
                    path.display(),
                    err
                );
                let (even, odd) = FALLBACK_CHECKER;
                Texture::checker(gl, 64, 8, even, odd, unit)?
            }
        },
        TextureSource::Checker {
            size,
            cells,
            even,
            odd,
        } => Texture::checker(gl, *size, *cells, *even, *odd, unit)?,
    };

    Ok(CatalogTexture {
        name: entry.name.clone(),
        texture: Rc::new(texture),
        finish: entry.finish,
    })
}

fn load_model(
    gl: &mut dyn GraphicsContext,
    entry: &ModelEntry,
) -> Result<CatalogModel, ViewerError> {
    let data = match &entry.source {
        ModelSource::Shape(shape) => shape.build(),
        ModelSource::Obj(path) => obj::load_obj(path).map_err(|source| ViewerError::Model {
            name: entry.name.clone(),
            source,
        })?,
    };
    if data.is_empty() {
        log::warn!("Model '{}' has no triangles", entry.name);
    }

    Ok(CatalogModel {
        name: entry.name.clone(),
        mesh: Rc::new(GpuMesh::upload(gl, &data)?),
        double_sided: entry.double_sided,
    })
}

/// A small yellow sphere at the light position, drawn with its own unlit material.
fn light_marker(
    gl: &mut dyn GraphicsContext,
    library: &ShaderLibrary,
    config: &ViewerConfig,
) -> Result<MeshEntity, ViewerError> {
    let data: MeshData = shapes::sphere(config.lighting.marker_radius, 16, 8);
    let mesh = Rc::new(GpuMesh::upload(gl, &data)?);

    let mut material = UnlitMaterial::new(gl, library.program(ShadingStyle::Unlit))?;
    material.set_color(MARKER_COLOR);

    let material = Rc::new(std::cell::RefCell::new(material));
    let mut marker = MeshEntity::new("light", mesh, material.into());
    marker.transform = Transform::from_translation(config.lighting.position);
    Ok(marker)
}
