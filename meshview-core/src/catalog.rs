//! The viewer configuration and its model and texture catalogue.
//!
//! A configuration is a JSON document. Every field has a default, so an empty
//! object `{}` yields the built-in catalogue: four procedural models and three
//! generated textures with the surface finishes the viewer was tuned with.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::{
    camera::CameraConfig,
    light::LightingConfig,
    mesh::Shape,
    selection::{Selection, ShadingStyle, TextureChoice},
};

/// Textures each keep their own unit. OpenGL 3.3 guarantees 16 fragment units.
pub const MAX_TEXTURES: usize = 16;

/// Errors in the configuration or in a selection made against it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unknown shading style '{0}'")]
    UnknownStyle(String),
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    #[error("unknown texture '{0}'")]
    UnknownTexture(String),
    #[error("unknown light type '{0}'")]
    UnknownLight(String),
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },
    #[error("the catalogue has no models")]
    NoModels,
    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),
    #[error("{count} textures exceed the {limit} texture units available")]
    TooManyTextures { count: usize, limit: usize },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Mesh Viewer".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Where a model's geometry comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    Shape(Shape),
    Obj(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub source: ModelSource,
    /// Open surfaces show their inside and are rendered with both faces.
    #[serde(default)]
    pub double_sided: bool,
}

/// Where a texture's pixels come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureSource {
    Image(PathBuf),
    Checker {
        size: u32,
        cells: u32,
        even: Vec3,
        odd: Vec3,
    },
}

/// Material properties applied to every material together with a texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceFinish {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    /// Flat color of the unlit material.
    pub unlit_color: Vec4,
}

impl SurfaceFinish {
    /// A white finish that lets the texture show through.
    pub fn textured(specular: f32, shininess: f32) -> Self {
        Self {
            ambient: Vec3::ONE,
            diffuse: Vec3::ONE,
            specular: Vec3::splat(specular),
            shininess,
            unlit_color: Vec4::ONE,
        }
    }
}

impl Default for SurfaceFinish {
    /// The untextured look: a salmon color with white highlights.
    fn default() -> Self {
        let base = Vec3::new(1.0, 0.4, 0.4);
        Self {
            ambient: base,
            diffuse: base,
            specular: Vec3::ONE,
            shininess: 50.0,
            unlit_color: base.extend(1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub name: String,
    pub source: TextureSource,
    pub finish: SurfaceFinish,
}

/// The complete viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub background: Vec3,
    pub log_level: String,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub models: Vec<ModelEntry>,
    pub textures: Vec<TextureEntry>,
    pub untextured: SurfaceFinish,
    /// An empty model name selects the first catalogue model.
    #[serde(default)]
    pub initial: Selection,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let model = |name: &str, shape: Shape, double_sided: bool| ModelEntry {
            name: name.to_string(),
            source: ModelSource::Shape(shape),
            double_sided,
        };
        let checker =
            |name: &str, cells: u32, even: Vec3, odd: Vec3, finish: SurfaceFinish| TextureEntry {
                name: name.to_string(),
                source: TextureSource::Checker {
                    size: 256,
                    cells,
                    even,
                    odd,
                },
                finish,
            };

        Self {
            window: WindowConfig::default(),
            background: Vec3::splat(0.7),
            log_level: "info".to_string(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            models: vec![
                model("sphere", Shape::Sphere, false),
                model("cube", Shape::Cube, false),
                model("torus", Shape::Torus, false),
                model("cylinder", Shape::Cylinder, true),
            ],
            textures: vec![
                checker(
                    "Gravel",
                    32,
                    Vec3::new(0.55, 0.53, 0.5),
                    Vec3::new(0.35, 0.34, 0.32),
                    SurfaceFinish::textured(1.0, 50.0),
                ),
                checker(
                    "Bark",
                    6,
                    Vec3::new(0.45, 0.3, 0.18),
                    Vec3::new(0.3, 0.19, 0.1),
                    SurfaceFinish::textured(0.5, 10.0),
                ),
                checker(
                    "Stained Glass",
                    4,
                    Vec3::new(0.2, 0.45, 0.9),
                    Vec3::new(0.9, 0.75, 0.2),
                    SurfaceFinish::textured(1.0, 50.0),
                ),
            ],
            untextured: SurfaceFinish::default(),
            initial: Selection {
                style: ShadingStyle::Unlit,
                model: "sphere".to_string(),
                texture: TextureChoice::None,
                light: Default::default(),
            },
        }
    }
}

impl ViewerConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(source: &str) -> Result<Self, ConfigurationError> {
        let mut config: Self = serde_json::from_str(source)?;
        if config.initial.model.is_empty()
            && let Some(first) = config.models.first()
        {
            config.initial.model = first.name.clone();
        }
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file. Relative model and
    /// image paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&source)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for model in &mut self.models {
            if let ModelSource::Obj(path) = &mut model.source
                && path.is_relative()
            {
                *path = base.join(&*path);
            }
        }
        for texture in &mut self.textures {
            if let TextureSource::Image(path) = &mut texture.source
                && path.is_relative()
            {
                *path = base.join(&*path);
            }
        }
    }

    /// Rejects duplicate names, an initial selection outside the catalogue and
    /// camera planes the orbit camera cannot work with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.models.is_empty() {
            return Err(ConfigurationError::NoModels);
        }
        if self.textures.len() > MAX_TEXTURES {
            return Err(ConfigurationError::TooManyTextures {
                count: self.textures.len(),
                limit: MAX_TEXTURES,
            });
        }
        validate_camera(&self.camera)?;

        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.name.as_str()) {
                return Err(ConfigurationError::DuplicateName {
                    kind: "model",
                    name: model.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for texture in &self.textures {
            if texture.name == TextureChoice::NONE_LABEL || !seen.insert(texture.name.as_str()) {
                return Err(ConfigurationError::DuplicateName {
                    kind: "texture",
                    name: texture.name.clone(),
                });
            }
        }

        self.model(&self.initial.model)?;
        if let TextureChoice::Named(name) = &self.initial.texture {
            self.texture(name)?;
        }
        Ok(())
    }

    pub fn model(&self, name: &str) -> Result<&ModelEntry, ConfigurationError> {
        self.models
            .iter()
            .find(|model| model.name == name)
            .ok_or_else(|| ConfigurationError::UnknownModel(name.to_string()))
    }

    pub fn texture(&self, name: &str) -> Result<&TextureEntry, ConfigurationError> {
        self.textures
            .iter()
            .find(|texture| texture.name == name)
            .ok_or_else(|| ConfigurationError::UnknownTexture(name.to_string()))
    }
}

fn validate_camera(camera: &CameraConfig) -> Result<(), ConfigurationError> {
    let values = [
        camera.distance,
        camera.yaw,
        camera.pitch,
        camera.fov,
        camera.near,
        camera.far,
    ];
    if !values.iter().all(|value| value.is_finite()) {
        return Err(ConfigurationError::InvalidCamera("every value must be finite"));
    }
    if camera.near <= 0.0 {
        return Err(ConfigurationError::InvalidCamera("near must be positive"));
    }
    if camera.far <= camera.near {
        return Err(ConfigurationError::InvalidCamera("far must lie beyond near"));
    }
    let (min_distance, max_distance) = camera.distance_range();
    if min_distance > max_distance {
        return Err(ConfigurationError::InvalidCamera("near and far leave no room to orbit"));
    }
    if camera.fov <= 0.0 || camera.fov >= 180.0 {
        return Err(ConfigurationError::InvalidCamera("fov must be between 0 and 180 degrees"));
    }
    Ok(())
}
