//! The four independent selection axes of the viewer.
//!
//! Each axis parses from (and displays as) the label the user picks it by, so
//! an unknown label is rejected with a [`ConfigurationError`] instead of
//! silently rendering nothing.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::catalog::ConfigurationError;

/// The lighting algorithm a material implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadingStyle {
    #[default]
    Unlit,
    Gouraud,
    Phong,
}

impl ShadingStyle {
    pub const ALL: [ShadingStyle; 3] = [
        ShadingStyle::Unlit,
        ShadingStyle::Gouraud,
        ShadingStyle::Phong,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShadingStyle::Unlit => "Unlit",
            ShadingStyle::Gouraud => "Gouraud",
            ShadingStyle::Phong => "Phong",
        }
    }
}

impl fmt::Display for ShadingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShadingStyle {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownStyle(s.to_string()))
    }
}

/// The light configuration of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LightChoice {
    #[default]
    #[serde(rename = "Point Light")]
    Point,
    #[serde(rename = "Directional Light")]
    Directional,
    #[serde(rename = "Ambient Only")]
    AmbientOnly,
}

impl LightChoice {
    pub const ALL: [LightChoice; 3] = [
        LightChoice::Point,
        LightChoice::Directional,
        LightChoice::AmbientOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LightChoice::Point => "Point Light",
            LightChoice::Directional => "Directional Light",
            LightChoice::AmbientOnly => "Ambient Only",
        }
    }

    /// The next choice, wrapping around.
    pub fn next(self) -> Self {
        match self {
            LightChoice::Point => LightChoice::Directional,
            LightChoice::Directional => LightChoice::AmbientOnly,
            LightChoice::AmbientOnly => LightChoice::Point,
        }
    }
}

impl fmt::Display for LightChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LightChoice {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|light| light.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownLight(s.to_string()))
    }
}

/// The surface texture, either none or a catalogue texture by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextureChoice {
    #[default]
    None,
    Named(String),
}

impl TextureChoice {
    pub const NONE_LABEL: &'static str = "None";

    pub fn name(&self) -> &str {
        match self {
            TextureChoice::None => Self::NONE_LABEL,
            TextureChoice::Named(name) => name,
        }
    }
}

impl From<String> for TextureChoice {
    fn from(value: String) -> Self {
        if value == Self::NONE_LABEL {
            TextureChoice::None
        } else {
            TextureChoice::Named(value)
        }
    }
}

impl From<&str> for TextureChoice {
    fn from(value: &str) -> Self {
        TextureChoice::from(value.to_string())
    }
}

impl From<TextureChoice> for String {
    fn from(value: TextureChoice) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for TextureChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete selection over all four axes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub style: ShadingStyle,
    pub model: String,
    pub texture: TextureChoice,
    pub light: LightChoice,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {} | {}", self.style, self.model, self.texture, self.light)
    }
}
