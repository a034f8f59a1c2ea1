use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use cgmath::Deg;

use crate::gfx::camera::RoomCamera;
use crate::gfx::resources::LightConfig;
use crate::gfx::scene::OrnamentPlacement;
use crate::obj::ObjLoadOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Everything that can be set from `room.toml`. Missing sections and keys
/// take the defaults below.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RoomConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_size")]
    pub width: u32,
    #[serde(default = "default_window_size")]
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_size(),
            height: default_window_size(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraConfig {
    /// Initial vertical field of view, degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Initial eye height
    #[serde(default = "default_elevation")]
    pub elevation: f32,
    /// Eye offset along X and Z
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            elevation: default_elevation(),
            distance: default_distance(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl CameraConfig {
    pub fn camera(&self, aspect: f32) -> RoomCamera {
        let mut camera = RoomCamera::new(self.distance, aspect);
        camera.fovy = Deg(self.fov);
        camera.elevation = self.elevation;
        camera.znear = self.near;
        camera.zfar = self.far;
        camera
    }
}

impl WindowConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightingConfig {
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_light_position")]
    pub position: [f32; 3],
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            color: default_light_color(),
            position: default_light_position(),
            ambient: default_ambient(),
        }
    }
}

impl LightingConfig {
    pub fn light(&self) -> LightConfig {
        LightConfig {
            position: self.position,
            color: self.color,
            ambient: self.ambient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_texture_dir")]
    pub texture_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: default_texture_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshConfig {
    /// OBJ file for the table ornament; no ornament when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Applied to vertex positions and texture coordinates while parsing
    #[serde(default = "default_mesh_scale")]
    pub scale: f32,
    #[serde(default)]
    pub reverse_normals: bool,
    /// Placement relative to the table top
    #[serde(default = "default_mesh_position")]
    pub position: [f32; 3],
    #[serde(default = "default_mesh_size")]
    pub size: [f32; 3],
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            path: None,
            scale: default_mesh_scale(),
            reverse_normals: false,
            position: default_mesh_position(),
            size: default_mesh_size(),
        }
    }
}

impl MeshConfig {
    pub fn load_options(&self) -> ObjLoadOptions {
        ObjLoadOptions {
            scale: self.scale,
            reverse: self.reverse_normals,
        }
    }

    pub fn placement(&self) -> OrnamentPlacement {
        OrnamentPlacement {
            translation: self.position,
            scale: self.size,
        }
    }
}

fn default_window_size() -> u32 {
    800
}
fn default_title() -> String {
    "Living Room".to_string()
}
fn default_fov() -> f32 {
    30.0
}
fn default_elevation() -> f32 {
    30.0
}
fn default_distance() -> f32 {
    30.0
}
fn default_near() -> f32 {
    1.0
}
fn default_far() -> f32 {
    100.0
}
fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_light_position() -> [f32; 3] {
    [0.0, 2.8, 0.0]
}
fn default_ambient() -> [f32; 3] {
    [0.2, 0.2, 0.2]
}
fn default_texture_dir() -> PathBuf {
    PathBuf::from("assets/textures")
}
fn default_mesh_scale() -> f32 {
    1.0
}
fn default_mesh_position() -> [f32; 3] {
    OrnamentPlacement::default().translation
}
fn default_mesh_size() -> [f32; 3] {
    OrnamentPlacement::default().scale
}

impl RoomConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
