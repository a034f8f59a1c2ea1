//! The fixed set of surface textures used by the room.
//!
//! Images are decoded with the `image` crate and flipped vertically so that
//! texture coordinate `v = 0` is the bottom row. A file that is missing or
//! unreadable is replaced by a small solid-colour placeholder so the room
//! still renders.

use std::path::Path;

use log::{debug, warn};

use super::texture_resource::TextureResource;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Carpet,
    Wood,
    Brass,
    Suede,
    Iron,
    Canvas,
    Rug,
    Wool,
    Gloss,
    Plastic,
    Mesh,
    PowerButton,
    Soundwave,
}

impl TextureId {
    pub const ALL: [TextureId; 13] = [
        TextureId::Carpet,
        TextureId::Wood,
        TextureId::Brass,
        TextureId::Suede,
        TextureId::Iron,
        TextureId::Canvas,
        TextureId::Rug,
        TextureId::Wool,
        TextureId::Gloss,
        TextureId::Plastic,
        TextureId::Mesh,
        TextureId::PowerButton,
        TextureId::Soundwave,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn file_name(self) -> &'static str {
        match self {
            TextureId::Carpet => "carpet.jpg",
            TextureId::Wood => "wood.jpg",
            TextureId::Brass => "brass.jpg",
            TextureId::Suede => "suede.jpg",
            TextureId::Iron => "iron.jpg",
            TextureId::Canvas => "canvas.jpg",
            TextureId::Rug => "rug.jpg",
            TextureId::Wool => "wool.jpg",
            TextureId::Gloss => "gloss.jpg",
            TextureId::Plastic => "plastic.jpg",
            TextureId::Mesh => "mesh.jpg",
            TextureId::PowerButton => "powerbutton.jpg",
            TextureId::Soundwave => "soundwave.jpg",
        }
    }

    /// Rough average colour of the real texture
    fn placeholder_color(self) -> [u8; 4] {
        match self {
            TextureId::Carpet => [150, 140, 120, 255],
            TextureId::Wood => [120, 80, 45, 255],
            TextureId::Brass => [180, 150, 70, 255],
            TextureId::Suede => [110, 90, 75, 255],
            TextureId::Iron => [70, 70, 75, 255],
            TextureId::Canvas => [225, 215, 190, 255],
            TextureId::Rug => [140, 40, 40, 255],
            TextureId::Wool => [200, 200, 195, 255],
            TextureId::Gloss => [20, 20, 20, 255],
            TextureId::Plastic => [40, 40, 40, 255],
            TextureId::Mesh => [60, 60, 60, 255],
            TextureId::PowerButton => [200, 30, 30, 255],
            TextureId::Soundwave => [30, 60, 160, 255],
        }
    }
}

/// Decoded RGBA8 pixels, bottom row first
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        let image = image::open(path)?.flipv().to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    pub fn solid(color: [u8; 4], width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: color.repeat((width * height) as usize),
        }
    }

    pub fn placeholder(id: TextureId) -> Self {
        Self::solid(id.placeholder_color(), 2, 2)
    }

    /// Loads `id` from `dir`, falling back to its placeholder.
    pub fn load_or_placeholder(dir: &Path, id: TextureId) -> Self {
        let path = dir.join(id.file_name());
        match Self::load(&path) {
            Ok(image) => {
                debug!("Loaded {} ({}x{})", path.display(), image.width, image.height);
                image
            }
            Err(err) => {
                warn!("Using placeholder for {}: {err}", path.display());
                Self::placeholder(id)
            }
        }
    }
}

struct LoadedTexture {
    _resource: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// One texture + sampler bind group per [`TextureId`]
pub struct TextureLibrary {
    layout: BindGroupLayoutWithDesc,
    textures: Vec<LoadedTexture>,
}

impl TextureLibrary {
    pub fn create_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
        BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Surface Texture Bind Group")
    }

    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, dir: &Path) -> Self {
        let layout = Self::create_layout(device);
        let textures = TextureId::ALL
            .iter()
            .map(|&id| {
                let image = TextureImage::load_or_placeholder(dir, id);
                let label = id.file_name();
                let resource = TextureResource::create_from_rgba_data_with_filter(
                    device,
                    queue,
                    &image.rgba,
                    image.width,
                    image.height,
                    label,
                    wgpu::FilterMode::Linear,
                );
                let bind_group = BindGroupBuilder::new(&layout)
                    .texture(&resource.view)
                    .sampler(&resource.sampler)
                    .create(device, label);
                LoadedTexture {
                    _resource: resource,
                    bind_group,
                }
            })
            .collect();

        Self { layout, textures }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout.layout
    }

    pub fn bind_group(&self, id: TextureId) -> &wgpu::BindGroup {
        // Built from TextureId::ALL, so every index is present
        &self.textures[id.index()].bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_texture_has_its_own_file_and_slot() {
        let names: HashSet<_> = TextureId::ALL.iter().map(|id| id.file_name()).collect();
        assert_eq!(names.len(), TextureId::ALL.len());
        for (i, id) in TextureId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn missing_file_becomes_placeholder() {
        let image = TextureImage::load_or_placeholder(Path::new("/nonexistent/textures"), TextureId::Rug);
        assert_eq!(image, TextureImage::placeholder(TextureId::Rug));
        assert_eq!(image.rgba.len(), 2 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[140, 40, 40, 255]);
    }

    #[test]
    fn decoded_images_are_flipped_vertically() {
        let dir = std::env::temp_dir().join(format!("living-room-tex-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stripes.png");

        let mut source = image::RgbaImage::new(1, 2);
        source.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        source.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        source.save(&path).unwrap();

        let loaded = TextureImage::load(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (1, 2));
        assert_eq!(&loaded.rgba[..4], &[0, 0, 255, 255]);
        assert_eq!(&loaded.rgba[4..], &[255, 0, 0, 255]);

        std::fs::remove_dir_all(dir).ok();
    }
}
