//! MTL reader: diffuse colours keyed by material name.

use std::path::{Path, PathBuf};

use super::string_parser::StringParser;
use super::ObjError;

/// RGBA colour in linear 0..1 range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Used for faces whose material is unknown
    pub const DEFAULT: Color = Color::new(0.8, 0.8, 0.8, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
}

/// Contents of one `.mtl` file
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDocument {
    pub path: PathBuf,
    pub materials: Vec<Material>,
    /// Set once the file has been read, or found to be missing
    pub complete: bool,
}

impl MaterialDocument {
    /// Placeholder for a file that could not be read; counts as loaded.
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            materials: Vec::new(),
            complete: true,
        }
    }

    /// Parses MTL text. Only `newmtl` and `Kd` are understood.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ObjError> {
        let mut materials = Vec::new();
        let mut pending_name: Option<String> = None;

        for (line_index, line) in text.lines().enumerate() {
            let mut sp = StringParser::new(line, line_index + 1);
            let Some(command) = sp.get_word() else {
                continue;
            };

            match command {
                "newmtl" => {
                    pending_name = Some(sp.get_word().unwrap_or("").to_string());
                }
                "Kd" => {
                    let r = sp.get_float("Kd")?;
                    let g = sp.get_float("Kd")?;
                    let b = sp.get_float("Kd")?;
                    match pending_name.take() {
                        Some(name) => materials.push(Material {
                            name,
                            color: Color::new(r, g, b, 1.0),
                        }),
                        None => log::debug!(
                            "{}:{}: Kd without newmtl ignored",
                            path.display(),
                            sp.line()
                        ),
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            materials,
            complete: true,
        })
    }

    pub fn find(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kd_binds_to_latest_newmtl() {
        let text = "# colours\nnewmtl Red\nKd 1 0 0\nnewmtl Blue\nKd 0 0 1\n";
        let doc = MaterialDocument::parse(text, Path::new("a.mtl")).unwrap();
        assert!(doc.complete);
        assert_eq!(doc.materials.len(), 2);
        assert_eq!(doc.find("Red").unwrap().color, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(doc.find("Blue").unwrap().color, Color::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn kd_without_name_is_dropped() {
        let text = "Kd 0.5 0.5 0.5\nnewmtl Only\nKd 0.1 0.2 0.3\nKd 0.9 0.9 0.9\n";
        let doc = MaterialDocument::parse(text, Path::new("a.mtl")).unwrap();
        assert_eq!(doc.materials.len(), 1);
        assert_eq!(doc.materials[0].name, "Only");
        assert_eq!(doc.materials[0].color, Color::new(0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn names_are_read_as_single_words() {
        let text = "newmtl \"Red\"\nKd 1 0 0\nnewmtl Dark Red\nKd 0.5 0 0\n";
        let doc = MaterialDocument::parse(text, Path::new("a.mtl")).unwrap();
        assert_eq!(doc.materials[0].name, "Red");
        assert_eq!(doc.materials[1].name, "Dark");
        assert!(doc.find("Dark Red").is_none());
    }

    #[test]
    fn missing_file_is_complete_and_empty() {
        let doc = MaterialDocument::missing("gone.mtl");
        assert!(doc.complete);
        assert!(doc.materials.is_empty());
        assert!(doc.find("anything").is_none());
    }

    #[test]
    fn bad_kd_is_an_error() {
        let err = MaterialDocument::parse("newmtl X\nKd 1 zero 0\n", Path::new("a.mtl"))
            .unwrap_err();
        assert!(matches!(err, ObjError::InvalidNumber { line: 2, .. }));
    }
}
