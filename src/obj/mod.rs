//! # Wavefront OBJ/MTL Loading
//!
//! A small line-oriented reader for the subset of OBJ and MTL used by the
//! room's decorative mesh. Shared vertices are expanded into one vertex per
//! triangle corner so the result can be uploaded straight into GPU buffers.
//!
//! ## Key Components
//!
//! - [`ObjDocument`] - parsed objects, faces, vertices and normals
//! - [`MaterialDocument`] - diffuse colours declared in a `.mtl` file
//! - [`DrawingInfo`] - flat vertex/normal/colour/index arrays
//! - [`Mailbox`] - single-slot hand-off from the loader thread to the frame loop
//!
//! ## Usage
//!
//! ```rust
//! use living_room::obj::{ObjDocument, ObjLoadOptions};
//!
//! let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
//! let doc = ObjDocument::parse(text, ObjLoadOptions::default(), None).unwrap();
//! let info = doc.drawing_info().unwrap();
//! assert_eq!(info.indices, vec![0, 1, 2]);
//! ```

use std::path::PathBuf;

pub mod document;
pub mod drawing_info;
pub mod loader;
pub mod mailbox;
pub mod material;
pub mod string_parser;

pub use document::{Face, ObjDocument, ObjLoadOptions, ObjObject};
pub use drawing_info::DrawingInfo;
pub use loader::{load_obj_file, spawn_obj_load, MeshMailbox};
pub use mailbox::Mailbox;
pub use material::{Color, Material, MaterialDocument};

/// Errors raised while reading OBJ and MTL text
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: `{command}` is missing a value")]
    MissingValue { line: usize, command: &'static str },
    #[error("Line {line}: expected a number for `{command}`, found {found:?}")]
    InvalidNumber {
        line: usize,
        command: &'static str,
        found: String,
    },
    #[error("Line {line}: {found:?} is not a valid 1-based index")]
    InvalidIndex { line: usize, found: String },
    #[error("Line {line}: face has {count} vertices, at least 3 are required")]
    DegenerateFace { line: usize, count: usize },
    #[error("Line {line}: face references vertex {index} but only {available} are declared")]
    VertexOutOfRange {
        line: usize,
        index: usize,
        available: usize,
    },
    #[error("Face references normal {index} but only {available} are declared")]
    NormalOutOfRange { index: usize, available: usize },
    #[error("{0} face corners exceed the 16-bit index range")]
    TooManyCorners(usize),
}
