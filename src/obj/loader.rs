//! Background loading of OBJ files and their material libraries.
//!
//! The OBJ text is read and parsed on a worker thread. Each `mtllib` it
//! names is then read on its own thread, and the worker waits for every one
//! of them before publishing the finished document, so colour lookup never
//! races a material file that is still in flight.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::join_all;
use log::{debug, info, warn};

use super::document::{ObjDocument, ObjLoadOptions};
use super::mailbox::Mailbox;
use super::material::MaterialDocument;
use super::ObjError;

/// Where a finished (or failed) load is delivered
pub type MeshMailbox = Mailbox<Result<ObjDocument, ObjError>>;

/// Reads one material file. Unreadable files count as loaded and empty.
pub fn load_material_file(path: &Path) -> MaterialDocument {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("Material library {} not found, using default colours", path.display());
            return MaterialDocument::missing(path);
        }
        Err(err) => {
            warn!("Failed to read material library {}: {err}", path.display());
            return MaterialDocument::missing(path);
        }
    };

    match MaterialDocument::parse(&text, path) {
        Ok(doc) => {
            debug!("Loaded {} materials from {}", doc.materials.len(), path.display());
            doc
        }
        Err(err) => {
            warn!("Failed to parse material library {}: {err}", path.display());
            MaterialDocument::missing(path)
        }
    }
}

fn spawn_material_load(path: PathBuf) -> oneshot::Receiver<MaterialDocument> {
    let (sender, receiver) = oneshot::channel();
    let worker_path = path.clone();
    let spawned = thread::Builder::new()
        .name("mtl-loader".into())
        .spawn(move || {
            // The receiver only disappears if the OBJ worker gave up
            let _ = sender.send(load_material_file(&worker_path));
        });
    if let Err(err) = spawned {
        // Dropping the sender cancels the receiver; the caller substitutes
        // an empty document.
        warn!("Could not start loader for {}: {err}", path.display());
    }
    receiver
}

/// Loads an OBJ file and all of its material libraries, blocking until
/// every material file has completed.
pub fn load_obj_file(path: &Path, options: ObjLoadOptions) -> Result<ObjDocument, ObjError> {
    let text = fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc = ObjDocument::parse(&text, options, Some(path))?;

    let libraries = doc.material_libraries.clone();
    let pending: Vec<_> = libraries.iter().cloned().map(spawn_material_load).collect();
    let results = block_on(join_all(pending));

    for (library, result) in libraries.iter().zip(results) {
        let mtl = result.unwrap_or_else(|_| MaterialDocument::missing(library));
        doc.attach_material(mtl);
    }

    info!(
        "Loaded {}: {} objects, {} faces, {} material files",
        path.display(),
        doc.objects.len(),
        doc.face_count(),
        doc.mtls.len()
    );
    Ok(doc)
}

/// Starts loading on a worker thread and posts the outcome to `mailbox`.
pub fn spawn_obj_load(
    path: PathBuf,
    options: ObjLoadOptions,
    mailbox: MeshMailbox,
) -> Result<JoinHandle<()>, ObjError> {
    let thread_path = path.clone();
    thread::Builder::new()
        .name("obj-loader".into())
        .spawn(move || {
            let result = load_obj_file(&thread_path, options);
            if let Err(err) = &result {
                warn!("Mesh load failed: {err}");
            }
            mailbox.post(result);
        })
        .map_err(|source| ObjError::Io { path, source })
}
