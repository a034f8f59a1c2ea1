use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use living_room::obj::{
    load_obj_file, spawn_obj_load, Color, MeshMailbox, ObjError, ObjLoadOptions,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("living-room-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const CUBE_OBJ: &str = "\
# two coloured quads
mtllib first.mtl
mtllib second.mtl
o panel
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
usemtl Red
f 1//1 2//1 3//1 4//1
usemtl Green
f 4 3 2 1
usemtl Missing
f 1 2 3
";

#[test]
fn loads_obj_with_sibling_material_files() {
    let dir = scratch_dir("siblings");
    fs::write(dir.join("panel.obj"), CUBE_OBJ).unwrap();
    fs::write(dir.join("first.mtl"), "newmtl Red\nKd 1 0 0\n").unwrap();
    fs::write(dir.join("second.mtl"), "newmtl Red\nKd 0 0 1\nnewmtl Green\nKd 0 1 0\n").unwrap();

    let doc = load_obj_file(&dir.join("panel.obj"), ObjLoadOptions::default()).unwrap();
    assert!(doc.is_mtl_complete());
    assert_eq!(doc.mtls.len(), 2);
    assert_eq!(doc.find_color("Red"), Color::new(1.0, 0.0, 0.0, 1.0));

    let info = doc.drawing_info().unwrap();
    assert_eq!(info.corner_count(), 6 + 6 + 3);
    assert_eq!(info.indices, (0..15).collect::<Vec<u16>>());
    assert_eq!(info.colors[0], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(info.colors[6], [0.0, 1.0, 0.0, 1.0]);
    assert_eq!(info.colors[12], Color::DEFAULT.to_array());
    assert_eq!(info.normals[0], [0.0, 0.0, 1.0]);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn absent_material_file_still_completes() {
    let dir = scratch_dir("absent-mtl");
    fs::write(dir.join("panel.obj"), CUBE_OBJ).unwrap();
    fs::write(dir.join("first.mtl"), "newmtl Red\nKd 1 0 0\n").unwrap();

    let doc = load_obj_file(&dir.join("panel.obj"), ObjLoadOptions::default()).unwrap();
    assert!(doc.is_mtl_complete());
    assert_eq!(doc.mtls.len(), 2);
    assert!(doc.mtls[1].materials.is_empty());
    assert_eq!(doc.find_color("Green"), Color::DEFAULT);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn background_load_posts_to_mailbox() {
    let dir = scratch_dir("background");
    fs::write(dir.join("panel.obj"), CUBE_OBJ).unwrap();

    let mailbox = MeshMailbox::new();
    let handle = spawn_obj_load(dir.join("panel.obj"), ObjLoadOptions::default(), mailbox.clone())
        .unwrap();
    handle.join().unwrap();

    let doc = mailbox.take().expect("load posted a result").unwrap();
    assert_eq!(doc.objects[0].name, "panel");
    assert!(mailbox.take().is_none());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn background_parse_failure_is_delivered_as_error() {
    let dir = scratch_dir("broken");
    fs::write(dir.join("broken.obj"), "v 0 0 0\nf 1 2 3\n").unwrap();

    let mailbox = MeshMailbox::new();
    spawn_obj_load(dir.join("broken.obj"), ObjLoadOptions::default(), mailbox.clone())
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let result = loop {
        if let Some(result) = mailbox.take() {
            break result;
        }
        assert!(Instant::now() < deadline, "loader never posted");
        std::thread::sleep(Duration::from_millis(5));
    };
    assert!(matches!(result, Err(ObjError::VertexOutOfRange { .. })));

    fs::remove_dir_all(dir).ok();
}
