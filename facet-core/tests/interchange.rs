//! End-to-end tests: import, measure, export and re-import.

use approx::assert_relative_eq;
use facet_core::{
    compute_mass_properties, export_mesh, load_surface, parse_surface, ExportFormat, ExportQueue,
    FacetError, ImportOptions, IndexMode, MeshBuffer, ObjWriter, Triangulator, Winding,
};
use nalgebra::{Point3, Vector3};

/// A closed box stretched and moved off the origin so exported coordinates
/// need several significant digits.
fn skewed_cube() -> MeshBuffer {
    let mut mesh = MeshBuffer::cuboid(1.7).unwrap();
    mesh.scale(1.0, 0.35, 2.25);
    mesh.translate(12.5, -0.031, 4.0);
    mesh
}

fn reimport(text: &str) -> MeshBuffer {
    let records = parse_surface(text).unwrap();
    Triangulator::default().build(&records).unwrap()
}

fn assert_same_triangles(a: &MeshBuffer, b: &MeshBuffer) {
    assert_eq!(a.triangle_count(), b.triangle_count());
    for (ta, tb) in a.triangles().zip(b.triangles()) {
        for (pa, pb) in ta.iter().zip(tb.iter()) {
            assert_relative_eq!(pa, pb, max_relative = 1e-6);
        }
    }
}

#[test]
fn three_record_example() {
    let mesh = reimport("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.vertex_count(), 3);
    for normal in mesh.normals() {
        assert_relative_eq!(*normal, Vector3::new(0.0, 0.0, 1.0));
    }
}

#[test]
fn relative_round_trip() {
    let mesh = skewed_cube();
    let mut out = Vec::new();
    export_mesh(
        &mesh,
        ExportFormat::Interchange(IndexMode::Relative),
        &mut out,
        &mut ObjWriter::new("cube"),
    )
    .unwrap();

    let back = reimport(&String::from_utf8(out).unwrap());
    assert_same_triangles(&mesh, &back);
}

#[test]
fn absolute_round_trip_across_objects() {
    let first = skewed_cube();
    let mut second = MeshBuffer::cuboid(0.25).unwrap();
    second.translate(-3.0, 0.0, 0.0);

    let mut queue = ExportQueue::new();
    queue.push(first.clone());
    queue.push(second.clone());

    let mut out = Vec::new();
    let mut writer = ObjWriter::new("part");
    queue
        .flush(
            ExportFormat::Interchange(IndexMode::Absolute),
            &mut out,
            &mut writer,
        )
        .unwrap();

    let mut expected = first;
    expected.append_mesh(&second, false).unwrap();
    let back = reimport(&String::from_utf8(out).unwrap());
    assert_same_triangles(&expected, &back);
}

#[test]
fn round_trip_preserves_mass_properties() {
    let mesh = skewed_cube();
    let mut out = Vec::new();
    export_mesh(
        &mesh,
        ExportFormat::Interchange(IndexMode::Absolute),
        &mut out,
        &mut ObjWriter::default(),
    )
    .unwrap();
    let back = reimport(&String::from_utf8(out).unwrap());

    let before = compute_mass_properties(&mesh, 2.0, Winding::CounterClockwise).unwrap();
    let after = compute_mass_properties(&back, 2.0, Winding::CounterClockwise).unwrap();
    assert_relative_eq!(before.mass, after.mass, max_relative = 1e-5);
    assert_relative_eq!(
        before.center_of_mass,
        after.center_of_mass,
        epsilon = 1e-5
    );
}

#[test]
fn unit_cube_from_text() {
    let text = "\
# unit cube, outward faces
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";
    let mesh = reimport(text);
    assert_eq!(mesh.triangle_count(), 12);

    let props = compute_mass_properties(&mesh, 1.0, Winding::CounterClockwise).unwrap();
    assert_relative_eq!(props.mass, 1.0, epsilon = 1e-12);
    assert_relative_eq!(
        props.center_of_mass,
        Point3::new(0.5, 0.5, 0.5),
        epsilon = 1e-10
    );
    let about_com = props.inertia_about_center_of_mass();
    for i in 0..3 {
        assert_relative_eq!(about_com[(i, i)], 1.0 / 6.0, epsilon = 1e-10);
    }
}

#[test]
fn load_surface_from_file() {
    let path = std::env::temp_dir().join(format!("facet-load-{}.obj", std::process::id()));
    std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf -4 -3 -2 -1\n").unwrap();

    let mesh = load_surface(&path, &ImportOptions::bad_mesh()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(mesh.triangle_count(), 4);
}

#[test]
fn missing_file_reports_path() {
    let path = std::env::temp_dir().join("facet-definitely-missing.obj");
    let err = load_surface(&path, &ImportOptions::default()).unwrap_err();
    match err {
        FacetError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}
