use kyubu_core::{CubeModel, CubeRules, OrbitCamera, Projection, STANDARD_CUBE_JSON};

fn projection() -> Projection {
    let model = CubeModel::from_json(STANDARD_CUBE_JSON).expect("bundled asset");
    let scene = model.mount();
    let camera = OrbitCamera::new(&CubeRules::default());
    Projection::build(&scene, &camera, 1.0)
}

#[test]
fn triangles_are_sorted_back_to_front() {
    let projection = projection();
    assert!(!projection.is_empty());
    for pair in projection.triangles.windows(2) {
        assert!(pair[0].depth >= pair[1].depth);
    }
}

#[test]
fn back_faces_are_culled() {
    let projection = projection();
    // Each cubie has 12 triangles; at most 3 of its 6 faces can face a corner view.
    assert!(projection.len() <= 26 * 6);
    assert!(projection.len() >= 27);
}

#[test]
fn visible_triangles_land_on_screen() {
    let projection = projection();
    for tri in &projection.triangles {
        for p in tri.ndc {
            assert!(p.x.abs() <= 1.0 && p.y.abs() <= 1.0, "{p:?}");
        }
    }
}

#[test]
fn nearest_piece_is_drawn_last() {
    let projection = projection();
    let last = projection.triangles.last().expect("visible triangle");
    let model = CubeModel::from_json(STANDARD_CUBE_JSON).expect("bundled asset");
    assert_eq!(model.pieces[last.piece.0].name, "cubie_RUF");
}
