#![allow(clippy::unwrap_used)]

mod helpers;

use helpers::{init_tracing, solid};
use planis::math::{is_mirroring, Matrix3, Vector2};
use planis::operations::boolean::BooleanParams;

#[test]
fn rotated_square_is_congruent() {
    init_tracing();
    let square = solid(0.0, 0.0, 10.0, 10.0);
    let motion = Matrix3::new_translation(&Vector2::new(5.0, 5.0))
        * Matrix3::new_rotation(37f64.to_radians());
    let moved = square.transformed(&motion);

    let m = square
        .is_congruent(&moved, 1e-6, &BooleanParams::default())
        .unwrap()
        .unwrap();
    assert!(!is_mirroring(&m));

    let image = square.transformed(&m);
    for v in moved.outline().vertices() {
        assert!(image.outline().vertices().iter().any(|w| (w - v).norm() < 1e-6));
    }
    assert!((image.area() - moved.area()).abs() < 1e-6);
}

#[test]
fn rectangle_is_not_congruent_to_square() {
    let square = solid(0.0, 0.0, 10.0, 10.0);
    let bar = solid(0.0, 0.0, 20.0, 5.0);
    assert!(square
        .is_congruent(&bar, 1e-6, &BooleanParams::default())
        .unwrap()
        .is_none());
}

#[test]
fn signatures_agree_after_motion() {
    let bar = solid(0.0, 0.0, 20.0, 5.0);
    let moved = bar.transformed(&Matrix3::new_rotation(2.0));
    assert!(bar.calculate_signature().matches(&moved.calculate_signature(), 1e-9));
}
