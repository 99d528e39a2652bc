//! Affine and vector helpers on top of kurbo.

use kurbo::{Affine, Point, Vec2};
use thiserror::Error;

/// Determinants smaller than this are treated as singular.
pub const DETERMINANT_EPSILON: f64 = 1e-12;

/// Geometry errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("Transform is not invertible (determinant {determinant})")]
    DegenerateTransform { determinant: f64 },
}

/// Compose two transforms: the result applies `inner` first, then `outer`.
pub fn compose(outer: Affine, inner: Affine) -> Affine {
    outer * inner
}

/// Invert a transform, failing when it collapses the plane.
pub fn try_invert(affine: Affine) -> Result<Affine, GeometryError> {
    let determinant = affine.determinant();
    if determinant.abs() < DETERMINANT_EPSILON || !determinant.is_finite() {
        return Err(GeometryError::DegenerateTransform { determinant });
    }
    Ok(affine.inverse())
}

/// Build `translate(position) · rotate(rotation) · scale(scale)`.
///
/// `rotation_degrees` is in degrees, clockwise in a y-down screen.
pub fn element_transform(position: Point, rotation_degrees: f64, scale: Vec2) -> Affine {
    Affine::translate(position.to_vec2())
        * Affine::rotate(rotation_degrees.to_radians())
        * Affine::scale_non_uniform(scale.x, scale.y)
}

/// Rotate a vector by `radians` around the origin.
pub fn rotate_vec(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = radians.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Normalize an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_applies_inner_first() {
        let translate = Affine::translate((10.0, 0.0));
        let scale = Affine::scale(2.0);
        let p = compose(translate, scale) * Point::new(1.0, 1.0);
        assert!((p.x - 12.0).abs() < f64::EPSILON);
        assert!((p.y - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_try_invert_roundtrip() {
        let m = element_transform(Point::new(30.0, -20.0), 37.0, Vec2::new(2.0, 0.5));
        let inv = try_invert(m).unwrap();
        let p = Point::new(12.0, 34.0);
        let back = inv * (m * p);
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_try_invert_degenerate() {
        let m = Affine::scale_non_uniform(1.0, 0.0);
        assert!(matches!(
            try_invert(m),
            Err(GeometryError::DegenerateTransform { .. })
        ));
    }

    #[test]
    fn test_element_transform_coefficients() {
        let m = element_transform(Point::new(5.0, 7.0), 90.0, Vec2::new(2.0, 3.0));
        let [a, b, c, d, e, f] = m.as_coeffs();
        assert!(a.abs() < 1e-12);
        assert!((b - 2.0).abs() < 1e-12);
        assert!((c + 3.0).abs() < 1e-12);
        assert!(d.abs() < 1e-12);
        assert!((e - 5.0).abs() < f64::EPSILON);
        assert!((f - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_vec_quarter_turn() {
        let v = rotate_vec(Vec2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(200.0) + 160.0).abs() < 1e-12);
        assert!((normalize_degrees(180.0) - 180.0).abs() < 1e-12);
        assert!((normalize_degrees(-180.0) - 180.0).abs() < 1e-12);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < 1e-12);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-12);
        assert!(normalize_degrees(0.0).abs() < 1e-12);
    }
}
