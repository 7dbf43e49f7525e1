//! 2D geometric primitives.
//!
//! Small helpers over nalgebra's fixed-size types: the rotation that aligns
//! the objective gradient with the y-axis, and the intersection of two
//! oriented lines given in normal form.

use nalgebra::{Matrix2, Vector2};

use crate::numerics::Tolerance;

/// Rotation matrix aligning `c` with the positive y-axis, i.e.
/// `R * c = (0, |c|)`.
///
/// `c` must be nonzero; a zero gradient is rejected before conditioning.
pub(crate) fn rotation_to_y(c: Vector2<f64>) -> Matrix2<f64> {
    let h = c.x.hypot(c.y);
    Matrix2::new(c.y / h, -c.x / h, c.x / h, c.y / h)
}

/// Intersection of the lines `g1 . p = h1` and `g2 . p = h2`.
///
/// Returns `None` when the lines are parallel, i.e. the denominator of
/// Cramer's rule is zero under the tolerance.
pub(crate) fn intersect(
    g1: Vector2<f64>,
    h1: f64,
    g2: Vector2<f64>,
    h2: f64,
    tol: Tolerance,
) -> Option<Vector2<f64>> {
    let den = g1.x * g2.y - g2.x * g1.y;
    if tol.is_zero(den) {
        return None;
    }
    Some(Vector2::new(
        (h1 * g2.y - h2 * g1.y) / den,
        (h2 * g1.x - h1 * g2.x) / den,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_identity_for_y_gradient() {
        let r = rotation_to_y(Vector2::new(0.0, 1.0));
        assert_eq!(r, Matrix2::identity());
        // Scaling the gradient must not change the rotation.
        let r2 = rotation_to_y(Vector2::new(0.0, 2.0));
        assert_eq!(r2, Matrix2::identity());
    }

    #[test]
    fn rotation_quarter_turn_for_x_gradient() {
        let r = rotation_to_y(Vector2::new(1.0, 0.0));
        assert_eq!(r, Matrix2::new(0.0, -1.0, 1.0, 0.0));
    }

    #[test]
    fn rotation_aligns_gradient_with_y() {
        for &(x, y) in &[(3.0, 4.0), (-5.0, 10.0), (0.25, -0.75), (-1.0, -1.0)] {
            let c = Vector2::new(x, y);
            let rotated = rotation_to_y(c) * c;
            assert!(rotated.x.abs() < 1e-12);
            assert!((rotated.y - c.norm()).abs() < 1e-12);
        }
    }

    #[test]
    fn intersect_axes() {
        let tol = Tolerance::default();
        let p = intersect(
            Vector2::new(1.0, 0.0),
            0.0,
            Vector2::new(0.0, 1.0),
            0.0,
            tol,
        )
        .unwrap();
        assert_eq!(p, Vector2::new(0.0, 0.0));

        let p = intersect(
            Vector2::new(1.0, 0.0),
            1.0,
            Vector2::new(0.0, 1.0),
            1.0,
            tol,
        )
        .unwrap();
        assert_eq!(p, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn intersect_oblique() {
        let tol = Tolerance::default();
        let p = intersect(
            Vector2::new(-4.0, 4.0),
            8.0,
            Vector2::new(-8.0, -8.0),
            -24.0,
            tol,
        )
        .unwrap();
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!((p.y - 2.5).abs() < 1e-12);
    }

    #[test]
    fn intersect_parallel_is_none() {
        let tol = Tolerance::default();
        assert!(intersect(
            Vector2::new(1.0, 1.0),
            0.0,
            Vector2::new(2.0, 2.0),
            5.0,
            tol
        )
        .is_none());
    }
}
