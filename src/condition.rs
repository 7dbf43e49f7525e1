//! Problem conditioning and constraint categorization.
//!
//! Before the prune-and-search loop runs, the problem is rewritten into the
//! workspace in a canonical frame:
//!
//! 1. rotate so the objective gradient points along the positive y-axis
//!    (minimizing the objective then means minimizing y),
//! 2. scale every constraint so its largest direction coefficient is one in
//!    magnitude,
//! 3. translate so the origin is a least-squares solution of `G o = h`,
//!    which centers the right-hand sides around zero.
//!
//! The rotation and translation are recorded in the workspace and undone on
//! every emitted point. Trivially-true constraints (`0 >= h`, `h <= 0`)
//! are dropped during the pass; a trivially-false one aborts the solve.

use log::debug;
use nalgebra::{Matrix2, Vector2};

use crate::geometry;
use crate::numerics::Tolerance;
use crate::problem::Problem;
use crate::workspace::Workspace;

/// Rotates, normalizes and centers the problem into the workspace.
///
/// Returns `false` when some constraint reduces to `0 >= h` with `h > 0`,
/// which no point can satisfy. On success `ws.n` holds the number of
/// surviving constraints.
pub(crate) fn condition(prob: &Problem<'_>, ws: &mut Workspace<'_>, tol: Tolerance) -> bool {
    let rot = geometry::rotation_to_y(prob.cost);
    let mut gtg = Matrix2::<f64>::zeros();
    let mut gth = Vector2::<f64>::zeros();
    let mut kept = 0;

    for i in 0..prob.len() {
        let g = rot * Vector2::new(prob.gx[i], prob.gy[i]);
        let h = prob.h[i];

        if tol.is_zero(g.x) && tol.is_zero(g.y) {
            if h <= 0.0 {
                continue;
            }
            return false;
        }

        // Unit-max normalization; it also makes h directly comparable
        // between parallel constraints, which the pruning survivor rule
        // depends on.
        let s = g.x.abs().max(g.y.abs());
        let g = g / s;
        let h = h / s;

        gtg.m11 += g.x * g.x;
        gtg.m12 += g.x * g.y; // m21 by symmetry
        gtg.m22 += g.y * g.y;
        gth.x += g.x * h;
        gth.y += g.y * h;

        ws.gx[kept] = g.x;
        ws.gy[kept] = g.y;
        ws.h[kept] = h;
        kept += 1;
    }

    // Invert GtG to obtain the centering offset. A singular GtG (e.g. a
    // single constraint) means infinitely many offsets would do; skip the
    // translation then, it only serves numerical conditioning.
    let det = gtg.m11 * gtg.m22 - gtg.m12 * gtg.m12;
    let shift = if det != 0.0 {
        Vector2::new(
            (gtg.m22 * gth.x - gtg.m12 * gth.y) / det,
            (-gtg.m12 * gth.x + gtg.m11 * gth.y) / det,
        )
    } else {
        Vector2::zeros()
    };

    ws.n = kept;
    ws.rot = rot;
    ws.shift = shift;
    for i in 0..kept {
        ws.h[i] -= shift.x * ws.gx[i] + shift.y * ws.gy[i];
    }

    debug!(
        "conditioned problem: kept {kept} of {} constraints, shift = ({}, {})",
        prob.len(),
        shift.x,
        shift.y
    );
    true
}

/// Orientation of a conditioned constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    /// Vertical half-plane opening to the right: bounds x from below.
    VertLeft,
    /// Vertical half-plane opening to the left: bounds x from above.
    VertRight,
    /// Upper bound on y.
    Ceil,
    /// Lower bound on y.
    Floor,
}

fn category(gx: f64, gy: f64, tol: Tolerance) -> Category {
    if tol.is_zero(gy) {
        if gx > 0.0 {
            Category::VertLeft
        } else {
            Category::VertRight
        }
    } else if gy > 0.0 {
        Category::Floor
    } else {
        Category::Ceil
    }
}

/// Files each conditioned constraint either into the x-interval (vertical
/// constraints) or into the ceiling/floor index lists.
///
/// Returns `false` when the vertical bounds alone leave an empty strip.
pub(crate) fn categorize(ws: &mut Workspace<'_>, tol: Tolerance) -> bool {
    for i in 0..ws.n {
        match category(ws.gx[i], ws.gy[i], tol) {
            Category::VertLeft => ws.x0 = ws.x0.max(ws.h[i] / ws.gx[i]),
            Category::VertRight => ws.x1 = ws.x1.min(ws.h[i] / ws.gx[i]),
            Category::Ceil => {
                ws.ceil[ws.ceil_len] = i;
                ws.ceil_len += 1;
            }
            Category::Floor => {
                ws.floor[ws.floor_len] = i;
                ws.floor_len += 1;
            }
        }
    }
    ws.x0 <= ws.x1
}

/// Precomputes slope and y-intercept for every ceiling and floor
/// constraint, so the line through constraint `j` reads
/// `y = y0[j] + dx[j] * x`.
pub(crate) fn derive_slopes(ws: &mut Workspace<'_>) {
    for &j in ws.ceil[..ws.ceil_len]
        .iter()
        .chain(ws.floor[..ws.floor_len].iter())
    {
        ws.dx[j] = -ws.gx[j] / ws.gy[j];
        ws.y0[j] = ws.h[j] / ws.gy[j];
    }
}
