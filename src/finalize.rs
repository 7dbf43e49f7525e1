//! Result construction and back-transformation.
//!
//! All engine work happens in the conditioned frame (objective along +y,
//! constraints centered). Every emitted coordinate is mapped back to the
//! caller's frame by undoing the translation and then the rotation; the
//! inverse of a rotation matrix is its transpose.

use nalgebra::Vector2;

use crate::geometry;
use crate::numerics::Tolerance;
use crate::problem::Solution;
use crate::workspace::Workspace;

fn to_user_frame(ws: &Workspace<'_>, p: Vector2<f64>) -> Vector2<f64> {
    ws.rot.transpose() * (p + ws.shift)
}

/// A point result, back-transformed.
pub(crate) fn point(ws: &Workspace<'_>, x: f64, y: f64) -> Solution {
    Solution::Point(to_user_frame(ws, Vector2::new(x, y)))
}

/// An edge result, back-transformed.
fn edge(ws: &Workspace<'_>, a: Vector2<f64>, b: Vector2<f64>) -> Solution {
    Solution::Edge(to_user_frame(ws, a), to_user_frame(ws, b))
}

/// Clips the x-interval against the intersections of the horizontal floor
/// `if0` with every other constraint in one of the lists. A ceiling rising
/// to the right (or a floor falling to the right) cuts the edge from the
/// left; the mirrored cases cut it from the right.
fn clip_edge_interval(ws: &mut Workspace<'_>, if0: usize, is_ceil: bool, tol: Tolerance) {
    let len = if is_ceil { ws.ceil_len } else { ws.floor_len };
    let g0 = Vector2::new(ws.gx[if0], ws.gy[if0]);
    for i in 0..len {
        let j = if is_ceil { ws.ceil[i] } else { ws.floor[i] };
        if j == if0 {
            continue;
        }
        let gj = Vector2::new(ws.gx[j], ws.gy[j]);
        if let Some(p) = geometry::intersect(g0, ws.h[if0], gj, ws.h[j], tol) {
            let cuts_left = (is_ceil && ws.dx[j] > 0.0) || (!is_ceil && ws.dx[j] < 0.0);
            let cuts_right = (is_ceil && ws.dx[j] < 0.0) || (!is_ceil && ws.dx[j] > 0.0);
            if cuts_left && p.x > ws.x0 {
                ws.x0 = p.x;
            }
            if cuts_right && p.x < ws.x1 {
                ws.x1 = p.x;
            }
        }
    }
}

/// The probe landed on a horizontal stretch of the floor envelope. The
/// optimum is the segment of the topmost horizontal floor that survives
/// clipping by all other ceiling and floor constraints, and collapses to a
/// point when the clipped interval is empty up to tolerance.
pub(crate) fn flat_floor_edge(ws: &mut Workspace<'_>, tol: Tolerance) -> Solution {
    // The locator only reports an edge when a horizontal floor exists.
    let mut if0 = 0;
    let mut ry0 = f64::NEG_INFINITY;
    for i in 0..ws.floor_len {
        let j = ws.floor[i];
        if tol.is_zero(ws.dx[j]) && ws.y0[j] > ry0 {
            ry0 = ws.y0[j];
            if0 = j;
        }
    }

    clip_edge_interval(ws, if0, true, tol);
    clip_edge_interval(ws, if0, false, tol);

    if tol.feq(ws.x0, ws.x1) {
        point(ws, ws.x0, ry0)
    } else {
        let (x0, x1) = (ws.x0, ws.x1);
        edge(ws, Vector2::new(x0, ry0), Vector2::new(x1, ry0))
    }
}

/// Derives the answer from whatever survived the loop: at most one floor
/// and at most one ceiling constraint, plus the x-interval.
pub(crate) fn remaining_pair_result(ws: &Workspace<'_>, tol: Tolerance) -> Solution {
    if ws.floor_len == 0 {
        // Nothing bounds y from below.
        return Solution::Unbounded;
    }
    let if0 = ws.floor[0];
    let mut x0 = ws.x0;
    let mut x1 = ws.x1;

    if ws.ceil_len > 0 {
        let ic0 = ws.ceil[0];
        let gc = Vector2::new(ws.gx[ic0], ws.gy[ic0]);
        let gf = Vector2::new(ws.gx[if0], ws.gy[if0]);
        match geometry::intersect(gc, ws.h[ic0], gf, ws.h[if0], tol) {
            Some(p) => {
                // The wedge between floor and ceiling opens toward one
                // side of their intersection; the slopes say which.
                if ws.dx[if0] > ws.dx[ic0] {
                    x1 = x1.min(p.x);
                } else {
                    x0 = x0.max(p.x);
                }
            }
            None => {
                // Parallel, and the floor lies strictly above the ceiling.
                if !tol.feq(ws.y0[if0], ws.y0[ic0]) && ws.y0[if0] > ws.y0[ic0] {
                    return Solution::Infeasible;
                }
            }
        }
    }

    let ry0 = ws.y0[if0] + x0 * ws.dx[if0];
    let ry1 = ws.y0[if0] + x1 * ws.dx[if0];
    if tol.is_zero(ws.dx[if0]) {
        // Horizontal floor: a finite strip yields a whole edge of optima.
        if x0 > f64::NEG_INFINITY && x1 < f64::INFINITY {
            edge(ws, Vector2::new(x0, ry0), Vector2::new(x1, ry1))
        } else {
            Solution::Unbounded
        }
    } else if ws.dx[if0] > 0.0 {
        // Rising floor: the minimum sits at the left end.
        if x0 == f64::NEG_INFINITY {
            Solution::Unbounded
        } else {
            point(ws, x0, ry0)
        }
    } else {
        // Falling floor: the minimum sits at the right end.
        if x1 == f64::INFINITY {
            Solution::Unbounded
        } else {
            point(ws, x1, ry1)
        }
    }
}
