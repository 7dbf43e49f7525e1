//! Optimum location at a probe abscissa.
//!
//! Given a candidate x, the locator evaluates the ceiling envelope (the
//! pointwise minimum over all upper bounds) and the floor envelope (the
//! pointwise maximum over all lower bounds) and compares their slopes to
//! decide on which side of the probe the optimum lies, or whether it has
//! been hit exactly.

use crate::numerics::Tolerance;
use crate::workspace::Workspace;

/// Envelope extremum at a probe x, with the slope range over all
/// constraints attaining it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Extremum {
    /// Envelope value at the probe.
    pub y: f64,
    /// Smallest slope among the attaining constraints.
    pub min_dx: f64,
    /// Largest slope among the attaining constraints.
    pub max_dx: f64,
    /// False when there was no constraint to evaluate.
    pub valid: bool,
}

/// Evaluates `y0[j] + dx[j] * x` over the indices in `idcs` and tracks the
/// extremum together with the slope range of all lines passing through it.
pub(crate) fn track_extrema(
    x: f64,
    dx: &[f64],
    y0: &[f64],
    idcs: &[usize],
    compute_min: bool,
    tol: Tolerance,
) -> Extremum {
    let mut e = Extremum {
        y: if compute_min {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        },
        min_dx: f64::INFINITY,
        max_dx: f64::NEG_INFINITY,
        valid: !idcs.is_empty(),
    };

    for &j in idcs {
        let y = y0[j] + dx[j] * x;
        if tol.feq(y, e.y) {
            // Another constraint through the same extreme point, possibly
            // with a different slope.
            e.min_dx = e.min_dx.min(dx[j]);
            e.max_dx = e.max_dx.max(dx[j]);
        } else if (compute_min && y < e.y) || (!compute_min && y > e.y) {
            e.y = y;
            e.min_dx = dx[j];
            e.max_dx = dx[j];
        }
    }
    e
}

/// Where the optimum lies relative to a probe abscissa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Verdict {
    /// Floor and ceiling envelopes cross with no feasible x anywhere.
    Infeasible,
    /// The optimum lies strictly left of the probe.
    Left,
    /// The optimum lies strictly right of the probe.
    Right,
    /// The probe hits the unique optimum; `y` is the optimal ordinate.
    Here { y: f64 },
    /// The probe lies on a horizontal stretch of the floor envelope; the
    /// optimum is an edge that has to be reconstructed.
    HereEdge,
}

/// Decides where the optimum lies relative to `x`. Requires at least one
/// floor constraint (without one the problem is unbounded and the engine
/// never probes).
pub(crate) fn locate(ws: &Workspace<'_>, x: f64, tol: Tolerance) -> Verdict {
    let e_ceil = track_extrema(x, ws.dx, ws.y0, &ws.ceil[..ws.ceil_len], true, tol);
    let e_floor = track_extrema(x, ws.dx, ws.y0, &ws.floor[..ws.floor_len], false, tol);

    if e_ceil.valid && e_ceil.y < e_floor.y {
        // The probe is outside the feasible strip. The envelopes' slopes
        // tell on which side they cross, if they cross at all.
        return if e_floor.min_dx > e_ceil.max_dx {
            Verdict::Left
        } else if e_floor.max_dx < e_ceil.min_dx {
            Verdict::Right
        } else {
            Verdict::Infeasible
        };
    }

    let min_flat = tol.is_zero(e_floor.min_dx);
    let max_flat = tol.is_zero(e_floor.max_dx);
    if min_flat && !max_flat {
        // Right end of a horizontal floor stretch.
        Verdict::Left
    } else if max_flat && !min_flat {
        // Left end of a horizontal floor stretch.
        Verdict::Right
    } else if min_flat && max_flat {
        Verdict::HereEdge
    } else if e_floor.min_dx < 0.0 && e_floor.max_dx > 0.0 {
        // Vee vertex.
        Verdict::Here { y: e_floor.y }
    } else if e_floor.min_dx > 0.0 {
        Verdict::Left
    } else {
        Verdict::Right
    }
}
