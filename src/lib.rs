//! Two-dimensional linear programming in worst-case linear time.
//!
//! Solves problems of the canonical form
//!
//! ```text
//! minimize    cx * x + cy * y
//! subject to  gx[i] * x + gy[i] * y >= h[i],   i = 0 .. n
//! ```
//!
//! using Megiddo's prune-and-search technique: the problem is rotated so
//! the objective points along the y-axis, constraints are split into floor
//! and ceiling envelopes, and each round probes the optimum at the median
//! of the candidate intersection abscissas, discarding a constant fraction
//! of the constraints. The median itself is found with a worst-case
//! linear-time median-of-medians selection, so the whole solve runs in
//! O(n).
//!
//! The result classifies the optimum as a unique [`Point`](Solution::Point),
//! an entire [`Edge`](Solution::Edge) of optima, [`Unbounded`](Solution::Unbounded),
//! or [`Infeasible`](Solution::Infeasible); caller mistakes (mismatched
//! arrays, exceeded capacity, zero objective) surface as [`SolveError`].
//!
//! # Example
//!
//! ```
//! use lp2d::{solve_simple, Solution};
//!
//! // maximize 40 x + 60 y  (i.e. minimize -40 x - 60 y)
//! // s.t. 2 x + y <= 70,  x + y >= 40,  x + 3 y <= 90
//! let gx = [-2.0, 1.0, -1.0];
//! let gy = [-1.0, 1.0, -3.0];
//! let h = [-70.0, 40.0, -90.0];
//! let result = solve_simple(-40.0, -60.0, &gx, &gy, &h).unwrap();
//!
//! match result {
//!     Solution::Point(p) => {
//!         assert!((p.x - 24.0).abs() < 1e-9);
//!         assert!((p.y - 22.0).abs() < 1e-9);
//!     }
//!     other => panic!("expected a point, got {other}"),
//! }
//! ```
//!
//! # Storage
//!
//! The hot path never allocates. [`Solver`] owns a reusable workspace;
//! alternatively [`Workspace::attach`] runs the solver over caller-provided
//! storage sized via [`float_len`], [`index_len`] and [`mem_size`]. One
//! workspace serves one solve at a time; for parallel solves, use one
//! workspace per thread.

#![warn(clippy::all)]

mod condition;
mod engine;
mod error;
mod finalize;
mod geometry;
mod locate;
mod numerics;
mod problem;
mod select;
mod workspace;

pub use error::SolveError;
pub use numerics::Tolerance;
pub use problem::{Problem, Solution};
pub use select::{kth_smallest, median};
pub use workspace::{float_len, index_len, mem_size, Solver, Workspace};

/// Runs one problem through the given workspace.
///
/// The workspace is fully reset first, so it can be reused across any
/// sequence of problems; its capacity must cover the problem size.
pub fn solve(
    problem: &Problem<'_>,
    ws: &mut Workspace<'_>,
    tol: Tolerance,
) -> Result<Solution, SolveError> {
    problem.validate()?;
    let n = problem.len();
    if n > ws.capacity() {
        return Err(SolveError::CapacityExceeded {
            n,
            capacity: ws.capacity(),
        });
    }
    if tol.is_zero(problem.cost.x) && tol.is_zero(problem.cost.y) {
        return Err(SolveError::DegenerateObjective);
    }

    ws.reset(n);
    if !condition::condition(problem, ws, tol) {
        return Ok(Solution::Infeasible);
    }
    if !condition::categorize(ws, tol) {
        return Ok(Solution::Infeasible);
    }
    condition::derive_slopes(ws);

    Ok(engine::Engine::new(ws, tol).run())
}

/// One-shot convenience wrapper: sizes a workspace for exactly `n`
/// constraints, solves, and drops the storage again.
pub fn solve_simple(
    cx: f64,
    cy: f64,
    gx: &[f64],
    gy: &[f64],
    h: &[f64],
) -> Result<Solution, SolveError> {
    let problem = Problem::new(cx, cy, gx, gy, h);
    problem.validate()?;
    Solver::new(problem.len()).solve(&problem)
}
