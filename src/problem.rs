//! Problem and result types.

use std::fmt;

use nalgebra::Vector2;

use crate::error::SolveError;

/// A two-dimensional linear program in canonical form:
///
/// ```text
/// minimize    cost . (x, y)
/// subject to  gx[i] * x + gy[i] * y >= h[i],   i = 0 .. n
/// ```
///
/// The struct borrows the caller's constraint arrays; nothing is copied
/// until the solve conditions the problem into its workspace.
#[derive(Debug, Clone, Copy)]
pub struct Problem<'a> {
    /// Objective gradient.
    pub cost: Vector2<f64>,
    /// x-coefficients of the constraint normals.
    pub gx: &'a [f64],
    /// y-coefficients of the constraint normals.
    pub gy: &'a [f64],
    /// Right-hand sides.
    pub h: &'a [f64],
}

impl<'a> Problem<'a> {
    /// Bundles an objective and constraint arrays into a problem view.
    pub fn new(cx: f64, cy: f64, gx: &'a [f64], gy: &'a [f64], h: &'a [f64]) -> Self {
        Self {
            cost: Vector2::new(cx, cy),
            gx,
            gy,
            h,
        }
    }

    /// Number of constraints.
    pub fn len(&self) -> usize {
        self.h.len()
    }

    /// True when the problem has no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }

    /// Checks that the three constraint arrays agree in length.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.gx.len() != self.h.len() || self.gy.len() != self.h.len() {
            return Err(SolveError::DimensionMismatch {
                gx: self.gx.len(),
                gy: self.gy.len(),
                h: self.h.len(),
            });
        }
        Ok(())
    }
}

/// Outcome of a solve, in the caller's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solution {
    /// The optimum is a unique point.
    Point(Vector2<f64>),
    /// Every point on the segment between the two endpoints is optimal.
    Edge(Vector2<f64>, Vector2<f64>),
    /// The objective decreases without bound over the feasible region.
    Unbounded,
    /// The constraints have an empty intersection.
    Infeasible,
}

impl Solution {
    /// The optimal point, if the optimum is unique.
    pub fn point(&self) -> Option<Vector2<f64>> {
        match self {
            Solution::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// True for the two outcomes that carry an optimum.
    pub fn is_optimal(&self) -> bool {
        matches!(self, Solution::Point(_) | Solution::Edge(_, _))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::Point(p) => write!(f, "point ({}, {})", p.x, p.y),
            Solution::Edge(a, b) => {
                write!(f, "edge ({}, {}) -- ({}, {})", a.x, a.y, b.x, b.y)
            }
            Solution::Unbounded => write!(f, "unbounded"),
            Solution::Infeasible => write!(f, "infeasible"),
        }
    }
}
