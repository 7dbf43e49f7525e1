//! Pre-sized working state.
//!
//! The solver performs no allocation on the hot path: all per-solve scratch
//! lives in a [`Workspace`] carved out of two caller-provided regions, one
//! for floats and one for index lists. [`Solver`] is the owning convenience
//! wrapper that allocates the regions once and reuses them across solves.
//!
//! Layout for a capacity of `n` constraints:
//!
//! ```text
//! floats:  gx[n] | gy[n] | h[n] | dx[n] | y0[n] | x_intersect[n / 2]
//! indices: ceil[n] | floor[n] | tmp[n]
//! ```
//!
//! `x_intersect` only needs half the capacity because each entry stems from
//! a disjoint pair of constraints.

use nalgebra::{Matrix2, Vector2};

use crate::error::SolveError;
use crate::numerics::Tolerance;
use crate::problem::{Problem, Solution};

/// Length of the float region backing a workspace of the given capacity.
pub const fn float_len(capacity: usize) -> usize {
    5 * capacity + capacity / 2
}

/// Length of the index region backing a workspace of the given capacity.
pub const fn index_len(capacity: usize) -> usize {
    3 * capacity
}

const CACHE_LINE: usize = 64;

const fn pad(bytes: usize) -> usize {
    (bytes + CACHE_LINE - 1) & !(CACHE_LINE - 1)
}

/// Bytes required to host a workspace able to hold `capacity` constraints,
/// with every sub-array padded to a cache-line boundary.
pub const fn mem_size(capacity: usize) -> usize {
    let d = core::mem::size_of::<f64>();
    let u = core::mem::size_of::<usize>();
    pad(d * capacity) * 5 + pad(d * (capacity / 2)) + pad(u * capacity) * 3 + CACHE_LINE
}

/// Working state of one solve, borrowing caller storage.
///
/// Attaching is a cheap re-slicing of the two regions; the same storage can
/// back any number of consecutive solves. The sub-arrays are disjoint by
/// construction (`split_at_mut`), which is what the engine's in-place list
/// rewriting relies on.
#[derive(Debug)]
pub struct Workspace<'a> {
    pub(crate) gx: &'a mut [f64],
    pub(crate) gy: &'a mut [f64],
    pub(crate) h: &'a mut [f64],
    /// Slope of each non-vertical constraint line. Valid only at indices
    /// listed in `ceil` or `floor`.
    pub(crate) dx: &'a mut [f64],
    /// y-intercept of each non-vertical constraint line, same validity.
    pub(crate) y0: &'a mut [f64],
    pub(crate) x_intersect: &'a mut [f64],
    pub(crate) ceil: &'a mut [usize],
    pub(crate) floor: &'a mut [usize],
    pub(crate) tmp: &'a mut [usize],
    pub(crate) ceil_len: usize,
    pub(crate) floor_len: usize,
    pub(crate) intersect_len: usize,
    /// Current feasible x-interval; solutions lie within `[x0, x1]`.
    pub(crate) x0: f64,
    pub(crate) x1: f64,
    /// Rotation applied during conditioning.
    pub(crate) rot: Matrix2<f64>,
    /// Translation applied during conditioning.
    pub(crate) shift: Vector2<f64>,
    /// Constraint count of the problem being solved (shrinks when
    /// conditioning drops trivially-true constraints).
    pub(crate) n: usize,
    capacity: usize,
}

impl<'a> Workspace<'a> {
    /// Carves a workspace for `capacity` constraints out of the two storage
    /// regions. Fails when either region is shorter than the layout needs;
    /// excess storage is left untouched.
    pub fn attach(
        floats: &'a mut [f64],
        indices: &'a mut [usize],
        capacity: usize,
    ) -> Result<Self, SolveError> {
        let need_floats = float_len(capacity);
        let need_indices = index_len(capacity);
        if floats.len() < need_floats || indices.len() < need_indices {
            return Err(SolveError::StorageTooSmall {
                capacity,
                need_floats,
                need_indices,
                got_floats: floats.len(),
                got_indices: indices.len(),
            });
        }

        let (gx, rest) = floats.split_at_mut(capacity);
        let (gy, rest) = rest.split_at_mut(capacity);
        let (h, rest) = rest.split_at_mut(capacity);
        let (dx, rest) = rest.split_at_mut(capacity);
        let (y0, rest) = rest.split_at_mut(capacity);
        let (x_intersect, _) = rest.split_at_mut(capacity / 2);
        let (ceil, rest) = indices.split_at_mut(capacity);
        let (floor, rest) = rest.split_at_mut(capacity);
        let (tmp, _) = rest.split_at_mut(capacity);

        let mut ws = Self {
            gx,
            gy,
            h,
            dx,
            y0,
            x_intersect,
            ceil,
            floor,
            tmp,
            ceil_len: 0,
            floor_len: 0,
            intersect_len: 0,
            x0: f64::NEG_INFINITY,
            x1: f64::INFINITY,
            rot: Matrix2::identity(),
            shift: Vector2::zeros(),
            n: 0,
            capacity,
        };
        ws.reset(0);
        Ok(ws)
    }

    /// Configured constraint capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clears per-solve state for a problem with `n` constraints. The data
    /// arrays are overwritten by conditioning and need no clearing.
    pub(crate) fn reset(&mut self, n: usize) {
        self.ceil_len = 0;
        self.floor_len = 0;
        self.intersect_len = 0;
        self.x0 = f64::NEG_INFINITY;
        self.x1 = f64::INFINITY;
        self.rot = Matrix2::identity();
        self.shift = Vector2::zeros();
        self.n = n;
    }
}

/// Owning solver handle.
///
/// Allocates its working storage once and reuses it for every
/// [`solve`](Solver::solve) call, so repeated solves allocate nothing.
pub struct Solver {
    floats: Vec<f64>,
    indices: Vec<usize>,
    capacity: usize,
    tol: Tolerance,
}

impl Solver {
    /// A solver able to hold problems of up to `capacity` constraints.
    pub fn new(capacity: usize) -> Self {
        Self::with_tolerance(capacity, Tolerance::default())
    }

    /// Like [`new`](Solver::new), with caller-chosen comparison thresholds.
    pub fn with_tolerance(capacity: usize, tol: Tolerance) -> Self {
        Self {
            floats: vec![0.0; float_len(capacity)],
            indices: vec![0; index_len(capacity)],
            capacity,
            tol,
        }
    }

    /// Configured constraint capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Runs one problem through the solver's workspace.
    pub fn solve(&mut self, problem: &Problem<'_>) -> Result<Solution, SolveError> {
        let mut ws = Workspace::attach(&mut self.floats, &mut self.indices, self.capacity)?;
        crate::solve(problem, &mut ws, self.tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lengths() {
        assert_eq!(float_len(0), 0);
        assert_eq!(float_len(1), 5);
        assert_eq!(float_len(8), 44);
        assert_eq!(index_len(8), 24);
    }

    #[test]
    fn mem_size_monotonic() {
        let mut last = 0;
        for capacity in 0..257 {
            let size = mem_size(capacity);
            assert!(size >= last);
            assert!(size >= float_len(capacity) * 8 + index_len(capacity) * 8);
            last = size;
        }
    }

    #[test]
    fn attach_reports_capacity() {
        let mut floats = vec![0.0; float_len(128)];
        let mut indices = vec![0usize; index_len(128)];
        let ws = Workspace::attach(&mut floats, &mut indices, 128).unwrap();
        assert_eq!(ws.capacity(), 128);
        assert_eq!(ws.gx.len(), 128);
        assert_eq!(ws.x_intersect.len(), 64);
        assert_eq!(ws.tmp.len(), 128);
    }

    #[test]
    fn attach_zero_capacity() {
        let mut floats: [f64; 0] = [];
        let mut indices: [usize; 0] = [];
        let ws = Workspace::attach(&mut floats, &mut indices, 0).unwrap();
        assert_eq!(ws.capacity(), 0);
    }

    #[test]
    fn attach_rejects_short_storage() {
        let mut floats = vec![0.0; float_len(16) - 1];
        let mut indices = vec![0usize; index_len(16)];
        let err = Workspace::attach(&mut floats, &mut indices, 16).unwrap_err();
        assert!(matches!(err, SolveError::StorageTooSmall { capacity: 16, .. }));
    }

    #[test]
    fn sub_arrays_do_not_alias() {
        let mut floats = vec![0.0; float_len(4)];
        let mut indices = vec![0usize; index_len(4)];
        let mut ws = Workspace::attach(&mut floats, &mut indices, 4).unwrap();
        for (i, v) in ws.gx.iter_mut().enumerate() {
            *v = i as f64;
        }
        for v in ws.gy.iter_mut() {
            *v = -1.0;
        }
        assert_eq!(ws.gx, [0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn solver_reports_capacity() {
        let solver = Solver::new(32);
        assert_eq!(solver.capacity(), 32);
    }
}
