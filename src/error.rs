//! Error taxonomy for the solver surface.
//!
//! Only caller-side precondition violations are errors. An empty feasible
//! region or an unbounded descent direction is a regular outcome and is
//! reported through [`Solution`](crate::Solution) instead.

use thiserror::Error;

/// Reasons a solve cannot even start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The constraint arrays disagree in length.
    #[error("constraint arrays disagree in length: gx = {gx}, gy = {gy}, h = {h}")]
    DimensionMismatch {
        /// Length of the x-coefficient array.
        gx: usize,
        /// Length of the y-coefficient array.
        gy: usize,
        /// Length of the right-hand-side array.
        h: usize,
    },

    /// The problem holds more constraints than the workspace was sized for.
    #[error("problem has {n} constraints but the workspace capacity is {capacity}")]
    CapacityExceeded {
        /// Constraint count of the rejected problem.
        n: usize,
        /// Capacity the workspace was attached with.
        capacity: usize,
    },

    /// Caller-provided storage is smaller than the layout requires.
    #[error(
        "storage too small for capacity {capacity}: need {need_floats} floats \
         and {need_indices} indices, got {got_floats} and {got_indices}"
    )]
    StorageTooSmall {
        /// Requested constraint capacity.
        capacity: usize,
        /// Required length of the float region.
        need_floats: usize,
        /// Required length of the index region.
        need_indices: usize,
        /// Provided length of the float region.
        got_floats: usize,
        /// Provided length of the index region.
        got_indices: usize,
    },

    /// The objective gradient is zero; every point is "optimal" and the
    /// conditioning rotation is undefined.
    #[error("objective gradient is zero, no descent direction exists")]
    DegenerateObjective,
}
