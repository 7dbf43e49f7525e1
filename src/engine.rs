//! Megiddo prune-and-search main loop.
//!
//! Every round pairs up the ceiling constraints and the floor constraints,
//! computes the pairwise intersections, and probes the optimum at the
//! median intersection abscissa. Intersections that fall outside the
//! current interval, or on the known-wrong side of a previous probe, prove
//! one constraint of their pair redundant and eliminate it on the spot.
//! Each probe therefore discards a constant fraction of the surviving
//! constraints, which is what makes the whole solve linear in n.

use log::trace;
use nalgebra::Vector2;

use crate::finalize;
use crate::geometry;
use crate::locate::{self, Verdict};
use crate::numerics::Tolerance;
use crate::problem::Solution;
use crate::select;
use crate::workspace::Workspace;

/// Which index list a pruning pass rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum List {
    Ceil,
    Floor,
}

/// A previous probe: its abscissa and the side the optimum turned out to
/// be on.
#[derive(Debug, Clone, Copy)]
struct Probe {
    x: f64,
    optimum_is_left: bool,
}

pub(crate) struct Engine<'w, 'a> {
    ws: &'w mut Workspace<'a>,
    tol: Tolerance,
    probe: Option<Probe>,
}

impl<'w, 'a> Engine<'w, 'a> {
    pub(crate) fn new(ws: &'w mut Workspace<'a>, tol: Tolerance) -> Self {
        Self {
            ws,
            tol,
            probe: None,
        }
    }

    /// Iterates until the probe lands on the optimum, infeasibility is
    /// proven, or at most one floor and one ceiling constraint survive;
    /// the leftovers are handed to the finalizer.
    pub(crate) fn run(mut self) -> Solution {
        while self.ws.floor_len > 0
            && (self.ws.floor_len > 1 || self.ws.ceil_len > 1)
            && (self.ws.x1 > self.ws.x0 || self.tol.feq(self.ws.x1, self.ws.x0))
        {
            self.ws.intersect_len = 0;
            prune_list(self.ws, List::Ceil, self.probe, self.tol);
            prune_list(self.ws, List::Floor, self.probe, self.tol);

            // No intersection candidates means every pair collapsed to a
            // survivor; the shrunken lists give fresh pairs next round.
            if self.ws.intersect_len == 0 {
                continue;
            }

            let x = select::median(&mut self.ws.x_intersect[..self.ws.intersect_len]);
            trace!(
                "probe x = {x} ({} candidates, {} ceil, {} floor)",
                self.ws.intersect_len,
                self.ws.ceil_len,
                self.ws.floor_len
            );

            match locate::locate(self.ws, x, self.tol) {
                Verdict::Infeasible => return Solution::Infeasible,
                Verdict::Left => {
                    self.ws.x1 = self.ws.x1.min(x);
                    self.probe = Some(Probe {
                        x,
                        optimum_is_left: true,
                    });
                }
                Verdict::Right => {
                    self.ws.x0 = self.ws.x0.max(x);
                    self.probe = Some(Probe {
                        x,
                        optimum_is_left: false,
                    });
                }
                Verdict::Here { y } => return finalize::point(self.ws, x, y),
                Verdict::HereEdge => return finalize::flat_floor_edge(self.ws, self.tol),
            }
        }

        finalize::remaining_pair_result(self.ws, self.tol)
    }
}

/// Of a pair proven redundant, picks the constraint to keep.
///
/// Parallel constraints are ordered by their offset: normalization made `h`
/// directly comparable, and the larger offset is the tighter half-plane.
/// Otherwise the binding envelope side is decided by slope; among ceilings
/// the pointwise minimum binds, among floors the pointwise maximum, and the
/// side of the optimum flips which slope dominates there.
fn survivor(
    h: &[f64],
    dx: &[f64],
    ci0: usize,
    ci1: usize,
    is_ceil: bool,
    parallel: bool,
    optimum_is_left: bool,
) -> usize {
    if parallel {
        if h[ci0] >= h[ci1] {
            ci0
        } else {
            ci1
        }
    } else {
        let dir = if optimum_is_left { 1.0 } else { -1.0 } * if is_ceil { 1.0 } else { -1.0 };
        if dir * dx[ci0] >= dir * dx[ci1] {
            ci0
        } else {
            ci1
        }
    }
}

/// One pruning pass over the ceiling or floor list.
///
/// Walks the list in pairs. A pair whose intersection may still contain the
/// optimum is kept whole and its abscissa recorded as a median candidate;
/// otherwise one constraint is eliminated and the survivor kept as a
/// singleton. Kept pairs are collected at the bottom of `tmp`, singletons
/// are stacked from the top, and the list is rebuilt from both ends. Pairs
/// must stay adjacent so that the next round pairs them again only after
/// the interval has moved.
fn prune_list(ws: &mut Workspace<'_>, list: List, probe: Option<Probe>, tol: Tolerance) {
    let is_ceil = list == List::Ceil;
    let n = ws.n;
    let len = match list {
        List::Ceil => ws.ceil_len,
        List::Floor => ws.floor_len,
    };

    let mut pair_tail = 0;
    let mut single_tail = n;

    for k in 0..len / 2 {
        let (ci0, ci1) = match list {
            List::Ceil => (ws.ceil[2 * k], ws.ceil[2 * k + 1]),
            List::Floor => (ws.floor[2 * k], ws.floor[2 * k + 1]),
        };
        let g0 = Vector2::new(ws.gx[ci0], ws.gy[ci0]);
        let g1 = Vector2::new(ws.gx[ci1], ws.gy[ci1]);

        match geometry::intersect(g0, ws.h[ci0], g1, ws.h[ci1], tol) {
            None => {
                let keep = survivor(ws.h, ws.dx, ci0, ci1, is_ceil, true, false);
                single_tail -= 1;
                ws.tmp[single_tail] = keep;
            }
            Some(p) => {
                // An intersection on the probed abscissa itself is only
                // useful on the side the optimum is known to be on.
                let on_probe_wrong_side = |want_left: bool| {
                    probe.is_some_and(|m| tol.feq(p.x, m.x) && m.optimum_is_left == want_left)
                };
                if p.x < ws.x0 || on_probe_wrong_side(false) {
                    let keep = survivor(ws.h, ws.dx, ci0, ci1, is_ceil, false, false);
                    single_tail -= 1;
                    ws.tmp[single_tail] = keep;
                } else if p.x > ws.x1 || on_probe_wrong_side(true) {
                    let keep = survivor(ws.h, ws.dx, ci0, ci1, is_ceil, false, true);
                    single_tail -= 1;
                    ws.tmp[single_tail] = keep;
                } else {
                    ws.x_intersect[ws.intersect_len] = p.x;
                    ws.intersect_len += 1;
                    ws.tmp[pair_tail] = ci0;
                    ws.tmp[pair_tail + 1] = ci1;
                    pair_tail += 2;
                }
            }
        }
    }

    // An odd list leaves its last entry unpaired; carry it over.
    if len % 2 == 1 {
        let last = match list {
            List::Ceil => ws.ceil[len - 1],
            List::Floor => ws.floor[len - 1],
        };
        single_tail -= 1;
        ws.tmp[single_tail] = last;
    }

    // Rebuild: kept pairs first, then the singletons in the order they
    // were stacked.
    let mut out = 0;
    for i in 0..pair_tail {
        let v = ws.tmp[i];
        match list {
            List::Ceil => ws.ceil[out] = v,
            List::Floor => ws.floor[out] = v,
        }
        out += 1;
    }
    for i in (single_tail..n).rev() {
        let v = ws.tmp[i];
        match list {
            List::Ceil => ws.ceil[out] = v,
            List::Floor => ws.floor[out] = v,
        }
        out += 1;
    }
    match list {
        List::Ceil => ws.ceil_len = out,
        List::Floor => ws.floor_len = out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition;
    use crate::workspace::{float_len, index_len};

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn survivor_parallel_prefers_larger_offset() {
        let h = [0.0, 1.0];
        let dx = [0.0, 0.0];
        for is_ceil in [true, false] {
            for left in [true, false] {
                assert_eq!(survivor(&h, &dx, 0, 1, is_ceil, true, left), 1);
                assert_eq!(survivor(&h, &dx, 1, 0, is_ceil, true, left), 1);
            }
        }
    }

    #[test]
    fn survivor_by_slope_and_side() {
        let h = [1.0, 0.0];
        let dx = [1.0, -1.0];
        // Floor with the optimum to the left keeps the falling slope.
        assert_eq!(survivor(&h, &dx, 0, 1, false, false, true), 1);
        assert_eq!(survivor(&h, &dx, 1, 0, false, false, true), 1);
        // Ceiling with the optimum to the left keeps the rising slope.
        assert_eq!(survivor(&h, &dx, 0, 1, true, false, true), 0);
        assert_eq!(survivor(&h, &dx, 1, 0, true, false, true), 0);
        // Sides flip when the optimum is to the right.
        assert_eq!(survivor(&h, &dx, 0, 1, false, false, false), 0);
        assert_eq!(survivor(&h, &dx, 1, 0, false, false, false), 0);
        assert_eq!(survivor(&h, &dx, 0, 1, true, false, false), 1);
        assert_eq!(survivor(&h, &dx, 1, 0, true, false, false), 1);
    }

    #[test]
    fn prune_records_intersections_and_rebuilds_lists() {
        let mut floats = vec![0.0; float_len(9)];
        let mut indices = vec![0usize; index_len(9)];
        let mut ws = Workspace::attach(&mut floats, &mut indices, 9).unwrap();

        let gx = [1.0, -1.0, 0.0, 0.0, 0.5, 0.5, -0.25, 4.0, 2.0];
        let gy = [0.0, 0.0, -1.0, 1.0, 0.1, 5.0, -1.0, -1.0, 9.0];
        let h = [2.0, -7.0, -8.0, 2.0, 2.0, 15.0, -11.0, 5.0, 8.0];
        ws.reset(9);
        ws.gx[..9].copy_from_slice(&gx);
        ws.gy[..9].copy_from_slice(&gy);
        ws.h[..9].copy_from_slice(&h);
        assert!(condition::categorize(&mut ws, tol()));
        assert_eq!(ws.ceil_len, 3);
        assert_eq!(ws.floor_len, 4);
        condition::derive_slopes(&mut ws);

        ws.intersect_len = 0;
        prune_list(&mut ws, List::Ceil, None, tol());
        // The one ceiling pair intersects right of x1 = 7, so one
        // constraint is eliminated and no candidate recorded.
        assert_eq!(ws.intersect_len, 0);
        assert_eq!(&ws.ceil[..ws.ceil_len], [2, 7]);

        prune_list(&mut ws, List::Floor, None, tol());
        assert_eq!(ws.intersect_len, 1);
        assert_eq!(&ws.floor[..ws.floor_len], [3, 4, 5]);
        assert!((ws.x_intersect[0] - 3.6).abs() < 1e-12);
    }
}
