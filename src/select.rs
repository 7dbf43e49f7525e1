//! Worst-case linear-time selection.
//!
//! The prune-and-search loop needs the median of the candidate intersection
//! abscissas on every round; anything slower than O(len) there would break
//! the overall linear bound. Selection is done with the classic
//! median-of-medians scheme: groups of five are reduced to their medians
//! with a fixed comparator network, the median of those medians serves as
//! the partition pivot, and the search recurses into the surviving side.

#[inline]
fn cswap(d: &mut [f64], i: usize, j: usize) {
    if d[j] < d[i] {
        d.swap(i, j);
    }
}

/// Sorts up to five elements in place with a fixed comparator network.
fn sort_small(d: &mut [f64]) {
    match d.len() {
        0 | 1 => {}
        2 => cswap(d, 0, 1),
        3 => {
            cswap(d, 1, 2);
            cswap(d, 0, 2);
            cswap(d, 0, 1);
        }
        4 => {
            cswap(d, 0, 1);
            cswap(d, 2, 3);
            cswap(d, 0, 2);
            cswap(d, 1, 3);
            cswap(d, 1, 2);
        }
        5 => {
            cswap(d, 0, 1);
            cswap(d, 3, 4);
            cswap(d, 2, 4);
            cswap(d, 2, 3);
            cswap(d, 0, 3);
            cswap(d, 0, 2);
            cswap(d, 1, 4);
            cswap(d, 1, 3);
            cswap(d, 1, 2);
        }
        _ => unreachable!("sorting network only covers up to five elements"),
    }
}

/// Three-way partition around `pivot`: values below the pivot end up in the
/// prefix, values above it in the suffix, pivot-equal values in between.
/// Returns the number of values strictly below the pivot.
fn partition(d: &mut [f64], pivot: f64) -> usize {
    if d.is_empty() {
        return 0;
    }
    let mut l = 0;
    let mut r = d.len() - 1;
    let mut i = 0;
    while i <= r {
        if d[i] < pivot {
            d.swap(l, i);
            l += 1;
            i += 1;
        } else if d[i] > pivot {
            d.swap(r, i);
            if r == 0 {
                break;
            }
            r -= 1;
        } else {
            i += 1;
        }
    }
    l
}

/// Returns the element that would sit at `buf[k]` if `buf` were sorted.
///
/// Runs in worst-case O(len) and operates in place; afterwards `buf` holds
/// some permutation of its original contents. `k` must be below `buf.len()`.
pub fn kth_smallest(buf: &mut [f64], k: usize) -> f64 {
    if buf.len() <= 5 {
        sort_small(buf);
        return buf[k];
    }

    // Reduce each full group of five to its median and collect those medians
    // in the prefix. A trailing group of fewer than five elements is ignored
    // for pivot selection; partitioning still sees it.
    let mut groups = 0;
    let mut i = 0;
    while i + 5 <= buf.len() {
        sort_small(&mut buf[i..i + 5]);
        buf.swap(i + 2, groups);
        groups += 1;
        i += 5;
    }

    let pivot = median(&mut buf[..groups]);
    let l = partition(buf, pivot);
    if l == k {
        pivot
    } else if l > k {
        kth_smallest(&mut buf[..l], k)
    } else {
        kth_smallest(&mut buf[l + 1..], k - l - 1)
    }
}

/// The element at position `len / 2` of the sorted order. `buf` must not be
/// empty.
pub fn median(buf: &mut [f64]) -> f64 {
    let k = buf.len() / 2;
    kth_smallest(buf, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sorted(v: &[f64]) -> Vec<f64> {
        let mut s = v.to_vec();
        s.sort_by(|a, b| a.partial_cmp(b).unwrap());
        s
    }

    #[test]
    fn sort_small_all_lengths() {
        for len in 0..=5usize {
            let mut d: Vec<f64> = (0..len).map(|i| (len - i) as f64).collect();
            sort_small(&mut d);
            assert_eq!(d, sorted(&d));
        }
        let mut d = [7.0, 4.0, 3.0, 9.0, 5.0];
        sort_small(&mut d);
        assert_eq!(d, [3.0, 4.0, 5.0, 7.0, 9.0]);
    }

    #[test]
    fn partition_counts() {
        let src = [
            5.0, 13.0, 13.0, 8.0, 9.0, 12.0, 19.0, 2.0, 1.0, 13.0, 14.0, 10.0, 6.0, 3.0, 2.0,
            3.0, 7.0, 16.0, 17.0, 16.0,
        ];
        for (pivot, expect) in [(8.0, 8), (13.0, 12), (2.0, 1), (1.0, 0), (19.0, 19)] {
            let mut d = src;
            let l = partition(&mut d, pivot);
            assert_eq!(l, expect);
            assert_eq!(d[l], pivot);
            assert!(d[..l].iter().all(|&v| v < pivot));
            assert!(d[l..].iter().all(|&v| v >= pivot));
        }
    }

    #[test]
    fn partition_duplicates() {
        let mut d = [6.0, 4.0, 16.0, 7.0, 1.0, 6.0, 6.0, 14.0];
        let l = partition(&mut d, 6.0);
        assert_eq!(l, 2);
        assert_eq!(d[2], 6.0);
    }

    #[test]
    fn partition_single() {
        let mut d = [6.0];
        assert_eq!(partition(&mut d, 6.0), 0);
    }

    #[test]
    fn kth_matches_sorted_reference() {
        let src = [
            4.0, 15.0, 1.0, 3.0, 16.0, 0.0, 9.0, 0.0, 8.0, 11.0, 14.0, 15.0, 12.0, 8.0, 13.0,
            10.0, 17.0, 7.0, 17.0, 7.0, 19.0, 2.0, 19.0, 19.0, 11.0, 10.0, 8.0, 7.0, 5.0, 19.0,
            10.0, 18.0, 6.0, 12.0, 2.0, 9.0, 10.0, 18.0, 2.0, 5.0, 8.0, 6.0, 19.0, 7.0, 5.0,
            9.0, 17.0, 1.0, 5.0, 2.0, 12.0,
        ];
        let reference = sorted(&src);
        for k in 0..src.len() {
            let mut d = src;
            assert_eq!(kth_smallest(&mut d, k), reference[k], "k = {k}");
            assert_eq!(sorted(&d), reference, "buffer must stay a permutation");
        }
    }

    #[test]
    fn median_small_and_large() {
        let mut one = [1.2];
        assert_eq!(median(&mut one), 1.2);
        let mut two = [1.2, 2.4];
        assert_eq!(median(&mut two), 2.4);
        let mut seven = [7.0, 6.8, 5.6, 2.9, 3.5, 1.2, 2.4];
        assert_eq!(median(&mut seven), 3.5);
    }

    #[test]
    fn median_of_193_elements() {
        let mut d = [
            56.0, 77.0, 40.0, 23.0, 40.0, 20.0, 76.0, 17.0, 69.0, 29.0, 84.0, 1.0, 4.0, 27.0,
            43.0, 55.0, 60.0, 3.0, 73.0, 0.0, 15.0, 61.0, 1.0, 21.0, 78.0, 47.0, 22.0, 19.0,
            94.0, 67.0, 78.0, 83.0, 47.0, 45.0, 2.0, 98.0, 17.0, 63.0, 44.0, 44.0, 81.0, 62.0,
            53.0, 86.0, 65.0, 15.0, 21.0, 39.0, 53.0, 72.0, 51.0, 63.0, 28.0, 54.0, 29.0, 2.0,
            69.0, 83.0, 68.0, 86.0, 8.0, 32.0, 6.0, 43.0, 45.0, 62.0, 6.0, 60.0, 2.0, 64.0,
            77.0, 28.0, 67.0, 31.0, 59.0, 1.0, 63.0, 46.0, 31.0, 67.0, 51.0, 31.0, 45.0, 47.0,
            55.0, 19.0, 98.0, 14.0, 38.0, 73.0, 44.0, 94.0, 84.0, 64.0, 67.0, 65.0, 70.0, 93.0,
            96.0, 7.0, 6.0, 96.0, 53.0, 87.0, 90.0, 43.0, 56.0, 19.0, 88.0, 41.0, 75.0, 15.0,
            80.0, 71.0, 26.0, 35.0, 35.0, 28.0, 65.0, 22.0, 30.0, 52.0, 51.0, 73.0, 24.0, 69.0,
            19.0, 87.0, 7.0, 94.0, 25.0, 98.0, 32.0, 1.0, 24.0, 10.0, 36.0, 52.0, 80.0, 77.0,
            20.0, 0.0, 37.0, 59.0, 6.0, 55.0, 31.0, 4.0, 60.0, 17.0, 13.0, 27.0, 27.0, 93.0,
            59.0, 26.0, 45.0, 29.0, 92.0, 2.0, 78.0, 32.0, 61.0, 0.0, 79.0, 83.0, 49.0, 49.0,
            67.0, 14.0, 76.0, 58.0, 50.0, 11.0, 2.0, 46.0, 76.0, 21.0, 66.0, 67.0, 21.0, 26.0,
            50.0, 38.0, 86.0, 98.0, 3.0, 71.0, 92.0, 57.0, 90.0, 73.0, 82.0,
        ];
        assert_eq!(d.len(), 193);
        let reference = sorted(&d);
        assert_eq!(median(&mut d), 49.0);
        assert_eq!(sorted(&d), reference);
    }

    #[test]
    fn median_adversarial_shapes() {
        // Sorted, reverse-sorted, and constant inputs exercise the
        // worst-case pivot paths.
        let n = 1001;
        let asc: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let mut d = asc.clone();
        assert_eq!(median(&mut d), (n / 2) as f64);

        let mut desc: Vec<f64> = asc.iter().rev().copied().collect();
        assert_eq!(median(&mut desc), (n / 2) as f64);

        let mut flat = vec![42.0; n];
        assert_eq!(median(&mut flat), 42.0);
    }

    #[test]
    fn kth_randomized() {
        let mut rng = StdRng::seed_from_u64(0x12d);
        for round in 0..200 {
            let len = rng.gen_range(1..400);
            let src: Vec<f64> = (0..len)
                .map(|_| (rng.gen_range(-50..50)) as f64)
                .collect();
            let reference = sorted(&src);
            let k = rng.gen_range(0..len);
            let mut d = src.clone();
            assert_eq!(kth_smallest(&mut d, k), reference[k], "round {round}");
            assert_eq!(sorted(&d), reference);
        }
    }
}
