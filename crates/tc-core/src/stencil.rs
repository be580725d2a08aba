//! Shared index-bounds helpers for the fixed-margin stencils used by
//! vorticity, rotation and the criterion evaluator's bounds test.

/// True iff the 0-indexed `idx` leaves room for a margin of `margin` cells
/// on each side, using the source's literal (1-indexed) `margin ≤ p ≤ n −
/// margin` convention translated to 0-indexing: `margin−1 ≤ idx ≤ n − margin
/// − 1`.
#[inline]
pub fn within_margin(idx: usize, n: usize, margin: usize) -> bool {
    if n < 2 * margin {
        return false;
    }
    let p = idx + 1;
    p >= margin && p <= n - margin
}
