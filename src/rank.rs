//! Rank type and the Fibonacci degree bound.
//!
//! # Why the bound matters
//!
//! Consolidation parks trees in buckets indexed by rank. In a Fibonacci heap
//! a node of rank `d` roots a subtree of at least `F(d+2)` nodes, where
//! `F(1) = F(2) = 1`. Since `F(d+2) ≥ φ^d` (φ the golden ratio), no node in a
//! heap of `n` elements can have rank above `log_φ n`.
//!
//! The bucket table is sized from this bound on every delete-min, so it
//! grows with the heap instead of relying on a fixed capacity.

/// Type alias for node rank/degree.
///
/// Rank is the length of a node's child ring, which is already a `usize`.
pub type Rank = usize;

/// The golden ratio φ = (1 + √5) / 2.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Largest rank a node can have in a heap of `n` nodes.
///
/// Computed exactly as the largest `d` with `F(d+2) ≤ n`.
///
/// # Example
///
/// ```rust
/// use fibonacci_forest::rank::max_rank;
///
/// assert_eq!(max_rank(1), 0);
/// assert_eq!(max_rank(2), 1);
/// assert_eq!(max_rank(3), 2);
/// assert_eq!(max_rank(5), 3);
/// assert_eq!(max_rank(7), 3);
/// ```
pub fn max_rank(n: usize) -> Rank {
    // (F(d+2), F(d+3)) starting from d = 0
    let (mut current, mut next) = (1usize, 2usize);
    let mut rank = 0;
    if n < current {
        return 0;
    }
    while next <= n {
        rank += 1;
        match current.checked_add(next) {
            Some(sum) => {
                current = next;
                next = sum;
            }
            None => break,
        }
    }
    rank
}

/// Number of buckets consolidation needs for a heap of `n` nodes.
///
/// One slot per possible rank, `0..=max_rank(n)`.
#[inline]
pub fn bucket_count(n: usize) -> usize {
    max_rank(n) + 1
}

/// The real-valued bound `log_φ n`, for diagnostics and tests.
pub fn golden_ratio_bound(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        (n as f64).ln() / PHI.ln()
    }
}
