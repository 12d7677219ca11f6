//! Determinism utilities: stable ordering, exact quotient comparison and the
//! single tie rule used by every award loop.
//!
//! This module is **I/O-free**. It provides:
//! - Stable total orders for name tokens
//! - Exact comparison of non-negative fractions (u128 cross-multiplication)
//! - `pick_best`: max-by-quotient with the canonical tie break
//! - Canonical in-place sort helpers

use core::cmp::Ordering;

use crate::ids::{DistrictId, PartyCode};

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for PartyCode {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for DistrictId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/* -------------------------------------------------------------------------- */
/*                              Exact fractions                               */
/* -------------------------------------------------------------------------- */

/// A non-negative fraction `num / den` compared without floating point.
/// `den` must be non-zero. Equality is by value, so `2/4 == 1/2`.
#[derive(Clone, Copy, Debug)]
pub struct Ratio {
    pub num: u128,
    pub den: u128,
}

impl Ratio {
    #[inline]
    pub fn new(num: u128, den: u128) -> Self {
        debug_assert!(den > 0, "ratio with zero denominator");
        Self { num, den }
    }

    /// Lossy view for reporting only; never used to decide an award.
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl PartialEq for Ratio {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ratio {}

impl Ord for Ratio {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        // a/b vs c/d  <=>  a*d vs c*b
        (self.num * other.den).cmp(&(other.num * self.den))
    }
}

impl PartialOrd for Ratio {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/* -------------------------------------------------------------------------- */
/*                                  Tie rule                                  */
/* -------------------------------------------------------------------------- */

/// Pick the candidate with the greatest score; equal scores go to the
/// smallest key under `StableOrd`. Returns `None` for an empty input.
pub fn pick_best<'a, K, S, I>(candidates: I) -> Option<(&'a K, S)>
where
    K: StableOrd + 'a,
    S: Ord + Copy,
    I: IntoIterator<Item = (&'a K, S)>,
{
    let mut best: Option<(&'a K, S)> = None;
    for (k, s) in candidates {
        best = match best {
            None => Some((k, s)),
            Some((bk, bs)) => match s.cmp(&bs) {
                Ordering::Greater => Some((k, s)),
                Ordering::Equal if k.stable_cmp(bk) == Ordering::Less => Some((k, s)),
                _ => Some((bk, bs)),
            },
        };
    }
    best
}

/* -------------------------------------------------------------------------- */
/*                            Canonical sort helpers                          */
/* -------------------------------------------------------------------------- */

/// Sort items **in place** by ascending `DistrictId` (lexicographic).
#[inline]
pub fn sort_by_district<T, F>(xs: &mut [T], key: F)
where
    F: Fn(&T) -> &DistrictId,
{
    xs.sort_by(|a, b| key(a).stable_cmp(key(b)));
}

/* ---------------------------------- Tests --------------------------------- */
