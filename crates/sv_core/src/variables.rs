//! variables.rs: Method domains and validated numeric parameters.
//!
//! Every user-facing selection is a closed enum: an algorithm or index outside
//! the set cannot be constructed, so selection points match exhaustively and
//! need no "unknown" branch.
//!
//! Numeric parameters are carried in integer units so that seat comparisons
//! stay exact:
//! - `FirstDivisor` in thousandths (1.4 → 1400),
//! - `Threshold` in basis points (4 % → 400).

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Define an enum with explicit wire tokens (serde derives are feature-gated).
macro_rules! wire_enum {
    ($(#[$m:meta])* $name:ident => { $($(#[$vm:meta])* $variant:ident = $token:expr),+ $(,)? }) => {
        $(#[$m])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                $(#[$vm])*
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            /// Stable wire token.
            pub const fn as_token(self) -> &'static str {
                match self { $($name::$variant => $token,)+ }
            }

            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_token()) }
        }

        impl core::str::FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(CoreError::DomainOutOfRange(stringify!($name))),
                }
            }
        }
    };
}

wire_enum!(
    /// Apportionment rule selected for a run.
    AlgorithmType => {
        /// Divisors 1, 3, 5, …
        SainteLague = "sainte_lague",
        /// Divisors f, 3, 5, … with a configurable first divisor f.
        ModifiedSainteLague = "modified_sainte_lague",
        /// Divisors 1, 2, 3, …
        DHondt = "d_hondt",
        LargestFractionHare = "largest_fraction_hare",
        LargestFractionDroop = "largest_fraction_droop",
    }
);

wire_enum!(
    /// Disproportionality index reported for a result.
    DisproportionalityIndex => {
        LoosemoreHanby = "loosemore_hanby",
        Gallagher = "gallagher",
    }
);

wire_enum!(
    /// Quota for largest-fraction methods.
    QuotaKind => {
        /// floor(V / m)
        Hare = "hare",
        /// floor(V / (m + 1)) + 1
        Droop = "droop",
    }
);

wire_enum!(
    /// How district seat counts are fixed for an election year.
    SeatLaw => {
        /// Seats per district are part of the election record.
        Fixed = "fixed",
        /// Seats are distributed over districts by population + area × area factor.
        AreaFormula = "area_formula",
    }
);

/// First election where district seats follow the area formula.
pub const FIRST_AREA_FORMULA_YEAR: u16 = 2005;

impl SeatLaw {
    pub fn for_year(year: u16) -> Self {
        if year >= FIRST_AREA_FORMULA_YEAR { SeatLaw::AreaFormula } else { SeatLaw::Fixed }
    }

    #[inline]
    pub fn distributes_district_seats(self) -> bool {
        matches!(self, SeatLaw::AreaFormula)
    }
}

/* ----------------------------- First divisor ----------------------------- */

/// First Sainte-Laguë divisor in thousandths. Domain 1.0..=3.0 keeps the
/// divisor sequence non-decreasing (f ≤ 3), so award quotients never rise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct FirstDivisor(u32);

impl FirstDivisor {
    pub const PLAIN: FirstDivisor = FirstDivisor(1_000);
    /// The first divisor used in Norwegian elections since 1953.
    pub const NORWEGIAN: FirstDivisor = FirstDivisor(1_400);

    pub fn from_f64(v: f64) -> Result<Self, CoreError> {
        if !v.is_finite() || !(1.0..=3.0).contains(&v) {
            return Err(CoreError::InvalidFirstDivisor(v));
        }
        Ok(Self((v * 1_000.0).round() as u32))
    }

    #[inline]
    pub const fn milli(self) -> u64 {
        self.0 as u64
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 1_000.0
    }
}

impl Default for FirstDivisor {
    fn default() -> Self {
        FirstDivisor::PLAIN
    }
}

impl TryFrom<f64> for FirstDivisor {
    type Error = CoreError;
    fn try_from(v: f64) -> Result<Self, Self::Error> {
        FirstDivisor::from_f64(v)
    }
}

impl From<FirstDivisor> for f64 {
    fn from(v: FirstDivisor) -> f64 {
        v.as_f64()
    }
}

/* ------------------------------- Threshold ------------------------------- */

/// Vote-share threshold in basis points (hundredths of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct Threshold(u32);

impl Threshold {
    pub const NONE: Threshold = Threshold(0);

    pub fn from_percent(pct: f64) -> Result<Self, CoreError> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(CoreError::InvalidThreshold(pct));
        }
        Ok(Self((pct * 100.0).round() as u32))
    }

    #[inline]
    pub const fn basis_points(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// `votes / total >= threshold`, cross-multiplied in u128.
    /// An empty total meets no positive threshold.
    pub fn is_met(self, votes: u64, total: u64) -> bool {
        if self.0 == 0 {
            return true;
        }
        if total == 0 {
            return false;
        }
        u128::from(votes) * 10_000 >= u128::from(self.0) * u128::from(total)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = CoreError;
    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Threshold::from_percent(v)
    }
}

impl From<Threshold> for f64 {
    fn from(v: Threshold) -> f64 {
        v.as_percent()
    }
}

/* ------------------------------ Area factor ------------------------------ */

/// Weight of a district's area (km²) against its population in the area formula.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct AreaFactor(f64);

impl AreaFactor {
    /// Statutory factor since 2005.
    pub const NORWEGIAN: AreaFactor = AreaFactor(1.8);

    pub fn new(v: f64) -> Result<Self, CoreError> {
        if !v.is_finite() || v < 0.0 {
            return Err(CoreError::InvalidAreaFactor(v));
        }
        Ok(Self(v))
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for AreaFactor {
    type Error = CoreError;
    fn try_from(v: f64) -> Result<Self, Self::Error> {
        AreaFactor::new(v)
    }
}

impl From<AreaFactor> for f64 {
    fn from(v: AreaFactor) -> f64 {
        v.0
    }
}

/* --------------------------------- Method -------------------------------- */

/// Resolved apportionment method (what the allocators actually run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Method {
    SainteLague { first_divisor: FirstDivisor },
    DHondt,
    LargestFraction { quota: QuotaKind },
}

impl Method {
    /// Divisor (thousandths) for a party that already holds `seats_before`
    /// seats. `None` for largest-fraction methods.
    pub fn divisor_milli(self, seats_before: u32) -> Option<u64> {
        let s = u64::from(seats_before);
        match self {
            Method::SainteLague { first_divisor } => Some(if s == 0 {
                first_divisor.milli()
            } else {
                (2 * s + 1) * 1_000
            }),
            Method::DHondt => Some((s + 1) * 1_000),
            Method::LargestFraction { .. } => None,
        }
    }

    #[inline]
    pub fn is_divisor_method(self) -> bool {
        !matches!(self, Method::LargestFraction { .. })
    }
}

impl AlgorithmType {
    /// Resolve the selection into a runnable method. `first_divisor` only
    /// matters for the modified Sainte-Laguë variant.
    pub fn method(self, first_divisor: FirstDivisor) -> Method {
        match self {
            AlgorithmType::SainteLague => Method::SainteLague { first_divisor: FirstDivisor::PLAIN },
            AlgorithmType::ModifiedSainteLague => Method::SainteLague { first_divisor },
            AlgorithmType::DHondt => Method::DHondt,
            AlgorithmType::LargestFractionHare => Method::LargestFraction { quota: QuotaKind::Hare },
            AlgorithmType::LargestFractionDroop => Method::LargestFraction { quota: QuotaKind::Droop },
        }
    }

    #[inline]
    pub fn uses_first_divisor(self) -> bool {
        matches!(self, AlgorithmType::ModifiedSainteLague)
    }

    #[inline]
    pub fn is_largest_fraction(self) -> bool {
        matches!(self, AlgorithmType::LargestFractionHare | AlgorithmType::LargestFractionDroop)
    }
}
