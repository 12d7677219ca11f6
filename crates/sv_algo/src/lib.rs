// crates/sv_algo/src/lib.rs
#![forbid(unsafe_code)]

// Core IDs and records
pub use sv_core::{
    ids::{DistrictId, PartyCode},
    results::{DistrictResult, PartyResult, SeatQuotient, SeatResult},
};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation;

pub use allocation::{apportion, AllocError};

// ----------------------------- District seats ----------------------------------------

pub mod district_seats;

pub use district_seats::{distribute_district_seats, district_points};

// ----------------------------- Levelling ---------------------------------------------

pub mod levelling;

pub use levelling::{distribute_levelling, LevellingError, LevellingOutcome};

// ----------------------------- Analysis ----------------------------------------------

pub mod analysis;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use analysis::{
    disproportionality, gallagher, loosemore_hanby, most_vulnerable_seat, quotients_to_last_seat,
    votes_to_last_seat, vulnerable_seat, SeatChallenger, SeatVulnerability,
};
