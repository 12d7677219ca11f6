//! Outcome analysis: how proportional a result is and how close the last
//! seat of each district was.

pub mod disproportionality;
pub mod vulnerability;

pub use disproportionality::{disproportionality, gallagher, loosemore_hanby};
pub use vulnerability::{
    most_vulnerable_seat, quotients_to_last_seat, votes_to_last_seat, vulnerable_seat, SeatChallenger,
    SeatVulnerability,
};
