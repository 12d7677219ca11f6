//! Disproportionality indices over `PartyResult::proportionality`
//! (vote share − seat share, percentage points).

use sv_core::results::PartyResult;
use sv_core::variables::DisproportionalityIndex;

/// Loosemore–Hanby: `½ · Σ |p|`.
pub fn loosemore_hanby(rows: &[PartyResult]) -> f64 {
    0.5 * rows.iter().map(|r| r.proportionality.abs()).sum::<f64>()
}

/// Gallagher least squares: `√(½ · Σ p²)`.
pub fn gallagher(rows: &[PartyResult]) -> f64 {
    (0.5 * rows.iter().map(|r| r.proportionality * r.proportionality).sum::<f64>()).sqrt()
}

pub fn disproportionality(rows: &[PartyResult], index: DisproportionalityIndex) -> f64 {
    match index {
        DisproportionalityIndex::LoosemoreHanby => loosemore_hanby(rows),
        DisproportionalityIndex::Gallagher => gallagher(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(shares: &[(u64, u32)]) -> Vec<PartyResult> {
        let total_votes: u64 = shares.iter().map(|s| s.0).sum();
        let total_seats: u32 = shares.iter().map(|s| s.1).sum();
        shares
            .iter()
            .enumerate()
            .map(|(i, &(v, s))| {
                let mut r = PartyResult::new(format!("P{i}").parse().unwrap(), String::new(), v, s);
                r.recompute_shares(total_votes, total_seats);
                r
            })
            .collect()
    }

    #[test]
    fn perfectly_proportional_is_zero() {
        let r = rows(&[(500, 5), (300, 3), (200, 2)]);
        for idx in DisproportionalityIndex::ALL {
            assert!(disproportionality(&r, *idx).abs() < 1e-9);
        }
    }

    #[test]
    fn known_values() {
        // p = +10, −10 → LH 10, Gallagher √(½·200) = 10
        let r = rows(&[(60, 5), (40, 5)]);
        assert!((loosemore_hanby(&r) - 10.0).abs() < 1e-9);
        assert!((gallagher(&r) - 10.0).abs() < 1e-9);

        // p = +5, +5, −10 → LH 10, Gallagher √75
        let r = rows(&[(25, 2), (25, 2), (50, 6)]);
        assert!((loosemore_hanby(&r) - 10.0).abs() < 1e-9);
        assert!((gallagher(&r) - 75f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn never_negative() {
        let r = rows(&[(1, 0), (2, 3), (97, 1)]);
        assert!(loosemore_hanby(&r) >= 0.0);
        assert!(gallagher(&r) >= 0.0);
        assert_eq!(loosemore_hanby(&[]), 0.0);
    }
}
