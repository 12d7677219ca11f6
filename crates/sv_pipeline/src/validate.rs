//! crates/sv_pipeline/src/validate.rs
//! Structural checks on a payload before any seat is awarded.
//! Deterministic output; Errors stop the run, Warnings are reported only.

use std::collections::BTreeSet;

use sv_core::ids::{DistrictId, PartyCode};

use crate::payload::ComputationPayload;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityRef {
    Root,
    Param(&'static str),
    District(DistrictId),
    Votes(DistrictId, PartyCode),
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub where_: EntityRef,
}

/// pass = no Error; issues sorted by (code, where, message).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }
}

/// Top-level entry point.
pub fn validate(payload: &ComputationPayload) -> ValidationReport {
    let mut issues = Vec::new();

    issues.extend(check_districts(payload));
    issues.extend(check_votes(payload));
    issues.extend(check_metrics(payload));

    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.where_.cmp(&b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });

    ValidationReport { pass: !issues.iter().any(|i| i.severity == Severity::Error), issues }
}

/// Errors:
/// - "District.Duplicate" on a district listed twice
/// Warnings:
/// - "District.SeatTotal" if district seats do not add up to `Election.seats`
fn check_districts(payload: &ComputationPayload) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let election = &payload.election;

    let mut seen = BTreeSet::new();
    for d in &election.districts {
        if !seen.insert(&d.name) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "District.Duplicate",
                message: format!("district {} is listed twice", d.name),
                where_: EntityRef::District(d.name.clone()),
            });
        }
    }

    let total = election.district_seat_total();
    if total != election.seats {
        issues.push(ValidationIssue {
            severity: Severity::Warning,
            code: "District.SeatTotal",
            message: format!("districts carry {total} seats, election record says {}", election.seats),
            where_: EntityRef::Param("seats"),
        });
    }
    issues
}

/// Errors:
/// - "Votes.Duplicate" on two rows for one (district, party)
/// - "Votes.UnknownDistrict" on votes for a district the election does not have
/// Warnings:
/// - "Votes.YearMismatch" on rows of another election year
fn check_votes(payload: &ComputationPayload) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let election = &payload.election;

    let mut seen = BTreeSet::new();
    for v in &payload.votes {
        let at = EntityRef::Votes(v.district.clone(), v.party_code.clone());
        if v.election_year != election.year {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                code: "Votes.YearMismatch",
                message: format!("votes from {} in a {} computation", v.election_year, election.year),
                where_: at.clone(),
            });
        }
        if election.district(&v.district).is_none() {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "Votes.UnknownDistrict",
                message: format!("votes for unknown district {}", v.district),
                where_: at.clone(),
            });
        }
        if !seen.insert((&v.district, &v.party_code)) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "Votes.Duplicate",
                message: format!("party {} has two vote rows in {}", v.party_code, v.district),
                where_: at,
            });
        }
    }
    issues
}

/// Errors:
/// - "Metrics.Duplicate" on two rows for one district
/// Warnings:
/// - "Metrics.UnknownDistrict" on metrics for a district the election does not have
fn check_metrics(payload: &ComputationPayload) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = BTreeSet::new();
    for m in &payload.metrics {
        if !seen.insert(&m.district) {
            issues.push(ValidationIssue {
                severity: Severity::Error,
                code: "Metrics.Duplicate",
                message: format!("district {} has two metric rows", m.district),
                where_: EntityRef::District(m.district.clone()),
            });
        }
        if payload.election.district(&m.district).is_none() {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                code: "Metrics.UnknownDistrict",
                message: format!("metrics for unknown district {}", m.district),
                where_: EntityRef::District(m.district.clone()),
            });
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{payload, vote};
    use sv_core::entities::Metrics;

    #[test]
    fn clean_payload_passes() {
        let r = validate(&payload());
        assert!(r.pass, "{:?}", r.issues);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn duplicate_votes_and_unknown_district_fail() {
        let mut p = payload();
        p.votes.push(vote("Oslo", "A", 1));
        p.votes.push(vote("Nowhere", "A", 1));
        let r = validate(&p);
        assert!(!r.pass);
        let codes: Vec<&str> = r.errors().map(|i| i.code).collect();
        assert_eq!(codes, vec!["Votes.Duplicate", "Votes.UnknownDistrict"]);
    }

    #[test]
    fn year_mismatch_and_seat_total_only_warn() {
        let mut p = payload();
        p.votes[0].election_year = 2013;
        p.election.seats += 1;
        let r = validate(&p);
        assert!(r.pass);
        let codes: Vec<&str> = r.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec!["District.SeatTotal", "Votes.YearMismatch"]);
    }

    #[test]
    fn duplicate_metrics_fail() {
        let mut p = payload();
        p.metrics.push(Metrics { election_year: 2021, district: "Oslo".parse().unwrap(), population: 1, area: 1.0 });
        let r = validate(&p);
        assert!(!r.pass);
        let codes: Vec<&str> = r.errors().map(|i| i.code).collect();
        assert_eq!(codes, vec!["Metrics.Duplicate"]);
    }
}
