//! crates/sv_pipeline/src/payload.rs
//! The computation payload: one year's records plus the user-adjustable
//! settings. `RunSettings` is its validated, integer-unit form.

use serde::{Deserialize, Serialize};

use sv_core::entities::{Election, Metrics, Parameters, Votes};
use sv_core::variables::{AlgorithmType, AreaFactor, FirstDivisor, Method, SeatLaw, Threshold};

use crate::EngineError;

/// Everything one computation needs. Numeric settings are kept as entered
/// (percent, plain divisors) and checked by `settings()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputationPayload {
    pub election: Election,
    pub algorithm: AlgorithmType,
    pub first_divisor: f64,
    /// National threshold (percent) for levelling seats.
    pub election_threshold: f64,
    /// Per-district threshold (percent) for district seats.
    pub district_threshold: f64,
    /// Total district seats to distribute when the seat law distributes them.
    pub district_seats: u32,
    pub leveling_seats: u32,
    pub area_factor: f64,
    pub votes: Vec<Votes>,
    pub metrics: Vec<Metrics>,
    pub parameters: Parameters,
}

/// Validated settings of a run in integer units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub algorithm: AlgorithmType,
    pub method: Method,
    /// First divisor of the national levelling ranking.
    pub levelling_divisor: FirstDivisor,
    pub election_threshold: Threshold,
    pub district_threshold: Threshold,
    pub district_seats: u32,
    pub leveling_seats: u32,
    pub area_factor: AreaFactor,
    pub seat_law: SeatLaw,
}

impl ComputationPayload {
    /// The payload with the settings the law prescribed for this election
    /// ("reset to historical"). Parameter-set values win over the election
    /// record where both exist.
    pub fn historical(election: Election, votes: Vec<Votes>, metrics: Vec<Metrics>, parameters: Parameters) -> Self {
        let algorithm = parameters.algorithm.as_ref().map_or(election.algorithm, |a| a.algorithm);
        let first_divisor = parameters
            .algorithm
            .as_ref()
            .and_then(|a| a.first_divisor())
            .unwrap_or(election.first_divisor);
        let election_threshold = parameters.threshold.unwrap_or(election.threshold);
        let district_seats = if parameters.district_seats.is_empty() {
            election.district_seat_total()
        } else {
            parameters.district_seats.values().sum()
        };
        let leveling_seats = parameters.leveling_seats.unwrap_or(election.leveling_seats);
        let area_factor = parameters.area_factor.unwrap_or(AreaFactor::NORWEGIAN.as_f64());

        Self {
            election,
            algorithm,
            first_divisor,
            election_threshold,
            district_threshold: 0.0,
            district_seats,
            leveling_seats,
            area_factor,
            votes,
            metrics,
            parameters,
        }
    }

    /// Check the numeric settings and resolve the method.
    pub fn settings(&self) -> Result<RunSettings, EngineError> {
        let first_divisor = if self.algorithm.uses_first_divisor() {
            FirstDivisor::from_f64(self.first_divisor)?
        } else {
            FirstDivisor::PLAIN
        };
        Ok(RunSettings {
            algorithm: self.algorithm,
            method: self.algorithm.method(first_divisor),
            levelling_divisor: first_divisor,
            election_threshold: Threshold::from_percent(self.election_threshold)?,
            district_threshold: Threshold::from_percent(self.district_threshold)?,
            district_seats: self.district_seats,
            leveling_seats: self.leveling_seats,
            area_factor: AreaFactor::new(self.area_factor)?,
            seat_law: SeatLaw::for_year(self.election.year),
        })
    }

    /// Memo key for this computation: year, algorithm and the settings.
    /// Inputs of the same year are assumed fixed, so votes are not hashed.
    pub fn run_key(&self) -> Result<String, EngineError> {
        let settings = self.settings()?;
        Ok(sv_io::hasher::run_key(self.election.year, self.algorithm, &settings)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use sv_core::entities::{AlgorithmSettings, District};

    fn election(year: u16) -> Election {
        Election {
            country_id: 1,
            election_type_id: 1,
            election_id: 1,
            year,
            algorithm: AlgorithmType::ModifiedSainteLague,
            first_divisor: 1.4,
            threshold: 4.0,
            seats: 5,
            leveling_seats: 1,
            districts: vec![
                District { name: "Oslo".parse().unwrap(), seats: 3, threshold: None },
                District { name: "Finnmark".parse().unwrap(), seats: 2, threshold: None },
            ],
        }
    }

    #[test]
    fn historical_from_election_record() {
        let p = ComputationPayload::historical(election(1997), vec![], vec![], Parameters::unloaded());
        assert_eq!(p.algorithm, AlgorithmType::ModifiedSainteLague);
        assert_eq!(p.district_seats, 5);
        assert_eq!(p.leveling_seats, 1);
        assert_eq!(p.district_threshold, 0.0);
        assert_eq!(p.area_factor, 1.8);
        let s = p.settings().unwrap();
        assert_eq!(s.seat_law, SeatLaw::Fixed);
        assert_eq!(s.levelling_divisor, FirstDivisor::NORWEGIAN);
    }

    #[test]
    fn parameter_set_overrides_election() {
        let mut params = Parameters::unloaded();
        params.election_year = Some(2021);
        params.algorithm = Some(AlgorithmSettings {
            algorithm: AlgorithmType::ModifiedSainteLague,
            parameters: BTreeMap::from([(AlgorithmSettings::FIRST_DIVISOR_KEY.to_string(), 1.2)]),
        });
        params.threshold = Some(3.0);
        params.leveling_seats = Some(19);
        params.district_seats = BTreeMap::from([("Oslo".parse().unwrap(), 20), ("Finnmark".parse().unwrap(), 4)]);
        let p = ComputationPayload::historical(election(2021), vec![], vec![], params);
        assert_eq!(p.first_divisor, 1.2);
        assert_eq!(p.election_threshold, 3.0);
        assert_eq!(p.leveling_seats, 19);
        assert_eq!(p.district_seats, 24);
        assert_eq!(p.settings().unwrap().seat_law, SeatLaw::AreaFormula);
    }

    #[test]
    fn out_of_domain_settings_are_invalid_input() {
        let mut p = ComputationPayload::historical(election(2021), vec![], vec![], Parameters::unloaded());
        p.first_divisor = 0.5;
        assert!(matches!(p.settings(), Err(EngineError::InvalidInput(_))));

        // Ignored when the algorithm has no first divisor.
        p.algorithm = AlgorithmType::DHondt;
        assert_eq!(p.settings().unwrap().method, Method::DHondt);

        p.election_threshold = 120.0;
        assert!(matches!(p.settings(), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn run_key_tracks_settings() {
        let p = ComputationPayload::historical(election(2021), vec![], vec![], Parameters::unloaded());
        let mut q = p.clone();
        assert_eq!(p.run_key().unwrap(), q.run_key().unwrap());
        q.leveling_seats = 0;
        assert_ne!(p.run_key().unwrap(), q.run_key().unwrap());
    }
}
