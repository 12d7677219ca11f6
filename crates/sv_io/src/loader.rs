//! Loader: read a local election bundle (elections, votes, metrics, parameter
//! sets for any number of years), check its shape and hand typed records to the
//! pipeline. No network I/O.

#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sv_core::entities::{Election, Metrics, Parameters, Votes};

use crate::{IoError, IoResult};

/// Every record the engine can be fed, across years.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectionBundle {
    pub elections: Vec<Election>,
    pub votes: Vec<Votes>,
    pub metrics: Vec<Metrics>,
    pub parameters: Vec<Parameters>,
}

impl ElectionBundle {
    /// Election years, newest first.
    pub fn years(&self) -> Vec<u16> {
        let mut ys: Vec<u16> = self.elections.iter().map(|e| e.year).collect();
        ys.sort_unstable_by(|a, b| b.cmp(a));
        ys
    }

    pub fn election(&self, year: u16) -> Option<&Election> {
        self.elections.iter().find(|e| e.year == year)
    }

    pub fn votes_for(&self, year: u16) -> Vec<Votes> {
        self.votes.iter().filter(|v| v.election_year == year).cloned().collect()
    }

    pub fn metrics_for(&self, year: u16) -> Vec<Metrics> {
        self.metrics.iter().filter(|m| m.election_year == year).cloned().collect()
    }

    /// The parameter set of `year`, or `Parameters::unloaded()`.
    pub fn parameters_for(&self, year: u16) -> Parameters {
        self.parameters
            .iter()
            .find(|p| p.election_year == Some(year))
            .cloned()
            .unwrap_or_else(Parameters::unloaded)
    }

    /// Shape checks that serde cannot express.
    pub fn check(&self) -> IoResult<()> {
        let mut years = BTreeSet::new();
        for e in &self.elections {
            if !years.insert(e.year) {
                return Err(IoError::Invalid(format!("election year {} appears twice", e.year)));
            }
        }
        let mut param_years = BTreeSet::new();
        for p in self.parameters.iter().filter_map(|p| p.election_year) {
            if !param_years.insert(p) {
                return Err(IoError::Invalid(format!("parameter set for {p} appears twice")));
            }
        }
        Ok(())
    }
}

/// Parse a bundle from JSON text.
pub fn parse_bundle(text: &str) -> IoResult<ElectionBundle> {
    let bundle: ElectionBundle = serde_json::from_str(text)?;
    bundle.check()?;
    Ok(bundle)
}

/// Read and parse a bundle file.
pub fn load_bundle(path: &Path) -> IoResult<ElectionBundle> {
    let text = fs::read_to_string(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let bundle = parse_bundle(&text)?;
    tracing::info!(
        path = %path.display(),
        elections = bundle.elections.len(),
        votes = bundle.votes.len(),
        metrics = bundle.metrics.len(),
        "bundle loaded"
    );
    Ok(bundle)
}
