//! AGGREGATE: every district under every requested method, summed per party.
//!
//! Methods run in canonical order (hare, droop, imperiali, dhondt, saintelague),
//! districts in input order. A single tie RNG is threaded through that walk so a
//! seeded national run replays exactly. Parties missing from a district add 0;
//! `DISPUTED` seats from all districts merge under the one reserved id.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use pr_core::{AllocError, AllocOptions, DistrictConfig, Method, NationalTally, SeatMap, TieRng};

use crate::allocate::{allocate_with_rng, DistrictAllocation};

/// Position (and label, if any) of a district in the caller's slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRef {
    pub index: usize,
    pub name: Option<String>,
}

impl fmt::Display for DistrictRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "#{} ({name})", self.index),
            None => write!(f, "#{}", self.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("district {district}, method {method}: {source}")]
    District {
        district: DistrictRef,
        method: Method,
        #[source]
        source: AllocError,
    },
}

/// One district's results across methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub configured_seats: u32,
    pub results: BTreeMap<Method, DistrictAllocation>,
}

/// National totals plus the per-district detail they were summed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationReport {
    pub national: NationalTally,
    /// Seats handed out per method (the disputed sink included).
    pub total_seats: BTreeMap<Method, u64>,
    pub districts: Vec<DistrictReport>,
}

/// Sum per-district seat maps into national totals for each method.
pub fn aggregate(
    districts: &[DistrictConfig],
    methods: &[Method],
    options: &AllocOptions,
) -> Result<NationalTally, AggregateError> {
    run_nation(districts, methods, options).map(|r| r.national)
}

#[tracing::instrument(skip_all, fields(districts = districts.len(), methods = methods.len()))]
pub fn run_nation(
    districts: &[DistrictConfig],
    methods: &[Method],
    options: &AllocOptions,
) -> Result<NationReport, AggregateError> {
    let methods: BTreeSet<Method> = methods.iter().copied().collect();

    let mut reports: Vec<DistrictReport> = districts
        .iter()
        .enumerate()
        .map(|(index, d)| DistrictReport {
            index,
            name: d.name.clone(),
            configured_seats: d.seats,
            results: BTreeMap::new(),
        })
        .collect();
    let mut national = NationalTally::new();
    let mut total_seats = BTreeMap::new();
    let mut rng: Option<TieRng> = None;

    for &method in &methods {
        let tally = national.entry(method).or_insert_with(SeatMap::new);
        let mut awarded = 0u64;

        for (index, district) in districts.iter().enumerate() {
            let out = allocate_with_rng(district, method, options, &mut rng).map_err(|source| {
                AggregateError::District {
                    district: DistrictRef {
                        index,
                        name: district.name.clone(),
                    },
                    method,
                    source,
                }
            })?;
            for (party, &seats) in &out.seats {
                let slot = tally.entry(party.clone()).or_insert(0);
                *slot = slot.saturating_add(seats);
            }
            awarded += out.total_seats as u64;
            reports[index].results.insert(method, out);
        }

        tracing::debug!(%method, awarded, "national tally complete");
        total_seats.insert(method, awarded);
    }

    Ok(NationReport {
        national,
        total_seats,
        districts: reports,
    })
}
