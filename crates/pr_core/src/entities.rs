//! District configuration (input), allocation options, and seat maps (output).
//!
//! Wire shape follows the collaborator's camelCase keys:
//! `{ "seats": 10, "parties": [{ "partyId": "A", "votes": 500 }], "barrier": 0.05,
//!    "tieBreak": "largestVotes", "overAllocRule": "remove-large", "method": "hare" }`.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::AllocError;
use crate::ids::PartyId;
use crate::variables::{Method, OverAllocRule, TieBreak};

/// Seats per party. Every eligible party appears (0 included); `DISPUTED`
/// appears only when seats were routed to the sink.
pub type SeatMap = BTreeMap<PartyId, u32>;

/// National totals: method → summed seat map.
pub type NationalTally = BTreeMap<Method, SeatMap>;

/// One party's vote count in a district.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PartyVotes {
    pub party_id: PartyId,
    pub votes: u64,
}

impl PartyVotes {
    pub fn new(party_id: PartyId, votes: u64) -> Self {
        Self { party_id, votes }
    }
}

/// Input to one allocation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DistrictConfig {
    /// Human label; only used in diagnostics and reports.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    pub seats: u32,
    /// Order defines tie-break precedence (`partyIndex`).
    pub parties: Vec<PartyVotes>,
    /// Fraction of the district total in `[0, 1]`; `None` or 0 disables the barrier.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub barrier: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tie_break: TieBreak,
    #[cfg_attr(feature = "serde", serde(default))]
    pub over_alloc_rule: OverAllocRule,
    /// Preferred method for callers that allocate "as configured".
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub method: Option<Method>,
}

impl DistrictConfig {
    /// District with defaults: no barrier, `largestVotes`, `remove-large`.
    pub fn new(seats: u32, parties: Vec<PartyVotes>) -> Self {
        Self {
            name: None,
            seats,
            parties,
            barrier: None,
            tie_break: TieBreak::default(),
            over_alloc_rule: OverAllocRule::default(),
            method: None,
        }
    }

    /// Convenience builder from `(id, votes)` pairs.
    pub fn from_pairs<'a, I>(seats: u32, pairs: I) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let parties = pairs
            .into_iter()
            .map(|(id, votes)| {
                id.parse::<PartyId>()
                    .map(|party_id| PartyVotes::new(party_id, votes))
                    .map_err(|e| AllocError::invalid(format!("party id {id:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(seats, parties))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_barrier(mut self, barrier: f64) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn with_tie_break(mut self, rule: TieBreak) -> Self {
        self.tie_break = rule;
        self
    }

    pub fn with_over_alloc_rule(mut self, rule: OverAllocRule) -> Self {
        self.over_alloc_rule = rule;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Check the numeric and identity invariants of a district.
    pub fn validate(&self) -> Result<(), AllocError> {
        if self.seats == 0 {
            return Err(AllocError::invalid("seats must be greater than zero"));
        }
        if self.parties.is_empty() {
            return Err(AllocError::invalid("district has no parties"));
        }
        let mut seen = BTreeSet::new();
        for p in &self.parties {
            if p.party_id.is_disputed() {
                return Err(AllocError::invalid(format!(
                    "party id {} is reserved for disputed seats",
                    p.party_id
                )));
            }
            if !seen.insert(&p.party_id) {
                return Err(AllocError::invalid(format!("duplicate party id {}", p.party_id)));
            }
        }
        if let Some(b) = self.barrier {
            check_barrier(b)?;
        }
        Ok(())
    }
}

fn check_barrier(b: f64) -> Result<(), AllocError> {
    if !b.is_finite() || !(0.0..=1.0).contains(&b) {
        return Err(AllocError::invalid(format!("barrier {b} outside [0, 1]")));
    }
    Ok(())
}

/// Per-call overrides. Unset fields fall back to the district's own settings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct AllocOptions {
    pub over_alloc_rule: Option<OverAllocRule>,
    pub barrier: Option<f64>,
    pub tie_break: Option<TieBreak>,
    /// Seed for the `random` tie-break. Without it, draws come from OS entropy.
    pub tie_seed: Option<u64>,
}

impl AllocOptions {
    /// Resolve the rules that apply to `district` for one call.
    pub fn resolve(&self, district: &DistrictConfig) -> Result<EffectiveRules, AllocError> {
        let barrier = self.barrier.or(district.barrier).unwrap_or(0.0);
        check_barrier(barrier)?;
        Ok(EffectiveRules {
            barrier,
            tie_break: self.tie_break.unwrap_or(district.tie_break),
            over_alloc_rule: self.over_alloc_rule.unwrap_or(district.over_alloc_rule),
        })
    }
}

/// Rules in force for one allocation call after applying overrides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectiveRules {
    pub barrier: f64,
    pub tie_break: TieBreak,
    pub over_alloc_rule: OverAllocRule,
}

/// Recoverable conditions met during one allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AllocNote {
    /// Eligible parties hold no votes; every party receives 0 seats.
    NoVotes,
    /// The quota evaluated to zero or could not be represented.
    DegenerateQuota,
    /// `increase` accepted more seats than configured.
    SeatsIncreased { configured: u32, awarded: u32 },
    /// `adjust-quota` gave up and `remove-large` finished the correction.
    QuotaAdjustFallback { iterations: u32 },
    /// Divisor loop ran out of contenders before all seats were awarded.
    DivisorExhausted { awarded: u32, target: u32 },
}
