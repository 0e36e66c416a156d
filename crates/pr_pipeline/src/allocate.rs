//! ALLOCATE: one district, one method.
//!
//! validate → resolve rules (options → district → defaults) → barrier →
//! quota/divisor body → seat map. The caller's `DistrictConfig` is only
//! borrowed; every call builds its own candidate list.

use serde::Serialize;

use pr_algo::{apply_barrier, apportion};
use pr_core::{AllocError, AllocNote, AllocOptions, DistrictConfig, Method, SeatMap, TieBreak, TieRng};

/// Seat map plus the bookkeeping a report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictAllocation {
    pub seats: SeatMap,
    /// Sum of `seats`. Above the configured count only under `increase`.
    pub total_seats: u32,
    pub last_seat_tie: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<AllocNote>,
}

/// Allocate `district` under `method` and return the party → seats map.
pub fn allocate(
    district: &DistrictConfig,
    method: Method,
    options: &AllocOptions,
) -> Result<SeatMap, AllocError> {
    allocate_detailed(district, method, options).map(|d| d.seats)
}

/// Like [`allocate`], keeping the total, tie flag and notes.
///
/// A `random` tie-break draws from a fresh stream: seeded from
/// `options.tie_seed` when present, OS entropy otherwise.
pub fn allocate_detailed(
    district: &DistrictConfig,
    method: Method,
    options: &AllocOptions,
) -> Result<DistrictAllocation, AllocError> {
    let mut rng = None;
    allocate_with_rng(district, method, options, &mut rng)
}

/// Allocate with the district's own `method`.
pub fn allocate_configured(
    district: &DistrictConfig,
    options: &AllocOptions,
) -> Result<DistrictAllocation, AllocError> {
    let method = district
        .method
        .ok_or_else(|| AllocError::InvalidConfiguration("district does not name a method".into()))?;
    allocate_detailed(district, method, options)
}

/// Shared by single calls and the nation run. `rng` is created on first use
/// by a `random` tie-break and then reused, so one seed drives a whole run.
pub(crate) fn allocate_with_rng(
    district: &DistrictConfig,
    method: Method,
    options: &AllocOptions,
    rng: &mut Option<TieRng>,
) -> Result<DistrictAllocation, AllocError> {
    district.validate()?;
    let rules = options.resolve(district)?;

    let eligible = apply_barrier(&district.parties, rules.barrier);
    tracing::debug!(
        district = district.name.as_deref().unwrap_or(""),
        %method,
        seats = district.seats,
        eligible = eligible.len(),
        excluded = district.parties.len() - eligible.len(),
        "allocating"
    );

    let tie_rng = match rules.tie_break {
        TieBreak::Random => Some(rng.get_or_insert_with(|| TieRng::from_optional_seed(options.tie_seed))),
        _ => None,
    };
    let out = apportion(&eligible, district.seats, method, &rules, tie_rng);

    let total_seats = u32::try_from(out.awarded()).unwrap_or(u32::MAX);
    Ok(DistrictAllocation {
        seats: out.ledger.into_seat_map(&eligible),
        total_seats,
        last_seat_tie: out.last_seat_tie,
        notes: out.notes,
    })
}
