// crates/pr_algo/src/lib.rs
#![forbid(unsafe_code)]

//! District allocator internals. Everything here is pure: inputs are borrowed,
//! results are fresh values, and the only randomness is the optional `TieRng`.

pub mod barrier;
pub mod divisor;
pub mod ledger;
pub mod quota;
pub mod tie_break;

pub use barrier::{apply_barrier, barrier_fraction, eligible_total};
pub use divisor::{apportion_by_divisor, DivisorKind};
pub use ledger::{Apportionment, EligibleParty, SeatHolder, SeatLedger};
pub use quota::{apportion_by_quota, Quota, QuotaKind, MAX_QUOTA_ADJUSTMENTS};
pub use tie_break::{resolve_tie, TieAward, TieCandidate};

use pr_core::{Method, TieRng};

/// Method family with its parameter.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Family {
    Quota(QuotaKind),
    Divisor(DivisorKind),
}

impl From<Method> for Family {
    fn from(m: Method) -> Self {
        match m {
            Method::Hare => Family::Quota(QuotaKind::Hare),
            Method::Droop => Family::Quota(QuotaKind::Droop),
            Method::Imperiali => Family::Quota(QuotaKind::Imperiali),
            Method::DHondt => Family::Divisor(DivisorKind::DHondt),
            Method::SainteLague => Family::Divisor(DivisorKind::SainteLague),
        }
    }
}

/// Run the body for `method` over an already filtered party list.
/// The over-allocation rule only affects quota methods.
pub fn apportion(
    parties: &[EligibleParty],
    seats: u32,
    method: Method,
    rules: &pr_core::EffectiveRules,
    rng: Option<&mut TieRng>,
) -> Apportionment {
    match Family::from(method) {
        Family::Quota(kind) => {
            apportion_by_quota(parties, seats, kind, rules.over_alloc_rule, rules.tie_break, rng)
        }
        Family::Divisor(kind) => apportion_by_divisor(parties, seats, kind, rules.tie_break, rng),
    }
}
