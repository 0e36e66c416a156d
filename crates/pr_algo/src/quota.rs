//! Largest-remainder apportionment with a selectable quota
//! (Hare, Droop, Imperiali).
//!
//! Contract:
//! - Thresholding happens upstream; `parties` is the post-barrier list and
//!   `T` is its vote total.
//! - Quota kinds (exact rationals):
//!     * Hare:      T / s
//!     * Droop:     floor(T / (s + 1)) + 1
//!     * Imperiali: T / (s + 2)
//! - Base seats are floor(v / q). If they exceed `s`, the over-allocation rule
//!   corrects them (increase / adjust-quota / remove-large / remove-small).
//! - Leftover seats go by remainder groups (remainder ↓, votes ↓, original index ↑).
//!   A group that does not fit is settled by the tie-break resolver and
//!   distribution stops.
//!
//! Determinism:
//! - Integer-only; remainders share the denominator `q.num` so grouping is by
//!   exact equality. Randomness only via the tie resolver.

use pr_core::{AllocNote, OverAllocRule, TieBreak, TieRng};

use crate::barrier::eligible_total;
use crate::ledger::{Apportionment, EligibleParty, SeatHolder, SeatLedger};
use crate::tie_break::{resolve_tie, TieCandidate};

/// Iteration cap for `adjust-quota`.
pub const MAX_QUOTA_ADJUSTMENTS: u32 = 20_000;

/// Coarse and fine multiplicative steps for `adjust-quota`.
const COARSE_STEP: (u128, u128) = (101, 100);
const FINE_STEP: (u128, u128) = (10_001, 10_000);

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum QuotaKind {
    Hare,
    Droop,
    Imperiali,
}

/// Positive rational quota `num / den`, reduced, with `den` kept below 2^64 so
/// `votes * den` always fits in u128.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Quota {
    num: u128,
    den: u128,
}

impl Quota {
    /// `None` when the ratio is zero or cannot be represented.
    pub fn new(num: u128, den: u128) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        let g = gcd(num, den);
        let (mut num, mut den) = (num / g, den / g);
        while den > u64::MAX as u128 {
            num >>= 1;
            den >>= 1;
        }
        (num > 0 && den > 0).then_some(Self { num, den })
    }

    pub fn compute(kind: QuotaKind, total: u128, seats: u32) -> Option<Self> {
        let s = seats as u128;
        match kind {
            QuotaKind::Hare => Self::new(total, s),
            QuotaKind::Droop => Self::new(total / (s + 1) + 1, 1),
            QuotaKind::Imperiali => Self::new(total, s + 2),
        }
    }

    #[inline]
    pub fn parts(self) -> (u128, u128) {
        (self.num, self.den)
    }

    /// floor(v / q)
    #[inline]
    pub fn floor_seats(self, votes: u64) -> u128 {
        (votes as u128 * self.den) / self.num
    }

    /// Numerator of `v/q - base` over the common denominator `num`.
    /// Saturates at 0 when `base` exceeds `v/q`.
    #[inline]
    pub fn remainder(self, votes: u64, base: u32) -> u128 {
        (votes as u128 * self.den).saturating_sub(base as u128 * self.num)
    }

    /// `q * step_num / step_den`, halving both terms if the product would overflow.
    fn scaled(self, (step_num, step_den): (u128, u128)) -> Option<Self> {
        let (mut num, mut den) = (self.num, self.den);
        loop {
            match (num.checked_mul(step_num), den.checked_mul(step_den)) {
                (Some(n), Some(d)) => return Self::new(n, d),
                _ => {
                    num >>= 1;
                    den >>= 1;
                    if num == 0 || den == 0 {
                        return None;
                    }
                }
            }
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn base_seats(parties: &[EligibleParty], q: Quota) -> Vec<u32> {
    parties
        .iter()
        .map(|p| u32::try_from(q.floor_seats(p.votes)).unwrap_or(u32::MAX))
        .collect()
}

fn sum_seats(seats: &[u32]) -> u64 {
    seats.iter().map(|&s| s as u64).sum()
}

pub fn apportion_by_quota(
    parties: &[EligibleParty],
    seats: u32,
    kind: QuotaKind,
    over_alloc: OverAllocRule,
    tie_break: TieBreak,
    rng: Option<&mut TieRng>,
) -> Apportionment {
    let total = eligible_total(parties);
    if total == 0 {
        return Apportionment::empty(parties.len(), seats, AllocNote::NoVotes);
    }
    let Some(mut quota) = Quota::compute(kind, total, seats) else {
        tracing::warn!(?kind, %total, seats, "degenerate quota; awarding no seats");
        return Apportionment::empty(parties.len(), seats, AllocNote::DegenerateQuota);
    };

    let mut notes = Vec::new();
    let mut target = seats;
    let mut base = base_seats(parties, quota);
    let mut allocated = sum_seats(&base);

    if allocated > target as u64 {
        let mut rule = over_alloc;
        match rule {
            OverAllocRule::Increase => {
                let enlarged = u32::try_from(allocated).unwrap_or(u32::MAX);
                tracing::debug!(configured = seats, awarded = enlarged, "over-allocation accepted");
                notes.push(AllocNote::SeatsIncreased {
                    configured: seats,
                    awarded: enlarged,
                });
                target = enlarged;
            }
            OverAllocRule::AdjustQuota => {
                let (adjusted, iterations) = adjust_quota(parties, quota, target);
                quota = adjusted;
                base = base_seats(parties, quota);
                allocated = sum_seats(&base);
                if allocated > target as u64 {
                    tracing::debug!(iterations, "quota adjustment gave up; removing from largest");
                    notes.push(AllocNote::QuotaAdjustFallback { iterations });
                    rule = OverAllocRule::RemoveLarge;
                }
            }
            OverAllocRule::RemoveLarge | OverAllocRule::RemoveSmall => {}
        }
        if matches!(rule, OverAllocRule::RemoveLarge | OverAllocRule::RemoveSmall) {
            allocated = strip_seats(parties, &mut base, target, rule == OverAllocRule::RemoveLarge);
        }
    }

    let mut ledger = SeatLedger::from_seats(base);
    let remaining = (target as u64).saturating_sub(allocated) as u32;
    let last_seat_tie = distribute_remainders(parties, quota, remaining, &mut ledger, tie_break, rng);

    Apportionment {
        ledger,
        target_seats: target,
        last_seat_tie,
        notes,
    }
}

/// Grow the quota until base seats fit `target` or the cap is reached.
/// Returns the last valid quota and the number of steps taken.
fn adjust_quota(parties: &[EligibleParty], original: Quota, target: u32) -> (Quota, u32) {
    let mut quota = original;
    let mut allocated = sum_seats(&base_seats(parties, quota));
    let mut iterations = 0u32;

    while allocated > target as u64 && iterations < MAX_QUOTA_ADJUSTMENTS {
        let overshoot = allocated - target as u64;
        let step = if overshoot * 10 > parties.len() as u64 {
            COARSE_STEP
        } else {
            FINE_STEP
        };
        let Some(next) = quota.scaled(step) else {
            break;
        };
        quota = next;
        allocated = sum_seats(&base_seats(parties, quota));
        iterations += 1;
    }
    (quota, iterations)
}

/// `remove-large` / `remove-small`: in passes, take one seat from each holder
/// in order (votes ↓ or ↑, then original index ↑) until the total fits.
fn strip_seats(parties: &[EligibleParty], base: &mut [u32], target: u32, largest_first: bool) -> u64 {
    let mut allocated = sum_seats(base);
    while allocated > target as u64 {
        let mut holders: Vec<&EligibleParty> = parties
            .iter()
            .filter(|p| base[p.current_index] > 0)
            .collect();
        if holders.is_empty() {
            break;
        }
        holders.sort_by(|a, b| {
            let by_votes = if largest_first {
                b.votes.cmp(&a.votes)
            } else {
                a.votes.cmp(&b.votes)
            };
            by_votes.then_with(|| a.original_index.cmp(&b.original_index))
        });
        for p in holders {
            base[p.current_index] -= 1;
            allocated -= 1;
            if allocated <= target as u64 {
                break;
            }
        }
    }
    allocated
}

/// Award `remaining` seats by remainder groups. Returns true if a tie decided seats.
///
/// Zero-vote parties never take part: a zero remainder from zero votes never
/// wins a leftover seat, even when it ties a party that has votes. If a full pass over the
/// groups leaves seats (possible with a large Droop quota), the ranking of the
/// parties with votes is walked again.
fn distribute_remainders(
    parties: &[EligibleParty],
    quota: Quota,
    mut remaining: u32,
    ledger: &mut SeatLedger,
    tie_break: TieBreak,
    mut rng: Option<&mut TieRng>,
) -> bool {
    let mut ranking: Vec<(u128, &EligibleParty)> = parties
        .iter()
        .filter(|p| p.votes > 0)
        .map(|p| (quota.remainder(p.votes, ledger.seats_of(p.current_index)), p))
        .collect();
    if ranking.is_empty() {
        return false;
    }
    ranking.sort_by(|(ra, a), (rb, b)| {
        rb.cmp(ra)
            .then_with(|| b.votes.cmp(&a.votes))
            .then_with(|| a.original_index.cmp(&b.original_index))
    });

    while remaining > 0 {
        for group in ranking.chunk_by(|(ra, _), (rb, _)| ra == rb) {
            if remaining == 0 {
                return false;
            }
            if group.len() as u64 <= remaining as u64 {
                for (_, p) in group {
                    ledger.award(SeatHolder::Party(p.current_index), 1);
                }
                remaining -= group.len() as u32;
            } else {
                let candidates: Vec<TieCandidate> = group
                    .iter()
                    .map(|(_, p)| TieCandidate {
                        index: p.current_index,
                        votes: p.votes,
                        original_index: p.original_index,
                    })
                    .collect();
                resolve_tie(&candidates, remaining, tie_break, rng.as_deref_mut()).apply(ledger);
                return true;
            }
        }
    }
    false
}
