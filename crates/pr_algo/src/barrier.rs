//! Electoral barrier (threshold) on natural vote totals.
//!
//! Keeps parties with `votes >= barrier * total`. A zero total or a zero
//! barrier keeps everyone. Survivors are re-indexed `0..k`; the input
//! position is preserved as `original_index`.
//!
//! The comparison is exact: the barrier is read as the decimal fraction it was
//! written as (`0.07` is `7/100`) and compared in u128, so a party holding
//! exactly the barrier share survives.

use pr_core::PartyVotes;

use crate::ledger::EligibleParty;

/// Decimal places kept from the barrier; further digits are truncated.
pub const MAX_BARRIER_DIGITS: usize = 12;

pub fn apply_barrier(parties: &[PartyVotes], barrier: f64) -> Vec<EligibleParty> {
    let total: u128 = parties.iter().map(|p| p.votes as u128).sum();
    let vacuous = total == 0 || barrier <= 0.0;
    let (num, den) = barrier_fraction(barrier);
    // Saturation only happens when the cutoff exceeds any u64 vote count.
    let cutoff = num.saturating_mul(total);

    parties
        .iter()
        .enumerate()
        .filter(|(_, p)| vacuous || p.votes as u128 * den >= cutoff)
        .enumerate()
        .map(|(current_index, (original_index, p))| EligibleParty {
            party_id: p.party_id.clone(),
            votes: p.votes,
            original_index,
            current_index,
        })
        .collect()
}

/// `barrier` as `num / 10^k` from its shortest round-trip decimal form.
/// Non-finite input reads as 0.
pub fn barrier_fraction(barrier: f64) -> (u128, u128) {
    if !barrier.is_finite() {
        return (0, 1);
    }
    let text = format!("{}", barrier.abs());
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = &frac[..frac.len().min(MAX_BARRIER_DIGITS)];
    let num = int
        .bytes()
        .chain(frac.bytes())
        .filter(u8::is_ascii_digit)
        .fold(0u128, |acc, d| acc.saturating_mul(10).saturating_add((d - b'0') as u128));
    (num, 10u128.pow(frac.len() as u32))
}

/// Post-barrier vote total `T`.
pub fn eligible_total(parties: &[EligibleParty]) -> u128 {
    parties.iter().map(|p| p.votes as u128).sum()
}
