//! Highest-averages (divisor) apportionment: D'Hondt and Sainte-Laguë.
//!
//! Contract:
//! - Quotient of a party holding `n` seats is `v / d(n)`:
//!     * D'Hondt:      d(n) = n + 1
//!     * Sainte-Laguë: d(n) = 2n + 1
//! - Parties with 0 votes never contend.
//! - Each pass takes the group of contenders sharing the maximal quotient.
//!   The whole group is seated when it fits the remaining seats; otherwise the
//!   tie-break resolver settles the remaining seats and the loop ends.
//! - Pure integers; quotients are compared by cross-multiplication in u128.
//!
//! Determinism:
//! - Ordering inside a pass is quotient ↓, votes ↓, original index ↑.
//! - Random ties depend *only* on the provided `TieRng` stream.

use core::cmp::Ordering;

use pr_core::{AllocNote, TieBreak, TieRng};

use crate::ledger::{Apportionment, EligibleParty, SeatHolder, SeatLedger};
use crate::tie_break::{resolve_tie, TieCandidate};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DivisorKind {
    DHondt,
    SainteLague,
}

impl DivisorKind {
    #[inline]
    pub fn divisor(self, won: u32) -> u128 {
        match self {
            DivisorKind::DHondt => won as u128 + 1,
            DivisorKind::SainteLague => 2 * won as u128 + 1,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Contender {
    index: usize,
    votes: u64,
    original_index: usize,
    won: u32,
}

/// Compare v_a/d(s_a) with v_b/d(s_b) without division.
fn cmp_quotients(kind: DivisorKind, a: &Contender, b: &Contender) -> Ordering {
    let lhs = a.votes as u128 * kind.divisor(b.won);
    let rhs = b.votes as u128 * kind.divisor(a.won);
    lhs.cmp(&rhs)
}

pub fn apportion_by_divisor(
    parties: &[EligibleParty],
    seats: u32,
    kind: DivisorKind,
    tie_break: TieBreak,
    mut rng: Option<&mut TieRng>,
) -> Apportionment {
    let mut contenders: Vec<Contender> = parties
        .iter()
        .filter(|p| p.votes > 0)
        .map(|p| Contender {
            index: p.current_index,
            votes: p.votes,
            original_index: p.original_index,
            won: 0,
        })
        .collect();
    if contenders.is_empty() {
        return Apportionment::empty(parties.len(), seats, AllocNote::NoVotes);
    }

    let mut ledger = SeatLedger::new(parties.len());
    let mut notes = Vec::new();
    let mut last_seat_tie = false;
    let mut awarded = 0u32;

    while awarded < seats {
        if contenders.is_empty() {
            tracing::warn!(awarded, target = seats, "divisor loop ran out of contenders");
            notes.push(AllocNote::DivisorExhausted {
                awarded,
                target: seats,
            });
            break;
        }

        contenders.sort_by(|a, b| {
            cmp_quotients(kind, b, a)
                .then_with(|| b.votes.cmp(&a.votes))
                .then_with(|| a.original_index.cmp(&b.original_index))
        });
        let group_len = contenders
            .iter()
            .take_while(|c| cmp_quotients(kind, c, &contenders[0]) == Ordering::Equal)
            .count();
        let remaining = seats - awarded;

        if group_len as u64 <= remaining as u64 {
            for c in &mut contenders[..group_len] {
                ledger.award(SeatHolder::Party(c.index), 1);
                c.won += 1;
            }
            awarded += group_len as u32;
        } else {
            let candidates: Vec<TieCandidate> = contenders[..group_len]
                .iter()
                .map(|c| TieCandidate {
                    index: c.index,
                    votes: c.votes,
                    original_index: c.original_index,
                })
                .collect();
            resolve_tie(&candidates, remaining, tie_break, rng.as_deref_mut()).apply(&mut ledger);
            last_seat_tie = true;
            break;
        }
    }

    Apportionment {
        ledger,
        target_seats: seats,
        last_seat_tie,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties(votes: &[u64]) -> Vec<EligibleParty> {
        votes
            .iter()
            .enumerate()
            .map(|(i, &v)| EligibleParty {
                party_id: format!("P{i}").parse().unwrap(),
                votes: v,
                original_index: i,
                current_index: i,
            })
            .collect()
    }

    fn seats(votes: &[u64], n: u32, kind: DivisorKind, rule: TieBreak) -> (Vec<u32>, u32) {
        let a = apportion_by_divisor(&parties(votes), n, kind, rule, None);
        (a.ledger.party_seats().to_vec(), a.ledger.disputed())
    }

    #[test]
    fn dhondt_basic() {
        // Quotients: 100, 80, 50, 40, 33.3, 30, 26.7 → A,B,A,B,A
        let (s, _) = seats(&[100, 80, 30], 5, DivisorKind::DHondt, TieBreak::LargestVotes);
        assert_eq!(s, vec![3, 2, 0]);
    }

    #[test]
    fn sainte_lague_favours_smaller_parties() {
        // Quotients: 100, 80, 33.3, 30, 26.7 → A,B,A,C,B
        let (s, _) = seats(&[100, 80, 30], 5, DivisorKind::SainteLague, TieBreak::LargestVotes);
        assert_eq!(s, vec![2, 2, 1]);
    }

    #[test]
    fn tied_group_seated_whole_when_it_fits() {
        let a = apportion_by_divisor(&parties(&[60, 60, 10]), 2, DivisorKind::DHondt, TieBreak::LargestVotes, None);
        assert_eq!(a.ledger.party_seats(), &[1, 1, 0]);
        assert!(!a.last_seat_tie);
    }

    #[test]
    fn last_seat_tie_goes_to_resolver() {
        let (s, d) = seats(&[100, 100], 1, DivisorKind::DHondt, TieBreak::PartyIndex);
        assert_eq!((s, d), (vec![1, 0], 0));

        let (s, d) = seats(&[100, 100], 1, DivisorKind::DHondt, TieBreak::Disputed);
        assert_eq!((s, d), (vec![0, 0], 1));

        let (s, d) = seats(&[100, 100], 3, DivisorKind::SainteLague, TieBreak::Disputed);
        assert_eq!((s, d), (vec![1, 1], 1));
    }

    #[test]
    fn zero_vote_parties_never_win() {
        let (s, _) = seats(&[0, 5, 0], 4, DivisorKind::DHondt, TieBreak::LeastVotes);
        assert_eq!(s, vec![0, 4, 0]);
    }

    #[test]
    fn all_zero_votes() {
        let a = apportion_by_divisor(&parties(&[0, 0]), 3, DivisorKind::SainteLague, TieBreak::LargestVotes, None);
        assert_eq!(a.awarded(), 0);
        assert_eq!(a.notes, vec![AllocNote::NoVotes]);
    }

    #[test]
    fn seeded_random_ties_replay() {
        let ps = parties(&[7, 7, 7, 7]);
        let mut a = TieRng::from_seed_u64(5);
        let mut b = TieRng::from_seed_u64(5);
        let x = apportion_by_divisor(&ps, 2, DivisorKind::DHondt, TieBreak::Random, Some(&mut a));
        let y = apportion_by_divisor(&ps, 2, DivisorKind::DHondt, TieBreak::Random, Some(&mut b));
        assert_eq!(x, y);
        assert_eq!(x.awarded(), 2);
        assert!(x.last_seat_tie);
    }
}
