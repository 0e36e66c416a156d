//! Tie-break resolver: settle `seats` seats among a tied group larger than `seats`.
//!
//! Rules:
//! - `largestVotes`: votes ↓, then original index ↑
//! - `leastVotes`:   votes ↑, then original index ↑
//! - `partyIndex`:   original index ↑
//! - `random`:       Fisher–Yates over the group with the provided `TieRng`
//! - `disputed`:     no winners; every seat goes to the disputed sink
//!
//! Determinism: only `random` consumes randomness, and only from `rng`.

use core::cmp::Ordering;

use pr_core::{TieBreak, TieRng};

use crate::ledger::{SeatHolder, SeatLedger};

/// One member of a tied group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TieCandidate {
    /// `current_index` of the party.
    pub index: usize,
    pub votes: u64,
    pub original_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TieAward {
    /// Current indices of the winners, one seat each.
    Winners(Vec<usize>),
    /// Seats routed to the disputed sink.
    Disputed(u32),
}

impl TieAward {
    pub fn apply(&self, ledger: &mut SeatLedger) {
        match self {
            TieAward::Winners(ix) => ix.iter().for_each(|&i| ledger.award(SeatHolder::Party(i), 1)),
            TieAward::Disputed(n) => ledger.award(SeatHolder::Disputed, *n),
        }
    }
}

pub fn resolve_tie(
    candidates: &[TieCandidate],
    seats: u32,
    rule: TieBreak,
    rng: Option<&mut TieRng>,
) -> TieAward {
    if seats == 0 || candidates.is_empty() {
        return TieAward::Winners(Vec::new());
    }
    if rule == TieBreak::Disputed {
        tracing::debug!(seats, group = candidates.len(), "tie routed to disputed sink");
        return TieAward::Disputed(seats);
    }

    let mut order = candidates.to_vec();
    match rule {
        TieBreak::LargestVotes => order.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| by_index(a, b))),
        TieBreak::LeastVotes => order.sort_by(|a, b| a.votes.cmp(&b.votes).then_with(|| by_index(a, b))),
        TieBreak::PartyIndex => order.sort_by(by_index),
        TieBreak::Random => match rng {
            Some(rng) => rng.shuffle_in_place(&mut order),
            None => {
                tracing::warn!("random tie-break without an RNG; using party index order");
                order.sort_by(by_index);
            }
        },
        TieBreak::Disputed => {}
    }

    let winners: Vec<usize> = order.iter().take(seats as usize).map(|c| c.index).collect();
    tracing::debug!(?rule, seats, group = candidates.len(), ?winners, "tie resolved");
    TieAward::Winners(winners)
}

fn by_index(a: &TieCandidate, b: &TieCandidate) -> Ordering {
    a.original_index.cmp(&b.original_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(index: usize, votes: u64) -> TieCandidate {
        TieCandidate {
            index,
            votes,
            original_index: index,
        }
    }

    #[test]
    fn equal_votes_fall_back_to_index() {
        let group = [cand(1, 500), cand(0, 500)];
        for rule in [TieBreak::LargestVotes, TieBreak::LeastVotes, TieBreak::PartyIndex] {
            assert_eq!(resolve_tie(&group, 1, rule, None), TieAward::Winners(vec![0]));
        }
    }

    #[test]
    fn vote_rules_pick_by_votes() {
        let group = [cand(0, 10), cand(1, 30), cand(2, 20)];
        assert_eq!(
            resolve_tie(&group, 2, TieBreak::LargestVotes, None),
            TieAward::Winners(vec![1, 2])
        );
        assert_eq!(
            resolve_tie(&group, 1, TieBreak::LeastVotes, None),
            TieAward::Winners(vec![0])
        );
    }

    #[test]
    fn disputed_takes_all_seats() {
        let group = [cand(0, 5), cand(1, 5), cand(2, 5)];
        let award = resolve_tie(&group, 2, TieBreak::Disputed, None);
        assert_eq!(award, TieAward::Disputed(2));

        let mut ledger = SeatLedger::new(3);
        award.apply(&mut ledger);
        assert_eq!(ledger.disputed(), 2);
        assert_eq!(ledger.total(), 2);
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let group: Vec<_> = (0..6).map(|i| cand(i, 7)).collect();
        let mut a = TieRng::from_seed_u64(99);
        let mut b = TieRng::from_seed_u64(99);
        let x = resolve_tie(&group, 3, TieBreak::Random, Some(&mut a));
        let y = resolve_tie(&group, 3, TieBreak::Random, Some(&mut b));
        assert_eq!(x, y);
        match x {
            TieAward::Winners(w) => {
                assert_eq!(w.len(), 3);
                assert!(w.iter().all(|&i| i < 6));
            }
            TieAward::Disputed(_) => panic!("random never disputes"),
        }
    }

    #[test]
    fn random_without_rng_uses_index_order() {
        let group = [cand(2, 1), cand(0, 1), cand(1, 1)];
        assert_eq!(
            resolve_tie(&group, 2, TieBreak::Random, None),
            TieAward::Winners(vec![0, 1])
        );
    }
}
