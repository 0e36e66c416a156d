//! Working candidate list and seat ledger for one allocation call.
//!
//! The ledger is indexed by `current_index` (position in the post-barrier list).
//! Disputed seats live beside it as a tagged holder rather than as an extra
//! pseudo-party appended to the list.

use pr_core::{AllocNote, PartyId, SeatMap};

/// A party that survived the barrier. Built fresh for every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EligibleParty {
    pub party_id: PartyId,
    pub votes: u64,
    /// Position in the caller's party list; final tie-break key.
    pub original_index: usize,
    /// Position in the filtered list; index into `SeatLedger`.
    pub current_index: usize,
}

/// Who receives a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatHolder {
    Party(usize),
    Disputed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeatLedger {
    seats: Vec<u32>,
    disputed: u32,
}

impl SeatLedger {
    pub fn new(parties: usize) -> Self {
        Self {
            seats: vec![0; parties],
            disputed: 0,
        }
    }

    /// Start from precomputed per-party seats (quota base seats).
    pub fn from_seats(seats: Vec<u32>) -> Self {
        Self { seats, disputed: 0 }
    }

    pub fn award(&mut self, holder: SeatHolder, n: u32) {
        match holder {
            SeatHolder::Party(i) => {
                if let Some(s) = self.seats.get_mut(i) {
                    *s = s.saturating_add(n);
                }
            }
            SeatHolder::Disputed => self.disputed = self.disputed.saturating_add(n),
        }
    }

    #[inline]
    pub fn seats_of(&self, index: usize) -> u32 {
        self.seats.get(index).copied().unwrap_or(0)
    }

    #[inline]
    pub fn disputed(&self) -> u32 {
        self.disputed
    }

    pub fn party_seats(&self) -> &[u32] {
        &self.seats
    }

    /// All seats held, the sink included.
    pub fn total(&self) -> u64 {
        self.seats.iter().map(|&s| s as u64).sum::<u64>() + self.disputed as u64
    }

    /// Map seats back to party ids. Every eligible party appears; `DISPUTED`
    /// only when the sink holds seats.
    pub fn into_seat_map(self, parties: &[EligibleParty]) -> SeatMap {
        let mut map: SeatMap = parties
            .iter()
            .map(|p| (p.party_id.clone(), self.seats_of(p.current_index)))
            .collect();
        if self.disputed > 0 {
            map.insert(PartyId::disputed(), self.disputed);
        }
        map
    }
}

/// Outcome of one quota or divisor body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Apportionment {
    pub ledger: SeatLedger,
    /// Seats the body aimed for: the configured count, or the enlarged count
    /// after `increase`.
    pub target_seats: u32,
    /// True iff a tie resolution decided at least one seat.
    pub last_seat_tie: bool,
    pub notes: Vec<AllocNote>,
}

impl Apportionment {
    pub(crate) fn empty(parties: usize, target_seats: u32, note: AllocNote) -> Self {
        Self {
            ledger: SeatLedger::new(parties),
            target_seats,
            last_seat_tie: false,
            notes: vec![note],
        }
    }

    pub fn awarded(&self) -> u64 {
        self.ledger.total()
    }
}
