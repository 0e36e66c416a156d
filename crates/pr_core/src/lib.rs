//! pr_core: Core types, rule domains, district configuration and tie RNG.
//!
//! This crate is **I/O-free**. It defines the stable types shared across the
//! workspace (`pr_algo`, `pr_pipeline`, `pr_io`, `pr_cli`).
//!
//! - Party tokens: `PartyId` (with the reserved `DISPUTED` sink id)
//! - Rule domains: `Method`, `TieBreak`, `OverAllocRule`
//! - Inputs: `DistrictConfig`, `PartyVotes`, `AllocOptions`
//! - Outputs: `SeatMap`, `NationalTally`, `AllocNote`
//! - Seedable RNG (ChaCha20) for **ties only**
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod entities;
pub mod errors;
pub mod ids;
pub mod rng;
pub mod variables;

pub use entities::{
    AllocNote, AllocOptions, DistrictConfig, EffectiveRules, NationalTally, PartyVotes, SeatMap,
};
pub use errors::AllocError;
pub use ids::{IdError, PartyId, DISPUTED_PARTY_ID};
pub use rng::TieRng;
pub use variables::{Method, OverAllocRule, TieBreak};
