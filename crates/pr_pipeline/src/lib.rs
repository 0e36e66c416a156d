//! pr_pipeline: public allocation surface.
//!
//! - [`allocate`] / [`allocate_detailed`] / [`allocate_configured`]: one district, one method.
//! - [`aggregate`] / [`run_nation`]: every district under every requested method.
//!
//! This crate stays I/O-free; loading and writing live in `pr_io`, math in `pr_algo`.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod allocate;

pub use aggregate::{aggregate, run_nation, AggregateError, DistrictRef, DistrictReport, NationReport};
pub use allocate::{allocate, allocate_configured, allocate_detailed, DistrictAllocation};

pub use pr_core::{
    AllocError, AllocNote, AllocOptions, DistrictConfig, Method, NationalTally, OverAllocRule, PartyId,
    PartyVotes, SeatMap, TieBreak,
};
