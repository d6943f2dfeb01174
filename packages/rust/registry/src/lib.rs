//! Read-only access to the on-chain campaign registry.
//!
//! This crate provides:
//! - [`RegistryClient`] — JSON-RPC `eth_call` client for the registry contract
//! - [`CampaignSource`] — the trait seam the aggregator fans out over
//! - [`abi`] — minimal selector/word codec for the registry's view functions

pub mod abi;
pub mod client;
pub mod rpc;

pub use client::{CampaignRecordRaw, CampaignSource, RegistryClient};
