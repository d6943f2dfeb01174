//! Campaign catalog: normalization, aggregation, and querying.
//!
//! This crate implements the discovery pipeline behind the campaign
//! listing:
//! - [`normalize`] — pure mapping from source records into canonical views
//! - [`seed`] — the fixed demonstration dataset used as a fallback
//! - [`aggregate`] — concurrent per-id fetching with failure isolation
//! - [`query`] — search/filter/sort over one cycle's views

pub mod aggregate;
pub mod normalize;
pub mod query;
pub mod seed;

pub use aggregate::{AggregateResult, Aggregator, DataOrigin};
pub use normalize::{CampaignRecord, normalize};
pub use query::query;
pub use seed::{CampaignSeed, demo_campaigns};
