//! Normalization of source records into the canonical [`CampaignView`].
//!
//! Pure and synchronous: for a fixed (record, now) the output is fully
//! deterministic, so it is safe to call from any concurrent context.

use crowdmint_registry::CampaignRecordRaw;
use crowdmint_shared::{Backers, CampaignView, Category, CrowdMintError, Result};

use crate::seed::CampaignSeed;

/// Seconds per day, for deadline arithmetic.
const SECS_PER_DAY: i64 = 86_400;

/// Decimal places of the registry's minor unit (wei per ether).
const UNIT_DECIMALS: i32 = 18;

/// Category assigned to chain records. The registry contract carries no
/// category field, so every live campaign lands here.
const CHAIN_CATEGORY: Category = Category::Technology;

/// A campaign record from one of the two supported sources.
#[derive(Debug, Clone)]
pub enum CampaignRecord {
    /// Decoded on-chain tuple.
    Chain(CampaignRecordRaw),
    /// Synthetic demonstration record.
    Seed(CampaignSeed),
}

/// Map a source record into the canonical view, deriving the presentation
/// metrics from `now` (unix seconds).
///
/// Chain records synthesize a title, take the placeholder category, and
/// report [`Backers::Unknown`]: the contract has no backer count and the
/// view never fabricates one. Seed records compute their deadline from
/// `days_left` at normalization time, which is acceptable only because
/// this path feeds demonstration data, not live financial state.
pub fn normalize(record: &CampaignRecord, now: i64) -> Result<CampaignView> {
    match record {
        CampaignRecord::Chain(raw) => Ok(build_view(ViewParts {
            id: raw.id,
            creator: raw.creator.clone(),
            goal: to_magnitude(raw.goal),
            total_funded: to_magnitude(raw.total_funded),
            deadline_epoch: raw.deadline,
            claimed: raw.claimed,
            title: format!("Campaign #{}", raw.id),
            category: CHAIN_CATEGORY,
            backers: Backers::Unknown,
            now,
        })),
        CampaignRecord::Seed(seed) => Ok(build_view(ViewParts {
            id: seed.id,
            creator: seed.creator.clone(),
            goal: parse_magnitude(&seed.goal)?,
            total_funded: parse_magnitude(&seed.total_funded)?,
            deadline_epoch: now + i64::from(seed.days_left) * SECS_PER_DAY,
            claimed: false,
            title: seed.title.clone(),
            category: seed.category,
            backers: Backers::Known(seed.backers),
            now,
        })),
    }
}

/// Source-independent inputs to the derived-metric step.
struct ViewParts {
    id: u64,
    creator: String,
    goal: f64,
    total_funded: f64,
    deadline_epoch: i64,
    claimed: bool,
    title: String,
    category: Category,
    backers: Backers,
    now: i64,
}

fn build_view(parts: ViewParts) -> CampaignView {
    CampaignView {
        percentage_funded: percentage_funded(parts.goal, parts.total_funded),
        days_left: days_left(parts.deadline_epoch, parts.now),
        is_active: parts.now < parts.deadline_epoch && !parts.claimed,
        id: parts.id,
        creator: parts.creator,
        goal: parts.goal,
        total_funded: parts.total_funded,
        deadline_epoch: parts.deadline_epoch,
        claimed: parts.claimed,
        title: parts.title,
        category: parts.category,
        backers: parts.backers,
    }
}

/// Convert minor units to a decimal magnitude (wei to ether).
fn to_magnitude(minor: u128) -> f64 {
    minor as f64 / 10f64.powi(UNIT_DECIMALS)
}

/// Parse a seed record's decimal-string amount.
fn parse_magnitude(value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CrowdMintError::decode(format!("invalid decimal amount: {value:?}")))
}

/// `min(100, total_funded/goal*100)` when goal > 0, else 0.
fn percentage_funded(goal: f64, total_funded: f64) -> f64 {
    if goal > 0.0 {
        (total_funded / goal * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Whole days until the deadline, rounded up, floored at 0.
fn days_left(deadline_epoch: i64, now: i64) -> u32 {
    let remaining = deadline_epoch - now;
    if remaining <= 0 {
        0
    } else {
        (remaining as u64).div_ceil(SECS_PER_DAY as u64) as u32
    }
}
