//! Fixed demonstration dataset, served when live registry data is
//! unavailable. Not a persisted format; the table is recomputed into views
//! on every fallback cycle.

use crowdmint_shared::Category;

/// Synthetic demonstration record.
///
/// Amounts are decimal strings in base units (matching what a form would
/// submit); `days_left` stands in for a real deadline and is converted to
/// an epoch at normalization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignSeed {
    pub id: u64,
    /// Creator display label (shortened address).
    pub creator: String,
    pub goal: String,
    pub total_funded: String,
    pub title: String,
    pub category: Category,
    pub backers: u64,
    pub days_left: u32,
}

fn seed(
    id: u64,
    creator: &str,
    goal: &str,
    total_funded: &str,
    title: &str,
    category: Category,
    backers: u64,
    days_left: u32,
) -> CampaignSeed {
    CampaignSeed {
        id,
        creator: creator.into(),
        goal: goal.into(),
        total_funded: total_funded.into(),
        title: title.into(),
        category,
        backers,
        days_left,
    }
}

/// The six demonstration campaigns.
pub fn demo_campaigns() -> Vec<CampaignSeed> {
    vec![
        seed(1, "0x742d...3f4a", "50", "38.5", "AI Education Platform", Category::Technology, 124, 15),
        seed(2, "0x9a1b...7c2d", "30", "28.2", "Sustainable Fashion", Category::Environment, 89, 8),
        seed(3, "0x3e5f...9d1a", "100", "45.8", "Blockchain Gaming", Category::Gaming, 203, 22),
        seed(4, "0x5b2c...8e9f", "25", "22.1", "Digital Art NFTs", Category::ArtDesign, 156, 5),
        seed(5, "0x7d4a...2b1c", "75", "12.3", "Online Learning", Category::Education, 67, 30),
        seed(6, "0x1f8e...5c3d", "40", "35.7", "Health Tech Wearable", Category::HealthWellness, 112, 12),
    ]
}
