//! Canonical domain types for the CrowdMint campaign catalog.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The fixed set of campaign categories.
///
/// Chain records carry no category field, so the normalizer assigns a
/// placeholder; seed records name one of these explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technology,
    #[serde(rename = "Art & Design")]
    ArtDesign,
    Gaming,
    Education,
    #[serde(rename = "Health & Wellness")]
    HealthWellness,
    Environment,
    #[serde(rename = "Social Impact")]
    SocialImpact,
    Business,
}

impl Category {
    /// Every category, in presentation order.
    pub const ALL: [Category; 8] = [
        Category::Technology,
        Category::ArtDesign,
        Category::Gaming,
        Category::Education,
        Category::HealthWellness,
        Category::Environment,
        Category::SocialImpact,
        Category::Business,
    ];

    /// Display label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::ArtDesign => "Art & Design",
            Category::Gaming => "Gaming",
            Category::Education => "Education",
            Category::HealthWellness => "Health & Wellness",
            Category::Environment => "Environment",
            Category::SocialImpact => "Social Impact",
            Category::Business => "Business",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {s:?}"))
    }
}

/// A category filter with the `All` sentinel used only for querying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Restrict to exactly one category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a view with `category` passes this filter.
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => *only == category,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

// ---------------------------------------------------------------------------
// Backers
// ---------------------------------------------------------------------------

/// Backer count for a campaign.
///
/// The registry contract does not expose a backer count, so chain-sourced
/// views are `Unknown` rather than carrying a fabricated number. Seed
/// records know their count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Backers {
    Known(u64),
    Unknown,
}

impl Backers {
    /// The count, when the source provided one.
    pub fn count(&self) -> Option<u64> {
        match self {
            Backers::Known(n) => Some(*n),
            Backers::Unknown => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CampaignView
// ---------------------------------------------------------------------------

/// Canonical campaign view model handed to the presentation layer.
///
/// Instances are recomputed on every aggregation cycle and never persisted.
/// Amounts are decimal magnitudes in the registry's base unit (ether, not
/// wei); derived fields are computed by the normalizer from one shared
/// `now` per cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignView {
    /// Positive integer, unique within one cycle.
    pub id: u64,
    /// Display string: a hex address for chain records, a label for seeds.
    pub creator: String,
    /// Funding goal, decimal magnitude.
    pub goal: f64,
    /// Total contributed so far, decimal magnitude.
    pub total_funded: f64,
    /// Funding deadline, unix seconds.
    pub deadline_epoch: i64,
    /// Whether the creator already claimed the funds.
    pub claimed: bool,
    pub title: String,
    pub category: Category,
    /// `min(100, total_funded/goal*100)`, 0 when goal is 0.
    pub percentage_funded: f64,
    pub backers: Backers,
    /// `max(0, ceil((deadline_epoch - now)/86400))`.
    pub days_left: u32,
    /// `now < deadline_epoch && !claimed`.
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Query spec
// ---------------------------------------------------------------------------

/// Sort strategies for the query pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Descending by percentage funded.
    #[default]
    Trending,
    /// Descending by id.
    Newest,
    /// Ascending by days left.
    Ending,
    /// Descending by total funded (numeric, never lexical).
    Funded,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trending" => Ok(SortKey::Trending),
            "newest" => Ok(SortKey::Newest),
            "ending" => Ok(SortKey::Ending),
            "funded" => Ok(SortKey::Funded),
            _ => Err(format!("unknown sort key: {s:?}")),
        }
    }
}

/// A composable search/filter/sort query over campaign views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Case-insensitive substring match against titles; empty means no
    /// search filter.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub sort: SortKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_label_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.label().parse().expect("parse label");
            assert_eq!(parsed, category);
        }
        assert!("Knitting".parse::<Category>().is_err());
    }

    #[test]
    fn category_serde_uses_labels() {
        let json = serde_json::to_string(&Category::HealthWellness).expect("serialize");
        assert_eq!(json, "\"Health & Wellness\"");
        let parsed: Category = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, Category::HealthWellness);
    }

    #[test]
    fn category_filter_all_matches_everything() {
        for category in Category::ALL {
            assert!(CategoryFilter::All.matches(category));
        }
        assert!(CategoryFilter::Only(Category::Gaming).matches(Category::Gaming));
        assert!(!CategoryFilter::Only(Category::Gaming).matches(Category::Education));
    }

    #[test]
    fn category_filter_parses_all_sentinel() {
        assert_eq!("All".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Gaming".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Gaming))
        );
    }

    #[test]
    fn backers_count() {
        assert_eq!(Backers::Known(124).count(), Some(124));
        assert_eq!(Backers::Unknown.count(), None);
    }

    #[test]
    fn sort_key_parses() {
        assert_eq!("funded".parse::<SortKey>(), Ok(SortKey::Funded));
        assert_eq!("Trending".parse::<SortKey>(), Ok(SortKey::Trending));
        assert!("alphabetical".parse::<SortKey>().is_err());
    }

    #[test]
    fn campaign_view_serde_roundtrip() {
        let view = CampaignView {
            id: 1,
            creator: "0x742d...3f4a".into(),
            goal: 50.0,
            total_funded: 38.5,
            deadline_epoch: 1_700_000_000,
            claimed: false,
            title: "AI Education Platform".into(),
            category: Category::Technology,
            percentage_funded: 77.0,
            backers: Backers::Known(124),
            days_left: 15,
            is_active: true,
        };

        let json = serde_json::to_string(&view).expect("serialize");
        let parsed: CampaignView = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, view);
    }
}
