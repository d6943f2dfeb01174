//! Search, filter, and sort over campaign views.
//!
//! Stateless: the input slice is never mutated and the output is a fresh
//! sequence, so a presentation layer can re-run queries over one cycle's
//! views as its controls change.

use std::cmp::Ordering;

use crowdmint_shared::{CampaignView, QuerySpec, SortKey};

/// Apply `spec` to `views`: search filter, then category filter, then a
/// stable sort (ties preserve the prior relative order).
pub fn query(views: &[CampaignView], spec: &QuerySpec) -> Vec<CampaignView> {
    let needle = spec.search.to_lowercase();

    let mut result: Vec<CampaignView> = views
        .iter()
        .filter(|v| needle.is_empty() || v.title.to_lowercase().contains(&needle))
        .filter(|v| spec.category.matches(v.category))
        .cloned()
        .collect();

    match spec.sort {
        SortKey::Trending => {
            result.sort_by(|a, b| desc_f64(a.percentage_funded, b.percentage_funded));
        }
        SortKey::Newest => result.sort_by(|a, b| b.id.cmp(&a.id)),
        SortKey::Ending => result.sort_by(|a, b| a.days_left.cmp(&b.days_left)),
        SortKey::Funded => result.sort_by(|a, b| desc_f64(a.total_funded, b.total_funded)),
    }

    result
}

/// Descending numeric order on decimal magnitudes; incomparable values keep
/// their relative order.
fn desc_f64(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
