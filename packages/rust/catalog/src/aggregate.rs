//! Aggregation of per-id registry reads into one campaign list.
//!
//! The aggregator fans out over a [`CampaignSource`] with a bounded worker
//! pool, isolates per-id failures, and falls back to the demonstration
//! dataset when live data is unavailable or nothing could be fetched. It
//! always produces a displayable list; partial failure is reported through
//! [`AggregateResult::failed_ids`] rather than as an error.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crowdmint_registry::{CampaignSource, RegistryClient};
use crowdmint_shared::{AppConfig, CampaignView, CrowdMintError, Result};

use crate::normalize::{CampaignRecord, normalize};
use crate::seed;

// ---------------------------------------------------------------------------
// AggregateResult
// ---------------------------------------------------------------------------

/// Where an aggregation cycle's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Fetched from the registry this cycle.
    Live,
    /// The synthetic demonstration dataset.
    Fallback,
}

/// Outcome of one aggregation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    /// Fetched and normalized campaigns, in fetch-completion order. Callers
    /// needing id order re-sort explicitly (or via the query pipeline).
    pub campaigns: Vec<CampaignView>,
    /// Ids whose fetch failed this cycle, ascending. Empty in fallback mode.
    pub failed_ids: Vec<u64>,
    pub origin: DataOrigin,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Orchestrates one aggregation cycle per [`Aggregator::load`] call.
pub struct Aggregator {
    source: Option<Arc<dyn CampaignSource>>,
    concurrency: usize,
    call_timeout: Option<Duration>,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("source", &self.source.as_ref().map(|_| "<source>"))
            .field("concurrency", &self.concurrency)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl Aggregator {
    /// Create an aggregator over an optional source. `None` means live data
    /// is unavailable and every cycle serves the fallback dataset.
    pub fn new(
        source: Option<Arc<dyn CampaignSource>>,
        concurrency: usize,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
            call_timeout,
        }
    }

    /// Build an aggregator from the application config. A registry client
    /// is constructed only when both the RPC endpoint and the contract
    /// address are configured.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source: Option<Arc<dyn CampaignSource>> = if config.registry.is_configured() {
            let raw_url = config.registry.rpc_url.as_deref().unwrap_or_default();
            let rpc_url = Url::parse(raw_url)
                .map_err(|e| CrowdMintError::config(format!("invalid rpc_url {raw_url:?}: {e}")))?;
            let address = config
                .registry
                .contract_address
                .clone()
                .unwrap_or_default();

            let client = RegistryClient::new(
                rpc_url,
                address,
                Duration::from_secs(config.registry.timeout_secs),
            )?;
            Some(Arc::new(client))
        } else {
            debug!("registry not configured, aggregator will serve fallback data");
            None
        };

        let timeout_secs = config.aggregate.call_timeout_secs;
        Ok(Self::new(
            source,
            config.aggregate.concurrency as usize,
            (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        ))
    }

    /// Run one aggregation cycle.
    ///
    /// Reads the campaign count, fetches every id in `[1, count]` through
    /// the bounded pool, and normalizes the successes with one shared
    /// timestamp. Falls back to the demonstration dataset when the source
    /// is missing, the count read fails, or zero ids succeed.
    #[instrument(skip_all)]
    pub async fn load(&self) -> Result<AggregateResult> {
        let now = Utc::now().timestamp();

        let Some(source) = &self.source else {
            debug!("registry unavailable, serving fallback dataset");
            return fallback_result(now);
        };

        let count = match source.campaign_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "campaign count read failed, serving fallback dataset");
                return fallback_result(now);
            }
        };

        info!(count, concurrency = self.concurrency, "loading campaigns");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for id in 1..=count {
            let source = Arc::clone(source);
            let semaphore = Arc::clone(&semaphore);
            let call_timeout = self.call_timeout;

            tasks.spawn(async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");

                let fetch = source.campaign_by_id(id);
                let outcome = match call_timeout {
                    Some(limit) => match tokio::time::timeout(limit, fetch).await {
                        Ok(result) => result,
                        Err(_) => Err(CrowdMintError::rpc(format!(
                            "campaign {id}: no response within {}s",
                            limit.as_secs()
                        ))),
                    },
                    None => fetch.await,
                };

                (id, outcome)
            });
        }

        // Fan-in: append successes as their fetches complete. Each task owns
        // its result slot, so no further synchronization is needed.
        let mut campaigns = Vec::new();
        let mut fetched_ids = HashSet::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(raw))) => {
                    campaigns.push(normalize(&CampaignRecord::Chain(raw), now)?);
                    fetched_ids.insert(id);
                }
                Ok((id, Err(e))) => {
                    warn!(id, error = %e, "campaign fetch failed");
                }
                Err(e) => {
                    warn!(error = %e, "campaign fetch task failed to join");
                }
            }
        }

        if campaigns.is_empty() {
            warn!(count, "no campaigns could be fetched, serving fallback dataset");
            return fallback_result(now);
        }

        let failed_ids: Vec<u64> = (1..=count).filter(|id| !fetched_ids.contains(id)).collect();

        info!(
            loaded = campaigns.len(),
            failed = failed_ids.len(),
            "aggregation cycle complete"
        );

        Ok(AggregateResult {
            campaigns,
            failed_ids,
            origin: DataOrigin::Live,
        })
    }
}

/// Normalize the full demonstration dataset.
fn fallback_result(now: i64) -> Result<AggregateResult> {
    let campaigns = seed::demo_campaigns()
        .iter()
        .map(|s| normalize(&CampaignRecord::Seed(s.clone()), now))
        .collect::<Result<Vec<_>>>()?;

    Ok(AggregateResult {
        campaigns,
        failed_ids: Vec::new(),
        origin: DataOrigin::Fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{HashMap, HashSet};

    use async_trait::async_trait;

    use crowdmint_registry::CampaignRecordRaw;
    use crowdmint_shared::Backers;

    const ETHER: u128 = 1_000_000_000_000_000_000;

    /// In-memory registry double with scriptable failures.
    struct FakeSource {
        records: HashMap<u64, CampaignRecordRaw>,
        count: u64,
        failing_ids: HashSet<u64>,
        fail_count_read: bool,
        delay_ids: HashSet<u64>,
    }

    impl FakeSource {
        fn with_records(count: u64) -> Self {
            let records = (1..=count)
                .map(|id| {
                    (
                        id,
                        CampaignRecordRaw {
                            id,
                            creator: format!("0x{id:040x}"),
                            goal: 10 * ETHER,
                            deadline: Utc::now().timestamp() + 30 * 86_400,
                            total_funded: u128::from(id) * ETHER,
                            claimed: false,
                        },
                    )
                })
                .collect();

            Self {
                records,
                count,
                failing_ids: HashSet::new(),
                fail_count_read: false,
                delay_ids: HashSet::new(),
            }
        }

        fn failing(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
            self.failing_ids = ids.into_iter().collect();
            self
        }

        fn delayed(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
            self.delay_ids = ids.into_iter().collect();
            self
        }
    }

    #[async_trait]
    impl CampaignSource for FakeSource {
        async fn campaign_count(&self) -> crowdmint_shared::Result<u64> {
            if self.fail_count_read {
                return Err(CrowdMintError::rpc("count read failed"));
            }
            Ok(self.count)
        }

        async fn campaign_by_id(&self, id: u64) -> crowdmint_shared::Result<CampaignRecordRaw> {
            if self.delay_ids.contains(&id) {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if self.failing_ids.contains(&id) {
                return Err(CrowdMintError::rpc(format!("campaign {id}: timeout")));
            }
            self.records
                .get(&id)
                .cloned()
                .ok_or(CrowdMintError::NotFound { id })
        }
    }

    fn aggregator(source: FakeSource) -> Aggregator {
        Aggregator::new(Some(Arc::new(source)), 4, None)
    }

    #[tokio::test]
    async fn missing_source_serves_full_fallback_dataset() {
        let result = Aggregator::new(None, 8, None).load().await.unwrap();

        assert_eq!(result.origin, DataOrigin::Fallback);
        assert_eq!(result.campaigns.len(), 6);
        assert!(result.failed_ids.is_empty());
        assert_eq!(result.campaigns[0].title, "AI Education Platform");
        assert_eq!(result.campaigns[0].backers, Backers::Known(124));
    }

    #[tokio::test]
    async fn partial_failure_is_isolated_and_reported() {
        let result = aggregator(FakeSource::with_records(3).failing([2]))
            .load()
            .await
            .unwrap();

        assert_eq!(result.origin, DataOrigin::Live);
        assert_eq!(result.campaigns.len(), 2);
        assert_eq!(result.failed_ids, vec![2]);

        let ids: HashSet<u64> = result.campaigns.iter().map(|c| c.id).collect();
        assert_eq!(ids, HashSet::from([1, 3]));
    }

    #[tokio::test]
    async fn live_records_normalize_with_unknown_backers() {
        let result = aggregator(FakeSource::with_records(2)).load().await.unwrap();

        assert_eq!(result.origin, DataOrigin::Live);
        for campaign in &result.campaigns {
            assert_eq!(campaign.backers, Backers::Unknown);
            assert_eq!(campaign.title, format!("Campaign #{}", campaign.id));
            assert!((0.0..=100.0).contains(&campaign.percentage_funded));
        }
    }

    #[tokio::test]
    async fn total_failure_falls_back() {
        let result = aggregator(FakeSource::with_records(3).failing([1, 2, 3]))
            .load()
            .await
            .unwrap();

        assert_eq!(result.origin, DataOrigin::Fallback);
        assert_eq!(result.campaigns.len(), 6);
        assert!(result.failed_ids.is_empty());
    }

    #[tokio::test]
    async fn count_read_failure_falls_back() {
        let mut source = FakeSource::with_records(3);
        source.fail_count_read = true;

        let result = aggregator(source).load().await.unwrap();
        assert_eq!(result.origin, DataOrigin::Fallback);
        assert_eq!(result.campaigns.len(), 6);
    }

    #[tokio::test]
    async fn empty_registry_falls_back() {
        let result = aggregator(FakeSource::with_records(0)).load().await.unwrap();
        assert_eq!(result.origin, DataOrigin::Fallback);
        assert_eq!(result.campaigns.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out_and_is_reported() {
        let source = FakeSource::with_records(3).delayed([2]);
        let aggregator = Aggregator::new(
            Some(Arc::new(source)),
            4,
            Some(Duration::from_secs(5)),
        );

        let result = aggregator.load().await.unwrap();
        assert_eq!(result.origin, DataOrigin::Live);
        assert_eq!(result.campaigns.len(), 2);
        assert_eq!(result.failed_ids, vec![2]);
    }

    #[tokio::test]
    async fn single_worker_pool_still_completes() {
        let source = FakeSource::with_records(5);
        let aggregator = Aggregator::new(Some(Arc::new(source)), 1, None);

        let result = aggregator.load().await.unwrap();
        assert_eq!(result.campaigns.len(), 5);
        assert!(result.failed_ids.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_app_config_builds_fallback_aggregator() {
        let aggregator = Aggregator::from_config(&AppConfig::default()).unwrap();
        let result = aggregator.load().await.unwrap();
        assert_eq!(result.origin, DataOrigin::Fallback);
        assert_eq!(result.campaigns.len(), 6);
    }

    #[tokio::test]
    async fn bad_rpc_url_is_a_config_error() {
        let mut config = AppConfig::default();
        config.registry.rpc_url = Some("not a url".into());
        config.registry.contract_address = Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".into());

        let err = Aggregator::from_config(&config).unwrap_err();
        assert!(matches!(err, CrowdMintError::Config { .. }));
    }
}
