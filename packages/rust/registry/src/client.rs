//! Read-only JSON-RPC client for the campaign registry contract.
//!
//! The registry exposes two view functions:
//! - `campaignCount() -> uint256`
//! - `getCampaign(uint256) -> (address, uint256, uint256, uint256, bool)`
//!
//! This layer does no retrying and no fallback; errors propagate unchanged
//! to the aggregator, which decides what a failure means for the batch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crowdmint_shared::{CrowdMintError, Result};

use crate::abi;
use crate::rpc::{RpcRequest, RpcResponse};

/// User-Agent string for registry requests.
const USER_AGENT: &str = concat!("CrowdMint/", env!("CARGO_PKG_VERSION"));

/// Canonical signature of the campaign counter view.
const CAMPAIGN_COUNT_SIG: &str = "campaignCount()";

/// Canonical signature of the per-id campaign view.
const GET_CAMPAIGN_SIG: &str = "getCampaign(uint256)";

/// Words in the `getCampaign` return tuple.
const CAMPAIGN_TUPLE_WORDS: usize = 5;

// ---------------------------------------------------------------------------
// CampaignRecordRaw
// ---------------------------------------------------------------------------

/// Raw on-chain campaign record, decoded from the `getCampaign` tuple.
///
/// Amounts are in minor units (wei); the normalizer converts them to
/// decimal magnitudes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRecordRaw {
    pub id: u64,
    /// Creator address, 0x-prefixed lowercase hex.
    pub creator: String,
    /// Funding goal in minor units.
    pub goal: u128,
    /// Funding deadline, unix seconds.
    pub deadline: i64,
    /// Total contributed so far in minor units.
    pub total_funded: u128,
    /// Whether the creator already claimed the funds.
    pub claimed: bool,
}

// ---------------------------------------------------------------------------
// CampaignSource
// ---------------------------------------------------------------------------

/// Read-only view of the campaign registry.
///
/// The aggregator fans out over this seam, which keeps it testable against
/// an in-memory fake.
#[async_trait]
pub trait CampaignSource: Send + Sync {
    /// Total number of registered campaigns; ids are `1..=count`.
    async fn campaign_count(&self) -> Result<u64>;

    /// Fetch a single campaign record by id.
    async fn campaign_by_id(&self, id: u64) -> Result<CampaignRecordRaw>;
}

// ---------------------------------------------------------------------------
// RegistryClient
// ---------------------------------------------------------------------------

/// JSON-RPC client bound to one registry contract.
pub struct RegistryClient {
    http: Client,
    rpc_url: Url,
    contract_address: String,
}

impl RegistryClient {
    /// Create a client for the registry at `contract_address` behind the
    /// given JSON-RPC endpoint.
    pub fn new(rpc_url: Url, contract_address: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CrowdMintError::rpc(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            rpc_url,
            contract_address: contract_address.into(),
        })
    }

    /// Total number of registered campaigns.
    pub async fn campaign_count(&self) -> Result<u64> {
        let calldata = abi::encode_call(CAMPAIGN_COUNT_SIG, &[]);
        let data = self.eth_call(&calldata).await?;

        let words = abi::decode_words(&data)?;
        let [word] = words.as_slice() else {
            return Err(CrowdMintError::decode(format!(
                "campaignCount returned {} words, expected 1",
                words.len()
            )));
        };

        let count = abi::word_to_u64(word)?;
        debug!(count, "campaign count read");
        Ok(count)
    }

    /// Fetch one campaign record. Fails with [`CrowdMintError::NotFound`]
    /// when the registry reverts the lookup (id out of range).
    pub async fn get_campaign(&self, id: u64) -> Result<CampaignRecordRaw> {
        let calldata = abi::encode_call(GET_CAMPAIGN_SIG, &[u128::from(id)]);

        let data = match self.eth_call(&calldata).await {
            Ok(data) => data,
            // Nodes report an out-of-range id as an execution revert.
            Err(CrowdMintError::Rpc(message)) if message.contains("revert") => {
                return Err(CrowdMintError::NotFound { id });
            }
            Err(e) => return Err(e),
        };

        // A revert without reason surfaces as empty returndata.
        if data.trim_start_matches("0x").is_empty() {
            return Err(CrowdMintError::NotFound { id });
        }

        let words = abi::decode_words(&data)?;
        if words.len() != CAMPAIGN_TUPLE_WORDS {
            return Err(CrowdMintError::decode(format!(
                "getCampaign returned {} words, expected {CAMPAIGN_TUPLE_WORDS}",
                words.len()
            )));
        }

        let deadline_raw = abi::word_to_u64(&words[2])?;
        let deadline = i64::try_from(deadline_raw)
            .map_err(|_| CrowdMintError::decode("deadline exceeds i64 range"))?;

        Ok(CampaignRecordRaw {
            id,
            creator: abi::word_to_address(&words[0])?,
            goal: abi::word_to_u128(&words[1])?,
            deadline,
            total_funded: abi::word_to_u128(&words[3])?,
            claimed: abi::word_to_bool(&words[4])?,
        })
    }

    /// Issue one `eth_call` and return the 0x-prefixed returndata.
    async fn eth_call(&self, calldata: &str) -> Result<String> {
        let request = RpcRequest::eth_call(&self.contract_address, calldata);

        let response = self
            .http
            .post(self.rpc_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| CrowdMintError::rpc(format!("{}: {e}", self.rpc_url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrowdMintError::rpc(format!(
                "{}: HTTP {status}",
                self.rpc_url
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| CrowdMintError::rpc(format!("{}: invalid JSON-RPC response: {e}", self.rpc_url)))?;

        if let Some(error) = body.error {
            return Err(CrowdMintError::rpc(format!(
                "eth_call failed: {} (code {})",
                error.message, error.code
            )));
        }

        match body.result {
            Some(serde_json::Value::String(data)) => Ok(data),
            other => Err(CrowdMintError::rpc(format!(
                "eth_call returned no data: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl CampaignSource for RegistryClient {
    async fn campaign_count(&self) -> Result<u64> {
        RegistryClient::campaign_count(self).await
    }

    async fn campaign_by_id(&self, id: u64) -> Result<CampaignRecordRaw> {
        RegistryClient::get_campaign(self, id).await
    }
}
