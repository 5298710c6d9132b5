//! REST (LCD) gateway client for Cosmos SDK nodes

use super::ChainSource;
use crate::error::SyncError;
use crate::modules::Subspace;
use crate::proposal::{ChainProposal, ProposalStatus, StakingPool, TallyCounts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};

/// Header the gateway reads to serve state at a past height
const HEIGHT_HEADER: &str = "x-cosmos-block-height";

/// gRPC status code for NotFound, as echoed in gateway error bodies
const GRPC_NOT_FOUND: i64 = 5;

pub struct LcdClient {
    base_url: String,
    http: reqwest::Client,
}

impl LcdClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, height: Option<i64>) -> Result<T, SyncError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url);
        if let Some(height) = height.filter(|h| *h > 0) {
            request = request.header(HEIGHT_HEADER, height.to_string());
        }

        debug!(%url, ?height, "querying node");
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        decode_response(path, status, &body)
    }
}

#[derive(Deserialize)]
struct GatewayError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Turn a gateway reply into `T`, classifying failures structurally
fn decode_response<T: DeserializeOwned>(path: &str, status: u16, body: &[u8]) -> Result<T, SyncError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body)
            .map_err(|e| SyncError::Chain(format!("invalid response from {}: {}", path, e)));
    }

    let gateway: Option<GatewayError> = serde_json::from_slice(body).ok();
    let message = gateway
        .as_ref()
        .map(|g| g.message.clone())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    // A bare 404 may come from a proxy in front of the node, so only the
    // gateway's own gRPC status counts.
    if gateway.as_ref().is_some_and(|g| g.code == GRPC_NOT_FOUND) {
        return Err(SyncError::NotFound(format!("{}: {}", path, message)));
    }

    Err(SyncError::Chain(format!("{} returned {}: {}", path, status, message)))
}

#[derive(Debug, Deserialize)]
struct ProposalResponse {
    proposal: LcdProposal,
}

#[derive(Debug, Deserialize)]
struct LcdProposal {
    proposal_id: String,
    #[serde(default)]
    content: Value,
    status: ProposalStatus,
    voting_start_time: DateTime<Utc>,
    voting_end_time: DateTime<Utc>,
}

impl TryFrom<LcdProposal> for ChainProposal {
    type Error = SyncError;

    fn try_from(p: LcdProposal) -> Result<Self, Self::Error> {
        let proposal_id = p
            .proposal_id
            .parse()
            .map_err(|e| SyncError::Chain(format!("invalid proposal id {:?}: {}", p.proposal_id, e)))?;
        Ok(ChainProposal {
            proposal_id,
            status: p.status,
            content: p.content,
            voting_start_time: p.voting_start_time,
            voting_end_time: p.voting_end_time,
        })
    }
}

#[derive(Deserialize)]
struct TallyResponse {
    tally: TallyCounts,
}

#[derive(Deserialize)]
struct PoolResponse {
    pool: PoolBody,
}

#[derive(Deserialize)]
struct PoolBody {
    bonded_tokens: String,
    not_bonded_tokens: String,
}

#[derive(Deserialize)]
struct ParamsResponse {
    params: Value,
}

#[derive(Deserialize)]
struct InflationResponse {
    inflation: String,
}

#[derive(Deserialize)]
struct LatestBlockResponse {
    block: BlockBody,
}

#[derive(Deserialize)]
struct BlockBody {
    header: HeaderBody,
}

#[derive(Deserialize)]
struct HeaderBody {
    height: String,
}

/// gov params are split over three endpoints
const GOV_PARAM_KINDS: [(&str, &str); 3] = [
    ("voting", "voting_params"),
    ("deposit", "deposit_params"),
    ("tallying", "tally_params"),
];

fn params_path(subspace: Subspace) -> &'static str {
    match subspace {
        Subspace::Distribution => "/cosmos/distribution/v1beta1/params",
        Subspace::Mint => "/cosmos/mint/v1beta1/params",
        Subspace::Slashing => "/cosmos/slashing/v1beta1/params",
        Subspace::Staking => "/cosmos/staking/v1beta1/params",
        Subspace::Gov => "/cosmos/gov/v1beta1/params",
    }
}

#[async_trait]
impl ChainSource for LcdClient {
    #[instrument(level = "debug", skip(self))]
    async fn proposal(&self, height: i64, id: u64) -> Result<ChainProposal, SyncError> {
        let response: ProposalResponse = self
            .get(&format!("/cosmos/gov/v1beta1/proposals/{}", id), Some(height))
            .await?;
        response.proposal.try_into()
    }

    async fn tally_result(&self, height: i64, id: u64) -> Result<TallyCounts, SyncError> {
        let response: TallyResponse = self
            .get(&format!("/cosmos/gov/v1beta1/proposals/{}/tally", id), Some(height))
            .await?;
        Ok(response.tally)
    }

    async fn staking_pool(&self, height: i64) -> Result<StakingPool, SyncError> {
        let response: PoolResponse = self.get("/cosmos/staking/v1beta1/pool", Some(height)).await?;
        Ok(StakingPool {
            bonded_tokens: response.pool.bonded_tokens,
            not_bonded_tokens: response.pool.not_bonded_tokens,
            height,
        })
    }

    async fn module_params(&self, subspace: Subspace, height: i64) -> Result<Value, SyncError> {
        if subspace == Subspace::Gov {
            let mut merged = Map::new();
            for (kind, field) in GOV_PARAM_KINDS {
                let path = format!("{}/{}", params_path(subspace), kind);
                let mut response: Map<String, Value> = self.get(&path, Some(height)).await?;
                let value = response.remove(field).unwrap_or(Value::Null);
                merged.insert(field.to_string(), value);
            }
            return Ok(Value::Object(merged));
        }

        let response: ParamsResponse = self.get(params_path(subspace), Some(height)).await?;
        Ok(response.params)
    }

    async fn inflation(&self, height: i64) -> Result<String, SyncError> {
        let response: InflationResponse =
            self.get("/cosmos/mint/v1beta1/inflation", Some(height)).await?;
        Ok(response.inflation)
    }

    async fn latest_height(&self) -> Result<i64, SyncError> {
        let response: LatestBlockResponse = self
            .get("/cosmos/base/tendermint/v1beta1/blocks/latest", None)
            .await?;
        response
            .block
            .header
            .height
            .parse()
            .map_err(|e| SyncError::Chain(format!("invalid latest height: {}", e)))
    }
}
