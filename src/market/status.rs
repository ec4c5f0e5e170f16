//! On-chain order state reads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ledger::transport::LedgerRpc;
use crate::ledger::types::{ClientError, ClientResult};

/// Snapshot of a storage order's on-chain state.
///
/// Re-fetched on every query; the client never caches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub file_size: u64,
    /// Storage-power weight credited for the file.
    pub spower: u64,
    /// Block at which the order expires.
    pub expired_at: u64,
    /// Block of the last payout calculation.
    pub calculated_at: u64,
    #[serde(with = "balance")]
    pub amount: u128,
    #[serde(with = "balance")]
    pub prepaid: u128,
    pub reported_replica_count: u32,
    pub remained_paid_count: u32,
    /// Per-holder replica state, keyed by holder address.
    #[serde(default)]
    pub replicas: HashMap<String, Replica>,
}

/// One provider's copy of the stored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replica {
    pub who: String,
    /// Block from which the replica counts as valid.
    pub valid_at: u64,
    pub anchor: String,
    pub is_reported: bool,
    /// Creation block, absent for replicas migrated from older state.
    pub created_at: Option<u64>,
}

/// Chain balances exceed `u64`, so node JSON carries them as decimal
/// strings; older nodes emit plain numbers for small values.
mod balance {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s
                .trim()
                .replace(',', "")
                .parse()
                .map_err(serde::de::Error::custom),
            Raw::Number(n) => Ok(u128::from(n)),
        }
    }
}

/// Fetch and normalize the order state for a cid.
///
/// The caller is responsible for readiness; this performs exactly one read
/// query and never retries.
pub(crate) async fn read_order_status(
    transport: &dyn LedgerRpc,
    cid: &str,
) -> ClientResult<Option<OrderStatus>> {
    let raw = match transport.query_order(cid).await? {
        Some(value) if !value.is_null() => value,
        _ => {
            tracing::debug!(cid = %cid, "no order on chain");
            return Ok(None);
        }
    };
    let status: OrderStatus = serde_json::from_value(raw)
        .map_err(|e| ClientError::Codec(format!("malformed order state for {}: {}", cid, e)))?;
    Ok(Some(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_order() {
        let raw = json!({
            "fileSize": 134217728u64,
            "spower": 150000000u64,
            "expiredAt": 2594488u64,
            "calculatedAt": 2488488u64,
            "amount": "64208297828",
            "prepaid": "0",
            "reportedReplicaCount": 2,
            "remainedPaidCount": 4,
            "replicas": {
                "cTHATt2Pk7w1vH6UwH3dDJEYBBQYnRnmbQsCZWxdaMSHfnHUA": {
                    "who": "cTHATt2Pk7w1vH6UwH3dDJEYBBQYnRnmbQsCZWxdaMSHfnHUA",
                    "validAt": 2488493u64,
                    "anchor": "0x8dfd7d22",
                    "isReported": true,
                    "createdAt": 2488493u64
                },
                "cTJp3g7TC8xdeHNf5bVeVYSkJhhNHqUYCVoTGyBWf1jSbQn5e": {
                    "who": "cTJp3g7TC8xdeHNf5bVeVYSkJhhNHqUYCVoTGyBWf1jSbQn5e",
                    "validAt": 2488500u64,
                    "anchor": "0x5a77b1ce",
                    "isReported": false,
                    "createdAt": null
                }
            }
        });

        let status: OrderStatus = serde_json::from_value(raw).unwrap();
        assert_eq!(status.file_size, 134_217_728);
        assert_eq!(status.amount, 64_208_297_828);
        assert_eq!(status.prepaid, 0);
        assert_eq!(status.reported_replica_count, 2);
        assert_eq!(status.replicas.len(), 2);

        let migrated = &status.replicas["cTJp3g7TC8xdeHNf5bVeVYSkJhhNHqUYCVoTGyBWf1jSbQn5e"];
        assert!(!migrated.is_reported);
        assert_eq!(migrated.created_at, None);
    }

    #[test]
    fn test_deserialize_numeric_balances_and_missing_replicas() {
        let raw = json!({
            "fileSize": 1024u64,
            "spower": 1024u64,
            "expiredAt": 100u64,
            "calculatedAt": 50u64,
            "amount": 1000u64,
            "prepaid": 0u64,
            "reportedReplicaCount": 0,
            "remainedPaidCount": 4
        });

        let status: OrderStatus = serde_json::from_value(raw).unwrap();
        assert_eq!(status.amount, 1000);
        assert!(status.replicas.is_empty());
    }
}
