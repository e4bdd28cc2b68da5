// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Fee snapshot types and fee-history based tier estimation
//!
//! A [`FeeSnapshot`] is what one provider reports for one network at one
//! point in time: the provider's name plus whatever fee fields that provider
//! exposes, flattened next to each other in the serialized form:
//!
//! ```json
//! { "source": "llama", "safeLow": { "maxFee": 31, "maxPriorityFee": 1 }, "blockNumber": 19000000 }
//! ```
//!
//! RPC providers without a dedicated gas API are turned into [`FeeOptions`]
//! by [`fee_options_from_history`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ProviderError;
use crate::providers::ProviderName;

/// One provider's fee report for one network. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSnapshot {
    source: ProviderName,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl FeeSnapshot {
    /// Build a snapshot from any serializable fee report.
    ///
    /// The report must serialize to a JSON object; a `source` key inside it is
    /// replaced by the provider name.
    pub fn new<T: Serialize>(source: ProviderName, report: &T) -> Result<Self, ProviderError> {
        let value = serde_json::to_value(report).map_err(|e| {
            ProviderError::invalid_response(source, format!("unserializable fee report: {e}"))
        })?;
        Self::from_json(source, value)
    }

    /// Build a snapshot from a raw JSON response body.
    pub fn from_json(source: ProviderName, value: Value) -> Result<Self, ProviderError> {
        match value {
            Value::Object(mut fields) => {
                fields.remove("source");
                Ok(Self { source, fields })
            }
            other => Err(ProviderError::invalid_response(
                source,
                format!("expected a JSON object, got {}", json_kind(&other)),
            )),
        }
    }

    /// Provider that produced this snapshot.
    #[must_use]
    pub fn source(&self) -> ProviderName {
        self.source
    }

    /// Provider-specific fee fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single fee field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fee caps for one inclusion-speed tier, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTier {
    pub max_fee: u128,
    pub max_priority_fee: u128,
}

impl FeeTier {
    fn with_base_fee(priority_fee: u128, base_fee: u128) -> Self {
        Self {
            max_fee: priority_fee.saturating_add(base_fee),
            max_priority_fee: priority_fee,
        }
    }
}

/// Gas-station style fee tiers derived from recent fee history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeOptions {
    pub safe_low: FeeTier,
    pub standard: FeeTier,
    pub fast: FeeTier,
    pub rapid: FeeTier,
    /// Base fee expected for the next block, in wei
    pub estimated_base_fee: u128,
    /// Newest block of the sampled window
    pub block_number: u64,
}

/// EIP-1559 fee data in the shape of a wallet `getFeeData` call, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeData {
    pub gas_price: u128,
    pub last_base_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

impl FeeData {
    /// Derive fee data from the legacy gas price, the latest base fee and the
    /// suggested priority fee. `maxFeePerGas` leaves room for two full
    /// base-fee increases.
    #[must_use]
    pub fn new(gas_price: u128, last_base_fee_per_gas: u128, max_priority_fee_per_gas: u128) -> Self {
        Self {
            gas_price,
            last_base_fee_per_gas,
            max_fee_per_gas: last_base_fee_per_gas
                .saturating_mul(2)
                .saturating_add(max_priority_fee_per_gas),
            max_priority_fee_per_gas,
        }
    }
}

/// safeLow, standard, fast, rapid
const TIER_COUNT: usize = 4;

/// Reason a fee history window cannot be turned into [`FeeOptions`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeeHistoryError {
    #[error("fee history contains no reward data")]
    NoRewards,
    #[error("block {block} reports {found} reward percentiles, expected {expected}")]
    MissingPercentile {
        block: u64,
        found: usize,
        expected: usize,
    },
    #[error("fee history contains no base fee")]
    NoBaseFee,
}

/// Estimate fee tiers from an `eth_feeHistory` window.
///
/// `rewards` holds one row per block with the priority fee at each requested
/// percentile (safeLow, standard, fast, rapid). Each tier's priority fee is
/// the rounded mean of its percentile over the window. The base fee estimate
/// is the base fee of the newest block in the window; `base_fees` carries one
/// extra trailing entry for the block after it, which is not used.
pub fn fee_options_from_history(
    oldest_block: u64,
    base_fees: &[u128],
    rewards: &[Vec<u128>],
) -> Result<FeeOptions, FeeHistoryError> {
    if rewards.is_empty() {
        return Err(FeeHistoryError::NoRewards);
    }
    let estimated_base_fee = *base_fees
        .get(rewards.len() - 1)
        .ok_or(FeeHistoryError::NoBaseFee)?;

    let mut tiers = [0u128; TIER_COUNT];
    for (tier, slot) in tiers.iter_mut().enumerate() {
        let mut sum: u128 = 0;
        for (offset, row) in rewards.iter().enumerate() {
            let reward = row.get(tier).ok_or(FeeHistoryError::MissingPercentile {
                block: oldest_block + offset as u64,
                found: row.len(),
                expected: TIER_COUNT,
            })?;
            sum = sum.saturating_add(*reward);
        }
        *slot = rounded_mean(sum, rewards.len() as u128);
    }

    Ok(FeeOptions {
        safe_low: FeeTier::with_base_fee(tiers[0], estimated_base_fee),
        standard: FeeTier::with_base_fee(tiers[1], estimated_base_fee),
        fast: FeeTier::with_base_fee(tiers[2], estimated_base_fee),
        rapid: FeeTier::with_base_fee(tiers[3], estimated_base_fee),
        estimated_base_fee,
        block_number: oldest_block + rewards.len() as u64 - 1,
    })
}

// Halves round up.
fn rounded_mean(sum: u128, count: u128) -> u128 {
    sum.saturating_add(count / 2) / count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_options_averages_each_percentile() {
        let rewards = vec![vec![1, 2, 3, 4], vec![3, 4, 5, 6]];
        let options = fee_options_from_history(100, &[10, 12, 15], &rewards).unwrap();

        assert_eq!(options.safe_low.max_priority_fee, 2);
        assert_eq!(options.standard.max_priority_fee, 3);
        assert_eq!(options.fast.max_priority_fee, 4);
        assert_eq!(options.rapid.max_priority_fee, 5);
        assert_eq!(options.estimated_base_fee, 12);
        assert_eq!(options.rapid.max_fee, 17);
        assert_eq!(options.block_number, 101);
    }

    #[test]
    fn test_fee_options_rounds_half_up() {
        let rewards = vec![vec![1, 1, 1, 1], vec![2, 2, 2, 2]];
        let options = fee_options_from_history(7, &[0, 0, 0], &rewards).unwrap();
        assert_eq!(options.safe_low.max_priority_fee, 2);
    }

    #[test]
    fn test_fee_options_rejects_empty_or_short_rows() {
        assert_eq!(
            fee_options_from_history(1, &[1], &[]),
            Err(FeeHistoryError::NoRewards)
        );
        assert_eq!(
            fee_options_from_history(1, &[], &[vec![1, 2, 3, 4]]),
            Err(FeeHistoryError::NoBaseFee)
        );
        assert!(matches!(
            fee_options_from_history(1, &[1, 1, 1], &[vec![1, 2, 3, 4], vec![1, 2]]),
            Err(FeeHistoryError::MissingPercentile { block: 2, found: 2, .. })
        ));
    }

    #[test]
    fn test_fee_options_ignore_trailing_next_block_base_fee() {
        let rewards = vec![vec![1, 1, 1, 1], vec![1, 1, 1, 1], vec![1, 1, 1, 1]];
        let options = fee_options_from_history(50, &[7, 8, 9, 100], &rewards).unwrap();
        assert_eq!(options.estimated_base_fee, 9);
        assert_eq!(options.safe_low.max_fee, 10);
        assert_eq!(
            fee_options_from_history(50, &[7, 8], &rewards),
            Err(FeeHistoryError::NoBaseFee)
        );
    }

    #[test]
    fn test_fee_options_serialize_camel_case() {
        let rewards = vec![vec![1, 2, 3, 4]];
        let options = fee_options_from_history(5, &[10], &rewards).unwrap();
        let json = serde_json::to_value(options).unwrap();
        assert_eq!(json["safeLow"]["maxFee"], 11);
        assert_eq!(json["estimatedBaseFee"], 10);
        assert_eq!(json["blockNumber"], 5);
    }

    #[test]
    fn test_fee_data_max_fee_doubles_base_fee() {
        let data = FeeData::new(40, 15, 2);
        assert_eq!(data.max_fee_per_gas, 32);
        let json = serde_json::to_value(data).unwrap();
        assert_eq!(json["lastBaseFeePerGas"], 15);
        assert_eq!(json["maxPriorityFeePerGas"], 2);
    }

    #[test]
    fn test_snapshot_flattens_fields_next_to_source() {
        let snapshot = FeeSnapshot::new(ProviderName::Ankr, &FeeData::new(1, 2, 3)).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["source"], "ankr");
        assert_eq!(json["gasPrice"], 1);
        assert_eq!(snapshot.get("maxFeePerGas"), Some(&serde_json::json!(7)));
    }

    #[test]
    fn test_snapshot_source_overrides_body_source() {
        let body = serde_json::json!({"source": "spoofed", "unit": "gwei"});
        let snapshot = FeeSnapshot::from_json(ProviderName::Blocknative, body).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["source"], "blocknative");
        assert_eq!(json["unit"], "gwei");
    }

    #[test]
    fn test_snapshot_rejects_non_objects() {
        let err = FeeSnapshot::from_json(ProviderName::Alchemy, serde_json::json!([1, 2]))
            .unwrap_err();
        assert!(err.to_string().contains("an array"));
    }
}
