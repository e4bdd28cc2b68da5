// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for fee tier estimation and channel naming

use gasfeed::{fee_options_from_history, ChannelHandle, NamingStrategy, StreamResolver};
use proptest::prelude::*;

mod helpers;
use helpers::RecordingPublisher;

// Rows of four non-decreasing percentile rewards, up to 100 gwei
fn arb_rewards() -> impl Strategy<Value = Vec<Vec<u128>>> {
    prop::collection::vec(
        prop::array::uniform4(0u128..=100_000_000_000u128).prop_map(|mut row| {
            row.sort_unstable();
            row.to_vec()
        }),
        1..=20,
    )
}

proptest! {
    /// Property: every tier's priority fee lies within that percentile's observed range
    #[test]
    fn prop_tiers_within_observed_range(
        oldest in 0u64..=20_000_000,
        base_fee in 0u128..=500_000_000_000u128,
        rewards in arb_rewards(),
    ) {
        let base_fees = vec![base_fee; rewards.len() + 1];
        let options = fee_options_from_history(oldest, &base_fees, &rewards).unwrap();
        let tiers = [options.safe_low, options.standard, options.fast, options.rapid];

        for (i, tier) in tiers.iter().enumerate() {
            let min = rewards.iter().map(|r| r[i]).min().unwrap();
            let max = rewards.iter().map(|r| r[i]).max().unwrap();
            prop_assert!(tier.max_priority_fee >= min && tier.max_priority_fee <= max);
            prop_assert_eq!(tier.max_fee, tier.max_priority_fee + base_fee);
        }
    }

    /// Property: tiers are ordered when every block's percentiles are ordered
    #[test]
    fn prop_tiers_are_monotonic(rewards in arb_rewards()) {
        let options = fee_options_from_history(1, &vec![0; rewards.len() + 1], &rewards).unwrap();
        prop_assert!(options.safe_low.max_priority_fee <= options.standard.max_priority_fee);
        prop_assert!(options.standard.max_priority_fee <= options.fast.max_priority_fee);
        prop_assert!(options.fast.max_priority_fee <= options.rapid.max_priority_fee);
    }

    /// Property: the reported block and base fee are those of the newest block of the window
    #[test]
    fn prop_block_number_is_window_end(oldest in 0u64..=20_000_000, rewards in arb_rewards()) {
        let base_fees: Vec<u128> = (0..=rewards.len() as u128).collect();
        let options = fee_options_from_history(oldest, &base_fees, &rewards).unwrap();
        prop_assert_eq!(options.block_number, oldest + rewards.len() as u64 - 1);
        prop_assert_eq!(options.estimated_base_fee, rewards.len() as u128 - 1);
    }

    /// Property: SUFFIX channel names are exactly prefix + stream name
    #[test]
    fn prop_suffix_channel_is_prefix_plus_stream(
        prefix in "[a-z0-9/]{0,12}",
        stream in "[a-z0-9/-]{1,24}",
    ) {
        let publisher = RecordingPublisher::new();
        let resolver = StreamResolver::new(&publisher, &prefix, NamingStrategy::Suffix);
        prop_assert_eq!(resolver.channel_name(&stream), format!("{prefix}{stream}"));

        let shared = StreamResolver::new(&publisher, &prefix, NamingStrategy::Ignore);
        prop_assert_eq!(shared.channel_name(&stream), prefix.clone());
    }
}

#[tokio::test]
async fn test_suffix_binding_maps_each_stream_to_its_channel() {
    let publisher = RecordingPublisher::new();
    let streams = vec!["gas-station/polygon".to_string(), "gas-station/base".to_string()];
    let binding = StreamResolver::new(&publisher, "p/", NamingStrategy::Suffix)
        .resolve(&streams)
        .await
        .unwrap();

    assert_eq!(binding.stream_count(), 2);
    assert_eq!(
        binding.channel("gas-station/base"),
        Some(&ChannelHandle::new("p/gas-station/base"))
    );
    assert_eq!(binding.distinct_channels(), 2);

    let shared = StreamResolver::new(&publisher, "p", NamingStrategy::DataProperty)
        .resolve(&streams)
        .await
        .unwrap();
    assert_eq!(shared.distinct_channels(), 1);
}
