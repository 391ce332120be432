use proptest::{prelude::*, test_runner::Config};
use token_list_sync::services::scanner::{plan_block_tranches, tranches_from};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_tranches_cover_window_exactly(
		start in 0u64..10_000,
		span in 0u64..10_000,
		size in 1u64..2_000,
	) {
		let latest = start + span;
		let tranches = plan_block_tranches(start, latest, size);

		prop_assert_eq!(tranches.first().map(|t| t.from_block), Some(start));
		prop_assert_eq!(tranches.last().map(|t| t.to_block), Some(latest));
		for tranche in &tranches {
			prop_assert!(tranche.from_block <= tranche.to_block);
			prop_assert!(tranche.len() <= size);
		}
		for pair in tranches.windows(2) {
			prop_assert_eq!(pair[0].to_block + 1, pair[1].from_block);
		}
	}

	#[test]
	fn test_tranches_from_keeps_later_blocks(
		span in 0u64..5_000,
		size in 1u64..500,
		start in 0u64..6_000,
	) {
		let tranches = plan_block_tranches(0, span, size);
		let remaining = tranches_from(&tranches, start);

		for tranche in &remaining {
			prop_assert!(tranche.to_block >= start);
		}
		prop_assert_eq!(
			remaining.len(),
			tranches.iter().filter(|t| t.to_block >= start).count()
		);
	}
}
