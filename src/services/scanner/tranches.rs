//! Partitioning of the scanned block window into log search tranches.

use crate::models::BlockRange;

/// Splits `[start, latest]` into contiguous ranges of at most `size` blocks
///
/// Returns no tranche when `start` is past `latest`. A `size` of 0 is treated as 1.
pub fn plan_block_tranches(start: u64, latest: u64, size: u64) -> Vec<BlockRange> {
	let size = size.max(1);
	let mut tranches = Vec::new();
	let mut from_block = start;

	while from_block <= latest {
		let to_block = from_block.saturating_add(size - 1).min(latest);
		tranches.push(BlockRange::new(from_block, to_block));
		match to_block.checked_add(1) {
			Some(next) => from_block = next,
			None => break,
		}
	}

	tranches
}

/// Restricts `tranches` to the blocks at or after `start`
///
/// Tranches entirely before `start` are dropped and the one containing it is cut.
pub fn tranches_from(tranches: &[BlockRange], start: u64) -> Vec<BlockRange> {
	tranches
		.iter()
		.filter(|range| range.to_block >= start)
		.map(|range| BlockRange::new(range.from_block.max(start), range.to_block))
		.collect()
}
