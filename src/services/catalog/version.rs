use crate::models::SemVer;

/// Next published version: `1.0.0` for a first publication, otherwise a major bump
///
/// The major saturates, so `u64::MAX.0.0` is the one version returned unchanged.
/// Reaching it would take more publications than the chain has blocks.
pub fn bump_version(previous: Option<&SemVer>) -> SemVer {
	match previous {
		None => SemVer::default(),
		Some(previous) => SemVer::new(previous.major.saturating_add(1), 0, 0),
	}
}
