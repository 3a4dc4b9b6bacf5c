use crate::node::error::ConfigError;
use crate::node::merge::Strategy;

/// Validated settings for one quantization run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantizeOptions {
	size: usize,
	max_depth: u8,
	strategy: Strategy,
}

impl QuantizeOptions {
	/// Deepest usable level; one bit of each 8-bit channel is used per level.
	pub const MAX_DEPTH: u8 = 7;

	/// `size` bounds the number of palette entries (with a transient
	/// overshoot of one) and must be at least 1. `max_depth` bounds the
	/// depth of branches in the tree and must be at most `MAX_DEPTH`.
	pub fn new(size: usize, max_depth: u8, strategy: Strategy) -> Result<Self, ConfigError> {
		if size == 0 {
			return Err(ConfigError::ZeroSize);
		}
		if max_depth > Self::MAX_DEPTH {
			return Err(ConfigError::DepthOutOfRange(max_depth));
		}
		Ok(QuantizeOptions { size, max_depth, strategy })
	}

	pub fn size(&self) -> usize {
		self.size
	}

	pub fn max_depth(&self) -> u8 {
		self.max_depth
	}

	pub fn strategy(&self) -> Strategy {
		self.strategy
	}
}

impl Default for QuantizeOptions {
	fn default() -> Self {
		QuantizeOptions { size: 64, max_depth: Self::MAX_DEPTH, strategy: Strategy::Least }
	}
}
