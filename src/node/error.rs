/// Reason why a set of quantization options was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// The palette size was zero, which leaves nothing to merge into.
	#[error("palette size must be at least 1")]
	ZeroSize,
	/// The maximum depth would extract a bit past the end of an 8-bit channel.
	#[error("maximum depth {0} is out of range (expected 0 to 7)")]
	DepthOutOfRange(u8),
	/// A merge strategy name was neither `LEAST` nor `MOST`.
	#[error("unknown merge strategy `{0}` (expected LEAST or MOST)")]
	UnknownStrategy(String),
}
