use super::OctreeNode;
use super::quantize::palette::Color;

/// Per-channel sums of color weighted by pixel count.
type BigColor = [u64; 3];

fn color_mul(a: &Color, n: u64) -> BigColor {
	[
		a.0[0] as u64 * n,
		a.0[1] as u64 * n,
		a.0[2] as u64 * n,
	]
}

fn color_add_big(a: BigColor, b: BigColor) -> BigColor {
	[a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn color_div(a: BigColor, n: u64) -> Color {
	image::Rgb([
		(a[0] / n) as u8,
		(a[1] / n) as u8,
		(a[2] / n) as u8,
	])
}

impl OctreeNode {
	/// Pixel-count-weighted average of every leaf color below this node,
	/// along with the total count of those leaves.
	///
	/// Channels are averaged in their native 8-bit range and truncated.
	/// Returns `None` for a subtree without any leaves.
	pub fn average(&self) -> Option<(Color, u64)> {
		match self {
			OctreeNode::Leaf { color, count } => Some((*color, *count)),
			OctreeNode::Branch { .. } => {
				let (sum, total) = self.children()
					.filter_map(|(_, c)| c.average())
					.fold(([0; 3], 0), |(sum, total), (color, count)|
						(color_add_big(sum, color_mul(&color, count)), total + count));
				if total == 0 {
					None
				} else {
					Some((color_div(sum, total), total))
				}
			}
		}
	}

	/// Replaces a branch and everything below it with a single leaf holding
	/// the subtree's average color.
	///
	/// The new leaf's count is the sum of the old leaves' counts, not the
	/// branch's own counter.
	///
	/// Returns how many leaves the tree lost, or `None` if nothing changed
	/// (the node is already a leaf, or has no leaves below it).
	pub fn collapse(&mut self) -> Option<usize> {
		if self.is_leaf() {
			return None;
		}
		let (color, count) = self.average()?;
		let removed = self.leaf_count() - 1;
		*self = OctreeNode::Leaf { color, count };
		Some(removed)
	}
}
