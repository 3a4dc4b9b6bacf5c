pub mod average;
pub mod error;
pub mod merge;
pub mod quantize;

use quantize::options::QuantizeOptions;
use quantize::palette::Color;

/// Returns bit `7 - depth` of a channel, so depth 0 is the most significant bit.
fn bit(n: u8, depth: u8) -> usize {
	((n >> (7 - depth)) & 1) as usize
}

/// Child slot a color descends into below a branch at `depth`.
///
/// One bit is taken from each channel: `r << 2 | g << 1 | b`.
/// `depth` must be at most 7.
pub fn child_index(color: &Color, depth: u8) -> usize {
	bit(color.0[0], depth) << 2 | bit(color.0[1], depth) << 1 | bit(color.0[2], depth)
}

/// Node in an octree over the RGB color cube.
///
/// A branch owns up to eight children, one per combination of the
/// channels' bits at its depth. A leaf holds a finalized (possibly
/// averaged) color.
///
/// `count` is the number of pixels that passed through or ended at the node.
#[derive(Clone, Debug, PartialEq)]
pub enum OctreeNode {
	Branch {
		count: u64,
		children: [Option<Box<OctreeNode>>; 8],
	},
	Leaf {
		color: Color,
		count: u64,
	},
}

impl Default for OctreeNode {
	fn default() -> Self {
		OctreeNode::Branch { count: 0, children: Default::default() }
	}
}

impl OctreeNode {
	pub fn count(&self) -> u64 {
		match self {
			OctreeNode::Branch { count, .. } | OctreeNode::Leaf { count, .. } => *count,
		}
	}

	pub fn is_leaf(&self) -> bool {
		matches!(self, OctreeNode::Leaf { .. })
	}

	/// The stored color, if this is a leaf.
	pub fn color(&self) -> Option<Color> {
		match self {
			OctreeNode::Leaf { color, .. } => Some(*color),
			OctreeNode::Branch { .. } => None,
		}
	}

	/// Present children in ascending slot order. Leaves have none.
	pub fn children(&self) -> impl Iterator<Item = (usize, &OctreeNode)> {
		let slots: &[Option<Box<OctreeNode>>] = match self {
			OctreeNode::Branch { children, .. } => children,
			OctreeNode::Leaf { .. } => &[],
		};
		slots.iter()
			.enumerate()
			.filter_map(|(ind, c)| c.as_deref().map(|c| (ind, c)))
	}

	/// Collects every leaf below (or at) this node, depth-first in slot order.
	pub fn leaves<'a>(&'a self, out: &mut Vec<&'a OctreeNode>) {
		if self.is_leaf() {
			out.push(self);
		} else {
			self.children().for_each(|(_, c)| c.leaves(out));
		}
	}

	pub fn leaf_count(&self) -> usize {
		if self.is_leaf() {
			1
		} else {
			self.children().map(|(_, c)| c.leaf_count()).sum()
		}
	}

	/// Walks `color` down from this node, sitting at `depth`, incrementing
	/// every count on the way.
	///
	/// Missing branches are created as needed; below a branch at `max_depth`
	/// a leaf is created instead. Descent stops at the first leaf reached,
	/// whose color is left alone.
	///
	/// Returns whether a new leaf was created.
	fn descend(&mut self, color: Color, depth: u8, max_depth: u8) -> bool {
		match self {
			OctreeNode::Leaf { count, .. } => {
				*count += 1;
				false
			},
			OctreeNode::Branch { count, children } => {
				*count += 1;
				let slot = &mut children[child_index(&color, depth)];
				if slot.is_none() && depth == max_depth {
					*slot = Some(Box::new(OctreeNode::Leaf { color, count: 1 }));
					return true;
				}
				slot.get_or_insert_with(Default::default)
					.descend(color, depth + 1, max_depth)
			}
		}
	}
}

/// Size- and depth-bounded octree that builds a palette one pixel at a time.
///
/// The leaf budget is checked before every insertion; once it is exceeded,
/// the deepest branches are collapsed (see `merge`) until it is met again.
/// The tree can therefore hold `size + 1` leaves right after an insertion.
#[derive(Clone, Debug)]
pub struct Octree {
	root: OctreeNode,
	options: QuantizeOptions,
	leaf_count: usize,
}

impl Octree {
	pub fn new(options: QuantizeOptions) -> Self {
		Octree { root: Default::default(), options, leaf_count: 0 }
	}

	pub fn options(&self) -> &QuantizeOptions {
		&self.options
	}

	pub fn root(&self) -> &OctreeNode {
		&self.root
	}

	pub(crate) fn root_mut(&mut self) -> &mut OctreeNode {
		&mut self.root
	}

	/// Number of leaves currently in the tree.
	pub fn leaf_count(&self) -> usize {
		self.leaf_count
	}

	pub(crate) fn forget_leaves(&mut self, removed: usize) {
		self.leaf_count -= removed;
	}

	/// Inserts one pixel's color, merging first if the tree is over budget.
	///
	/// Results depend on insertion order: the same stream always builds the
	/// same tree, but a reordered stream may merge different clusters.
	pub fn insert(&mut self, color: Color) {
		while self.leaf_count > self.options.size() {
			if !self.merge() {
				break;
			}
		}
		if self.root.descend(color, 0, self.options.max_depth()) {
			self.leaf_count += 1;
		}
	}

	/// All leaves, depth-first in ascending slot order.
	pub fn leaves(&self) -> Vec<&OctreeNode> {
		let mut out = Vec::with_capacity(self.leaf_count);
		self.root.leaves(&mut out);
		out
	}

	/// Colors of all leaves, in the same order as `leaves`.
	pub fn palette(&self) -> Vec<Color> {
		self.leaves().iter().filter_map(|l| l.color()).collect()
	}
}
