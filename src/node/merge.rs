use super::error::ConfigError;
use super::{Octree, OctreeNode};

use std::str::FromStr;

/// Slot indices leading from the root to a node.
pub type NodePath = Vec<usize>;

/// Which of the deepest branches gets collapsed when the tree is over budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
	/// Collapse the branch seen by the fewest pixels.
	Least,
	/// Collapse the branch seen by the most pixels.
	Most,
}

impl Default for Strategy {
	fn default() -> Self {
		Strategy::Least
	}
}

impl FromStr for Strategy {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"LEAST" => Ok(Strategy::Least),
			"MOST" => Ok(Strategy::Most),
			_ => Err(ConfigError::UnknownStrategy(s.to_string())),
		}
	}
}

impl Strategy {
	/// Whether a candidate with count `a` should replace the current pick `b`.
	///
	/// Strict, so the first candidate wins ties.
	fn prefers(self, a: u64, b: u64) -> bool {
		match self {
			Strategy::Least => a < b,
			Strategy::Most => a > b,
		}
	}
}

impl Octree {
	/// The deepest level of the tree that still consists of branches only.
	///
	/// Starting from the root, the level is repeatedly replaced by the
	/// branch children of all its nodes until that would leave it empty.
	/// Every returned branch therefore has only leaves (or nothing) below it.
	/// Nodes come back in traversal order along with their paths.
	pub fn deepest_branches(&self) -> Vec<(NodePath, &OctreeNode)> {
		let mut level = vec![(NodePath::new(), self.root())];
		loop {
			let next = level.iter()
				.flat_map(|&(ref path, node)| node.children()
					.filter(|(_, c)| !c.is_leaf())
					.map(move |(ind, c)| {
						let mut p = path.clone();
						p.push(ind);
						(p, c)
					}))
				.collect::<Vec<_>>();
			if next.is_empty() {
				return level;
			}
			level = next;
		}
	}

	/// Picks the deepest branch to collapse according to the strategy.
	///
	/// Returns `None` if the tree is a single leaf.
	pub fn select_merge(&self) -> Option<NodePath> {
		let strategy = self.options().strategy();
		self.deepest_branches()
			.into_iter()
			.filter(|(_, node)| !node.is_leaf())
			.fold(None, |pick: Option<(NodePath, u64)>, (path, node)| match pick {
				Some((_, best)) if !strategy.prefers(node.count(), best) => pick,
				_ => Some((path, node.count())),
			})
			.map(|(path, _)| path)
	}

	fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut OctreeNode> {
		path.iter().try_fold(self.root_mut(), |node, ind| match node {
			OctreeNode::Branch { children, .. } => children[*ind].as_deref_mut(),
			OctreeNode::Leaf { .. } => None,
		})
	}

	/// Collapses one branch into an averaged leaf.
	///
	/// Returns `false` if there was nothing to collapse.
	pub fn merge(&mut self) -> bool {
		let path = match self.select_merge() {
			Some(p) => p,
			None => return false,
		};
		let node = match self.node_at_mut(&path) {
			Some(n) => n,
			None => return false,
		};
		let count = node.count();
		match node.collapse() {
			Some(removed) => {
				tracing::trace!(?path, count, removed, "Collapsed branch");
				self.forget_leaves(removed);
				true
			},
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::quantize::options::QuantizeOptions;

	fn tree(size: usize, max_depth: u8, strategy: Strategy) -> Octree {
		Octree::new(QuantizeOptions::new(size, max_depth, strategy).unwrap())
	}

	/// Two branches below the root at depth 1: slot 0 with count 3 and two
	/// leaves, slot 4 with count 1 and one leaf.
	fn two_branches(strategy: Strategy) -> Octree {
		let mut t = tree(8, 1, strategy);
		t.insert(image::Rgb([0, 0, 0]));
		t.insert(image::Rgb([0, 0, 0]));
		t.insert(image::Rgb([64, 0, 0]));
		t.insert(image::Rgb([128, 0, 0]));
		t
	}

	#[test]
	fn parses_strategy_names() {
		assert_eq!("LEAST".parse(), Ok(Strategy::Least));
		assert_eq!("most".parse(), Ok(Strategy::Most));
		assert_eq!(
			"median".parse::<Strategy>(),
			Err(ConfigError::UnknownStrategy("median".to_string()))
		);
	}

	#[test]
	fn deepest_level_of_root_only_tree_is_root() {
		let mut t = tree(8, 0, Strategy::Least);
		t.insert(image::Rgb([0, 0, 0]));
		t.insert(image::Rgb([255, 255, 255]));
		let deepest = t.deepest_branches();
		assert_eq!(deepest.len(), 1);
		assert_eq!(deepest[0].0, NodePath::new());
		assert_eq!(deepest[0].1.count(), 2);
	}

	#[test]
	fn deepest_level_in_traversal_order() {
		let t = two_branches(Strategy::Least);
		let deepest = t.deepest_branches()
			.into_iter()
			.map(|(path, node)| (path, node.count()))
			.collect::<Vec<_>>();
		assert_eq!(deepest, vec![(vec![0], 3), (vec![4], 1)]);
	}

	#[test]
	fn deepest_level_skips_collapsed_paths() {
		let mut t = tree(1, 2, Strategy::Least);
		t.insert(image::Rgb([0, 0, 0]));
		t.insert(image::Rgb([128, 0, 0]));
		let deepest = t.deepest_branches()
			.into_iter()
			.map(|(path, _)| path)
			.collect::<Vec<_>>();
		assert_eq!(deepest, vec![vec![0, 0], vec![4, 0]]);

		// Collapsing [0, 0] frees no leaves, and leaves [0] as a branch over
		// leaves only, but [4, 0] is still deeper.
		assert!(t.merge());
		assert_eq!(t.leaf_count(), 2);
		let deepest = t.deepest_branches()
			.into_iter()
			.map(|(path, _)| path)
			.collect::<Vec<_>>();
		assert_eq!(deepest, vec![vec![4, 0]]);
	}

	#[test]
	fn strategies_pick_opposite_ends() {
		assert_eq!(two_branches(Strategy::Least).select_merge(), Some(vec![4]));
		assert_eq!(two_branches(Strategy::Most).select_merge(), Some(vec![0]));
	}

	#[test]
	fn first_candidate_wins_ties() {
		for strategy in [Strategy::Least, Strategy::Most].iter() {
			let mut t = tree(8, 1, *strategy);
			t.insert(image::Rgb([0, 0, 0]));
			t.insert(image::Rgb([128, 0, 0]));
			assert_eq!(t.select_merge(), Some(vec![0]));
		}
	}

	#[test]
	fn merge_updates_leaf_count() {
		let mut t = two_branches(Strategy::Most);
		assert_eq!(t.leaf_count(), 3);
		assert!(t.merge());
		assert_eq!(t.leaf_count(), 2);
		assert_eq!(t.palette(), vec![image::Rgb([21, 0, 0]), image::Rgb([128, 0, 0])]);
	}

	#[test]
	fn nothing_to_merge_in_single_leaf() {
		let mut t = tree(1, 0, Strategy::Least);
		t.insert(image::Rgb([0, 0, 0]));
		t.insert(image::Rgb([255, 0, 0]));
		assert!(t.merge());
		assert!(t.root().is_leaf());
		assert_eq!(t.select_merge(), None);
		assert!(!t.merge());
	}
}
