//! This helper function is part of the huffman encoding system.
//!
//! It turns the sorted symbol counts of a block into code lengths (tree depths). No priority
//! queue is needed: with the leaves sorted by weight, the merged nodes come out in
//! non-decreasing weight order, so the two lightest available nodes are always at the front of
//! either the remaining leaves or the internal nodes created so far.
//!
//! Nodes live in one arena indexed by plain integers. Leaves are 0..n-1 (in sorted order,
//! heaviest first), internal nodes n..2n-2, and the root is the last one created. Each merge
//! stores the parent index of both children, and a backward pass turns parent links into
//! depths.
//!

use log::trace;

use super::canonical::CodeLengths;
use crate::error::Result;
use crate::tools::freq_count::SymbolCount;
use crate::tools::scratch::try_vec;
use crate::{MAX_CODE_LEN, SYMBOLS};

/// Node slots for one tree, allocated once per encoder.
pub struct TreeArena {
    weight: Vec<u32>,
    parent: Vec<u16>,
    depth: Vec<u32>,
}

impl TreeArena {
    pub fn new() -> Result<Self> {
        Ok(Self {
            weight: try_vec(SYMBOLS * 2, 0)?,
            parent: try_vec(SYMBOLS * 2, 0)?,
            depth: try_vec(SYMBOLS * 2, 0)?,
        })
    }

    /// Build the tree for `sorted` (descending count, at least two symbols, none above
    /// `max_symbol`), store the natural lengths, clamped to 12, in `lengths` and return the
    /// overflow count: every node deeper than 12, internal or leaf. The count is always even.
    pub fn code_lengths(
        &mut self,
        sorted: &[SymbolCount],
        max_symbol: u8,
        lengths: &mut CodeLengths,
    ) -> u32 {
        let n = sorted.len();
        debug_assert!((2..=SYMBOLS).contains(&n));

        for (slot, sym) in self.weight.iter_mut().zip(sorted) {
            *slot = sym.count;
        }

        // Leaves [0, leaves) are unmerged, the lightest one is at leaves - 1.
        // Internal nodes [node, created) are unmerged, the lightest one is at node.
        let mut leaves = n;
        let mut node = n;
        for created in n..2 * n - 1 {
            let a = self.lightest(&mut leaves, &mut node, created);
            let b = self.lightest(&mut leaves, &mut node, created);
            self.weight[created] = self.weight[a] + self.weight[b];
            self.parent[a] = created as u16;
            self.parent[b] = created as u16;
        }

        let root = 2 * n - 2;
        let mut overflow = 0;
        self.depth[root] = 0;
        for i in (n..root).rev() {
            let depth = self.depth[self.parent[i] as usize] + 1;
            overflow += (depth > MAX_CODE_LEN as u32) as u32;
            self.depth[i] = depth;
        }

        lengths.clear();
        for (i, sym) in sorted.iter().enumerate() {
            let mut depth = self.depth[self.parent[i] as usize] + 1;
            if depth > MAX_CODE_LEN as u32 {
                depth = MAX_CODE_LEN as u32;
                overflow += 1;
            }
            self.depth[i] = depth;
            lengths.counts[depth as usize] += 1;
            lengths.lengths[sym.symbol as usize] = depth as u8;
        }

        // The lightest leaf is always among the deepest.
        lengths.max_length = self.depth[n - 1];
        lengths.symbol_count = n;
        lengths.max_symbol = max_symbol;
        trace!(
            "\nTree for {} symbols: max length {}, overflow {}",
            n,
            lengths.max_length,
            overflow
        );
        overflow
    }

    /// Take the lightest unmerged node. Ties go to the leaf.
    #[inline(always)]
    fn lightest(&self, leaves: &mut usize, node: &mut usize, created: usize) -> usize {
        let leaf_ok = *leaves > 0;
        let node_ok = *node < created;
        if leaf_ok && (!node_ok || self.weight[*leaves - 1] <= self.weight[*node]) {
            *leaves -= 1;
            *leaves
        } else {
            *node += 1;
            *node - 1
        }
    }
}
