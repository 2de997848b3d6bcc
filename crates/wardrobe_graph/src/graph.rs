//! Blocking graph - which slots each item of a set blocks
//!
//! A graph is built per ordering request and discarded afterwards.

use crate::error::{GraphError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use wardrobe_core::GroupName;
use wardrobe_inventory::{AssetCatalog, Character, ItemDescriptor};

/// A slot in the graph
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockNode {
    /// Slot this node stands for
    pub group: GroupName,
    /// Slots the occupying item blocks
    pub blocks: BTreeSet<GroupName>,
    /// Resolved priority; fixed once set
    priority: Option<u32>,
}

impl BlockNode {
    /// Create an unresolved node
    pub fn new(group: GroupName, blocks: BTreeSet<GroupName>) -> Self {
        Self {
            group,
            blocks,
            priority: None,
        }
    }

    /// Resolved priority, if resolution has run
    pub fn priority(&self) -> Option<u32> {
        self.priority
    }
}

/// Traversal state of a slot during resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// One stack frame of the post-order walk
struct Frame {
    group: GroupName,
    children: Vec<GroupName>,
    next: usize,
}

/// Graph of blocking relationships keyed by slot
#[derive(Clone, Debug, Default)]
pub struct BlockGraph {
    nodes: BTreeMap<GroupName, BlockNode>,
    evaluations: usize,
}

impl BlockGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for an item set.
    ///
    /// Every descriptor must resolve; the first that does not aborts the
    /// build. Only interactive slots become nodes. A later descriptor for
    /// the same slot replaces the earlier one.
    pub fn build(
        items: &[ItemDescriptor],
        character: &Character,
        catalog: &dyn AssetCatalog,
    ) -> Result<Self> {
        let mut graph = Self::new();

        for item in items {
            let asset = catalog
                .resolve(&character.family, &item.group, &item.name)
                .ok_or_else(|| GraphError::UnknownAsset {
                    family: character.family.clone(),
                    group: item.group.clone(),
                    name: item.name.clone(),
                })?;

            if !asset.group.category.is_item() {
                continue;
            }

            let mut blocks: BTreeSet<GroupName> = asset.block.iter().cloned().collect();
            if let Some(type_name) = &item.type_name {
                if let Some(baseline) = catalog.baseline_property(&asset, character, type_name) {
                    blocks.extend(baseline.block());
                }
            }

            graph.insert(asset.group.name.clone(), blocks);
        }

        Ok(graph)
    }

    /// Add or replace a node.
    ///
    /// A slot listing itself is dropped from its own block set.
    pub fn insert(&mut self, group: GroupName, mut blocks: BTreeSet<GroupName>) {
        if blocks.remove(&group) {
            log::debug!("Ignoring self-block on {}", group);
        }
        self.nodes.insert(group.clone(), BlockNode::new(group, blocks));
    }

    /// Get a node
    pub fn get(&self, group: &GroupName) -> Option<&BlockNode> {
        self.nodes.get(group)
    }

    /// Check if a slot is in the graph
    pub fn contains(&self, group: &GroupName) -> bool {
        self.nodes.contains_key(group)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &BlockNode> {
        self.nodes.values()
    }

    /// Get node count
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of node priorities computed so far
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Resolve every node's priority.
    ///
    /// A node blocking nothing in the graph gets 0; any other node gets one
    /// more than the highest priority among the nodes it blocks. Blocked
    /// slots absent from the graph count as already clear. Each node is
    /// computed once; the walk keeps its own stack so deep chains do not
    /// grow the call stack.
    pub fn resolve(&mut self) -> Result<BTreeMap<GroupName, u32>> {
        let mut state: HashMap<GroupName, Visit> = self
            .nodes
            .values()
            .filter(|node| node.priority.is_some())
            .map(|node| (node.group.clone(), Visit::Done))
            .collect();

        let roots: Vec<GroupName> = self.nodes.keys().cloned().collect();
        for root in roots {
            if state.contains_key(&root) {
                continue;
            }
            state.insert(root.clone(), Visit::InProgress);
            let mut stack = vec![self.frame(root)];

            while let Some(frame) = stack.last_mut() {
                if frame.next < frame.children.len() {
                    let child = frame.children[frame.next].clone();
                    frame.next += 1;

                    match state.get(&child).copied() {
                        Some(Visit::Done) => {}
                        Some(Visit::InProgress) => {
                            let start = stack
                                .iter()
                                .position(|f| f.group == child)
                                .unwrap_or(0);
                            let groups = stack[start..].iter().map(|f| f.group.clone()).collect();
                            return Err(GraphError::Cycle { groups });
                        }
                        None => {
                            state.insert(child.clone(), Visit::InProgress);
                            let next = self.frame(child);
                            stack.push(next);
                        }
                    }
                    continue;
                }

                if let Some(done) = stack.pop() {
                    let priority = done
                        .children
                        .iter()
                        .filter_map(|child| self.nodes.get(child).and_then(|n| n.priority))
                        .map(|p| p + 1)
                        .max()
                        .unwrap_or(0);
                    if let Some(node) = self.nodes.get_mut(&done.group) {
                        node.priority = Some(priority);
                    }
                    self.evaluations += 1;
                    state.insert(done.group, Visit::Done);
                }
            }
        }

        Ok(self
            .nodes
            .values()
            .filter_map(|node| node.priority.map(|p| (node.group.clone(), p)))
            .collect())
    }

    /// Start a frame for a node, following only edges into the graph
    fn frame(&self, group: GroupName) -> Frame {
        let children = self
            .nodes
            .get(&group)
            .map(|node| {
                node.blocks
                    .iter()
                    .filter(|b| self.nodes.contains_key(*b))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Frame {
            group,
            children,
            next: 0,
        }
    }
}
