//! In-memory relationship graph between communities.
//!
//! The graph is undirected and kept acyclic: an edge is only added when its endpoints are
//! not already connected. This makes "no cycles" and "no explicit relationship with an
//! inherited community" the same rule. Neighbours keep the order their edges were added.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

use crate::{
    config::TraversalLimits,
    error::{business::BusinessRuleError, AppError},
    model::{community::PrivacyLevel, relationship::InheritedRelationship},
    service::quota::QuotaEnforcer,
};

/// Attributes of a community the graph rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityNode {
    pub name: String,
    pub privacy_level: PrivacyLevel,
    pub is_active: bool,
}

/// Outcome of a graph mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeChange {
    Added,
    Removed,
    /// The graph already had the requested shape.
    Unchanged,
}

/// Options for walking inherited relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InheritOptions {
    /// Yield and walk through inactive communities.
    pub include_inactive: bool,
    pub limits: TraversalLimits,
}

#[derive(Debug, Clone)]
pub struct RelationshipGraph {
    nodes: HashMap<i32, CommunityNode>,
    adjacency: HashMap<i32, Vec<i32>>,
    quotas: QuotaEnforcer,
}

impl RelationshipGraph {
    /// Creates an empty graph whose edges per community are capped by `quotas`.
    pub fn new(quotas: QuotaEnforcer) -> Self {
        Self {
            nodes: HashMap::new(),
            adjacency: HashMap::new(),
            quotas,
        }
    }

    /// Adds or replaces a community.
    pub fn insert_community(&mut self, id: i32, node: CommunityNode) {
        self.nodes.insert(id, node);
        self.adjacency.entry(id).or_default();
    }

    /// Appends `to` to the neighbours of `from` without checking any rule.
    ///
    /// Used when loading stored rows, where each row is one direction of an edge.
    pub(crate) fn load_direction(&mut self, from: i32, to: i32) {
        let neighbours = self.adjacency.entry(from).or_default();
        if !neighbours.contains(&to) {
            neighbours.push(to);
        }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: i32) -> Option<&CommunityNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn neighbours(&self, id: i32) -> &[i32] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, id: i32) -> usize {
        self.neighbours(id).len()
    }

    pub fn has_edge(&self, a: i32, b: i32) -> bool {
        self.neighbours(a).contains(&b)
    }

    /// Adds the edge `a <-> b`.
    ///
    /// Rules are checked in order: no self edge, an existing edge is left unchanged,
    /// both endpoints below the relationship limit, privacy compatibility in both
    /// orientations, and `b` not already reachable from `a`.
    ///
    /// # Returns
    /// - `Ok(EdgeChange::Added)` - Edge inserted on both sides
    /// - `Ok(EdgeChange::Unchanged)` - Edge already present
    /// - `Err(AppError::BusinessRule)` - Self edge, privacy conflict or inherited community
    /// - `Err(AppError::QuotaExceeded)` - One endpoint is at the relationship limit
    /// - `Err(AppError::ResourceNotFound)` - An endpoint is not in the graph
    pub fn add_relationship(&mut self, a: i32, b: i32) -> Result<EdgeChange, AppError> {
        if a == b {
            return Err(BusinessRuleError::SelfRelationship { community_id: a }.into());
        }

        let (node_a, node_b) = match (self.nodes.get(&a), self.nodes.get(&b)) {
            (Some(node_a), Some(node_b)) => (node_a, node_b),
            (None, _) => return Err(AppError::not_found("community", a)),
            (_, None) => return Err(AppError::not_found("community", b)),
        };

        if self.has_edge(a, b) {
            return Ok(EdgeChange::Unchanged);
        }

        for id in [a, b] {
            self.quotas.check_relationships(id, self.degree(id) as u64)?;
        }

        match (node_a.privacy_level, node_b.privacy_level) {
            (PrivacyLevel::Private, PrivacyLevel::Public) => {
                return Err(BusinessRuleError::PrivacyIncompatible {
                    private_id: a,
                    public_id: b,
                }
                .into())
            }
            (PrivacyLevel::Public, PrivacyLevel::Private) => {
                return Err(BusinessRuleError::PrivacyIncompatible {
                    private_id: b,
                    public_id: a,
                }
                .into())
            }
            _ => {}
        }

        if self.is_reachable(a, b) {
            return Err(BusinessRuleError::InheritedRelationship {
                community_id: a,
                related_id: b,
            }
            .into());
        }

        self.load_direction(a, b);
        self.load_direction(b, a);

        Ok(EdgeChange::Added)
    }

    /// Removes the edge `a <-> b` unless other communities depend on it.
    ///
    /// # Returns
    /// - `Ok(EdgeChange::Removed)` - Edge removed from both sides
    /// - `Ok(EdgeChange::Unchanged)` - No such edge
    /// - `Err(AppError::BusinessRule)` - Removal would cut dependent communities off from `b`
    pub fn remove_relationship(&mut self, a: i32, b: i32) -> Result<EdgeChange, AppError> {
        if !self.has_edge(a, b) {
            return Ok(EdgeChange::Unchanged);
        }

        let dependents = self.dependents(a, b);
        if !dependents.is_empty() {
            return Err(BusinessRuleError::DependentCommunities {
                community_id: a,
                related_id: b,
                dependents,
            }
            .into());
        }

        if let Some(neighbours) = self.adjacency.get_mut(&a) {
            neighbours.retain(|&id| id != b);
        }
        if let Some(neighbours) = self.adjacency.get_mut(&b) {
            neighbours.retain(|&id| id != a);
        }

        Ok(EdgeChange::Removed)
    }

    /// Communities other than `a` and `b` that reach `a` without the edge `a <-> b` but
    /// would no longer reach `b` once it is removed, in discovery order.
    pub fn dependents(&self, a: i32, b: i32) -> Vec<i32> {
        let excluded = (a, b);
        let from_a = self.reachable_from(a, Some(excluded));
        let from_b: HashSet<i32> = self.reachable_from(b, Some(excluded)).into_iter().collect();

        from_a
            .into_iter()
            .filter(|id| *id != a && *id != b && !from_b.contains(id))
            .collect()
    }

    /// Whether `to` can be reached from `from`, through active and inactive communities.
    pub fn is_reachable(&self, from: i32, to: i32) -> bool {
        from != to && self.reachable_from(from, None).contains(&to)
    }

    /// Depth-first discovery order of every community reachable from `start`, including
    /// `start`, optionally ignoring one edge.
    fn reachable_from(&self, start: i32, excluded: Option<(i32, i32)>) -> Vec<i32> {
        let mut visited = HashSet::from([start]);
        let mut order = vec![start];
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            for &next in self.neighbours(current).iter().rev() {
                let is_excluded = excluded
                    .is_some_and(|(x, y)| (current == x && next == y) || (current == y && next == x));
                if is_excluded || !visited.insert(next) {
                    continue;
                }
                order.push(next);
                stack.push(next);
            }
        }

        order
    }

    /// Walks the communities inherited from `root`, borrowing the graph.
    pub fn inherited(&self, root: i32, options: InheritOptions) -> InheritedRelationships<&Self> {
        InheritedRelationships::new(self, root, options)
    }

    /// Walks the communities inherited from `root`, taking ownership of the graph.
    pub fn into_inherited(self, root: i32, options: InheritOptions) -> InheritedRelationships {
        InheritedRelationships::new(self, root, options)
    }
}

struct Frame {
    community_id: i32,
    next_child: usize,
    depth: usize,
}

/// Lazy depth-first walk over the communities reachable from a root.
///
/// The root itself is not yielded. Each community is yielded at most once, children in
/// stored order. Inactive communities are skipped and not walked through unless
/// `include_inactive` is set. The walk stops early when it reaches `max_nodes` yielded
/// communities, and does not descend below `max_depth`; [`is_truncated`] reports
/// whether either bound left communities unvisited.
///
/// [`is_truncated`]: InheritedRelationships::is_truncated
pub struct InheritedRelationships<G: Borrow<RelationshipGraph> = RelationshipGraph> {
    graph: G,
    options: InheritOptions,
    stack: Vec<Frame>,
    path: Vec<i32>,
    visited: HashSet<i32>,
    emitted: usize,
    truncated: bool,
}

impl<G: Borrow<RelationshipGraph>> InheritedRelationships<G> {
    fn new(graph: G, root: i32, options: InheritOptions) -> Self {
        let start = Borrow::<RelationshipGraph>::borrow(&graph).contains(root);

        Self {
            graph,
            options,
            stack: if start {
                vec![Frame {
                    community_id: root,
                    next_child: 0,
                    depth: 0,
                }]
            } else {
                Vec::new()
            },
            path: if start { vec![root] } else { Vec::new() },
            visited: HashSet::from([root]),
            emitted: 0,
            truncated: false,
        }
    }

    /// Whether a traversal bound cut the walk short.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl<G: Borrow<RelationshipGraph>> Iterator for InheritedRelationships<G> {
    type Item = InheritedRelationship;

    fn next(&mut self) -> Option<Self::Item> {
        let graph: &RelationshipGraph = self.graph.borrow();

        loop {
            let frame = self.stack.last_mut()?;
            let neighbours = graph.neighbours(frame.community_id);

            let Some(&child) = neighbours.get(frame.next_child) else {
                self.stack.pop();
                self.path.pop();
                continue;
            };
            frame.next_child += 1;
            let depth = frame.depth + 1;

            if self.visited.contains(&child) {
                continue;
            }
            let Some(node) = graph.node(child) else {
                continue;
            };
            if !node.is_active && !self.options.include_inactive {
                self.visited.insert(child);
                continue;
            }

            if self.emitted >= self.options.limits.max_nodes {
                self.truncated = true;
                self.stack.clear();
                self.path.clear();
                return None;
            }

            self.visited.insert(child);
            self.emitted += 1;

            let item = InheritedRelationship {
                community_id: child,
                name: node.name.clone(),
                inheritance_path: self.path.clone(),
                privacy_level: node.privacy_level,
                is_active: node.is_active,
            };

            if depth < self.options.limits.max_depth {
                self.stack.push(Frame {
                    community_id: child,
                    next_child: 0,
                    depth,
                });
                self.path.push(child);
            } else if graph.neighbours(child).iter().any(|id| {
                !self.visited.contains(id)
                    && graph
                        .node(*id)
                        .is_some_and(|next| next.is_active || self.options.include_inactive)
            }) {
                self.truncated = true;
            }

            return Some(item);
        }
    }
}
