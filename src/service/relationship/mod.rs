//! Community relationship management over stored edges.
//!
//! Each call loads the connected component(s) it touches into a [`RelationshipGraph`],
//! lets the graph decide, then writes the edge pair through the repository.

pub mod graph;

use std::collections::HashSet;

use sea_orm::ConnectionTrait;

use crate::{
    config::TraversalLimits,
    data::{
        community::CommunityRepository, member::CommunityMemberRepository,
        relationship::CommunityRelationshipRepository,
    },
    error::{business::BusinessRuleError, AppError},
    model::relationship::{InheritedRelationship, RemovalCheck},
    service::{
        quota::QuotaEnforcer,
        relationship::graph::{CommunityNode, EdgeChange, InheritOptions, RelationshipGraph},
    },
};

/// Graph snapshot loaded from the database.
pub struct LoadedGraph {
    pub graph: RelationshipGraph,
    /// Communities were left out because the node limit was reached.
    pub truncated: bool,
}

/// Loads every community connected to `roots`, breadth first, up to `max_nodes`.
pub async fn load_graph<C: ConnectionTrait>(
    db: &C,
    roots: &[i32],
    quotas: QuotaEnforcer,
    max_nodes: usize,
) -> Result<LoadedGraph, AppError> {
    let relationships = CommunityRelationshipRepository::new(db);

    let mut seen: HashSet<i32> = HashSet::new();
    let mut order = Vec::new();
    let mut truncated = false;

    for &root in roots {
        if seen.len() >= max_nodes {
            truncated = true;
            break;
        }
        if seen.insert(root) {
            order.push(root);
        }
    }

    let mut frontier = order.clone();
    let mut edges = Vec::new();

    while !frontier.is_empty() {
        let rows = relationships.edges_from(&frontier).await?;
        let mut next = Vec::new();

        for &(_, to) in &rows {
            if seen.contains(&to) {
                continue;
            }
            if seen.len() >= max_nodes {
                truncated = true;
                continue;
            }
            seen.insert(to);
            order.push(to);
            next.push(to);
        }

        edges.extend(rows);
        frontier = next;
    }

    let mut graph = RelationshipGraph::new(quotas);
    for community in CommunityRepository::new(db).get_many(&order).await? {
        graph.insert_community(
            community.id,
            CommunityNode {
                name: community.name,
                privacy_level: community.privacy_level,
                is_active: community.is_active,
            },
        );
    }
    for (from, to) in edges {
        if graph.contains(from) && graph.contains(to) {
            graph.load_direction(from, to);
        }
    }

    if truncated {
        tracing::debug!(
            "Relationship graph from {:?} cut at {} communities",
            roots,
            max_nodes
        );
    }

    Ok(LoadedGraph { graph, truncated })
}

pub struct RelationshipManager<'a, C: ConnectionTrait> {
    db: &'a C,
    quotas: &'a QuotaEnforcer,
    limits: TraversalLimits,
}

impl<'a, C: ConnectionTrait> RelationshipManager<'a, C> {
    pub fn new(db: &'a C, quotas: &'a QuotaEnforcer, limits: TraversalLimits) -> Self {
        Self { db, quotas, limits }
    }

    /// Relates two communities in both directions.
    ///
    /// # Returns
    /// - `Ok(true)` - The edge was stored
    /// - `Ok(false)` - The communities were already related
    /// - `Err(AppError::BusinessRule)` - Self relationship, privacy mismatch or an
    ///   already inherited community
    /// - `Err(AppError::QuotaExceeded)` - Either community is at its relationship limit
    /// - `Err(AppError::State)` - The graph is too large to validate
    /// - `Err(AppError::Concurrency)` - A concurrent add pushed a community over the limit
    pub async fn add(&self, community_id: i32, related_id: i32) -> Result<bool, AppError> {
        let mut graph = self.snapshot(&[community_id, related_id]).await?;

        if graph.add_relationship(community_id, related_id)? == EdgeChange::Unchanged {
            return Ok(false);
        }

        let relationships = CommunityRelationshipRepository::new(self.db);
        relationships.link(community_id, related_id).await?;

        for id in [community_id, related_id] {
            let degree = relationships.degree(id).await?;
            if degree > self.quotas.relationship_limit() {
                return Err(AppError::Concurrency(format!(
                    "community {} now has {} relationships",
                    id, degree
                )));
            }
        }

        tracing::info!(
            "Related community {} with community {}",
            community_id,
            related_id
        );

        Ok(true)
    }

    /// Removes the edge between two communities.
    ///
    /// Refused while the two communities share active staff or while other communities
    /// depend on the edge to stay connected.
    pub async fn remove(&self, community_id: i32, related_id: i32) -> Result<bool, AppError> {
        let relationships = CommunityRelationshipRepository::new(self.db);

        if !relationships.exists(community_id, related_id).await? {
            return Ok(false);
        }

        if CommunityMemberRepository::new(self.db)
            .has_shared_staff(community_id, related_id)
            .await?
        {
            return Err(BusinessRuleError::SharedResources {
                community_id,
                related_id,
            }
            .into());
        }

        let mut graph = self.snapshot(&[community_id]).await?;
        graph.remove_relationship(community_id, related_id)?;

        let deleted = relationships.unlink(community_id, related_id).await?;
        if deleted != 2 {
            return Err(AppError::Concurrency(format!(
                "expected to remove 2 relationship rows between {} and {}, removed {}",
                community_id, related_id, deleted
            )));
        }

        tracing::info!(
            "Removed relationship between community {} and community {}",
            community_id,
            related_id
        );

        Ok(true)
    }

    /// Reports what blocks removing the edge, without changing anything.
    pub async fn validate_removal(
        &self,
        community_id: i32,
        related_id: i32,
    ) -> Result<RemovalCheck, AppError> {
        let has_shared_resources = CommunityMemberRepository::new(self.db)
            .has_shared_staff(community_id, related_id)
            .await?;

        let graph = self.snapshot(&[community_id]).await?;
        let dependents = if graph.has_edge(community_id, related_id) {
            graph.dependents(community_id, related_id)
        } else {
            Vec::new()
        };

        Ok(RemovalCheck {
            community_id,
            related_id,
            dependents,
            has_shared_resources,
        })
    }

    /// Communities reachable from `community_id`, depth first, with their paths.
    ///
    /// A walk cut short by the traversal limits returns what it found so far.
    pub async fn inherited(
        &self,
        community_id: i32,
        include_inactive: bool,
    ) -> Result<Vec<InheritedRelationship>, AppError> {
        let loaded = load_graph(
            self.db,
            &[community_id],
            *self.quotas,
            self.limits.max_nodes,
        )
        .await?;

        let mut walk = loaded.graph.into_inherited(
            community_id,
            InheritOptions {
                include_inactive,
                limits: self.limits,
            },
        );
        let inherited: Vec<_> = walk.by_ref().collect();

        if loaded.truncated || walk.is_truncated() {
            tracing::warn!(
                "Inherited relationships of community {} truncated at {} communities",
                community_id,
                inherited.len()
            );
        }

        Ok(inherited)
    }

    async fn snapshot(&self, roots: &[i32]) -> Result<RelationshipGraph, AppError> {
        let loaded = load_graph(
            self.db,
            roots,
            *self.quotas,
            self.limits.max_nodes,
        )
        .await?;

        if loaded.truncated {
            return Err(AppError::state(format!(
                "Relationship graph around communities {:?} exceeds {} communities",
                roots, self.limits.max_nodes
            )));
        }

        Ok(loaded.graph)
    }
}
