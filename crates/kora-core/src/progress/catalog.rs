//! Static journey catalog and unlock-graph queries.
//!
//! Nodes form a strict chain ordered by `level_rank`. Each node carries an
//! explicit `predecessor_id` assigned when the catalog is built, so
//! reachability never depends on list position.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::record::ProgressRecord;
use crate::error::{CoreError, Result};

/// Which orbit a journey node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeCategory {
    Adhd,
    Autism,
    MentalHealth,
    Sensory,
    Health,
    Mastery,
}

/// Derived unlock status. Never stored; computed from `completedNodeIds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Locked,
    Available,
    Completed,
}

/// One step of the journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    pub id: String,
    pub level_rank: u32,
    pub category: NodeCategory,
    pub title: String,
    pub description: String,
    pub icon_key: String,
    /// Immediate predecessor on the chain; `None` for the first node.
    #[serde(default)]
    pub predecessor_id: Option<String>,
}

impl SkillNode {
    pub fn new(
        id: &str,
        level_rank: u32,
        category: NodeCategory,
        title: &str,
        description: &str,
        icon_key: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            level_rank,
            category,
            title: title.to_string(),
            description: description.to_string(),
            icon_key: icon_key.to_string(),
            predecessor_id: None,
        }
    }
}

/// A node paired with its status for one record.
#[derive(Debug, Clone, Serialize)]
pub struct NodeState<'a> {
    #[serde(flatten)]
    pub node: &'a SkillNode,
    pub status: NodeStatus,
}

/// Ordered, validated set of journey nodes.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    nodes: Vec<SkillNode>,
    index: HashMap<String, usize>,
}

impl SkillCatalog {
    /// Build a catalog, ordering by `level_rank` and linking predecessors.
    ///
    /// # Errors
    /// Returns [`CoreError::Catalog`] for an empty catalog, duplicate ids or
    /// duplicate level ranks.
    pub fn new(mut nodes: Vec<SkillNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(CoreError::Catalog("catalog has no nodes".into()));
        }

        nodes.sort_by_key(|n| n.level_rank);

        {
            let mut ids = HashSet::with_capacity(nodes.len());
            let mut ranks = HashSet::with_capacity(nodes.len());
            for node in &nodes {
                if !ids.insert(node.id.as_str()) {
                    return Err(CoreError::Catalog(format!("duplicate node id '{}'", node.id)));
                }
                if !ranks.insert(node.level_rank) {
                    return Err(CoreError::Catalog(format!(
                        "duplicate level rank {} at '{}'",
                        node.level_rank, node.id
                    )));
                }
            }
        }

        Ok(Self::from_sorted(nodes))
    }

    /// Link predecessors and index nodes already in unique rank order.
    fn from_sorted(mut nodes: Vec<SkillNode>) -> Self {
        let mut previous: Option<String> = None;
        for node in nodes.iter_mut() {
            node.predecessor_id = previous.take();
            previous = Some(node.id.clone());
        }

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        Self { nodes, index }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter()
    }

    pub fn first(&self) -> Option<&SkillNode> {
        self.nodes.first()
    }

    pub fn get(&self, id: &str) -> Option<&SkillNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The node that must be completed before `id`.
    pub fn predecessor(&self, id: &str) -> Option<&SkillNode> {
        self.get(id)?
            .predecessor_id
            .as_deref()
            .and_then(|p| self.get(p))
    }

    /// A node is reachable when it is first or its predecessor is completed.
    /// Unknown ids are never reachable.
    pub fn is_reachable(&self, id: &str, completed: &[String]) -> bool {
        match self.get(id) {
            Some(node) => match &node.predecessor_id {
                None => true,
                Some(p) => completed.iter().any(|c| c == p),
            },
            None => false,
        }
    }

    pub fn status(&self, id: &str, completed: &[String]) -> NodeStatus {
        if completed.iter().any(|c| c == id) {
            NodeStatus::Completed
        } else if self.is_reachable(id, completed) {
            NodeStatus::Available
        } else {
            NodeStatus::Locked
        }
    }

    /// Every node with its status for `record`, in chain order.
    pub fn statuses<'a>(&'a self, record: &ProgressRecord) -> Vec<NodeState<'a>> {
        let completed = record.completed_node_ids();
        self.nodes
            .iter()
            .map(|node| NodeState {
                node,
                status: self.status(&node.id, completed),
            })
            .collect()
    }

    /// The single node currently available, or `None` once the journey is done.
    pub fn next_available(&self, record: &ProgressRecord) -> Option<&SkillNode> {
        let completed = record.completed_node_ids();
        self.nodes
            .iter()
            .find(|n| self.status(&n.id, completed) == NodeStatus::Available)
    }

    /// Share of the journey completed, in [0,1].
    pub fn progress_fraction(&self, record: &ProgressRecord) -> f64 {
        let done = self
            .nodes
            .iter()
            .filter(|n| record.is_completed(&n.id))
            .count();
        done as f64 / self.nodes.len() as f64
    }

    /// Longest prefix of the chain fully contained in `completed`.
    pub(crate) fn completed_prefix_len(&self, completed: &[String]) -> usize {
        self.nodes
            .iter()
            .take_while(|n| completed.iter().any(|c| c == &n.id))
            .count()
    }
}

impl Default for SkillCatalog {
    /// The shipped eleven-node journey.
    fn default() -> Self {
        use NodeCategory::*;
        let nodes = vec![
            SkillNode::new("adhd-1", 1, Adhd, "Focus Launch", "4-4-4 breathing foundation.", "wind"),
            SkillNode::new("adhd-2", 2, Adhd, "Task Fragging", "Chunking complex goals.", "zap"),
            SkillNode::new("adhd-3", 3, Adhd, "Attention Anchor", "Visual mapping exercises.", "eye"),
            SkillNode::new("anger-1", 4, MentalHealth, "Rage Ignition", "Asteroid shattering exercise.", "flame"),
            SkillNode::new("shadow-1", 5, MentalHealth, "Shadow Orbit", "Low-energy check-ins.", "moon"),
            SkillNode::new("mh-1", 6, MentalHealth, "Emotion Labelling", "The 1-10 intensity scale.", "activity"),
            SkillNode::new("autism-1", 7, Autism, "Social Cues 101", "The \"unspoken\" rulebook.", "brain"),
            SkillNode::new("autism-2", 8, Autism, "Sensory Tuning", "Environmental sound audit.", "wind"),
            SkillNode::new("health-1", 9, Health, "Bio Rhythm", "Connecting mood to cycles.", "heart"),
            SkillNode::new("health-2", 10, Health, "Tarot Mirror", "Archetypal self-reflection.", "star"),
            SkillNode::new("mastery-1", 11, Mastery, "Cosmic Unity", "Integrating all orbits.", "sparkles"),
        ];
        Self::from_sorted(nodes)
    }
}
