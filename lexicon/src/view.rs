use std::collections::HashMap;

use lexigraph_vecstore::SimilarityEdge;
use serde::{Deserialize, Serialize};

/// A node of a [`GraphView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Number of links in the view touching this node.
    pub degree: usize,
}

/// An undirected link of a [`GraphView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    /// Cosine similarity of the endpoints.
    pub value: f32,
}

/// Node/link projection of stored similarity edges, shaped for
/// force-directed renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphView {
    /// One node per entry of `ids` and one link per edge. Edge endpoints
    /// missing from `ids` are appended as nodes.
    pub(crate) fn from_edges(ids: &[String], edges: &[SimilarityEdge]) -> Self {
        let mut view = GraphView {
            nodes: Vec::with_capacity(ids.len()),
            links: Vec::with_capacity(edges.len()),
        };
        let mut index: HashMap<String, usize> = HashMap::with_capacity(ids.len());

        for id in ids {
            view.node(&mut index, id);
        }
        for e in edges {
            let a = view.node(&mut index, &e.a);
            let b = view.node(&mut index, &e.b);
            view.nodes[a].degree += 1;
            view.nodes[b].degree += 1;
            view.links.push(GraphLink {
                source: e.a.clone(),
                target: e.b.clone(),
                value: e.similarity,
            });
        }
        view
    }

    fn node(&mut self, index: &mut HashMap<String, usize>, id: &str) -> usize {
        if let Some(&i) = index.get(id) {
            return i;
        }
        self.nodes.push(GraphNode {
            id: id.to_string(),
            degree: 0,
        });
        index.insert(id.to_string(), self.nodes.len() - 1);
        self.nodes.len() - 1
    }

    /// Degree of node `id`, if present.
    pub fn degree(&self, id: &str) -> Option<usize> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.degree)
    }
}
