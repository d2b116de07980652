//! Node-set derivation from edge endpoints.

use std::collections::BTreeMap;

use super::{EdgeRow, GraphNode, NodeRow};

/// Candidate coordinate for a node, remembered with the edge that supplied it.
struct Candidate {
    edge_id: i64,
    x: Option<f64>,
    y: Option<f64>,
}

/// Keep the candidate from the lowest edge id, matching the database strategy.
fn offer(map: &mut BTreeMap<i64, Candidate>, node_id: i64, candidate: Candidate) {
    match map.get(&node_id) {
        Some(existing) if existing.edge_id <= candidate.edge_id => {}
        _ => {
            map.insert(node_id, candidate);
        }
    }
}

/// Union of all source endpoints and the target endpoints that never occur as
/// a source, one node per id, ordered by id.
///
/// A source endpoint takes the edge's start point, a target endpoint its end
/// point. When an id is both, the source-side coordinate wins.
pub fn derive_nodes(edges: &[EdgeRow]) -> Vec<GraphNode> {
    let mut sources: BTreeMap<i64, Candidate> = BTreeMap::new();
    for edge in edges {
        if let Some(id) = edge.osm_source_id {
            offer(
                &mut sources,
                id,
                Candidate {
                    edge_id: edge.id,
                    x: edge.x1,
                    y: edge.y1,
                },
            );
        }
    }

    let mut targets: BTreeMap<i64, Candidate> = BTreeMap::new();
    for edge in edges {
        match edge.osm_target_id {
            Some(id) if !sources.contains_key(&id) => offer(
                &mut targets,
                id,
                Candidate {
                    edge_id: edge.id,
                    x: edge.x2,
                    y: edge.y2,
                },
            ),
            _ => {}
        }
    }

    sources.append(&mut targets);
    sources
        .into_iter()
        .map(|(id, c)| GraphNode { id, x: c.x, y: c.y })
        .collect()
}

/// Nodes from rows the database already deduplicated.
///
/// Rows repeating an id are dropped after the first so the node set stays unique
/// even against a source that does not honour the union contract.
pub fn nodes_from_rows(rows: Vec<NodeRow>) -> Vec<GraphNode> {
    let mut seen = std::collections::HashSet::with_capacity(rows.len());
    let mut nodes = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.id) {
            log::debug!("Dropping repeated node row for id {}", row.id);
            continue;
        }
        nodes.push(GraphNode {
            id: row.id,
            x: row.x,
            y: row.y,
        });
    }
    nodes
}
