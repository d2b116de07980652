//! Edge construction: validation, cost rewrite and weight derivation.

use std::collections::HashSet;

use super::{EdgeRow, GraphEdge, GraphNode};
use crate::error::{Phase, Result, RoadGexfError};

/// Build one directed edge from its source row.
///
/// A zero `clazz` is rejected since the weight `1 / clazz` would be undefined.
/// A zero forward cost becomes `cost_epsilon`; `reverse_cost` is kept as is.
pub fn build_edge(row: EdgeRow, cost_epsilon: f64) -> Result<GraphEdge> {
    if row.clazz == 0 {
        return Err(RoadGexfError::integrity(
            Phase::QueryEdges,
            format!("edge {} has clazz 0, weight 1/clazz is undefined", row.id),
        ));
    }

    let source = row.osm_source_id.ok_or_else(|| {
        RoadGexfError::integrity(
            Phase::QueryEdges,
            format!("edge {} has no osm_source_id", row.id),
        )
    })?;
    let target = row.osm_target_id.ok_or_else(|| {
        RoadGexfError::integrity(
            Phase::QueryEdges,
            format!("edge {} has no osm_target_id", row.id),
        )
    })?;

    let cost = if row.cost == 0.0 { cost_epsilon } else { row.cost };

    Ok(GraphEdge {
        id: row.id,
        source,
        target,
        clazz: row.clazz,
        km: row.km,
        kmh: row.kmh,
        cost,
        reverse_cost: row.reverse_cost,
        weight: 1.0 / row.clazz as f64,
        name: row.osm_name,
    })
}

/// Build all edges, failing on the first invalid row.
pub fn build_edges(rows: Vec<EdgeRow>, cost_epsilon: f64) -> Result<Vec<GraphEdge>> {
    let mut edges = Vec::with_capacity(rows.len());
    for row in rows {
        let edge = build_edge(row, cost_epsilon)?;
        if edge.cost != edge.reverse_cost {
            log::trace!("Edge {} is asymmetric: cost {} / reverse {}", edge.id, edge.cost, edge.reverse_cost);
        }
        edges.push(edge);
    }
    Ok(edges)
}

/// Every edge endpoint must name a node in the derived set.
pub fn check_endpoints(nodes: &[GraphNode], edges: &[GraphEdge]) -> Result<()> {
    let ids: HashSet<i64> = nodes.iter().map(|n| n.id).collect();
    for edge in edges {
        for endpoint in [edge.source, edge.target] {
            if !ids.contains(&endpoint) {
                return Err(RoadGexfError::integrity(
                    Phase::QueryEdges,
                    format!("edge {} references unknown node {}", edge.id, endpoint),
                ));
            }
        }
    }
    Ok(())
}
