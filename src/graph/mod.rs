//! Road graph model: rows read from the osm2po table and the nodes and edges
//! derived from them.
//!
//! Nodes are not stored in the source table. Their ids and coordinates come
//! from edge endpoints, see [`derive_nodes`].

mod edges;
mod nodes;

pub use edges::{build_edge, build_edges, check_endpoints};
pub use nodes::{derive_nodes, nodes_from_rows};

/// Replacement for a zero forward cost, so consumers never see a zero-weight edge.
pub const COST_EPSILON: f64 = 1e-6;

/// One row of the endpoint union: a candidate node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub id: i64,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// One row of the edge projection, as stored by the importer.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub id: i64,
    pub clazz: i64,
    pub osm_source_id: Option<i64>,
    pub osm_target_id: Option<i64>,
    pub km: f64,
    pub kmh: i64,
    pub cost: f64,
    pub reverse_cost: f64,
    pub osm_name: Option<String>,
    /// Geometry start point (lon, lat)
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    /// Geometry end point (lon, lat)
    pub x2: Option<f64>,
    pub y2: Option<f64>,
}

/// A topology node, keyed by its map-data endpoint id.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: i64,
    /// Longitude
    pub x: Option<f64>,
    /// Latitude
    pub y: Option<f64>,
}

/// A directed, weighted road segment.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: i64,
    pub source: i64,
    pub target: i64,
    pub clazz: i64,
    pub km: f64,
    pub kmh: i64,
    pub cost: f64,
    pub reverse_cost: f64,
    /// `1 / clazz`
    pub weight: f64,
    /// Street name; read but never written to the document
    pub name: Option<String>,
}
