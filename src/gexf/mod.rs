//! GEXF 1.2 document model and encoding.
//!
//! The document is assembled fully in memory, encoded to indented UTF-8 and
//! written to its destination in one step.

mod writer;

pub use writer::{encode, write_atomic};

use chrono::NaiveDate;

use crate::graph::{GraphEdge, GraphNode};

pub const GEXF_NAMESPACE: &str = "http://www.gexf.net/1.2draft";
pub const GEXF_VERSION: &str = "1.2";

/// Declared type of an attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    Integer,
    Float,
}

impl AttrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrType::Integer => "integer",
            AttrType::Float => "float",
        }
    }
}

/// One `<attribute>` declaration. `id` is the index that `attvalue for=` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDecl {
    pub id: u8,
    pub title: &'static str,
    pub ty: AttrType,
}

pub const NODE_LAT: u8 = 0;
pub const NODE_LON: u8 = 1;

pub const NODE_ATTRIBUTES: [AttributeDecl; 2] = [
    AttributeDecl { id: NODE_LAT, title: "lat", ty: AttrType::Float },
    AttributeDecl { id: NODE_LON, title: "lon", ty: AttrType::Float },
];

pub const EDGE_CLAZZ: u8 = 0;
pub const EDGE_KM: u8 = 1;
pub const EDGE_KMH: u8 = 2;
pub const EDGE_COST: u8 = 3;
pub const EDGE_REVERSE_COST: u8 = 4;

pub const EDGE_ATTRIBUTES: [AttributeDecl; 5] = [
    AttributeDecl { id: EDGE_CLAZZ, title: "clazz", ty: AttrType::Integer },
    AttributeDecl { id: EDGE_KM, title: "km", ty: AttrType::Float },
    AttributeDecl { id: EDGE_KMH, title: "kmh", ty: AttrType::Integer },
    AttributeDecl { id: EDGE_COST, title: "cost", ty: AttrType::Float },
    AttributeDecl { id: EDGE_REVERSE_COST, title: "reverse_cost", ty: AttrType::Float },
];

/// Contents of `<meta>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub last_modified: NaiveDate,
    pub creator: String,
    pub description: String,
}

/// A static, directed graph ready for encoding.
#[derive(Debug, Clone)]
pub struct GexfDocument {
    pub meta: Meta,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GexfDocument {
    pub fn new(meta: Meta, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { meta, nodes, edges }
    }
}

/// Attribute values of a node, keyed by schema index. Missing coordinates are left out.
pub fn node_values(node: &GraphNode) -> Vec<(u8, String)> {
    let mut values = Vec::with_capacity(2);
    if let Some(lat) = node.y {
        values.push((NODE_LAT, lat.to_string()));
    }
    if let Some(lon) = node.x {
        values.push((NODE_LON, lon.to_string()));
    }
    values
}

/// Attribute values of an edge, keyed by schema index.
pub fn edge_values(edge: &GraphEdge) -> [(u8, String); 5] {
    [
        (EDGE_CLAZZ, edge.clazz.to_string()),
        (EDGE_KM, edge.km.to_string()),
        (EDGE_KMH, edge.kmh.to_string()),
        (EDGE_COST, edge.cost.to_string()),
        (EDGE_REVERSE_COST, edge.reverse_cost.to_string()),
    ]
}
