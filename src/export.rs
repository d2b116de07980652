//! One export run: read the routing table, build the graph, write the document.

use chrono::{Local, NaiveDate};
use rusqlite::Connection;

use crate::config::{Config, NodeStrategy};
use crate::db::{Db, RowSource, SqliteSource};
use crate::error::Result;
use crate::gexf::{self, GexfDocument, Meta};
use crate::graph::{build_edges, check_endpoints, derive_nodes, nodes_from_rows, GraphEdge, GraphNode};

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub nodes: usize,
    pub edges: usize,
    pub bytes: usize,
}

/// Query nodes then edges from `source` and build the graph.
///
/// Prints `<N> nodes generated` and `<N> edges generated` as each phase completes.
pub fn extract_graph<S: RowSource>(
    source: &S,
    strategy: NodeStrategy,
    cost_epsilon: f64,
) -> Result<(Vec<GraphNode>, Vec<GraphEdge>)> {
    let (nodes, edge_rows) = match strategy {
        NodeStrategy::Query => {
            log::info!("Querying node endpoints");
            let nodes = nodes_from_rows(source.node_rows()?);
            println!("{} nodes generated", nodes.len());
            log::info!("Querying edges");
            (nodes, source.edge_rows()?)
        }
        NodeStrategy::Memory => {
            log::info!("Querying edges");
            let rows = source.edge_rows()?;
            let nodes = derive_nodes(&rows);
            println!("{} nodes generated", nodes.len());
            (nodes, rows)
        }
    };

    let edges = build_edges(edge_rows, cost_epsilon)?;
    check_endpoints(&nodes, &edges)?;
    println!("{} edges generated", edges.len());

    Ok((nodes, edges))
}

fn extract_from_connection(
    conn: &Connection,
    table: &str,
    strategy: NodeStrategy,
    cost_epsilon: f64,
) -> Result<(Vec<GraphNode>, Vec<GraphEdge>)> {
    extract_graph(&SqliteSource::new(conn, table), strategy, cost_epsilon)
}

/// Run a full export dated `date`.
///
/// Nothing is written unless every phase before the write succeeds.
pub async fn run_on(config: &Config, date: NaiveDate) -> Result<ExportSummary> {
    log::info!("Reading {} from {}", config.database.table, config.db_path().display());

    let db = Db::new(config.db_path());
    let table = config.database.table.clone();
    let strategy = config.export.nodes;
    let cost_epsilon = config.export.cost_epsilon;
    let (nodes, edges) = db
        .with_connection(move |conn| extract_from_connection(conn, &table, strategy, cost_epsilon))
        .await?;

    let document = GexfDocument::new(
        Meta {
            last_modified: date,
            creator: config.document.creator.clone(),
            description: config.document.description.clone(),
        },
        nodes,
        edges,
    );
    let bytes = gexf::encode(&document)?;
    gexf::write_atomic(config.output_path(), &bytes)?;

    Ok(ExportSummary {
        nodes: document.nodes.len(),
        edges: document.edges.len(),
        bytes: bytes.len(),
    })
}

/// Run a full export dated today.
pub async fn run(config: &Config) -> Result<ExportSummary> {
    run_on(config, Local::now().date_naive()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, DocumentConfig, ExportConfig, OutputConfig};
    use crate::db::fixture;
    use crate::error::{Phase, RoadGexfError};
    use std::path::Path;
    use tempfile::TempDir;

    fn config(dir: &Path, strategy: NodeStrategy) -> Config {
        Config {
            database: DatabaseConfig {
                path: dir.join("routing.db"),
                table: "basel_2po_4pgr".to_string(),
            },
            output: OutputConfig {
                path: dir.join("basel.gexf"),
            },
            document: DocumentConfig::default(),
            export: ExportConfig {
                nodes: strategy,
                ..ExportConfig::default()
            },
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 5, 10).unwrap()
    }

    #[tokio::test]
    async fn test_basel_sample_export() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), NodeStrategy::Query);
        fixture::create(config.db_path(), &fixture::basel_sample());

        let summary = run_on(&config, date()).await.unwrap();
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.edges, 1);

        let xml = std::fs::read_to_string(config.output_path()).unwrap();
        assert_eq!(summary.bytes, xml.len());
        assert!(xml.contains("<meta lastmodifieddate=\"2016-05-10\">"));
        assert!(xml.contains("<node id=\"100\" label=\"100\">"));
        assert!(xml.contains("<attvalue for=\"0\" value=\"47.55\"/>"));
        assert!(xml.contains("<attvalue for=\"1\" value=\"7.58\"/>"));
        assert!(xml.contains("<node id=\"200\" label=\"200\">"));
        assert!(xml.contains(
            "<edge id=\"1\" source=\"100\" target=\"200\" weight=\"0.3333333333333333\">"
        ));
        assert!(xml.contains("<attvalue for=\"3\" value=\"0.000001\"/>"));
        assert!(xml.contains("<attvalue for=\"4\" value=\"0.5\"/>"));
        assert!(!xml.contains("Street A"));
    }

    #[tokio::test]
    async fn test_strategies_write_identical_documents() {
        let rows: Vec<fixture::Row<'static>> = vec![
            (1, 1, Some(10), Some(20), 0.3, 80, 0.0, 0.0, None, Some(7.5), Some(47.5), Some(7.6), Some(47.6)),
            (2, 2, Some(20), Some(30), 0.4, 60, 0.01, 0.01, None, Some(7.6), Some(47.6), Some(7.7), Some(47.7)),
            (3, 4, Some(30), Some(10), 0.5, 30, 0.02, 1000000.0, None, Some(7.7), Some(47.7), Some(7.5), Some(47.5)),
        ];

        let mut outputs = Vec::new();
        for strategy in [NodeStrategy::Query, NodeStrategy::Memory] {
            let temp_dir = TempDir::new().unwrap();
            let config = config(temp_dir.path(), strategy);
            fixture::create(config.db_path(), &rows);
            run_on(&config, date()).await.unwrap();
            outputs.push(std::fs::read(config.output_path()).unwrap());
        }

        assert_eq!(outputs[0], outputs[1]);
    }

    #[tokio::test]
    async fn test_zero_clazz_aborts_without_output() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), NodeStrategy::Query);
        let mut rows = fixture::basel_sample();
        rows[0].1 = 0;
        fixture::create(config.db_path(), &rows);

        let err = run_on(&config, date()).await.unwrap_err();
        assert!(matches!(err, RoadGexfError::DataIntegrity { .. }));
        assert!(!config.output_path().exists());
    }

    #[tokio::test]
    async fn test_missing_database_aborts_without_output() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), NodeStrategy::Memory);

        let err = run_on(&config, date()).await.unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Connect));
        assert!(!config.output_path().exists());
    }

    #[tokio::test]
    async fn test_failed_run_keeps_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(temp_dir.path(), NodeStrategy::Query);
        fixture::create(config.db_path(), &fixture::basel_sample());
        std::fs::write(config.output_path(), "previous").unwrap();
        config.database.table = "zurich_2po_4pgr".to_string();

        let err = run_on(&config, date()).await.unwrap_err();
        assert_eq!(err.phase(), Some(Phase::QueryNodes));
        assert_eq!(std::fs::read_to_string(config.output_path()).unwrap(), "previous");
    }

    struct Rows {
        nodes: Vec<crate::graph::NodeRow>,
        edges: Vec<crate::graph::EdgeRow>,
    }

    impl RowSource for Rows {
        fn node_rows(&self) -> Result<Vec<crate::graph::NodeRow>> {
            Ok(self.nodes.clone())
        }

        fn edge_rows(&self) -> Result<Vec<crate::graph::EdgeRow>> {
            Ok(self.edges.clone())
        }
    }

    #[test]
    fn test_dangling_edge_is_rejected() {
        let source = Rows {
            nodes: vec![crate::graph::NodeRow { id: 100, x: None, y: None }],
            edges: vec![crate::graph::EdgeRow {
                id: 9,
                clazz: 1,
                osm_source_id: Some(100),
                osm_target_id: Some(999),
                km: 1.0,
                kmh: 50,
                cost: 1.0,
                reverse_cost: 1.0,
                osm_name: None,
                x1: None,
                y1: None,
                x2: None,
                y2: None,
            }],
        };

        let err = extract_graph(&source, NodeStrategy::Query, 1e-6).unwrap_err();
        assert!(err.to_string().contains("unknown node 999"));

        // Deriving nodes from the edges themselves always covers both endpoints
        let (nodes, edges) = extract_graph(&source, NodeStrategy::Memory, 1e-6).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(edges.len(), 1);
    }
}
