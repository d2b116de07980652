//! Read queries against the osm2po routing table.

use rusqlite::{Connection, Row};

use crate::error::{Phase, Result, RoadGexfError};
use crate::graph::{EdgeRow, NodeRow};

/// Executes the two fixed read queries of an export run.
pub trait RowSource {
    /// Endpoint union, deduplicated by the source, ordered by id.
    fn node_rows(&self) -> Result<Vec<NodeRow>>;

    /// Every edge with the attributes the document needs.
    fn edge_rows(&self) -> Result<Vec<EdgeRow>>;
}

/// [`RowSource`] over an osm2po table in a SQLite database.
///
/// The importer stores geometry endpoints in `x1, y1` (start) and `x2, y2`
/// (end), which stand in for `ST_StartPoint`/`ST_EndPoint` on the way geometry.
pub struct SqliteSource<'c> {
    conn: &'c Connection,
    table: String,
}

impl<'c> SqliteSource<'c> {
    pub fn new(conn: &'c Connection, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
        }
    }

    /// Source endpoints, then target endpoints never used as a source.
    ///
    /// `MIN(id)` makes SQLite take the bare `x`/`y` columns from the lowest edge
    /// id of each group, so every endpoint id yields exactly one row.
    fn node_sql(&self) -> String {
        let t = &self.table;
        format!(
            "SELECT node_id, x, y FROM (
                SELECT osm_source_id AS node_id, x1 AS x, y1 AS y, MIN(id)
                FROM {t}
                WHERE osm_source_id IS NOT NULL
                GROUP BY osm_source_id
                UNION ALL
                SELECT osm_target_id AS node_id, x2 AS x, y2 AS y, MIN(id)
                FROM {t}
                WHERE osm_target_id IS NOT NULL
                  AND osm_target_id NOT IN (
                      SELECT osm_source_id FROM {t} WHERE osm_source_id IS NOT NULL
                  )
                GROUP BY osm_target_id
            )
            ORDER BY node_id"
        )
    }

    fn edge_sql(&self) -> String {
        format!(
            "SELECT id, clazz, osm_source_id, osm_target_id, km, kmh, cost, reverse_cost,
                    osm_name, x1, y1, x2, y2
             FROM {}
             ORDER BY id",
            self.table
        )
    }
}

fn edge_from_row(row: &Row<'_>) -> rusqlite::Result<EdgeRow> {
    Ok(EdgeRow {
        id: row.get(0)?,
        clazz: row.get(1)?,
        osm_source_id: row.get(2)?,
        osm_target_id: row.get(3)?,
        km: row.get(4)?,
        kmh: row.get(5)?,
        cost: row.get(6)?,
        reverse_cost: row.get(7)?,
        osm_name: row.get(8)?,
        x1: row.get(9)?,
        y1: row.get(10)?,
        x2: row.get(11)?,
        y2: row.get(12)?,
    })
}

impl RowSource for SqliteSource<'_> {
    fn node_rows(&self) -> Result<Vec<NodeRow>> {
        let sql = self.node_sql();
        log::debug!("Node query: {}", sql);

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| RoadGexfError::query(Phase::QueryNodes, e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(NodeRow {
                    id: row.get(0)?,
                    x: row.get(1)?,
                    y: row.get(2)?,
                })
            })
            .map_err(|e| RoadGexfError::query(Phase::QueryNodes, e))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| RoadGexfError::query(Phase::QueryNodes, e))?);
        }
        Ok(out)
    }

    fn edge_rows(&self) -> Result<Vec<EdgeRow>> {
        let sql = self.edge_sql();
        log::debug!("Edge query: {}", sql);

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| RoadGexfError::query(Phase::QueryEdges, e))?;
        let rows = stmt
            .query_map([], edge_from_row)
            .map_err(|e| RoadGexfError::query(Phase::QueryEdges, e))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| RoadGexfError::query(Phase::QueryEdges, e))?);
        }
        Ok(out)
    }
}
