// Recent-readings table
use crate::domain::reading::Point;
use serde::Serialize;

pub const DEFAULT_TABLE_ROWS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub t: i64,
    pub v: String,
    pub n: i64,
}

impl From<&Point> for TableRow {
    fn from(p: &Point) -> Self {
        Self {
            t: p.t,
            v: format!("{:.4}", p.v),
            n: p.n,
        }
    }
}

/// The last `max_rows` points, oldest first.
pub fn recent_rows(points: &[Point], max_rows: usize) -> Vec<TableRow> {
    let start = points.len().saturating_sub(max_rows);
    points[start..].iter().map(TableRow::from).collect()
}
