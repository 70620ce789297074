//! ASCII rendering of a partition snapshot.
//!
//! Each cell is sampled at its center and labeled with the last two digits
//! of the owning node's id. Rows run top to bottom from y=1 to y=0.

use std::fmt::Write;

use can_dht::{NodeId, Point, Snapshot};

/// Grid dimensions of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapSize {
    pub cols: usize,
    pub rows: usize,
}

impl Default for MapSize {
    fn default() -> Self {
        Self { cols: 40, rows: 20 }
    }
}

/// A lookup to overlay on the map.
#[derive(Debug, Clone, Copy)]
pub struct Trace<'a> {
    pub path: &'a [NodeId],
    pub target: Point,
}

fn label(id: NodeId) -> String {
    format!("{:02}", id.0 % 100)
}

fn cell_center(size: MapSize, row: usize, col: usize) -> Point {
    let x = (col as f64 + 0.5) / size.cols as f64;
    let y = ((size.rows - 1 - row) as f64 + 0.5) / size.rows as f64;
    Point::new(x, y)
}

/// Grid cell containing `point`, as `(row, col)`.
fn cell_of(size: MapSize, point: Point) -> (usize, usize) {
    let col = ((point.x * size.cols as f64) as usize).min(size.cols - 1);
    let row_from_bottom = ((point.y * size.rows as f64) as usize).min(size.rows - 1);
    (size.rows - 1 - row_from_bottom, col)
}

/// Draw the zone map. With a trace, only nodes on the path keep their
/// labels, other cells show `..`, and the target cell shows `TT`.
pub fn ascii_map(snapshot: &Snapshot, size: MapSize, trace: Option<Trace<'_>>) -> String {
    let target_cell = trace.map(|t| cell_of(size, t.target));
    let mut out = String::new();

    for row in 0..size.rows {
        let cells: Vec<String> = (0..size.cols)
            .map(|col| {
                if target_cell == Some((row, col)) {
                    return "TT".to_string();
                }
                match snapshot.owner_of(cell_center(size, row, col)) {
                    None => "??".to_string(),
                    Some(id) => match trace {
                        Some(t) if !t.path.contains(&id) => "..".to_string(),
                        _ => label(id),
                    },
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    out
}
