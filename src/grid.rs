use crate::db::QueryOutput;
use crate::error::{AppError, Result};
use serde_json::Value;

/// Header-prefixed 2-D array of string cells, in the row-major shape the
/// Sheets API consumes.
pub type Grid = Vec<Vec<Value>>;

/// Convert a query result into a grid: row 0 is the column-name header,
/// every NULL becomes an empty cell, everything else is taken as-is.
///
/// An empty result set is valid and yields a header-only grid.
pub fn build_grid(output: QueryOutput) -> Result<Grid> {
    let width = output.columns.len();

    let mut grid: Grid = Vec::with_capacity(output.rows.len() + 1);
    grid.push(
        output
            .columns
            .into_iter()
            .map(Value::String)
            .collect::<Vec<Value>>(),
    );

    for (i, row) in output.rows.into_iter().enumerate() {
        if row.len() != width {
            return Err(AppError::Scan(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                width
            )));
        }

        let mut cells = Vec::with_capacity(width);
        for cell in row {
            cells.push(Value::String(cell.unwrap_or_default()));
        }
        grid.push(cells);
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(columns: &[&str], rows: &[&[Option<&str>]]) -> QueryOutput {
        QueryOutput {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }

    #[test]
    fn test_grid_shape() {
        let grid = build_grid(output(
            &["id", "name", "total"],
            &[
                &[Some("1"), Some("widget"), Some("9.99")],
                &[Some("2"), Some("gadget"), Some("12.50")],
            ],
        ))
        .unwrap();

        assert_eq!(grid.len(), 3, "header plus one row per data row");
        for row in &grid {
            assert_eq!(row.len(), 3);
        }
        assert_eq!(grid[0][1], Value::String("name".to_string()));
        assert_eq!(grid[2][2], Value::String("12.50".to_string()));
    }

    #[test]
    fn test_empty_result_is_header_only() {
        let grid = build_grid(output(&["id", "name"], &[])).unwrap();

        assert_eq!(
            grid,
            vec![vec![
                Value::String("id".to_string()),
                Value::String("name".to_string()),
            ]]
        );
    }

    #[test]
    fn test_null_becomes_empty_cell() {
        let grid = build_grid(output(&["note"], &[&[None]])).unwrap();

        assert_eq!(grid[1][0], Value::String(String::new()));
    }

    #[test]
    fn test_utf8_text_passes_through() {
        let grid = build_grid(output(&["city"], &[&[Some("Zürich ✓")]])).unwrap();

        assert_eq!(grid[1][0], Value::String("Zürich ✓".to_string()));
    }

    #[test]
    fn test_ragged_row_is_scan_error() {
        let err = build_grid(output(&["a", "b"], &[&[Some("1")]])).unwrap_err();

        assert!(matches!(err, AppError::Scan(_)), "got {:?}", err);
        assert!(err.to_string().contains("expected 2"));
    }
}
