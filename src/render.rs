//! Result rendering.
//!
//! Formats result sets as a vertical dump, one `label: value` pair per line
//! with a numbered separator before each row.

use crate::db::QueryResult;

/// Renders a result set for display.
///
/// Each row gets a separator carrying its 1-based row number, followed by
/// the column labels paired with their values in result-set column order.
/// A trailing row count closes the dump.
pub fn render_result_set(result: &QueryResult) -> String {
    let mut out = String::from("Results:\n\n");

    for (i, row) in result.rows.iter().enumerate() {
        out.push_str(&format!(
            "*************************** {}. row ***************************\n",
            i + 1
        ));
        for (column, value) in result.columns.iter().zip(row) {
            out.push_str(&format!("{}: {}\n", column.name, value));
        }
        out.push('\n');
    }

    out.push_str(&format!("{} rows in set.\n", result.rows.len()));
    out
}
