//! FILENAME: app/src/csv.rs
//! PURPOSE: CSV rendering of a table view.
//! CONTEXT: Lightweight escape hatch next to the PDF export: the current
//! filtered table as RFC-4180 CSV, header row first.

use report_engine::TableView;

/// Renders the table (all rows it carries) as CSV text.
pub fn build_csv(table: &TableView) -> String {
    let mut csv = String::new();

    let header: Vec<String> = table
        .columns
        .iter()
        .map(|col| escape_csv(&col.label))
        .collect();
    csv.push_str(&header.join(","));
    csv.push('\n');

    for row in &table.rows {
        let line: Vec<String> = row.iter().map(|cell| escape_csv(cell)).collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }

    csv
}

fn escape_csv(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_engine::TableColumn;

    #[test]
    fn csv_quotes_only_when_needed() {
        let table = TableView {
            columns: vec![
                TableColumn::text("producer", "producers", "Producteur"),
                TableColumn::number("total", "line_total", "Total"),
            ],
            rows: vec![
                vec!["Ferme du Lac, Rucher des Prés".to_string(), "24".to_string()],
                vec!["GAEC \"Les Vergers\"".to_string(), "12.50".to_string()],
            ],
            total_rows: 2,
            page: 0,
            page_size: 0,
        };
        let csv = build_csv(&table);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Producteur,Total");
        assert_eq!(lines[1], "\"Ferme du Lac, Rucher des Prés\",24");
        assert_eq!(lines[2], "\"GAEC \"\"Les Vergers\"\"\",12.50");
    }
}
