//! Plain-text tables for `--output text`.

use millwright_core::{ReferenceSet, Resource};

/// Print `records` as an aligned table: the id, then the export columns.
pub(crate) fn print_table<R: Resource>(records: &[&R], refs: &ReferenceSet) {
    if records.is_empty() {
        println!("No {} found.", R::KIND);
        return;
    }
    let mut header = vec!["ID".to_string()];
    header.extend(R::KIND.csv_header().iter().map(|h| h.to_string()));
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            let mut row = vec![r.id().to_string()];
            row.extend(r.csv_row(refs));
            row
        })
        .collect();
    print!("{}", format_table(&header, &rows));
}

/// Print a single record's detail lines (work-order parts and labor) under
/// its table. Prints nothing for kinds without details.
pub(crate) fn print_details<R: Resource>(record: &R) {
    let lines = record.details();
    if lines.is_empty() {
        return;
    }
    println!();
    for line in lines {
        println!("{}", line);
    }
}

fn format_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let mut line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    };
    line(header);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    line(&rule);
    for row in rows {
        line(row);
    }
    out
}
