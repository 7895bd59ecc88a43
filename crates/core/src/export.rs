//! CSV rendering of a filtered projection.
//!
//! Cells are comma-joined verbatim. Values containing commas or newlines are
//! not quoted, matching what the dashboards have always downloaded.

use serde::Serialize;

use crate::reference::ReferenceSet;
use crate::resource::Resource;

/// A rendered export ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
}

/// Header row plus one line per record, joined by `\n` with no trailing
/// newline.
pub fn to_csv<R: Resource>(records: &[&R], refs: &ReferenceSet) -> CsvExport {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(R::KIND.csv_header().join(","));
    for record in records {
        lines.push(record.csv_row(refs).join(","));
    }
    CsvExport {
        file_name: R::KIND.csv_file_name().to_string(),
        contents: lines.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ResourceKind;
    use crate::reference::ReferenceOption;
    use crate::schema::{Machine, WorkOrder};

    fn machine(id: &str, name: &str, plant_id: Option<&str>) -> Machine {
        Machine {
            machine_id: id.into(),
            name: name.into(),
            model: "M-1".into(),
            manufacturer: "Acme".into(),
            serial_number: format!("SN{id}"),
            plant_id: plant_id.map(str::to_string),
            plant: None,
        }
    }

    #[test]
    fn machines_export_resolves_plants_from_references() {
        let mut refs = ReferenceSet::new();
        refs.insert(
            ResourceKind::Plants,
            vec![ReferenceOption {
                id: "p1".into(),
                label: "North".into(),
            }],
        );
        let a = machine("1", "Pump A", Some("p1"));
        let b = machine("2", "Pump B", None);
        let export = to_csv(&[&a, &b], &refs);
        assert_eq!(export.file_name, "machines.csv");
        assert_eq!(
            export.contents,
            "Name,Model,Manufacturer,Serial Number,Plant\n\
             Pump A,M-1,Acme,SN1,North\n\
             Pump B,M-1,Acme,SN2,N/A"
        );
    }

    #[test]
    fn empty_projection_is_header_only() {
        let export = to_csv::<WorkOrder>(&[], &ReferenceSet::new());
        assert_eq!(export.file_name, "work_orders.csv");
        assert_eq!(
            export.contents,
            "Title,Description,Status,Priority,Due Date,Machine,Plant,Assigned To"
        );
    }

    #[test]
    fn commas_are_not_escaped() {
        let mut m = machine("1", "Pump, large", None);
        m.model = String::new();
        let export = to_csv(&[&m], &ReferenceSet::new());
        let row = export.contents.lines().nth(1).unwrap();
        assert_eq!(row, "Pump, large,,Acme,SN1,N/A");
    }
}
