use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::record::{ColumnSource, IndexedTable};
use crate::model::table::CellValue;
use crate::report::{ReportError, format_f64_6};

/// Columns never exported; geometry belongs to the map renderer.
pub const EXCLUDED_COLUMNS: &[&str] = &["geometry"];

pub fn write_index_tsv(table: &IndexedTable, path: &Path) -> Result<(), ReportError> {
    let mut w = BufWriter::new(File::create(path)?);
    render_index_tsv(table, &mut w)?;
    w.flush()?;
    Ok(())
}

pub fn render_index_tsv<W: Write>(table: &IndexedTable, w: &mut W) -> std::io::Result<()> {
    let columns = table
        .layout()
        .iter()
        .filter(|c| !EXCLUDED_COLUMNS.contains(&c.name.as_str()))
        .collect::<Vec<_>>();

    let header = columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
    writeln!(w, "{}", header.join("\t"))?;

    for row in table.rows() {
        let mut fields = Vec::with_capacity(columns.len());
        for col in &columns {
            let value = table.value(row, &col.source);
            fields.push(format_cell(&value, &col.source));
        }
        writeln!(w, "{}", fields.join("\t"))?;
    }
    Ok(())
}

fn format_cell(value: &CellValue, source: &ColumnSource) -> String {
    match (value, source) {
        (CellValue::Number(v), ColumnSource::Index) => format!("{:.4}", v),
        (CellValue::Number(v), ColumnSource::Percentile) => format!("{:.0}", v),
        (CellValue::Number(v), _) => format_f64_6(*v),
        (CellValue::Text(s), _) => s.replace(['\t', '\n', '\r'], " "),
        (CellValue::Missing, _) => String::new(),
    }
}
