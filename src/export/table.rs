//! Tabular dashboard data and its CSV / JSON renderings.

use serde_json::{Map, Value};

/// Header cells plus body rows, as displayed on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MetricsTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Every row, header row first.
    fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.headers).chain(self.rows.iter())
    }
}

/// Header row included; every cell trimmed and quoted, rows separated by `\n`.
pub fn to_csv(table: &MetricsTable) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());
    for row in table.all_rows() {
        writer.write_record(row.iter().map(|cell| cell.trim()))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut out = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    // No terminator after the last row.
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Body rows as objects keyed by header text, in column order.
pub fn to_json(table: &MetricsTable) -> Result<String, serde_json::Error> {
    let headers: Vec<&str> = table.headers.iter().map(|h| h.trim()).collect();
    let data: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for (index, cell) in row.iter().enumerate() {
                let key = match headers.get(index) {
                    Some(header) => header.to_string(),
                    None => format!("column_{}", index),
                };
                object.insert(key, Value::String(cell.trim().to_string()));
            }
            Value::Object(object)
        })
        .collect();
    serde_json::to_string_pretty(&data)
}
