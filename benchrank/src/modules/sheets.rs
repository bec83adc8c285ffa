use anyhow::Context;
use serde::Deserialize;
use serde_with::serde_as;
use std::{collections::HashMap, fs::File, io::Read, path::Path};

use crate::common::CellText;

/// One row of a benchmark table: marker, date, label, then the score columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(pub Vec<Option<String>>);

impl Row {
    pub const MARKER: usize = 0;
    pub const DATE: usize = 1;
    pub const LABEL: usize = 2;
    pub const FIRST_SCORE: usize = 3;

    /// The trimmed text of a cell, or `None` if it is missing or blank.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.0
            .get(index)
            .and_then(|cell| cell.as_deref())
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
    }

    pub fn marker(&self) -> Option<&str> {
        self.cell(Self::MARKER)
    }

    pub fn date(&self) -> Option<&str> {
        self.cell(Self::DATE)
    }

    /// A missing label marks the end of the table.
    pub fn label(&self) -> Option<&str> {
        self.cell(Self::LABEL)
    }

    /// The `n`th score cell, counting from zero.
    pub fn score(&self, n: usize) -> Option<&str> {
        self.cell(Self::FIRST_SCORE + n)
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|cell| Some(cell.into())).collect())
    }
}

impl From<Vec<&str>> for Row {
    fn from(cells: Vec<&str>) -> Self {
        cells.into_iter().collect()
    }
}

/// Something that can hand out the rows of a named sheet.
///
/// Rows are returned exactly as stored, header rows included.
pub trait SheetSource {
    fn sheet(&mut self, name: &str) -> anyhow::Result<Vec<Row>>;
}

/// Sheets held in memory, mostly for tests and for callers that fetch rows themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySheets(pub HashMap<String, Vec<Row>>);

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, rows: Vec<Row>) -> &mut Self {
        self.0.insert(name.into(), rows);
        self
    }
}

impl SheetSource for MemorySheets {
    fn sheet(&mut self, name: &str) -> anyhow::Result<Vec<Row>> {
        self.0
            .get(name)
            .cloned()
            .with_context(|| format!("no sheet named {:?}", name))
    }
}

#[serde_as]
#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    #[serde_as(as = "Vec<Vec<CellText>>")]
    values: Vec<Vec<Option<String>>>,
}

/// A workbook saved as JSON, one spreadsheet "values" range per sheet:
///
/// ```txt
/// {
///   "GeekBench 4": { "values": [["", "", "header"], ["+", "01.02.2019", "Nokia 1 (MT6737M)", 1900, 650]] },
///   "battery_test": { "values": [...] }
/// }
/// ```
#[derive(Deserialize)]
#[serde(transparent)]
pub struct JsonSheets {
    sheets: HashMap<String, ValueRange>,
}

impl JsonSheets {
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        serde_json::from_reader(reader).context("could not parse JSON workbook")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("could not open workbook {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }
}

impl SheetSource for JsonSheets {
    fn sheet(&mut self, name: &str) -> anyhow::Result<Vec<Row>> {
        let range = self
            .sheets
            .get(name)
            .with_context(|| format!("no sheet named {:?} in workbook", name))?;
        Ok(range.values.iter().cloned().map(Row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonSheets, MemorySheets, Row, SheetSource};

    #[test]
    fn test_row_cells() {
        let row = Row::from(vec!["+", " 01.02.2019 ", "Nokia 1 (MT6737M)", "1900", ""]);
        assert_eq!(row.marker(), Some("+"));
        assert_eq!(row.date(), Some("01.02.2019"));
        assert_eq!(row.label(), Some("Nokia 1 (MT6737M)"));
        assert_eq!(row.score(0), Some("1900"));
        assert_eq!(row.score(1), None);
        assert_eq!(row.score(2), None);

        let short = Row(vec![None, None]);
        assert_eq!(short.label(), None);
    }

    #[test]
    fn test_memory_sheets() {
        let mut sheets = MemorySheets::new();
        sheets.insert("antutu", vec![Row::from(vec!["", "", "Honor 10 (Kirin 970)", "210000"])]);
        assert_eq!(sheets.sheet("antutu").unwrap().len(), 1);
        assert!(sheets.sheet("geekbench").is_err());
    }

    #[test]
    fn test_json_sheets() {
        let json = r#"{
            "GeekBench 4": {
                "range": "'GeekBench 4'!A1:F4",
                "values": [
                    ["", "", "Smartphone", "Multi", "Single"],
                    [],
                    ["+", "01.02.2019", "Nokia 1 (MT6737M)", 1900, "650", null]
                ]
            },
            "empty": {}
        }"#;
        let mut sheets = JsonSheets::from_reader(json.as_bytes()).unwrap();

        let mut names: Vec<&str> = sheets.sheet_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["GeekBench 4", "empty"]);

        let rows = sheets.sheet("GeekBench 4").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], Row::default());
        assert_eq!(rows[2].label(), Some("Nokia 1 (MT6737M)"));
        assert_eq!(rows[2].score(0), Some("1900"));
        assert_eq!(rows[2].score(1), Some("650"));
        assert_eq!(rows[2].score(2), None);

        assert!(sheets.sheet("empty").unwrap().is_empty());
        assert!(sheets.sheet("battery_test").is_err());
    }
}
