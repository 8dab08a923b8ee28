use std::path::Path;

use crate::error::{PlynkError, Result};

/// Semantic type of a column in a plink text table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
}

/// One registry entry: column name, semantic type, and the sentinel that
/// stands in for a missing value in that column (plink has no true null
/// marker). Entries are static and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub missing: Option<&'static str>,
}

/// Variant metadata, matching the .bim file convention.
pub const BIM: &[Column] = &[
    Column {
        name: "chrom",
        kind: ColumnKind::Text,
        missing: Some("0"),
    },
    Column {
        name: "snp",
        kind: ColumnKind::Text,
        missing: None,
    },
    Column {
        name: "pos",
        kind: ColumnKind::Real,
        missing: Some("0"),
    },
    Column {
        name: "coord",
        kind: ColumnKind::Integer,
        missing: None,
    },
    Column {
        name: "alt_allele",
        kind: ColumnKind::Text,
        missing: Some("0"),
    },
    Column {
        name: "ref_allele",
        kind: ColumnKind::Text,
        missing: Some("0"),
    },
];

/// Sample metadata, matching the .fam file convention.
pub const FAM: &[Column] = &[
    Column {
        name: "fid",
        kind: ColumnKind::Text,
        missing: Some("0"),
    },
    Column {
        name: "iid",
        kind: ColumnKind::Text,
        missing: None,
    },
    Column {
        name: "father_iid",
        kind: ColumnKind::Text,
        missing: Some("0"),
    },
    Column {
        name: "mother_iid",
        kind: ColumnKind::Text,
        missing: Some("0"),
    },
    Column {
        name: "sex",
        kind: ColumnKind::Real,
        missing: Some("0"),
    },
    Column {
        name: "phenotype",
        kind: ColumnKind::Real,
        missing: Some("-9"),
    },
];

/// Looks up a built-in schema by plink file type.
pub fn schema(file_type: &str) -> Option<&'static [Column]> {
    match file_type {
        "bim" => Some(BIM),
        "fam" => Some(FAM),
        _ => None,
    }
}

/// One parsed field. `Missing` only arises from an empty input field;
/// sentinel values read back verbatim as data.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Real(f64),
    Missing,
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Cell::Real(v) => Some(*v),
            Cell::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// Rows of typed cells. Column layout comes entirely from the schema the
/// table is read or written with; there is no header row in the files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// Reads a header-less comma-delimited table, typing every field from the
/// schema. The schema is authoritative; there are no per-call overrides.
pub fn read_typed_csv(path: impl AsRef<Path>, columns: &[Column]) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| PlynkError::CsvRead {
            source,
            path: path.to_path_buf(),
        })?;

    let mut table = Table::new();
    for (idx, record) in reader.records().enumerate() {
        let line_num = idx + 1;
        let record = record.map_err(|source| PlynkError::CsvRead {
            source,
            path: path.to_path_buf(),
        })?;
        if record.len() != columns.len() {
            return Err(PlynkError::FieldCount {
                line_num,
                n_fields: record.len(),
                expected: columns.len(),
            });
        }

        let mut row = Vec::with_capacity(columns.len());
        for (field, column) in record.iter().zip(columns) {
            row.push(parse_cell(field, column, line_num)?);
        }
        table.push_row(row);
    }
    Ok(table)
}

fn parse_cell(field: &str, column: &Column, line_num: usize) -> Result<Cell> {
    if field.is_empty() {
        return Ok(Cell::Missing);
    }
    match column.kind {
        ColumnKind::Text => Ok(Cell::Text(field.to_string())),
        ColumnKind::Integer => field.parse::<i64>().map(Cell::Integer).map_err(|_| {
            PlynkError::FieldParse {
                field: field.to_string(),
                kind: "integer",
                line_num,
            }
        }),
        ColumnKind::Real => {
            field
                .parse::<f64>()
                .map(Cell::Real)
                .map_err(|_| PlynkError::FieldParse {
                    field: field.to_string(),
                    kind: "real",
                    line_num,
                })
        }
    }
}

/// Writes a header-less comma-delimited table. Missing cells take the
/// column's sentinel (or an empty field when the column has none), and
/// integer columns round values that arrive as floating point.
pub fn write_typed_csv(table: &Table, path: impl AsRef<Path>, columns: &[Column]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| PlynkError::CsvWrite {
            source,
            path: path.to_path_buf(),
        })?;

    for (idx, row) in table.rows().iter().enumerate() {
        if row.len() != columns.len() {
            return Err(PlynkError::FieldCount {
                line_num: idx + 1,
                n_fields: row.len(),
                expected: columns.len(),
            });
        }

        let record: Vec<String> = row
            .iter()
            .zip(columns)
            .map(|(cell, column)| render_cell(cell, column))
            .collect();
        writer
            .write_record(&record)
            .map_err(|source| PlynkError::CsvWrite {
                source,
                path: path.to_path_buf(),
            })?;
    }

    writer.flush().map_err(|e| PlynkError::Write {
        source: e,
        path: path.to_path_buf(),
    })?;
    Ok(())
}

fn render_cell(cell: &Cell, column: &Column) -> String {
    match cell {
        Cell::Missing => column.missing.unwrap_or("").to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Integer(v) => v.to_string(),
        Cell::Real(v) => match column.kind {
            ColumnKind::Integer => (v.round() as i64).to_string(),
            _ => v.to_string(),
        },
    }
}
