//! Column-named numeric table persisted as CSV. Undefined cells are empty on disk.

use crate::error::TableError;
use crate::features::{columns, FeatureVector, TABLE_COLUMNS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io::{Read, Write};
use std::path::Path;

pub type Cell = Option<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl DatasetTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Empty table with the fixed 20-column schema.
    pub fn feature_schema() -> Self {
        Self::new(TABLE_COLUMNS.iter().map(|c| c.to_string()).collect())
    }

    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let mut t = Self::feature_schema();
        t.rows = vectors.iter().map(FeatureVector::to_row).collect();
        t
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, TableError> {
        let mut t = Self::new(columns);
        for row in rows {
            t.push_row(row)?;
        }
        Ok(t)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Indices of `names`, failing on the first one absent.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, TableError> {
        names.iter().map(|n| self.column_index(n.as_ref())).collect()
    }

    pub fn column_values(&self, name: &str) -> Result<Vec<Cell>, TableError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// The `label` column as 0/1 classes.
    pub fn binary_labels(&self) -> Result<Vec<u8>, TableError> {
        self.column_values(columns::LABEL)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if v == 0.0 => Ok(0),
                Some(v) if v == 1.0 => Ok(1),
                _ => Err(TableError::InvalidLabel { row, value }),
            })
            .collect()
    }

    /// New table holding the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Rows of `self` followed by rows of `other`, aligned by column name.
    pub fn concat(&self, other: &DatasetTable) -> Result<Self, TableError> {
        let mismatch = || TableError::SchemaMismatch {
            left: self.columns.clone(),
            right: other.columns.clone(),
        };
        if self.columns.len() != other.columns.len() {
            return Err(mismatch());
        }
        let mapping = self
            .columns
            .iter()
            .map(|c| other.column_index(c))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| mismatch())?;
        let mut out = self.clone();
        out.rows.extend(
            other
                .rows
                .iter()
                .map(|r| mapping.iter().map(|&i| r[i]).collect::<Vec<_>>()),
        );
        Ok(out)
    }

    /// Row order permuted by a seeded RNG.
    pub fn shuffled(&self, seed: u64) -> Self {
        let mut idx: Vec<usize> = (0..self.rows.len()).collect();
        idx.shuffle(&mut StdRng::seed_from_u64(seed));
        self.select_rows(&idx)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut table = Self::new(columns);
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let cells = record
                .iter()
                .zip(table.columns.iter())
                .map(|(raw, column)| {
                    parse_cell(raw).ok_or_else(|| TableError::InvalidCell {
                        row,
                        column: column.clone(),
                        value: raw.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            table.push_row(cells)?;
        }
        Ok(table)
    }

    pub fn read_csv(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|c| format_cell(*c)))?;
        }
        wtr.flush().map_err(|e| TableError::Csv(e.into()))?;
        Ok(())
    }

    /// Write the table, creating parent directories. Nothing is written if any row fails.
    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut buf = Vec::new();
        self.to_writer(&mut buf)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, buf).map_err(io_err)
    }
}

/// `Some(None)` for an undefined cell, `None` if the text is not numeric.
fn parse_cell(raw: &str) -> Option<Cell> {
    match raw {
        "" | "nan" | "NaN" | "NA" | "null" => Some(None),
        _ => {
            let v: f64 = raw.parse().ok()?;
            Some(if v.is_nan() { None } else { Some(v) })
        }
    }
}

fn format_cell(cell: Cell) -> String {
    match cell {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}
