//! Flat CSV records, one row per annotation.
//!
//! Layout: a header row `id,name,x1,y1,x2,y2`, then one row per annotation
//! in store order. Extra trailing columns are ignored on read.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::annotation::{Annotation, AnnotationId, AnnotationStore};
use crate::format::error::FormatError;
use crate::geometry::{BoundingBox, Coord};

/// Column names, in file order.
pub const HEADER: [&str; 6] = ["id", "name", "x1", "y1", "x2", "y2"];

/// Number of fields a data row must have.
pub const FIELD_COUNT: usize = HEADER.len();

/// One persisted annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub name: String,
    pub x1: Coord,
    pub y1: Coord,
    pub x2: Coord,
    pub y2: Coord,
}

impl AnnotationRecord {
    /// Box as written in the record, not normalized.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// Parse a raw row. `row` is the 1-based data row number used in errors.
    pub fn from_fields<S: AsRef<str>>(fields: &[S], row: usize) -> Result<Self, FormatError> {
        if fields.len() < FIELD_COUNT {
            return Err(FormatError::TooFewFields {
                row,
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        }

        let int = |index: usize| -> Result<Coord, FormatError> {
            let value = fields[index].as_ref().trim();
            value.parse().map_err(|_| FormatError::InvalidNumber {
                row,
                field: HEADER[index],
                value: value.to_string(),
            })
        };

        let id = fields[0].as_ref().trim();
        let id = id.parse().map_err(|_| FormatError::InvalidNumber {
            row,
            field: HEADER[0],
            value: id.to_string(),
        })?;

        Ok(Self {
            id,
            name: fields[1].as_ref().to_string(),
            x1: int(2)?,
            y1: int(3)?,
            x2: int(4)?,
            y2: int(5)?,
        })
    }
}

impl From<&Annotation> for AnnotationRecord {
    fn from(ann: &Annotation) -> Self {
        Self {
            id: ann.id,
            name: ann.name.clone(),
            x1: ann.bbox.x1,
            y1: ann.bbox.y1,
            x2: ann.bbox.x2,
            y2: ann.bbox.y2,
        }
    }
}

/// Snapshot every annotation in the store as a record.
pub fn records_from_store(store: &AnnotationStore) -> Vec<AnnotationRecord> {
    store.iter().map(AnnotationRecord::from).collect()
}

/// Parse raw rows, the first of which must be the header.
///
/// Fails on the first bad row; nothing is returned for a partially valid input.
pub fn parse_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Vec<AnnotationRecord>, FormatError> {
    let (_header, data) = rows.split_first().ok_or(FormatError::MissingHeader)?;
    data.iter()
        .enumerate()
        .map(|(index, fields)| AnnotationRecord::from_fields(fields, index + 1))
        .collect()
}

/// Write the header and all records as CSV.
pub fn write_records<W: Write>(records: &[AnnotationRecord], writer: W) -> Result<(), FormatError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read CSV records. The first row is treated as the header and skipped.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<AnnotationRecord>, FormatError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = rdr.records();
    match rows.next() {
        Some(header) => {
            header?;
        }
        None => return Err(FormatError::MissingHeader),
    }

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        let row = row?;
        let fields: Vec<&str> = row.iter().collect();
        records.push(AnnotationRecord::from_fields(&fields, index + 1)?);
    }
    Ok(records)
}

/// Write records to a CSV file.
pub fn export_path(records: &[AnnotationRecord], path: &Path) -> Result<(), FormatError> {
    let file = File::create(path)?;
    write_records(records, file)?;
    log::info!("Exported {} annotations to {:?}", records.len(), path);
    Ok(())
}

/// Read records from a CSV file.
pub fn import_path(path: &Path) -> Result<Vec<AnnotationRecord>, FormatError> {
    let file = File::open(path)?;
    let records = read_records(file)?;
    log::info!("Read {} annotation rows from {:?}", records.len(), path);
    Ok(records)
}
