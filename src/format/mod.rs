//! Annotation record import/export.
//!
//! Annotations persist as a flat table with one record per annotation and
//! the fixed columns `id, name, x1, y1, x2, y2`. A header row is always
//! written and always expected.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boxlabel::format::{read_records, write_records};
//!
//! let records = read_records(std::fs::File::open("labels.csv")?)?;
//! session.import_records(records)?;
//! write_records(&session.export_records(), std::io::stdout())?;
//! ```

mod error;
mod tabular;


pub use error::FormatError;
pub use tabular::{
    AnnotationRecord, FIELD_COUNT, HEADER, export_path, import_path, parse_rows, read_records,
    records_from_store, write_records,
};
