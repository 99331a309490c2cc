//! Spreadsheet importer (pcat-im)
//!
//! Turns rows pasted from a spreadsheet (tab separated) or exported as CSV
//! into a pricing fixture document. The header row names the fields; one
//! column selects the pricing container each row belongs to.

pub mod error;
pub mod import;
pub mod table;

pub use error::ImportError;
pub use import::{build_document, import_text, ImportOptions, ImportSummary};
pub use table::{parse_table, Delimiter, Row, Table};
