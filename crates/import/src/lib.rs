//! Bulk user import from spreadsheet workbooks
//!
//! The `loadusers` binary reads a user sheet, checks its header and
//! required cells, then creates one account per row.

pub mod errors;
pub mod processor;
pub mod workbook;

pub use errors::ImportError;
pub use processor::{import_users, ImportSummary};
pub use workbook::{read_users, UserRow, DEFAULT_SHEET};
