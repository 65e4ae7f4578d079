//! Import tool error types

use attainments_common::errors::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Cannot read workbook '{path}': {message}")]
    Workbook { path: String, message: String },

    #[error("The workbook '{path}' has no sheets.")]
    EmptyWorkbook { path: String },

    #[error("Sheet '{sheet}' not found in the workbook '{path}'.")]
    SheetNotFound { sheet: String, path: String },

    #[error(
        "The following columns are missing in the data sheet '{sheet}' of workbook '{path}': {}.",
        .columns.join(", ")
    )]
    MissingColumns {
        sheet: String,
        path: String,
        columns: Vec<String>,
    },

    #[error(
        "The following fields have to be specified for all the users: {} (row {row}).",
        .fields.join(", ")
    )]
    MissingRequired { row: usize, fields: Vec<String> },

    #[error("Invalid value in row {row}, column '{column}': {message}")]
    InvalidCell {
        row: usize,
        column: String,
        message: String,
    },

    #[error(transparent)]
    App(#[from] AppError),
}
