//! Account creation for imported rows

use crate::errors::ImportError;
use crate::workbook::UserRow;
use attainments_common::errors::AppError;
use attainments_common::metrics;
use attainments_common::services::accounts;
use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::{error, info, instrument};

/// Outcome of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub failed: usize,
}

/// Create one account per row
///
/// A row the database refuses (taken id, username or other constraint) or
/// whose values do not validate is reported and skipped; the remaining rows
/// are still imported. Any other failure stops the run.
#[instrument(skip(db, rows), fields(rows = rows.len()))]
pub async fn import_users<C>(db: &C, rows: Vec<UserRow>) -> Result<ImportSummary, ImportError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut summary = ImportSummary::default();

    for UserRow { row, user } in rows {
        let username = user.username.clone();

        match accounts::create_user(db, user).await {
            Ok(created) => {
                summary.created += 1;
                metrics::record_import("created");
                info!(row, user_id = created.id, username = %username, "User imported");
            }
            Err(
                e @ (AppError::Duplicate { .. }
                | AppError::Integrity { .. }
                | AppError::Validation { .. }),
            ) => {
                summary.failed += 1;
                metrics::record_import("failed");
                error!(
                    row,
                    username = %username,
                    error = %e,
                    "Problems occurred when creating the user, check whether it is already saved"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(created = summary.created, failed = summary.failed, "Import finished");
    Ok(summary)
}
