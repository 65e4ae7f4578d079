//! Workbook reading: sheet selection, header checks and row conversion
//!
//! The whole sheet is converted before anything is written, so a bad
//! header or an incomplete row aborts the run with the database untouched.

use crate::errors::ImportError;
use attainments_common::db::models::Sex;
use attainments_common::services::accounts::NewUser;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::{debug, info};

/// Sheet read when none is named on the command line
pub const DEFAULT_SHEET: &str = "accounts.user";

/// Every column the user sheet must carry
pub const USER_COLUMNS: [&str; 9] = [
    "id",
    "username",
    "password",
    "email",
    "is_staff",
    "is_superuser",
    "first_name",
    "last_name",
    "sex",
];

/// Columns that must be filled on every row
pub const REQUIRED_COLUMNS: [&str; 3] = ["id", "username", "password"];

/// One data row, ready for account creation
#[derive(Debug, Clone)]
pub struct UserRow {
    /// 1-based row number in the sheet, header included
    pub row: usize,
    pub user: NewUser,
}

/// Read the user rows of `sheet` from the workbook at `path`
pub fn read_users(path: &Path, sheet: &str) -> Result<Vec<UserRow>, ImportError> {
    let workbook_path = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| ImportError::Workbook {
        path: workbook_path.clone(),
        message: e.to_string(),
    })?;

    let sheet = select_sheet(&workbook.sheet_names(), sheet, &workbook_path)?;
    info!(sheet = %sheet, workbook = %path.display(), "Reading users");

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::Workbook {
            path: workbook_path.clone(),
            message: e.to_string(),
        })?;

    parse_users(&range, &sheet, &workbook_path)
}

/// Pick the sheet to read
///
/// A workbook with several sheets must contain the requested one; a
/// single-sheet workbook is read whatever its sheet is called.
pub fn select_sheet(sheets: &[String], requested: &str, path: &str) -> Result<String, ImportError> {
    match sheets {
        [] => Err(ImportError::EmptyWorkbook {
            path: path.to_string(),
        }),
        [only] => Ok(only.clone()),
        _ => sheets
            .iter()
            .find(|name| name.as_str() == requested)
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound {
                sheet: requested.to_string(),
                path: path.to_string(),
            }),
    }
}

/// Convert a sheet whose first row is the header
pub fn parse_users(range: &Range<Data>, sheet: &str, path: &str) -> Result<Vec<UserRow>, ImportError> {
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default();

    let missing: Vec<String> = USER_COLUMNS
        .iter()
        .filter(|column| !header.iter().any(|h| h == *column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns {
            sheet: sheet.to_string(),
            path: path.to_string(),
            columns: missing,
        });
    }

    let columns = SheetColumns::new(&header);
    let mut users = Vec::new();

    for (index, cells) in rows.enumerate() {
        let row = index + 2;
        if cells.iter().all(|cell| cell_text(cell).is_empty()) {
            debug!(row, "Skipping empty row");
            continue;
        }
        users.push(columns.user(row, cells)?);
    }

    Ok(users)
}

/// Header positions of the user columns
struct SheetColumns<'a> {
    header: &'a [String],
}

impl<'a> SheetColumns<'a> {
    fn new(header: &'a [String]) -> Self {
        Self { header }
    }

    fn cell<'c>(&self, cells: &'c [Data], column: &str) -> &'c Data {
        self.header
            .iter()
            .position(|h| h == column)
            .and_then(|index| cells.get(index))
            .unwrap_or(&Data::Empty)
    }

    fn text(&self, cells: &[Data], column: &str) -> String {
        cell_text(self.cell(cells, column))
    }

    fn flag(&self, row: usize, cells: &[Data], column: &str) -> Result<bool, ImportError> {
        cell_bool(self.cell(cells, column)).ok_or_else(|| ImportError::InvalidCell {
            row,
            column: column.to_string(),
            message: "expected a true/false value".to_string(),
        })
    }

    fn user(&self, row: usize, cells: &[Data]) -> Result<UserRow, ImportError> {
        if REQUIRED_COLUMNS
            .iter()
            .any(|column| self.text(cells, column).is_empty())
        {
            return Err(ImportError::MissingRequired {
                row,
                fields: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            });
        }

        let id = cell_id(self.cell(cells, "id")).ok_or_else(|| ImportError::InvalidCell {
            row,
            column: "id".to_string(),
            message: "expected a positive whole number".to_string(),
        })?;

        let sex_code = self.text(cells, "sex");
        let sex = Sex::from_code(&sex_code);
        if sex.is_none() && !sex_code.is_empty() {
            return Err(ImportError::InvalidCell {
                row,
                column: "sex".to_string(),
                message: format!("unknown code '{}'", sex_code),
            });
        }

        let email = self.text(cells, "email");

        Ok(UserRow {
            row,
            user: NewUser {
                id: Some(id),
                username: self.text(cells, "username"),
                password: self.text(cells, "password"),
                email: (!email.is_empty()).then_some(email),
                first_name: self.text(cells, "first_name"),
                last_name: self.text(cells, "last_name"),
                is_staff: self.flag(row, cells, "is_staff")?,
                is_superuser: self.flag(row, cells, "is_superuser")?,
                sex,
            },
        })
    }
}

/// Cell as trimmed text; whole floats lose their fraction
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Boolean cell; empty means false, anything unrecognised is `None`
pub fn cell_bool(cell: &Data) -> Option<bool> {
    match cell {
        Data::Bool(b) => Some(*b),
        Data::Int(i) => Some(*i != 0),
        Data::Float(f) => Some(*f != 0.0),
        Data::Empty => Some(false),
        Data::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" | "no" => Some(false),
            "true" | "1" | "yes" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// Primary key cell: a positive whole number
pub fn cell_id(cell: &Data) -> Option<i32> {
    let id = match cell {
        Data::Int(i) => i32::try_from(*i).ok()?,
        Data::Float(f) if f.fract() == 0.0 => i32::try_from(*f as i64).ok()?,
        Data::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[Data]]) -> Range<Data> {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width - 1));
        for (r, cells) in rows.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn header() -> Vec<Data> {
        USER_COLUMNS.iter().map(|c| text(c)).collect()
    }

    #[test]
    fn test_select_sheet() {
        let one = vec!["Sheet1".to_string()];
        assert_eq!(select_sheet(&one, DEFAULT_SHEET, "w.xlsx").unwrap(), "Sheet1");

        let many = vec!["notes".to_string(), DEFAULT_SHEET.to_string()];
        assert_eq!(select_sheet(&many, DEFAULT_SHEET, "w.xlsx").unwrap(), DEFAULT_SHEET);

        let err = select_sheet(&many, "people", "w.xlsx").unwrap_err();
        assert_eq!(err.to_string(), "Sheet 'people' not found in the workbook 'w.xlsx'.");

        assert!(matches!(
            select_sheet(&[], DEFAULT_SHEET, "w.xlsx"),
            Err(ImportError::EmptyWorkbook { .. })
        ));
    }

    #[test]
    fn test_missing_columns_are_all_listed() {
        let range = sheet(&[&[text("id"), text("username"), text("password"), text("email")]]);

        let err = parse_users(&range, DEFAULT_SHEET, "w.xlsx").unwrap_err();
        match &err {
            ImportError::MissingColumns { columns, .. } => assert_eq!(
                columns,
                &["is_staff", "is_superuser", "first_name", "last_name", "sex"]
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().ends_with("is_staff, is_superuser, first_name, last_name, sex."));
    }

    #[test]
    fn test_defaults_for_empty_optional_cells() {
        let header = header();
        let row = vec![
            Data::Float(7.0),
            text("anowak"),
            text("secret"),
            Data::Empty,
            Data::Empty,
            Data::Bool(true),
            text("Anna"),
            Data::Empty,
            text("W"),
        ];
        let range = sheet(&[&header, &row]);

        let users = parse_users(&range, DEFAULT_SHEET, "w.xlsx").unwrap();
        assert_eq!(users.len(), 1);

        let UserRow { row, user } = &users[0];
        assert_eq!(*row, 2);
        assert_eq!(user.id, Some(7));
        assert_eq!(user.username, "anowak");
        assert_eq!(user.email, None);
        assert!(!user.is_staff);
        assert!(user.is_superuser);
        assert_eq!(user.last_name, "");
        assert_eq!(user.sex, Some(Sex::Woman));
    }

    #[test]
    fn test_required_cells_abort() {
        let header = header();
        let complete = vec![Data::Int(1), text("anowak"), text("secret")];
        let no_password = vec![Data::Int(2), text("jkowalski")];
        let range = sheet(&[&header, &complete, &no_password]);

        let err = parse_users(&range, DEFAULT_SHEET, "w.xlsx").unwrap_err();
        assert!(matches!(err, ImportError::MissingRequired { row: 3, .. }));
        assert!(err.to_string().contains("id, username, password"));
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let header = header();
        let blank = vec![Data::Empty, text("  ")];
        let user = vec![Data::Int(3), text("pwisniewski"), text("secret")];
        let range = sheet(&[&header, &blank, &user]);

        let users = parse_users(&range, DEFAULT_SHEET, "w.xlsx").unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].row, 3);
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&text("  x ")), "x");
        assert_eq!(cell_bool(&text("TRUE")), Some(true));
        assert_eq!(cell_bool(&Data::Int(0)), Some(false));
        assert_eq!(cell_bool(&text("maybe")), None);
        assert_eq!(cell_id(&text("42")), Some(42));
        assert_eq!(cell_id(&Data::Float(1.5)), None);
        assert_eq!(cell_id(&Data::Int(0)), None);
    }

    #[test]
    fn test_unknown_sex_code_rejected() {
        let header = header();
        let row = vec![
            Data::Int(1),
            text("anowak"),
            text("secret"),
            Data::Empty,
            Data::Empty,
            Data::Empty,
            Data::Empty,
            Data::Empty,
            text("X"),
        ];
        let range = sheet(&[&header, &row]);

        let err = parse_users(&range, DEFAULT_SHEET, "w.xlsx").unwrap_err();
        assert!(matches!(err, ImportError::InvalidCell { ref column, .. } if column == "sex"));
    }
}
