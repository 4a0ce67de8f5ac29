//! Workbook fixtures (xlsx, xls, ods)

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::debug;

use crate::error::{DataError, DataResult};

pub const VACCINATIONS_SHEET: &str = "Vaccinations";
pub const SESSION_ID: &str = "SESSION_ID";

/// Values of `column` on `sheet`, as text, skipping empty cells
///
/// The first row of the sheet's used range is the header.
pub fn column_values(path: &Path, sheet: &str, column: &str) -> DataResult<Vec<String>> {
    if let Err(source) = std::fs::metadata(path) {
        return Err(DataError::Read {
            path: path.to_path_buf(),
            source,
        });
    }
    let mut workbook = open_workbook_auto(path)?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(DataError::MissingSheet {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        });
    }

    let range = workbook.worksheet_range(sheet)?;
    let mut rows = range.rows();

    let idx = rows
        .next()
        .and_then(|header| header.iter().position(|cell| cell.to_string().trim() == column))
        .ok_or_else(|| DataError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })?;

    let values: Vec<String> = rows
        .filter_map(|row| match row.get(idx) {
            None | Some(Data::Empty) => None,
            Some(cell) => Some(cell.to_string()),
        })
        .collect();

    debug!(
        "Read {} {} value(s) from sheet {} of {}",
        values.len(),
        column,
        sheet,
        path.display()
    );
    Ok(values)
}

/// First value of `column` that is not blank after trimming
pub fn first_valid_value(path: &Path, sheet: &str, column: &str) -> DataResult<Option<String>> {
    Ok(column_values(path, sheet, column)?
        .into_iter()
        .find(|value| !value.trim().is_empty()))
}
