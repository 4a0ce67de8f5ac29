//! Reading and mutating tabular fixtures

use chrono::{Days, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use mavis_common::normalize_whitespace;

use crate::data::spreadsheet;
use crate::data::table::{with_stem_suffix, CsvTable};
use crate::error::{DataError, DataResult};

pub const CHILD_DATE_OF_BIRTH: &str = "CHILD_DATE_OF_BIRTH";
pub const CHILD_SCHOOL_URN: &str = "CHILD_SCHOOL_URN";
pub const CHILD_FIRST_NAME: &str = "CHILD_FIRST_NAME";
pub const CHILD_LAST_NAME: &str = "CHILD_LAST_NAME";
pub const PERSON_SURNAME: &str = "PERSON_SURNAME";
pub const PERSON_FORENAME: &str = "PERSON_FORENAME";
pub const TEST_DESC_IGNORED: &str = "TEST_DESC_IGNORED";

/// Stem suffix of files written by [`set_site_for_child_list`], before the site id
pub const SITE_SUFFIX: &str = "withsite";

/// Stem suffix of files written by [`set_first_name_for_child_list`]
pub const DIFFERENT_FIRST_NAME_SUFFIX: &str = "with_different_first_name";

/// Date layouts accepted in the date of birth column, tried in order
const DATE_OF_BIRTH_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y"];

/// Joined scenario descriptions from the `TEST_DESC_IGNORED` column
///
/// Returns `None` for a completely empty file or one without the column.
pub fn read_scenario_list_from_file(input_file_path: &Path) -> DataResult<Option<String>> {
    let table = CsvTable::read(input_file_path)?;
    if table.is_empty_file() || !table.has_column(TEST_DESC_IGNORED) {
        return Ok(None);
    }
    Ok(Some(table.column(TEST_DESC_IGNORED)?.join(", ")))
}

/// First non-blank `SESSION_ID` on the `Vaccinations` sheet of a workbook
pub fn get_session_id(path: &Path) -> DataResult<String> {
    spreadsheet::first_valid_value(path, spreadsheet::VACCINATIONS_SHEET, spreadsheet::SESSION_ID)?
        .ok_or(DataError::NoValidSessionId)
}

/// Names of every record as the service lists them: `"<last>, <first>"`
///
/// Vaccination files carry `PERSON_SURNAME`/`PERSON_FORENAME`, child and
/// class list files `CHILD_LAST_NAME`/`CHILD_FIRST_NAME`.
pub fn create_child_list_from_file(
    file_path: &Path,
    is_vaccinations: bool,
) -> DataResult<Vec<String>> {
    let (last_col, first_col) = if is_vaccinations {
        (PERSON_SURNAME, PERSON_FORENAME)
    } else {
        (CHILD_LAST_NAME, CHILD_FIRST_NAME)
    };

    let table = CsvTable::read(file_path)?;
    let last_names = table.column(last_col)?;
    let first_names = table.column(first_col)?;

    Ok(last_names
        .into_iter()
        .zip(first_names)
        .map(|(last, first)| {
            format!("{}, {}", normalize_whitespace(last), normalize_whitespace(first))
        })
        .collect())
}

/// Move every date of birth one day later, rewriting the file in place
pub fn increment_date_of_birth_for_records(file_path: &Path) -> DataResult<()> {
    let mut table = CsvTable::read(file_path)?;
    table.try_map_column(CHILD_DATE_OF_BIRTH, |row, value| shift_date(row, value, 1))?;
    table.save()?;

    info!(
        "Shifted {} date(s) of birth in {}",
        table.len(),
        file_path.display()
    );
    Ok(())
}

/// Append `site_identifier` to every school URN, writing `<stem>withsite<id>`
pub fn set_site_for_child_list(file_path: &Path, site_identifier: &str) -> DataResult<PathBuf> {
    RecordFileGenerator::default().set_site_for_child_list(file_path, site_identifier)
}

/// Give every child the same first name, writing `<stem>with_different_first_name`
pub fn set_first_name_for_child_list(file_path: &Path, first_name: &str) -> DataResult<PathBuf> {
    RecordFileGenerator::default().set_first_name_for_child_list(file_path, first_name)
}

fn shift_date(row: usize, value: &str, days: u64) -> DataResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(value.to_string());
    }

    let parse_error = || DataError::DateParse {
        row,
        value: value.to_string(),
    };

    let (date, format) = DATE_OF_BIRTH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok().map(|d| (d, *fmt)))
        .ok_or_else(parse_error)?;

    let shifted = date.checked_add_days(Days::new(days)).ok_or_else(parse_error)?;
    Ok(shifted.format(format).to_string())
}

/// Writes derived record files, optionally tagging names with a run token
#[derive(Debug, Clone, Default)]
pub struct RecordFileGenerator {
    run_token: Option<String>,
}

impl RecordFileGenerator {
    pub fn new(run_token: Option<String>) -> Self {
        Self { run_token }
    }

    pub fn run_token(&self) -> Option<&str> {
        self.run_token.as_deref()
    }

    /// Path beside `source` whose stem carries `suffix` and the run token
    pub fn derived_path(&self, source: &Path, suffix: &str) -> PathBuf {
        match &self.run_token {
            Some(token) => with_stem_suffix(source, &format!("{}_{}", suffix, token)),
            None => with_stem_suffix(source, suffix),
        }
    }

    /// See [`set_site_for_child_list`]
    pub fn set_site_for_child_list(
        &self,
        file_path: &Path,
        site_identifier: &str,
    ) -> DataResult<PathBuf> {
        let mut table = CsvTable::read(file_path)?;
        table.map_column(CHILD_SCHOOL_URN, |urn| format!("{}{}", urn, site_identifier))?;

        let suffix = format!("{}{}", SITE_SUFFIX, site_identifier);
        let new_file_path = self.derived_path(file_path, &suffix);
        table.write(&new_file_path)?;

        info!("Wrote site {} list to {}", site_identifier, new_file_path.display());
        Ok(new_file_path)
    }

    /// See [`set_first_name_for_child_list`]
    pub fn set_first_name_for_child_list(
        &self,
        file_path: &Path,
        first_name: &str,
    ) -> DataResult<PathBuf> {
        let mut table = CsvTable::read(file_path)?;
        table.fill_column(CHILD_FIRST_NAME, first_name)?;

        let new_file_path = self.derived_path(file_path, DIFFERENT_FIRST_NAME_SUFFIX);
        table.write(&new_file_path)?;

        debug!("First name set to {:?} for {} row(s)", first_name, table.len());
        info!("Wrote renamed list to {}", new_file_path.display());
        Ok(new_file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("2014-02-28", "2014-03-01" ; "iso month end")]
    #[test_case("20161231", "20170101" ; "compact year end")]
    #[test_case("29/02/2016", "01/03/2016" ; "day first leap year")]
    #[test_case("", "" ; "empty untouched")]
    fn test_shift_date(input: &str, expected: &str) {
        assert_eq!(shift_date(0, input, 1).unwrap(), expected);
    }

    #[test]
    fn test_shift_date_rejects_garbage() {
        match shift_date(4, "next tuesday", 1).unwrap_err() {
            DataError::DateParse { row, value } => {
                assert_eq!(row, 4);
                assert_eq!(value, "next tuesday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_derived_path_with_and_without_token() {
        let source = Path::new("/fixtures/child/i_positive.csv");
        assert_eq!(
            RecordFileGenerator::default().derived_path(source, "withsite9"),
            PathBuf::from("/fixtures/child/i_positivewithsite9.csv")
        );
        assert_eq!(
            RecordFileGenerator::new(Some("run7".into())).derived_path(source, "withsite9"),
            PathBuf::from("/fixtures/child/i_positivewithsite9_run7.csv")
        );
    }
}
