//! Reading the first worksheet of a workbook or a CSV file

use crate::error::{SheetError, SheetResult};
use crate::format::SheetFormat;
use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;
use venue_core::columns::{EmployeeField, HeaderMap};
use venue_core::employees::EmployeeDraft;

/// One non-blank data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    /// 1-based row number in the sheet, header included
    pub number: usize,
    /// Cell text, left to right
    pub cells: Vec<String>,
}

/// Header row and data rows of a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRows {
    /// Header cells, trimmed
    pub headers: Vec<String>,
    /// Data rows, blank ones skipped
    pub rows: Vec<SheetRow>,
}

impl SheetRows {
    /// Build from raw rows, the first being the header
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Empty`] when there is no non-blank row.
    pub fn from_raw(raw: impl IntoIterator<Item = Vec<String>>) -> SheetResult<Self> {
        let mut raw = raw
            .into_iter()
            .enumerate()
            .filter(|(_, cells)| !is_blank(cells));

        let (_, mut headers) = raw.next().ok_or(SheetError::Empty)?;
        for header in &mut headers {
            *header = header.trim().trim_start_matches('\u{feff}').to_string();
        }
        let rows = raw
            .map(|(index, cells)| SheetRow {
                number: index + 1,
                cells,
            })
            .collect();

        Ok(Self { headers, rows })
    }

    /// Number of data rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}

/// Cell text; whole numbers lose their trailing `.0`
#[must_use]
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        #[allow(clippy::cast_possible_truncation)]
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

fn range_rows(range: &calamine::Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

fn csv_rows(bytes: &[u8]) -> SheetResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    reader
        .records()
        .map(|record| Ok(record?.iter().map(String::from).collect()))
        .collect()
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> SheetResult<Vec<Vec<String>>> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::NoWorksheet)??;
    Ok(range_rows(&range))
}

/// Read the first worksheet (or the CSV) at `path`
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unsupported
/// extension, or holds no rows.
pub fn read_rows(path: impl AsRef<Path>) -> SheetResult<SheetRows> {
    let path = path.as_ref();
    let raw = match SheetFormat::from_path(path)? {
        SheetFormat::Csv => csv_rows(&std::fs::read(path)?)?,
        SheetFormat::Xlsx | SheetFormat::Xls => first_sheet(&mut open_workbook_auto(path)?)?,
    };
    let rows = SheetRows::from_raw(raw)?;
    debug!(path = %path.display(), rows = rows.len(), "Read sheet");
    Ok(rows)
}

/// Read the first worksheet (or the CSV) from uploaded bytes
///
/// # Errors
///
/// Returns an error if the bytes do not parse as `format` or hold no rows.
pub fn read_rows_from_bytes(bytes: &[u8], format: SheetFormat) -> SheetResult<SheetRows> {
    let raw = match format {
        SheetFormat::Csv => csv_rows(bytes)?,
        SheetFormat::Xlsx | SheetFormat::Xls => {
            first_sheet(&mut open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?)?
        }
    };
    SheetRows::from_raw(raw)
}

/// Employee drafts from a sheet, each carrying its sheet row number
///
/// # Errors
///
/// Returns [`SheetError::MissingColumns`] when name, email or phone has no column.
pub fn employee_drafts(sheet: &SheetRows) -> SheetResult<Vec<EmployeeDraft>> {
    let columns = HeaderMap::from_headers(&sheet.headers);
    let missing = columns.missing_required();
    if !missing.is_empty() {
        return Err(SheetError::MissingColumns(
            missing
                .into_iter()
                .map(|field| field.template_header().to_string())
                .collect(),
        ));
    }
    if !columns.unmapped().is_empty() {
        debug!(unmapped = ?columns.unmapped(), "Ignoring unrecognised columns");
    }

    let text = |row: &SheetRow, field| columns.cell(row.cells.as_slice(), field).map(String::from);
    Ok(sheet
        .rows
        .iter()
        .map(|row| EmployeeDraft {
            row: Some(row.number),
            name: text(row, EmployeeField::Name).unwrap_or_default(),
            email: text(row, EmployeeField::Email).unwrap_or_default(),
            phone: text(row, EmployeeField::Phone).unwrap_or_default(),
            password: text(row, EmployeeField::Password),
            designation: text(row, EmployeeField::Designation),
            department: text(row, EmployeeField::Department),
            employee_code: text(row, EmployeeField::EmployeeCode),
            plan: text(row, EmployeeField::Plan),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[rstest]
    #[case(Data::Float(9_876_543_210.0), "9876543210")]
    #[case(Data::Float(2.5), "2.5")]
    #[case(Data::Int(42), "42")]
    #[case(Data::Bool(true), "true")]
    #[case(Data::Empty, "")]
    #[case(Data::String("Asha".to_string()), "Asha")]
    fn test_cell_text(#[case] cell: Data, #[case] expected: &str) {
        assert_eq!(cell_text(&cell), expected);
    }

    #[test]
    fn test_blank_rows_are_skipped_but_numbered() {
        let rows = SheetRows::from_raw(vec![
            strings(&["", ""]),
            strings(&["\u{feff}Name ", " Email"]),
            strings(&["Asha", "a@acme.test"]),
            strings(&["  ", ""]),
            strings(&["Bilal", "b@acme.test"]),
        ])
        .unwrap();

        assert_eq!(rows.headers, vec!["Name", "Email"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows[0].number, 3);
        assert_eq!(rows.rows[1].number, 5);
    }

    #[test]
    fn test_sheet_without_rows_is_empty_error() {
        assert!(matches!(
            SheetRows::from_raw(vec![strings(&["", " "])]),
            Err(SheetError::Empty)
        ));
    }

    #[test]
    fn test_csv_bytes() {
        let csv = b"Full Name,E-mail,Mobile No.,Dept\nAsha,a@acme.test,9800000000,Ops\n,,,\n";
        let rows = read_rows_from_bytes(csv, SheetFormat::Csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows[0].cells[3], "Ops");
    }

    #[test]
    fn test_employee_drafts_map_headers() {
        let sheet = SheetRows::from_raw(vec![
            strings(&["Employee Name", "Email Address", "Phone Number", "Team", "Notes"]),
            strings(&[" Asha ", "a@acme.test", "9800000000", "", "vip"]),
            strings(&["Bilal", "b@acme.test", "9811111111", "Ops"]),
        ])
        .unwrap();

        let drafts = employee_drafts(&sheet).unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].row, Some(2));
        assert_eq!(drafts[0].name, "Asha");
        assert_eq!(drafts[0].department, None);
        assert_eq!(drafts[1].department.as_deref(), Some("Ops"));
        assert_eq!(drafts[1].password, None);
    }

    #[test]
    fn test_employee_drafts_require_columns() {
        let sheet = SheetRows::from_raw(vec![strings(&["Name", "Mobile"]), strings(&["Asha", "98"])]).unwrap();
        match employee_drafts(&sheet) {
            Err(SheetError::MissingColumns(columns)) => assert_eq!(columns, vec!["email"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
