//! Exporting rows to xlsx or CSV

use crate::error::SheetResult;
use crate::format::ExportFormat;
use indexmap::IndexSet;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde_json::Value;
use tracing::{debug, warn};

/// Excel limit on worksheet name length
const MAX_SHEET_NAME: usize = 31;

/// Excel limit on characters in one cell
pub const MAX_CELL_CHARS: usize = 32_767;

/// Appended to cell text cut at [`MAX_CELL_CHARS`]
pub const TRUNCATION_MARKER: &str = " [truncated]";

/// Column headers for `records`: every key, in first-seen order
#[must_use]
pub fn header_union(records: &[Value]) -> Vec<String> {
    let mut headers = IndexSet::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                headers.insert(key.clone());
            }
        }
    }
    headers.into_iter().collect()
}

/// Cell text for a JSON value; arrays and objects are JSON-encoded
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// Cell text that fits in an xlsx cell, cut with a marker when too long
#[must_use]
pub fn xlsx_cell_text(value: &Value) -> String {
    let text = value_text(value);
    let length = text.chars().count();
    if length <= MAX_CELL_CHARS {
        return text;
    }
    let keep = MAX_CELL_CHARS - TRUNCATION_MARKER.len();
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

fn write_sheet(sheet: &mut Worksheet, records: &[Value]) -> SheetResult<()> {
    let headers = header_union(records);
    let bold = Format::new().set_bold();

    for (col, header) in (0u16..).zip(&headers) {
        sheet.write_string_with_format(0, col, header, &bold)?;
    }
    for (row, record) in (1u32..).zip(records) {
        for (col, header) in (0u16..).zip(&headers) {
            match record.get(header) {
                None | Some(Value::Null) => {}
                Some(Value::Number(n)) => {
                    if let Some(number) = n.as_f64() {
                        sheet.write_number(row, col, number)?;
                    }
                }
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                Some(value) => {
                    let text = xlsx_cell_text(value);
                    if text.ends_with(TRUNCATION_MARKER) {
                        warn!(row, column = %header, "Cell exceeds the xlsx limit; truncated");
                    }
                    sheet.write_string(row, col, text)?;
                }
            }
        }
    }
    Ok(())
}

/// Worksheet name Excel accepts: no `[]:*?/\`, at most 31 characters
#[must_use]
pub fn sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\') { '_' } else { c })
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

fn export_csv(records: &[Value]) -> SheetResult<Vec<u8>> {
    let headers = header_union(records);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for record in records {
        writer.write_record(
            headers
                .iter()
                .map(|header| record.get(header).map(value_text).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| crate::error::SheetError::Io(e.into_error()))
}

/// Export JSON objects as a single-sheet workbook or a CSV file
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn export_records(records: &[Value], format: ExportFormat) -> SheetResult<Vec<u8>> {
    debug!(rows = records.len(), %format, "Exporting records");
    match format {
        ExportFormat::Csv => export_csv(records),
        ExportFormat::Xlsx => {
            let mut workbook = Workbook::new();
            let sheet = workbook.add_worksheet();
            sheet.set_name("Data")?;
            write_sheet(sheet, records)?;
            Ok(workbook.save_to_buffer()?)
        }
    }
}

/// Export several tables into one workbook, one sheet per table
///
/// # Errors
///
/// Returns an error if the workbook cannot be written.
pub fn export_dashboard(sections: &[(&str, Vec<Value>)]) -> SheetResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    for (name, records) in sections {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(name))?;
        write_sheet(sheet, records)?;
    }
    if sections.is_empty() {
        workbook.add_worksheet();
    }
    debug!(sheets = sections.len(), "Exporting dashboard workbook");
    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_header_union_keeps_first_seen_order() {
        let records = vec![
            json!({"id": 1, "name": "Blue Door"}),
            json!({"id": 2, "city": "Pune", "name": "Bay"}),
        ];
        assert_eq!(header_union(&records), vec!["id", "name", "city"]);
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!("x")), "x");
        assert_eq!(value_text(&json!(3)), "3");
        assert_eq!(value_text(&json!(["wifi", "parking"])), r#"["wifi","parking"]"#);
        assert_eq!(value_text(&json!({"monday": "09:00 - 22:00"})), r#"{"monday":"09:00 - 22:00"}"#);
    }

    #[test]
    fn test_xlsx_cell_text_is_capped() {
        let employees: Vec<Value> = (0..600)
            .map(|i| json!({"user_id": format!("user-{i:04}"), "name": "Employee Name", "email": format!("employee{i}@acme.test")}))
            .collect();
        let value = Value::Array(employees);
        assert!(value.to_string().len() > MAX_CELL_CHARS);

        let text = xlsx_cell_text(&value);

        assert_eq!(text.chars().count(), MAX_CELL_CHARS);
        assert!(text.ends_with(TRUNCATION_MARKER));
        assert_eq!(xlsx_cell_text(&json!("short")), "short");
    }

    #[test]
    fn test_csv_export() {
        let records = vec![
            json!({"id": 1, "name": "Blue Door", "facilities": ["wifi"]}),
            json!({"id": 2, "name": "Bay, The", "is_active": false}),
        ];
        let bytes = export_records(&records, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "id,name,facilities,is_active\n1,Blue Door,\"[\"\"wifi\"\"]\",\n2,\"Bay, The\",,false\n"
        );
    }

    #[test]
    fn test_sheet_name_is_cleaned() {
        assert_eq!(sheet_name("promo/codes"), "promo_codes");
        assert_eq!(sheet_name(""), "Sheet");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }

    proptest::proptest! {
        #[test]
        fn test_sheet_name_always_acceptable(name in ".{0,64}") {
            let cleaned = sheet_name(&name);
            proptest::prop_assert!(!cleaned.is_empty());
            proptest::prop_assert!(cleaned.chars().count() <= MAX_SHEET_NAME);
            proptest::prop_assert!(!cleaned.contains(['[', ']', ':', '*', '?', '/', '\\']));
        }
    }

    #[test]
    fn test_xlsx_export_is_a_zip() {
        let bytes = export_records(&[json!({"id": 1})], ExportFormat::Xlsx).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
