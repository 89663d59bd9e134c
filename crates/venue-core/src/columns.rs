//! Spreadsheet header mapping for employee imports

use serde::{Deserialize, Serialize};

/// Employee attribute a spreadsheet column can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeField {
    /// Full name
    Name,
    /// Login email
    Email,
    /// Phone number
    Phone,
    /// Initial password
    Password,
    /// Job title
    Designation,
    /// Department
    Department,
    /// Company-internal code
    EmployeeCode,
    /// Subscription plan id
    Plan,
}

impl EmployeeField {
    /// Every field in template column order
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Password,
        Self::Designation,
        Self::Department,
        Self::EmployeeCode,
        Self::Plan,
    ];

    /// Header written in the downloadable import template
    #[must_use]
    pub const fn template_header(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::Designation => "designation",
            Self::Department => "department",
            Self::EmployeeCode => "employee_code",
            Self::Plan => "plan",
        }
    }

    /// Normalized header spellings accepted for this field
    #[must_use]
    pub const fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["name", "fullname", "employeename", "staffname"],
            Self::Email => &["email", "emailaddress", "mail", "emailid", "workemail"],
            Self::Phone => &[
                "phone",
                "mobile",
                "phonenumber",
                "contactnumber",
                "mobilenumber",
                "contact",
            ],
            Self::Password => &["password", "pass", "initialpassword"],
            Self::Designation => &["designation", "title", "jobtitle", "role", "position"],
            Self::Department => &["department", "dept", "team"],
            Self::EmployeeCode => &["employeecode", "empcode", "employeeid", "empid", "staffid"],
            Self::Plan => &["plan", "subscription", "subscriptionplan", "planid"],
        }
    }
}

/// Lowercase and remove whitespace, `_`, `-` and `.`
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Field a header maps to, if any
#[must_use]
pub fn map_header(header: &str) -> Option<EmployeeField> {
    let key = normalize_header(header);
    if key.is_empty() {
        return None;
    }
    EmployeeField::ALL
        .into_iter()
        .find(|field| field.synonyms().contains(&key.as_str()))
}

/// Column index for each field found in a header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<(EmployeeField, usize)>,
    unmapped: Vec<String>,
}

impl HeaderMap {
    /// Map a header row; the first column wins when two map to the same field
    #[must_use]
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = Self::default();
        for (index, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            match map_header(header) {
                Some(field) if map.column(field).is_none() => map.columns.push((field, index)),
                Some(_) => {}
                None if !header.trim().is_empty() => map.unmapped.push(header.trim().to_string()),
                None => {}
            }
        }
        map
    }

    /// Column index holding `field`
    #[must_use]
    pub fn column(&self, field: EmployeeField) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, index)| *index)
    }

    /// Trimmed, non-empty cell for `field` in `row`
    #[must_use]
    pub fn cell<'a, S: AsRef<str>>(&self, row: &'a [S], field: EmployeeField) -> Option<&'a str> {
        self.column(field)
            .and_then(|index| row.get(index))
            .map(|cell| cell.as_ref().trim())
            .filter(|cell| !cell.is_empty())
    }

    /// Required fields with no column
    #[must_use]
    pub fn missing_required(&self) -> Vec<EmployeeField> {
        [EmployeeField::Name, EmployeeField::Email, EmployeeField::Phone]
            .into_iter()
            .filter(|field| self.column(*field).is_none())
            .collect()
    }

    /// Headers that matched no field
    #[must_use]
    pub fn unmapped(&self) -> &[String] {
        &self.unmapped
    }
}
