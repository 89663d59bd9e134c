//! Records mirrored from backend tables

use crate::serde_helpers::{null_as_default, option_id, string_list};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use validator::{Validate, ValidationError};

/// Record identifier; numeric ids are carried as their decimal text
pub type RecordId = String;

/// Backend tables the admin console reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Application users
    Users,
    /// Restaurants
    Restaurants,
    /// Retail stores
    Stores,
    /// Corporate accounts
    Corporate,
    /// Promo codes
    Promos,
    /// Subscription plans
    Subscription,
    /// Offers shown in the apps
    Offers,
    /// Invoices
    Invoice,
    /// Sales leads
    Leads,
    /// Audit copies of deleted rows
    RecycleBin,
    /// Scheduled job reports
    CronReports,
}

impl Table {
    /// Every table, in dashboard order
    pub const ALL: [Self; 11] = [
        Self::Users,
        Self::Restaurants,
        Self::Stores,
        Self::Corporate,
        Self::Promos,
        Self::Subscription,
        Self::Offers,
        Self::Invoice,
        Self::Leads,
        Self::RecycleBin,
        Self::CronReports,
    ];

    /// Table name as exposed by the REST layer
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Restaurants => "restaurants",
            Self::Stores => "stores",
            Self::Corporate => "corporate",
            Self::Promos => "promos",
            Self::Subscription => "subscription",
            Self::Offers => "offers",
            Self::Invoice => "invoice",
            Self::Leads => "leads",
            Self::RecycleBin => "recycle_bin",
            Self::CronReports => "cron_reports",
        }
    }

    /// Look a table up by its REST name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A row type stored in one backend table
pub trait Record: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {
    /// Table the record lives in
    const TABLE: Table;

    /// Columns matched by free-text search
    const SEARCH_COLUMNS: &'static [&'static str];

    /// Column ordering used for listings
    const ORDER_BY: &'static str = "created_at.desc";

    /// Primary key, absent before insert
    fn id(&self) -> Option<&str>;
}

/// Listing with a free-text `facilities` column
pub trait HasFacilities: Record {
    /// Stored facility labels as written
    fn facilities(&self) -> &[String];
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Application user (`users`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct User {
    /// User id (auth uid)
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Display name
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Login email
    #[validate(email)]
    pub email: String,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Role (`user`, `admin`, `corporate_employee`, ...)
    #[serde(default)]
    pub role: Option<String>,
    /// Active subscription plan id
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub subscription_plan: Option<RecordId>,
    /// Owning corporate, for employee accounts
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub corporate_id: Option<RecordId>,
    /// Whether the account is enabled
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Restaurant listing (`restaurants`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Restaurant {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Restaurant name
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact email
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    /// Cuisines served
    #[serde(default, deserialize_with = "string_list")]
    pub cuisine: Vec<String>,
    /// Facility labels; historical rows hold arbitrary spellings
    #[serde(default, deserialize_with = "string_list")]
    pub facilities: Vec<String>,
    /// Day-keyed `"HH:MM - HH:MM"` map, kept raw so malformed rows still load
    #[serde(default)]
    pub opening_hours: Option<serde_json::Value>,
    /// Image URLs in storage
    #[serde(default, deserialize_with = "string_list")]
    pub images: Vec<String>,
    /// Average rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Whether the listing is visible
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Retail store (`stores`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Store {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Store name
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Store category
    #[serde(default)]
    pub category: Option<String>,
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Facility labels
    #[serde(default, deserialize_with = "string_list")]
    pub facilities: Vec<String>,
    /// Array of `{day, closed, slots}` entries, kept raw
    #[serde(default)]
    pub opening_hours: Option<serde_json::Value>,
    /// Image URLs in storage
    #[serde(default, deserialize_with = "string_list")]
    pub images: Vec<String>,
    /// Whether the listing is visible
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Employee entry held in `corporate.employees`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Auth user id created for the employee
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub user_id: Option<RecordId>,
    /// Employee name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Employee email
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Employee phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Job title
    #[serde(default)]
    pub designation: Option<String>,
    /// Department
    #[serde(default)]
    pub department: Option<String>,
    /// Company-internal employee code
    #[serde(default)]
    pub employee_code: Option<String>,
    /// Subscription plan assigned to the employee
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub plan: Option<RecordId>,
    /// When the employee was added
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Business account (`corporate`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Corporate {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Company name
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Login email of the corporate admin
    #[validate(email)]
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Contact person
    #[serde(default)]
    pub contact_person: Option<String>,
    /// Billing address
    #[serde(default)]
    pub address: Option<String>,
    /// Seats purchased; `None` means unlimited
    #[serde(default)]
    pub seats: Option<u32>,
    /// Default plan for employees
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub subscription_plan: Option<RecordId>,
    /// Employees provisioned so far
    #[serde(default, deserialize_with = "null_as_default")]
    pub employees: Vec<Employee>,
    /// Auth user backing the corporate admin login
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub auth_user_id: Option<RecordId>,
    /// Whether the account is enabled
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Corporate {
    /// Seats still free, `None` when the allocation is unlimited
    #[must_use]
    pub fn remaining_seats(&self) -> Option<usize> {
        self.seats
            .map(|seats| (seats as usize).saturating_sub(self.employees.len()))
    }

    /// Whether an employee with this email is already on the account
    #[must_use]
    pub fn has_employee_email(&self, email: &str) -> bool {
        self.employees
            .iter()
            .any(|e| e.email.trim().eq_ignore_ascii_case(email.trim()))
    }
}

/// How a promo code discounts an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage of the order value
    #[default]
    Percentage,
    /// Fixed amount
    Flat,
}

/// Promo code (`promos`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_promo"))]
pub struct PromoCode {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Code customers type in
    #[validate(length(min = 3, max = 32))]
    pub code: String,
    /// Description shown to admins
    #[serde(default)]
    pub description: Option<String>,
    /// Discount kind
    #[serde(default)]
    pub discount_type: DiscountType,
    /// Percentage or flat amount
    #[validate(range(exclusive_min = 0.0))]
    pub discount_value: f64,
    /// Minimum order value
    #[serde(default)]
    pub min_order: Option<f64>,
    /// Cap on the discount for percentage codes
    #[serde(default)]
    pub max_discount: Option<f64>,
    /// Start of validity
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    /// End of validity
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    /// Total redemptions allowed
    #[serde(default)]
    pub usage_limit: Option<u32>,
    /// Redemptions so far
    #[serde(default)]
    pub used_count: u32,
    /// Whether the code can be redeemed
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_promo(promo: &PromoCode) -> Result<(), ValidationError> {
    if promo.discount_type == DiscountType::Percentage && promo.discount_value > 100.0 {
        return Err(ValidationError::new("percentage_over_100"));
    }
    if let (Some(from), Some(until)) = (promo.valid_from, promo.valid_until)
        && until < from
    {
        return Err(ValidationError::new("validity_window_inverted"));
    }
    Ok(())
}

/// Subscription plan (`subscription`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SubscriptionPlan {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Plan name
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Price per period
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Period length in days
    #[validate(range(min = 1))]
    pub duration_days: u32,
    /// Marketing bullet points
    #[serde(default, deserialize_with = "string_list")]
    pub features: Vec<String>,
    /// Whether the plan can be sold
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Offer (`offers`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Offer {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Headline
    #[validate(custom(function = "non_blank"))]
    pub title: String,
    /// Body text
    #[serde(default)]
    pub description: Option<String>,
    /// Restaurant the offer belongs to
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub restaurant_id: Option<RecordId>,
    /// Banner image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Discount percentage
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percent: Option<f64>,
    /// End of validity
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    /// Whether the offer is shown
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Invoice (`invoice`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Invoice {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Human readable number
    #[validate(custom(function = "non_blank"))]
    pub invoice_number: String,
    /// Billed party
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Corporate billed, if any
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub corporate_id: Option<RecordId>,
    /// Total amount
    #[validate(range(min = 0.0))]
    pub amount: f64,
    /// `paid`, `pending`, ...
    #[serde(default)]
    pub status: Option<String>,
    /// Issue date
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Sales lead (`leads`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Lead {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Contact name
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Contact email
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Company
    #[serde(default)]
    pub company: Option<String>,
    /// Enquiry text
    #[serde(default)]
    pub message: Option<String>,
    /// Pipeline status
    #[serde(default)]
    pub status: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Scheduled job report (`cron_reports`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CronReport {
    /// Row id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Job name
    #[validate(custom(function = "non_blank"))]
    pub job_name: String,
    /// `success` / `failed`
    #[serde(default)]
    pub status: Option<String>,
    /// Job output
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    /// When the job ran
    #[serde(default)]
    pub ran_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Copy of a row taken just before it was deleted (`recycle_bin`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecycleBinEntry {
    /// Table the row came from
    pub table_name: String,
    /// Id of the deleted row
    pub record_id: RecordId,
    /// Full row as it was stored
    pub data: serde_json::Value,
    /// When the delete happened
    pub deleted_at: DateTime<Utc>,
}

impl RecycleBinEntry {
    /// Snapshot `data` from `table` as deleted now
    #[must_use]
    pub fn capture(table: Table, record_id: impl Into<RecordId>, data: serde_json::Value) -> Self {
        Self {
            table_name: table.name().to_string(),
            record_id: record_id.into(),
            data,
            deleted_at: Utc::now(),
        }
    }
}

/// Spotlight card managed through `/api/spotlight`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Spotlight {
    /// Card id
    #[serde(default, deserialize_with = "option_id::deserialize", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Headline
    #[validate(custom(function = "non_blank"))]
    pub title: String,
    /// Secondary line
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Card image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Link target
    #[serde(default)]
    pub link: Option<String>,
    /// Sort position
    #[serde(default)]
    pub position: i32,
    /// Whether the card is shown
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Home-screen hero offer from `/api/homeherooffers`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomeHeroOffer {
    /// Offer id
    #[serde(default, deserialize_with = "option_id::deserialize")]
    pub id: Option<RecordId>,
    /// Headline
    #[serde(default)]
    pub title: String,
    /// Banner image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Link target
    #[serde(default)]
    pub link: Option<String>,
}

/// Headline numbers shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardKpis {
    /// Registered users
    pub users: u64,
    /// Restaurants
    pub restaurants: u64,
    /// Stores
    pub stores: u64,
    /// Corporate accounts
    pub corporates: u64,
    /// Promo codes currently active
    pub active_promo_codes: u64,
    /// Subscription plans
    pub subscriptions: u64,
    /// Open leads
    pub leads: u64,
}

/// Signed-in administrator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    /// Auth user id
    pub id: RecordId,
    /// Display name
    pub name: String,
    /// Email
    pub email: String,
    /// Role, e.g. `super_admin`
    #[serde(default)]
    pub role: Option<String>,
}

const fn default_true() -> bool {
    true
}

macro_rules! impl_record {
    ($ty:ty, $table:expr, [$($col:literal),* $(,)?]) => {
        impl Record for $ty {
            const TABLE: Table = $table;
            const SEARCH_COLUMNS: &'static [&'static str] = &[$($col),*];

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

impl_record!(User, Table::Users, ["name", "email", "phone"]);
impl_record!(Restaurant, Table::Restaurants, ["name", "city", "address"]);
impl_record!(Store, Table::Stores, ["name", "city", "address"]);
impl HasFacilities for Restaurant {
    fn facilities(&self) -> &[String] {
        &self.facilities
    }
}

impl HasFacilities for Store {
    fn facilities(&self) -> &[String] {
        &self.facilities
    }
}

impl_record!(Corporate, Table::Corporate, ["name", "email", "contact_person"]);
impl_record!(PromoCode, Table::Promos, ["code", "description"]);
impl_record!(SubscriptionPlan, Table::Subscription, ["name"]);
impl_record!(Offer, Table::Offers, ["title", "description"]);
impl_record!(Invoice, Table::Invoice, ["invoice_number", "customer_name"]);
impl_record!(Lead, Table::Leads, ["name", "email", "company"]);
impl_record!(CronReport, Table::CronReports, ["job_name", "status"]);

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("nope"), None);
        assert_eq!(Table::RecycleBin.to_string(), "recycle_bin");
    }

    #[test]
    fn test_corporate_from_legacy_row() {
        let fresh = serde_json::json!({
            "id": 3,
            "name": "Acme",
            "email": "hr@acme.test",
            "employees": null
        });
        let partial = serde_json::json!({
            "id": 4,
            "name": "Globex",
            "email": "hr@globex.test",
            "employees": [{"user_id": 9, "name": null}]
        });

        let fresh: Corporate = serde_json::from_value(fresh).unwrap();
        let partial: Corporate = serde_json::from_value(partial).unwrap();

        assert!(fresh.employees.is_empty());
        assert_eq!(partial.employees.len(), 1);
        assert_eq!(partial.employees[0].user_id.as_deref(), Some("9"));
        assert_eq!(partial.employees[0].name, "");
        assert_eq!(partial.employees[0].email, "");
    }

    #[test]
    fn test_restaurant_from_legacy_row() {
        let row = serde_json::json!({
            "id": 17,
            "name": "Blue Door",
            "facilities": "WiFi, parking",
            "opening_hours": {"monday": "09:00 - 22:00"},
            "images": null
        });

        let restaurant: Restaurant = serde_json::from_value(row).unwrap();

        assert_eq!(restaurant.id(), Some("17"));
        assert_eq!(restaurant.facilities, vec!["WiFi", "parking"]);
        assert!(restaurant.images.is_empty());
        assert!(restaurant.is_active);
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let store = Store {
            name: "   ".to_string(),
            ..Store::default()
        };
        assert!(store.validate().is_err());
    }

    #[test]
    fn test_corporate_remaining_seats() {
        let mut corporate = Corporate {
            name: "Acme".to_string(),
            email: "hr@acme.test".to_string(),
            seats: Some(3),
            ..Corporate::default()
        };
        corporate.employees.push(Employee {
            name: "Ana".to_string(),
            email: "Ana@Acme.test".to_string(),
            ..Employee::default()
        });

        assert_eq!(corporate.remaining_seats(), Some(2));
        assert!(corporate.has_employee_email(" ana@acme.test "));

        corporate.seats = None;
        assert_eq!(corporate.remaining_seats(), None);
    }

    #[test]
    fn test_promo_validation() {
        let mut promo = PromoCode {
            code: "SAVE20".to_string(),
            discount_value: 20.0,
            ..PromoCode::default()
        };
        assert!(promo.validate().is_ok());

        promo.discount_value = 120.0;
        assert!(promo.validate().is_err());

        promo.discount_type = DiscountType::Flat;
        assert!(promo.validate().is_ok());

        promo.discount_value = 0.0;
        assert!(promo.validate().is_err());
    }

    #[test]
    fn test_recycle_bin_capture() {
        let entry = RecycleBinEntry::capture(
            Table::Offers,
            "9",
            serde_json::json!({"id": 9, "title": "Half price"}),
        );
        assert_eq!(entry.table_name, "offers");
        assert_eq!(entry.record_id, "9");
        assert_eq!(entry.data["title"], "Half price");
    }
}
