// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::ids::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Clients,
    Facilities,
    Appointments,
    Favorites,
    Referrals,
    Invoices,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Clients,
        Self::Facilities,
        Self::Appointments,
        Self::Favorites,
        Self::Referrals,
        Self::Invoices,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Facilities => "facilities",
            Self::Appointments => "appointments",
            Self::Favorites => "favorites",
            Self::Referrals => "referrals",
            Self::Invoices => "invoices",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "clients" => Some(Self::Clients),
            "facilities" => Some(Self::Facilities),
            "appointments" => Some(Self::Appointments),
            "favorites" => Some(Self::Favorites),
            "referrals" => Some(Self::Referrals),
            "invoices" => Some(Self::Invoices),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Facilities => "facilities",
            Self::Appointments => "appts",
            Self::Favorites => "favorites",
            Self::Referrals => "referrals",
            Self::Invoices => "invoices",
        }
    }

    /// Curated column set behind the `standard` preset.
    pub const fn standard_columns(self) -> &'static [&'static str] {
        match self {
            Self::Clients => &["id", "name", "phone", "city", "status"],
            Self::Facilities => &["id", "name", "kind", "city", "available_beds"],
            Self::Appointments => &["id", "title", "kind", "status", "start_time"],
            Self::Favorites => &["id", "facility_name", "notes", "created_at"],
            Self::Referrals => &["id", "client_id", "facility_id", "status"],
            Self::Invoices => &["id", "invoice_number", "amount_cents", "status", "due_date"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientStatus {
    Assessment,
    Search,
    Tour,
    Paperwork,
    MoveIn,
    Invoice,
    FollowUp1w,
    FollowUp1m,
    FollowUp6m,
    Closed,
}

impl ClientStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assessment => "assessment",
            Self::Search => "search",
            Self::Tour => "tour",
            Self::Paperwork => "paperwork",
            Self::MoveIn => "move-in",
            Self::Invoice => "invoice",
            Self::FollowUp1w => "follow-up-1w",
            Self::FollowUp1m => "follow-up-1m",
            Self::FollowUp6m => "follow-up-6m",
            Self::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "assessment" => Some(Self::Assessment),
            "search" => Some(Self::Search),
            "tour" => Some(Self::Tour),
            "paperwork" => Some(Self::Paperwork),
            "move-in" => Some(Self::MoveIn),
            "invoice" => Some(Self::Invoice),
            "follow-up-1w" => Some(Self::FollowUp1w),
            "follow-up-1m" => Some(Self::FollowUp1m),
            "follow-up-6m" => Some(Self::FollowUp6m),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacilityKind {
    AssistedLiving,
    MemoryCare,
    IndependentLiving,
    NursingHome,
    ContinuingCare,
}

impl FacilityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssistedLiving => "assisted-living",
            Self::MemoryCare => "memory-care",
            Self::IndependentLiving => "independent-living",
            Self::NursingHome => "nursing-home",
            Self::ContinuingCare => "continuing-care",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "assisted-living" => Some(Self::AssistedLiving),
            "memory-care" => Some(Self::MemoryCare),
            "independent-living" => Some(Self::IndependentLiving),
            "nursing-home" => Some(Self::NursingHome),
            "continuing-care" => Some(Self::ContinuingCare),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentKind {
    Assessment,
    Tour,
    FollowUp,
    Paperwork,
    Other,
}

impl AppointmentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assessment => "assessment",
            Self::Tour => "tour",
            Self::FollowUp => "follow-up",
            Self::Paperwork => "paperwork",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "assessment" => Some(Self::Assessment),
            "tour" => Some(Self::Tour),
            "follow-up" => Some(Self::FollowUp),
            "paperwork" => Some(Self::Paperwork),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl AppointmentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rescheduled => "rescheduled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "rescheduled" => Some(Self::Rescheduled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    Pending,
    Accepted,
    Declined,
    TourScheduled,
    TourCompleted,
    ApplicationSubmitted,
    Approved,
    MovedIn,
    Cancelled,
}

impl ReferralStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::TourScheduled => "tour_scheduled",
            Self::TourCompleted => "tour_completed",
            Self::ApplicationSubmitted => "application_submitted",
            Self::Approved => "approved",
            Self::MovedIn => "moved_in",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "tour_scheduled" => Some(Self::TourScheduled),
            "tour_completed" => Some(Self::TourCompleted),
            "application_submitted" => Some(Self::ApplicationSubmitted),
            "approved" => Some(Self::Approved),
            "moved_in" => Some(Self::MovedIn),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Pending,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "paid" => Some(Self::Paid),
            "pending" => Some(Self::Pending),
            "overdue" => Some(Self::Overdue),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyRange {
    pub min_cents: i64,
    pub max_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub status: ClientStatus,
    pub budget: Option<MoneyRange>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: RecordId,
    pub name: String,
    pub kind: FacilityKind,
    pub address: String,
    pub city: String,
    pub capacity: i64,
    pub available_beds: i64,
    pub medicare_approved: bool,
    pub price_range: Option<MoneyRange>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub client_id: RecordId,
    pub facility_id: RecordId,
    pub title: String,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    pub is_virtual: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: RecordId,
    pub facility_id: RecordId,
    pub facility_name: String,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    pub id: RecordId,
    pub client_id: RecordId,
    pub facility_id: RecordId,
    pub status: ReferralStatus,
    pub referral_fee_cents: Option<i64>,
    pub hipaa_consent: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: RecordId,
    pub invoice_number: String,
    pub client_id: RecordId,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub items: Vec<InvoiceItem>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Value of one reflected field. Object-typed fields surface as `Complex`
/// placeholders and reject writes; everything else round-trips through the
/// edit buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    OptionalNumber(Option<i64>),
    Bool(bool),
    Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
    OptionalTimestamp(#[serde(with = "time::serde::rfc3339::option")] Option<OffsetDateTime>),
    Complex,
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => value.to_string(),
            Self::OptionalNumber(Some(value)) => value.to_string(),
            Self::OptionalNumber(None) => String::new(),
            Self::Bool(true) => "true".to_owned(),
            Self::Bool(false) => "false".to_owned(),
            Self::Timestamp(value) => value
                .format(&Rfc3339)
                .unwrap_or_else(|_| value.to_string()),
            Self::OptionalTimestamp(Some(value)) => value
                .format(&Rfc3339)
                .unwrap_or_else(|_| value.to_string()),
            Self::OptionalTimestamp(None) => String::new(),
            Self::Complex => "complex object".to_owned(),
        }
    }

    pub const fn is_complex(&self) -> bool {
        matches!(self, Self::Complex)
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    fn coerce_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) | Self::OptionalNumber(Some(value)) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    fn coerce_optional_number(&self) -> Option<Option<i64>> {
        match self {
            Self::Number(value) | Self::OptionalNumber(Some(value)) => Some(Some(*value)),
            Self::OptionalNumber(None) => Some(None),
            Self::Text(value) if value.trim().is_empty() => Some(None),
            Self::Text(value) => value.trim().parse().ok().map(Some),
            _ => None,
        }
    }

    fn coerce_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Text(value) => match value.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn coerce_timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Timestamp(value) | Self::OptionalTimestamp(Some(value)) => Some(*value),
            Self::Text(value) => OffsetDateTime::parse(value.trim(), &Rfc3339).ok(),
            _ => None,
        }
    }

    fn coerce_optional_timestamp(&self) -> Option<Option<OffsetDateTime>> {
        match self {
            Self::OptionalTimestamp(value) => Some(*value),
            Self::Timestamp(value) => Some(Some(*value)),
            Self::Text(value) if value.trim().is_empty() => Some(None),
            Self::Text(value) => OffsetDateTime::parse(value.trim(), &Rfc3339).ok().map(Some),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

impl Field {
    fn new(name: &'static str, value: FieldValue) -> Self {
        Self { name, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum Record {
    #[serde(rename = "clients")]
    Client(Client),
    #[serde(rename = "facilities")]
    Facility(Facility),
    #[serde(rename = "appointments")]
    Appointment(Appointment),
    #[serde(rename = "favorites")]
    Favorite(Favorite),
    #[serde(rename = "referrals")]
    Referral(Referral),
    #[serde(rename = "invoices")]
    Invoice(Invoice),
}

impl Record {
    pub const fn category(&self) -> Category {
        match self {
            Self::Client(_) => Category::Clients,
            Self::Facility(_) => Category::Facilities,
            Self::Appointment(_) => Category::Appointments,
            Self::Favorite(_) => Category::Favorites,
            Self::Referral(_) => Category::Referrals,
            Self::Invoice(_) => Category::Invoices,
        }
    }

    pub const fn id(&self) -> &RecordId {
        match self {
            Self::Client(record) => &record.id,
            Self::Facility(record) => &record.id,
            Self::Appointment(record) => &record.id,
            Self::Favorite(record) => &record.id,
            Self::Referral(record) => &record.id,
            Self::Invoice(record) => &record.id,
        }
    }

    /// Reflected field list in declaration order. Rendering, column
    /// introspection, and the edit buffer all operate over this projection
    /// instead of the concrete structs.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            Self::Client(record) => vec![
                Field::new("id", FieldValue::Text(record.id.as_str().to_owned())),
                Field::new("name", FieldValue::Text(record.name.clone())),
                Field::new("email", FieldValue::Text(record.email.clone())),
                Field::new("phone", FieldValue::Text(record.phone.clone())),
                Field::new("city", FieldValue::Text(record.city.clone())),
                Field::new("status", FieldValue::Text(record.status.as_str().to_owned())),
                Field::new("budget", FieldValue::Complex),
                Field::new("created_at", FieldValue::Timestamp(record.created_at)),
            ],
            Self::Facility(record) => vec![
                Field::new("id", FieldValue::Text(record.id.as_str().to_owned())),
                Field::new("name", FieldValue::Text(record.name.clone())),
                Field::new("kind", FieldValue::Text(record.kind.as_str().to_owned())),
                Field::new("address", FieldValue::Text(record.address.clone())),
                Field::new("city", FieldValue::Text(record.city.clone())),
                Field::new("capacity", FieldValue::Number(record.capacity)),
                Field::new("available_beds", FieldValue::Number(record.available_beds)),
                Field::new("medicare_approved", FieldValue::Bool(record.medicare_approved)),
                Field::new("price_range", FieldValue::Complex),
                Field::new("created_at", FieldValue::Timestamp(record.created_at)),
            ],
            Self::Appointment(record) => vec![
                Field::new("id", FieldValue::Text(record.id.as_str().to_owned())),
                Field::new(
                    "client_id",
                    FieldValue::Text(record.client_id.as_str().to_owned()),
                ),
                Field::new(
                    "facility_id",
                    FieldValue::Text(record.facility_id.as_str().to_owned()),
                ),
                Field::new("title", FieldValue::Text(record.title.clone())),
                Field::new("kind", FieldValue::Text(record.kind.as_str().to_owned())),
                Field::new("status", FieldValue::Text(record.status.as_str().to_owned())),
                Field::new("is_virtual", FieldValue::Bool(record.is_virtual)),
                Field::new("start_time", FieldValue::Timestamp(record.start_time)),
                Field::new("created_at", FieldValue::Timestamp(record.created_at)),
            ],
            Self::Favorite(record) => vec![
                Field::new("id", FieldValue::Text(record.id.as_str().to_owned())),
                Field::new(
                    "facility_id",
                    FieldValue::Text(record.facility_id.as_str().to_owned()),
                ),
                Field::new("facility_name", FieldValue::Text(record.facility_name.clone())),
                Field::new("notes", FieldValue::Text(record.notes.clone())),
                Field::new("created_at", FieldValue::Timestamp(record.created_at)),
            ],
            Self::Referral(record) => vec![
                Field::new("id", FieldValue::Text(record.id.as_str().to_owned())),
                Field::new(
                    "client_id",
                    FieldValue::Text(record.client_id.as_str().to_owned()),
                ),
                Field::new(
                    "facility_id",
                    FieldValue::Text(record.facility_id.as_str().to_owned()),
                ),
                Field::new("status", FieldValue::Text(record.status.as_str().to_owned())),
                Field::new(
                    "referral_fee_cents",
                    FieldValue::OptionalNumber(record.referral_fee_cents),
                ),
                Field::new("hipaa_consent", FieldValue::Bool(record.hipaa_consent)),
                Field::new("created_at", FieldValue::Timestamp(record.created_at)),
            ],
            Self::Invoice(record) => vec![
                Field::new("id", FieldValue::Text(record.id.as_str().to_owned())),
                Field::new("invoice_number", FieldValue::Text(record.invoice_number.clone())),
                Field::new(
                    "client_id",
                    FieldValue::Text(record.client_id.as_str().to_owned()),
                ),
                Field::new("amount_cents", FieldValue::Number(record.amount_cents)),
                Field::new("status", FieldValue::Text(record.status.as_str().to_owned())),
                Field::new("due_date", FieldValue::OptionalTimestamp(record.due_date)),
                Field::new("items", FieldValue::Complex),
                Field::new("created_at", FieldValue::Timestamp(record.created_at)),
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields()
            .into_iter()
            .find(|field| field.name == name)
            .map(|field| field.value)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().into_iter().map(|field| field.name).collect()
    }

    /// Writes one field by name, coercing text input into the field's type.
    /// Returns false without mutating for unknown fields, the immutable `id`,
    /// complex placeholders, and text that does not parse into a typed field.
    pub fn apply_field(&mut self, name: &str, value: &FieldValue) -> bool {
        match self {
            Self::Client(record) => match name {
                "name" => write_text(&mut record.name, value),
                "email" => write_text(&mut record.email, value),
                "phone" => write_text(&mut record.phone, value),
                "city" => write_text(&mut record.city, value),
                "status" => write_parsed(&mut record.status, value, ClientStatus::parse),
                "created_at" => write_timestamp(&mut record.created_at, value),
                _ => false,
            },
            Self::Facility(record) => match name {
                "name" => write_text(&mut record.name, value),
                "kind" => write_parsed(&mut record.kind, value, FacilityKind::parse),
                "address" => write_text(&mut record.address, value),
                "city" => write_text(&mut record.city, value),
                "capacity" => write_number(&mut record.capacity, value),
                "available_beds" => write_number(&mut record.available_beds, value),
                "medicare_approved" => write_bool(&mut record.medicare_approved, value),
                "created_at" => write_timestamp(&mut record.created_at, value),
                _ => false,
            },
            Self::Appointment(record) => match name {
                "client_id" => write_record_id(&mut record.client_id, value),
                "facility_id" => write_record_id(&mut record.facility_id, value),
                "title" => write_text(&mut record.title, value),
                "kind" => write_parsed(&mut record.kind, value, AppointmentKind::parse),
                "status" => write_parsed(&mut record.status, value, AppointmentStatus::parse),
                "is_virtual" => write_bool(&mut record.is_virtual, value),
                "start_time" => write_timestamp(&mut record.start_time, value),
                "created_at" => write_timestamp(&mut record.created_at, value),
                _ => false,
            },
            Self::Favorite(record) => match name {
                "facility_id" => write_record_id(&mut record.facility_id, value),
                "facility_name" => write_text(&mut record.facility_name, value),
                "notes" => write_text(&mut record.notes, value),
                "created_at" => write_timestamp(&mut record.created_at, value),
                _ => false,
            },
            Self::Referral(record) => match name {
                "client_id" => write_record_id(&mut record.client_id, value),
                "facility_id" => write_record_id(&mut record.facility_id, value),
                "status" => write_parsed(&mut record.status, value, ReferralStatus::parse),
                "referral_fee_cents" => {
                    write_optional_number(&mut record.referral_fee_cents, value)
                }
                "hipaa_consent" => write_bool(&mut record.hipaa_consent, value),
                "created_at" => write_timestamp(&mut record.created_at, value),
                _ => false,
            },
            Self::Invoice(record) => match name {
                "invoice_number" => write_text(&mut record.invoice_number, value),
                "client_id" => write_record_id(&mut record.client_id, value),
                "amount_cents" => write_number(&mut record.amount_cents, value),
                "status" => write_parsed(&mut record.status, value, InvoiceStatus::parse),
                "due_date" => write_optional_timestamp(&mut record.due_date, value),
                "created_at" => write_timestamp(&mut record.created_at, value),
                _ => false,
            },
        }
    }

    /// A blank record with category-specific defaults, used by the grid's
    /// add action before the row is opened for editing.
    pub fn draft(category: Category, id: RecordId, now: OffsetDateTime) -> Self {
        match category {
            Category::Clients => Self::Client(Client {
                id,
                name: String::new(),
                email: String::new(),
                phone: String::new(),
                city: String::new(),
                status: ClientStatus::Assessment,
                budget: None,
                created_at: now,
            }),
            Category::Facilities => Self::Facility(Facility {
                id,
                name: String::new(),
                kind: FacilityKind::AssistedLiving,
                address: String::new(),
                city: String::new(),
                capacity: 0,
                available_beds: 0,
                medicare_approved: false,
                price_range: None,
                created_at: now,
            }),
            Category::Appointments => Self::Appointment(Appointment {
                id,
                client_id: RecordId::new(""),
                facility_id: RecordId::new(""),
                title: String::new(),
                kind: AppointmentKind::Tour,
                status: AppointmentStatus::Scheduled,
                is_virtual: false,
                start_time: now,
                created_at: now,
            }),
            Category::Favorites => Self::Favorite(Favorite {
                id,
                facility_id: RecordId::new(""),
                facility_name: String::new(),
                notes: String::new(),
                created_at: now,
            }),
            Category::Referrals => Self::Referral(Referral {
                id,
                client_id: RecordId::new(""),
                facility_id: RecordId::new(""),
                status: ReferralStatus::Pending,
                referral_fee_cents: None,
                hipaa_consent: false,
                created_at: now,
            }),
            Category::Invoices => Self::Invoice(Invoice {
                id,
                invoice_number: String::new(),
                client_id: RecordId::new(""),
                amount_cents: 0,
                status: InvoiceStatus::Draft,
                due_date: None,
                items: Vec::new(),
                created_at: now,
            }),
        }
    }
}

fn write_text(target: &mut String, value: &FieldValue) -> bool {
    match value.as_text() {
        Some(text) => {
            *target = text.to_owned();
            true
        }
        None => false,
    }
}

fn write_parsed<T>(target: &mut T, value: &FieldValue, parse: fn(&str) -> Option<T>) -> bool {
    match value.as_text().and_then(parse) {
        Some(parsed) => {
            *target = parsed;
            true
        }
        None => false,
    }
}

fn write_record_id(target: &mut RecordId, value: &FieldValue) -> bool {
    match value.as_text() {
        Some(text) => {
            *target = RecordId::new(text);
            true
        }
        None => false,
    }
}

fn write_number(target: &mut i64, value: &FieldValue) -> bool {
    match value.coerce_number() {
        Some(number) => {
            *target = number;
            true
        }
        None => false,
    }
}

fn write_optional_number(target: &mut Option<i64>, value: &FieldValue) -> bool {
    match value.coerce_optional_number() {
        Some(number) => {
            *target = number;
            true
        }
        None => false,
    }
}

fn write_bool(target: &mut bool, value: &FieldValue) -> bool {
    match value.coerce_bool() {
        Some(flag) => {
            *target = flag;
            true
        }
        None => false,
    }
}

fn write_timestamp(target: &mut OffsetDateTime, value: &FieldValue) -> bool {
    match value.coerce_timestamp() {
        Some(timestamp) => {
            *target = timestamp;
            true
        }
        None => false,
    }
}

fn write_optional_timestamp(target: &mut Option<OffsetDateTime>, value: &FieldValue) -> bool {
    match value.coerce_optional_timestamp() {
        Some(timestamp) => {
            *target = timestamp;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Category, ClientStatus, FacilityKind, FieldValue, Record, ReferralStatus,
    };
    use crate::ids::RecordId;
    use time::OffsetDateTime;

    fn fixture_now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("valid timestamp")
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("webinars"), None);
    }

    #[test]
    fn client_status_parses_all_pipeline_stages() {
        for status in [
            ClientStatus::Assessment,
            ClientStatus::Search,
            ClientStatus::Tour,
            ClientStatus::Paperwork,
            ClientStatus::MoveIn,
            ClientStatus::Invoice,
            ClientStatus::FollowUp1w,
            ClientStatus::FollowUp1m,
            ClientStatus::FollowUp6m,
            ClientStatus::Closed,
        ] {
            assert_eq!(ClientStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ClientStatus::parse("waitlist"), None);
    }

    #[test]
    fn draft_client_has_category_defaults() {
        let record = Record::draft(Category::Clients, RecordId::from("new-1"), fixture_now());
        assert_eq!(record.category(), Category::Clients);
        assert_eq!(record.id().as_str(), "new-1");
        assert_eq!(
            record.field("status"),
            Some(FieldValue::Text("assessment".to_owned()))
        );
    }

    #[test]
    fn apply_field_coerces_text_into_typed_fields() {
        let mut record = Record::draft(Category::Facilities, RecordId::from("f9"), fixture_now());

        assert!(record.apply_field("capacity", &FieldValue::Text("120".to_owned())));
        assert_eq!(record.field("capacity"), Some(FieldValue::Number(120)));

        assert!(record.apply_field("medicare_approved", &FieldValue::Text("true".to_owned())));
        assert_eq!(record.field("medicare_approved"), Some(FieldValue::Bool(true)));

        assert!(record.apply_field("kind", &FieldValue::Text("memory-care".to_owned())));
        let Record::Facility(facility) = &record else {
            panic!("expected facility record");
        };
        assert_eq!(facility.kind, FacilityKind::MemoryCare);
    }

    #[test]
    fn apply_field_moves_client_through_pipeline_stages() {
        let mut record = Record::draft(Category::Clients, RecordId::from("c1"), fixture_now());

        assert!(record.apply_field("status", &FieldValue::Text("tour".to_owned())));
        assert_eq!(record.field("status"), Some(FieldValue::Text("tour".to_owned())));

        assert!(!record.apply_field("status", &FieldValue::Text("waitlist".to_owned())));
        assert_eq!(record.field("status"), Some(FieldValue::Text("tour".to_owned())));
    }

    #[test]
    fn apply_field_keeps_previous_value_on_parse_failure() {
        let mut record = Record::draft(Category::Facilities, RecordId::from("f9"), fixture_now());
        record.apply_field("capacity", &FieldValue::Number(80));

        assert!(!record.apply_field("capacity", &FieldValue::Text("eighty".to_owned())));
        assert_eq!(record.field("capacity"), Some(FieldValue::Number(80)));
    }

    #[test]
    fn id_and_complex_fields_are_read_only() {
        let mut record = Record::draft(Category::Invoices, RecordId::from("i1"), fixture_now());
        assert!(!record.apply_field("id", &FieldValue::Text("i2".to_owned())));
        assert!(!record.apply_field("items", &FieldValue::Text("oops".to_owned())));
        assert_eq!(record.id().as_str(), "i1");
        assert_eq!(record.field("items"), Some(FieldValue::Complex));
    }

    #[test]
    fn unknown_field_write_is_a_no_op() {
        let mut record = Record::draft(Category::Clients, RecordId::from("c1"), fixture_now());
        assert!(!record.apply_field("nickname", &FieldValue::Text("JD".to_owned())));
    }

    #[test]
    fn optional_number_clears_on_empty_text() {
        let mut record = Record::draft(Category::Referrals, RecordId::from("r1"), fixture_now());
        assert!(record.apply_field("referral_fee_cents", &FieldValue::Text("2500".to_owned())));
        assert_eq!(
            record.field("referral_fee_cents"),
            Some(FieldValue::OptionalNumber(Some(2500)))
        );

        assert!(record.apply_field("referral_fee_cents", &FieldValue::Text(String::new())));
        assert_eq!(
            record.field("referral_fee_cents"),
            Some(FieldValue::OptionalNumber(None))
        );

        let Record::Referral(referral) = &record else {
            panic!("expected referral record");
        };
        assert_eq!(referral.status, ReferralStatus::Pending);
    }

    #[test]
    fn complex_field_displays_placeholder() {
        assert_eq!(FieldValue::Complex.display(), "complex object");
    }

    #[test]
    fn field_names_follow_declaration_order() {
        let record = Record::draft(Category::Favorites, RecordId::from("v1"), fixture_now());
        assert_eq!(
            record.field_names(),
            vec!["id", "facility_id", "facility_name", "notes", "created_at"]
        );
    }
}
