// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use caseload_app::{
    Appointment, AppointmentKind, AppointmentStatus, Category, Client, ClientStatus, Facility,
    FacilityKind, Favorite, Invoice, InvoiceItem, InvoiceStatus, MoneyRange, Record, RecordId,
    Referral, ReferralStatus,
};
use std::path::PathBuf;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const CITIES: [&str; 12] = [
    "Mesa",
    "Scottsdale",
    "Tempe",
    "Chandler",
    "Gilbert",
    "Glendale",
    "Peoria",
    "Surprise",
    "Tucson",
    "Phoenix",
    "Goodyear",
    "Avondale",
];

const FACILITY_ADJECTIVES: [&str; 10] = [
    "Sunrise",
    "Desert Rose",
    "Golden Oaks",
    "Willow Creek",
    "Serenity",
    "Canyon View",
    "Heritage",
    "Palm Grove",
    "Evergreen",
    "Mountain Vista",
];
const FACILITY_SUFFIXES: [&str; 6] = [
    "Senior Living",
    "Care Center",
    "Assisted Living",
    "Manor",
    "Gardens",
    "Village",
];

const STREET_NAMES: [&str; 12] = [
    "Cedar", "Maple", "Oak", "Pine", "Willow", "Elm", "Birch", "Juniper", "Sunset", "Ridge",
    "Valley", "Mesquite",
];

const APPOINTMENT_TITLES: [&str; 8] = [
    "Initial assessment",
    "Facility tour",
    "Family meeting",
    "Paperwork review",
    "Move-in walkthrough",
    "Care plan review",
    "Follow-up call",
    "Budget discussion",
];

const FAVORITE_NOTES: [&str; 6] = [
    "Great staff, clean environment",
    "Close to family",
    "Memory care wing is excellent",
    "Good availability",
    "Client loved the garden",
    "Strong medical staffing",
];

const CLIENT_STATUSES: [ClientStatus; 10] = [
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
];
const FACILITY_KINDS: [FacilityKind; 5] = [
    FacilityKind::AssistedLiving,
    FacilityKind::MemoryCare,
    FacilityKind::IndependentLiving,
    FacilityKind::NursingHome,
    FacilityKind::ContinuingCare,
];
const APPOINTMENT_KINDS: [AppointmentKind; 5] = [
    AppointmentKind::Assessment,
    AppointmentKind::Tour,
    AppointmentKind::FollowUp,
    AppointmentKind::Paperwork,
    AppointmentKind::Other,
];
const APPOINTMENT_STATUSES: [AppointmentStatus; 4] = [
    AppointmentStatus::Scheduled,
    AppointmentStatus::Completed,
    AppointmentStatus::Cancelled,
    AppointmentStatus::Rescheduled,
];
const REFERRAL_STATUSES: [ReferralStatus; 9] = [
    ReferralStatus::Pending,
    ReferralStatus::Accepted,
    ReferralStatus::Declined,
    ReferralStatus::TourScheduled,
    ReferralStatus::TourCompleted,
    ReferralStatus::ApplicationSubmitted,
    ReferralStatus::Approved,
    ReferralStatus::MovedIn,
    ReferralStatus::Cancelled,
];
const INVOICE_STATUSES: [InvoiceStatus; 6] = [
    InvoiceStatus::Draft,
    InvoiceStatus::Sent,
    InvoiceStatus::Paid,
    InvoiceStatus::Pending,
    InvoiceStatus::Overdue,
    InvoiceStatus::Cancelled,
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic generator for placement records. The same seed yields the
/// same sequence, so fixtures stay stable across test runs. Ids are assigned
/// sequentially per category (`c1`, `f1`, `a1`, ...).
#[derive(Debug, Clone)]
pub struct CareFaker {
    rng: DeterministicRng,
    counters: [usize; 6],
}

impl CareFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            counters: [0; 6],
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// One record of the requested category, cross-linked to plausible
    /// client/facility ids.
    pub fn record(&mut self, category: Category) -> Record {
        match category {
            Category::Clients => Record::Client(self.client()),
            Category::Facilities => Record::Facility(self.facility()),
            Category::Appointments => Record::Appointment(self.appointment()),
            Category::Favorites => Record::Favorite(self.favorite()),
            Category::Referrals => Record::Referral(self.referral()),
            Category::Invoices => Record::Invoice(self.invoice()),
        }
    }

    pub fn records(&mut self, category: Category, count: usize) -> Vec<Record> {
        (0..count).map(|_| self.record(category)).collect()
    }

    pub fn client(&mut self) -> Client {
        let id = self.next_id(Category::Clients);
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let min = self.int_range_i64(150_000, 400_000);
        let budget = if self.rng.bool() {
            Some(MoneyRange {
                min_cents: min,
                max_cents: min + self.int_range_i64(50_000, 300_000),
            })
        } else {
            None
        };

        Client {
            id,
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}@example.com",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            phone: format!(
                "({:03}) {:03}-{:04}",
                self.int_range_i64(200, 999),
                self.int_range_i64(200, 999),
                self.int_range_i64(0, 9_999),
            ),
            city: self.pick(&CITIES).to_owned(),
            status: CLIENT_STATUSES[self.rng.int_n(CLIENT_STATUSES.len())],
            budget,
            created_at: self.recent_datetime(),
        }
    }

    pub fn facility(&mut self) -> Facility {
        let id = self.next_id(Category::Facilities);
        let capacity = self.int_range_i64(40, 200);
        let min = self.int_range_i64(200_000, 500_000);

        Facility {
            id,
            name: format!(
                "{} {}",
                self.pick(&FACILITY_ADJECTIVES),
                self.pick(&FACILITY_SUFFIXES)
            ),
            kind: FACILITY_KINDS[self.rng.int_n(FACILITY_KINDS.len())],
            address: format!(
                "{} {} St",
                self.int_range_i64(100, 9_999),
                self.pick(&STREET_NAMES)
            ),
            city: self.pick(&CITIES).to_owned(),
            capacity,
            available_beds: self.int_range_i64(0, capacity / 4),
            medicare_approved: self.rng.bool(),
            price_range: Some(MoneyRange {
                min_cents: min,
                max_cents: min + self.int_range_i64(100_000, 400_000),
            }),
            created_at: self.recent_datetime(),
        }
    }

    pub fn appointment(&mut self) -> Appointment {
        let id = self.next_id(Category::Appointments);
        let created_at = self.recent_datetime();
        Appointment {
            id,
            client_id: self.linked_id(Category::Clients),
            facility_id: self.linked_id(Category::Facilities),
            title: self.pick(&APPOINTMENT_TITLES).to_owned(),
            kind: APPOINTMENT_KINDS[self.rng.int_n(APPOINTMENT_KINDS.len())],
            status: APPOINTMENT_STATUSES[self.rng.int_n(APPOINTMENT_STATUSES.len())],
            is_virtual: self.rng.bool(),
            start_time: created_at + Duration::days(self.int_range_i64(1, 30)),
            created_at,
        }
    }

    pub fn favorite(&mut self) -> Favorite {
        let id = self.next_id(Category::Favorites);
        Favorite {
            id,
            facility_id: self.linked_id(Category::Facilities),
            facility_name: format!(
                "{} {}",
                self.pick(&FACILITY_ADJECTIVES),
                self.pick(&FACILITY_SUFFIXES)
            ),
            notes: self.pick(&FAVORITE_NOTES).to_owned(),
            created_at: self.recent_datetime(),
        }
    }

    pub fn referral(&mut self) -> Referral {
        let id = self.next_id(Category::Referrals);
        let fee = if self.rng.bool() {
            Some(self.int_range_i64(50_000, 500_000))
        } else {
            None
        };
        Referral {
            id,
            client_id: self.linked_id(Category::Clients),
            facility_id: self.linked_id(Category::Facilities),
            status: REFERRAL_STATUSES[self.rng.int_n(REFERRAL_STATUSES.len())],
            referral_fee_cents: fee,
            hipaa_consent: self.rng.bool(),
            created_at: self.recent_datetime(),
        }
    }

    pub fn invoice(&mut self) -> Invoice {
        let id = self.next_id(Category::Invoices);
        let unit_price = self.int_range_i64(50_000, 300_000);
        let quantity = self.int_range_i64(1, 3);
        let created_at = self.recent_datetime();
        Invoice {
            id,
            invoice_number: format!(
                "INV-{REFERENCE_YEAR}-{:03}",
                self.int_range_i64(1, 999)
            ),
            client_id: self.linked_id(Category::Clients),
            amount_cents: unit_price * quantity,
            status: INVOICE_STATUSES[self.rng.int_n(INVOICE_STATUSES.len())],
            due_date: Some(created_at + Duration::days(30)),
            items: vec![InvoiceItem {
                description: "Placement service".to_owned(),
                quantity,
                unit_price_cents: unit_price,
            }],
            created_at,
        }
    }

    fn next_id(&mut self, category: Category) -> RecordId {
        let index = category_index(category);
        self.counters[index] += 1;
        RecordId::new(format!("{}{}", id_prefix(category), self.counters[index]))
    }

    /// Id of a record that plausibly exists in another category. Points at
    /// one already generated when possible, otherwise at the first slot.
    fn linked_id(&mut self, category: Category) -> RecordId {
        let issued = self.counters[category_index(category)];
        let n = if issued == 0 {
            1
        } else {
            self.rng.int_n(issued) + 1
        };
        RecordId::new(format!("{}{}", id_prefix(category), n))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn recent_datetime(&mut self) -> OffsetDateTime {
        let end = reference_now();
        let start = end - Duration::days(365);
        let span = (end.unix_timestamp() - start.unix_timestamp()) as u64;
        let offset = self.rng.next_u64() % (span + 1);
        OffsetDateTime::from_unix_timestamp(start.unix_timestamp() + offset as i64)
            .expect("valid unix timestamp")
    }
}

const fn category_index(category: Category) -> usize {
    match category {
        Category::Clients => 0,
        Category::Facilities => 1,
        Category::Appointments => 2,
        Category::Favorites => 3,
        Category::Referrals => 4,
        Category::Invoices => 5,
    }
}

const fn id_prefix(category: Category) -> &'static str {
    match category {
        Category::Clients => "c",
        Category::Facilities => "f",
        Category::Appointments => "a",
        Category::Favorites => "v",
        Category::Referrals => "r",
        Category::Invoices => "i",
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("caseload.db");
    Ok((dir, db_path))
}

fn reference_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(REFERENCE_YEAR, Month::January, 1)
        .expect("valid calendar date");
    let midnight = Time::from_hms(0, 0, 0).expect("valid midnight");
    date.with_time(midnight).assume_utc()
}
