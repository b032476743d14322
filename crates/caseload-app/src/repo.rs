// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::ids::RecordId;
use crate::model::{
    Appointment, AppointmentKind, AppointmentStatus, Category, Client, ClientStatus, Facility,
    FacilityKind, Favorite, Invoice, InvoiceItem, InvoiceStatus, MoneyRange, Record, Referral,
    ReferralStatus,
};

/// Seam between the grid state machine and whatever holds the records. The
/// editor logic depends only on this contract, so the in-memory collections
/// here and the SQLite store are interchangeable.
pub trait RecordRepository {
    /// Ordered live sequence for one category (insertion order = display
    /// order before pagination).
    fn list(&self, category: Category) -> Result<Vec<Record>>;

    fn get(&self, category: Category, id: &RecordId) -> Result<Option<Record>>;

    fn insert(&mut self, record: Record) -> Result<()>;

    /// Replaces the stored record with the same category and id. Returns
    /// false (a no-op) when the id does not exist.
    fn update(&mut self, record: Record) -> Result<bool>;

    /// Removes a record. Returns false when the id does not exist.
    fn delete(&mut self, category: Category, id: &RecordId) -> Result<bool>;
}

/// Process-local repository: one insertion-ordered vector per category.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    collections: BTreeMap<Category, Vec<Record>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with the sample rows every category starts
    /// from: one client mid-pipeline, the facility they toured, the tour
    /// appointment, a favorite, a referral, and an open invoice.
    pub fn seeded() -> Self {
        let mut repo = Self::new();
        for record in sample_records() {
            repo.push(record);
        }
        repo
    }

    fn push(&mut self, record: Record) {
        self.collections
            .entry(record.category())
            .or_default()
            .push(record);
    }
}

impl RecordRepository for MemoryRepository {
    fn list(&self, category: Category) -> Result<Vec<Record>> {
        Ok(self.collections.get(&category).cloned().unwrap_or_default())
    }

    fn get(&self, category: Category, id: &RecordId) -> Result<Option<Record>> {
        Ok(self
            .collections
            .get(&category)
            .and_then(|records| records.iter().find(|record| record.id() == id))
            .cloned())
    }

    fn insert(&mut self, record: Record) -> Result<()> {
        self.push(record);
        Ok(())
    }

    fn update(&mut self, record: Record) -> Result<bool> {
        let Some(records) = self.collections.get_mut(&record.category()) else {
            return Ok(false);
        };
        match records.iter_mut().find(|existing| existing.id() == record.id()) {
            Some(existing) => {
                *existing = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&mut self, category: Category, id: &RecordId) -> Result<bool> {
        let Some(records) = self.collections.get_mut(&category) else {
            return Ok(false);
        };
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() < before)
    }
}

/// Fixture rows shared by the seeded in-memory repository and the store's
/// demo mode.
pub fn sample_records() -> Vec<Record> {
    let seeded_at = OffsetDateTime::from_unix_timestamp(1_767_225_600)
        .expect("fixture timestamp in range");

    vec![
        Record::Client(Client {
            id: RecordId::from("c1"),
            name: "John Doe".to_owned(),
            email: "john@example.com".to_owned(),
            phone: "555-0123".to_owned(),
            city: "Mesa".to_owned(),
            status: ClientStatus::Assessment,
            budget: Some(MoneyRange {
                min_cents: 250_000,
                max_cents: 450_000,
            }),
            created_at: seeded_at,
        }),
        Record::Facility(Facility {
            id: RecordId::from("f1"),
            name: "Sunrise Senior Living".to_owned(),
            kind: FacilityKind::AssistedLiving,
            address: "123 Care Lane".to_owned(),
            city: "Mesa".to_owned(),
            capacity: 100,
            available_beds: 12,
            medicare_approved: true,
            price_range: Some(MoneyRange {
                min_cents: 320_000,
                max_cents: 610_000,
            }),
            created_at: seeded_at,
        }),
        Record::Appointment(Appointment {
            id: RecordId::from("a1"),
            client_id: RecordId::from("c1"),
            facility_id: RecordId::from("f1"),
            title: "Initial tour".to_owned(),
            kind: AppointmentKind::Tour,
            status: AppointmentStatus::Scheduled,
            is_virtual: false,
            start_time: seeded_at,
            created_at: seeded_at,
        }),
        Record::Favorite(Favorite {
            id: RecordId::from("v1"),
            facility_id: RecordId::from("f1"),
            facility_name: "Sunrise Senior Living".to_owned(),
            notes: "Great staff, clean environment".to_owned(),
            created_at: seeded_at,
        }),
        Record::Referral(Referral {
            id: RecordId::from("r1"),
            client_id: RecordId::from("c1"),
            facility_id: RecordId::from("f1"),
            status: ReferralStatus::Pending,
            referral_fee_cents: None,
            hipaa_consent: true,
            created_at: seeded_at,
        }),
        Record::Invoice(Invoice {
            id: RecordId::from("i1"),
            invoice_number: "INV-2026-001".to_owned(),
            client_id: RecordId::from("c1"),
            amount_cents: 150_000,
            status: InvoiceStatus::Sent,
            due_date: Some(seeded_at),
            items: vec![InvoiceItem {
                description: "Placement service".to_owned(),
                quantity: 1,
                unit_price_cents: 150_000,
            }],
            created_at: seeded_at,
        }),
    ]
}
