// Copyright 2026 Caseload Contributors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// String key for a record, unique within its category and immutable for the
/// record's lifetime. The store assigns opaque ids ("c1", "f3"); drafts made
/// through the grid's add action get `new-<unix-millis>` ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn draft(now: OffsetDateTime) -> Self {
        Self(format!("new-{}", now.unix_timestamp_nanos() / 1_000_000))
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
