//! Patient ids, record inputs and the record read model.

use chrono::{DateTime, Local, Utc};

use crate::error::SessionError;

/// Milliseconds per second; the ledger stores seconds, date types want millis.
pub const TIMESTAMP_SCALE: i64 = 1000;

/// Key identifying a patient on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatientId(u64);

impl PatientId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parses free-text user input as a base-10, non-negative integer.
    ///
    /// Surrounding whitespace is ignored. Empty, signed, fractional or
    /// otherwise non-numeric input is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidPatientId`] when the input is not a
    /// valid id.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SessionError::InvalidPatientId {
                raw: raw.to_string(),
            });
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| SessionError::InvalidPatientId {
                raw: raw.to_string(),
            })
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record to append for a patient. Only the id is validated locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordInput {
    pub patient_id: PatientId,
    pub name: String,
    pub diagnosis: String,
    pub treatment: String,
}

/// Raw add-record form input, validated into a [`RecordInput`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordForm {
    pub patient_id: String,
    pub name: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl RecordForm {
    /// Validates the patient id; the text fields pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidPatientId`] for a malformed id.
    pub fn into_input(self) -> Result<RecordInput, SessionError> {
        Ok(RecordInput {
            patient_id: PatientId::parse(&self.patient_id)?,
            name: self.name,
            diagnosis: self.diagnosis,
            treatment: self.treatment,
        })
    }
}

/// A record as returned by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub record_id: u64,
    pub patient_name: String,
    pub diagnosis: String,
    pub treatment: String,
    /// Unix seconds.
    pub timestamp: u64,
}

impl Record {
    /// The ledger timestamp as a UTC date/time, or `None` if out of range.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.timestamp).ok()?;
        let millis = seconds.checked_mul(TIMESTAMP_SCALE)?;
        DateTime::<Utc>::from_timestamp_millis(millis)
    }

    /// Local-time rendering of [`Record::recorded_at`].
    pub fn display_timestamp(&self) -> String {
        match self.recorded_at() {
            Some(at) => at
                .with_timezone(&Local)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string(),
            None => format!("{}s", self.timestamp),
        }
    }
}

/// Records for a single patient, in ledger order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordSet {
    patient_id: Option<PatientId>,
    records: Vec<Record>,
}

impl RecordSet {
    /// The set returned by the ledger for `patient_id`.
    pub fn new(patient_id: PatientId, records: Vec<Record>) -> Self {
        Self {
            patient_id: Some(patient_id),
            records,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The patient the set belongs to; `None` for the empty placeholder.
    pub fn patient_id(&self) -> Option<PatientId> {
        self.patient_id
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
