use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes between two consecutive bookable slots.
pub const SLOT_MINUTES: u32 = 30;

/// A bookable half-hour slot, written `HH:MM` on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    hour: u8,
    minute: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeSlotError {
    #[error("Time must be in HH:MM format")]
    Format,
    #[error("Time must fall on a 30-minute boundary")]
    OffBoundary,
}

impl TimeSlot {
    pub fn new(hour: u8, minute: u8) -> Result<Self, TimeSlotError> {
        if hour > 23 || minute > 59 {
            return Err(TimeSlotError::Format);
        }
        if u32::from(minute) % SLOT_MINUTES != 0 {
            return Err(TimeSlotError::OffBoundary);
        }
        Ok(Self { hour, minute })
    }

    /// Every slot of a day, in order.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..24u8).flat_map(|hour| {
            (0..60u8)
                .step_by(SLOT_MINUTES as usize)
                .map(move |minute| TimeSlot { hour, minute })
        })
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s.trim().split_once(':').ok_or(TimeSlotError::Format)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(TimeSlotError::Format);
        }
        let hour = h.parse::<u8>().map_err(|_| TimeSlotError::Format)?;
        let minute = m.parse::<u8>().map_err(|_| TimeSlotError::Format)?;
        TimeSlot::new(hour, minute)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for TimeSlot {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for TimeSlot {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A stored appointment.
///
/// `date` is the day the booking was requested and never changes after
/// creation. `scheduled_on` + `time` is the slot the doctor is held for;
/// rescheduling moves only those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "Appoint_ID")]
    pub appoint_id: i64,
    #[serde(rename = "Patient_ID")]
    pub patient_id: i64,
    #[serde(rename = "Doctor_ID")]
    pub doctor_id: i64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Time")]
    pub time: TimeSlot,
    #[serde(rename = "Scheduled_On")]
    pub scheduled_on: NaiveDate,
}

/// Appointment enriched with display names for list screens.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(rename = "Patient_Name")]
    pub patient_name: String,
    #[serde(rename = "Doctor_Name")]
    pub doctor_name: String,
}

/// Validated input for a new booking.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub scheduled_on: NaiveDate,
}

/// Validated input for a reschedule. The booking `date` is not part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentChanges {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub time: TimeSlot,
    pub scheduled_on: NaiveDate,
}
