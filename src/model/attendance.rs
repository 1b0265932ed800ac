use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch of `0001-01-01T00:00:00Z`, the instant the
/// upstream check-in writer stores for "not set".
const ZERO_INSTANT_MILLIS: i64 = -62_135_596_800_000;

/// Attendance document as stored in the `attendance` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub department_id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub time_checkin: Option<bson::DateTime>,
    #[serde(default)]
    pub time_checkout: Option<bson::DateTime>,
}

/// One user's attendance for the evaluated day, with unset instants as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: String,
    pub department_id: u64,
    pub user_id: u64,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
}

impl From<AttendanceDocument> for AttendanceRecord {
    fn from(doc: AttendanceDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            department_id: doc.department_id,
            user_id: doc.user_id,
            check_in: present_instant(doc.time_checkin),
            check_out: present_instant(doc.time_checkout),
        }
    }
}

fn present_instant(value: Option<bson::DateTime>) -> Option<DateTime<Utc>> {
    value
        .filter(|dt| dt.timestamp_millis() > ZERO_INSTANT_MILLIS)
        .map(bson::DateTime::to_chrono)
}
