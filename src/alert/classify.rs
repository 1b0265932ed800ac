use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};
use strum_macros::Display;

use crate::config::Config;
use crate::model::attendance::AttendanceRecord;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display)]
pub enum Classification {
    #[strum(serialize = "Compliant")]
    Compliant,
    #[strum(serialize = "Did not check in")]
    MissingCheckIn,
    #[strum(serialize = "Did not check out")]
    MissingCheckOut,
    #[strum(serialize = "Checked in late")]
    CheckInLate,
    #[strum(serialize = "Checked out early")]
    CheckOutEarly,
    #[strum(serialize = "Not enough work hours")]
    InsufficientDuration,
}

impl Classification {
    pub fn is_violation(self) -> bool {
        self != Classification::Compliant
    }
}

/// Expected times and threshold for one evaluated day.
#[derive(Debug, Clone)]
pub struct AttendancePolicy {
    pub date: NaiveDate,
    pub offset: FixedOffset,
    pub expected_check_in: DateTime<Utc>,
    pub expected_check_out: DateTime<Utc>,
    pub min_work_hours: u32,
}

impl AttendancePolicy {
    pub fn new(
        date: NaiveDate,
        time_in: NaiveTime,
        time_out: NaiveTime,
        min_work_hours: u32,
        offset: FixedOffset,
    ) -> Self {
        // policy times are wall-clock in `offset`
        let shift = Duration::seconds(offset.local_minus_utc().into());
        let at = |time: NaiveTime| date.and_time(time).and_utc() - shift;

        Self {
            date,
            offset,
            expected_check_in: at(time_in),
            expected_check_out: at(time_out),
            min_work_hours,
        }
    }

    pub fn for_today(config: &Config) -> Self {
        let today = Utc::now().with_timezone(&config.utc_offset).date_naive();
        Self::new(
            today,
            config.time_in,
            config.time_out,
            config.time_work,
            config.utc_offset,
        )
    }

    fn hour_of_day(&self, instant: DateTime<Utc>) -> i64 {
        instant.with_timezone(&self.offset).hour().into()
    }
}

pub type Rule = (
    Classification,
    fn(&AttendancePolicy, &AttendanceRecord) -> bool,
);

/// Ordered decision table; the first matching rule classifies the record.
pub const RULES: [Rule; 5] = [
    (Classification::MissingCheckIn, missing_check_in),
    (Classification::MissingCheckOut, missing_check_out),
    (Classification::CheckInLate, check_in_late),
    (Classification::CheckOutEarly, check_out_early),
    (Classification::InsufficientDuration, insufficient_duration),
];

pub fn classify(policy: &AttendancePolicy, record: &AttendanceRecord) -> Classification {
    RULES
        .iter()
        .find(|(_, matches)| matches(policy, record))
        .map(|(classification, _)| *classification)
        .unwrap_or(Classification::Compliant)
}

fn missing_check_in(_: &AttendancePolicy, record: &AttendanceRecord) -> bool {
    record.check_in.is_none()
}

fn missing_check_out(_: &AttendancePolicy, record: &AttendanceRecord) -> bool {
    record.check_out.is_none()
}

fn check_in_late(policy: &AttendancePolicy, record: &AttendanceRecord) -> bool {
    record
        .check_in
        .is_some_and(|check_in| check_in > policy.expected_check_in)
}

fn check_out_early(policy: &AttendancePolicy, record: &AttendanceRecord) -> bool {
    record
        .check_out
        .is_some_and(|check_out| check_out < policy.expected_check_out)
}

// Compares hour-of-day components, not elapsed time.
fn insufficient_duration(policy: &AttendancePolicy, record: &AttendanceRecord) -> bool {
    match (record.check_in, record.check_out) {
        (Some(check_in), Some(check_out)) => {
            policy.hour_of_day(check_out) - policy.hour_of_day(check_in)
                < i64::from(policy.min_work_hours)
        }
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    pub(crate) fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    pub(crate) fn policy(time_in: &str, time_out: &str, min_work_hours: u32) -> AttendancePolicy {
        AttendancePolicy::new(
            date(),
            NaiveTime::parse_from_str(time_in, "%H:%M").unwrap(),
            NaiveTime::parse_from_str(time_out, "%H:%M").unwrap(),
            min_work_hours,
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    pub(crate) fn at(time: &str) -> Option<DateTime<Utc>> {
        let time = NaiveTime::parse_from_str(time, "%H:%M").unwrap();
        Some(date().and_time(time).and_utc())
    }

    pub(crate) fn record(
        user_id: u64,
        check_in: Option<DateTime<Utc>>,
        check_out: Option<DateTime<Utc>>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("rec-{user_id}"),
            department_id: 1,
            user_id,
            check_in,
            check_out,
        }
    }

    #[rstest]
    #[case::absent_check_out(None)]
    #[case::early_check_out(at("12:00"))]
    #[case::on_time_check_out(at("18:00"))]
    fn missing_check_in_wins_regardless_of_check_out(
        #[case] check_out: Option<DateTime<Utc>>,
    ) {
        let policy = policy("09:00", "18:00", 8);
        assert_eq!(
            classify(&policy, &record(1, None, check_out)),
            Classification::MissingCheckIn
        );
    }

    #[rstest]
    #[case::on_time(at("08:30"))]
    #[case::late(at("11:45"))]
    fn present_check_in_without_check_out_is_missing_check_out(
        #[case] check_in: Option<DateTime<Utc>>,
    ) {
        let policy = policy("09:00", "18:00", 8);
        assert_eq!(
            classify(&policy, &record(1, check_in, None)),
            Classification::MissingCheckOut
        );
    }

    #[rstest]
    #[case::late_arrival("09:00", "18:00", 8, "09:15", "18:00", Classification::CheckInLate)]
    #[case::early_departure("09:00", "18:00", 8, "08:00", "17:30", Classification::CheckOutEarly)]
    #[case::short_day("09:00", "15:00", 8, "08:00", "15:00", Classification::InsufficientDuration)]
    #[case::full_day("09:00", "18:00", 8, "08:55", "18:05", Classification::Compliant)]
    #[case::exactly_on_time("09:00", "18:00", 8, "09:00", "18:00", Classification::Compliant)]
    #[case::late_beats_early("09:00", "18:00", 8, "09:30", "17:00", Classification::CheckInLate)]
    fn scenarios(
        #[case] time_in: &str,
        #[case] time_out: &str,
        #[case] min_work_hours: u32,
        #[case] check_in: &str,
        #[case] check_out: &str,
        #[case] expected: Classification,
    ) {
        let policy = policy(time_in, time_out, min_work_hours);
        assert_eq!(
            classify(&policy, &record(1, at(check_in), at(check_out))),
            expected
        );
    }

    #[test]
    fn duration_uses_hour_of_day_components() {
        // 08:59 -> 16:01 is about seven elapsed hours, yet 16 - 8 meets the threshold
        let policy = policy("09:00", "16:00", 8);
        assert_eq!(
            classify(&policy, &record(1, at("08:59"), at("16:01"))),
            Classification::Compliant
        );
        assert_eq!(
            classify(&policy, &record(1, at("09:00"), at("16:59"))),
            Classification::InsufficientDuration
        );
    }

    #[test]
    fn rules_are_ordered_as_decision_list() {
        let order: Vec<Classification> = RULES.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            order,
            vec![
                Classification::MissingCheckIn,
                Classification::MissingCheckOut,
                Classification::CheckInLate,
                Classification::CheckOutEarly,
                Classification::InsufficientDuration,
            ]
        );
    }

    #[test]
    fn each_rule_matches_on_its_own() {
        let policy = policy("09:00", "18:00", 8);
        let late = record(1, at("10:00"), at("18:30"));

        let (_, check_in_late) = RULES[2];
        let (_, check_out_early) = RULES[3];
        assert!(check_in_late(&policy, &late));
        assert!(!check_out_early(&policy, &late));
    }

    #[test]
    fn policy_times_follow_offset() {
        let plus_seven = FixedOffset::east_opt(7 * 3600).unwrap();
        let policy = AttendancePolicy::new(date(), hm(9, 0), hm(18, 0), 8, plus_seven);

        assert_eq!(
            policy.expected_check_in,
            Utc.with_ymd_and_hms(2026, 10, 16, 2, 0, 0).unwrap()
        );
        // 01:30 UTC is 08:30 local: on time
        let early_bird = record(
            1,
            Some(Utc.with_ymd_and_hms(2026, 10, 16, 1, 30, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2026, 10, 16, 11, 0, 0).unwrap()),
        );
        assert_eq!(classify(&policy, &early_bird), Classification::Compliant);
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(Classification::CheckInLate.to_string(), "Checked in late");
        assert_eq!(Classification::MissingCheckIn.to_string(), "Did not check in");
        assert!(!Classification::Compliant.is_violation());
    }
}
