use crate::alert::classify::{AttendancePolicy, Classification, classify};
use crate::model::attendance::AttendanceRecord;
use crate::model::department::DepartmentTally;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub user_id: u64,
    pub classification: Classification,
}

/// Tally plus the per-record outcomes it was folded from.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub tally: DepartmentTally,
    pub outcomes: Vec<RecordOutcome>,
}

impl Evaluation {
    pub fn violations(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.classification.is_violation())
    }
}

impl DepartmentTally {
    fn count(mut self, classification: Classification) -> Self {
        match classification {
            Classification::Compliant => {}
            Classification::MissingCheckIn => self.not_check_in += 1,
            Classification::MissingCheckOut => self.not_check_out += 1,
            Classification::CheckInLate => self.check_in_late += 1,
            Classification::CheckOutEarly => self.check_out_early += 1,
            Classification::InsufficientDuration => self.not_enough_work += 1,
        }
        self
    }
}

/// Folds classifications into a tally. `worked` is derived from `total`, so
/// users with no record count as compliant.
pub fn fold_tally<I>(department_id: u64, total: u64, classifications: I) -> DepartmentTally
where
    I: IntoIterator<Item = Classification>,
{
    let tally = classifications.into_iter().fold(
        DepartmentTally {
            department_id,
            total,
            ..Default::default()
        },
        DepartmentTally::count,
    );

    DepartmentTally {
        worked: total.saturating_sub(tally.violations()),
        ..tally
    }
}

pub fn evaluate(
    policy: &AttendancePolicy,
    department_id: u64,
    total: u64,
    records: &[AttendanceRecord],
) -> Evaluation {
    let outcomes: Vec<RecordOutcome> = records
        .iter()
        .map(|record| RecordOutcome {
            user_id: record.user_id,
            classification: classify(policy, record),
        })
        .collect();

    let tally = fold_tally(
        department_id,
        total,
        outcomes.iter().map(|outcome| outcome.classification),
    );

    Evaluation { tally, outcomes }
}
