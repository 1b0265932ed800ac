use serde::{Deserialize, Serialize};

/// Row of the per-department headcount query.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepartmentHeadcount {
    pub department_id: u64,
    // COUNT() comes back as a signed BIGINT
    pub total: i64,
}

/// Violation counters for one department over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentTally {
    pub department_id: u64,
    pub total: u64,
    pub worked: u64,
    pub check_in_late: u64,
    pub check_out_early: u64,
    pub not_check_in: u64,
    pub not_check_out: u64,
    pub not_enough_work: u64,
}

impl DepartmentTally {
    pub fn violations(&self) -> u64 {
        self.not_check_in
            + self.not_check_out
            + self.check_in_late
            + self.check_out_early
            + self.not_enough_work
    }
}
