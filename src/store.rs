use anyhow::Result;
use async_trait::async_trait;

use crate::model::attendance::AttendanceRecord;
use crate::model::department::DepartmentHeadcount;
use crate::model::user::User;

pub mod mongo;
pub mod mysql;

/// Users and departments from the relational store.
#[async_trait]
pub trait RosterSource {
    async fn department_headcounts(&self) -> Result<Vec<DepartmentHeadcount>>;

    async fn department_users(&self, department_id: u64) -> Result<Vec<User>>;
}

/// Attendance records from the document store.
#[async_trait]
pub trait AttendanceSource {
    async fn department_attendance(&self, department_id: u64) -> Result<Vec<AttendanceRecord>>;
}
