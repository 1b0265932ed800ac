use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use crate::model::attendance::{AttendanceDocument, AttendanceRecord};
use crate::store::AttendanceSource;

pub struct MongoAttendance {
    collection: Collection<AttendanceDocument>,
}

impl MongoAttendance {
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }
}

#[async_trait]
impl AttendanceSource for MongoAttendance {
    async fn department_attendance(&self, department_id: u64) -> Result<Vec<AttendanceRecord>> {
        // stored as int64 by the check-in service
        let department_id = i64::try_from(department_id)
            .with_context(|| format!("department id {department_id} does not fit in int64"))?;

        let cursor = self
            .collection
            .find(doc! { "department_id": department_id }, None)
            .await
            .with_context(|| format!("Error when query attendance of department {department_id}"))?;

        let documents: Vec<AttendanceDocument> = cursor
            .try_collect()
            .await
            .with_context(|| format!("Error when read attendance of department {department_id}"))?;

        Ok(documents.into_iter().map(AttendanceRecord::from).collect())
    }
}
