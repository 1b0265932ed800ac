use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::model::department::DepartmentHeadcount;
use crate::model::user::User;
use crate::store::RosterSource;

pub struct MySqlRoster {
    pool: MySqlPool,
}

impl MySqlRoster {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterSource for MySqlRoster {
    async fn department_headcounts(&self) -> Result<Vec<DepartmentHeadcount>> {
        sqlx::query_as::<_, DepartmentHeadcount>(
            r#"
            SELECT department_id, COUNT(id) AS total
            FROM users
            GROUP BY department_id
            ORDER BY department_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Error when count users per department")
    }

    async fn department_users(&self, department_id: u64) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, department_id, position_id, manager_id
            FROM users
            WHERE department_id = ?
            ORDER BY id
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Error when load users of department {department_id}"))
    }
}
