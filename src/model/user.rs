use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub department_id: u64,
    pub position_id: u64,
    pub manager_id: Option<u64>,
}

impl User {
    pub fn is_manager(&self, manager_position_id: u64) -> bool {
        self.position_id == manager_position_id
    }
}
