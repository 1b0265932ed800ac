use crate::model::user::User;

/// Who receives a department's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients {
    pub manager: User,
    pub cc: Vec<String>,
    /// Managers beyond the one addressed; they are copied like employees.
    pub extra_managers: usize,
}

/// Why a department has nobody to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingManager {
    NoManager,
    /// Managers exist but none has an email; carries the lowest manager id.
    NoEmail { manager_id: u64 },
}

/// Picks the department manager (lowest id wins when several share the
/// position) and copies everyone else. Users without an email are dropped.
pub fn partition(users: Vec<User>, manager_position_id: u64) -> Result<Recipients, MissingManager> {
    let (mut managers, employees): (Vec<User>, Vec<User>) = users
        .into_iter()
        .partition(|user| user.is_manager(manager_position_id));

    managers.sort_by_key(|user| user.id);
    let first_manager_id = managers
        .first()
        .map(|user| user.id)
        .ok_or(MissingManager::NoManager)?;

    let mut managers = managers.into_iter().filter(has_email);
    let manager = managers.next().ok_or(MissingManager::NoEmail {
        manager_id: first_manager_id,
    })?;

    let extra: Vec<User> = managers.collect();
    let extra_managers = extra.len();
    let cc = extra
        .into_iter()
        .chain(employees.into_iter().filter(has_email))
        .map(|user| user.email)
        .collect();

    Ok(Recipients {
        manager,
        cc,
        extra_managers,
    })
}

fn has_email(user: &User) -> bool {
    !user.email.trim().is_empty()
}
