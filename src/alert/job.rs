use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::alert::classify::{AttendancePolicy, Classification};
use crate::alert::partition::{MissingManager, partition};
use crate::alert::render::{ReportContext, render};
use crate::alert::tally::{Evaluation, evaluate};
use crate::mailer::{Mail, Notifier};
use crate::model::user::User;
use crate::store::{AttendanceSource, RosterSource};

/// How a run went, per department.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct AlertJob<'a, R, A, N> {
    pub policy: AttendancePolicy,
    pub template: &'a str,
    pub manager_position_id: u64,
    pub roster: &'a R,
    pub attendance: &'a A,
    pub notifier: &'a N,
}

impl<R, A, N> AlertJob<'_, R, A, N>
where
    R: RosterSource + Sync,
    A: AttendanceSource + Sync,
    N: Notifier + Sync,
{
    /// Evaluates and mails every department in turn. Store errors abort the
    /// run; mail errors are logged and the next department is processed.
    pub async fn run(&self) -> Result<RunSummary> {
        let headcounts = self.roster.department_headcounts().await?;
        info!(
            departments = headcounts.len(),
            date = %self.policy.date,
            "Evaluating attendance"
        );

        let mut summary = RunSummary::default();
        for headcount in headcounts {
            let department_id = headcount.department_id;
            let total = u64::try_from(headcount.total).unwrap_or_default();

            let users = self.roster.department_users(department_id).await?;
            let records = self
                .attendance
                .department_attendance(department_id)
                .await
                .with_context(|| format!("Error when load attendance of department {department_id}"))?;

            let evaluation = evaluate(&self.policy, department_id, total, &records);
            for outcome in &evaluation.outcomes {
                debug!(
                    department_id,
                    user_id = outcome.user_id,
                    classification = %outcome.classification,
                    "Classified attendance"
                );
            }
            let tally = evaluation.tally;
            info!(
                department_id,
                total = tally.total,
                worked = tally.worked,
                not_check_in = tally.not_check_in,
                not_check_out = tally.not_check_out,
                check_in_late = tally.check_in_late,
                check_out_early = tally.check_out_early,
                not_enough_work = tally.not_enough_work,
                "Department tally"
            );

            let details = violation_details(&users, &evaluation);

            let recipients = match partition(users, self.manager_position_id) {
                Ok(recipients) => recipients,
                Err(MissingManager::NoManager) => {
                    warn!(department_id, "No manager found, report not sent");
                    summary.skipped += 1;
                    continue;
                }
                Err(MissingManager::NoEmail { manager_id }) => {
                    warn!(department_id, manager_id, "Manager has no email, report not sent");
                    summary.skipped += 1;
                    continue;
                }
            };
            if recipients.extra_managers > 0 {
                warn!(
                    department_id,
                    manager_id = recipients.manager.id,
                    extra_managers = recipients.extra_managers,
                    "Several managers found, addressing the lowest id"
                );
            }

            let context = ReportContext {
                dept_name: recipients.manager.email.clone(),
                tally,
                details,
            };
            let mail = Mail {
                to: recipients.manager.email,
                cc: recipients.cc,
                html_body: render(self.template, &context),
            };

            match self.notifier.send(&mail).await {
                Ok(()) => {
                    info!(department_id, to = %mail.to, cc = mail.cc.len(), "Report sent");
                    summary.sent += 1;
                }
                Err(e) => {
                    error!(department_id, to = %mail.to, error = ?e, "Error when send mail");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

fn violation_details(users: &[User], evaluation: &Evaluation) -> Vec<(String, Classification)> {
    let emails: HashMap<u64, &str> = users
        .iter()
        .filter(|user| !user.email.is_empty())
        .map(|user| (user.id, user.email.as_str()))
        .collect();

    evaluation
        .violations()
        .map(|outcome| {
            let who = emails
                .get(&outcome.user_id)
                .map(|email| email.to_string())
                .unwrap_or_else(|| format!("user #{}", outcome.user_id));
            (who, outcome.classification)
        })
        .collect()
}
