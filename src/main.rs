use anyhow::Result;
use dotenvy::dotenv;
use tracing::{Instrument, error, info, info_span, warn};
use tracing_appender::rolling;
use uuid::Uuid;

mod alert;
mod config;
mod db;
mod mailer;
mod model;
mod store;

use alert::classify::AttendancePolicy;
use alert::job::AlertJob;
use config::Config;
use db::{init_db, init_mongo};
use mailer::SmtpNotifier;
use store::mongo::MongoAttendance;
use store::mysql::MySqlRoster;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenv().is_ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "timekeeping.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    if !dotenv_loaded {
        warn!("No .env file found");
    }

    let span = info_span!("run", run_id = %Uuid::new_v4());
    let result = run(config).instrument(span).await;
    if let Err(e) = &result {
        error!(error = ?e, "Timekeeping alert aborted");
    }
    result
}

async fn run(config: Config) -> Result<()> {
    info!("Timekeeping alert starting...");

    let pool = init_db(&config.database_url).await?;
    let mongo = init_mongo(&config.mongodb_uri, &config.mongodb_name).await?;
    let notifier = SmtpNotifier::new(&config)?;

    let roster = MySqlRoster::new(pool);
    let attendance = MongoAttendance::new(&mongo, &config.attendance_collection);

    let job = AlertJob {
        policy: AttendancePolicy::for_today(&config),
        template: &config.mail_content_tpl,
        manager_position_id: config.manager_position_id,
        roster: &roster,
        attendance: &attendance,
        notifier: &notifier,
    };

    let summary = job.run().await?;
    info!(
        sent = summary.sent,
        skipped = summary.skipped,
        failed = summary.failed,
        "Timekeeping alert finished"
    );

    Ok(())
}
