use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{FixedOffset, NaiveTime};

#[derive(Clone, Debug)]
pub struct Config {
    // Attendance policy
    pub time_in: NaiveTime,
    pub time_out: NaiveTime,
    pub time_work: u32,
    pub utc_offset: FixedOffset,
    pub manager_position_id: u64,

    // Mail
    pub mail_content_tpl: String,
    pub mail_host: String,
    pub mail_port: u16,
    pub mail_user: String,
    pub mail_pass: String,
    pub mail_subject: String,
    pub mail_accept_invalid_certs: bool,

    // Stores
    pub database_url: String,
    pub mongodb_uri: String,
    pub mongodb_name: String,
    pub attendance_collection: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set"));

        let db_host = required("DB_HOST")?;
        let db_port: u16 = parse_var("DB_PORT", &required("DB_PORT")?)?;
        let db_user = required("DB_USER")?;
        let db_pass = required("DB_PASS")?;
        let db_name = required("DB_NAME")?;

        let mongodb_uri = required("MONGODB_URI")?;
        if mongodb_uri.trim().is_empty() {
            bail!("You must set your 'MONGODB_URI' environmental variable");
        }

        let offset_minutes: i32 = lookup("UTC_OFFSET_MINUTES")
            .map(|v| parse_var("UTC_OFFSET_MINUTES", &v))
            .transpose()?
            .unwrap_or(0);
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| anyhow!("UTC_OFFSET_MINUTES out of range: {offset_minutes}"))?;

        Ok(Self {
            time_in: parse_time_of_day("TIME_IN", &required("TIME_IN")?)?,
            time_out: parse_time_of_day("TIME_OUT", &required("TIME_OUT")?)?,
            time_work: parse_var("TIME_WORK", &required("TIME_WORK")?)?,
            utc_offset,
            manager_position_id: lookup("MANAGER_POSITION_ID")
                .map(|v| parse_var("MANAGER_POSITION_ID", &v))
                .transpose()?
                .unwrap_or(1),

            mail_content_tpl: required("MAIL_CONTENT_TPL")?,
            mail_host: required("MAIL_HOST")?,
            mail_port: parse_var("MAIL_PORT", &required("MAIL_PORT")?)?,
            mail_user: required("MAIL_USER")?,
            mail_pass: required("MAIL_PASS")?,
            mail_subject: lookup("MAIL_SUBJECT").unwrap_or_else(|| "Attendance report".to_string()),
            mail_accept_invalid_certs: lookup("MAIL_ACCEPT_INVALID_CERTS")
                .map(|v| parse_var("MAIL_ACCEPT_INVALID_CERTS", &v))
                .transpose()?
                .unwrap_or(false),

            database_url: format!("mysql://{db_user}:{db_pass}@{db_host}:{db_port}/{db_name}"),
            mongodb_uri,
            mongodb_name: required("MONGODB_NAME")?,
            attendance_collection: lookup("ATTENDANCE_COLLECTION")
                .unwrap_or_else(|| "attendance".to_string()),

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: lookup("LOG_LEVEL")
                .map(|v| parse_var("LOG_LEVEL", &v))
                .transpose()?
                .unwrap_or(tracing::Level::INFO),
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("Error when read {key}: {raw:?}"))
}

fn parse_time_of_day(key: &str, raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("Error when read {key}: expected HH:MM, got {raw:?}"))
}
