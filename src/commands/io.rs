#![deny(clippy::all, clippy::pedantic)]

use blogdesk::application::error::AppError;
use blogdesk::domain::posts::normalize_publish_date;

pub fn publish_date(value: &str) -> Result<String, AppError> {
    Ok(normalize_publish_date(value)?)
}

pub fn publish_date_opt(value: Option<String>) -> Result<Option<String>, AppError> {
    value.as_deref().map(publish_date).transpose()
}
