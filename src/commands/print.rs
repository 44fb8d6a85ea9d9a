#![deny(clippy::all, clippy::pedantic)]

use blogdesk::application::PostForm;
use blogdesk::application::error::AppError;
use blogdesk::domain::posts::PostField;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::input(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

/// Inline form messages, one `field: message` line each, known fields first.
pub fn print_field_errors(form: &PostForm) {
    let Some(errors) = form.errors() else {
        return;
    };

    for field in PostField::ALL {
        if let Some(message) = form.field_error(field) {
            eprintln!("{}: {message}", field.as_str());
        }
    }
    for (name, message) in errors {
        if name.parse::<PostField>().is_ok() {
            continue;
        }
        if let Some(text) = message.first_text() {
            eprintln!("{name}: {text}");
        }
    }
}
