//! blogdesk: command-line front end for the posts admin views.
#![deny(clippy::all, clippy::pedantic)]

mod commands;

use std::process;

use blogdesk::{
    application::{
        BlogApi,
        error::{AppError, ErrorReport},
    },
    config::{self, Command},
    infra::telemetry,
};
use tracing::{Dispatch, Level, debug, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = ErrorReport::from_error("blogdesk::main", error);
    if dispatcher::has_been_set() {
        error!(source = report.source, error = %report.summary(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(source = report.source, error = %report.summary(), "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;
    let api = BlogApi::from_settings(&settings)?;
    debug!(base_url = %settings.api.base_url, "posts api configured");

    match cli_args.command {
        Command::Posts(args) => commands::posts::handle(&api, args.action).await,
    }
}
