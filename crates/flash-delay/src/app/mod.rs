#![expect(clippy::print_stderr, reason = "CLI errors are emitted here")]

//! CLI application layer and composition root wiring.

use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use tracing::debug;

pub mod commands;
pub mod error;
mod handlers;
pub mod http_api;

use crate::adapters::create_presenter;
use crate::app::commands::Cli;
use crate::app::error::exit_code_for_api_error;
use crate::app::error::exit_code_for_server_error;
use crate::app::error::exit_codes;
use crate::app::http_api::ServerError;
use crate::common::telemetry;
use crate::usecases::ports::ApiError;

const PROGRAM_NAME: &str = "flash-delay";
/// Bounds how long a blocked stdin reader can hold up exit.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

pub struct Application;

impl Application {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self) -> Result<i32> {
        let exit_code = match self.execute() {
            Ok(code) => code,
            Err(e) => self.handle_error(e),
        };
        Ok(exit_code)
    }

    fn execute(&self) -> Result<i32> {
        let cli = Cli::parse();
        let _telemetry = telemetry::init_tracing(cli.default_log_level());
        let format = cli.effective_format();
        debug!(command = ?cli.command, format = ?format, "CLI command parsed");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build async runtime")?;
        let presenter = create_presenter(format);
        let result = runtime.block_on(handlers::dispatch(&cli, presenter.as_ref()));
        runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
        result.with_context(|| format!("failed to execute command {:?}", cli.command))
    }

    fn handle_error(&self, e: anyhow::Error) -> i32 {
        eprintln!("{PROGRAM_NAME}: Error: {e:#}");
        if let Some(server_error) = find_error::<ServerError>(&e) {
            exit_code_for_server_error(server_error)
        } else if let Some(api_error) = find_error::<ApiError>(&e) {
            exit_code_for_api_error(api_error)
        } else {
            exit_codes::GENERAL_ERROR
        }
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

fn find_error<T: std::error::Error + 'static>(error: &anyhow::Error) -> Option<&T> {
    error.chain().find_map(|source| source.downcast_ref::<T>())
}
