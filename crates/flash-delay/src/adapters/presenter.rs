#![expect(clippy::print_stdout, reason = "CLI output is emitted here")]
#![expect(clippy::print_stderr, reason = "CLI output is emitted here")]

//! CLI output presenter.

use clap::ValueEnum;
use serde_json::json;

use crate::domain::DelaySnapshot;
use crate::usecases::DelayChange;
use crate::usecases::ports::ApiError;

const PROGRAM_NAME: &str = "flash-delay";

/// Output format for CLI commands
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait Presenter {
    fn present_snapshot(&self, snapshot: &DelaySnapshot);

    fn present_display(&self, value: u32, dragging: bool);

    fn present_change(&self, change: &DelayChange);

    fn present_api_error(&self, error: &ApiError);

    fn present_info(&self, message: &str);
}

pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn present_snapshot(&self, snapshot: &DelaySnapshot) {
        println!("{} ms (range {})", snapshot.value, snapshot.bounds);
    }

    fn present_display(&self, value: u32, dragging: bool) {
        if dragging {
            println!("delay: {value} ms (dragging)");
        } else {
            println!("delay: {value} ms");
        }
    }

    fn present_change(&self, change: &DelayChange) {
        println!("delay: {} -> {} ms", change.previous, change.current);
    }

    fn present_api_error(&self, error: &ApiError) {
        eprintln!("{PROGRAM_NAME}: Error: {error}");
        if error.is_retryable() {
            eprintln!("(This error may be transient - retry may succeed)");
        }
    }

    fn present_info(&self, message: &str) {
        println!("{message}");
    }
}

pub struct JsonPresenter;

impl JsonPresenter {
    fn emit(value: &serde_json::Value) {
        println!("{}", serde_json::to_string(value).unwrap_or_default());
    }
}

impl Presenter for JsonPresenter {
    fn present_snapshot(&self, snapshot: &DelaySnapshot) {
        Self::emit(&json!({
            "delay": snapshot.value.get(),
            "min": snapshot.bounds.min(),
            "max": snapshot.bounds.max(),
            "timestamp": snapshot.timestamp_ms,
        }));
    }

    fn present_display(&self, value: u32, dragging: bool) {
        Self::emit(&json!({ "delay": value, "dragging": dragging }));
    }

    fn present_change(&self, change: &DelayChange) {
        Self::emit(&json!({
            "previous": change.previous.get(),
            "delay": change.current.get(),
        }));
    }

    fn present_api_error(&self, error: &ApiError) {
        let mut output = json!({
            "success": false,
            "error": error.to_string(),
            "retryable": error.is_retryable(),
        });
        if let ApiError::Status { status, .. } = error {
            output["status"] = json!(status);
        }
        eprintln!("{}", serde_json::to_string(&output).unwrap_or_default());
    }

    fn present_info(&self, message: &str) {
        Self::emit(&json!({ "info": message }));
    }
}

pub fn create_presenter(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Json => Box::new(JsonPresenter),
        OutputFormat::Text => Box::new(TextPresenter),
    }
}
