//! Command handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use serde_json::json;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing::warn;

use crate::adapters::Presenter;
use crate::app::commands::Cli;
use crate::app::commands::Commands;
use crate::app::commands::StepDirection;
use crate::app::error::exit_code_for_api_error;
use crate::app::error::exit_codes;
use crate::app::http_api::start_api_server;
use crate::domain::DelayBounds;
use crate::domain::DelaySnapshot;
use crate::infra::ClientConfig;
use crate::infra::HttpDelayApi;
use crate::infra::ServerConfig;
use crate::infra::SystemClock;
use crate::usecases::ControlEvent;
use crate::usecases::DeviceFollower;
use crate::usecases::SyncClient;
use crate::usecases::SyncOutcome;
use crate::usecases::ports::ApiError;
use crate::usecases::ports::DelayApi;
use crate::usecases::run_sync_loop;

const CONTROL_QUEUE_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlInput {
    Event(ControlEvent),
    Quit,
}

pub(crate) async fn dispatch(cli: &Cli, presenter: &dyn Presenter) -> Result<i32> {
    match &cli.command {
        Commands::Serve { listen, initial } => {
            handle_serve(listen.as_deref(), *initial, presenter).await
        }
        Commands::Get => {
            let api = client_api(cli, None)?;
            Ok(report(api.fetch().await, presenter))
        }
        Commands::Set { value } => {
            let api = client_api(cli, None)?;
            Ok(report(
                api.submit_json(json!({ "delay": value })).await,
                presenter,
            ))
        }
        Commands::Step { direction } => handle_step(cli, *direction, presenter).await,
        Commands::Watch { interval } => handle_watch(cli, *interval, presenter).await,
        Commands::Follow { interval } => handle_follow(cli, *interval, presenter).await,
    }
}

fn client_config(cli: &Cli, interval_ms: Option<u64>) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.url.as_deref() {
        config = config.with_base_url(url);
    }
    if let Some(ms) = interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    config
}

fn client_api(cli: &Cli, interval_ms: Option<u64>) -> Result<HttpDelayApi> {
    let config = client_config(cli, interval_ms);
    HttpDelayApi::new(&config, Arc::new(SystemClock::new()))
        .context("Failed to create delay service client")
}

fn report(result: Result<DelaySnapshot, ApiError>, presenter: &dyn Presenter) -> i32 {
    match result {
        Ok(snapshot) => {
            presenter.present_snapshot(&snapshot);
            exit_codes::SUCCESS
        }
        Err(err) => {
            presenter.present_api_error(&err);
            exit_code_for_api_error(&err)
        }
    }
}

async fn handle_serve(
    listen: Option<&str>,
    initial: Option<i64>,
    presenter: &dyn Presenter,
) -> Result<i32> {
    let mut config = ServerConfig::from_env();
    if let Some(listen) = listen {
        config = config.with_listen(listen);
    }
    if let Some(initial) = initial {
        config = config.with_initial(DelayBounds::STANDARD.clamp_int(initial));
    }

    let handle = start_api_server(&config)
        .await
        .context("Failed to start delay service")?;
    presenter.present_info(&format!("Serving delay API on {}", handle.base_url()));
    handle
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "Failed to listen for Ctrl-C; shutting down");
            }
        })
        .await
        .context("Delay service stopped with an error")?;
    info!("Delay service stopped");
    Ok(exit_codes::SUCCESS)
}

async fn handle_step(
    cli: &Cli,
    direction: StepDirection,
    presenter: &dyn Presenter,
) -> Result<i32> {
    let api = Arc::new(client_api(cli, None)?);
    let mut client = SyncClient::new(api);

    if let SyncOutcome::Failed(err) = client.poll().await {
        presenter.present_api_error(&err);
        return Ok(exit_code_for_api_error(&err));
    }
    let outcome = match direction {
        StepDirection::Up => client.increment().await,
        StepDirection::Down => client.decrement().await,
    };
    match outcome {
        SyncOutcome::Synced(snapshot) => {
            presenter.present_snapshot(&snapshot);
            Ok(exit_codes::SUCCESS)
        }
        SyncOutcome::Failed(err) => {
            presenter.present_api_error(&err);
            Ok(exit_code_for_api_error(&err))
        }
        SyncOutcome::HeldByDrag(_) => unreachable!("a step always ends any drag"),
    }
}

async fn handle_watch(
    cli: &Cli,
    interval_ms: Option<u64>,
    presenter: &dyn Presenter,
) -> Result<i32> {
    let config = client_config(cli, interval_ms);
    let api = Arc::new(
        HttpDelayApi::new(&config, Arc::new(SystemClock::new()))
            .context("Failed to create delay service client")?,
    );
    info!(endpoint = %api.endpoint(), "Watching delay");

    let (control_tx, control_rx) = mpsc::channel(CONTROL_QUEUE_CAPACITY);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Quitting closes the control channel, so queued commands still run.
    let stdin_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_control_line(&line) {
                    Some(ControlInput::Quit) => return,
                    Some(ControlInput::Event(event)) => {
                        if control_tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!(input = %line.trim(), "Unrecognised watch command"),
                },
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "Failed to read stdin");
                    break;
                }
            }
        }
        // Stdin closed: keep polling until interrupted.
        let _keep_open = control_tx;
        std::future::pending::<()>().await;
    });

    let signal_task = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                warn!(error = %err, "Failed to listen for Ctrl-C");
                let _keep_open = shutdown_tx;
                std::future::pending::<()>().await;
            }
        }
    });

    run_sync_loop(
        SyncClient::new(api),
        config.poll_interval(),
        control_rx,
        shutdown_rx,
        |display| presenter.present_display(display.value.get(), display.dragging),
    )
    .await;

    stdin_task.abort();
    signal_task.abort();
    Ok(exit_codes::SUCCESS)
}

async fn handle_follow(
    cli: &Cli,
    interval_ms: Option<u64>,
    presenter: &dyn Presenter,
) -> Result<i32> {
    let config = client_config(cli, interval_ms);
    let api = Arc::new(
        HttpDelayApi::new(&config, Arc::new(SystemClock::new()))
            .context("Failed to create delay service client")?,
    );
    info!(
        endpoint = %api.endpoint(),
        interval_ms = config.poll_interval().as_millis(),
        "Following delay"
    );

    let mut follower = DeviceFollower::new(api);
    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(change) = follower.tick().await {
                    presenter.present_change(&change);
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
    Ok(exit_codes::SUCCESS)
}

/// Parses one line of `watch` input.
pub(crate) fn parse_control_line(line: &str) -> Option<ControlInput> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => return None,
        "+" | "up" => return Some(ControlInput::Event(ControlEvent::Increment)),
        "-" | "down" => return Some(ControlInput::Event(ControlEvent::Decrement)),
        "q" | "quit" | "exit" => return Some(ControlInput::Quit),
        _ => {}
    }
    if let Some(rest) = line.strip_prefix('~') {
        return parse_position(rest).map(|n| ControlInput::Event(ControlEvent::Drag(n)));
    }
    parse_position(line).map(|n| ControlInput::Event(ControlEvent::Commit(n)))
}

fn parse_position(text: &str) -> Option<i64> {
    let value = text.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.round() as i64)
}
