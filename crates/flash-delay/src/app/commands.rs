use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

pub use crate::adapters::OutputFormat;

const AFTER_HELP: &str =
    "Use --help for full details and examples. Use --format json for machine-readable output.";

const LONG_ABOUT: &str = "\
Run and talk to the shared delay service behind the flash controller dashboard.\n\
\n\
One process serves the value over HTTP; any number of dashboards, devices and\n\
CLI clients read it by polling and change it with last-writer-wins updates.";

const AFTER_LONG_HELP: &str = r#"ENVIRONMENT:
    FLASH_DELAY_LISTEN          Listen address for `serve` (default 127.0.0.1:3000)
    PORT                        Port to bind on 0.0.0.0 when FLASH_DELAY_LISTEN is unset
    FLASH_DELAY_INITIAL         Initial delay for `serve` (default 500, clamped)
    FLASH_DELAY_MAX_BODY        Maximum request body in bytes (default 16384)
    FLASH_DELAY_URL             Service base URL for client commands
    FLASH_DELAY_POLL_MS         Poll interval for `watch` and `follow` (default 1000)
    FLASH_DELAY_HTTP_TIMEOUT_MS Per-request timeout (default 5000)
    FLASH_DELAY_LOG             Write logs to this file
    FLASH_DELAY_LOG_FORMAT      text or json
    RUST_LOG                    Log filter

EXAMPLES:
    flash-delay serve --listen 0.0.0.0:3000
    flash-delay get
    flash-delay set 750
    flash-delay set "75.9"             # coerced and rounded to 76
    flash-delay step up
    flash-delay watch                  # + / - / 900 / ~900 / q on stdin
    flash-delay follow --interval 1000"#;

#[derive(Parser)]
#[command(name = "flash-delay")]
#[command(author, version, propagate_version = true)]
#[command(about = "Shared delay service and polling client for the ESP32 flash controller")]
#[command(long_about = LONG_ABOUT)]
#[command(after_help = AFTER_HELP)]
#[command(after_long_help = AFTER_LONG_HELP)]
#[command(subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the delay service (client commands)
    #[arg(
        short,
        long,
        global = true,
        value_name = "URL",
        help_heading = "Client Options"
    )]
    pub url: Option<String>,

    /// Output format (text or json)
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        value_name = "FORMAT",
        default_value_t = OutputFormat::Text,
        help_heading = "Output Options"
    )]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true, help_heading = "Output Options")]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, help_heading = "Debug Options")]
    pub verbose: bool,
}

impl Cli {
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }

    pub fn default_log_level(&self) -> &'static str {
        match (&self.command, self.verbose) {
            (_, true) => "debug",
            (Commands::Serve { .. } | Commands::Follow { .. }, false) => "info",
            _ => "warn",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the delay service
    #[command(long_about = "\
Run the delay service until interrupted.

Serves GET/POST/OPTIONS on /api/delay and the dashboard on /. The value is
kept in memory only; it resets to the initial value on every start.")]
    Serve {
        /// Address to listen on (overrides FLASH_DELAY_LISTEN and PORT)
        #[arg(short, long, value_name = "ADDR")]
        listen: Option<String>,

        /// Initial delay in milliseconds, clamped into range
        #[arg(long, value_name = "MS", allow_hyphen_values = true)]
        initial: Option<i64>,
    },

    /// Print the current delay
    Get,

    /// Set the delay
    #[command(long_about = "\
Set the delay.

VALUE is sent as given and coerced by the service: numeric strings are
accepted, out-of-range values are clamped and fractions are rounded.")]
    Set {
        /// New delay in milliseconds
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },

    /// Move the delay one step (50 ms) up or down
    Step {
        #[arg(value_enum)]
        direction: StepDirection,
    },

    /// Keep a live view of the delay and change it from stdin
    #[command(long_about = "\
Keep a live view of the delay, refreshed by polling.

Commands on stdin:
    +  or up       one step up
    -  or down     one step down
    N              set to N
    ~N             preview N locally without sending (slider drag)
    q  or quit     exit")]
    Watch {
        /// Poll interval in milliseconds
        #[arg(short, long, value_name = "MS")]
        interval: Option<u64>,
    },

    /// Follow the delay the way the flash controller does
    Follow {
        /// Poll interval in milliseconds
        #[arg(short, long, value_name = "MS")]
        interval: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StepDirection {
    Up,
    Down,
}
