use anyhow::Result;
use clap::{Parser, Subcommand};
use smiled::{config::ServerConfig, rest, AppContext};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "smiled",
    about = "Smile Again — wellness tracking server",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port
    #[arg(long, env = "SMILED_PORT")]
    port: Option<u16>,

    /// Data directory for config and the SQLite database
    #[arg(long, env = "SMILED_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SMILED_LOG")]
    log: Option<String>,

    /// Bind address for the HTTP server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "SMILED_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "SMILED_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,

    /// Suppress informational output. Errors still go to stderr and the
    /// exit code is unaffected. Use when scripting.
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Start the server (default when no subcommand given).
    ///
    /// Examples:
    ///   smiled serve
    ///   smiled
    Serve,
    /// Show server status (running, version, uptime).
    ///
    /// Connects to the running server and prints a summary line.
    /// Exits 0 if healthy, 1 if stopped or unresponsive.
    ///
    /// Examples:
    ///   smiled status
    ///   smiled status --json
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Arc::new(ServerConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.bind_address,
    ));

    // Init once — must happen before any tracing calls.
    let _file_guard = setup_logging(&config.log, args.log_file.as_deref(), &config.log_format);

    match args.command {
        Some(Command::Status { json }) => {
            let exit_code = run_status(&config, json, args.quiet).await;
            std::process::exit(exit_code);
        }
        None | Some(Command::Serve) => run_server(config).await?,
    }

    Ok(())
}

async fn run_server(config: Arc<ServerConfig>) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        "starting smiled"
    );

    let ctx = Arc::new(AppContext::init(config).await?);
    rest::start_rest_server(ctx).await
}

/// Returns exit code: 0 = healthy, 1 = stopped/unresponsive.
async fn run_status(config: &ServerConfig, json: bool, quiet: bool) -> i32 {
    let url = format!(
        "http://{}:{}/api/v1/health",
        config.bind_address, config.port
    );
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(3))
        .build();
    let Ok(client) = client else {
        eprintln!("smiled: failed to build HTTP client");
        return 1;
    };

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            if json {
                println!("{}", serde_json::to_string(&body).unwrap_or_default());
            } else if !quiet {
                let version = body["version"].as_str().unwrap_or("?");
                let uptime = format_uptime(body["uptime_secs"].as_u64().unwrap_or(0));
                println!("smiled {version} — Running (uptime {uptime})");
            }
            0
        }
        _ => {
            if json {
                println!(r#"{{"status":"not_running"}}"#);
            } else if !quiet {
                println!("smiled: not running");
            }
            1
        }
    }
}

/// Format uptime seconds as "2h 14m" or "45m 3s".
fn format_uptime(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}h {m}m")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file;
/// the returned `WorkerGuard` must stay alive for the process lifetime.
///
/// `log_format` is `"pretty"` (compact human output) or `"json"`.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    let Some((non_blocking, guard)) = log_file.and_then(open_log_writer) else {
        // Stdout only: no file requested, or its directory could not be made.
        let stdout = fmt().with_env_filter(log_level);
        if use_json {
            stdout.json().init();
        } else {
            stdout.compact().init();
        }
        return None;
    };

    let registry = tracing_subscriber::registry().with(EnvFilter::new(log_level));
    if use_json {
        registry
            .with(fmt::layer().json())
            .with(fmt::layer().json().with_writer(non_blocking))
            .init();
    } else {
        registry
            .with(fmt::layer().compact())
            .with(fmt::layer().with_writer(non_blocking))
            .init();
    }
    Some(guard)
}

/// Open a non-blocking daily-rolling writer for `path`. Returns `None` (with
/// a stderr warning) when the parent directory cannot be created.
fn open_log_writer(
    path: &std::path::Path,
) -> Option<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let filename = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("smiled.log"));

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e} — logging to stdout only",
            dir.display()
        );
        return None;
    }

    Some(tracing_appender::non_blocking(
        tracing_appender::rolling::daily(dir, filename),
    ))
}
