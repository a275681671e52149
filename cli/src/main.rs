use clap::Parser;
mod commands;
mod error;
use bytering_core::config::{AppConfig, LoggingConfig};
use bytering_core::relay;
use commands::cli;
use error::CliError;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = load_config(&args)?;
    init_tracing(&cfg.logging).map_err(CliError::Logging)?;

    let rd: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };
    let wr: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(tokio::fs::File::create(path).await?),
        None => Box::new(tokio::io::stdout()),
    };

    tracing::debug!(
        target: "bytering.cli",
        capacity = cfg.buffer.capacity,
        flush_on_drain = cfg.relay.flush_on_drain,
        "starting relay"
    );

    let stats = relay::pump(rd, wr, cfg.buffer.capacity, cfg.relay.clone())
        .await
        .map_err(|e| CliError::Relay(bytering_core::RelayError::Join(e.to_string())))??;

    tracing::info!(
        "relayed {} bytes ({} fills, {} drains)",
        stats.bytes_out,
        stats.fills,
        stats.drains
    );
    Ok(0)
}

fn load_config(args: &cli::Args) -> Result<AppConfig, CliError> {
    let mut cfg = match &args.config {
        Some(path) => bytering_core::config::load_from_path(path),
        None => bytering_core::config::load_default(),
    }
    .map_err(|e| CliError::Config(format!("{e:#}")))?;

    if let Some(capacity) = args.capacity {
        if capacity == 0 {
            return Err(CliError::Config(
                "--capacity must be greater than zero".to_string(),
            ));
        }
        cfg.buffer.capacity = capacity;
    }
    if args.no_flush {
        cfg.relay.flush_on_drain = false;
    }
    Ok(cfg)
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }
    if !logging.console && !logging.file {
        return Err("logging disabled for both console and file".to_string());
    }

    // stdout may carry relayed bytes, so console output always goes to stderr
    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = if logging.file {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file_writer(logging.directory.as_deref())?)
                .with_ansi(false),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(log_filter(&logging.level)?)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn log_filter(level: &str) -> Result<EnvFilter, String> {
    match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => Ok(EnvFilter::from_default_env()),
        _ => EnvFilter::try_new(level).map_err(|e| format!("invalid log level {level:?}: {e}")),
    }
}

/// One log file per process under `directory`, or the OS temp dir.
fn log_file_writer(
    directory: Option<&str>,
) -> Result<tracing_appender::non_blocking::NonBlocking, String> {
    let dir = directory
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("bytering"));
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("create log dir {} failed: {e}", dir.display()))?;

    let appender =
        tracing_appender::rolling::never(dir, format!("bytering.{}.log", std::process::id()));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(writer)
}
