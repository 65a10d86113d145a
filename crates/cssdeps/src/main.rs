use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

use cssdeps::config::MAX_RESOLVE_CONCURRENCY;
use cssdeps::{FsResolver, Pass, PassOutput, Settings, UrlStyle};

#[derive(Parser, Debug)]
#[command(name = "cssdeps", version, about)]
struct Args {
    /// Stylesheets, or directories searched for `*.css`.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Use this file instead of the nearest `cssdeps.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prefix for root-relative `url(/...)` references.
    #[arg(long)]
    root: Option<String>,

    #[arg(long, value_enum)]
    url_style: Option<UrlStyle>,

    /// Maximum resolutions in flight per stylesheet, 0 for no limit.
    #[arg(long)]
    concurrency: Option<usize>,

    #[arg(long)]
    no_import: bool,

    #[arg(long)]
    no_url: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report<'a> {
    file: &'a Path,
    #[serde(flatten)]
    output: PassOutput,
}

#[derive(Serialize)]
struct FailureReport<'a> {
    file: &'a Path,
    error: String,
}

fn load_settings(args: &Args) -> Result<Settings, cssdeps::ConfigError> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => {
            let start = args.inputs.first().cloned().unwrap_or_else(|| PathBuf::from("."));
            Settings::discover(&start)?
        },
    };
    if let Some(root) = &args.root {
        settings.resolve.root = Some(root.clone());
    }
    if let Some(style) = args.url_style {
        settings.output.url_style = style;
    }
    if let Some(concurrency) = args.concurrency {
        settings.resolve.concurrency = concurrency.min(MAX_RESOLVE_CONCURRENCY);
    }
    if args.no_import {
        settings.import.enabled = false;
    }
    if args.no_url {
        settings.url.enabled = false;
    }
    Ok(settings)
}

fn init_logging(
    args: &Args,
    directive: &str,
) {
    let directive = if args.verbose { "cssdeps=debug" } else { directive };

    let file_layer = args.log_file.as_ref().map(|log_path| {
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(Path::new(".")),
            log_path.file_name().unwrap_or(std::ffi::OsStr::new("cssdeps.log")),
        );
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new(directive))
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

/// Every stylesheet named by `inputs`, directories expanded in file-name order.
fn collect_stylesheets(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let entries = WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable entry: {err}");
                    None
                },
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext.eq_ignore_ascii_case("css")));
        files.extend(entries.map(|entry| entry.into_path()));
    }
    files
}

fn print_json<T: Serialize>(
    value: &T,
    pretty: bool,
) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => println!("{json}"),
        Err(err) => error!("Failed to serialize report: {err}"),
    }
}

async fn process(
    file: &Path,
    settings: &Settings,
    resolver: &Arc<FsResolver>,
) -> Result<PassOutput, String> {
    let source = tokio::fs::read_to_string(file)
        .await
        .map_err(|err| format!("failed to read {}: {err}", file.display()))?;
    let context = file.parent().unwrap_or(Path::new(".")).to_path_buf();
    let options = settings.to_pass_options(&context).map_err(|err| err.to_string())?;
    let output = Pass::new(Arc::clone(resolver), options)
        .run(&source)
        .await
        .map_err(|err| err.to_string())?;
    for warning in &output.warnings {
        warn!("{}:{warning}", file.display());
    }
    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = load_settings(&args);
    let directive = match &settings {
        Ok(settings) => settings.logging.filter_directive(),
        Err(_) => "cssdeps=info".to_string(),
    };
    init_logging(&args, &directive);

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        },
    };
    debug!("Settings: {settings:?}");

    let files = collect_stylesheets(&args.inputs);
    info!("Processing {} stylesheet(s)", files.len());

    let resolver = Arc::new(FsResolver::new(settings.resolve.fs_options()));
    let mut failed = 0usize;
    for file in &files {
        match process(file, &settings, &resolver).await {
            Ok(output) => print_json(
                &Report {
                    file,
                    output,
                },
                settings.output.pretty,
            ),
            Err(message) => {
                error!("{}: {message}", file.display());
                failed += 1;
                print_json(
                    &FailureReport {
                        file,
                        error: message,
                    },
                    settings.output.pretty,
                );
            },
        }
    }

    if failed > 0 {
        warn!("{failed} of {} stylesheet(s) failed", files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
