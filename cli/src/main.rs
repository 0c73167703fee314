//! CLI entrypoint for lumiere
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use lumiere_application::{
    CompositeDiagnosticSink, DiagnosticSink, RunScriptInput, RunScriptUseCase, ScriptSource,
};
use lumiere_domain::LogLevel;
use lumiere_infrastructure::{
    ConfigLoader, LineLogSink, LineLogger, RuntimeHandle, TracingDiagnosticSink,
    register_host_api,
};
use lumiere_presentation::{Cli, ConsoleDiagnosticSink, ConsoleFormatter};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    info!("Starting lumiere");

    // === Dependency Injection ===
    let console_level = if cli.verbose >= 2 {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let mut sinks: Vec<Arc<dyn DiagnosticSink>> = vec![
        Arc::new(ConsoleDiagnosticSink::new(console_level)),
        Arc::new(TracingDiagnosticSink),
    ];

    let log_sink = config.log.enabled.then(|| {
        Arc::new(LineLogSink::new(
            LineLogger::new(&config.log.path),
            config.log.level,
        ))
    });
    if let Some(log_sink) = &log_sink {
        sinks.push(log_sink.clone());
    }
    let sink: Arc<dyn DiagnosticSink> = Arc::new(CompositeDiagnosticSink::new(sinks));

    let mut handle = RuntimeHandle::new();
    handle.open(&config.to_runtime_options(), sink)?;
    let runtime = handle.get()?;
    register_host_api(runtime)?;

    // Script selection: --eval, then SCRIPT, then the configured main script
    let source = match cli.eval {
        Some(code) => ScriptSource::Inline(code),
        None => ScriptSource::File(cli.script.unwrap_or(config.script.main.clone())),
    };
    let entrypoint = cli.entrypoint.or(config.script.entrypoint.clone());

    let mut input = RunScriptInput::new(source);
    if let Some(name) = &entrypoint {
        input = input.with_entrypoint(name.clone());
    }

    let output = RunScriptUseCase::new().execute(runtime, input)?;
    if cli.verbose > 0 {
        eprintln!(
            "{}",
            ConsoleFormatter::format_summary(
                &output,
                &config.runtime.library_name,
                entrypoint.as_deref()
            )
        );
    }

    handle.close();
    if let Some(log_sink) = log_sink
        && let Err(e) = log_sink.close()
    {
        debug!("Log file not closed: {}", e);
    }

    Ok(())
}
