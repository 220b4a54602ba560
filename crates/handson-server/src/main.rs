//! HandsOn — textbook activity extraction pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use handson_core::HandsOnConfig;
use handson_llm::LLMConfig;
use handson_pipeline::PipelineReport;
use handson_server::cli::{print_help, Command};
use handson_server::tools::{run_filter_tool, run_tool};
use handson_server::{build_pipeline, build_router, AppState};

fn resolve_data_dir() -> PathBuf {
    std::env::var("HANDSON_DATA_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Print the status line and exit 0 on success, 1 otherwise.
fn finish(report: PipelineReport) -> ! {
    println!("{}", report);
    std::process::exit(if report.is_success() { 0 } else { 1 });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(usage) => {
            eprintln!("{}", usage);
            std::process::exit(1);
        }
    };

    if command == Command::Help {
        print_help();
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = HandsOnConfig::from_env(&data_dir)?;
    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);

    if !command.needs_llm() {
        match command {
            Command::Filter(request) => finish(handson_pipeline::spawn_filter(request).await),
            Command::Tool { input, .. } => finish(run_filter_tool(&input).await),
            _ => return Ok(()),
        }
    }

    // Missing LLM credentials stop here with a configuration error.
    let pipeline = build_pipeline(&config, &llm_config)?;

    match command {
        Command::Serve => {
            info!("Data directory: {}", data_dir.display());
            let port = config.port;
            let state = Arc::new(AppState::new(config, llm_config.to_status(), pipeline));
            let app = build_router(state);

            let addr = format!("0.0.0.0:{}", port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("HandsOn server listening on {}", addr);

            axum::serve(listener, app).await?;
            Ok(())
        }
        Command::Extract(pdf) => finish(pipeline.extract(&pdf).await),
        Command::Match(request) => finish(pipeline.match_activities(&request).await),
        Command::Generate(path) => finish(pipeline.generate(&path).await),
        Command::Tool { tool, input } => finish(run_tool(&pipeline, tool, &input).await),
        Command::Filter(request) => finish(pipeline.filter(&request).await),
        Command::Help => Ok(()),
    }
}
