use anyhow::{Context, Result};
use authorcheck_classifiers::{ModelLoader, SharedClassifier};
use authorcheck_web::cli::{exit_status, read_input, Cli, Commands, LogFormat};
use authorcheck_web::{handle, present, run_server, AppConfig, AppState, OutcomeView, Trigger};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            model,
            address,
            port,
            lazy,
            verbose,
            log_format,
        } => {
            init_logging(verbose, log_format);

            let mut config = AppConfig::load(&model)?;
            if let Some(address) = address {
                config.server.address = address;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if lazy {
                config.preload = false;
            }

            let addr = config.socket_addr()?;
            let metrics = init_metrics()?;
            let state = AppState::new(config, model_loader()?).with_metrics(metrics);

            println!();
            println!("  💖 AI vs Human Writer ✍️");
            println!();
            println!("  Model:   {}", state.config.model.model_id());
            println!("  Device:  {}", state.config.model.inference.device);
            println!();
            println!("  Open http://{} in your browser", addr);
            println!();

            if state.config.preload {
                info!(model = %state.config.model.model_id(), "Preloading model");
                state
                    .preload()
                    .await
                    .context("Failed to load the detection model")?;
            }

            run_server(state, addr).await?;
        }

        Commands::Classify {
            model,
            text,
            file,
            json,
            verbose,
        } => {
            init_logging(verbose, LogFormat::Text);

            let config = AppConfig::load(&model)?;
            let input = read_input(text, file, std::io::stdin().lock())?;
            let classifier = SharedClassifier::new(config.model, model_loader()?);

            let outcome = handle(&classifier, &input, Trigger::Submit).await?;
            let view = present(&outcome);

            match &view {
                OutcomeView::ValidationError { message } => {
                    eprintln!("{}", message);
                    std::process::exit(exit_status(&view));
                }
                _ if json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutcomeView::Classified(analysis) => {
                    println!("{}", analysis.heading);
                    println!("{}", analysis.verdict);
                    println!("{}", analysis.progress_text);
                    println!();
                    println!("Top guess:        {}", analysis.details.top_guess);
                    println!("Confidence score: {}", analysis.details.confidence_score);
                    for score in &analysis.details.results {
                        println!("  {:<16} {:.4}", score.label, score.score);
                    }
                }
                OutcomeView::Idle | OutcomeView::Cleared { .. } => {}
            }
        }
    }

    Ok(())
}

#[cfg(feature = "ml-models")]
fn model_loader() -> Result<Arc<dyn ModelLoader>> {
    Ok(Arc::new(authorcheck_classifiers::CandleModelLoader::new()))
}

#[cfg(not(feature = "ml-models"))]
fn model_loader() -> Result<Arc<dyn ModelLoader>> {
    anyhow::bail!("authorcheck was built without the ml-models feature")
}

fn init_logging(verbose: bool, format: LogFormat) {
    let filter = if verbose {
        EnvFilter::new("authorcheck=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("authorcheck=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Install the Prometheus recorder and return the handle `/metrics` renders
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "authorcheck_requests_total",
        "Interactions handled, by outcome"
    );
    metrics::describe_histogram!(
        "authorcheck_inference_latency_us",
        metrics::Unit::Microseconds,
        "Model inference latency in microseconds"
    );
    metrics::describe_counter!(
        "authorcheck_model_loads_total",
        "Number of times the model was loaded"
    );
    metrics::describe_counter!("authorcheck_errors_total", "Failed analyses by error kind");

    info!("Metrics exporter initialized");
    Ok(handle)
}
