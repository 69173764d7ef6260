use std::process::ExitCode;
use std::sync::Arc;

use ml_prep_pipeline::config::PipelineConfig;
use ml_prep_pipeline::observability::{
    CompositeObserver, FileObserver, PipelineObserver, TracingObserver,
};
use ml_prep_pipeline::pipeline::run_pipeline;

const LOG_DIR: &str = "logs";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Optional single argument: a JSON config file.
    let config = match std::env::args().nth(1) {
        Some(path) => match PipelineConfig::from_json_path(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("failed to load config {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => PipelineConfig::default(),
    };

    let mut observers: Vec<Arc<dyn PipelineObserver>> = vec![Arc::new(TracingObserver)];
    match FileObserver::in_dir(LOG_DIR) {
        Ok(file) => observers.push(Arc::new(file)),
        Err(e) => tracing::warn!("file logging disabled: {e}"),
    }
    let observer: Arc<dyn PipelineObserver> = Arc::new(CompositeObserver::new(observers));

    match run_pipeline(&config, Some(observer)) {
        Ok(out) => {
            tracing::info!(
                train = %out.train_data_path.display(),
                test = %out.test_data_path.display(),
                transformed_train = %out.artifacts.transformed_train_path.display(),
                transformed_test = %out.artifacts.transformed_test_path.display(),
                preprocessor = %out.artifacts.preprocessor_path.display(),
                "pipeline completed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
