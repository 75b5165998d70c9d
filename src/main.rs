use billionaire_insights::app::render::render_text;
use billionaire_insights::utils::{logger, validation::Validate};
use billionaire_insights::{
    CliConfig, DashboardEngine, DashboardPipeline, InsightsError, LocalStorage, RunConfig,
};
use clap::Parser;

const UPLOAD_PROMPT: &str = "Please provide a CSV file (--input) to begin analysis.";

fn report_failure(stage: &str, e: &InsightsError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let Some(input) = cli.input.clone() else {
        println!("{}", UPLOAD_PROMPT);
        return;
    };

    tracing::info!("Starting billionaire-insights on {}", input);

    let config = match RunConfig::from_cli(&cli, &input) {
        Ok(config) => config,
        Err(e) => report_failure("Loading configuration", &e),
    };
    if cli.verbose {
        tracing::debug!("Run config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        report_failure("Configuration validation", &e);
    }

    let storage = LocalStorage::new(config.output.output_path.clone());
    let pipeline = DashboardPipeline::new(storage, config);
    let engine = DashboardEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            println!("{}", render_text(&outcome.report));
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => report_failure("Analysis", &e),
    }
}
