//! Checkout demo entry point.

use cli::config::Config;
use cli::scenarios::{Demo, default_scenarios};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    cli::init_tracing(&config);
    tracing::debug!(?config, "configuration loaded");

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    // 3. Run every scenario and print its outcome
    let demo = Demo::new(&config);
    for report in demo.run_all(&default_scenarios()) {
        tracing::info!(
            scenario = report.scenario,
            completed = report.outcome.is_completed(),
            "scenario finished"
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    // 4. Metrics snapshot
    println!("{}", metrics_handle.render());

    Ok(())
}
