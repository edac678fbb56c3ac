// bridge_simulation.rs
use bridge_crossing::bridge::BridgeController;
use bridge_crossing::config::{ReportFormat, SimulationConfig};
use bridge_crossing::monitoring::{write_crossing_log, SimulationSummary, StatusReporter};
use bridge_crossing::schedule::ScheduleSource;
use bridge_crossing::simulation::{GroupScheduler, SimClock, VehicleGenerator};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match SimulationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("Error. {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Everything is validated before the first vehicle exists.
    let args: Vec<String> = std::env::args().skip(1).collect();
    let schedule = match ScheduleSource::from_args(args).and_then(ScheduleSource::load) {
        Ok(schedule) => schedule,
        Err(e) => {
            println!("Error. {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("loaded {} batches", schedule.len());

    let controller = Arc::new(BridgeController::new(config.crossing_duration));
    let clock = SimClock::start();

    let reporter = StatusReporter::new(
        Arc::clone(&controller),
        clock,
        config.report_debounce,
        config.report_format,
    )
    .spawn();

    let scheduler = GroupScheduler::new(
        Arc::clone(&controller),
        VehicleGenerator::new(config.seed),
        clock,
    );
    let records = scheduler.run(&schedule).await;
    reporter.abort();

    let peak_weight = controller.snapshot().await.peak_weight;
    let summary = SimulationSummary::from_records(&records, peak_weight);
    match config.report_format {
        ReportFormat::Text => println!("{}", summary),
        ReportFormat::Json => match serde_json::to_string(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("failed to serialize summary: {}", e),
        },
    }

    if let Some(path) = &config.crossing_log {
        if let Err(e) = write_crossing_log(path, &records) {
            log::error!("failed to write crossing log {}: {}", path.display(), e);
        }
    }

    ExitCode::SUCCESS
}
