// Trench planning driver
//
// Purpose: run the full pipeline on a JSON scenario and print the report
// Usage: cargo run --bin plan_survey -- path/to/scenario.json
//        (or set SURVEY_SCENARIO)

use anyhow::Context;
use std::path::PathBuf;
use survey_planner::{PlanStatus, ScenarioData, TracingSink};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "survey_planner=info,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let scenario_path: PathBuf = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SURVEY_SCENARIO").ok())
        .map(PathBuf::from)
        .context("Usage: plan_survey <scenario.json> (or set SURVEY_SCENARIO)")?;

    tracing::info!("Scenario: {:?}", scenario_path);
    let scenario = ScenarioData::load(&scenario_path)?;

    let report = scenario.run(&mut TracingSink)?;

    match report.status {
        PlanStatus::Complete => {}
        PlanStatus::Partial => tracing::warn!(
            "Scan truncated at {} points; raise max_evaluated or the grid step for full coverage",
            report.stats.scanned
        ),
        PlanStatus::NoCandidates => tracing::warn!(
            "No candidates: {} outside, {} gaps, {} too steep, {} low containment, {} excluded",
            report.stats.outside_region,
            report.stats.sampling_gap,
            report.stats.too_steep,
            report.stats.low_containment,
            report.stats.excluded
        ),
        PlanStatus::NoConflictFreeCandidates => {
            tracing::warn!("No conflict-free candidates; reduce spacing or footprint size")
        }
    }

    for pick in &report.selection.picks {
        let c = &pick.candidate;
        tracing::info!(
            "#{:<3} ({:.1}, {:.1})  bearing {:>5.1}  score {:.3}  slope {:.1}",
            pick.rank,
            c.center.x(),
            c.center.y(),
            c.bearing_deg,
            c.composite_score,
            c.slope_deg
        );
    }

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
