use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::Cli;
use crate::config::ANALYSIS;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::engine::{EngineHandle, MarketAnalysisEngine, RefreshScheduler, spawn_engine_worker};
use crate::models::{AnalysisSnapshot, ZoneKind};
use crate::utils::TimeUtils;
use crate::utils::maths_utils::format_price;

/// A line typed into the console while the host is running
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    Select(String),
    Refresh,
    Quit,
    Blank,
}

impl HostInput {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => HostInput::Blank,
            "r" | "refresh" => HostInput::Refresh,
            "q" | "quit" | "exit" => HostInput::Quit,
            code => HostInput::Select(code.to_string()),
        }
    }
}

/// Start the engine and its scheduler, print every published snapshot and
/// take timeframe codes from stdin until told to stop.
pub async fn run_host(cli: Cli) -> Result<()> {
    let source = cli.indicator_source()?;
    log::info!("Indicator source: {}", source.name());

    let engine = MarketAnalysisEngine::start(source, cli.engine_settings())
        .await
        .context("Failed to start analysis engine")?;
    let (handle, worker) = spawn_engine_worker(engine, ANALYSIS.refresh.command_capacity);
    let scheduler = RefreshScheduler::new(handle.clone(), cli.refresh_period()).spawn();

    let mut snapshots = handle.subscribe();
    let first = snapshots.borrow_and_update().clone();
    emit(&first, cli.json)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut published = 0u64;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    log::warn!("Snapshot channel closed");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                emit(&snapshot, cli.json)?;
                published += 1;
                if cli.ticks.is_some_and(|limit| published >= limit) {
                    log::info!("Published {} snapshots, stopping", published);
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(text) => {
                        if !handle_input(&handle, HostInput::parse(&text)).await {
                            break;
                        }
                    }
                    None => {
                        log::info!("stdin closed; running on scheduled refreshes only");
                        stdin_open = false;
                    }
                }
            }
        }
    }

    scheduler.abort();
    if handle.shutdown().await.is_err() {
        log::warn!("Engine worker was already stopped");
    }
    worker.await.context("Engine worker panicked")?;
    Ok(())
}

/// Returns false when the host should stop.
async fn handle_input(handle: &EngineHandle, input: HostInput) -> bool {
    match input {
        HostInput::Select(code) => {
            // The new snapshot arrives through the watch channel
            if let Err(e) = handle.select(&code).await {
                log::warn!("{}", e);
            }
            true
        }
        HostInput::Refresh => {
            match handle.refresh().await {
                Ok(outcome) => log::info!("Manual refresh: {:?}", outcome),
                Err(e) => log::warn!("Manual refresh failed: {}", e),
            }
            true
        }
        HostInput::Quit => false,
        HostInput::Blank => true,
    }
}

fn emit(snapshot: &Arc<AnalysisSnapshot>, json: bool) -> Result<()> {
    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_snapshot_details {
        log::info!("[host] snapshot {:?}", snapshot);
    }

    if json {
        let line = serde_json::to_string(snapshot.as_ref()).context("Failed to encode snapshot")?;
        println!("{}", line);
    } else {
        println!("{}", render_snapshot(snapshot));
    }
    Ok(())
}

/// Plain-text dashboard for one snapshot.
pub fn render_snapshot(snapshot: &AnalysisSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "=== {} {} | rev {} | {} ===",
        snapshot.chart.symbol,
        snapshot.timeframe.display_label(),
        snapshot.revision,
        TimeUtils::utc_to_local_clock(snapshot.computed_at),
    );
    let _ = writeln!(
        out,
        "Chart interval {} | reference {}",
        snapshot.chart.interval,
        format_price(snapshot.reference_price)
    );

    match &snapshot.indicators {
        Some(readings) => {
            let parts: Vec<String> = readings.iter().map(|r| r.to_string()).collect();
            let _ = writeln!(
                out,
                "{} | polled {}s ago",
                parts.join(" | "),
                TimeUtils::seconds_since(readings.polled_at)
            );
        }
        None => {
            let _ = writeln!(out, "Indicators: N/A");
        }
    }

    for kind in [ZoneKind::Resistance, ZoneKind::Support] {
        for zone in snapshot.zones_of(kind) {
            let _ = writeln!(out, "  {}", zone);
        }
    }

    for setup in snapshot.setups.iter() {
        let _ = writeln!(out, "  {}", setup);
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{SetupGenerator, classify};
    use crate::domain::Timeframe;
    use crate::models::{ChartTarget, IndicatorReadings, RawIndicators};
    use chrono::Utc;

    fn snapshot(indicators: Option<IndicatorReadings>) -> AnalysisSnapshot {
        let tf = Timeframe::Minutes15;
        let zones = classify(tf, 1.0315);
        let setups = SetupGenerator::new(1.0315).generate(&zones, tf);
        AnalysisSnapshot {
            revision: 3,
            timeframe: tf,
            reference_price: 1.0315,
            indicators,
            zones,
            setups,
            chart: ChartTarget::new("FX:EURUSD", tf),
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn parses_console_input() {
        assert_eq!(HostInput::parse("  1h \n"), HostInput::Select("1h".into()));
        assert_eq!(HostInput::parse("r"), HostInput::Refresh);
        assert_eq!(HostInput::parse("quit"), HostInput::Quit);
        assert_eq!(HostInput::parse("   "), HostInput::Blank);
    }

    #[test]
    fn renders_zones_and_setups() {
        let raw = RawIndicators {
            rsi: 62.5,
            macd: -4.0,
            moving_average: 50.0,
        };
        let polled_at = Utc::now() - chrono::Duration::seconds(42);
        let text = render_snapshot(&snapshot(Some(IndicatorReadings::from_raw(raw, polled_at))));

        assert!(text.contains("FX:EURUSD 15m | rev 3"));
        assert!(text.contains("62.50 (Bullish)"));
        assert!(text.contains("-4.00 (Bearish)"));
        assert!(
            text.contains("polled 42s ago") || text.contains("polled 43s ago"),
            "{text}"
        );
        assert!(text.contains("Resistance 1.0325 (Medium) - 15m local high"));
        assert!(text.contains("Support 1.0295 (Strong) - 15m structure support"));
        assert!(text.contains("1:1.5"));
    }

    #[test]
    fn renders_missing_indicators() {
        let snapshot = snapshot(None);
        let text = render_snapshot(&snapshot);
        let header = text.lines().next().unwrap();
        assert!(header.contains(&TimeUtils::utc_to_local_clock(snapshot.computed_at)));
        assert!(text.contains("Indicators: N/A"));
        assert!(!text.contains("polled"));
    }
}
