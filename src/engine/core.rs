use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::analysis::{SetupGenerator, classify, targets_clear_entry};
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::{FeedError, IndicatorSource, poll_with_timeout};
use crate::domain::Timeframe;
use crate::models::{AnalysisSnapshot, ChartTarget, IndicatorReadings, RawIndicators};

use super::error::EngineError;
use super::messages::RefreshOutcome;
use super::settings::EngineSettings;
use super::state::AnalysisState;

pub struct MarketAnalysisEngine {
    /// Where indicator readings come from
    source: Arc<dyn IndicatorSource>,
    settings: EngineSettings,
    generator: SetupGenerator,

    timeframe: Timeframe,
    /// Last good readings. Survive failed polls.
    indicators: Option<IndicatorReadings>,

    state: AnalysisState,
    publisher: watch::Sender<Arc<AnalysisSnapshot>>,
}

/// A poll detached from the engine, so the caller can race or drop it.
pub struct PendingPoll {
    source: Arc<dyn IndicatorSource>,
    timeout: Duration,
    generation: u64,
}

pub struct CompletedPoll {
    generation: u64,
    result: Result<RawIndicators, FeedError>,
}

impl PendingPoll {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn run(self) -> CompletedPoll {
        let result = poll_with_timeout(self.source.as_ref(), self.timeout).await;
        CompletedPoll {
            generation: self.generation,
            result,
        }
    }
}

impl MarketAnalysisEngine {
    /// Validate settings, select the default timeframe and run one full
    /// computation (zones, setups, indicators) before returning.
    pub async fn start(
        source: Arc<dyn IndicatorSource>,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        settings.validate()?;

        let timeframe = settings.default_timeframe;
        let generator = SetupGenerator::new(settings.reference_price);

        // Revision 0 is never observable: the refresh below replaces it
        let placeholder = Arc::new(build_snapshot(0, timeframe, None, &settings, &generator));
        let (publisher, _) = watch::channel(placeholder.clone());

        let mut engine = Self {
            source,
            settings,
            generator,
            timeframe,
            indicators: None,
            state: AnalysisState::new(placeholder),
            publisher,
        };

        let outcome = engine.refresh().await;
        log::info!(
            "Engine started on {} with '{}' source ({:?})",
            engine.timeframe,
            engine.source.name(),
            outcome
        );
        Ok(engine)
    }

    // --- OPERATIONS ---

    /// Switch to the timeframe named by `code` and recompute zones and setups.
    /// Indicator readings are left as they are. On error nothing changes.
    pub fn select(&mut self, code: &str) -> Result<Arc<AnalysisSnapshot>, EngineError> {
        let timeframe = code.parse::<Timeframe>().map_err(|e| {
            log::warn!("Rejected timeframe selection: {e}");
            EngineError::from(e)
        })?;
        Ok(self.select_timeframe(timeframe))
    }

    pub fn select_timeframe(&mut self, timeframe: Timeframe) -> Arc<AnalysisSnapshot> {
        if timeframe != self.timeframe {
            log::info!("Timeframe {} -> {}", self.timeframe, timeframe);
        }
        self.timeframe = timeframe;
        self.state.selection_generation += 1;
        self.recompute();
        self.current_snapshot()
    }

    /// Poll the indicator source and recompute for the active timeframe.
    pub async fn refresh(&mut self) -> RefreshOutcome {
        let completed = self.begin_refresh().run().await;
        self.finish_refresh(completed)
    }

    /// First half of `refresh`: capture what is needed to poll.
    pub fn begin_refresh(&self) -> PendingPoll {
        PendingPoll {
            source: self.source.clone(),
            timeout: self.settings.poll_timeout,
            generation: self.state.selection_generation,
        }
    }

    /// Second half of `refresh`: apply a finished poll, unless a timeframe
    /// change happened while it was in flight.
    pub fn finish_refresh(&mut self, completed: CompletedPoll) -> RefreshOutcome {
        if completed.generation != self.state.selection_generation {
            log::info!("Discarding indicator poll that started before a timeframe change");
            return RefreshOutcome::Cancelled;
        }

        let outcome = match completed.result {
            Ok(raw) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_indicator_polls {
                    log::info!("[poll] {} -> {:?}", self.source.name(), raw);
                }
                self.indicators = Some(IndicatorReadings::from_raw(raw, Utc::now()));
                self.state.record_poll_success();
                RefreshOutcome::Applied {
                    revision: self.recompute(),
                }
            }
            Err(error) => {
                log::warn!(
                    "Indicator poll from '{}' failed: {} (keeping last good readings, {} in a row)",
                    self.source.name(),
                    error,
                    self.state.consecutive_failures + 1
                );
                self.state.record_poll_failure();
                RefreshOutcome::Retained {
                    revision: self.recompute(),
                    error,
                }
            }
        };

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_refresh_events {
            log::info!("[refresh] {} {:?}", self.timeframe, outcome);
        }

        outcome
    }

    // --- ACCESSORS ---

    pub fn current_snapshot(&self) -> Arc<AnalysisSnapshot> {
        self.state.snapshot.clone()
    }

    /// Live view of published snapshots, for observers on other tasks.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AnalysisSnapshot>> {
        self.publisher.subscribe()
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    // --- INTERNAL LOGIC ---

    /// Build a whole snapshot for the active timeframe and swap it in.
    fn recompute(&mut self) -> u64 {
        let snapshot = Arc::new(build_snapshot(
            self.state.next_revision(),
            self.timeframe,
            self.indicators.clone(),
            &self.settings,
            &self.generator,
        ));
        let revision = snapshot.revision;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_snapshot_details {
            log::info!("[snapshot] r{} {}", revision, snapshot.timeframe);
            for zone in &snapshot.zones {
                log::info!("[snapshot]   {}", zone);
            }
            for setup in snapshot.setups.iter() {
                log::info!("[snapshot]   {}", setup);
            }
        }

        self.state.update_buffer(snapshot.clone());
        self.publisher.send_replace(snapshot);
        revision
    }
}

fn build_snapshot(
    revision: u64,
    timeframe: Timeframe,
    indicators: Option<IndicatorReadings>,
    settings: &EngineSettings,
    generator: &SetupGenerator,
) -> AnalysisSnapshot {
    let zones = classify(timeframe, settings.reference_price);
    let setups = generator.generate(&zones, timeframe);

    // The classifier always backs both setups, so these can only fail on a bug
    assert!(
        setups.iter().all(|s| s.entry_zone.is_available()),
        "setup without a backing zone for {timeframe}"
    );
    assert!(
        setups.iter().all(targets_clear_entry),
        "take-profit on the wrong side of entry for {timeframe}"
    );

    AnalysisSnapshot {
        revision,
        timeframe,
        reference_price: settings.reference_price,
        indicators,
        zones,
        setups,
        chart: ChartTarget::new(&settings.chart_symbol, timeframe),
        computed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RandomIndicatorSource, ReplayIndicatorSource, ReplayStep};
    use crate::models::{Sentiment, ZoneKind};

    fn raw(rsi: f64, macd: f64, moving_average: f64) -> RawIndicators {
        RawIndicators {
            rsi,
            macd,
            moving_average,
        }
    }

    async fn engine_with(steps: Vec<ReplayStep>) -> MarketAnalysisEngine {
        let source = Arc::new(ReplayIndicatorSource::new(steps));
        MarketAnalysisEngine::start(source, EngineSettings::default())
            .await
            .unwrap()
    }

    async fn random_engine() -> MarketAnalysisEngine {
        let source = Arc::new(RandomIndicatorSource::seeded(99));
        MarketAnalysisEngine::start(source, EngineSettings::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn starts_fully_computed_on_fifteen_minutes() {
        let engine = random_engine().await;
        let snapshot = engine.current_snapshot();

        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.timeframe, Timeframe::Minutes15);
        assert!(snapshot.indicators.is_some());
        assert_eq!(snapshot.zones.len(), 4);
        assert_eq!(snapshot.chart.symbol, "FX:EURUSD");
        assert_eq!(snapshot.chart.interval, "15");

        let prices: Vec<f64> = snapshot.zones.iter().map(|z| z.price).collect();
        assert_eq!(prices, vec![1.0325, 1.0335, 1.0305, 1.0295]);
        assert_eq!(snapshot.setups.long.entry_zone.to_string(), "1.0300-1.0310");
        assert_eq!(snapshot.setups.long.take_profit.to_string(), "1.0330, 1.0345");
        assert_eq!(snapshot.setups.long.risk_reward.to_string(), "1:1.5");
    }

    #[tokio::test]
    async fn select_recomputes_zones_but_not_indicators() {
        let mut engine = random_engine().await;
        let before = engine.current_snapshot();

        let after = engine.select("1d").unwrap();

        assert_eq!(after.timeframe, Timeframe::Day1);
        assert_eq!(after.revision, before.revision + 1);
        assert!(after.zones.iter().all(|z| z.timeframe == Timeframe::Day1));
        assert_eq!(after.setups.long.risk_reward.to_string(), "1:3");
        assert_eq!(after.chart.interval, "D");
        assert_eq!(after.indicators, before.indicators);
    }

    #[tokio::test]
    async fn invalid_code_keeps_previous_snapshot() {
        let mut engine = random_engine().await;
        engine.select("4h").unwrap();
        let before = engine.current_snapshot();

        let err = engine.select("2h").unwrap_err();
        assert!(matches!(err, EngineError::InvalidTimeframe(_)));
        assert_eq!(err.to_string(), "invalid timeframe: unknown timeframe code '2h'");

        assert!(Arc::ptr_eq(&before, &engine.current_snapshot()));
        assert_eq!(engine.timeframe(), Timeframe::Hour4);
    }

    #[tokio::test]
    async fn refresh_twice_keeps_zones_and_setups() {
        let mut engine = random_engine().await;
        engine.select("1h").unwrap();

        engine.refresh().await;
        let first = engine.current_snapshot();
        engine.refresh().await;
        let second = engine.current_snapshot();

        assert_eq!(first.zones, second.zones);
        assert_eq!(first.setups, second.setups);
        assert_eq!(second.timeframe, Timeframe::Hour1);
        assert_eq!(second.revision, first.revision + 1);
    }

    #[tokio::test]
    async fn rsi_of_fifty_reads_bearish() {
        let engine = engine_with(vec![ReplayStep::Reading(raw(50.0, 0.0, 50.0))]).await;
        let snapshot = engine.current_snapshot();
        let readings = snapshot.indicators.as_ref().unwrap();

        assert_eq!(readings.rsi.sentiment, Sentiment::Bearish);
        assert_eq!(readings.macd.sentiment, Sentiment::Bearish);
        assert_eq!(readings.moving_average.sentiment, Sentiment::Bearish);
    }

    #[tokio::test]
    async fn failed_poll_retains_last_good_readings() {
        let mut engine = engine_with(vec![
            ReplayStep::Reading(raw(61.0, 3.0, 52.0)),
            ReplayStep::Failure {
                error: "upstream 503".to_string(),
            },
        ])
        .await;
        let good = engine.current_snapshot().indicators.clone();

        let outcome = engine.refresh().await;
        assert_eq!(
            outcome,
            RefreshOutcome::Retained {
                revision: 2,
                error: FeedError::Unavailable("upstream 503".to_string()),
            }
        );

        let snapshot = engine.current_snapshot();
        assert_eq!(snapshot.indicators, good);
        assert_eq!(snapshot.zones.len(), 4);
        assert_eq!(engine.state().consecutive_failures, 1);

        // Script is now empty: still no crash, still the same readings
        let outcome = engine.refresh().await;
        assert!(matches!(
            outcome,
            RefreshOutcome::Retained {
                error: FeedError::Exhausted,
                ..
            }
        ));
        assert_eq!(engine.current_snapshot().indicators, good);
        assert_eq!(engine.state().consecutive_failures, 2);
    }

    #[tokio::test]
    async fn slow_feed_times_out_and_retains() {
        let source = Arc::new(
            ReplayIndicatorSource::from_readings([raw(40.0, -1.0, 45.0), raw(60.0, 1.0, 55.0)])
                .with_delay(Duration::from_millis(10)),
        );
        let settings = EngineSettings {
            poll_timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let mut engine = MarketAnalysisEngine::start(source, settings).await.unwrap();
        assert!(engine.current_snapshot().indicators.is_some());

        // Same source, much tighter budget
        engine.settings.poll_timeout = Duration::from_millis(1);
        let outcome = engine.refresh().await;
        assert!(matches!(
            outcome,
            RefreshOutcome::Retained {
                error: FeedError::TimedOut(_),
                ..
            }
        ));
        assert_eq!(
            engine.current_snapshot().indicators.as_ref().unwrap().rsi.value,
            40.0
        );
    }

    #[tokio::test]
    async fn first_poll_failure_leaves_indicators_empty() {
        let engine = engine_with(vec![ReplayStep::Failure {
            error: "offline".to_string(),
        }])
        .await;
        let snapshot = engine.current_snapshot();

        assert!(snapshot.indicators.is_none());
        assert_eq!(snapshot.zones.len(), 4);
        assert_eq!(snapshot.supports().count(), 2);
        assert_eq!(snapshot.resistances().count(), 2);
    }

    #[tokio::test]
    async fn poll_started_before_select_is_discarded() {
        let mut engine = engine_with(vec![
            ReplayStep::Reading(raw(45.0, -2.0, 48.0)),
            ReplayStep::Reading(raw(65.0, 9.0, 58.0)),
        ])
        .await;
        let readings_before = engine.current_snapshot().indicators.clone();

        let pending = engine.begin_refresh();
        engine.select_timeframe(Timeframe::Hour4);
        let completed = pending.run().await;

        assert_eq!(engine.finish_refresh(completed), RefreshOutcome::Cancelled);
        let snapshot = engine.current_snapshot();
        assert_eq!(snapshot.timeframe, Timeframe::Hour4);
        assert_eq!(snapshot.indicators, readings_before);
    }

    #[tokio::test]
    async fn subscribers_see_every_publish() {
        let mut engine = random_engine().await;
        let mut rx = engine.subscribe();
        assert_eq!(rx.borrow_and_update().revision, 1);

        engine.select("4h").unwrap();
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.timeframe, Timeframe::Hour4);
        assert!(Arc::ptr_eq(&seen, &engine.current_snapshot()));
    }

    #[tokio::test]
    async fn custom_reference_price_moves_everything() {
        let source = Arc::new(RandomIndicatorSource::seeded(3));
        let settings = EngineSettings {
            reference_price: 1.1000,
            default_timeframe: Timeframe::Hour1,
            ..Default::default()
        };
        let engine = MarketAnalysisEngine::start(source, settings).await.unwrap();
        let snapshot = engine.current_snapshot();

        assert_eq!(snapshot.timeframe, Timeframe::Hour1);
        let support = snapshot.zones_of(ZoneKind::Support).next().unwrap();
        assert_eq!(support.price, 1.0985);
        assert_eq!(snapshot.setups.long.take_profit.to_string(), "1.1025, 1.1045");
    }

    #[tokio::test]
    async fn rejects_invalid_settings() {
        let source = Arc::new(RandomIndicatorSource::seeded(3));
        let settings = EngineSettings {
            reference_price: -1.0,
            ..Default::default()
        };
        let result = MarketAnalysisEngine::start(source, settings).await;
        assert!(matches!(result, Err(EngineError::InvalidReferencePrice(_))));
    }
}
