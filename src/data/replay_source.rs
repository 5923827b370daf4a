use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::indicator_source::{FeedError, IndicatorSource};
use crate::models::RawIndicators;

/// One scripted poll outcome.
///
/// On disk a step is either `{"rsi": 55.0, "macd": -2.0, "ma": 48.0}` or
/// `{"error": "upstream 503"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    Reading(RawIndicators),
    Failure { error: String },
}

/// Plays back a fixed script of readings and failures.
///
/// Stands in for a real feed: it can fail, it can be slow, and it can run dry.
pub struct ReplayIndicatorSource {
    steps: Mutex<VecDeque<ReplayStep>>,
    // Restart from the top once the script runs out
    looping: bool,
    script: Vec<ReplayStep>,
    delay: Option<Duration>,
}

impl ReplayIndicatorSource {
    pub fn new(steps: Vec<ReplayStep>) -> Self {
        Self {
            steps: Mutex::new(steps.iter().cloned().collect()),
            looping: false,
            script: steps,
            delay: None,
        }
    }

    pub fn from_readings(readings: impl IntoIterator<Item = RawIndicators>) -> Self {
        Self::new(readings.into_iter().map(ReplayStep::Reading).collect())
    }

    /// Load a JSON array of steps.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open replay file: {:?}", path))?;
        let steps: Vec<ReplayStep> = serde_json::from_reader(BufReader::new(file))
            .context(format!("Failed to parse replay file: {:?}", path))?;
        if steps.is_empty() {
            anyhow::bail!("Replay file {:?} contains no steps", path);
        }
        Ok(Self::new(steps))
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Every poll waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }

    fn next_step(&self) -> Option<ReplayStep> {
        let mut steps = self.steps.lock().unwrap();
        if steps.is_empty() && self.looping {
            steps.extend(self.script.iter().cloned());
        }
        steps.pop_front()
    }
}

#[async_trait]
impl IndicatorSource for ReplayIndicatorSource {
    fn name(&self) -> &str {
        "replay"
    }

    async fn poll(&self) -> Result<RawIndicators, FeedError> {
        // Sleep before taking a step, so a cancelled poll consumes nothing
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_step() {
            Some(ReplayStep::Reading(raw)) => Ok(raw),
            Some(ReplayStep::Failure { error }) => Err(FeedError::Unavailable(error)),
            None => Err(FeedError::Exhausted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::indicator_source::poll_with_timeout;
    use std::io::Write;

    fn raw(rsi: f64) -> RawIndicators {
        RawIndicators {
            rsi,
            macd: 1.0,
            moving_average: 50.0,
        }
    }

    #[tokio::test]
    async fn plays_steps_in_order_then_runs_dry() {
        let source = ReplayIndicatorSource::new(vec![
            ReplayStep::Reading(raw(40.0)),
            ReplayStep::Failure {
                error: "upstream 503".to_string(),
            },
            ReplayStep::Reading(raw(60.0)),
        ]);

        assert_eq!(source.poll().await, Ok(raw(40.0)));
        assert_eq!(
            source.poll().await,
            Err(FeedError::Unavailable("upstream 503".to_string()))
        );
        assert_eq!(source.poll().await, Ok(raw(60.0)));
        assert_eq!(source.poll().await, Err(FeedError::Exhausted));
    }

    #[tokio::test]
    async fn looping_restarts_script() {
        let source = ReplayIndicatorSource::from_readings([raw(45.0), raw(55.0)]).looping(true);
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(source.poll().await.unwrap().rsi);
        }
        assert_eq!(seen, vec![45.0, 55.0, 45.0, 55.0, 45.0]);
    }

    #[tokio::test]
    async fn slow_poll_times_out_without_consuming() {
        let source = ReplayIndicatorSource::from_readings([raw(45.0)])
            .with_delay(Duration::from_millis(500));

        let result = poll_with_timeout(&source, Duration::from_millis(20)).await;
        assert_eq!(result, Err(FeedError::TimedOut(Duration::from_millis(20))));
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn loads_script_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"rsi": 62.5, "macd": -3.0, "ma": 51.0}}, {{"error": "feed down"}}]"#
        )
        .unwrap();

        let source = ReplayIndicatorSource::from_json_file(file.path()).unwrap();
        assert_eq!(source.remaining(), 2);
        assert_eq!(
            source.script[1],
            ReplayStep::Failure {
                error: "feed down".to_string()
            }
        );
    }

    #[test]
    fn empty_json_script_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(ReplayIndicatorSource::from_json_file(file.path()).is_err());
    }
}
