//! Test Runner
//!
//! Composes the scenario set for the configured transport, runs every
//! scenario in order and collects a [`Report`]. A failing scenario never
//! stops the ones after it.

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{Config, TransportKind};
use crate::error::{ProbeError, Result};
use crate::network::{self, StreamClient, Transport};
use crate::suite::{self, Body, Scenario};

/// How a scenario ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,

    /// A reply did not match the expected bytes
    Failed(String),

    /// The call itself failed (I/O, framing violation, timeout)
    Errored(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

impl From<Result<()>> for Outcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Passed,
            Err(e) if e.is_assertion() => Outcome::Failed(e.to_string()),
            Err(e) => Outcome::Errored(e.to_string()),
        }
    }
}

/// Result of a single scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: &'static str,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Passed => write!(f, "{} ... ok", self.name),
            Outcome::Failed(reason) => write!(f, "{} ... FAIL: {}", self.name, reason),
            Outcome::Errored(reason) => write!(f, "{} ... ERROR: {}", self.name, reason),
        }
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub results: Vec<ScenarioResult>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn elapsed(&self) -> Duration {
        self.results.iter().map(|r| r.elapsed).sum()
    }

    /// Look up a scenario's outcome by name
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.results.iter().find(|r| r.name == name).map(|r| &r.outcome)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ran {} scenarios in {:.3}s: {} passed, {} failed",
            self.results.len(),
            self.elapsed().as_secs_f64(),
            self.passed(),
            self.failed()
        )
    }
}

/// Runs the composed scenario set against one server
pub struct Runner {
    transport: Box<dyn Transport>,

    /// Present only when the selected transport is TCP
    stream: Option<StreamClient>,

    scenarios: Vec<Scenario>,
}

impl Runner {
    /// Build the selected transport and compose the applicable scenarios
    pub fn new(config: &Config) -> Result<Self> {
        let transport = network::connect(config)?;

        let mut scenarios = suite::universal();
        let stream = match config.transport {
            TransportKind::Stream => {
                scenarios.extend(suite::stream_only());
                Some(StreamClient::new(config)?)
            }
            TransportKind::Datagram => None,
        };

        tracing::info!(
            "Composed {} scenarios for {} at {}",
            scenarios.len(),
            config.transport,
            config.server_addr
        );

        Ok(Self {
            transport,
            stream,
            scenarios,
        })
    }

    /// Keep only scenarios whose name contains `pattern`
    pub fn filter(mut self, pattern: &str) -> Self {
        self.scenarios.retain(|s| s.name.contains(pattern));
        self
    }

    /// Names of the scenarios that will run, in order
    pub fn scenario_names(&self) -> Vec<&'static str> {
        self.scenarios.iter().map(|s| s.name).collect()
    }

    pub fn run(&self) -> Report {
        self.run_with(|_| {})
    }

    /// Run every scenario, handing each result to `on_result` as it lands
    pub fn run_with<F>(&self, mut on_result: F) -> Report
    where
        F: FnMut(&ScenarioResult),
    {
        let mut report = Report::default();

        for scenario in &self.scenarios {
            let result = self.run_one(scenario);
            on_result(&result);
            report.results.push(result);
        }

        tracing::info!("{}", report);
        report
    }

    fn run_one(&self, scenario: &Scenario) -> ScenarioResult {
        tracing::info!("Running {}", scenario.name);
        let started = Instant::now();

        let result = match (scenario.body, &self.stream) {
            (Body::Universal(body), _) => body(self.transport.as_ref()),
            (Body::StreamOnly(body), Some(stream)) => body(stream),
            (Body::StreamOnly(_), None) => Err(ProbeError::Config(
                "scenario requires the stream transport".to_string(),
            )),
        };

        let outcome = Outcome::from(result);
        match &outcome {
            Outcome::Passed => tracing::debug!("{} passed", scenario.name),
            Outcome::Failed(reason) => tracing::warn!("{} failed: {}", scenario.name, reason),
            Outcome::Errored(reason) => tracing::warn!("{} errored: {}", scenario.name, reason),
        }

        ScenarioResult {
            name: scenario.name,
            outcome,
            elapsed: started.elapsed(),
        }
    }
}
