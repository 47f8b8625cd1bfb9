use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting observer for the detection loop.
///
/// Keeps the loop free of any particular output mechanism; tests plug in
/// the null logger, the CLI the aggregating one.
pub trait LoopLogger {
    /// Record how long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. detections kept, fps).
    fn metric(&mut self, name: &str, value: f64);

    /// Mark the end of one loop iteration.
    fn frame_done(&mut self) {}

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Logger that discards all events.
pub struct NullLoopLogger;

impl LoopLogger for NullLoopLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

/// Running totals for one series of samples. Fixed size however many
/// samples are recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    sum: f64,
    max: f64,
    last: f64,
}

impl RunningStats {
    fn record(&mut self, value: f64) {
        self.max = if self.count == 0 { value } else { self.max.max(value) };
        self.count += 1;
        self.sum += value;
        self.last = value;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn last(&self) -> f64 {
        self.last
    }
}

/// Aggregates per-stage timings and metrics, reporting through `log`.
///
/// Every `report_every` frames a one-line status goes out at debug level;
/// the full table is logged at info level by `summary`.
pub struct StdoutLoopLogger {
    report_every: u64,
    timings: HashMap<String, RunningStats>,
    metrics: HashMap<String, RunningStats>,
    start_time: Instant,
    frames: u64,
}

impl StdoutLoopLogger {
    pub fn new(report_every: u64) -> Self {
        Self {
            report_every: report_every.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Detection summary ({} frames, {elapsed_s:.1}s total):",
            self.frames
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let stats = &self.timings[stage];
            lines.push(format!(
                "  {stage:10}: avg {:6.1}ms  max {:6.1}ms",
                stats.mean(),
                stats.max()
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            lines.push(format!("  {name}: avg {:.1}", self.metrics[name].mean()));
        }

        if self.frames > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.frames as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&RunningStats> {
        self.timings.get(stage)
    }

    pub fn metrics_for(&self, name: &str) -> Option<&RunningStats> {
        self.metrics.get(name)
    }
}

impl Default for StdoutLoopLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl LoopLogger for StdoutLoopLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .record(value);
    }

    fn frame_done(&mut self) {
        self.frames += 1;
        if self.frames % self.report_every == 0 {
            let last_fps = self.metrics.get("fps").map_or(0.0, RunningStats::last);
            log::debug!("Processed {} frames ({last_fps:.0} fps)", self.frames);
        }
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
