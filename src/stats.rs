//! # Frame statistics
//!
//! Rolling frame-time window fed with per-frame deltas. A screen built with
//! `ScreenConfig::stats` samples it from an update callback and logs a report
//! once per interval.
//!
//! ```
//! use vitrine::stats::FrameStats;
//!
//! let mut stats = FrameStats::with_config(60, 0.5);
//! let mut report = None;
//! for _ in 0..40 {
//!     report = report.or(stats.sample(1.0 / 60.0));
//! }
//! assert!((report.unwrap().fps - 60.0).abs() < 0.5);
//! ```

use std::collections::VecDeque;

/// Aggregates over the current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Ring buffer of recent frame times in seconds
    frame_times: VecDeque<f32>,
    max_samples: usize,
    since_report: f32,
    report_interval: f32,
    metrics: FrameMetrics,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    /// Two seconds of samples at 60 fps, reported once per second.
    pub fn new() -> Self {
        Self::with_config(120, 1.0)
    }

    pub fn with_config(max_samples: usize, report_interval: f32) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            since_report: 0.0,
            report_interval,
            metrics: FrameMetrics::default(),
        }
    }

    /// Record one frame. Returns fresh metrics whenever a report interval elapses.
    ///
    /// Zero deltas (the first frame after a start) carry no timing information
    /// and are skipped.
    pub fn sample(&mut self, delta: f32) -> Option<FrameMetrics> {
        if !(delta.is_finite() && delta > 0.0) {
            return None;
        }

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);

        self.since_report += delta;
        if self.since_report < self.report_interval {
            return None;
        }
        self.since_report = 0.0;
        self.update_metrics();
        Some(self.metrics)
    }

    pub fn metrics(&self) -> FrameMetrics {
        self.metrics
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.since_report = 0.0;
        self.metrics = FrameMetrics::default();
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }
        let total: f32 = self.frame_times.iter().sum();
        let average = total / self.frame_times.len() as f32;

        self.metrics = FrameMetrics {
            fps: 1.0 / average,
            frame_time_ms: average * 1000.0,
            min_frame_time_ms: self.frame_times.iter().copied().fold(f32::MAX, f32::min) * 1000.0,
            max_frame_time_ms: self.frame_times.iter().copied().fold(0.0, f32::max) * 1000.0,
        };
    }
}
