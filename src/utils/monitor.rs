use std::fmt;
use std::time::Duration;

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Extract,
    Transform,
    Load,
}

impl Phase {
    fn unit(self) -> &'static str {
        match self {
            Phase::Extract => "events parsed",
            Phase::Transform => "report rows",
            Phase::Load => "report rows written",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Extract => f.write_str("Extract"),
            Phase::Transform => f.write_str("Transform"),
            Phase::Load => f.write_str("Load"),
        }
    }
}

/// What one phase produced, and the process state when it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSample {
    pub phase: Phase,
    pub items: usize,
    /// Time since the run started.
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub events: usize,
    pub rows: usize,
    pub total: Duration,
    pub peak_memory_mb: Option<u64>,
}

impl RunSummary {
    pub fn events_per_second(&self) -> f64 {
        let secs = self.total.as_secs_f64();
        if secs > 0.0 {
            self.events as f64 / secs
        } else {
            0.0
        }
    }
}

/// Folds the phase samples of one run; `None` before anything was recorded.
pub fn summarize(samples: &[PhaseSample]) -> Option<RunSummary> {
    let last = samples.last()?;
    let items_of = |phase: Phase| {
        samples
            .iter()
            .rev()
            .find(|s| s.phase == phase)
            .map(|s| s.items)
            .unwrap_or(0)
    };

    Some(RunSummary {
        events: items_of(Phase::Extract),
        rows: items_of(Phase::Transform),
        total: last.elapsed,
        peak_memory_mb: samples.iter().filter_map(|s| s.memory_mb).max(),
    })
}

/// Per-phase event/row counts with process memory, logged by `EtlEngine`.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    start_time: Instant,
    samples: Mutex<Vec<PhaseSample>>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = sysinfo::get_current_pid().ok();
        if enabled && pid.is_none() {
            tracing::warn!("Could not determine current PID, memory stats disabled");
        }

        Self {
            system: Mutex::new(System::new()),
            pid,
            start_time: Instant::now(),
            samples: Mutex::new(Vec::new()),
            enabled,
        }
    }

    fn memory_mb(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_all();
        system.process(pid).map(|p| p.memory() / 1024 / 1024)
    }

    pub fn record(&self, phase: Phase, items: usize) {
        if !self.enabled {
            return;
        }

        let sample = PhaseSample {
            phase,
            items,
            elapsed: self.start_time.elapsed(),
            memory_mb: self.memory_mb(),
        };
        tracing::info!(
            "📊 {} - {} {}, Memory: {}MB, Time: {:?}",
            phase,
            items,
            phase.unit(),
            sample.memory_mb.map_or("?".to_string(), |m| m.to_string()),
            sample.elapsed
        );

        if let Ok(mut samples) = self.samples.lock() {
            samples.push(sample);
        }
    }

    pub fn finish(&self) -> Option<RunSummary> {
        let summary = summarize(&self.samples.lock().ok()?)?;
        tracing::info!(
            "📊 Final Stats - {} events -> {} rows in {:?} ({:.0} events/s), Peak Memory: {}MB",
            summary.events,
            summary.rows,
            summary.total,
            summary.events_per_second(),
            summary
                .peak_memory_mb
                .map_or("?".to_string(), |m| m.to_string())
        );
        Some(summary)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 非 CLI 環境不取樣
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn record(&self, _phase: Phase, _items: usize) {}

    pub fn finish(&self) -> Option<RunSummary> {
        None
    }

    pub fn is_enabled(&self) -> bool {
        false
    }
}
