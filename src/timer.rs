use std::time::Instant;

// ── Stopwatch ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StopwatchState {
    Idle,
    Running,
}

/// Microsecond wall-clock stopwatch with two states.
///
/// Misuse — starting a running stopwatch or stopping an idle one — is
/// reported and the operation proceeds best-effort; measurements keep coming.
pub struct Stopwatch {
    state: StopwatchState,
    started: Instant,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self { state: StopwatchState::Idle, started: Instant::now() }
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    pub fn start(&mut self) {
        if self.state != StopwatchState::Idle {
            eprintln!("[timer] start(): stopwatch is already running");
        }
        self.state = StopwatchState::Running;
        self.started = Instant::now();
    }

    /// Stop and return the elapsed time since the last start in microseconds.
    pub fn stop(&mut self) -> u64 {
        if self.state != StopwatchState::Running {
            eprintln!("[timer] stop(): stopwatch is not running");
        }
        self.state = StopwatchState::Idle;
        self.started.elapsed().as_micros() as u64
    }

    /// Stop, report the elapsed microseconds, and immediately start the next
    /// measurement.
    pub fn stop_and_start(&mut self) -> u64 {
        let elapsed = self.stop();
        self.start();
        elapsed
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

// ── Profiler ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct Probe {
    name: String,
    /// Accumulated elapsed time in microseconds.
    cumulative: u64,
    /// Number of measurements.
    count: u64,
}

/// Accumulates named probes' cumulative elapsed time and call counts.
///
/// Call [`Profiler::probe`] at phase boundaries: each call charges the time
/// since the previous probe (or since [`Profiler::init_probes`]) to the given
/// probe index. [`Profiler::print_stats`] reports per-probe means, shares of
/// the total, and the frame rate the summed means would sustain.
pub struct Profiler {
    probes: Vec<Probe>,
    watch: Stopwatch,
}

impl Profiler {
    pub fn new() -> Self {
        Self { probes: Vec::new(), watch: Stopwatch::new() }
    }

    /// Reset the probe pool to one probe per name and start timing.
    pub fn init_probes(&mut self, names: &[&str]) {
        self.probes = names
            .iter()
            .map(|n| Probe { name: (*n).to_string(), ..Probe::default() })
            .collect();
        if self.watch.is_running() {
            self.watch.stop();
        }
        self.watch.start();
    }

    /// Charge the time since the previous probe to probe `ix`.
    pub fn probe(&mut self, ix: usize) {
        if ix >= self.probes.len() {
            eprintln!("[timer] probe(): index out of range: {ix}");
            return;
        }
        self.probes[ix].cumulative += self.watch.stop_and_start();
        self.probes[ix].count += 1;
    }

    pub fn probe_value(&self, ix: usize) -> u64 {
        match self.probes.get(ix) {
            Some(p) => p.cumulative,
            None => {
                eprintln!("[timer] probe_value(): index out of range: {ix}");
                0
            }
        }
    }

    pub fn probe_count(&self, ix: usize) -> u64 {
        match self.probes.get(ix) {
            Some(p) => p.count,
            None => {
                eprintln!("[timer] probe_count(): index out of range: {ix}");
                0
            }
        }
    }

    pub fn probe_name(&self, ix: usize) -> &str {
        match self.probes.get(ix) {
            Some(p) => &p.name,
            None => {
                eprintln!("[timer] probe_name(): index out of range: {ix}");
                ""
            }
        }
    }

    /// Print per-probe statistics: mean microseconds, share of the total,
    /// and the FPS the summed per-frame means would allow.
    pub fn print_stats(&self, title: &str) {
        println!("{title}");
        println!("{}", "-".repeat(title.len()));

        let total: u64 = self.probes.iter().map(|p| p.cumulative).sum();
        let name_width = self.probes.iter().map(|p| p.name.len()).max().unwrap_or(0);

        let mut total_means = 0.0f64;
        for (ix, p) in self.probes.iter().enumerate() {
            let mean = if p.count > 0 { p.cumulative as f64 / p.count as f64 } else { 0.0 };
            let share = if total > 0 { 100.0 * p.cumulative as f64 / total as f64 } else { 0.0 };
            total_means += mean;
            println!(
                "probe {ix:2}  {:<name_width$}  mean {mean:10.2} us  ({share:6.2} %)",
                p.name,
            );
        }
        println!();
        println!("total mean per frame: {total_means:10.2} us ({:.2} ms)", total_means / 1000.0);
        if total_means > 0.0 {
            println!("total mean fps      : {:10.2}", 1_000_000.0 / total_means);
        }
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}
