//! Frame timing for phased frame loops.
//!
//! The ECS expects all structural changes to happen in well defined phases of a frame:
//! input, then update, then the deletion flush, then render. [`FrameTimer`] records how long each
//! [`Phase`] takes per frame so that flush cost can be read apart from update and render cost.

use std::time::{Duration, Instant};

/// A phase of one frame, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Update,
    Flush,
    Render,
}

impl Phase {
    /// Every phase in execution order.
    pub const ALL: [Phase; 4] = [Phase::Input, Phase::Update, Phase::Flush, Phase::Render];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Statistics over a series of durations.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    /// Number of samples.
    pub frame_count: usize,
    /// Sum of all samples.
    pub total_duration: Duration,
    /// Samples in ascending order.
    sorted_times: Vec<Duration>,
}

impl FrameStats {
    /// Build stats from unsorted samples.
    pub fn from_times(mut times: Vec<Duration>) -> Self {
        times.sort_unstable();
        Self {
            frame_count: times.len(),
            total_duration: times.iter().sum(),
            sorted_times: times,
        }
    }

    pub fn min(&self) -> Duration {
        self.sorted_times.first().copied().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.sorted_times.last().copied().unwrap_or_default()
    }

    pub fn average(&self) -> Duration {
        if self.frame_count == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.frame_count as u32
        }
    }

    /// The sample at percentile `p` (0-100).
    pub fn percentile(&self, p: usize) -> Duration {
        let Some(last) = self.sorted_times.len().checked_sub(1) else {
            return Duration::ZERO;
        };
        let index = (self.sorted_times.len() * p.min(100) / 100).min(last);
        self.sorted_times[index]
    }

    pub fn median(&self) -> Duration {
        self.percentile(50)
    }

    /// The worst 1% of frames.
    pub fn p99(&self) -> Duration {
        self.percentile(99)
    }

    /// Frames per second at the average sample.
    pub fn fps(&self) -> f64 {
        let avg = self.average();
        if avg.is_zero() {
            0.0
        } else {
            1.0 / avg.as_secs_f64()
        }
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        write!(
            f,
            "{} frames, avg: {:.3}ms, median: {:.3}ms, p99: {:.3}ms, max: {:.3}ms",
            self.frame_count,
            ms(self.average()),
            ms(self.median()),
            ms(self.p99()),
            ms(self.max()),
        )
    }
}

/// Per-phase timings of a frame loop.
#[derive(Debug, Clone)]
pub struct LoopStats {
    /// Whole-frame timings.
    pub frames: FrameStats,
    phases: [FrameStats; 4],
}

impl LoopStats {
    /// The timings of one phase.
    pub fn phase(&self, phase: Phase) -> &FrameStats {
        &self.phases[phase.index()]
    }
}

impl std::fmt::Display for LoopStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "frame:  {}", self.frames)?;
        for phase in Phase::ALL {
            writeln!(f, "{:<7} {}", format!("{phase:?}:"), self.phase(phase))?;
        }
        Ok(())
    }
}

/// Records phase durations frame by frame.
pub struct FrameTimer {
    frames: Vec<Duration>,
    phases: [Vec<Duration>; 4],
}

impl FrameTimer {
    /// Create a timer with room for `expected_frames` frames.
    pub fn new(expected_frames: usize) -> Self {
        Self {
            frames: Vec::with_capacity(expected_frames),
            phases: std::array::from_fn(|_| Vec::with_capacity(expected_frames)),
        }
    }

    /// Run one frame, timing each phase. `phase_fn` is called once per phase in order.
    pub fn frame<F>(&mut self, mut phase_fn: F)
    where
        F: FnMut(Phase),
    {
        let frame_start = Instant::now();
        for phase in Phase::ALL {
            let start = Instant::now();
            phase_fn(phase);
            self.phases[phase.index()].push(start.elapsed());
        }
        self.frames.push(frame_start.elapsed());
    }

    /// Number of frames recorded so far.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn stats(self) -> LoopStats {
        let [input, update, flush, render] = self.phases;
        LoopStats {
            frames: FrameStats::from_times(self.frames),
            phases: [
                FrameStats::from_times(input),
                FrameStats::from_times(update),
                FrameStats::from_times(flush),
                FrameStats::from_times(render),
            ],
        }
    }
}

/// Run `frame_count` frames of a phased loop and collect the timings.
pub fn measure_frame_loop<F>(frame_count: usize, mut phase_fn: F) -> LoopStats
where
    F: FnMut(usize, Phase),
{
    let mut timer = FrameTimer::new(frame_count);
    for frame in 0..frame_count {
        timer.frame(|phase| phase_fn(frame, phase));
    }
    timer.stats()
}
