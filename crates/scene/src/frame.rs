use std::time::Duration;

/// Ring buffer of recent frame times for instrumentation.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            index: 0,
            filled: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.history.len()
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.history.len();
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// Record a frame delta given in seconds. Negative or non-finite deltas count as zero.
    pub fn record_secs(&mut self, dt: f32) {
        self.record(Duration::try_from_secs_f32(dt).unwrap_or_default());
    }

    fn recorded(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let samples = self.recorded();
        if samples.is_empty() {
            return Duration::ZERO;
        }
        samples.iter().sum::<Duration>() / samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.recorded().iter().copied().min().unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.history.len()
        } else {
            self.index
        }
    }

    /// Frames per second implied by the average frame time.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_hz_frames_average_out() {
        let mut timer = FrameTimer::new(4);
        for ms in [15, 17, 16, 16] {
            timer.record(Duration::from_millis(ms));
        }
        assert_eq!(timer.count(), 4);
        assert_eq!(timer.average(), Duration::from_millis(16));
        assert_eq!(timer.max(), Duration::from_millis(17));
        assert_eq!(timer.min(), Duration::from_millis(15));
        assert!((timer.fps() - 62.5).abs() < 0.01);
    }

    #[test]
    fn oldest_frame_is_overwritten() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(100));
        timer.record(Duration::from_millis(8));
        timer.record(Duration::from_millis(12));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.max(), Duration::from_millis(12));
        assert_eq!(timer.average(), Duration::from_millis(10));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn bad_seconds_record_as_zero() {
        let mut timer = FrameTimer::new(4);
        timer.record_secs(-1.0);
        timer.record_secs(f32::NAN);
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.max(), Duration::ZERO);
        timer.record_secs(0.5);
        assert!((timer.fps() - 6.0).abs() < 0.01);
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let mut timer = FrameTimer::new(0);
        timer.record(Duration::from_millis(5));
        assert_eq!(timer.capacity(), 1);
        assert_eq!(timer.count(), 1);
    }
}
