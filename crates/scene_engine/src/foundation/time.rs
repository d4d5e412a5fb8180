//! Frame timing utilities

/// Frame timer fed with real elapsed time by the scheduler
///
/// Tracks the last real delta, total elapsed time, and a frames-per-second
/// estimate that is refreshed once per elapsed second from the number of
/// rendered frames.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    second_accumulator: f32,
    frames_this_second: u32,
    frames_per_second: u32,
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a real-time tick
    pub fn tick(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.second_accumulator += delta_time;
        if self.second_accumulator >= 1.0 {
            self.second_accumulator -= 1.0;
            self.frames_per_second = self.frames_this_second;
            self.frames_this_second = 0;
        }
    }

    /// Record a rendered frame
    pub fn frame_rendered(&mut self) {
        self.frame_count += 1;
        self.frames_this_second += 1;
    }

    /// Get the real time since the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed real time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the number of rendered frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames rendered during the last full second
    pub fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }
}
