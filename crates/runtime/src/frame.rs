use foundation::time::Time;

/// Per-frame metadata.
///
/// This is the primary timebase for the map runtime. It is intentionally
/// small and pure so frame sequences can be recorded and replayed. Deltas are
/// variable (whatever the host clock measured), so anything animated must
/// scale by `dt_s` rather than assuming a fixed step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Elapsed time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn first() -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time: Time::zero(),
        }
    }

    pub fn advance(self, dt_s: f64) -> Self {
        Self {
            index: self.index + 1,
            dt_s,
            time: Time(self.time.0 + dt_s),
        }
    }
}
