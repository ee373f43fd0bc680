//! Startup fade/scale-in. Purely cosmetic: the UI samples it while drawing
//! and nothing else reads it.

use std::time::{Duration, Instant};

pub const ENTRANCE_DURATION: Duration = Duration::from_millis(600);
const INITIAL_SCALE: f32 = 0.8;
const INITIAL_OPACITY: f32 = 0.0;

/// Scale and opacity at one point of the effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub scale: f32,
    pub opacity: f32,
}

impl Keyframe {
    pub const FINAL: Keyframe = Keyframe { scale: 1.0, opacity: 1.0 };
}

#[derive(Debug, Clone, Copy)]
pub struct Entrance {
    started: Instant,
    duration: Duration,
}

impl Entrance {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            duration: ENTRANCE_DURATION,
        }
    }

    pub fn frame(&self) -> Keyframe {
        sample(self.started.elapsed(), self.duration)
    }

    pub fn is_finished(&self) -> bool {
        self.started.elapsed() >= self.duration
    }
}

/// Keyframe after `elapsed`, eased out so it settles gently
pub fn sample(elapsed: Duration, duration: Duration) -> Keyframe {
    if duration.is_zero() || elapsed >= duration {
        return Keyframe::FINAL;
    }

    let t = elapsed.as_secs_f32() / duration.as_secs_f32();
    let eased = 1.0 - (1.0 - t).powi(3);

    Keyframe {
        scale: INITIAL_SCALE + (1.0 - INITIAL_SCALE) * eased,
        opacity: INITIAL_OPACITY + (1.0 - INITIAL_OPACITY) * eased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_small_and_transparent() {
        let frame = sample(Duration::ZERO, ENTRANCE_DURATION);
        assert_eq!(frame, Keyframe { scale: 0.8, opacity: 0.0 });
    }

    #[test]
    fn test_ends_at_full_size() {
        assert_eq!(sample(ENTRANCE_DURATION, ENTRANCE_DURATION), Keyframe::FINAL);
        assert_eq!(sample(Duration::from_secs(5), ENTRANCE_DURATION), Keyframe::FINAL);
        assert_eq!(sample(Duration::ZERO, Duration::ZERO), Keyframe::FINAL);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut last = sample(Duration::ZERO, ENTRANCE_DURATION);
        for ms in (50..=600).step_by(50) {
            let frame = sample(Duration::from_millis(ms), ENTRANCE_DURATION);
            assert!(frame.scale >= last.scale && frame.opacity >= last.opacity);
            assert!(frame.scale <= 1.0 && frame.opacity <= 1.0);
            last = frame;
        }
    }
}
