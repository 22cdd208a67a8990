//! Adaptive camera-track smoothing.
//!
//! Turns an unreliable, frame-sparse detection signal into a temporally
//! stable sequence of horizontal crop centers for a fixed-aspect reframe.
//! Detected centers are clustered into two canonical seat anchors, gaps are
//! forward-filled, and a hysteresis counter enforces a minimum shot
//! duration before the virtual camera is allowed to jump to the other seat.

use tracing::debug;

use vcut_models::{CameraTrack, FrameDetection};

use crate::error::{CoreError, CoreResult};
use crate::kmeans;

/// Default minimum shot duration before a seat switch, in seconds.
pub const MIN_SHOT_DURATION: f64 = 2.0;

/// Fixed seed for the clustering restarts (determinism invariant).
pub const DEFAULT_CLUSTER_SEED: u64 = 42;

/// Configuration for [`CameraSmoother`].
///
/// The cluster count is fixed at two: the system assumes a two-seat
/// framing (podcast-style) as its primary use case. Single-speaker footage
/// degrades gracefully, since both anchors collapse onto the same point.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Minimum dwell time before a seat switch is permitted, in seconds
    pub min_shot_duration: f64,
    /// Number of random k-means restarts
    pub restarts: u32,
    /// Seed for the clustering RNG
    pub seed: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_shot_duration: MIN_SHOT_DURATION,
            restarts: 10,
            seed: DEFAULT_CLUSTER_SEED,
        }
    }
}

/// Smooths per-frame detections into a stable camera track.
#[derive(Debug, Clone)]
pub struct CameraSmoother {
    config: CameraConfig,
}

impl Default for CameraSmoother {
    fn default() -> Self {
        Self {
            config: CameraConfig::default(),
        }
    }
}

impl CameraSmoother {
    /// Create a smoother from a validated configuration.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] for a negative or non-finite
    /// minimum shot duration, or zero restarts.
    pub fn new(config: CameraConfig) -> CoreResult<Self> {
        if !config.min_shot_duration.is_finite() || config.min_shot_duration < 0.0 {
            return Err(CoreError::invalid_config(format!(
                "min_shot_duration must be finite and non-negative, got {}",
                config.min_shot_duration
            )));
        }
        if config.restarts == 0 {
            return Err(CoreError::invalid_config(
                "clustering requires at least one restart",
            ));
        }
        Ok(Self { config })
    }

    /// Compute a dense, stabilized crop-center track from raw detections.
    ///
    /// Returns an empty track when no frame ever had a detection; callers
    /// interpret that as "use a static fallback crop", not as an error.
    /// Otherwise the output has exactly one entry per input frame.
    pub fn smooth(&self, detections: &[FrameDetection], fps: f64) -> CameraTrack {
        let centers: Vec<f64> = detections
            .iter()
            .copied()
            .flatten()
            .map(f64::from)
            .collect();
        if centers.is_empty() {
            return Vec::new();
        }

        let (lower_seat, upper_seat) =
            kmeans::cluster_two(&centers, self.config.restarts, self.config.seed);
        debug!(lower_seat, upper_seat, "seat anchors from clustering");

        // Forward-fill gaps; frames before the first detection seed from
        // the lower seat anchor.
        let mut filled = Vec::with_capacity(detections.len());
        let mut last_known = lower_seat;
        for d in detections {
            if let Some(x) = d {
                last_known = f64::from(*x);
            }
            filled.push(last_known);
        }

        // Hysteresis seat assignment: a switch is only permitted once the
        // current shot has lasted longer than the configured minimum.
        let min_frames_wait = (self.config.min_shot_duration * fps) as u64;
        let mut current_seat = lower_seat;
        let mut frames_since_cut: u64 = 0;

        let mut track = Vec::with_capacity(filled.len());
        for &x in &filled {
            let nearest = nearest_seat(x, lower_seat, upper_seat);
            if nearest != current_seat && frames_since_cut > min_frames_wait {
                current_seat = nearest;
                frames_since_cut = 0;
            } else {
                frames_since_cut += 1;
            }
            track.push(current_seat.round() as i32);
        }

        track
    }
}

/// Seat anchor nearest to `x` by absolute pixel distance; ties go to the
/// lower seat.
fn nearest_seat(x: f64, lower: f64, upper: f64) -> f64 {
    if (x - lower).abs() <= (x - upper).abs() {
        lower
    } else {
        upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother() -> CameraSmoother {
        CameraSmoother::new(CameraConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let negative = CameraConfig {
            min_shot_duration: -1.0,
            ..CameraConfig::default()
        };
        assert!(CameraSmoother::new(negative).is_err());

        let nan = CameraConfig {
            min_shot_duration: f64::NAN,
            ..CameraConfig::default()
        };
        assert!(CameraSmoother::new(nan).is_err());

        let no_restarts = CameraConfig {
            restarts: 0,
            ..CameraConfig::default()
        };
        assert!(CameraSmoother::new(no_restarts).is_err());
    }

    #[test]
    fn test_empty_detections_yield_empty_track() {
        let track = smoother().smooth(&[None, None, None], 30.0);
        assert!(track.is_empty());
    }

    #[test]
    fn test_output_is_dense() {
        let mut detections = vec![None; 10];
        detections.extend(std::iter::repeat(Some(400)).take(20));
        detections.extend(vec![None; 5]);

        let track = smoother().smooth(&detections, 30.0);
        assert_eq!(track.len(), detections.len());
    }

    #[test]
    fn test_single_speaker_collapses_to_one_seat() {
        let detections = vec![Some(500); 40];
        let track = smoother().smooth(&detections, 30.0);
        assert!(track.iter().all(|&x| x == 500));
    }

    #[test]
    fn test_flicker_shorter_than_threshold_never_switches() {
        // Alternate between the two seats every single frame for fewer
        // frames than min_shot_duration * fps (= 60 at 30 fps).
        let detections: Vec<FrameDetection> = (0..50)
            .map(|i| if i % 2 == 0 { Some(100) } else { Some(500) })
            .collect();

        let track = smoother().smooth(&detections, 30.0);
        assert!(track.iter().all(|&x| x == track[0]));
        assert_eq!(track[0], 100);
    }

    #[test]
    fn test_persistent_seat_switches_exactly_once() {
        // 70 frames at the lower seat, then 70 at the upper: the debounce
        // threshold (60 frames) is exceeded, so exactly one switch occurs
        // at the first upper-seat frame.
        let mut detections = vec![Some(100); 70];
        detections.extend(vec![Some(500); 70]);

        let track = smoother().smooth(&detections, 30.0);
        assert_eq!(track.len(), 140);
        assert!(track[..70].iter().all(|&x| x == 100));
        assert!(track[70..].iter().all(|&x| x == 500));

        let switches = track.windows(2).filter(|w| w[0] != w[1]).count();
        assert_eq!(switches, 1);
    }

    #[test]
    fn test_leading_gap_seeds_from_lower_seat() {
        let mut detections = vec![None; 5];
        detections.extend(vec![Some(100); 40]);
        detections.extend(vec![Some(500); 40]);

        let track = smoother().smooth(&detections, 30.0);
        assert_eq!(track[0], 100);
    }

    #[test]
    fn test_determinism_across_runs() {
        let detections: Vec<FrameDetection> = (0..300)
            .map(|i| {
                if i % 7 == 0 {
                    None
                } else if (i / 90) % 2 == 0 {
                    Some(120 + (i % 9) as i32)
                } else {
                    Some(510 + (i % 11) as i32)
                }
            })
            .collect();

        let s = smoother();
        let first = s.smooth(&detections, 25.0);
        let second = s.smooth(&detections, 25.0);
        assert_eq!(first, second);
    }
}
