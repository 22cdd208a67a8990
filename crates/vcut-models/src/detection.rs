//! Per-frame detection and camera-track models.

/// Detected horizontal center for one video frame, in source pixels.
///
/// `None` means no person was found in that frame. The detection array is
/// dense: one entry per decoded frame, 0-based, no gaps in the array itself.
pub type FrameDetection = Option<i32>;

/// Dense per-frame horizontal crop-center positions.
///
/// Same length and indexing as the detection input it was derived from.
/// Consumed by the reframe renderer; an empty track means "no detection
/// ever succeeded, fall back to a static center crop".
pub type CameraTrack = Vec<i32>;
