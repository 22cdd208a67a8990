//! Core algorithms for the ViralCut pipeline.
//!
//! This crate holds the two pieces of the system with genuine algorithmic
//! content, both pure synchronous functions over in-memory arrays:
//!
//! - [`timeline::TimelineResolver`] turns a model's loosely-structured
//!   segment-id suggestion into a precise, gap-padded sequence of time
//!   ranges, preserving the model's intended montage order.
//! - [`camera::CameraSmoother`] turns noisy per-frame detections into a
//!   stable sequence of horizontal crop centers for a 16:9 to 9:16 reframe.
//!
//! Neither component performs I/O; both are deterministic for fixed inputs
//! (the clustering seed is fixed by configuration).

pub mod camera;
pub mod error;
pub mod kmeans;
pub mod timeline;

pub use camera::{CameraConfig, CameraSmoother};
pub use error::{CoreError, CoreResult};
pub use timeline::{TimelineResolver, PADDING_DURATION};
