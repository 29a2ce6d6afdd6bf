//! Burst-Based Event Segmentation
//!
//! Groups the raw input event stream into temporally coherent bursts, each of
//! which becomes at most one workflow step.

pub mod burst_detector;

pub use burst_detector::{Burst, BurstConfig, EventBurstDetector};
