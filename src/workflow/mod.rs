//! Workflow Module
//!
//! Capture session files: the on-disk bundle of both input streams that the
//! CLI feeds to the synthesizer.

pub mod session;

pub use session::{CaptureSession, SessionMetadata};
