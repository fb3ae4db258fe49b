//! Sensing and playback control for a presence-triggered audio player.
//!
//! A sonar's analog output is smoothed by [`SampleHistory`], thresholded into
//! a present/absent signal, and debounced by [`PresenceController`] into
//! start, resume and pause commands for a [`PlaybackDevice`].
//! [`PresenceMonitor`] runs one polling cycle of that pipeline.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod filter;
pub mod hal;
pub mod monitor;
pub mod mp3;
pub mod presence;
pub mod sampler;

pub use filter::SampleHistory;
pub use hal::{Clock, PlaybackDevice, RawSampler};
pub use monitor::PresenceMonitor;
pub use presence::{PresenceController, PresenceState};
pub use sampler::AdcSampler;
