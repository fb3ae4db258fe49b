use core::fmt::Debug;

use log::{trace, warn};

use crate::config::{DISTANCE_THRESHOLD, HISTORY_LEN};
use crate::filter::SampleHistory;
use crate::hal::{Clock, PlaybackDevice, RawSampler};
use crate::presence::PresenceController;

/// Sonar, filter and controller wired into one polling step.
pub struct PresenceMonitor<S, C, P> {
    sampler: S,
    clock: C,
    history: SampleHistory<HISTORY_LEN>,
    controller: PresenceController<P>,
}

impl<S, C, P> PresenceMonitor<S, C, P>
where
    S: RawSampler,
    S::Error: Debug,
    C: Clock,
    P: PlaybackDevice,
{
    pub fn new(sampler: S, clock: C, player: P) -> Self {
        Self {
            sampler,
            clock,
            history: SampleHistory::new(),
            controller: PresenceController::new(player),
        }
    }

    /// Samples the sonar once and feeds the result to the controller.
    ///
    /// Returns whether a transition was accepted, or `None` when the ADC
    /// could not be read; the next poll simply tries again.
    pub fn poll(&mut self) -> Option<bool> {
        let filtered = match self.history.read(&mut self.sampler) {
            Ok(v) => v,
            Err(e) => {
                warn!("Sonar read failed: {:?}", e);
                return None;
            }
        };
        let present = filtered < DISTANCE_THRESHOLD;
        trace!("Sonar: {} present: {}", filtered, present);
        Some(self.controller.update(present, self.clock.now_millis()))
    }

    pub fn history(&self) -> &SampleHistory<HISTORY_LEN> {
        &self.history
    }

    pub fn controller(&self) -> &PresenceController<P> {
        &self.controller
    }
}
