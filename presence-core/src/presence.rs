use log::{debug, info, warn};

use crate::config::{BIT_RATE_KBPS, DEFAULT_VOLUME, INITIAL_ATTENUATION, MIN_DWELL_MS, TRACK_NUMBER};
use crate::hal::PlaybackDevice;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenceState {
    Inactive,
    Active,
}

/// Turns the present/absent signal into player commands.
///
/// Activation and deactivation share one timestamp: any two accepted
/// transitions are at least [`MIN_DWELL_MS`] apart. The very first
/// activation has nothing to be debounced against and is taken immediately.
/// Rejected calls change nothing, the timestamp included.
pub struct PresenceController<P> {
    player: P,
    state: PresenceState,
    last_transition: u32,
    has_played_once: bool,
    volume: u16,
}

impl<P: PlaybackDevice> PresenceController<P> {
    /// Brings up the player and starts in [`PresenceState::Inactive`].
    pub fn new(mut player: P) -> Self {
        report(player.open(), "open");
        report(player.set_bit_rate(BIT_RATE_KBPS), "set bit rate");
        report(player.set_volume(INITIAL_ATTENUATION, INITIAL_ATTENUATION), "set volume");
        info!("Initializing event module");
        Self {
            player,
            state: PresenceState::Inactive,
            last_transition: 0,
            has_played_once: false,
            volume: DEFAULT_VOLUME,
        }
    }

    /// An object entered the sensing area. Returns whether playback was
    /// started or resumed.
    pub fn on_presence_detected(&mut self, now: u32) -> bool {
        let delta = now.wrapping_sub(self.last_transition);
        // Only the first activation can happen without a prior transition
        if self.is_active() || (self.has_played_once && delta < MIN_DWELL_MS) {
            return false;
        }

        self.last_transition = now;
        self.state = PresenceState::Active;

        if self.has_played_once {
            report(self.player.resume_stream(), "resume");
        } else {
            self.has_played_once = true;
            report(self.player.start_track(TRACK_NUMBER), "start track");
        }

        debug!("Sonar activated, delta (ms): {}", delta);
        true
    }

    /// The object left the sensing area. Returns whether playback was
    /// paused.
    pub fn on_presence_lost(&mut self, now: u32) -> bool {
        let delta = now.wrapping_sub(self.last_transition);
        if !self.is_active() || delta < MIN_DWELL_MS {
            return false;
        }

        self.last_transition = now;
        self.state = PresenceState::Inactive;

        report(self.player.pause_stream(), "pause");
        debug!("Sonar deactivated, delta (ms): {}", delta);
        true
    }

    pub fn update(&mut self, present: bool, now: u32) -> bool {
        if present {
            self.on_presence_detected(now)
        } else {
            self.on_presence_lost(now)
        }
    }
}

impl<P> PresenceController<P> {
    pub fn state(&self) -> PresenceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PresenceState::Active
    }

    pub fn has_played_once(&self) -> bool {
        self.has_played_once
    }

    pub fn volume(&self) -> u16 {
        self.volume
    }

    /// Timestamp of the last accepted transition.
    pub fn last_transition(&self) -> u32 {
        self.last_transition
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn release(self) -> P {
        self.player
    }
}

// Player commands are fire-and-forget; a failure never undoes a transition.
fn report<E: core::fmt::Debug>(res: Result<(), E>, what: &str) {
    if let Err(e) = res {
        warn!("MP3 player {} failed: {:?}", what, e);
    }
}
