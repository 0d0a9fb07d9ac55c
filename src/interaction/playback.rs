use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Easing curve advertised to renderers; interpolation itself is theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    #[default]
    CubicInOut,
    SinInOut,
    ExpInOut,
    ElasticInOut,
    BackInOut,
    BounceInOut,
}

fn default_duration_ms() -> u64 {
    500
}

/// Timing requested by an `animate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Time to move from the previous frame to the target.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default)]
    pub easing: Easing,
    /// Time a frame stays on screen before the next playlist entry starts.
    #[serde(default = "default_duration_ms")]
    pub frame_duration_ms: u64,
    /// For play-all requests, continue after the frame currently shown.
    #[serde(default)]
    pub from_current: bool,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: Easing::default(),
            frame_duration_ms: default_duration_ms(),
            from_current: false,
        }
    }
}

impl TransitionSpec {
    /// Zero-duration transition used for scrubbing and pausing.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            duration_ms: 0,
            easing: Easing::Linear,
            frame_duration_ms: 0,
            from_current: false,
        }
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    #[must_use]
    pub fn with_frame_duration_ms(mut self, frame_duration_ms: u64) -> Self {
        self.frame_duration_ms = frame_duration_ms;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn from_current(mut self, from_current: bool) -> Self {
        self.from_current = from_current;
        self
    }
}

/// Where a transition starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum TransitionOrigin {
    Frame {
        name: String,
    },
    /// A transition was cancelled part way; the renderer's current visual
    /// state is somewhere between its origin and `toward`.
    Interpolated {
        toward: String,
        progress: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Showing {
        frame: String,
    },
    Transitioning {
        from: TransitionOrigin,
        to: String,
        elapsed_ms: u64,
        duration_ms: u64,
    },
}

impl PlaybackState {
    /// Frame whose snapshot is displayed (the target while transitioning).
    #[must_use]
    pub fn target_frame(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Showing { frame } => Some(frame),
            Self::Transitioning { to, .. } => Some(to),
        }
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self, Self::Transitioning { .. })
    }

    /// Linear progress of the running transition in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Transitioning {
                elapsed_ms,
                duration_ms,
                ..
            } if *duration_ms > 0 => Some((*elapsed_ms as f64 / *duration_ms as f64).min(1.0)),
            _ => None,
        }
    }
}

/// Animation clock state owned by a figure.
///
/// Requests never queue: each `request` replaces the running transition and
/// playlist. Time only moves through `advance`, fed by the renderer's clock.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationPlayback {
    state: PlaybackState,
    #[serde(default)]
    playlist: VecDeque<String>,
    #[serde(default)]
    hold_ms: u64,
    #[serde(default)]
    spec: TransitionSpec,
}

impl AnimationPlayback {
    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub fn active_frame(&self) -> Option<&str> {
        self.state.target_frame()
    }

    /// Frames still waiting to be shown, in order.
    pub fn playlist(&self) -> impl Iterator<Item = &str> {
        self.playlist.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_transitioning() || !self.playlist.is_empty()
    }

    #[must_use]
    pub fn spec(&self) -> TransitionSpec {
        self.spec
    }

    /// Starts moving toward `frames[0]` and queues the rest as a playlist.
    ///
    /// An empty list pauses: the playlist is dropped and a running
    /// transition collapses onto its target.
    pub(crate) fn request(&mut self, frames: Vec<String>, spec: TransitionSpec) {
        self.spec = spec;
        let mut playlist = VecDeque::from(frames);
        match playlist.pop_front() {
            Some(first) => {
                self.playlist = playlist;
                self.start(first);
            }
            None => {
                self.playlist.clear();
                self.settle();
            }
        }
    }

    /// Advances the clock by `delta_ms`.
    ///
    /// Returns `true` when the displayed frame or the state kind changed.
    pub(crate) fn advance(&mut self, delta_ms: u64) -> bool {
        let mut remaining = delta_ms;
        let mut changed = false;
        loop {
            match &mut self.state {
                PlaybackState::Idle => return changed,
                PlaybackState::Transitioning {
                    to,
                    elapsed_ms,
                    duration_ms,
                    ..
                } => {
                    let needed = duration_ms.saturating_sub(*elapsed_ms);
                    if remaining < needed {
                        *elapsed_ms += remaining;
                        return changed;
                    }
                    remaining -= needed;
                    let frame = std::mem::take(to);
                    self.state = PlaybackState::Showing { frame };
                    self.hold_ms = 0;
                    changed = true;
                }
                PlaybackState::Showing { .. } => {
                    if self.playlist.is_empty() {
                        return changed;
                    }
                    let needed = self.spec.frame_duration_ms.saturating_sub(self.hold_ms);
                    if remaining < needed {
                        self.hold_ms += remaining;
                        return changed;
                    }
                    remaining -= needed;
                    if let Some(next) = self.playlist.pop_front() {
                        self.start(next);
                        changed = true;
                    }
                }
            }
        }
    }

    fn start(&mut self, target: String) {
        self.hold_ms = 0;
        let duration_ms = self.spec.duration_ms;
        self.state = match std::mem::take(&mut self.state) {
            PlaybackState::Idle => PlaybackState::Showing { frame: target },
            PlaybackState::Showing { frame } if duration_ms == 0 || frame == target => {
                PlaybackState::Showing { frame: target }
            }
            PlaybackState::Showing { frame } => PlaybackState::Transitioning {
                from: TransitionOrigin::Frame { name: frame },
                to: target,
                elapsed_ms: 0,
                duration_ms,
            },
            PlaybackState::Transitioning { .. } if duration_ms == 0 => {
                PlaybackState::Showing { frame: target }
            }
            running @ PlaybackState::Transitioning { .. } => {
                let progress = running.progress().unwrap_or(1.0);
                let toward = running.target_frame().unwrap_or_default().to_owned();
                PlaybackState::Transitioning {
                    from: TransitionOrigin::Interpolated { toward, progress },
                    to: target,
                    elapsed_ms: 0,
                    duration_ms,
                }
            }
        };
    }

    fn settle(&mut self) {
        self.hold_ms = 0;
        if let PlaybackState::Transitioning { to, .. } = &mut self.state {
            let frame = std::mem::take(to);
            self.state = PlaybackState::Showing { frame };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationPlayback, PlaybackState, TransitionOrigin, TransitionSpec};

    fn names(frames: &[&str]) -> Vec<String> {
        frames.iter().map(|frame| (*frame).to_owned()).collect()
    }

    #[test]
    fn first_request_shows_frame_directly() {
        let mut playback = AnimationPlayback::default();
        playback.request(names(&["1902"]), TransitionSpec::default());
        assert_eq!(
            playback.state(),
            &PlaybackState::Showing {
                frame: "1902".to_owned()
            }
        );
    }

    #[test]
    fn transition_completes_when_clock_reaches_duration() {
        let mut playback = AnimationPlayback::default();
        let spec = TransitionSpec::default().with_duration_ms(300);
        playback.request(names(&["a"]), spec);
        playback.request(names(&["b"]), spec);
        assert!(playback.state().is_transitioning());

        assert!(!playback.advance(299));
        assert!(playback.state().is_transitioning());
        assert!(playback.advance(1));
        assert_eq!(playback.active_frame(), Some("b"));
        assert!(!playback.state().is_transitioning());
    }

    #[test]
    fn new_request_mid_transition_restarts_from_interpolated_state() {
        let mut playback = AnimationPlayback::default();
        let spec = TransitionSpec::default().with_duration_ms(400);
        playback.request(names(&["a"]), spec);
        playback.request(names(&["b"]), spec);
        playback.advance(100);
        playback.request(names(&["c"]), spec);

        match playback.state() {
            PlaybackState::Transitioning {
                from: TransitionOrigin::Interpolated { toward, progress },
                to,
                elapsed_ms,
                ..
            } => {
                assert_eq!(toward, "b");
                assert!((progress - 0.25).abs() <= 1e-12);
                assert_eq!(to, "c");
                assert_eq!(*elapsed_ms, 0);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn playlist_advances_after_frame_duration() {
        let mut playback = AnimationPlayback::default();
        let spec = TransitionSpec::default()
            .with_duration_ms(100)
            .with_frame_duration_ms(200);
        playback.request(names(&["a", "b", "c"]), spec);
        assert_eq!(playback.active_frame(), Some("a"));

        playback.advance(200);
        assert_eq!(playback.active_frame(), Some("b"));
        assert!(playback.state().is_transitioning());

        // 100ms to land on b, 200ms hold, 100ms to land on c.
        playback.advance(400);
        assert_eq!(playback.active_frame(), Some("c"));
        playback.advance(100);
        assert!(!playback.is_playing());
    }

    #[test]
    fn pause_collapses_running_transition() {
        let mut playback = AnimationPlayback::default();
        let spec = TransitionSpec::default().with_duration_ms(500);
        playback.request(names(&["a", "b", "c"]), spec);
        playback.advance(spec.frame_duration_ms + 10);
        assert!(playback.state().is_transitioning());

        playback.request(Vec::new(), TransitionSpec::immediate());
        assert_eq!(
            playback.state(),
            &PlaybackState::Showing {
                frame: "b".to_owned()
            }
        );
        assert_eq!(playback.playlist().count(), 0);
    }
}
