mod controls;
mod playback;

pub use controls::{ControlOption, Menu, MenuDirection, MenuKind, Slider};
pub use playback::{AnimationPlayback, Easing, PlaybackState, TransitionOrigin, TransitionSpec};
