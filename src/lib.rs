pub mod action;
pub mod audio;
pub mod builder;
pub mod input;
pub mod session;

pub use action::{RemoteAction, TabletopAction};
pub use audio::AudioMixer;
pub use builder::{BuildResult, BuildState, BuildTool};
pub use input::{clamp_to_canvas, MovementKey, MovementLoop};
pub use session::{SessionSubscription, TabletopHooks, TabletopSession};
