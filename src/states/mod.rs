pub(crate) mod grab_state;
pub(crate) mod win_state;
pub(crate) mod wm_state;

pub(crate) use {
    grab_state::{GrabKind, GrabState, Outline, PointerGrab},
    win_state::{Fullscreen, SavedGeometry, WinState},
    wm_state::WmState,
};
