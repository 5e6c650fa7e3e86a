//! The one-at-a-time pointer grab and the rubber-band outline drawn while it
//! is held

use x11rb::{
    errors::ConnectionError,
    protocol::xproto::{ConnectionExt as _, Gcontext, Rectangle, Timestamp, Window},
    rust_connection::RustConnection,
};

use crate::rect::Rect;

/// What an active grab is doing with the pointer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum GrabKind {
    Move,
    Resize,
    Teleport,
}

/// A grab in progress, alive from a button press to the matching release
#[derive(Debug, Copy, Clone)]
pub(crate) struct PointerGrab {
    pub(crate) kind: GrabKind,
    pub(crate) window: Window,
    pub(crate) button: u8,
    /// Move/Resize: pointer offset from the window origin at press time.
    /// Teleport: the raw press position, the first corner of the region
    pub(crate) anchor: (i16, i16),
}

impl PointerGrab {
    /// The geometry this grab stands for with the pointer at `(x, y)`:
    /// drawn as the outline during motion, committed verbatim on release
    pub(crate) fn target_rect(&self, x: i16, y: i16, current: &Rect) -> Rect {
        match self.kind {
            GrabKind::Move => Rect::new(
                (i32::from(x) - i32::from(self.anchor.0)) as i16,
                (i32::from(y) - i32::from(self.anchor.1)) as i16,
                current.width,
                current.height,
            ),
            GrabKind::Resize => Rect::new(
                current.x,
                current.y,
                (i32::from(x) - i32::from(current.x)).max(1) as u16,
                (i32::from(y) - i32::from(current.y)).max(1) as u16,
            ),
            GrabKind::Teleport => Rect::bounding(self.anchor, (x, y)),
        }
    }
}

/// All grab bookkeeping in one place, including the debounce clocks that
/// keep autorepeat presses and motion floods out
#[derive(Debug, Default)]
pub(crate) struct GrabState {
    active: Option<PointerGrab>,
    last_press: Timestamp,
    last_motion: Timestamp,
}

impl GrabState {
    /// Presses arriving faster than `min_interval` ms after the previous one
    /// are autorepeat artifacts and get dropped
    pub(crate) fn accept_press(&mut self, time: Timestamp, min_interval: u32) -> bool {
        if time.wrapping_sub(self.last_press) < min_interval {
            return false;
        }
        self.last_press = time;
        true
    }

    /// Motion events are sampled: anything faster than `min_interval` ms is
    /// skipped to bound how often we redraw
    pub(crate) fn accept_motion(&mut self, time: Timestamp, min_interval: u32) -> bool {
        if time.wrapping_sub(self.last_motion) < min_interval {
            return false;
        }
        self.last_motion = time;
        true
    }

    /// Start a grab; refused while another one is still held
    pub(crate) fn begin(&mut self, grab: PointerGrab) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(grab);
        true
    }

    pub(crate) fn current(&self) -> Option<PointerGrab> {
        self.active
    }

    /// Consume the grab on a matching release. A release for some other
    /// button leaves the grab exactly as it was
    pub(crate) fn release(&mut self, button: u8) -> Option<PointerGrab> {
        match self.active {
            Some(grab) if grab.button == button => self.active.take(),
            _ => None,
        }
    }

    /// Tear the grab down without committing anything
    pub(crate) fn abort(&mut self) -> Option<PointerGrab> {
        self.active.take()
    }
}

/// Rubber-band rectangle drawn with an inverting GC, so drawing the same
/// rectangle a second time erases it. At most one outline is ever live:
/// drawing a new one first redraws (and thereby clears) the previous one
#[derive(Debug)]
pub(crate) struct Outline {
    gc: Gcontext,
    last: Option<Rectangle>,
}

impl Outline {
    pub(crate) fn new(gc: Gcontext) -> Self {
        Self { gc, last: None }
    }

    pub(crate) fn draw(
        &mut self,
        conn: &RustConnection,
        root: Window,
        rect: Rect,
    ) -> Result<(), ConnectionError> {
        if let Some(prev) = self.last.take() {
            conn.poly_rectangle(root, self.gc, &[prev])?;
        }
        let rect = Rectangle::from(rect);
        conn.poly_rectangle(root, self.gc, &[rect])?;
        self.last = Some(rect);
        Ok(())
    }

    pub(crate) fn clear(
        &mut self,
        conn: &RustConnection,
        root: Window,
    ) -> Result<(), ConnectionError> {
        if let Some(prev) = self.last.take() {
            conn.poly_rectangle(root, self.gc, &[prev])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_grab() -> PointerGrab {
        PointerGrab {
            kind: GrabKind::Move,
            window: 0x42,
            button: 1,
            anchor: (20, 30),
        }
    }

    #[test]
    fn only_one_grab_at_a_time() {
        let mut state = GrabState::default();
        assert!(state.begin(move_grab()));
        assert!(!state.begin(PointerGrab {
            kind: GrabKind::Resize,
            window: 0x43,
            button: 3,
            anchor: (0, 0),
        }));
        assert_eq!(state.current().unwrap().window, 0x42);
    }

    #[test]
    fn foreign_release_does_not_reset_the_grab() {
        let mut state = GrabState::default();
        state.begin(move_grab());
        assert!(state.release(3).is_none());
        assert!(state.current().is_some());
        assert!(state.release(1).is_some());
        assert!(state.current().is_none());
    }

    #[test]
    fn release_without_grab_is_ignored() {
        let mut state = GrabState::default();
        assert!(state.release(1).is_none());
    }

    #[test]
    fn press_debounce_drops_autorepeat() {
        let mut state = GrabState::default();
        assert!(state.accept_press(1000, 8));
        assert!(!state.accept_press(1004, 8));
        assert!(state.accept_press(1012, 8));
    }

    #[test]
    fn press_debounce_survives_clock_wraparound() {
        let mut state = GrabState::default();
        assert!(state.accept_press(u32::MAX - 2, 8));
        // 6 ms after the wrap: still inside the window
        assert!(!state.accept_press(3, 8));
        assert!(state.accept_press(20, 8));
    }

    #[test]
    fn motion_debounce_samples_at_interval() {
        let mut state = GrabState::default();
        assert!(state.accept_motion(100, 32));
        assert!(!state.accept_motion(120, 32));
        assert!(state.accept_motion(140, 32));
    }

    #[test]
    fn move_commits_pointer_minus_anchor() {
        let grab = move_grab();
        let current = Rect::new(100, 100, 200, 100);
        let target = grab.target_rect(320, 340, &current);
        assert_eq!(target, Rect::new(300, 310, 200, 100));
    }

    #[test]
    fn resize_commits_pointer_minus_origin() {
        let grab = PointerGrab {
            kind: GrabKind::Resize,
            window: 0x42,
            button: 3,
            anchor: (5, 5),
        };
        let current = Rect::new(100, 100, 200, 100);
        assert_eq!(
            grab.target_rect(400, 250, &current),
            Rect::new(100, 100, 300, 150)
        );
        // dragging past the origin cannot produce a zero-sized window
        assert_eq!(
            grab.target_rect(50, 50, &current),
            Rect::new(100, 100, 1, 1)
        );
    }

    #[test]
    fn teleport_commits_the_bounding_rectangle() {
        let grab = PointerGrab {
            kind: GrabKind::Teleport,
            window: 0x42,
            button: 2,
            anchor: (500, 400),
        };
        let current = Rect::new(0, 0, 10, 10);
        assert_eq!(
            grab.target_rect(300, 550, &current),
            Rect::new(300, 400, 200, 150)
        );
    }
}
