//! Screen-space rectangles and the small amount of placement math the
//! window manager does with them

use x11rb::protocol::xproto::{GetGeometryReply, Rectangle};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Rect {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Rect {
    pub(crate) fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn contains_point(&self, x: i16, y: i16) -> bool {
        x >= self.x
            && i32::from(x) <= i32::from(self.x) + i32::from(self.width)
            && y >= self.y
            && i32::from(y) <= i32::from(self.y) + i32::from(self.height)
    }

    /// The smallest rectangle with `a` and `b` as opposite corners
    pub(crate) fn bounding(a: (i16, i16), b: (i16, i16)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (i32::from(a.0) - i32::from(b.0)).unsigned_abs().max(1) as u16,
            height: (i32::from(a.1) - i32::from(b.1)).unsigned_abs().max(1) as u16,
        }
    }

    /// Grow (or, with a negative step, shrink) every edge by `step / 2`,
    /// keeping the center put. Never collapses below 1x1
    pub(crate) fn inflated(&self, step: i32) -> Self {
        Self {
            x: (i32::from(self.x) - step / 2) as i16,
            y: (i32::from(self.y) - step / 2) as i16,
            width: (i32::from(self.width) + step).max(1) as u16,
            height: (i32::from(self.height) + step).max(1) as u16,
        }
    }
}

impl From<(i16, i16, u16, u16)> for Rect {
    fn from(r: (i16, i16, u16, u16)) -> Self {
        Self {
            x: r.0,
            y: r.1,
            width: r.2,
            height: r.3,
        }
    }
}

impl From<&GetGeometryReply> for Rect {
    fn from(geom: &GetGeometryReply) -> Self {
        Self {
            x: geom.x,
            y: geom.y,
            width: geom.width,
            height: geom.height,
        }
    }
}

impl From<Rect> for Rectangle {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

/// Where a fresh window of `size` goes so its center sits under `pointer`,
/// clamped so it never starts above or left of `origin`
pub(crate) fn centered_at(pointer: (i16, i16), size: (u16, u16), origin: (i16, i16)) -> (i16, i16) {
    let x = i32::from(pointer.0) - i32::from(size.0) / 2;
    let y = i32::from(pointer.1) - i32::from(size.1) / 2;
    (
        x.max(i32::from(origin.0)) as i16,
        y.max(i32::from(origin.1)) as i16,
    )
}

/// Whether `win` (content rectangle plus `border` on every side) pokes out
/// past the right or bottom edge of `mon`
pub(crate) fn crosses_far_edge(win: &Rect, border: u16, mon: &Rect) -> bool {
    let b = i32::from(border);
    i32::from(win.x) + i32::from(win.width) + 2 * b > i32::from(mon.x) + i32::from(mon.width)
        || i32::from(win.y) + i32::from(win.height) + 2 * b
            > i32::from(mon.y) + i32::from(mon.height)
}

/// Fit `win` inside `mon`: shrink it if it cannot fit at all, then slide it
/// back just far enough that the whole bounding box (border included) is on
/// the monitor. Running it twice changes nothing
pub(crate) fn snapped_inside(win: &Rect, border: u16, mon: &Rect) -> Rect {
    let b = 2 * i32::from(border);
    let (mon_r, mon_b) = (
        i32::from(mon.x) + i32::from(mon.width),
        i32::from(mon.y) + i32::from(mon.height),
    );

    let width = i32::from(win.width).min(i32::from(mon.width) - b).max(1);
    let height = i32::from(win.height).min(i32::from(mon.height) - b).max(1);

    let mut x = i32::from(win.x);
    let mut y = i32::from(win.y);
    if x + width + b > mon_r {
        x = mon_r - width - b;
    }
    if y + height + b > mon_b {
        y = mon_b - height - b;
    }
    x = x.max(i32::from(mon.x));
    y = y.max(i32::from(mon.y));

    Rect::new(x as i16, y as i16, width as u16, height as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_from_any_corner_pair() {
        let a = Rect::bounding((10, 10), (50, 30));
        let b = Rect::bounding((50, 30), (10, 10));
        assert_eq!(a, b);
        assert_eq!(a, Rect::new(10, 10, 40, 20));
    }

    #[test]
    fn inflate_keeps_center() {
        let r = Rect::new(100, 100, 50, 50).inflated(8);
        assert_eq!(r, Rect::new(96, 96, 58, 58));
        assert_eq!(r.inflated(-8), Rect::new(100, 100, 50, 50));
    }

    #[test]
    fn deflate_never_collapses() {
        let r = Rect::new(0, 0, 4, 4).inflated(-8);
        assert_eq!(r.width, 1);
        assert_eq!(r.height, 1);
    }

    #[test]
    fn centering_clamps_to_monitor_origin() {
        // pointer near the monitor corner: the window may not start off-screen
        assert_eq!(centered_at((20, 20), (200, 100), (0, 0)), (0, 0));
        assert_eq!(centered_at((500, 400), (200, 100), (0, 0)), (400, 350));
        // a monitor that does not start at the global origin clamps to its own corner
        assert_eq!(centered_at((1930, 10), (200, 100), (1920, 0)), (1920, 0));
    }

    #[test]
    fn snap_pulls_back_over_the_far_edge() {
        let mon = Rect::new(0, 0, 1920, 1080);
        let win = Rect::new(1900, 1060, 200, 100);
        let snapped = snapped_inside(&win, 2, &mon);
        assert_eq!(snapped, Rect::new(1716, 976, 200, 100));
        assert!(!crosses_far_edge(&snapped, 2, &mon));
    }

    #[test]
    fn snap_shrinks_what_cannot_fit() {
        let mon = Rect::new(0, 0, 800, 600);
        let win = Rect::new(100, 100, 1000, 700);
        let snapped = snapped_inside(&win, 4, &mon);
        assert_eq!(snapped, Rect::new(0, 0, 792, 592));
    }

    #[test]
    fn snap_is_idempotent() {
        let mon = Rect::new(0, 0, 1920, 1080);
        for win in [
            Rect::new(1900, 500, 640, 480),
            Rect::new(-40, -20, 640, 480),
            Rect::new(200, 200, 4000, 4000),
        ] {
            let once = snapped_inside(&win, 8, &mon);
            let twice = snapped_inside(&once, 8, &mon);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn snap_leaves_fitting_windows_alone() {
        let mon = Rect::new(0, 0, 1920, 1080);
        let win = Rect::new(100, 100, 640, 480);
        assert!(!crosses_far_edge(&win, 8, &mon));
        assert_eq!(snapped_inside(&win, 8, &mon), win);
    }
}
