//! End-to-end scenarios over the pure core: the X-facing plumbing is thin
//! enough that the interesting behavior lives in this math

use crate::{
    rect::{self, Rect},
    states::{GrabKind, GrabState, PointerGrab},
};

#[test]
fn fresh_window_is_centered_on_the_pointer() {
    // a 200x100 window created at the origin while the pointer sits at
    // (500, 400) on a 1920x1080 monitor lands at pointer minus half extents
    let monitor = Rect::new(0, 0, 1920, 1080);
    let placed = rect::centered_at((500, 400), (200, 100), (monitor.x, monitor.y));
    assert_eq!(placed, (400, 350));

    // near the corner it clamps to the monitor origin instead of going
    // negative
    let placed = rect::centered_at((30, 10), (200, 100), (monitor.x, monitor.y));
    assert_eq!(placed, (0, 0));
}

#[test]
fn move_grab_commits_where_the_pointer_dropped_it() {
    let mut grabs = GrabState::default();
    let window = Rect::new(100, 100, 640, 480);

    // press at (120, 130) on a window at (100, 100): anchor is the offset
    let press = (120_i16, 130_i16);
    assert!(grabs.accept_press(1_000, 8));
    let grab = PointerGrab {
        kind: GrabKind::Move,
        window: 0x77,
        button: 1,
        anchor: (press.0 - window.x, press.1 - window.y),
    };
    assert!(grabs.begin(grab));
    assert_eq!(grab.anchor, (20, 30));

    // motion to (300, 300) outlines the window at pointer minus anchor
    assert!(grabs.accept_motion(1_100, 32));
    let outline = grab.target_rect(300, 300, &window);
    assert_eq!(outline, Rect::new(280, 270, 640, 480));

    // release at (320, 340) commits (300, 310) with the size untouched
    let done = grabs.release(1).unwrap();
    assert_eq!(
        done.target_rect(320, 340, &window),
        Rect::new(300, 310, 640, 480)
    );
    assert!(grabs.current().is_none());
}

#[test]
fn teleport_region_is_the_bounding_box_of_both_corners() {
    let grab = PointerGrab {
        kind: GrabKind::Teleport,
        window: 0x77,
        button: 2,
        anchor: (800, 600),
    };
    // sweeping up-left gives the same region as sweeping down-right
    let a = grab.target_rect(200, 150, &Rect::new(0, 0, 1, 1));
    assert_eq!(a, Rect::new(200, 150, 600, 450));
}

#[test]
fn dragging_over_the_edge_then_snapping_stays_put() {
    let monitor = Rect::new(0, 0, 1920, 1080);
    let grab = PointerGrab {
        kind: GrabKind::Move,
        window: 0x77,
        button: 1,
        anchor: (10, 10),
    };

    // dropped half off the right edge
    let dropped = grab.target_rect(1900, 500, &Rect::new(0, 0, 640, 480));
    assert!(rect::crosses_far_edge(&dropped, 8, &monitor));

    let snapped = rect::snapped_inside(&dropped, 8, &monitor);
    assert!(!rect::crosses_far_edge(&snapped, 8, &monitor));
    assert_eq!(snapped, rect::snapped_inside(&snapped, 8, &monitor));
    assert_eq!(snapped.width, 640);
}
