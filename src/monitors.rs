//! Multi-monitor geometry through RandR

use x11rb::{
    errors::ReplyError,
    protocol::{randr::ConnectionExt as _, xproto::Window},
    rust_connection::RustConnection,
};

use crate::rect::Rect;

/// Geometry of the active monitor containing the point, if any.
///
/// The layout is queried fresh on every call; it can change under us on a
/// hotplug, and during a reconfiguration a point may briefly lie on no
/// monitor at all
pub(crate) fn monitor_at(
    conn: &RustConnection,
    root: Window,
    x: i16,
    y: i16,
) -> Result<Option<Rect>, ReplyError> {
    let reply = conn.randr_get_monitors(root, true)?.reply()?;

    Ok(reply
        .monitors
        .iter()
        .map(|m| Rect::new(m.x, m.y, m.width, m.height))
        .find(|m| m.contains_point(x, y)))
}
