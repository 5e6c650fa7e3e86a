use x11rb::protocol::xproto::{GetGeometryReply, Window};

/// Geometry stashed away while a window is fullscreen
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct SavedGeometry {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) border_width: u16,
}

impl SavedGeometry {
    pub(crate) fn from_reply(geom: &GetGeometryReply) -> Self {
        Self {
            x: geom.x,
            y: geom.y,
            width: geom.width,
            height: geom.height,
            border_width: geom.border_width,
        }
    }

    /// The five CARDINAL words of the marker property. Positions are stored
    /// two's-complement so off-screen coordinates survive the round trip
    pub(crate) fn to_words(self) -> [u32; 5] {
        [
            i32::from(self.x) as u32,
            i32::from(self.y) as u32,
            u32::from(self.width),
            u32::from(self.height),
            u32::from(self.border_width),
        ]
    }

    pub(crate) fn from_words(words: &[u32]) -> Option<Self> {
        if words.len() < 5 {
            return None;
        }
        Some(Self {
            x: words[0] as i32 as i16,
            y: words[1] as i32 as i16,
            width: words[2] as u16,
            height: words[3] as u16,
            border_width: words[4] as u16,
        })
    }
}

/// Whether a window is fullscreen right now, and if so what to restore when
/// it stops being fullscreen
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Fullscreen {
    Normal,
    Fullscreen { saved: SavedGeometry },
}

#[derive(Debug)]
pub(crate) struct WinState {
    pub(crate) id: Window,
    /// The last size we saw, to tell a resize from a plain move
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) fullscreen: Fullscreen,
}

impl WinState {
    pub(crate) fn new(win: Window, geom: &GetGeometryReply) -> Self {
        Self {
            id: win,
            width: geom.width,
            height: geom.height,
            fullscreen: Fullscreen::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SavedGeometry;

    #[test]
    fn geometry_survives_the_property_round_trip() {
        let geometry = SavedGeometry {
            x: 10,
            y: 20,
            width: 300,
            height: 200,
            border_width: 2,
        };
        assert_eq!(
            SavedGeometry::from_words(&geometry.to_words()),
            Some(geometry)
        );
    }

    #[test]
    fn negative_positions_survive_too() {
        let geometry = SavedGeometry {
            x: -64,
            y: -12,
            width: 640,
            height: 480,
            border_width: 8,
        };
        assert_eq!(
            SavedGeometry::from_words(&geometry.to_words()),
            Some(geometry)
        );
    }

    #[test]
    fn truncated_properties_are_rejected() {
        assert_eq!(SavedGeometry::from_words(&[1, 2, 3, 4]), None);
        assert_eq!(SavedGeometry::from_words(&[]), None);
    }
}
