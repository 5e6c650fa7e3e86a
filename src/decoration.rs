//! Window borders, painted into per-window border pixmaps.
//!
//! The border body picks up a color sampled from the window's own content
//! (one pixel near a corner), and the outermost ring carries the accent
//! color that tells the focused window apart from the rest.

use anyhow::Result;
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    protocol::xproto::*,
};

use crate::{errors::WmError, states::WmState};

/// The two strips that form the accent ring, in pixmap coordinates.
///
/// The border pixmap is tiled with its origin glued to the window's origin,
/// so the visible border corresponds to the strips beyond `width`/`height`.
/// A band of `2 * inner` centered on the outer seam covers the outermost
/// `inner` pixels of the border on all four sides
pub(crate) fn accent_bands(width: u16, height: u16, border: u16, inner: u16) -> [Rectangle; 2] {
    [
        Rectangle {
            x: (width + border - inner) as i16,
            y: 0,
            width: 2 * inner,
            height: height + 2 * border,
        },
        Rectangle {
            x: 0,
            y: (height + border - inner) as i16,
            width: width + 2 * border,
            height: 2 * inner,
        },
    ]
}

impl<'a> WmState<'a> {
    /// Repaint one window's border, focused or not.
    ///
    /// Tolerates the window disappearing at any point; refuses up front if
    /// the configured accent ring would not fit inside the border
    pub(crate) fn paint_border(&self, window: Window, focused: bool) -> Result<()> {
        let geom = match self.geometry(window)? {
            Some(geom) => geom,
            None => return Ok(()),
        };
        if geom.border_width == 0 {
            return Ok(());
        }

        let border = geom.border_width;
        let inner = self.config.inner_border_width;
        if inner > border {
            return Err(WmError::InnerBorderTooWide {
                inner,
                total: border,
            }
            .into());
        }

        let body = self
            .sample_corner(window, &geom)?
            .unwrap_or_else(|| u32::from(self.config.fallback_border_color));
        let accent = if focused {
            u32::from(self.config.active_border_color)
        } else {
            u32::from(self.config.normal_border_color)
        };

        let width = geom.width + 2 * border;
        let height = geom.height + 2 * border;

        let pixmap = self.conn.generate_id()?;
        self.conn
            .create_pixmap(geom.depth, pixmap, window, width, height)?;
        let gc = self.conn.generate_id()?;
        self.conn
            .create_gc(gc, pixmap, &CreateGCAux::new().foreground(body))?;

        self.conn.poly_fill_rectangle(
            pixmap,
            gc,
            &[Rectangle {
                x: 0,
                y: 0,
                width,
                height,
            }],
        )?;
        if inner > 0 {
            self.conn
                .change_gc(gc, &ChangeGCAux::new().foreground(accent))?;
            self.conn.poly_fill_rectangle(
                pixmap,
                gc,
                &accent_bands(geom.width, geom.height, border, inner),
            )?;
        }

        self.conn.change_window_attributes(
            window,
            &ChangeWindowAttributesAux::default().border_pixmap(pixmap),
        )?;
        // the server keeps the border contents alive; we can drop our ids
        self.conn.free_gc(gc)?;
        self.conn.free_pixmap(pixmap)?;
        Ok(())
    }

    /// One unobstructed pixel near a corner of the window, tried in a fixed
    /// order; `None` when every probe is covered or black
    fn sample_corner(&self, window: Window, geom: &GetGeometryReply) -> Result<Option<u32>> {
        let right = geom.width.saturating_sub(2);
        let bottom = geom.height.saturating_sub(2);
        let probes = [(1, 1), (right, 1), (1, bottom), (right, bottom)];

        for (x, y) in probes {
            let image = self.conn.get_image(
                ImageFormat::ZPixmap,
                window,
                x as i16,
                y as i16,
                1,
                1,
                u32::MAX,
            )?;
            match image.reply() {
                Ok(reply) => {
                    if let Some(pixel) = first_pixel(&reply.data) {
                        if pixel != 0 {
                            return Ok(Some(pixel));
                        }
                    }
                }
                // unmapped, obscured or gone; try the next corner
                Err(ReplyError::X11Error(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(None)
    }
}

fn first_pixel(data: &[u8]) -> Option<u32> {
    if data.is_empty() {
        return None;
    }
    let mut pixel = [0u8; 4];
    for (byte, out) in data.iter().zip(pixel.iter_mut()) {
        *out = *byte;
    }
    Some(u32::from_le_bytes(pixel))
}

#[cfg(test)]
mod tests {
    use super::{accent_bands, first_pixel};

    #[test]
    fn bands_cover_the_outer_ring() {
        let (width, height, border, inner) = (200, 100, 8, 2);
        let [vertical, horizontal] = accent_bands(width, height, border, inner);

        // centered on the outer seam, `inner` on each side of it
        assert_eq!(vertical.x, 206);
        assert_eq!(vertical.width, 4);
        assert_eq!(vertical.height, height + 2 * border);
        assert_eq!(horizontal.y, 106);
        assert_eq!(horizontal.height, 4);
        assert_eq!(horizontal.width, width + 2 * border);
    }

    #[test]
    fn bands_stay_inside_the_pixmap() {
        let (width, height, border, inner) = (640, 480, 8, 8);
        let [vertical, horizontal] = accent_bands(width, height, border, inner);
        assert!(vertical.x as u16 + vertical.width <= width + 2 * border);
        assert!(horizontal.y as u16 + horizontal.height <= height + 2 * border);
    }

    #[test]
    fn pixels_decode_little_endian() {
        assert_eq!(first_pixel(&[0xCA, 0xAD, 0xDE, 0x00]), Some(0x00DE_ADCA));
        assert_eq!(first_pixel(&[0x42]), Some(0x42));
        assert_eq!(first_pixel(&[]), None);
    }
}
