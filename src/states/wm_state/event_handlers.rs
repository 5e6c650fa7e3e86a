use anyhow::Result;
use x11rb::{protocol::xproto::*, NONE};

use crate::{
    rect::Rect,
    states::{GrabKind, PointerGrab},
};

use super::{Adoption, WindowType, WmState};

impl<'a> WmState<'a> {
    /// CreateNotify is the first thing a new window triggers; adopt it
    /// (unless it asked to be ignored) and republish the client list
    pub(crate) fn on_create(&mut self, event: &CreateNotifyEvent) -> Result<()> {
        if event.override_redirect {
            return Ok(());
        }
        log::debug!("CREATE_NOTIFY {:#010x}", event.window);

        if self.adopt(event.window)? == Adoption::Managed {
            self.update_client_list()?;
        }
        Ok(())
    }

    pub(crate) fn on_destroy(&mut self, event: &DestroyNotifyEvent) -> Result<()> {
        log::debug!("DESTROY_NOTIFY {:#010x}", event.window);
        self.windows.remove(&event.window);
        if self.focused == event.window {
            self.focused = self.root;
        }
        self.update_client_list()
    }

    /// A window wants on screen: map it, decorate it, focus it, and make
    /// sure it does not straddle its monitor's far edge
    pub(crate) fn on_map_request(&mut self, event: &MapRequestEvent) -> Result<()> {
        log::debug!("MAP_REQUEST {:#010x}", event.window);

        self.conn.map_window(event.window)?;
        self.conn.configure_window(
            event.window,
            &ConfigureWindowAux::new().border_width(u32::from(self.config.border_width)),
        )?;
        self.paint_border(event.window, false)?;
        self.set_focus(event.window)?;
        self.snap_to_edge(event.window)?;
        Ok(())
    }

    /// Popups jump the stack the moment they appear
    pub(crate) fn on_map_notify(&mut self, event: &MapNotifyEvent) -> Result<()> {
        if self.classify(event.window)? == WindowType::Popup {
            self.restack(event.window, StackMode::Above)?;
        }
        Ok(())
    }

    /// A modified button press starts an interactive operation: 1 moves,
    /// 3 resizes, 2 teleports the focused window, 4/5 inflate/deflate on
    /// the spot with no grab held
    pub(crate) fn on_button_press(&mut self, event: &ButtonPressEvent) -> Result<()> {
        if !self
            .grab
            .accept_press(event.time, self.config.press_interval_ms)
        {
            return Ok(());
        }

        let wid = if event.child != NONE {
            event.child
        } else {
            event.event
        };
        log::debug!("BUTTON_PRESS {:#010x} {}", wid, event.detail);

        match event.detail {
            1 | 3 => {
                if wid == self.root {
                    return Ok(());
                }
                let geom = match self.geometry(wid)? {
                    Some(geom) => geom,
                    None => return Ok(()),
                };
                let kind = if event.detail == 1 {
                    GrabKind::Move
                } else {
                    GrabKind::Resize
                };
                let grab = PointerGrab {
                    kind,
                    window: wid,
                    button: event.detail,
                    anchor: (event.root_x - geom.x, event.root_y - geom.y),
                };
                self.begin_grab(grab, self.grab_cursor(kind))?;
            }
            2 => {
                // teleport acts on the last focused window, not the one
                // under the pointer, and anchors on the press position
                if self.focused == self.root {
                    return Ok(());
                }
                let grab = PointerGrab {
                    kind: GrabKind::Teleport,
                    window: self.focused,
                    button: 2,
                    anchor: (event.root_x, event.root_y),
                };
                self.begin_grab(grab, self.grab_cursor(GrabKind::Teleport))?;
            }
            4 => self.inflate(wid, i32::from(self.config.inflate_step))?,
            5 => self.inflate(wid, -i32::from(self.config.inflate_step))?,
            _ => {}
        }
        Ok(())
    }

    /// A matching release commits whatever the grab was doing and raises
    /// the window; a release for any other button changes nothing
    pub(crate) fn on_button_release(&mut self, event: &ButtonPressEvent) -> Result<()> {
        let grab = match self.grab.release(event.detail) {
            Some(grab) => grab,
            None => return Ok(()),
        };
        log::debug!("BUTTON_RELEASE {:#010x} {}", grab.window, event.detail);

        self.end_grab()?;

        let geom = match self.geometry(grab.window)? {
            Some(geom) => geom,
            // it vanished mid-drag; nothing left to commit
            None => return Ok(()),
        };
        let target = grab.target_rect(event.root_x, event.root_y, &Rect::from(&geom));
        self.teleport(grab.window, target)?;
        self.restack(grab.window, StackMode::Above)?;
        Ok(())
    }

    /// Redraw the rubber band while a grab is held. Sampled, not per-pixel
    pub(crate) fn on_motion(&mut self, event: &MotionNotifyEvent) -> Result<()> {
        if !self
            .grab
            .accept_motion(event.time, self.config.motion_interval_ms)
        {
            return Ok(());
        }
        let grab = match self.grab.current() {
            Some(grab) => grab,
            None => return Ok(()),
        };
        let geom = match self.geometry(grab.window)? {
            Some(geom) => geom,
            None => return Ok(()),
        };

        let rect = grab.target_rect(event.root_x, event.root_y, &Rect::from(&geom));
        self.outline.draw(self.conn, self.root, rect)?;
        Ok(())
    }

    /// Focus follows the pointer, except while a grab is in flight
    pub(crate) fn on_enter(&mut self, event: &EnterNotifyEvent) -> Result<()> {
        if self.grab.current().is_some() {
            return Ok(());
        }
        if !self.windows.contains_key(&event.event) {
            return Ok(());
        }
        log::debug!("ENTER_NOTIFY {:#010x}", event.event);
        self.set_focus(event.event)
    }

    pub(crate) fn on_focus_in(&mut self, event: &FocusInEvent) -> Result<()> {
        log::debug!("FOCUS_IN {:#010x}", event.event);
        self.focused = event.event;
        if event.event == self.root {
            return Ok(());
        }
        self.paint_border(event.event, true)?;
        self.set_active_window(event.event)?;
        Ok(())
    }

    pub(crate) fn on_focus_out(&mut self, event: &FocusOutEvent) -> Result<()> {
        log::debug!("FOCUS_OUT {:#010x}", event.event);
        if event.event == self.root {
            return Ok(());
        }
        self.paint_border(event.event, false)
    }

    /// Substructure redirect hands us every configure request; honor the
    /// fields the client filled in and leave the rest as they are
    pub(crate) fn on_configure_request(&mut self, event: &ConfigureRequestEvent) -> Result<()> {
        log::debug!(
            "CONFIGURE_REQUEST {:#010x} {}x{}+{}+{}",
            event.window,
            event.width,
            event.height,
            event.x,
            event.y
        );

        let geom = match self.geometry(event.window)? {
            Some(geom) => geom,
            None => return Ok(()),
        };

        let mut target = Rect::from(&geom);
        if event.value_mask & u16::from(ConfigWindow::X) != 0 {
            target.x = event.x;
        }
        if event.value_mask & u16::from(ConfigWindow::Y) != 0 {
            target.y = event.y;
        }
        if event.value_mask & u16::from(ConfigWindow::Width) != 0 {
            target.width = event.width;
        }
        if event.value_mask & u16::from(ConfigWindow::Height) != 0 {
            target.height = event.height;
        }
        self.teleport(event.window, target)?;

        if event.value_mask & u16::from(ConfigWindow::BorderWidth) != 0 {
            self.conn.configure_window(
                event.window,
                &ConfigureWindowAux::new().border_width(u32::from(event.border_width)),
            )?;
            self.paint_border(event.window, self.focused == event.window)?;
        }
        if event.value_mask & u16::from(ConfigWindow::StackMode) != 0 {
            self.restack(event.window, event.stack_mode)?;
        }
        Ok(())
    }

    /// Keep the cached screen size current, and repaint borders whose
    /// pixmap dimensions just went stale
    pub(crate) fn on_configure_notify(&mut self, event: &ConfigureNotifyEvent) -> Result<()> {
        if event.window == self.root {
            self.screen_width = event.width;
            self.screen_height = event.height;
            return Ok(());
        }

        let resized = match self.windows.get_mut(&event.window) {
            Some(win) if win.width != event.width || win.height != event.height => {
                win.width = event.width;
                win.height = event.height;
                true
            }
            _ => false,
        };
        if resized {
            self.paint_border(event.window, self.focused == event.window)?;
        }
        Ok(())
    }

    /// The only client message we speak is _NET_WM_STATE fullscreen
    pub(crate) fn on_client_message(&mut self, event: &ClientMessageEvent) -> Result<()> {
        if event.type_ != self.atoms.net_wm_state {
            return Ok(());
        }
        let data = event.data.as_data32();
        if data[1] != self.atoms.net_wm_state_fullscreen
            && data[2] != self.atoms.net_wm_state_fullscreen
        {
            return Ok(());
        }

        match data[0] {
            0 => self.fullscreen_remove(event.window),
            1 => self.fullscreen_add(event.window),
            2 => self.fullscreen_toggle(event.window),
            _ => Ok(()),
        }
    }
}
