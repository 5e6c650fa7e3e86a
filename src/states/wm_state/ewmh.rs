//! The EWMH side of the window manager: what other clients read to learn
//! which windows exist, which one is active, and what kind each one is

use anyhow::Result;
use x11rb::{
    connection::Connection,
    protocol::xproto::*,
    wrapper::ConnectionExt as _,
    COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT,
};

use crate::{
    atoms::Atoms,
    rect::Rect,
    states::{Fullscreen, SavedGeometry},
};

use super::WmState;

/// What a window's type hints make of it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum WindowType {
    /// Docks, desktops and the like: never managed, never listed
    Ignore,
    Normal,
    /// Menus, tooltips, notifications: listed but raised on map
    Popup,
}

/// Classify from an ordered `_NET_WM_WINDOW_TYPE` list.
///
/// Per the EWMH spec, multiple types are listed from most to least
/// important. We cycle through them in reverse order, changing the running
/// type every time a known atom is encountered, so the first (most
/// important) entry is applied last and wins. Some toolkits like to put
/// toolkit-specific atoms first; those are simply skipped
pub(crate) fn classify_list(atoms: &Atoms, types: &[Atom]) -> WindowType {
    let mut window_type = WindowType::Normal;

    for &atom in types.iter().rev() {
        if atom == atoms.net_wm_window_type_desktop
            || atom == atoms.net_wm_window_type_dock
            || atom == atoms.net_wm_window_type_toolbar
            || atom == atoms.net_wm_window_type_popup_menu
            || atom == atoms.net_wm_window_type_combo
            || atom == atoms.net_wm_window_type_dnd
        {
            window_type = WindowType::Ignore;
        }

        if atom == atoms.net_wm_window_type_menu
            || atom == atoms.net_wm_window_type_splash
            || atom == atoms.net_wm_window_type_dropdown_menu
            || atom == atoms.net_wm_window_type_tooltip
            || atom == atoms.net_wm_window_type_notification
        {
            window_type = WindowType::Popup;
        }

        if atom == atoms.net_wm_window_type_dialog
            || atom == atoms.net_wm_window_type_utility
            || atom == atoms.net_wm_window_type_normal
        {
            window_type = WindowType::Normal;
        }
    }

    window_type
}

impl<'a> WmState<'a> {
    /// Advertise ourselves: the supported-atoms list, the supporting-WM
    /// marker window, and a first client list
    pub(super) fn init_ewmh(&mut self) -> Result<()> {
        let check = self.conn.generate_id()?;
        // the dummyest window ever: input-only, one pixel, ignored by
        // ourselves through override-redirect
        self.conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            check,
            self.root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::InputOnly,
            COPY_FROM_PARENT,
            &CreateWindowAux::new().override_redirect(1),
        )?;
        self.conn.change_property32(
            PropMode::Replace,
            self.root,
            self.atoms.net_supporting_wm_check,
            AtomEnum::WINDOW,
            &[check],
        )?;
        self.conn.change_property32(
            PropMode::Replace,
            check,
            self.atoms.net_supporting_wm_check,
            AtomEnum::WINDOW,
            &[check],
        )?;
        self.check_window = check;

        self.conn.change_property32(
            PropMode::Replace,
            self.root,
            self.atoms.net_supported,
            AtomEnum::ATOM,
            &self.atoms.supported(),
        )?;
        Ok(())
    }

    /// Undo `init_ewmh` and drop our private markers; ran once at shutdown
    pub(super) fn wipe_ewmh(&mut self) -> Result<()> {
        for atom in [
            self.atoms.net_supported,
            self.atoms.net_client_list,
            self.atoms.net_client_list_stacking,
            self.atoms.net_active_window,
            self.atoms.net_supporting_wm_check,
        ] {
            self.conn.delete_property(self.root, atom)?;
        }

        let fullscreen: Vec<Window> = self
            .windows
            .values()
            .filter(|win| matches!(win.fullscreen, Fullscreen::Fullscreen { .. }))
            .map(|win| win.id)
            .collect();
        for win in fullscreen {
            self.conn.delete_property(win, self.atoms.saved_geometry)?;
        }

        self.conn.destroy_window(self.check_window)?;
        Ok(())
    }

    /// The type of one window, read fresh from its property
    pub(crate) fn classify(&self, window: Window) -> Result<WindowType> {
        let types = self.property32(window, self.atoms.net_wm_window_type, AtomEnum::ATOM)?;
        Ok(match types {
            // treat non-ewmh windows as normal windows
            None => WindowType::Normal,
            Some(types) => classify_list(&self.atoms, &types),
        })
    }

    /// Rebuild `_NET_CLIENT_LIST` and `_NET_CLIENT_LIST_STACKING` from a
    /// fresh enumeration. IGNORE-classified windows are additionally marked
    /// override-redirect so the next enumeration skips them without the
    /// classification round trip
    pub(crate) fn update_client_list(&mut self) -> Result<()> {
        let tree = self.conn.query_tree(self.root)?.reply()?;

        let mut clients = Vec::with_capacity(tree.children.len());
        for win in tree.children {
            let attrs = match self.attributes(win)? {
                Some(attrs) => attrs,
                None => continue,
            };
            if attrs.override_redirect {
                continue;
            }
            if self.classify(win)? == WindowType::Ignore {
                self.conn.change_window_attributes(
                    win,
                    &ChangeWindowAttributesAux::default().override_redirect(1),
                )?;
                continue;
            }
            clients.push(win);
        }

        // query_tree returns bottom-to-top, which is exactly what the
        // stacking flavor of the list wants
        self.conn.change_property32(
            PropMode::Replace,
            self.root,
            self.atoms.net_client_list,
            AtomEnum::WINDOW,
            &clients,
        )?;
        self.conn.change_property32(
            PropMode::Replace,
            self.root,
            self.atoms.net_client_list_stacking,
            AtomEnum::WINDOW,
            &clients,
        )?;
        Ok(())
    }

    pub(crate) fn set_active_window(&self, window: Window) -> Result<()> {
        self.conn.change_property32(
            PropMode::Replace,
            self.root,
            self.atoms.net_active_window,
            AtomEnum::WINDOW,
            &[window],
        )?;
        Ok(())
    }

    /// Whether the live `_NET_WM_STATE` property says fullscreen right now
    pub(crate) fn is_fullscreen(&self, window: Window) -> Result<bool> {
        Ok(self
            .property32(window, self.atoms.net_wm_state, AtomEnum::ATOM)?
            .map_or(false, |state| {
                state.first() == Some(&self.atoms.net_wm_state_fullscreen)
            }))
    }

    /// Save the current geometry, then stretch the window over the whole
    /// screen with no border
    pub(crate) fn fullscreen_add(&mut self, window: Window) -> Result<()> {
        if matches!(
            self.windows.get(&window).map(|win| win.fullscreen),
            Some(Fullscreen::Fullscreen { .. })
        ) {
            return Ok(());
        }
        let geom = match self.geometry(window)? {
            Some(geom) => geom,
            None => return Ok(()),
        };

        let saved = SavedGeometry::from_reply(&geom);
        self.conn.change_property32(
            PropMode::Replace,
            window,
            self.atoms.saved_geometry,
            AtomEnum::CARDINAL,
            &saved.to_words(),
        )?;
        if let Some(win) = self.windows.get_mut(&window) {
            win.fullscreen = Fullscreen::Fullscreen { saved };
        }

        self.conn.configure_window(
            window,
            &ConfigureWindowAux::new()
                .x(0)
                .y(0)
                .width(u32::from(self.screen_width))
                .height(u32::from(self.screen_height))
                .border_width(0),
        )?;
        self.conn.change_property32(
            PropMode::Replace,
            window,
            self.atoms.net_wm_state,
            AtomEnum::ATOM,
            &[self.atoms.net_wm_state_fullscreen],
        )?;
        Ok(())
    }

    /// Put a window back where `fullscreen_add` found it. Without a prior
    /// add (no record, no marker property) this is a no-op
    pub(crate) fn fullscreen_remove(&mut self, window: Window) -> Result<()> {
        // the in-memory record is authoritative; the marker property covers
        // windows fullscreened before we took over
        let saved = match self.windows.get(&window).map(|win| win.fullscreen) {
            Some(Fullscreen::Fullscreen { saved }) => Some(saved),
            _ => self
                .property32(window, self.atoms.saved_geometry, AtomEnum::CARDINAL)?
                .and_then(|words| SavedGeometry::from_words(&words)),
        };
        let saved = match saved {
            Some(saved) => saved,
            None => return Ok(()),
        };

        self.conn.change_property32(
            PropMode::Replace,
            window,
            self.atoms.net_wm_state,
            AtomEnum::ATOM,
            &[],
        )?;
        self.conn.configure_window(
            window,
            &ConfigureWindowAux::new().border_width(u32::from(saved.border_width)),
        )?;
        self.teleport(
            window,
            Rect::new(saved.x, saved.y, saved.width, saved.height),
        )?;
        self.conn.delete_property(window, self.atoms.saved_geometry)?;
        if let Some(win) = self.windows.get_mut(&window) {
            win.fullscreen = Fullscreen::Normal;
        }
        Ok(())
    }

    /// Flip fullscreen based on what the state property says right now,
    /// not on anything cached
    pub(crate) fn fullscreen_toggle(&mut self, window: Window) -> Result<()> {
        log::debug!("{:#010x} !fullscreen", window);
        if self.is_fullscreen(window)? {
            self.fullscreen_remove(window)
        } else {
            self.fullscreen_add(window)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_types_means_normal() {
        let atoms = Atoms::fake();
        assert_eq!(classify_list(&atoms, &[]), WindowType::Normal);
    }

    #[test]
    fn unrecognized_atoms_are_skipped() {
        let atoms = Atoms::fake();
        // ids far outside the fake table
        assert_eq!(classify_list(&atoms, &[900, 901]), WindowType::Normal);
        assert_eq!(
            classify_list(&atoms, &[900, atoms.net_wm_window_type_dock]),
            WindowType::Ignore
        );
        // swapping two unrecognized atoms can never change the result
        assert_eq!(
            classify_list(&atoms, &[901, 900, atoms.net_wm_window_type_dock]),
            classify_list(&atoms, &[900, 901, atoms.net_wm_window_type_dock]),
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let atoms = Atoms::fake();
        let types = [
            atoms.net_wm_window_type_tooltip,
            atoms.net_wm_window_type_dock,
        ];
        assert_eq!(
            classify_list(&atoms, &types),
            classify_list(&atoms, &types)
        );
    }

    #[test]
    fn first_listed_type_wins() {
        let atoms = Atoms::fake();
        // reverse scan: DOCK is visited first, DIALOG overwrites it last
        assert_eq!(
            classify_list(
                &atoms,
                &[atoms.net_wm_window_type_dialog, atoms.net_wm_window_type_dock]
            ),
            WindowType::Normal
        );
        // and the mirror image: DOCK is first in the list, so DOCK wins
        assert_eq!(
            classify_list(
                &atoms,
                &[atoms.net_wm_window_type_dock, atoms.net_wm_window_type_dialog]
            ),
            WindowType::Ignore
        );
    }

    #[test]
    fn popup_kinds_map_to_popup() {
        let atoms = Atoms::fake();
        for atom in [
            atoms.net_wm_window_type_menu,
            atoms.net_wm_window_type_splash,
            atoms.net_wm_window_type_dropdown_menu,
            atoms.net_wm_window_type_tooltip,
            atoms.net_wm_window_type_notification,
        ] {
            assert_eq!(classify_list(&atoms, &[atom]), WindowType::Popup);
        }
    }

    #[test]
    fn ignore_kinds_map_to_ignore() {
        let atoms = Atoms::fake();
        for atom in [
            atoms.net_wm_window_type_desktop,
            atoms.net_wm_window_type_dock,
            atoms.net_wm_window_type_toolbar,
            atoms.net_wm_window_type_popup_menu,
            atoms.net_wm_window_type_combo,
            atoms.net_wm_window_type_dnd,
        ] {
            assert_eq!(classify_list(&atoms, &[atom]), WindowType::Ignore);
        }
    }
}
