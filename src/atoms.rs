//! The atoms vitrine talks EWMH with, interned once at startup and immutable
//! afterwards

use anyhow::Result;
use x11rb::{
    protocol::xproto::{Atom, ConnectionExt},
    rust_connection::RustConnection,
};

pub(crate) struct Atoms {
    pub(crate) net_supported: Atom,
    pub(crate) net_client_list: Atom,
    pub(crate) net_client_list_stacking: Atom,
    pub(crate) net_supporting_wm_check: Atom,
    pub(crate) net_active_window: Atom,
    pub(crate) net_wm_state: Atom,
    pub(crate) net_wm_state_fullscreen: Atom,
    pub(crate) net_wm_window_type: Atom,
    pub(crate) net_wm_window_type_desktop: Atom,
    pub(crate) net_wm_window_type_dock: Atom,
    pub(crate) net_wm_window_type_toolbar: Atom,
    pub(crate) net_wm_window_type_menu: Atom,
    pub(crate) net_wm_window_type_utility: Atom,
    pub(crate) net_wm_window_type_splash: Atom,
    pub(crate) net_wm_window_type_dialog: Atom,
    pub(crate) net_wm_window_type_dropdown_menu: Atom,
    pub(crate) net_wm_window_type_popup_menu: Atom,
    pub(crate) net_wm_window_type_tooltip: Atom,
    pub(crate) net_wm_window_type_notification: Atom,
    pub(crate) net_wm_window_type_combo: Atom,
    pub(crate) net_wm_window_type_dnd: Atom,
    pub(crate) net_wm_window_type_normal: Atom,
    /// Private marker carrying pre-fullscreen geometry; not an EWMH name and
    /// never advertised
    pub(crate) saved_geometry: Atom,
}

impl Atoms {
    pub(crate) fn new(conn: &RustConnection) -> Result<Self> {
        let intern =
            |name: &str| -> Result<Atom> { Ok(conn.intern_atom(false, name.as_bytes())?.reply()?.atom) };

        Ok(Self {
            net_supported: intern("_NET_SUPPORTED")?,
            net_client_list: intern("_NET_CLIENT_LIST")?,
            net_client_list_stacking: intern("_NET_CLIENT_LIST_STACKING")?,
            net_supporting_wm_check: intern("_NET_SUPPORTING_WM_CHECK")?,
            net_active_window: intern("_NET_ACTIVE_WINDOW")?,
            net_wm_state: intern("_NET_WM_STATE")?,
            net_wm_state_fullscreen: intern("_NET_WM_STATE_FULLSCREEN")?,
            net_wm_window_type: intern("_NET_WM_WINDOW_TYPE")?,
            net_wm_window_type_desktop: intern("_NET_WM_WINDOW_TYPE_DESKTOP")?,
            net_wm_window_type_dock: intern("_NET_WM_WINDOW_TYPE_DOCK")?,
            net_wm_window_type_toolbar: intern("_NET_WM_WINDOW_TYPE_TOOLBAR")?,
            net_wm_window_type_menu: intern("_NET_WM_WINDOW_TYPE_MENU")?,
            net_wm_window_type_utility: intern("_NET_WM_WINDOW_TYPE_UTILITY")?,
            net_wm_window_type_splash: intern("_NET_WM_WINDOW_TYPE_SPLASH")?,
            net_wm_window_type_dialog: intern("_NET_WM_WINDOW_TYPE_DIALOG")?,
            net_wm_window_type_dropdown_menu: intern("_NET_WM_WINDOW_TYPE_DROPDOWN_MENU")?,
            net_wm_window_type_popup_menu: intern("_NET_WM_WINDOW_TYPE_POPUP_MENU")?,
            net_wm_window_type_tooltip: intern("_NET_WM_WINDOW_TYPE_TOOLTIP")?,
            net_wm_window_type_notification: intern("_NET_WM_WINDOW_TYPE_NOTIFICATION")?,
            net_wm_window_type_combo: intern("_NET_WM_WINDOW_TYPE_COMBO")?,
            net_wm_window_type_dnd: intern("_NET_WM_WINDOW_TYPE_DND")?,
            net_wm_window_type_normal: intern("_NET_WM_WINDOW_TYPE_NORMAL")?,
            saved_geometry: intern("_VITRINE_SAVED_GEOMETRY")?,
        })
    }

    /// Everything `_NET_SUPPORTED` should advertise
    pub(crate) fn supported(&self) -> Vec<Atom> {
        vec![
            self.net_supported,
            self.net_client_list,
            self.net_client_list_stacking,
            self.net_supporting_wm_check,
            self.net_active_window,
            self.net_wm_state,
            self.net_wm_state_fullscreen,
            self.net_wm_window_type,
            self.net_wm_window_type_desktop,
            self.net_wm_window_type_dock,
            self.net_wm_window_type_toolbar,
            self.net_wm_window_type_menu,
            self.net_wm_window_type_utility,
            self.net_wm_window_type_splash,
            self.net_wm_window_type_dialog,
            self.net_wm_window_type_dropdown_menu,
            self.net_wm_window_type_popup_menu,
            self.net_wm_window_type_tooltip,
            self.net_wm_window_type_notification,
            self.net_wm_window_type_combo,
            self.net_wm_window_type_dnd,
            self.net_wm_window_type_normal,
        ]
    }

    /// A table with made-up ids, enough for exercising classification logic
    /// without a server
    #[cfg(test)]
    pub(crate) fn fake() -> Self {
        Self {
            net_supported: 1,
            net_client_list: 2,
            net_client_list_stacking: 3,
            net_supporting_wm_check: 4,
            net_active_window: 5,
            net_wm_state: 6,
            net_wm_state_fullscreen: 7,
            net_wm_window_type: 8,
            net_wm_window_type_desktop: 9,
            net_wm_window_type_dock: 10,
            net_wm_window_type_toolbar: 11,
            net_wm_window_type_menu: 12,
            net_wm_window_type_utility: 13,
            net_wm_window_type_splash: 14,
            net_wm_window_type_dialog: 15,
            net_wm_window_type_dropdown_menu: 16,
            net_wm_window_type_popup_menu: 17,
            net_wm_window_type_tooltip: 18,
            net_wm_window_type_notification: 19,
            net_wm_window_type_combo: 20,
            net_wm_window_type_dnd: 21,
            net_wm_window_type_normal: 22,
            saved_geometry: 23,
        }
    }
}
