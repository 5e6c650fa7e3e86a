mod event_handlers;
mod ewmh;

use std::collections::HashMap;

use anyhow::{Context, Result};
use x11rb::{
    connection::Connection,
    cursor::Handle as CursorHandle,
    errors::ReplyError,
    protocol::{xproto::*, Event},
    resource_manager::Database,
    rust_connection::RustConnection,
    CURRENT_TIME, NONE,
};

pub(crate) use ewmh::WindowType;

use crate::{
    config::Config,
    monitors,
    rect::{self, Rect},
    states::{GrabKind, GrabState, Outline, PointerGrab, WinState},
    atoms::Atoms,
};

/// The glyphs the pointer wears, loaded once at startup
#[derive(Debug, Copy, Clone)]
struct Cursors {
    normal: Cursor,
    grab_move: Cursor,
    grab_resize: Cursor,
    grab_teleport: Cursor,
}

/// Outcome of trying to bring a window under management
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Adoption {
    Managed,
    /// The window asked to be left alone (override-redirect), or vanished
    /// before we could register on it
    Ignored,
}

pub(crate) struct WmState<'a> {
    pub(crate) conn: &'a RustConnection,
    pub(crate) config: Config,
    pub(crate) root: Window,
    /// Root geometry, kept current from ConfigureNotify events on the root
    pub(crate) screen_width: u16,
    pub(crate) screen_height: u16,
    pub(crate) atoms: Atoms,
    cursors: Cursors,
    /// The window interactive operations act on; the root when nothing has
    /// focus
    pub(crate) focused: Window,
    pub(crate) windows: HashMap<Window, WinState>,
    pub(crate) grab: GrabState,
    pub(crate) outline: Outline,
    /// Marker window advertised through _NET_SUPPORTING_WM_CHECK
    check_window: Window,
}

impl<'a> WmState<'a> {
    pub(crate) fn new(
        conn: &'a RustConnection,
        screen_num: usize,
        config: Config,
    ) -> Result<Self> {
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let (screen_width, screen_height) = (screen.width_in_pixels, screen.height_in_pixels);

        let atoms = Atoms::new(conn)?;

        let database =
            Database::new_from_default(conn).context("cannot read the X resource database")?;
        let handle = CursorHandle::new(conn, screen_num, &database)?
            .reply()
            .context("cannot construct a cursor context")?;
        let cursors = Cursors {
            normal: handle.load_cursor(conn, &config.normal_cursor)?,
            grab_move: handle.load_cursor(conn, &config.move_cursor)?,
            grab_resize: handle.load_cursor(conn, &config.resize_cursor)?,
            grab_teleport: handle.load_cursor(conn, &config.teleport_cursor)?,
        };

        // the inverting GC the outline is drawn with; drawing through child
        // windows needs IncludeInferiors
        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            root,
            &CreateGCAux::new()
                .function(GX::Invert)
                .line_width(0)
                .subwindow_mode(SubwindowMode::IncludeInferiors),
        )?;

        let mut state = Self {
            conn,
            config,
            root,
            screen_width,
            screen_height,
            atoms,
            cursors,
            focused: root,
            windows: HashMap::new(),
            grab: GrabState::default(),
            outline: Outline::new(gc),
            check_window: NONE,
        };
        state.init_ewmh()?;
        state.restore_cursor()?;

        Ok(state)
    }

    /// Take control of everything that already exists. Runs exactly once,
    /// before the event loop; from then on CreateNotify does the adopting
    pub(crate) fn takeover(&mut self) -> Result<()> {
        let tree = self.conn.query_tree(self.root)?.reply()?;

        for win in tree.children {
            match self.adopt(win)? {
                Adoption::Ignored => continue,
                Adoption::Managed => {
                    log::info!("adopting {:#010x}", win);
                    if self.is_mapped(win)? {
                        self.paint_border(win, false)?;
                    }
                }
            }
        }

        // whoever already holds the focus gets the active accent right away
        let focus = self.conn.get_input_focus()?.reply()?.focus;
        if self.windows.contains_key(&focus) {
            self.focused = focus;
            self.paint_border(focus, true)?;
        }

        self.update_client_list()?;
        Ok(())
    }

    /// Bring one window under management: place it if it is brand new, then
    /// register for the events we steer it with
    pub(crate) fn adopt(&mut self, window: Window) -> Result<Adoption> {
        let attrs = match self.attributes(window)? {
            Some(attrs) => attrs,
            None => return Ok(Adoption::Ignored),
        };
        if attrs.override_redirect {
            return Ok(Adoption::Ignored);
        }

        let geom = match self.geometry(window)? {
            Some(geom) => geom,
            None => return Ok(Adoption::Ignored),
        };

        // a fresh window sitting at the origin gets centered on the pointer
        // before anyone sees it; anything else stays where it is
        if attrs.map_state == MapState::Unmapped && geom.x == 0 && geom.y == 0 {
            let pointer = self.conn.query_pointer(self.root)?.reply()?;
            let origin =
                monitors::monitor_at(self.conn, self.root, pointer.root_x, pointer.root_y)?
                    .map_or((0, 0), |m| (m.x, m.y));
            let (x, y) = rect::centered_at(
                (pointer.root_x, pointer.root_y),
                (geom.width, geom.height),
                origin,
            );
            self.teleport(window, Rect::new(x, y, geom.width, geom.height))?;
        }

        let aux = ChangeWindowAttributesAux::default().event_mask(
            EventMask::EnterWindow | EventMask::FocusChange | EventMask::StructureNotify,
        );
        match self.conn.change_window_attributes(window, &aux)?.check() {
            Ok(()) => {}
            // gone between the event and now; nothing to manage
            Err(ref err) if window_gone(err) => return Ok(Adoption::Ignored),
            Err(err) => return Err(err.into()),
        }

        self.windows.insert(window, WinState::new(window, &geom));
        Ok(Adoption::Managed)
    }

    /// Route one event to its handler. Returns whether anything handled it
    pub(crate) fn handle_event(&mut self, event: &Event) -> Result<bool> {
        match event {
            Event::CreateNotify(e) => self.on_create(e)?,
            Event::DestroyNotify(e) => self.on_destroy(e)?,
            Event::MapRequest(e) => self.on_map_request(e)?,
            Event::MapNotify(e) => self.on_map_notify(e)?,
            Event::ButtonPress(e) => self.on_button_press(e)?,
            Event::ButtonRelease(e) => self.on_button_release(e)?,
            Event::MotionNotify(e) => self.on_motion(e)?,
            Event::EnterNotify(e) => self.on_enter(e)?,
            Event::FocusIn(e) => self.on_focus_in(e)?,
            Event::FocusOut(e) => self.on_focus_out(e)?,
            Event::ConfigureRequest(e) => self.on_configure_request(e)?,
            Event::ConfigureNotify(e) => self.on_configure_notify(e)?,
            Event::ClientMessage(e) => self.on_client_message(e)?,
            Event::Error(e) => {
                // async errors from fire-and-forget requests end up here
                log::debug!("X11 error event: {:?}", e);
                return Ok(false);
            }
            other => {
                log::trace!("{:?} not handled", other);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Release everything we hold on the server before going away
    pub(crate) fn teardown(&mut self) -> Result<()> {
        if self.grab.abort().is_some() {
            self.conn.ungrab_pointer(CURRENT_TIME)?;
            self.outline.clear(self.conn, self.root)?;
            self.restore_cursor()?;
        }
        self.wipe_ewmh()?;
        self.conn.flush()?;
        Ok(())
    }

    // ========================= grab plumbing ==========================

    /// Install the server-side pointer grab backing `grab`. When the server
    /// refuses (someone else holds the pointer) the whole operation is
    /// aborted and the default cursor restored; nothing is committed
    pub(crate) fn begin_grab(&mut self, grab: PointerGrab, cursor: Cursor) -> Result<bool> {
        if !self.grab.begin(grab) {
            return Ok(false);
        }

        let mask = (EventMask::ButtonRelease | EventMask::ButtonMotion) as u16;
        let status = self
            .conn
            .grab_pointer(
                false,
                self.root,
                mask,
                GrabMode::Async,
                GrabMode::Async,
                self.root,
                cursor,
                CURRENT_TIME,
            )?
            .reply()?
            .status;

        if status != GrabStatus::Success {
            log::warn!("pointer grab refused: {:?}", status);
            self.grab.abort();
            self.restore_cursor()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Undo everything `begin_grab` set up
    pub(crate) fn end_grab(&mut self) -> Result<()> {
        self.restore_cursor()?;
        self.conn.ungrab_pointer(CURRENT_TIME)?;
        self.outline.clear(self.conn, self.root)?;
        Ok(())
    }

    pub(crate) fn grab_cursor(&self, kind: GrabKind) -> Cursor {
        match kind {
            GrabKind::Move => self.cursors.grab_move,
            GrabKind::Resize => self.cursors.grab_resize,
            GrabKind::Teleport => self.cursors.grab_teleport,
        }
    }

    fn restore_cursor(&self) -> Result<()> {
        let aux = ChangeWindowAttributesAux::default().cursor(self.cursors.normal);
        self.conn.change_window_attributes(self.root, &aux)?;
        Ok(())
    }

    // ===================== vanish-tolerant queries ====================
    //
    // Any follow-up query can find its window gone: the client may have
    // destroyed it between the event and our round trip. `None` means
    // exactly that, and callers drop the operation on the floor.

    pub(crate) fn geometry(&self, window: Window) -> Result<Option<GetGeometryReply>> {
        match self.conn.get_geometry(window)?.reply() {
            Ok(geom) => Ok(Some(geom)),
            Err(ref err) if window_gone(err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn attributes(&self, window: Window) -> Result<Option<GetWindowAttributesReply>> {
        match self.conn.get_window_attributes(window)?.reply() {
            Ok(attrs) => Ok(Some(attrs)),
            Err(ref err) if window_gone(err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// A 32-bit-format property as words; `None` when the window vanished,
    /// the property is absent, or it has some other format
    pub(crate) fn property32(
        &self,
        window: Window,
        property: Atom,
        type_: AtomEnum,
    ) -> Result<Option<Vec<u32>>> {
        match self
            .conn
            .get_property(false, window, property, type_, 0, 32)?
            .reply()
        {
            Ok(reply) => Ok(reply.value32().map(Iterator::collect)),
            Err(ref err) if window_gone(err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn is_mapped(&self, window: Window) -> Result<bool> {
        Ok(self
            .attributes(window)?
            .map_or(false, |attrs| attrs.map_state == MapState::Viewable))
    }

    // ========================= window surgery =========================

    /// Commit a whole geometry in one request
    pub(crate) fn teleport(&self, window: Window, to: Rect) -> Result<()> {
        self.conn.configure_window(
            window,
            &ConfigureWindowAux::new()
                .x(i32::from(to.x))
                .y(i32::from(to.y))
                .width(u32::from(to.width))
                .height(u32::from(to.height)),
        )?;
        Ok(())
    }

    pub(crate) fn restack(&self, window: Window, mode: StackMode) -> Result<()> {
        self.conn
            .configure_window(window, &ConfigureWindowAux::new().stack_mode(mode))?;
        Ok(())
    }

    pub(crate) fn set_focus(&self, window: Window) -> Result<()> {
        match self
            .conn
            .set_input_focus(InputFocus::PointerRoot, window, CURRENT_TIME)?
            .check()
        {
            Ok(()) => Ok(()),
            Err(ref err) if window_gone(err) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Grow or shrink a window around its center, no grab involved
    pub(crate) fn inflate(&mut self, window: Window, step: i32) -> Result<()> {
        if window == self.root {
            return Ok(());
        }
        let geom = match self.geometry(window)? {
            Some(geom) => geom,
            None => return Ok(()),
        };
        self.teleport(window, Rect::from(&geom).inflated(step))?;
        self.restack(window, StackMode::Above)?;
        Ok(())
    }

    /// Pull a window fully onto its monitor if it crosses the far edge
    pub(crate) fn snap_to_edge(&self, window: Window) -> Result<()> {
        let geom = match self.geometry(window)? {
            Some(geom) => geom,
            None => return Ok(()),
        };
        let mon = match monitors::monitor_at(self.conn, self.root, geom.x, geom.y)? {
            Some(mon) => mon,
            // mid-hotplug there may be no monitor under it; leave it be
            None => return Ok(()),
        };

        let current = Rect::from(&geom);
        if !rect::crosses_far_edge(&current, geom.border_width, &mon) {
            return Ok(());
        }
        let snapped = rect::snapped_inside(&current, geom.border_width, &mon);
        if snapped != current {
            self.teleport(window, snapped)?;
        }
        Ok(())
    }
}

/// True when a reply failed only because the window it was about is gone
pub(crate) fn window_gone(err: &ReplyError) -> bool {
    use x11rb::protocol::ErrorKind;

    matches!(
        err,
        ReplyError::X11Error(e) if matches!(
            e.error_kind,
            ErrorKind::Window | ErrorKind::Drawable | ErrorKind::Match
        )
    )
}
