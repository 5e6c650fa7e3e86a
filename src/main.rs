//! vitrine: a floating window manager driven entirely by the mouse.
//!
//! Hold the configured modifier and drag with the left button to move a
//! window, the right button to resize it, the middle button to sweep a
//! region for the focused window to teleport into; scroll to inflate or
//! deflate. Everything else is windows asking for things through EWMH.

mod atoms;
mod color;
mod config;
mod decoration;
mod errors;
mod mod_mask;
mod monitors;
mod rect;
mod states;
#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::{bail, Context};
use structopt::StructOpt;
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    protocol::{xproto::*, ErrorKind},
    rust_connection::RustConnection,
};

use config::Config;
use states::WmState;

#[derive(StructOpt, Debug)]
struct Opt {
    /// Optional path to a config file
    #[structopt(long)]
    config: Option<PathBuf>,
    /// Prints the default configuration in stdout and exits
    #[structopt(short, long)]
    print: bool,
    /// More logging; pass twice for per-event tracing
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn try_become_wm(conn: &RustConnection, screen: &Screen) -> Result<(), ReplyError> {
    let change = ChangeWindowAttributesAux::default().event_mask(
        EventMask::StructureNotify
            | EventMask::SubstructureNotify
            | EventMask::SubstructureRedirect,
    );

    conn.change_window_attributes(screen.root, &change)?.check()
}

fn main() -> anyhow::Result<()> {
    let options: Opt = Opt::from_args();
    if options.print {
        let config = Config::default();
        println!(
            "{}",
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new())?
        );
        return Ok(());
    }

    let level = match options.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let _logger = flexi_logger::Logger::try_with_env_or_str(level)?
        .start()
        .context("failed to initialize logging")?;

    let config = Config::load(options.config)?;

    let (conn, screen_num) =
        RustConnection::connect(None).context("failed to connect to the X server")?;
    let screen = &conn.setup().roots[screen_num];

    if let Err(err) = try_become_wm(&conn, screen) {
        if let ReplyError::X11Error(ref error) = err {
            if error.error_kind == ErrorKind::Access {
                bail!("another window manager is already running");
            }
        }
        return Err(anyhow::Error::new(err).context("cannot redirect root window events"));
    }

    // We are the window manager!
    let mut wm_state = WmState::new(&conn, screen_num, config)?;

    // every modified click anywhere is ours
    conn.grab_button(
        false,
        screen.root,
        EventMask::ButtonPress as u16,
        GrabMode::Async,
        GrabMode::Async,
        screen.root,
        x11rb::NONE,
        ButtonIndex::Any,
        u16::from(wm_state.config.mod_key),
    )?;

    wm_state
        .takeover()
        .context("error while adopting pre-existing windows")?;

    loop {
        conn.flush()?;
        let event = match conn.wait_for_event() {
            Ok(event) => event,
            Err(err) => {
                log::error!("connection to the X server lost: {}", err);
                break;
            }
        };

        // handler failures are logged, never fatal; only losing the
        // connection ends the loop
        if let Err(err) = wm_state.handle_event(&event) {
            log::error!("{:#}", err);
        }
    }

    wm_state.teardown().context("failed to clean up")?;
    Ok(())
}
