use std::{fs, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use x11rb::protocol::xproto::ModMask;

use crate::{color::Color, mod_mask::XModMask};

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Width of the whole window border in pixels
    pub(crate) border_width: u16,
    /// Width of the accent ring painted on the outer edge of the border
    pub(crate) inner_border_width: u16,
    pub(crate) normal_border_color: Color,
    pub(crate) active_border_color: Color,
    /// Used for the border body when no window corner can be sampled
    pub(crate) fallback_border_color: Color,
    /// Modifier that turns mouse buttons into window management controls
    pub(crate) mod_key: XModMask,
    /// Pixels a scroll-wheel click grows or shrinks a window by
    pub(crate) inflate_step: u16,
    /// Button presses closer together than this are autorepeat noise
    pub(crate) press_interval_ms: u32,
    /// Drag motions are sampled no faster than this
    pub(crate) motion_interval_ms: u32,
    pub(crate) normal_cursor: String,
    pub(crate) move_cursor: String,
    pub(crate) resize_cursor: String,
    pub(crate) teleport_cursor: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            border_width: 8, // pixels
            inner_border_width: 2,
            normal_border_color: Color::new(0x66, 0x66, 0x66),
            active_border_color: Color::new(0xDE, 0xAD, 0xCA),
            fallback_border_color: Color::new(0x44, 0x44, 0x44),
            mod_key: XModMask::new(ModMask::M1), // left alt
            inflate_step: 8,
            press_interval_ms: 8,
            motion_interval_ms: 32,
            normal_cursor: String::from("left_ptr"),
            move_cursor: String::from("hand1"),
            resize_cursor: String::from("lr_angle"),
            teleport_cursor: String::from("tcross"),
        }
    }
}

impl Config {
    /// Load the file at `path`, or the default location, or fall back to the
    /// built-in defaults when no file exists at all
    pub(crate) fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = match path.or_else(Self::default_path) {
            Some(path) if path.exists() => path,
            _ => return Ok(Self::default()),
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration file {:?}", path))?;
        ron::from_str(&raw).with_context(|| format!("invalid configuration in {:?}", path))
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vitrine").join("vitrine.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn default_config_round_trips_through_ron() {
        let config = Config::default();
        let raw = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new()).unwrap();
        let back: Config = ron::from_str(&raw).unwrap();
        assert_eq!(back.border_width, config.border_width);
        assert_eq!(back.normal_border_color, config.normal_border_color);
        assert_eq!(back.normal_cursor, config.normal_cursor);
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let parsed: Config = ron::from_str("(border_width: 4)").unwrap();
        assert_eq!(parsed.border_width, 4);
        assert_eq!(
            parsed.inner_border_width,
            Config::default().inner_border_width
        );
    }
}
