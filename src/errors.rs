//! The handful of failures the window manager tells apart from plain X
//! protocol errors

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum WmError {
    /// The accent ring has to fit inside the border it is painted on
    #[error("inner border of {inner}px does not fit in a {total}px border")]
    InnerBorderTooWide { inner: u16, total: u16 },

    /// A color in the configuration could not be parsed as `#RRGGBB`
    #[error("invalid color: {0:?}")]
    BadColor(String),

    /// A modifier name in the configuration was not recognized
    #[error("invalid modifier: {0:?}")]
    BadModifier(String),
}
