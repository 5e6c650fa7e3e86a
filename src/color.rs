//! A struct that allows good and more correct (de)serialisation for colors.
//! Internally they need to be handed to the server in ARGB format but we want
//! to parse and show them in hex

use std::{
    convert::TryFrom,
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::WmError;

const ALPHA: u8 = 255;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            red: r,
            green: g,
            blue: b,
        }
    }
}

impl FromStr for Color {
    type Err = WmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // We assume that we are parsing hex. If it's not valid we error
        let hex = s
            .trim_start_matches(|c: char| !c.is_ascii_hexdigit())
            .trim_end();
        if hex.len() != 6 {
            return Err(WmError::BadColor(s.to_string()));
        }
        let bad = |_| WmError::BadColor(s.to_string());

        let (r, rest) = hex.split_at(2);
        let red = u8::from_str_radix(r, 16).map_err(bad)?;

        let (g, b) = rest.split_at(2);
        let green = u8::from_str_radix(g, 16).map_err(bad)?;

        let blue = u8::from_str_radix(b, 16).map_err(bad)?;

        Ok(Self { red, green, blue })
    }
}

impl TryFrom<String> for Color {
    type Error = WmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from(*self))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        Self::from_be_bytes([ALPHA, c.red, c.green, c.blue])
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn parses_common_spellings() {
        let plain: Color = "666666".parse().unwrap();
        let hash: Color = "#666666".parse().unwrap();
        let prefixed: Color = "0x666666".parse().unwrap();
        assert_eq!(plain, hash);
        assert_eq!(hash, prefixed);
        assert_eq!(u32::from(plain), 0xFF66_6666);
    }

    #[test]
    fn rejects_garbage() {
        assert!("#66666".parse::<Color>().is_err());
        assert!("#6666667".parse::<Color>().is_err());
        assert!("not a color".parse::<Color>().is_err());
    }

    #[test]
    fn displays_as_hex() {
        let c: Color = "#DEADCA".parse().unwrap();
        assert_eq!(c.to_string(), "#DEADCA");
    }
}
