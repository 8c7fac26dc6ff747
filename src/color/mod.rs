use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ColorResult<T> = std::result::Result<T, ColorError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("expected 3 color components, found {0}")]
    ComponentCount(usize),
    #[error("color component `{0}` is not a number")]
    NotANumber(String),
    #[error("color component `{0}` must end with `%`")]
    MissingPercent(String),
    #[error("{component} value {value} is out of range")]
    OutOfRange { component: &'static str, value: f64 },
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
}

pub const DEFAULT_BRAND_COLOR: ColorTriple = ColorTriple {
    hue: 221.2,
    saturation: 83.0,
    lightness: 53.3,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrandPreset {
    pub name: &'static str,
    pub color: ColorTriple,
}

const fn preset(name: &'static str, hue: f64, saturation: f64, lightness: f64) -> BrandPreset {
    BrandPreset {
        name,
        color: ColorTriple {
            hue,
            saturation,
            lightness,
        },
    }
}

pub const BRAND_PRESETS: [BrandPreset; 7] = [
    preset("Default Blue", 221.2, 83.0, 53.3),
    preset("Royal Purple", 262.0, 83.0, 58.0),
    preset("Emerald Green", 142.0, 76.0, 36.0),
    preset("Ruby Red", 0.0, 84.0, 60.0),
    preset("Amber", 38.0, 92.0, 50.0),
    preset("Indigo", 231.0, 48.0, 48.0),
    preset("Teal", 174.0, 84.0, 32.0),
];

/// Hue/saturation/lightness color in the `"221.2 83% 53.3%"` encoding.
///
/// Construction always validates, so a value of this type is always
/// renderable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorTriple {
    hue: f64,
    saturation: f64,
    lightness: f64,
}

impl ColorTriple {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> ColorResult<Self> {
        check_range("hue", hue, 0.0..360.0)?;
        check_percent("saturation", saturation)?;
        check_percent("lightness", lightness)?;
        Ok(Self {
            hue,
            saturation,
            lightness,
        })
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    pub fn lightness(&self) -> f64 {
        self.lightness
    }

    pub fn with_alpha(&self, alpha: f64) -> Hsla {
        Hsla {
            hue: self.hue,
            saturation: self.saturation,
            lightness: self.lightness,
            alpha: clamp_alpha(alpha),
        }
    }

    /// Parses `#rgb` or `#rrggbb`, rounding each component to one decimal.
    pub fn from_hex(input: &str) -> ColorResult<Self> {
        let (red, green, blue) =
            parse_hex_channels(input).ok_or_else(|| ColorError::InvalidHex(input.to_string()))?;
        let red = f64::from(red) / 255.0;
        let green = f64::from(green) / 255.0;
        let blue = f64::from(blue) / 255.0;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let lightness = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return Self::new(0.0, 0.0, round_tenth(lightness * 100.0));
        }

        let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
        let sector = if max == red {
            ((green - blue) / delta).rem_euclid(6.0)
        } else if max == green {
            (blue - red) / delta + 2.0
        } else {
            (red - green) / delta + 4.0
        };
        let mut hue = round_tenth(sector * 60.0);
        if hue >= 360.0 {
            hue -= 360.0;
        }

        Self::new(
            hue,
            round_tenth(saturation * 100.0).min(100.0),
            round_tenth(lightness * 100.0),
        )
    }
}

impl Default for ColorTriple {
    fn default() -> Self {
        DEFAULT_BRAND_COLOR
    }
}

impl FromStr for ColorTriple {
    type Err = ColorError;

    fn from_str(input: &str) -> ColorResult<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let [hue, saturation, lightness] = tokens.as_slice() else {
            return Err(ColorError::ComponentCount(tokens.len()));
        };

        let hue = parse_number(hue)?;
        let saturation = parse_percent(saturation)?;
        let lightness = parse_percent(lightness)?;
        Self::new(hue, saturation, lightness)
    }
}

impl TryFrom<String> for ColorTriple {
    type Error = ColorError;

    fn try_from(value: String) -> ColorResult<Self> {
        value.parse()
    }
}

impl From<ColorTriple> for String {
    fn from(value: ColorTriple) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ColorTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.hue, self.saturation, self.lightness)
    }
}

/// A triple plus opacity; `Display` yields the CSS `hsla()` form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl Hsla {
    pub fn to_rgba(&self) -> Rgba {
        let saturation = self.saturation / 100.0;
        let lightness = self.lightness / 100.0;
        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let sector = self.hue.rem_euclid(360.0) / 60.0;
        let second = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
        let offset = lightness - chroma / 2.0;

        let (red, green, blue) = match sector as u8 {
            0 => (chroma, second, 0.0),
            1 => (second, chroma, 0.0),
            2 => (0.0, chroma, second),
            3 => (0.0, second, chroma),
            4 => (second, 0.0, chroma),
            _ => (chroma, 0.0, second),
        };

        Rgba {
            red: (red + offset).clamp(0.0, 1.0),
            green: (green + offset).clamp(0.0, 1.0),
            blue: (blue + offset).clamp(0.0, 1.0),
            alpha: self.alpha,
        }
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}

/// Channels in `0.0..=1.0`, the form cairo consumes directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub fn channels_u8(&self) -> (u8, u8, u8) {
        let to_u8 = |value: f64| (value * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_u8(self.red), to_u8(self.green), to_u8(self.blue))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (red, green, blue) = self.channels_u8();
        write!(f, "rgba({red}, {green}, {blue}, {})", self.alpha)
    }
}

/// Renders a triple as an `hsla()` string; `alpha` is clamped into `0..=1`.
pub fn to_renderable_color(triple: &ColorTriple, alpha: f64) -> String {
    triple.with_alpha(alpha).to_string()
}

/// Tinted background used behind brand-colored text.
pub fn subtle_background(triple: &ColorTriple) -> Hsla {
    Hsla {
        hue: triple.hue,
        saturation: round_tenth(triple.saturation * 0.3),
        lightness: round_tenth((triple.lightness + 30.0).min(100.0)),
        alpha: 0.2,
    }
}

fn clamp_alpha(alpha: f64) -> f64 {
    if alpha.is_nan() {
        return 1.0;
    }
    alpha.clamp(0.0, 1.0)
}

fn round_tenth(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // keep `-0` out of the encoded form
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn parse_number(token: &str) -> ColorResult<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ColorError::NotANumber(token.to_string()))
}

fn parse_percent(token: &str) -> ColorResult<f64> {
    let number = token
        .strip_suffix('%')
        .ok_or_else(|| ColorError::MissingPercent(token.to_string()))?;
    parse_number(number)
}

fn check_range(
    component: &'static str,
    value: f64,
    range: std::ops::Range<f64>,
) -> ColorResult<()> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(ColorError::OutOfRange { component, value })
    }
}

fn check_percent(component: &'static str, value: f64) -> ColorResult<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::OutOfRange { component, value })
    }
}

fn parse_hex_channels(input: &str) -> Option<(u8, u8, u8)> {
    let digits = input.trim().strip_prefix('#')?;
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut channels = digits
                .chars()
                .map(|ch| ch.to_digit(16).map(|value| (value * 17) as u8));
            Some((channels.next()??, channels.next()??, channels.next()??))
        }
        6 => Some((
            u8::from_str_radix(&digits[0..2], 16).ok()?,
            u8::from_str_radix(&digits[2..4], 16).ok()?,
            u8::from_str_radix(&digits[4..6], 16).ok()?,
        )),
        _ => None,
    }
}
