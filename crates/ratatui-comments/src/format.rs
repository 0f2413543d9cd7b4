use chrono::DateTime;
use chrono::Local;
use chrono::TimeZone;
use chrono::Utc;
use rand::Rng;
use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;

use crate::error::CommentError;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Relative age of `timestamp` as of now, with week-old dates on the local calendar.
pub fn format_relative_time(timestamp: DateTime<Utc>) -> String {
    format_relative_time_in(timestamp, Utc::now(), &Local)
}

/// `"Just now"`, `"{m}m ago"`, `"{h}h ago"`, `"{d}d ago"`, or a short UTC date such as `"May 1"`
/// once the comment is a week old.
///
/// Each unit is the floor of the elapsed time, so exactly 60 minutes reads `"1h ago"`. Timestamps
/// in the future read `"Just now"`.
pub fn format_relative_time_at(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    format_relative_time_in(timestamp, now, &Utc)
}

/// Like [`format_relative_time_at`], but the short date is taken from the calendar of `tz`.
pub fn format_relative_time_in<Tz>(timestamp: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let diff_ms = (now - timestamp).num_milliseconds();
    let mins = diff_ms.div_euclid(MINUTE_MS);
    let hours = diff_ms.div_euclid(HOUR_MS);
    let days = diff_ms.div_euclid(DAY_MS);

    if mins < 1 {
        return "Just now".to_string();
    }
    if mins < 60 {
        return format!("{mins}m ago");
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }
    if days < 7 {
        return format!("{days}d ago");
    }
    timestamp.with_timezone(tz).format("%b %-d").to_string()
}

/// Up to two uppercase initials: the first character of each whitespace-separated word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Channels below this on every axis read as a deep color.
const MAX_BRIGHTNESS_FOR_DEEP: u8 = 100;
/// A spread above this between the strongest and weakest channel reads as saturated.
const MIN_SATURATION_DIFFERENCE: u8 = 80;
pub const MAX_COLOR_ATTEMPTS: usize = 1000;
pub const FALLBACK_AVATAR_COLOR: AvatarColor = AvatarColor::new(0x3b, 0x82, 0xf6);

/// An opaque RGB color for avatar placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AvatarColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AvatarColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Six lowercase hex digits, no leading `#`.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_deep(self) -> bool {
        self.r.max(self.g).max(self.b) < MAX_BRIGHTNESS_FOR_DEEP
    }

    pub fn is_saturated(self) -> bool {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        max - min > MIN_SATURATION_DIFFERENCE
    }

    /// `true` unless the color is pastel: light and washed out at the same time.
    pub fn is_non_pastel(self) -> bool {
        self.is_deep() || self.is_saturated()
    }
}

impl fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for AvatarColor {
    type Err = CommentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || CommentError::InvalidColor(s.to_string());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<AvatarColor> for Color {
    fn from(c: AvatarColor) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

/// Draws uniform RGB colors until one is deep or saturated.
///
/// Most draws pass on the first try. After [`MAX_COLOR_ATTEMPTS`] rejected draws the
/// [`FALLBACK_AVATAR_COLOR`] is returned.
pub fn generate_avatar_color<R: Rng + ?Sized>(rng: &mut R) -> AvatarColor {
    for _ in 0..MAX_COLOR_ATTEMPTS {
        let color = AvatarColor::new(
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        );
        if color.is_non_pastel() {
            return color;
        }
    }
    log::debug!("avatar color sampling gave up after {MAX_COLOR_ATTEMPTS} draws");
    FALLBACK_AVATAR_COLOR
}

pub fn random_avatar_color() -> AvatarColor {
    generate_avatar_color(&mut rand::thread_rng())
}
