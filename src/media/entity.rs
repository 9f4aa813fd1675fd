//! Media entity model
//!
//! Three closed variants share one capability set: describe and play.
//!
//! ```text
//! Photo : Nom : <name> | Fichier : <file> | Latitude: <lat> | Longitude: <lon>
//! Video : Nom : <name> | Fichier : <file> | Duree: <d>s
//! Film  : Nom : <name> | Fichier : <file> | Duree: <d>s | Chapitres : <c1>s, <c2>s
//! ```
//!
//! Variant constructors are crate-private; entities only come into being
//! through the registry factory methods.

use std::fmt;

use super::player::Player;

/// Whole-second duration
///
/// Fractional input is truncated toward zero and negative input clamps to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Seconds(pub u32);

impl Seconds {
    /// Raw seconds value
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Seconds {
    fn from(secs: u32) -> Self {
        Seconds(secs)
    }
}

impl From<i32> for Seconds {
    fn from(secs: i32) -> Self {
        Seconds(secs.max(0) as u32)
    }
}

impl From<f64> for Seconds {
    fn from(secs: f64) -> Self {
        // `as` saturates and maps NaN to 0
        Seconds(secs.trunc() as u32)
    }
}

impl From<f32> for Seconds {
    fn from(secs: f32) -> Self {
        Seconds::from(secs as f64)
    }
}

impl From<std::time::Duration> for Seconds {
    fn from(d: std::time::Duration) -> Self {
        Seconds(d.as_secs().min(u32::MAX as u64) as u32)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Capability set shared by every media variant
pub trait Media {
    /// Registry name
    fn name(&self) -> &str;

    /// Opaque file reference handed to the player
    fn file(&self) -> &str;

    /// One-line textual description
    fn describe(&self) -> String;

    /// Confirmation text for a play request
    fn play_message(&self) -> String;
}

fn write_base(f: &mut fmt::Formatter<'_>, name: &str, file: &str) -> fmt::Result {
    write!(f, "Nom : {} | Fichier : {}", name, file)
}

fn write_duration(f: &mut fmt::Formatter<'_>, duration: Seconds) -> fmt::Result {
    write!(f, " | Duree: {}", duration)
}

/// Significant digits kept when rendering coordinates
const COORDINATE_DIGITS: usize = 6;

/// Render a coordinate like C's `%g`
///
/// Six significant digits, trailing zeros dropped, scientific notation with
/// a two-digit exponent outside `1e-4 <= |x| < 1e6`.
fn format_coordinate(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to the kept digits
    let scientific = format!("{:.*e}", COORDINATE_DIGITS - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if exponent < -4 || exponent >= COORDINATE_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (COORDINATE_DIGITS as i32 - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Photograph with GPS coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    name: String,
    file: String,
    latitude: f64,
    longitude: f64,
}

impl Photo {
    pub(crate) fn new(name: String, file: String, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            file,
            latitude,
            longitude,
        }
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_base(f, &self.name, &self.file)?;
        write!(
            f,
            " | Latitude: {} | Longitude: {}",
            format_coordinate(self.latitude),
            format_coordinate(self.longitude)
        )
    }
}

impl Media for Photo {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> &str {
        &self.file
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn play_message(&self) -> String {
        format!("Opening photo: {}", self.file)
    }
}

/// Video clip with a duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    name: String,
    file: String,
    duration: Seconds,
}

impl Video {
    pub(crate) fn new(name: String, file: String, duration: Seconds) -> Self {
        Self {
            name,
            file,
            duration,
        }
    }

    /// Duration in whole seconds
    pub fn duration(&self) -> Seconds {
        self.duration
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_base(f, &self.name, &self.file)?;
        write_duration(f, self.duration)
    }
}

impl Media for Video {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> &str {
        &self.file
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    fn play_message(&self) -> String {
        format!(
            "Playing video: {} (Duration: {})",
            self.file, self.duration
        )
    }
}

/// Film: a video with chapter boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Film {
    name: String,
    file: String,
    duration: Seconds,
    /// Chapter boundaries in seconds, in playback order
    chapters: Vec<u32>,
}

impl Film {
    pub(crate) fn new(name: String, file: String, duration: Seconds) -> Self {
        Self {
            name,
            file,
            duration,
            chapters: Vec::new(),
        }
    }

    /// Duration in whole seconds
    pub fn duration(&self) -> Seconds {
        self.duration
    }

    /// Chapter marks in seconds
    pub fn chapters(&self) -> &[u32] {
        &self.chapters
    }

    /// Replace all chapter marks
    pub(crate) fn set_chapters(&mut self, marks: Vec<u32>) {
        self.chapters = marks;
    }
}

impl fmt::Display for Film {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_base(f, &self.name, &self.file)?;
        write_duration(f, self.duration)?;
        f.write_str(" | Chapitres : ")?;

        if self.chapters.is_empty() {
            return f.write_str("Aucun");
        }

        for (i, mark) in self.chapters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}s", mark)?;
        }
        Ok(())
    }
}

impl Media for Film {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> &str {
        &self.file
    }

    fn describe(&self) -> String {
        self.to_string()
    }

    // Films are played like any other video
    fn play_message(&self) -> String {
        format!(
            "Playing video: {} (Duration: {})",
            self.file, self.duration
        )
    }
}

/// Kind tag for a media entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
    Film,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Film => "film",
        };
        f.write_str(s)
    }
}

/// Any entity stored in the registry
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEntity {
    Photo(Photo),
    Video(Video),
    Film(Film),
}

impl MediaEntity {
    /// Which variant this is
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaEntity::Photo(_) => MediaKind::Photo,
            MediaEntity::Video(_) => MediaKind::Video,
            MediaEntity::Film(_) => MediaKind::Film,
        }
    }

    fn as_media(&self) -> &dyn Media {
        match self {
            MediaEntity::Photo(p) => p,
            MediaEntity::Video(v) => v,
            MediaEntity::Film(f) => f,
        }
    }

    /// Hand the file to the player and return the confirmation text
    ///
    /// The player is fire-and-forget: its outcome never changes the message.
    pub fn play(&self, player: &dyn Player) -> String {
        player.open(self.file());
        self.play_message()
    }

    /// Borrow as a photo, if it is one
    pub fn as_photo(&self) -> Option<&Photo> {
        match self {
            MediaEntity::Photo(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow as a video, if it is one
    pub fn as_video(&self) -> Option<&Video> {
        match self {
            MediaEntity::Video(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a film, if it is one
    pub fn as_film(&self) -> Option<&Film> {
        match self {
            MediaEntity::Film(f) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn as_film_mut(&mut self) -> Option<&mut Film> {
        match self {
            MediaEntity::Film(f) => Some(f),
            _ => None,
        }
    }
}

impl Media for MediaEntity {
    fn name(&self) -> &str {
        self.as_media().name()
    }

    fn file(&self) -> &str {
        self.as_media().file()
    }

    fn describe(&self) -> String {
        self.as_media().describe()
    }

    fn play_message(&self) -> String {
        self.as_media().play_message()
    }
}

impl fmt::Display for MediaEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaEntity::Photo(p) => fmt::Display::fmt(p, f),
            MediaEntity::Video(v) => fmt::Display::fmt(v, f),
            MediaEntity::Film(film) => fmt::Display::fmt(film, f),
        }
    }
}
