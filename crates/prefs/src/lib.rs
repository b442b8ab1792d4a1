use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::Deserialize;

pub const MAX_BLUR_RADIUS: u32 = 64;
pub const MAX_FADE_DURATION: Duration = Duration::from_secs(5);

/// Translucent black, the background tint used when no colors are configured.
pub const DEFAULT_BACKGROUND_COLOR: u32 = 0x9900_0000;

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prefs {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub background: BackgroundPrefs,
    #[serde(default)]
    pub blur: BlurPrefs,
    #[serde(default)]
    pub audio: AudioPrefs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundPrefs {
    #[serde(
        default = "default_fade_duration",
        deserialize_with = "deserialize_millis"
    )]
    pub duration: Duration,
    /// Corner tints listed clockwise from the top-left corner.
    #[serde(default = "default_colors", deserialize_with = "deserialize_colors")]
    pub colors: [u32; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlurPrefs {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_blur_radius")]
    pub radius: u32,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioPrefs {
    #[serde(default = "default_volume")]
    pub inactive_volume: f32,
    #[serde(default = "default_volume")]
    pub minimized_volume: f32,
    #[serde(default)]
    pub channel: ChannelName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelName {
    #[default]
    Master,
    Music,
    Effects,
    Voice,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            version: default_version(),
            background: BackgroundPrefs::default(),
            blur: BlurPrefs::default(),
            audio: AudioPrefs::default(),
        }
    }
}

impl Default for BackgroundPrefs {
    fn default() -> Self {
        Self {
            duration: default_fade_duration(),
            colors: default_colors(),
        }
    }
}

impl Default for BlurPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: default_blur_radius(),
            blacklist: Vec::new(),
        }
    }
}

impl Default for AudioPrefs {
    fn default() -> Self {
        Self {
            inactive_volume: default_volume(),
            minimized_volume: default_volume(),
            channel: ChannelName::default(),
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_fade_duration() -> Duration {
    Duration::from_millis(200)
}

fn default_blur_radius() -> u32 {
    7
}

fn default_volume() -> f32 {
    1.0
}

fn default_colors() -> [u32; 4] {
    [DEFAULT_BACKGROUND_COLOR; 4]
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of milliseconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v.trim())
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_millis(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_millis(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Duration::try_from_secs_f64(v / 1000.0)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn deserialize_colors<'de, D>(deserializer: D) -> Result<[u32; 4], D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        One(String),
        Many(Vec<String>),
    }

    match Helper::deserialize(deserializer)? {
        Helper::One(raw) => {
            let color = parse_color(&raw).map_err(de::Error::custom)?;
            Ok([color; 4])
        }
        Helper::Many(values) => {
            if values.len() != 4 {
                return Err(de::Error::custom(format!(
                    "expected 4 corner colors, found {}",
                    values.len()
                )));
            }
            let mut colors = [0u32; 4];
            for (slot, raw) in colors.iter_mut().zip(values.iter()) {
                *slot = parse_color(raw).map_err(de::Error::custom)?;
            }
            Ok(colors)
        }
    }
}

/// Parses `#AARRGGBB`, `#RRGGBB` (opaque) or the same digits behind `0x`.
pub fn parse_color(raw: &str) -> Result<u32, String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid color '{trimmed}'; expected hex digits"));
    }
    let value = u32::from_str_radix(digits, 16)
        .map_err(|err| format!("invalid color '{trimmed}': {err}"))?;
    match digits.len() {
        8 => Ok(value),
        6 => Ok(0xFF00_0000 | value),
        _ => Err(format!(
            "invalid color '{trimmed}'; expected #AARRGGBB or #RRGGBB"
        )),
    }
}

impl Prefs {
    pub fn from_toml_str(input: &str) -> Result<Self, PrefsError> {
        let raw: Prefs = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads and validates a settings file. A missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, PrefsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| PrefsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn fade_duration_ms(&self) -> u32 {
        self.background.duration.as_millis().min(u32::MAX as u128) as u32
    }

    pub fn validate(&self) -> Result<(), PrefsError> {
        if self.version != 1 {
            return Err(PrefsError::Invalid(format!(
                "unsupported settings version {}; expected 1",
                self.version
            )));
        }

        if self.background.duration > MAX_FADE_DURATION {
            return Err(PrefsError::Invalid(format!(
                "background.duration must be at most {}ms",
                MAX_FADE_DURATION.as_millis()
            )));
        }

        if self.blur.radius > MAX_BLUR_RADIUS {
            return Err(PrefsError::Invalid(format!(
                "blur.radius must be in 0..={MAX_BLUR_RADIUS}"
            )));
        }

        for (name, volume) in [
            ("audio.inactive_volume", self.audio.inactive_volume),
            ("audio.minimized_volume", self.audio.minimized_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(PrefsError::Invalid(format!(
                    "{name} must be within 0.0..=1.0"
                )));
            }
        }

        Ok(())
    }
}
