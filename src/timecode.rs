use std::borrow::Cow;
use std::fmt;
use anyhow::{Result, Context, anyhow};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// @module: Timecode detection and rewriting

// @const: VTT timecode range regex
static VTT_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}\.\d{3}) --> (\d{2}):(\d{2}):(\d{2}\.\d{3})").unwrap()
});

// @const: SRT timecode regex
static SRT_TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Zero the hour fields of a WebVTT timecode range in a line.
///
/// Detects the first occurrence of `HH:MM:SS.mmm --> HH:MM:SS.mmm` and
/// rewrites the hour fields of both endpoints to `00`, leaving minutes,
/// seconds, milliseconds and all surrounding text unchanged. Lines without
/// a full range match are returned as-is; partial or malformed timecodes
/// are plain text.
pub fn zero_vtt_hours(line: &str) -> Cow<'_, str> {
    VTT_RANGE_REGEX.replacen(line, 1, |caps: &Captures| {
        format!("00:{}:{} --> 00:{}:{}", &caps[2], &caps[3], &caps[5], &caps[6])
    })
}

/// Rewrite every SRT timecode occurrence `HH:MM:SS,mmm` in a line to the
/// WebVTT separator, `HH:MM:SS.mmm`. Digits and surrounding text are
/// preserved; a line carrying a full range has both endpoints rewritten.
pub fn normalize_srt_punctuation(line: &str) -> Cow<'_, str> {
    SRT_TIMECODE_REGEX.replace_all(line, "$1:$2:$3.$4")
}

// @struct: A single point in time within a subtitle file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timecode {
    // @field: Offset from the start of the file in ms
    pub ms: u64,
}

impl Timecode {
    /// Create a timecode from a millisecond offset
    pub fn from_ms(ms: u64) -> Self {
        Timecode { ms }
    }

    /// Parse a `HH:MM:SS.mmm` or `HH:MM:SS,mmm` timecode string
    pub fn parse(timecode: &str) -> Result<Self> {
        let parts: Vec<&str> = timecode.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timecode format: {}", timecode));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        // Validate time components
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timecode: {}", timecode));
        }

        Ok(Timecode {
            ms: hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis,
        })
    }

    /// Format as a WebVTT timecode (HH:MM:SS.mmm)
    pub fn format_vtt(&self) -> String {
        let (hours, minutes, seconds, millis) = self.fields();
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    }

    /// Format as an SRT timecode (HH:MM:SS,mmm)
    pub fn format_srt(&self) -> String {
        let (hours, minutes, seconds, millis) = self.fields();
        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Drop the hour component, keeping minutes, seconds and milliseconds
    pub fn with_zeroed_hours(&self) -> Self {
        Timecode {
            ms: self.ms % 3_600_000,
        }
    }

    fn fields(&self) -> (u64, u64, u64, u64) {
        let hours = self.ms / 3_600_000;
        let minutes = (self.ms % 3_600_000) / 60_000;
        let seconds = (self.ms % 60_000) / 1_000;
        let millis = self.ms % 1_000;
        (hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format_vtt())
    }
}
