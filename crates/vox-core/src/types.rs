//! Common type definitions and newtypes for Vox.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Synthesis voice (language/accent) identifier.
///
/// Engine voice names are case-insensitive, so the identifier is trimmed
/// and lowercased on construction. Two spellings of the same voice map to
/// the same cache entry.
///
/// # Example
///
/// ```
/// use vox_core::Voice;
///
/// let voice = Voice::new(" EN-us ");
/// assert_eq!(voice.as_str(), "en-us");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Voice(String);

impl Voice {
    /// Creates a new Voice, normalizing the identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_lowercase())
    }

    /// Returns the voice identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new("en-us")
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Voice {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Voice {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Voice> for String {
    fn from(v: Voice) -> Self {
        v.0
    }
}

/// Speech rate in words per minute, kept in the form the engine takes it.
///
/// # Example
///
/// ```
/// use vox_core::Rate;
///
/// let rate = Rate::new("150");
/// assert_eq!(rate.as_str(), "150");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Rate(String);

impl Rate {
    /// Creates a new Rate, trimming surrounding whitespace.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Returns the rate as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self::new("150")
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Rate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Rate {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<u32> for Rate {
    fn from(wpm: u32) -> Self {
        Self(wpm.to_string())
    }
}

impl From<Rate> for String {
    fn from(r: Rate) -> Self {
        r.0
    }
}

/// A request to turn text into audio.
///
/// Every field that changes the synthesized output is part of the request,
/// and therefore part of the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeechRequest {
    text: String,
    voice: Voice,
    rate: Rate,
}

impl SpeechRequest {
    /// Creates a new request. The text is kept verbatim.
    ///
    /// # Example
    ///
    /// ```
    /// use vox_core::SpeechRequest;
    ///
    /// let req = SpeechRequest::new("hello", "en-us", "150");
    /// assert_eq!(req.text(), "hello");
    /// assert_eq!(req.voice().as_str(), "en-us");
    /// ```
    pub fn new(text: impl Into<String>, voice: impl Into<Voice>, rate: impl Into<Rate>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            rate: rate.into(),
        }
    }

    /// Returns the text to synthesize.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the voice.
    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    /// Returns the speech rate.
    pub fn rate(&self) -> &Rate {
        &self.rate
    }
}

impl fmt::Display for SpeechRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} ({} chars)",
            self.voice,
            self.rate,
            self.text.chars().count()
        )
    }
}
