#![allow(dead_code)]
use vox_core::SpeechRequest;

/// Voices used across the key tests.
pub const VOICES: &[&str] = &["en-us", "en-gb", "es", "ja"];

/// Rates used across the key tests.
pub const RATES: &[&str] = &["80", "150", "175", "300"];

/// Texts that exercise empty input, whitespace and multi-byte characters.
pub fn texts() -> Vec<&'static str> {
    vec![
        "",
        " ",
        "hello",
        "hello ",
        "Hello",
        "línea\nnueva",
        "こんにちは",
        "🌍🚀",
    ]
}

/// Builds every (text, voice, rate) combination.
pub fn all_requests() -> Vec<SpeechRequest> {
    let mut requests = Vec::new();
    for text in texts() {
        for voice in VOICES {
            for rate in RATES {
                requests.push(SpeechRequest::new(text, *voice, *rate));
            }
        }
    }
    requests
}
