//! Guided-meditation pipeline on top of an external text, speech, audio and
//! image provider. Nothing here reads or writes the habit document.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{info, warn};

static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`#>]+").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

pub const MEDITATION_MINUTES: [u32; 4] = [5, 10, 15, 20];
pub const DEFAULT_TOPIC: &str = "a calm forest at dawn";

pub const TOPICS: &[&str] = &[
    "Morning gratitude",
    "Meditation for sleep",
    "Focus and clarity",
    "Stress relief",
    "Body scan",
    "Self-acceptance",
    "Mindfulness in motion",
    "Conscious breathing",
    "Silence and stillness",
    "Being here and now",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("missing API credential for the content provider")]
    MissingCredential,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("content provider unavailable: {0}")]
    Unavailable(String),

    #[error("content provider error: {0}")]
    Provider(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Small => "256x256",
            ImageSize::Medium => "512x512",
            ImageSize::Large => "1024x1024",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [ImageSize::Small, ImageSize::Medium, ImageSize::Large]
            .into_iter()
            .find(|size| size.as_str() == value.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gains {
    pub voice_db: i32,
    pub background_db: i32,
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            voice_db: 4,
            background_db: -10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fades {
    pub fade_in_ms: u32,
    pub fade_out_ms: u32,
}

impl Default for Fades {
    fn default() -> Self {
        Self {
            fade_in_ms: 1500,
            fade_out_ms: 2000,
        }
    }
}

/// External provider. Calls block and own their timeouts.
pub trait ContentGenerator {
    fn generate_text(&self, topic: &str, minutes: u32) -> Result<String, ContentError>;
    fn synthesize_speech(&self, text: &str, language: &str) -> Result<Vec<u8>, ContentError>;
    fn mix_audio(
        &self,
        voice: &[u8],
        background: Option<&[u8]>,
        gains: Gains,
        fades: Fades,
    ) -> Result<Vec<u8>, ContentError>;
    fn generate_image(&self, prompt: &str, size: ImageSize) -> Result<Vec<u8>, ContentError>;
}

#[derive(Debug, Clone)]
pub struct MeditationRequest {
    pub topic: String,
    pub minutes: u32,
    pub language: String,
    pub background: Option<Vec<u8>>,
    pub gains: Gains,
    pub fades: Fades,
    pub image: Option<ImageSize>,
}

impl MeditationRequest {
    pub fn new(topic: impl Into<String>, minutes: u32) -> Self {
        Self {
            topic: topic.into(),
            minutes,
            language: "en".to_string(),
            background: None,
            gains: Gains::default(),
            fades: Fades::default(),
            image: None,
        }
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.topic.trim().is_empty() {
            return Err(ContentError::InvalidRequest("topic is empty".into()));
        }
        if !MEDITATION_MINUTES.contains(&self.minutes) {
            return Err(ContentError::InvalidRequest(format!(
                "length must be one of {MEDITATION_MINUTES:?} minutes"
            )));
        }
        if !(-6..=12).contains(&self.gains.voice_db) {
            return Err(ContentError::InvalidRequest("voice gain must be within -6..=12 dB".into()));
        }
        if !(-30..=6).contains(&self.gains.background_db) {
            return Err(ContentError::InvalidRequest(
                "background gain must be within -30..=6 dB".into(),
            ));
        }
        if self.fades.fade_in_ms > 8000 || self.fades.fade_out_ms > 8000 {
            return Err(ContentError::InvalidRequest("fades must not exceed 8000 ms".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meditation {
    pub script: String,
    pub audio: Vec<u8>,
    pub image: Option<Vec<u8>>,
}

/// Strips Markdown so the speech engine does not read symbols aloud.
pub fn clean_for_speech(text: &str) -> String {
    let text = MARKUP_RE.replace_all(text, " ");
    let text = LINK_RE.replace_all(&text, "$1");
    SPACES_RE.replace_all(&text, " ").trim().to_string()
}

pub fn image_prompt(topic: &str) -> String {
    let topic = match topic.trim() {
        "" => DEFAULT_TOPIC,
        topic => topic,
    };
    format!(
        "Ethereal, calming visualization of '{topic}' for guided meditation. \
         Soft light, dreamy, cinematic composition, watercolor + soft gradients, \
         high detail, no text, no watermark."
    )
}

pub fn build_meditation<G: ContentGenerator + ?Sized>(
    generator: &G,
    request: &MeditationRequest,
) -> Result<Meditation, ContentError> {
    request.validate()?;
    let topic = request.topic.trim();

    let script = generator.generate_text(topic, request.minutes)?;
    let script = script.trim().to_string();
    if script.is_empty() {
        return Err(ContentError::Provider("empty meditation text".into()));
    }

    let voice = generator.synthesize_speech(&clean_for_speech(&script), &request.language)?;
    let audio = generator.mix_audio(
        &voice,
        request.background.as_deref(),
        request.gains,
        request.fades,
    )?;

    // The image is decorative: a failure there keeps the audio.
    let image = match request.image {
        Some(size) => match generator.generate_image(&image_prompt(topic), size) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!("meditation image skipped: {err}");
                None
            }
        },
        None => None,
    };

    info!(topic, minutes = request.minutes, "meditation ready");
    Ok(Meditation {
        script,
        audio,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeProvider {
        spoken: RefCell<Vec<String>>,
        fail_image: bool,
        no_key: bool,
    }

    impl ContentGenerator for FakeProvider {
        fn generate_text(&self, topic: &str, minutes: u32) -> Result<String, ContentError> {
            if self.no_key {
                return Err(ContentError::MissingCredential);
            }
            Ok(format!("## {topic}\n\n**Breathe** for {minutes} minutes. [Listen](http://x)"))
        }

        fn synthesize_speech(&self, text: &str, _language: &str) -> Result<Vec<u8>, ContentError> {
            self.spoken.borrow_mut().push(text.to_string());
            Ok(text.as_bytes().to_vec())
        }

        fn mix_audio(
            &self,
            voice: &[u8],
            background: Option<&[u8]>,
            _gains: Gains,
            _fades: Fades,
        ) -> Result<Vec<u8>, ContentError> {
            let mut out = voice.to_vec();
            out.extend_from_slice(background.unwrap_or_default());
            Ok(out)
        }

        fn generate_image(&self, prompt: &str, _size: ImageSize) -> Result<Vec<u8>, ContentError> {
            if self.fail_image {
                return Err(ContentError::Unavailable("timeout".into()));
            }
            Ok(prompt.as_bytes().to_vec())
        }
    }

    #[test]
    fn cleans_markdown_before_speech() {
        assert_eq!(
            clean_for_speech("## Title\n\n**Breathe**   in [slowly](http://x) > out"),
            "Title Breathe in slowly out"
        );
    }

    #[test]
    fn rejects_bad_requests() {
        assert!(matches!(
            MeditationRequest::new("  ", 10).validate(),
            Err(ContentError::InvalidRequest(_))
        ));
        assert!(MeditationRequest::new("Body scan", 7).validate().is_err());
        let mut request = MeditationRequest::new("Body scan", 5);
        request.gains.voice_db = 20;
        assert!(request.validate().is_err());
    }

    #[test]
    fn pipeline_speaks_clean_text() {
        let provider = FakeProvider::default();
        let mut request = MeditationRequest::new("Body scan", 10);
        request.background = Some(b"rain".to_vec());
        let meditation = build_meditation(&provider, &request).unwrap();

        assert!(meditation.script.starts_with("## Body scan"));
        assert_eq!(
            provider.spoken.borrow().as_slice(),
            ["Body scan Breathe for 10 minutes. Listen"]
        );
        assert!(meditation.audio.ends_with(b"rain"));
        assert_eq!(meditation.image, None);
    }

    #[test]
    fn missing_credential_is_reported() {
        let provider = FakeProvider {
            no_key: true,
            ..FakeProvider::default()
        };
        let result = build_meditation(&provider, &MeditationRequest::new("Stress relief", 5));
        assert_eq!(result, Err(ContentError::MissingCredential));
    }

    #[test]
    fn image_failure_keeps_audio() {
        let provider = FakeProvider {
            fail_image: true,
            ..FakeProvider::default()
        };
        let mut request = MeditationRequest::new("Stress relief", 15);
        request.image = Some(ImageSize::Medium);
        let meditation = build_meditation(&provider, &request).unwrap();
        assert!(!meditation.audio.is_empty());
        assert!(meditation.image.is_none());
    }

    #[test]
    fn image_prompt_falls_back_to_default_topic() {
        assert!(image_prompt(" ").contains(DEFAULT_TOPIC));
        assert!(image_prompt("Body scan").contains("'Body scan'"));
        assert_eq!(ImageSize::parse("512x512"), Some(ImageSize::Medium));
    }
}
