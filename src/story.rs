//! The story document model: the immutable input shared by the interactive
//! viewer and the export pipeline.
//!
//! A `StoryDocument` is constructed once per generation result (or once from
//! the built-in fallback) and is read-only for the lifetime of the view.
//! Segment order is chronological story order and is preserved end-to-end.

use crate::error::DocumentError;
use serde::Deserialize;

/// One story beat: its text and the reference of its illustration.
///
/// Image references are either remote URLs (generation service output) or
/// `data:` URIs (user uploads).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Segment {
    #[serde(rename = "segment")]
    pub text: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl Segment {
    pub fn new(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            text: normalize_segment_text(&text.into()),
            image_url: image_url.into(),
        }
    }
}

/// A generated story: title, optional cover image reference, and ordered
/// segments. A document with zero segments is valid and has exactly one page
/// (the cover).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoryDocument {
    pub title: String,
    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl StoryDocument {
    /// Builds a validated document. Segment text is normalized on the way in.
    pub fn new(
        title: impl Into<String>,
        cover_image: Option<String>,
        segments: Vec<Segment>,
    ) -> Result<Self, DocumentError> {
        let doc = Self {
            title: title.into(),
            cover_image,
            segments,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Parses the generation service's JSON response shape:
    /// `{"title", "coverImage"?, "segments": [{"segment", "imageUrl"}]}`.
    ///
    /// A parse or validation failure here is the typed "generation failed"
    /// signal for driving code.
    pub fn from_generation_json(json: &str) -> Result<Self, DocumentError> {
        let mut doc: StoryDocument =
            serde_json::from_str(json).map_err(|e| DocumentError::Malformed(e.to_string()))?;
        for segment in &mut doc.segments {
            segment.text = normalize_segment_text(&segment.text);
        }
        doc.validate()?;
        Ok(doc)
    }

    /// Checks the model invariants: a non-empty title and non-empty text for
    /// every segment. Image references are not validated here; an unusable
    /// reference degrades that one page at export time instead.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.title.trim().is_empty() {
            return Err(DocumentError::EmptyTitle);
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.text.trim().is_empty() {
                return Err(DocumentError::EmptySegmentText(index));
            }
        }
        Ok(())
    }

    /// Total page count: the cover page plus one page per segment.
    pub fn total_pages(&self) -> usize {
        self.segments.len() + 1
    }

    /// The demo story used when no generation result is available.
    pub fn fallback() -> Self {
        Self {
            title: "From Coffee Spills to Wedding Bells: A Latte Love Story!".to_string(),
            cover_image: None,
            segments: vec![
                Segment::new(
                    "Sarah was rushing to her morning meeting when she literally crashed into \
                     Mike at the local coffee shop, creating a cappuccino catastrophe all over \
                     his new white shirt. Instead of getting angry, Mike couldn't help but laugh \
                     at the foam mustache Sarah accidentally acquired during the collision.",
                    "",
                ),
                Segment::new(
                    "Feeling guilty about the shirt incident, Sarah offered to buy Mike a \
                     replacement coffee. One coffee turned into two, and soon they were sharing \
                     their life stories and terrible puns over their third cup of the day.",
                    "",
                ),
                Segment::new(
                    "What started as a clumsy accident turned into weekly coffee dates. They \
                     discovered they both loved bad movies, hiking on rainy days, and had the \
                     same terrible taste in music that their friends always complained about.",
                    "",
                ),
                Segment::new(
                    "Six months later, Mike proposed in the same coffee shop where they first \
                     met - this time intentionally spilling his coffee to recreate their fateful \
                     first encounter. Sarah said yes through laughter and happy tears.",
                    "",
                ),
            ],
        }
    }
}

/// Strips the generation model's `### Segment N: ` numbering artifact from
/// segment text. Pure normalization; text without the artifact passes
/// through unchanged.
pub fn normalize_segment_text(text: &str) -> String {
    strip_segment_prefix(text).to_string()
}

fn strip_segment_prefix(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("### Segment ") else {
        return text;
    };
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return text;
    }
    match rest[digits..].strip_prefix(": ") {
        Some(stripped) => stripped,
        None => text,
    }
}
