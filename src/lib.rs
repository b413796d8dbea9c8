//! Flipbook turns a generated story (a title, an optional cover image, and an
//! ordered sequence of text+image segments) into a paginated book view and a
//! multi-page PDF.
//!
//! The crate has three moving parts:
//!
//! - [`BookState`]: the page-flip state machine driving an interactive view.
//!   It owns the current page index and the transient flipping flag, and
//!   computes the stacking order that keeps the active page on top during a
//!   flip.
//! - [`Exporter`]: the export pipeline. It consumes a [`StoryDocument`] and
//!   produces a PDF with a title page followed by one page per segment,
//!   degrading gracefully when individual images fail to load.
//! - [`StoryView`]: view-lifetime state tying a document, its `BookState`,
//!   and any locally cached cover image together for driving code.
//!
//! Story content itself comes from an external generation service; this crate
//! only consumes its JSON response (see [`StoryDocument::from_generation_json`])
//! or the built-in fallback story.

pub mod assets;
pub mod book;
pub mod error;
pub mod export;
pub mod story;
pub mod viewer;

pub use assets::ImageFetcher;
pub use book::{BookState, Direction, PageId, z_index};
pub use error::{AssetError, DocumentError, ExportError};
pub use export::{ExportedStory, Exporter};
pub use story::{Segment, StoryDocument};
pub use viewer::StoryView;
