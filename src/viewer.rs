//! View-lifetime state for one story: the document, its pagination state,
//! and the locally cached cover image bytes.
//!
//! The cover cache holds a user-uploaded photo for the lifetime of the
//! current view only. It is released explicitly when a new document is
//! loaded and on drop, whether or not an export ran.

use crate::book::{BookState, Direction, PageId};
use crate::story::StoryDocument;
use std::sync::Arc;

pub struct StoryView {
    document: StoryDocument,
    book: BookState,
    cover_cache: Option<Arc<Vec<u8>>>,
}

impl StoryView {
    pub fn new(document: StoryDocument) -> Self {
        let book = BookState::for_document(&document);
        Self {
            document,
            book,
            cover_cache: None,
        }
    }

    pub fn document(&self) -> &StoryDocument {
        &self.document
    }

    /// Swaps in a new story. Navigation returns to the cover and the old
    /// document's cached cover bytes are released.
    pub fn load_document(&mut self, document: StoryDocument) {
        self.release_cover_cache();
        self.book = BookState::for_document(&document);
        self.document = document;
    }

    /// Keeps the user-uploaded cover photo around for this view.
    pub fn cache_cover_image(&mut self, bytes: Vec<u8>) {
        self.cover_cache = Some(Arc::new(bytes));
    }

    /// A shared handle to the cached cover bytes, if any.
    pub fn cover_cache(&self) -> Option<Arc<Vec<u8>>> {
        self.cover_cache.clone()
    }

    pub fn release_cover_cache(&mut self) {
        if self.cover_cache.take().is_some() {
            log::debug!("released cached cover image");
        }
    }

    // Navigation surface, delegated to the book state.

    pub fn current_page(&self) -> usize {
        self.book.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.book.total_pages()
    }

    pub fn flipping(&self) -> bool {
        self.book.flipping()
    }

    pub fn turn_page(&mut self, direction: Direction) -> bool {
        self.book.turn_page(direction)
    }

    pub fn z_index_of(&self, page: PageId) -> u32 {
        self.book.z_index_of(page)
    }

    pub fn reset(&mut self) {
        self.book.reset();
    }
}

impl Drop for StoryView {
    fn drop(&mut self) {
        self.release_cover_cache();
    }
}
