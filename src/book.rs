//! The pagination state machine and the page stacking (z-order) rule.
//!
//! `BookState` models a book whose pages flip one at a time: `Idle` on some
//! page, or mid-flip for a fixed window during which further turn requests
//! are dropped (not queued). The z-order rule is a pure function so driving
//! code can recompute stacking on every page change without side effects.

use crate::story::StoryDocument;
use std::time::{Duration, Instant};

/// How long one page turn stays in the flipping window by default. Tunable;
/// the contract only requires a strictly positive bounded window.
pub const DEFAULT_FLIP_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// A renderable page face: the cover, or the content page of segment `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Cover,
    Content(usize),
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Flipping { until: Instant },
}

/// Current page index plus the transient flipping flag for one book view.
///
/// `current_page` only ever changes by exactly one per successful
/// [`turn_page`](Self::turn_page) call and never leaves
/// `[0, total_pages - 1]`.
#[derive(Debug)]
pub struct BookState {
    current_page: usize,
    total_pages: usize,
    flip_duration: Duration,
    phase: Phase,
}

impl BookState {
    /// A book opened at the cover. `total_pages` is clamped to at least one
    /// (a story with no segments still has its cover page).
    pub fn new(total_pages: usize) -> Self {
        Self::with_flip_duration(total_pages, DEFAULT_FLIP_DURATION)
    }

    pub fn with_flip_duration(total_pages: usize, flip_duration: Duration) -> Self {
        Self {
            current_page: 0,
            total_pages: total_pages.max(1),
            flip_duration,
            phase: Phase::Idle,
        }
    }

    pub fn for_document(doc: &StoryDocument) -> Self {
        Self::new(doc.total_pages())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// True only while a page turn is inside its transition window.
    pub fn flipping(&self) -> bool {
        matches!(self.phase, Phase::Flipping { until } if Instant::now() < until)
    }

    /// Requests a page turn. Returns `true` if the turn was accepted.
    ///
    /// Silently ignored (returns `false`) while a flip is in progress, on
    /// `Next` at the last page, and on `Prev` at the cover. At most one
    /// transition is ever in flight; requests made during a flip are dropped,
    /// never queued.
    pub fn turn_page(&mut self, direction: Direction) -> bool {
        self.settle();
        if matches!(self.phase, Phase::Flipping { .. }) {
            return false;
        }
        let target = match direction {
            Direction::Next if self.current_page + 1 < self.total_pages => self.current_page + 1,
            Direction::Prev if self.current_page > 0 => self.current_page - 1,
            _ => return false,
        };
        self.current_page = target;
        self.phase = Phase::Flipping {
            until: Instant::now() + self.flip_duration,
        };
        true
    }

    /// Returns to the cover in the idle state. For driving code to call when
    /// a new document is loaded.
    pub fn reset(&mut self) {
        self.current_page = 0;
        self.phase = Phase::Idle;
    }

    /// Stacking order of `page` given the current page. See [`z_index`].
    pub fn z_index_of(&self, page: PageId) -> u32 {
        z_index(page, self.current_page, self.total_pages)
    }

    fn settle(&mut self) {
        if let Phase::Flipping { until } = self.phase {
            if Instant::now() >= until {
                self.phase = Phase::Idle;
            }
        }
    }
}

/// Stacking order of a page face so that the face currently shown to the
/// viewer renders above all others during a flip.
///
/// The cover is on top when the book is closed (`current_page == 0`) and at
/// the bottom otherwise. A content page is on top exactly when it is the
/// active face (`current_page == index + 1`); the rest stack in reverse
/// document order beneath it. The active face always computes the unique
/// maximum.
pub fn z_index(page: PageId, current_page: usize, total_pages: usize) -> u32 {
    let top = total_pages as u32;
    match page {
        PageId::Cover => {
            if current_page == 0 {
                top
            } else {
                0
            }
        }
        PageId::Content(index) => {
            if current_page == index + 1 {
                top
            } else {
                top.saturating_sub(index as u32 + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    /// A short window so tests can cross it without stalling the suite.
    const FLIP: Duration = Duration::from_millis(40);

    fn wait_out_flip() {
        sleep(FLIP + Duration::from_millis(10));
    }

    #[test]
    fn test_starts_at_cover() {
        let book = BookState::new(5);
        assert_eq!(book.current_page(), 0);
        assert_eq!(book.total_pages(), 5);
        assert!(!book.flipping());
    }

    #[test]
    fn test_zero_pages_clamps_to_cover_only() {
        let book = BookState::new(0);
        assert_eq!(book.total_pages(), 1);
    }

    #[test]
    fn test_turn_moves_by_exactly_one() {
        let mut book = BookState::with_flip_duration(3, FLIP);
        assert!(book.turn_page(Direction::Next));
        assert_eq!(book.current_page(), 1);
        assert!(book.flipping());
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut book = BookState::with_flip_duration(3, FLIP);
        assert!(!book.turn_page(Direction::Prev));
        assert_eq!(book.current_page(), 0);
        assert!(!book.flipping());

        book.turn_page(Direction::Next);
        wait_out_flip();
        book.turn_page(Direction::Next);
        wait_out_flip();
        assert_eq!(book.current_page(), 2);

        assert!(!book.turn_page(Direction::Next));
        assert_eq!(book.current_page(), 2);
    }

    #[test]
    fn test_double_next_during_flip_moves_once() {
        let mut book = BookState::with_flip_duration(3, FLIP);
        assert!(book.turn_page(Direction::Next));
        // Second request lands inside the flip window and is dropped.
        assert!(!book.turn_page(Direction::Next));
        assert_eq!(book.current_page(), 1);
    }

    #[test]
    fn test_flip_window_clears_on_schedule() {
        let mut book = BookState::with_flip_duration(2, FLIP);
        book.turn_page(Direction::Next);
        assert!(book.flipping());
        wait_out_flip();
        assert!(!book.flipping());
        assert!(book.turn_page(Direction::Prev));
        assert_eq!(book.current_page(), 0);
    }

    #[test]
    fn test_current_page_stays_in_bounds() {
        let mut book = BookState::with_flip_duration(4, Duration::ZERO);
        let moves = [
            Direction::Prev,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Prev,
            Direction::Prev,
            Direction::Prev,
            Direction::Prev,
        ];
        for direction in moves {
            book.turn_page(direction);
            assert!(book.current_page() < book.total_pages());
        }
        assert_eq!(book.current_page(), 0);
    }

    #[test]
    fn test_reset_returns_to_cover() {
        let mut book = BookState::with_flip_duration(3, FLIP);
        book.turn_page(Direction::Next);
        book.reset();
        assert_eq!(book.current_page(), 0);
        assert!(!book.flipping());
        assert!(book.turn_page(Direction::Next));
    }

    #[test]
    fn test_cover_z_order() {
        assert_eq!(z_index(PageId::Cover, 0, 5), 5);
        assert_eq!(z_index(PageId::Cover, 1, 5), 0);
        assert_eq!(z_index(PageId::Cover, 4, 5), 0);
    }

    #[test]
    fn test_active_page_is_unique_maximum() {
        let total = 5;
        for current in 0..total {
            let mut orders: Vec<(PageId, u32)> = vec![PageId::Cover]
                .into_iter()
                .chain((0..total - 1).map(PageId::Content))
                .map(|page| (page, z_index(page, current, total)))
                .collect();
            orders.sort_by_key(|(_, z)| std::cmp::Reverse(*z));

            let active = if current == 0 {
                PageId::Cover
            } else {
                PageId::Content(current - 1)
            };
            assert_eq!(orders[0].0, active, "current={current}");
            assert!(orders[0].1 > orders[1].1, "current={current}");
        }
    }

    #[test]
    fn test_inactive_pages_stack_in_reverse_order() {
        // With the book open past them, earlier pages sit higher in the pile.
        let total = 5;
        let current = 4;
        assert_eq!(z_index(PageId::Content(0), current, total), 4);
        assert_eq!(z_index(PageId::Content(1), current, total), 3);
        assert_eq!(z_index(PageId::Content(2), current, total), 2);
        assert_eq!(z_index(PageId::Content(3), current, total), 5);
    }
}
