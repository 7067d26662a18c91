//! Paged and incremental ("load more") presentation of a result list.
//!
//! Both operate on an already filtered and sorted list; they only slice it.

/// One page of a paged listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'l, T> {
    pub items: &'l [T],
    /// 0-based index of the first item on this page.
    pub start: usize,
    /// 1-based page number actually shown (after clamping).
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Fixed-size pages navigated by absolute page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paged {
    page_size: usize,
}

impl Paged {
    /// A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Slice out page `number`, clamped into the valid range.
    ///
    /// An empty list has zero pages; asking for any page yields an empty page 1.
    pub fn page<'l, T>(&self, items: &'l [T], number: usize) -> Page<'l, T> {
        let total_pages = self.total_pages(items.len());
        let number = number.clamp(1, total_pages.max(1));
        let start = ((number - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        Page {
            items: &items[start..end],
            start,
            number,
            total_pages,
            total_items: items.len(),
        }
    }
}

/// Incrementally growing window over a result list.
///
/// Starts at `initial` items, grows by `step` on each [`load_more`], and
/// snaps back to `initial` whenever the inputs that produced the list change.
///
/// [`load_more`]: IncrementalReveal::load_more
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementalReveal {
    initial: usize,
    step: usize,
    shown: usize,
    total: usize,
    fingerprint: Option<String>,
}

impl IncrementalReveal {
    pub fn new(initial: usize, step: usize) -> Self {
        Self {
            initial,
            step: step.max(1),
            shown: initial,
            total: 0,
            fingerprint: None,
        }
    }

    /// Report the current inputs and the size of the list they produce.
    ///
    /// A changed `fingerprint` resets the window to the initial count.
    pub fn observe(&mut self, fingerprint: &str, total: usize) {
        if self.fingerprint.as_deref() != Some(fingerprint) {
            self.fingerprint = Some(fingerprint.to_string());
            self.shown = self.initial;
        }
        self.total = total;
    }

    /// Number of items currently displayed.
    pub fn visible(&self) -> usize {
        self.shown.min(self.total)
    }

    pub fn has_more(&self) -> bool {
        self.visible() < self.total
    }

    /// Reveal the next `step` items, never past the total.
    pub fn load_more(&mut self) -> usize {
        if self.has_more() {
            self.shown = (self.visible() + self.step).min(self.total);
        }
        self.visible()
    }

    /// The displayed prefix of `items`.
    pub fn window<'l, T>(&self, items: &'l [T]) -> &'l [T] {
        &items[..self.visible().min(items.len())]
    }
}
