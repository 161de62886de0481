// Paginator - page/page-size/position bookkeeping over a list of items
//
// The state machine is deliberately separate from its controls widget
// (controls.rs): this file owns the arithmetic and the invariants, the
// controls only read derived state and translate key presses into the
// operations below.
//
// Invariants, re-established by every mutating operation before it returns:
// 1. 1 <= page <= num_pages
// 2. page_size >= 1
// 3. num_pages == max(1, ceil(len(items) / page_size))

pub mod controls;

use crate::reactive::{ChangeSet, Watchers};
use crate::widgets::WidgetError;

/// Where the navigation controls render relative to the content.
///
/// Purely presentational: has no effect on slicing. With `Both`, two control
/// rows are drawn and both stay interactive against the same state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlsPosition {
    #[default]
    Top,
    Bottom,
    Both,
}

impl ControlsPosition {
    pub fn shows_top(self) -> bool {
        matches!(self, Self::Top | Self::Both)
    }

    pub fn shows_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::Both)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
            Self::Both => "Both",
        }
    }

    /// Next position in the selector cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Both,
            Self::Both => Self::Top,
        }
    }
}

/// Fields of the paginator, for change tracking and watchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageField {
    Items,
    Page,
    PageSize,
    Position,
}

/// Page sizes offered by the controls when none are configured
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [1, 5, 10, 20, 50];

/// Pagination state over an ordered sequence of opaque items.
///
/// Items are treated as handles: the paginator never inspects them, it only
/// slices. The sequence is fixed for the life of one pagination session;
/// [`PageState::set_items`] replaces it wholesale and resets derived state.
pub struct PageState<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    position: ControlsPosition,
    changes: ChangeSet<PageField>,
    watchers: Watchers<PageField>,
}

impl<T> PageState<T> {
    /// Create a paginator at page 1. A zero `page_size` is lifted to 1.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page: 1,
            page_size: page_size.max(1),
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            position: ControlsPosition::default(),
            changes: ChangeSet::new(),
            watchers: Watchers::new(),
        }
    }

    /// Replace the page sizes offered by the controls.
    ///
    /// Validation applies to UI input only; `resize` accepts any size >= 1
    /// regardless of this list.
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        if !options.is_empty() {
            self.page_size_options = options;
        }
        self
    }

    pub fn with_position(mut self, position: ControlsPosition) -> Self {
        self.position = position;
        self
    }

    // ─── Derived state ───────────────────────────────────────────────

    /// Total number of pages; 1 for an empty item list, never 0
    pub fn num_pages(&self) -> usize {
        if self.items.is_empty() {
            return 1;
        }
        self.items.len().div_ceil(self.page_size)
    }

    /// The items visible on the current page.
    ///
    /// May be shorter than `page_size` on the last page; empty only when
    /// the item list is empty.
    pub fn current_slice(&self) -> &[T] {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.items.len());
        if start >= self.items.len() {
            return &[];
        }
        &self.items[start..end]
    }

    /// The "page P of N" label shown next to the page selector
    pub fn page_label(&self) -> String {
        format!("page {} of {}", self.page, self.num_pages())
    }

    /// The page selector's option set, always exactly `1..=num_pages`
    pub fn page_options(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.num_pages()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn position(&self) -> ControlsPosition {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    // ─── Navigation ──────────────────────────────────────────────────

    pub fn first(&mut self) {
        self.set_page(1);
        self.refresh();
    }

    pub fn last(&mut self) {
        self.set_page(self.num_pages());
        self.refresh();
    }

    /// Step back one page; silent no-op at the lower bound
    pub fn previous(&mut self) {
        self.set_page(self.page.saturating_sub(1).max(1));
        self.refresh();
    }

    /// Step forward one page; silent no-op at the upper bound
    pub fn next(&mut self) {
        self.set_page((self.page + 1).min(self.num_pages()));
        self.refresh();
    }

    /// Jump to an explicit page.
    ///
    /// Unlike prev/next, an out-of-range request is an error rather than a
    /// clamp: the page selector only ever offers `1..=num_pages`, so a bad
    /// value here is invalid direct input.
    pub fn goto(&mut self, page: usize) -> Result<(), WidgetError> {
        let pages = self.num_pages();
        if page < 1 || page > pages {
            return Err(WidgetError::OutOfRange { page, pages });
        }
        self.set_page(page);
        self.refresh();
        Ok(())
    }

    /// Change the page size, preserving the current page clamped into the
    /// new bounds.
    pub fn resize(&mut self, new_size: usize) -> Result<(), WidgetError> {
        if new_size < 1 {
            return Err(WidgetError::InvalidSize(new_size));
        }
        if new_size != self.page_size {
            self.page_size = new_size;
            self.changes.mark(PageField::PageSize);
        }
        self.set_page(self.page.min(self.num_pages()));
        self.refresh();
        Ok(())
    }

    /// Replace the item sequence wholesale, starting a new pagination
    /// session at page 1.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.changes.mark(PageField::Items);
        self.set_page(1);
        self.refresh();
    }

    /// Append an item in place, keeping the current page valid.
    ///
    /// Used by live feeds; does not count as a wholesale replacement.
    pub fn push_item(&mut self, item: T) {
        self.items.push(item);
        self.changes.mark(PageField::Items);
        self.refresh();
    }

    /// Mutable access to one item handle.
    ///
    /// Interior mutation of an item is not a sequence change, so nothing is
    /// marked; the item carries its own change tracking if it needs any.
    pub fn item_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn set_position(&mut self, position: ControlsPosition) {
        if position != self.position {
            self.position = position;
            self.changes.mark(PageField::Position);
        }
        self.refresh();
    }

    /// Observer registry; see [`crate::reactive::Watchers`]
    pub fn watchers_mut(&mut self) -> &mut Watchers<PageField> {
        &mut self.watchers
    }

    // ─── Internal ────────────────────────────────────────────────────

    fn set_page(&mut self, page: usize) {
        let clamped = page.clamp(1, self.num_pages());
        if clamped != self.page {
            self.page = clamped;
            self.changes.mark(PageField::Page);
        }
    }

    /// Single re-render entry point: drain the change-set and notify
    /// watchers. Called at the end of every mutating operation so all
    /// derived state is observable synchronously on return.
    fn refresh(&mut self) {
        if !self.changes.is_dirty() {
            return;
        }
        let changed = self.changes.take();
        tracing::debug!(?changed, page = self.page, "paginator refresh");
        self.watchers.notify_all(&changed);
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PageState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageState")
            .field("len", &self.items.len())
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .field("position", &self.position)
            .finish()
    }
}
