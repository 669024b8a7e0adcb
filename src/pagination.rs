//! Pagination window for pager controls.
//!
//! Long page ranges collapse into a bounded set of page buttons with ellipsis
//! markers, keeping the first page, the last page and the neighbourhood of the
//! current page visible.
//!
//! ```ignore
//! use story_playground::pagination::{pagination_items, PaginationItem};
//!
//! let items = pagination_items(5, 10);
//! // 1 … 4 5 6 … 10
//! assert_eq!(items.len(), 7);
//! assert_eq!(items[1], PaginationItem::Ellipsis);
//! ```

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Buttons shown in total before the range starts collapsing.
pub const TOTAL_VISIBLE: u32 = 5;

/// First and last page are always rendered.
pub const FIXED_ENDS: u32 = 2;

/// Buttons between the fixed ends.
pub const MIDDLE_VISIBLE: u32 = TOTAL_VISIBLE - FIXED_ENDS;

const FIRST_PAGE: u32 = 1;

/// One control in a pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PaginationItem {
    /// Clickable button for a 1-based page index.
    PageButton { index: u32 },
    /// Non-interactive marker for omitted pages.
    Ellipsis,
}

impl PaginationItem {
    /// Page index for buttons, `None` for ellipses.
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::PageButton { index } => Some(*index),
            Self::Ellipsis => None,
        }
    }

    /// True for the omitted-pages marker.
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, Self::Ellipsis)
    }
}

fn page_button(index: u32) -> PaginationItem {
    PaginationItem::PageButton { index }
}

fn buttons(range: RangeInclusive<u32>) -> impl Iterator<Item = PaginationItem> {
    range.map(page_button)
}

/// Build the items a pager renders for `current_page` out of `total_pages`.
///
/// Pure over its inputs. `current_page` is not validated here; use
/// [`PageRequest::clamped`] at the call site when the value comes from the
/// outside. With an out-of-range page the shape is still well formed but the
/// current page may be missing from the result.
pub fn pagination_items(current_page: u32, total_pages: u32) -> Vec<PaginationItem> {
    if total_pages <= TOTAL_VISIBLE {
        return buttons(FIRST_PAGE..=total_pages).collect();
    }

    let last_page = total_pages;
    let near_start = current_page <= MIDDLE_VISIBLE + 1;
    let near_end = current_page >= last_page - MIDDLE_VISIBLE;

    // Near-start is checked first and wins when both edges match.
    let (left_ellipsis, middle, right_ellipsis) = if near_start {
        (false, FIRST_PAGE + 1..=FIRST_PAGE + MIDDLE_VISIBLE, true)
    } else if near_end {
        (true, last_page - MIDDLE_VISIBLE..=last_page - 1, false)
    } else {
        (true, current_page - 1..=current_page + 1, true)
    };

    let mut items = Vec::with_capacity(TOTAL_VISIBLE as usize + 2);
    items.push(page_button(FIRST_PAGE));
    if left_ellipsis {
        items.push(PaginationItem::Ellipsis);
    }
    items.extend(buttons(middle));
    if right_ellipsis {
        items.push(PaginationItem::Ellipsis);
    }
    items.push(page_button(last_page));
    items
}

/// Current page and page count as handed to the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub current_page: u32,
    pub total_pages: u32,
}

impl PageRequest {
    /// Clamp `current_page` into `1..=total_pages` (1 when there are no pages).
    pub fn clamped(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page: current_page.clamp(FIRST_PAGE, total_pages.max(FIRST_PAGE)),
            total_pages,
        }
    }

    /// Build the window and the edge flags for this request.
    pub fn range(&self) -> PaginationRange {
        PaginationRange {
            items: pagination_items(self.current_page, self.total_pages),
            is_first: self.current_page == FIRST_PAGE,
            is_last: self.current_page == self.total_pages,
        }
    }
}

/// Pager window plus the flags the arrow buttons need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationRange {
    pub items: Vec<PaginationItem>,
    pub is_first: bool,
    pub is_last: bool,
}

/// Complete state of a table pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub loading: bool,
}

/// 1-based inclusive range of items shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemsCount {
    pub from: u64,
    pub to: u64,
    pub total: u64,
}

impl fmt::Display for ItemsCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} of {}", self.from, self.to, self.total)
    }
}

/// Number of pages needed for `total_items` at `page_size` items per page.
pub fn page_count(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

impl Pager {
    /// Idle pager; `page` is kept as given and clamped on use.
    pub fn new(page: u32, page_size: u32, total_items: u64) -> Self {
        Self {
            page,
            page_size,
            total_items,
            loading: false,
        }
    }

    /// Page count for the current item total, 0 when `page_size` is 0.
    pub fn total_pages(&self) -> u32 {
        page_count(self.total_items, self.page_size)
    }

    /// Pager with the page clamped into range.
    pub fn request(&self) -> PageRequest {
        PageRequest::clamped(self.page, self.total_pages())
    }

    /// Window and edge flags for the clamped page.
    pub fn range(&self) -> PaginationRange {
        self.request().range()
    }

    /// The pager is not rendered for a single empty page.
    pub fn is_hidden(&self) -> bool {
        self.total_pages() < 2 && self.total_items == 0
    }

    /// Target of the "previous" arrow, `None` when disabled.
    pub fn previous(&self) -> Option<u32> {
        let request = self.request();
        if self.loading || request.current_page == FIRST_PAGE {
            return None;
        }
        Some(request.current_page - 1)
    }

    /// Target of the "next" arrow, `None` when disabled.
    pub fn next(&self) -> Option<u32> {
        let request = self.request();
        if self.loading || request.current_page >= request.total_pages {
            return None;
        }
        Some(request.current_page + 1)
    }

    /// Range of items visible on the current page.
    pub fn items_count(&self) -> ItemsCount {
        let page = u64::from(self.request().current_page);
        let size = u64::from(self.page_size);
        let from = if self.total_items == 0 {
            0
        } else {
            (page - 1) * size + 1
        };
        ItemsCount {
            from,
            to: (page * size).min(self.total_items),
            total: self.total_items,
        }
    }

    /// Move to `page`, clamped into range.
    pub fn go_to(&mut self, page: u32) {
        self.page = PageRequest::clamped(page, self.total_pages()).current_page;
    }
}

/// Render a window as text, e.g. `1 … 4 [5] 6 … 10`.
pub fn render_items(items: &[PaginationItem], current_page: u32) -> String {
    items
        .iter()
        .map(|item| match item {
            PaginationItem::PageButton { index } if *index == current_page => {
                format!("[{}]", index)
            }
            PaginationItem::PageButton { index } => index.to_string(),
            PaginationItem::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
