//! Page-number window for the result pager.
//!
//! Pure arithmetic over (total results, current page, window size). The
//! window is centred on the current page and clipped at the last page:
//!
//! ```text
//! start = max(1, page - window / 2)
//! end   = min(page_count, start + window - 1)
//! ```

use popcorn_api::traits::PAGE_SIZE;

/// Visible page numbers plus the state of the controls around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationWindow {
    pub page: u32,
    pub page_count: u32,
    pub pages: Vec<u32>,
    pub has_prev_ellipsis: bool,
    pub has_next_ellipsis: bool,
}

/// `ceil(total_results / PAGE_SIZE)`.
pub fn page_count(total_results: u32) -> u32 {
    total_results.div_ceil(PAGE_SIZE)
}

impl PaginationWindow {
    pub fn compute(total_results: u32, page: u32, window_size: u32) -> Self {
        let page_count = page_count(total_results);
        let page = page.max(1);
        if page_count == 0 {
            return Self {
                page,
                page_count,
                pages: Vec::new(),
                has_prev_ellipsis: false,
                has_next_ellipsis: false,
            };
        }

        // A stale page past the end (e.g. after the total shrinks) pins to the last one.
        let page = page.min(page_count);
        let window_size = window_size.max(1);
        let start = page.saturating_sub(window_size / 2).max(1);
        let end = page_count.min(start.saturating_add(window_size - 1));
        let pages = (start..=end).collect::<Vec<_>>();

        Self {
            page,
            page_count,
            has_prev_ellipsis: start > 1,
            has_next_ellipsis: end < page_count,
            pages,
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1 && self.page_count > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.page_count
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.can_go_prev().then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.can_go_next().then(|| self.page + 1)
    }

    /// Target of the leading "…": one page before the first visible one.
    pub fn prev_ellipsis_target(&self) -> Option<u32> {
        if !self.has_prev_ellipsis {
            return None;
        }
        self.pages.first().map(|first| first - 1)
    }

    /// Target of the trailing "…": one page after the last visible one.
    pub fn next_ellipsis_target(&self) -> Option<u32> {
        if !self.has_next_ellipsis {
            return None;
        }
        self.pages.last().map(|last| last + 1)
    }
}
