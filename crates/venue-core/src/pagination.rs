//! Page-bar arithmetic shared by every listing

use serde::{Deserialize, Serialize};

/// Position of one page within a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Current page, 1-based and clamped to the available pages
    pub page: u32,
    /// Rows per page, never zero
    pub limit: u32,
    /// Rows matching the query
    pub total_records: u64,
    /// `ceil(total_records / limit)`; zero when there are no rows
    pub total_pages: u32,
}

impl PageWindow {
    /// Window for a requested page; out-of-range pages are clamped
    #[must_use]
    pub fn new(page: u32, limit: u32, total_records: u64) -> Self {
        let limit = limit.max(1);
        let total_pages =
            u32::try_from(total_records.div_ceil(u64::from(limit))).unwrap_or(u32::MAX);
        Self {
            page: page.clamp(1, total_pages.max(1)),
            limit,
            total_records,
            total_pages,
        }
    }

    /// Window used for the first request, before the total is known
    #[must_use]
    pub fn request(page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        Self {
            page: page.max(1),
            limit,
            total_records: 0,
            total_pages: 0,
        }
    }

    /// Same request with the total filled in
    #[must_use]
    pub fn with_total(self, total_records: u64) -> Self {
        Self::new(self.page, self.limit, total_records)
    }

    /// Index of the first row on this page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Inclusive `(from, to)` row indices, as sent in a `Range` header
    #[must_use]
    pub const fn range(&self) -> (u64, u64) {
        let from = self.offset();
        (from, from + self.limit as u64 - 1)
    }

    /// Whether a later page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Page numbers to render in the bar, at most `width`, centred on the current page
    #[must_use]
    pub fn visible_pages(&self, width: u32) -> Vec<u32> {
        if self.total_pages == 0 || width == 0 {
            return Vec::new();
        }
        let width = width.min(self.total_pages);
        let half = width / 2;
        let start = self
            .page
            .saturating_sub(half)
            .max(1)
            .min(self.total_pages - width + 1);
        (start..start + width).collect()
    }

    /// 1-based row numbers shown as "showing X to Y of Z"
    #[must_use]
    pub fn showing(&self) -> (u64, u64) {
        if self.total_records == 0 {
            return (0, 0);
        }
        let (from, to) = self.range();
        (from + 1, (to + 1).min(self.total_records))
    }
}

/// One page of records plus where it sits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows on this page
    pub items: Vec<T>,
    /// Position metadata
    pub window: PageWindow,
}

impl<T> Page<T> {
    /// Wrap rows fetched for `window`
    #[must_use]
    pub const fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self { items, window }
    }

    /// Convert every row
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            window: self.window,
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 95, 1, 10)]
    #[case(10, 10, 95, 10, 10)]
    #[case(11, 10, 95, 10, 10)]
    #[case(0, 10, 95, 1, 10)]
    #[case(3, 10, 0, 1, 0)]
    #[case(2, 0, 5, 2, 5)]
    #[case(1, 25, 25, 1, 1)]
    fn test_window_clamping(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] total: u64,
        #[case] expected_page: u32,
        #[case] expected_pages: u32,
    ) {
        let window = PageWindow::new(page, limit, total);
        assert_eq!(window.page, expected_page);
        assert_eq!(window.total_pages, expected_pages);
    }

    #[test]
    fn test_range_and_offset() {
        let window = PageWindow::new(3, 20, 100);
        assert_eq!(window.offset(), 40);
        assert_eq!(window.range(), (40, 59));
        assert!(window.has_next());
        assert!(window.has_prev());
    }

    #[test]
    fn test_request_then_total() {
        let window = PageWindow::request(7, 10);
        assert_eq!(window.range(), (60, 69));

        let clamped = window.with_total(42);
        assert_eq!(clamped.page, 5);
        assert!(!clamped.has_next());
    }

    #[rstest]
    #[case(1, 10, vec![1, 2, 3, 4, 5])]
    #[case(5, 10, vec![3, 4, 5, 6, 7])]
    #[case(10, 10, vec![6, 7, 8, 9, 10])]
    #[case(2, 3, vec![1, 2, 3])]
    fn test_visible_pages(#[case] page: u32, #[case] pages: u32, #[case] expected: Vec<u32>) {
        let window = PageWindow::new(page, 10, u64::from(pages) * 10);
        assert_eq!(window.visible_pages(5), expected);
    }

    #[test]
    fn test_visible_pages_empty() {
        assert!(PageWindow::new(1, 10, 0).visible_pages(5).is_empty());
    }

    #[test]
    fn test_showing() {
        assert_eq!(PageWindow::new(10, 10, 95).showing(), (91, 95));
        assert_eq!(PageWindow::new(1, 10, 0).showing(), (0, 0));
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], PageWindow::new(1, 3, 3));
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.window.total_pages, 1);
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 0u64..100_000, limit in 1u32..500, page in 0u32..1000) {
            let window = PageWindow::new(page, limit, total);
            let expected = total.div_ceil(u64::from(limit));
            prop_assert_eq!(u64::from(window.total_pages), expected);
            prop_assert!(window.page >= 1);
            prop_assert!(window.page <= window.total_pages.max(1));
        }

        #[test]
        fn prop_visible_pages_contain_current(total in 1u64..10_000, limit in 1u32..50, page in 1u32..500, width in 1u32..10) {
            let window = PageWindow::new(page, limit, total);
            let visible = window.visible_pages(width);
            prop_assert!(visible.contains(&window.page));
            prop_assert!(visible.len() as u32 <= width);
        }
    }
}
