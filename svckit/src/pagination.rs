use serde::Serialize;

use crate::errors::ApiError;

/// A page of a server-side result set. `total` is whatever the server
/// reported; some deployments omit it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: Option<u64>) -> Self {
        Self { items, total }
    }

    /// Server total, or the number of received items as a display-only
    /// fallback.
    pub fn total_or_len(&self) -> u64 {
        self.total.unwrap_or(self.items.len() as u64)
    }

    pub fn is_total_estimated(&self) -> bool {
        self.total.is_none()
    }
}

/// Visible slice of a result set: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub start: u64,
    pub end: u64,
    pub total: u64,
    pub total_pages: u32,
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Pagination controls are hidden for an empty result set.
    pub fn shows_controls(&self) -> bool {
        self.total_pages > 0
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            "No bookings".to_string()
        } else {
            format!(
                "Showing {} to {} of {} (page {}/{})",
                self.start + 1,
                self.end,
                self.total,
                self.page,
                self.total_pages
            )
        }
    }
}

/// Compute the window for `page` over `total` results.
///
/// The page is clamped into `[1, total_pages]` rather than rejected, since a
/// filter change can shrink the result set while a request is in flight.
pub fn compute_window(page: u32, page_size: u32, total: u64) -> Result<PageWindow, ApiError> {
    if page_size == 0 {
        return Err(ApiError::InvalidArgument(
            "page size must be positive".to_string(),
        ));
    }

    let size = u64::from(page_size);
    let total_pages = u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX);

    let page = if total_pages == 0 {
        1
    } else {
        page.clamp(1, total_pages)
    };

    let start = (u64::from(page) - 1) * size;
    let end = (start + size).min(total);
    let start = start.min(end);

    Ok(PageWindow {
        page,
        page_size,
        start,
        end,
        total,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_window() {
        let w = compute_window(2, 10, 35).unwrap();
        assert_eq!(w.page, 2);
        assert_eq!((w.start, w.end), (10, 20));
        assert_eq!(w.total_pages, 4);
        assert!(w.has_previous());
        assert!(w.has_next());
        assert_eq!(w.summary(), "Showing 11 to 20 of 35 (page 2/4)");
    }

    #[test]
    fn test_last_partial_page() {
        let w = compute_window(4, 10, 35).unwrap();
        assert_eq!((w.start, w.end), (30, 35));
        assert!(!w.has_next());
    }

    #[test]
    fn test_page_past_end_clamps() {
        let w = compute_window(5, 10, 30).unwrap();
        assert_eq!(w.total_pages, 3);
        assert_eq!(w.page, 3);
        assert_eq!((w.start, w.end), (20, 30));
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        let w = compute_window(0, 10, 30).unwrap();
        assert_eq!(w.page, 1);
        assert_eq!(w.start, 0);
    }

    #[test]
    fn test_empty_total() {
        let w = compute_window(3, 10, 0).unwrap();
        assert_eq!(w.page, 1);
        assert_eq!(w.total_pages, 0);
        assert_eq!((w.start, w.end), (0, 0));
        assert!(w.is_empty());
        assert!(!w.shows_controls());
        assert!(!w.has_next());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            compute_window(1, 0, 10),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_window_bounds_hold_across_inputs() {
        for total in 1..=57u64 {
            for page_size in 1..=12u32 {
                for page in 0..=8u32 {
                    let w = compute_window(page, page_size, total).unwrap();
                    assert!(w.start < w.end, "{total} {page_size} {page}");
                    assert!(w.end <= total);
                    assert_eq!(
                        u64::from(w.total_pages),
                        total.div_ceil(u64::from(page_size))
                    );
                    assert!(w.page >= 1 && w.page <= w.total_pages);
                }
            }
        }
    }

    #[test]
    fn test_total_fallback() {
        let page = Page::new(vec![1, 2, 3], None);
        assert_eq!(page.total_or_len(), 3);
        assert!(page.is_total_estimated());

        let page = Page::new(vec![1, 2, 3], Some(40));
        assert_eq!(page.total_or_len(), 40);
    }
}
