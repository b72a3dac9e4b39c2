//! Pagination primitives shared by every list endpoint.

/// Default page size when the client does not send `limit`.
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page a client may request.
pub const MAX_LIMIT: u32 = 100;

/// 正規化済みのページ指定
///
/// `page` は 1 以上、`limit` は `1..=MAX_LIMIT` に常にクランプされます。
/// 範囲外の値はエラーにせず丸めます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Clamp raw numbers into a valid page request.
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::page::PageRequest;
    ///
    /// let page = PageRequest::new(Some(0), Some(500));
    /// assert_eq!(page.page(), 1);
    /// assert_eq!(page.limit(), 100);
    /// ```
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).clamp(1, u32::MAX as i64) as u32;
        let limit = limit
            .unwrap_or(DEFAULT_LIMIT as i64)
            .clamp(1, MAX_LIMIT as i64) as u32;
        Self { page, limit }
    }

    /// Parse query-string values; anything non-numeric falls back to defaults.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<i64>().ok());
        Self::new(parse(page), parse(limit))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// `ceil(total / limit)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::default();
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), DEFAULT_LIMIT);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(PageRequest::new(Some(-3), None).page(), 1);
        assert_eq!(PageRequest::new(None, Some(0)).limit(), 1);
        assert_eq!(PageRequest::new(None, Some(-10)).limit(), 1);
        assert_eq!(PageRequest::new(None, Some(101)).limit(), MAX_LIMIT);
        assert_eq!(PageRequest::new(None, Some(100)).limit(), 100);
    }

    #[test]
    fn test_from_query_falls_back_on_garbage() {
        let page = PageRequest::from_query(Some("two"), Some("lots"));
        assert_eq!(page, PageRequest::default());

        let page = PageRequest::from_query(Some(" 3 "), Some("15"));
        assert_eq!(page.page(), 3);
        assert_eq!(page.offset(), 30);
    }

    #[test]
    fn test_total_pages() {
        let page = PageRequest::new(None, Some(20));
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(20), 1);
        assert_eq!(page.total_pages(21), 2);
        assert_eq!(PageRequest::new(None, Some(1)).total_pages(7), 7);
    }
}
