//! Page slicing and page metadata.

use super::types::{CatalogError, CatalogItem, PageResult, DEFAULT_PAGE_CAP};

/// Pagination metadata for a result set of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    /// `max(1, ceil(total_count / page_size))` before the cap.
    pub true_total_pages: u64,
    /// Page count after applying the cap.
    pub total_pages: u32,
    pub page_cap: u32,
}

impl PageMeta {
    /// Compute metadata for `total_count` items.
    ///
    /// Fails with [`CatalogError::InvalidPage`] when `page < 1` and
    /// [`CatalogError::InvalidQuery`] when `page_size < 1`.
    pub fn compute(
        total_count: u64,
        page: u32,
        page_size: u32,
        page_cap: u32,
    ) -> Result<Self, CatalogError> {
        if page_size < 1 {
            return Err(CatalogError::InvalidQuery(format!(
                "page_size must be at least 1, got {}",
                page_size
            )));
        }
        if page < 1 {
            return Err(CatalogError::InvalidPage(page));
        }

        let true_total_pages = total_count.div_ceil(page_size as u64).max(1);
        let total_pages = true_total_pages.min(page_cap.max(1) as u64) as u32;

        Ok(Self {
            page,
            page_size,
            total_count,
            true_total_pages,
            total_pages,
            page_cap,
        })
    }

    pub fn capped(&self) -> bool {
        self.true_total_pages > self.total_pages as u64
    }

    /// Whether the requested page lies beyond the reported page count.
    pub fn out_of_range(&self) -> bool {
        self.page > self.total_pages
    }

    /// Zero-based `[start, end)` bounds of the page within the full sequence.
    pub fn bounds(&self) -> (usize, usize) {
        let start = (self.page as u64 - 1).saturating_mul(self.page_size as u64);
        let end = start
            .saturating_add(self.page_size as u64)
            .min(self.total_count);
        let start = start.min(self.total_count);
        (start as usize, end as usize)
    }

    /// Attach a page of items to this metadata.
    pub fn into_result(self, items: Vec<CatalogItem>) -> PageResult {
        PageResult {
            capped: self.capped(),
            items,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
            page_cap: self.page_cap,
        }
    }
}

/// Slices ordered sequences into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_cap: u32,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_CAP)
    }
}

impl Paginator {
    pub fn new(page_cap: u32) -> Self {
        Self { page_cap }
    }

    pub fn page_cap(&self) -> u32 {
        self.page_cap
    }

    /// Return page `page` of `items`.
    ///
    /// A page beyond the (capped) page count is an empty page with the same
    /// metadata, not an error.
    pub fn paginate(
        &self,
        items: &[CatalogItem],
        page: u32,
        page_size: u32,
    ) -> Result<PageResult, CatalogError> {
        let meta = PageMeta::compute(items.len() as u64, page, page_size, self.page_cap)?;

        let page_items = if meta.out_of_range() {
            Vec::new()
        } else {
            let (start, end) = meta.bounds();
            items[start..end].to_vec()
        };

        Ok(meta.into_result(page_items))
    }
}
