//! Offset/limit pagination over ordered result sets.

pub const QUESTIONS_PER_PAGE: u32 = 10;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub per_page: u32,
}

impl Page {
    pub fn new(number: i64) -> Self {
        Self {
            number,
            per_page: QUESTIONS_PER_PAGE,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        (self.number.max(1) - 1).saturating_mul(self.limit())
    }
}

/// A single page of results together with the size of the whole set.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: Page,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> i64 {
        let per_page = self.page.limit();
        (self.total + per_page - 1) / per_page
    }

    /// Page numbers `1..=total_pages`.
    pub fn page_numbers(&self) -> Vec<i64> {
        (1..=self.total_pages()).collect()
    }

    /// Pages below one never exist. Page one of an empty set is a valid empty page,
    /// any other empty page is past the end.
    pub fn is_out_of_range(&self) -> bool {
        self.page.number < 1 || (self.items.is_empty() && self.page.number != 1)
    }
}
