/// Default page size for listings.
pub const DEFAULT_LIMIT: usize = 20;

/// Largest page size a listing will return.
pub const MAX_LIMIT: usize = 100;

/// Field a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Created,
    Updated,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Created => "created",
            SortField::Updated => "updated",
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for Sort {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::Created,
            descending: true,
        }
    }
}

impl Sort {
    /// Parses `created`, `-created`, `updated` or `-updated`.
    ///
    /// A leading `-` means descending. Returns None for any other field.
    pub fn parse(s: &str) -> Option<Self> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let field = match name {
            "created" => SortField::Created,
            "updated" => SortField::Updated,
            _ => return None,
        };
        Some(Self { field, descending })
    }
}

/// Pagination and ordering for `list`.
///
/// Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub page: usize,
    pub limit: usize,
    pub sort: Sort,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 0,
            limit: DEFAULT_LIMIT,
            sort: Sort::default(),
        }
    }
}

impl ListOptions {
    /// Creates default options (first page, newest first).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page number.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size, clamped to `1..=MAX_LIMIT`.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Sets the ordering.
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Number of records to skip.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_parse() {
        assert_eq!(
            Sort::parse("created"),
            Some(Sort {
                field: SortField::Created,
                descending: false
            })
        );
        assert_eq!(
            Sort::parse("-updated"),
            Some(Sort {
                field: SortField::Updated,
                descending: true
            })
        );
        assert_eq!(Sort::parse("email"), None);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(ListOptions::new().limit(0).limit, 1);
        assert_eq!(ListOptions::new().limit(10_000).limit, MAX_LIMIT);
        assert_eq!(ListOptions::new().limit(5).limit, 5);
    }

    #[test]
    fn offset_from_page_and_limit() {
        let opts = ListOptions::new().page(3).limit(10);
        assert_eq!(opts.offset(), 30);
    }
}
