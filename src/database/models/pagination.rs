use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?page=&pageSize=&search=` accepted by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    /// `LIKE` pattern for the search term, `None` when there is nothing to match.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| {
                let escaped = term
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, query: &PageQuery) -> Self {
        let page_size = query.page_size();
        Self {
            data,
            total,
            page: query.page(),
            page_size,
            total_pages: (total + page_size - 1) / page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query(page: Option<i64>, page_size: Option<i64>, search: Option<&str>) -> PageQuery {
        PageQuery {
            page,
            page_size,
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn defaults_and_clamping() {
        let q = query(None, None, None);
        assert_eq!((q.page(), q.page_size(), q.offset()), (1, 10, 0));

        let q = query(Some(0), Some(1000), None);
        assert_eq!((q.page(), q.page_size()), (1, MAX_PAGE_SIZE));

        let q = query(Some(3), Some(25), None);
        assert_eq!(q.offset(), 50);
    }

    #[test]
    fn huge_page_numbers_do_not_overflow() {
        let q = query(Some(i64::MAX), Some(10), None);
        assert_eq!(q.offset(), i64::MAX);

        let q = query(Some(i64::MAX), Some(MAX_PAGE_SIZE), None);
        assert_eq!(Paginated::<i32>::new(vec![], 5, &q).total_pages, 1);
    }

    #[test]
    fn total_pages_rounds_up() {
        let q = query(Some(2), Some(10), None);
        assert_eq!(Paginated::new(vec![1, 2, 3], 23, &q).total_pages, 3);
        assert_eq!(Paginated::<i32>::new(vec![], 0, &q).total_pages, 0);
        assert_eq!(Paginated::<i32>::new(vec![], 20, &q).total_pages, 2);
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(query(None, None, Some("  ")).search_pattern(), None);
        assert_eq!(
            query(None, None, Some(" gravel ")).search_pattern().as_deref(),
            Some("%gravel%")
        );
        assert_eq!(
            query(None, None, Some("50%_off")).search_pattern().as_deref(),
            Some("%50\\%\\_off%")
        );
    }
}
