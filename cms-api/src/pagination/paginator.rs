use std::ops::RangeInclusive;

use super::error::{IntoPageNumber, PaginationError};
use super::object_list::ObjectList;
use super::page::Page;

/// Splits an [`ObjectList`] into fixed-size pages
///
/// The item count is taken once at construction; pages are sliced lazily on
/// request. `per_page == 0` disables pagination and puts every item on page 1.
#[derive(Debug, Clone)]
pub struct Paginator<L> {
    items: L,
    count: u64,
    per_page: u64,
    num_pages: u64,
}

impl<L: ObjectList> Paginator<L> {
    pub fn new(items: L, per_page: u64) -> Self {
        let count = items.count();
        let num_pages = if per_page == 0 {
            1
        } else {
            count.div_ceil(per_page)
        };

        Self {
            items,
            count,
            per_page,
            num_pages,
        }
    }

    pub fn items(&self) -> &L {
        &self.items
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages; `0` for an empty collection with a non-zero page size
    pub fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Valid page numbers, `1..=num_pages`
    pub fn page_range(&self) -> RangeInclusive<u64> {
        1..=self.num_pages
    }

    /// Select a page
    ///
    /// Page 1 is always valid, even for an empty collection. Any other number
    /// must lie in `1..=num_pages`.
    pub fn page<N: IntoPageNumber>(&self, number: N) -> Result<Page<'_, L>, PaginationError> {
        let number = number.into_page_number()?;
        let valid = u64::try_from(number)
            .ok()
            .filter(|n| *n == 1 || (*n >= 1 && *n <= self.num_pages));

        match valid {
            Some(number) => Ok(Page::new(self, number)),
            None => Err(PaginationError::out_of_range(number)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts without materialising rows, and records how many rows were fetched
    struct LazyQuery {
        total: u64,
        fetched: Cell<u64>,
    }

    impl ObjectList for LazyQuery {
        type Item = u64;

        fn count(&self) -> u64 {
            self.total
        }

        fn slice(&self, offset: u64, limit: u64) -> Vec<u64> {
            let rows: Vec<u64> = (offset..self.total.min(offset + limit)).collect();
            self.fetched.set(self.fetched.get() + rows.len() as u64);
            rows
        }
    }

    #[test]
    fn test_lazy_source_only_fetches_the_window() {
        let query = LazyQuery {
            total: 1_000_000,
            fetched: Cell::new(0),
        };
        let paginator = Paginator::new(query, 25);
        assert_eq!(paginator.num_pages(), 40_000);

        let page = paginator.page(3).unwrap();
        assert_eq!(page.object_list().first(), Some(&50));
        assert_eq!(paginator.items().fetched.get(), 25);
    }

    #[test]
    fn test_num_pages_rounds_up() {
        let paginator = Paginator::new(0..997_i64, 43);
        assert_eq!(paginator.count(), 997);
        assert_eq!(paginator.num_pages(), 24);
        assert_eq!(paginator.page_range(), 1..=24);
    }

    #[test]
    fn test_every_page_window() {
        let cases: [(u64, u64); 8] = [
            (0, 10),
            (1, 10),
            (10, 10),
            (11, 10),
            (45, 20),
            (100, 10),
            (997, 43),
            (5, 1),
        ];

        for (count, per_page) in cases {
            let paginator = Paginator::new(0..count, per_page);
            let num_pages = paginator.num_pages();
            assert_eq!(num_pages, count.div_ceil(per_page), "{count}/{per_page}");

            let last = num_pages.max(1);
            let mut seen = 0;
            for number in 1..=last {
                let page = paginator.page(number).unwrap();
                let offset = (number - 1) * per_page;
                let expected_len = per_page.min(count - offset);

                assert_eq!(page.offset(), offset, "{count}/{per_page} page {number}");
                assert_eq!(page.object_list().len() as u64, expected_len);
                assert!(page.object_list().len() as u64 <= per_page);
                if let Some(first) = page.object_list().first() {
                    assert_eq!(*first, offset);
                }
                assert_eq!(page.has_next(), number < num_pages);
                assert_eq!(page.has_previous(), number > 1);
                assert_eq!(page.next_page_number().is_ok(), page.has_next());
                assert_eq!(page.previous_page_number().is_ok(), page.has_previous());
                seen += expected_len;
            }

            assert_eq!(seen, count, "{count}/{per_page}");
            assert!(matches!(
                paginator.page(last + 1),
                Err(PaginationError::InvalidPage(_))
            ));
            assert!(matches!(
                paginator.page(0),
                Err(PaginationError::InvalidPage(_))
            ));
        }
    }

    #[test]
    fn test_empty_collection() {
        let paginator = Paginator::new(Vec::<i32>::new(), 20);
        assert_eq!(paginator.count(), 0);
        assert_eq!(paginator.num_pages(), 0);
        assert!(paginator.page_range().is_empty());

        let page = paginator.page(1).unwrap();
        assert!(page.object_list().is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn test_zero_per_page_is_single_page() {
        let paginator = Paginator::new(vec![1, 2, 3], 0);
        assert_eq!(paginator.num_pages(), 1);
        assert_eq!(paginator.page(1).unwrap().object_list(), &[1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_pages() {
        let paginator = Paginator::new(0..100_u32, 10);
        assert!(paginator.page(10).is_ok());
        assert_eq!(
            paginator.page(11).unwrap_err(),
            PaginationError::InvalidPage("11 is not a valid page number".to_string())
        );
        assert!(matches!(
            paginator.page(0),
            Err(PaginationError::InvalidPage(_))
        ));
        assert!(matches!(
            paginator.page(-3),
            Err(PaginationError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_page_two_of_single_page_collection() {
        let paginator = Paginator::new(vec!["a", "b"], 10);
        assert_eq!(paginator.num_pages(), 1);
        assert!(paginator.page(1).is_ok());
        assert!(matches!(
            paginator.page(2),
            Err(PaginationError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_non_integer_page_numbers() {
        let paginator = Paginator::new(0..100_i64, 10);
        assert!(matches!(
            paginator.page(1.5),
            Err(PaginationError::PageNotAnInteger(_))
        ));
        assert!(matches!(
            paginator.page("x"),
            Err(PaginationError::PageNotAnInteger(_))
        ));
    }
}
