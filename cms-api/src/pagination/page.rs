use std::fmt;

use super::error::PaginationError;
use super::object_list::ObjectList;
use super::paginator::Paginator;

/// One window of a [`Paginator`]
///
/// Page numbers are 1-based. The item window is sliced when the page is
/// created, so `object_list` is cheap to call repeatedly.
pub struct Page<'a, L: ObjectList> {
    paginator: &'a Paginator<L>,
    number: u64,
    offset: u64,
    object_list: Vec<L::Item>,
}

impl<'a, L: ObjectList> Page<'a, L> {
    /// Build a page; `number` has already been range-checked by the paginator
    pub(super) fn new(paginator: &'a Paginator<L>, number: u64) -> Self {
        let offset = (number - 1).saturating_mul(paginator.per_page());
        let mut page = Self {
            paginator,
            number,
            offset,
            object_list: Vec::new(),
        };
        page.object_list = paginator
            .items()
            .slice(offset, page.end_index().saturating_sub(offset));
        page
    }

    pub fn paginator(&self) -> &'a Paginator<L> {
        self.paginator
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Zero-based index of the first item on this page
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn object_list(&self) -> &[L::Item] {
        &self.object_list
    }

    pub fn into_object_list(self) -> Vec<L::Item> {
        self.object_list
    }

    /// One-based index of the first item on this page
    pub fn start_index(&self) -> u64 {
        self.offset + 1
    }

    /// One-based index of the last item on this page
    ///
    /// Not clamped to the item count: the last page of 997 items split by 43
    /// still reports `offset + 43`.
    pub fn end_index(&self) -> u64 {
        match self.paginator.per_page() {
            0 => self.offset + self.paginator.count(),
            per_page => self.offset + per_page,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.paginator.num_pages()
    }

    pub fn has_previous(&self) -> bool {
        match self.paginator.per_page() {
            0 => self.offset >= self.paginator.count(),
            per_page => self.offset >= per_page,
        }
    }

    pub fn has_other_pages(&self) -> bool {
        let per_page = self.paginator.per_page();
        per_page != 0 && self.paginator.count() > per_page
    }

    pub fn next_page_number(&self) -> Result<u64, PaginationError> {
        self.require_next().map(|_| self.number + 1)
    }

    pub fn previous_page_number(&self) -> Result<u64, PaginationError> {
        self.require_previous().map(|_| self.number - 1)
    }

    pub fn next_page_offset(&self) -> Result<u64, PaginationError> {
        self.require_next()
            .map(|_| self.offset + self.paginator.per_page())
    }

    pub fn previous_page_offset(&self) -> Result<u64, PaginationError> {
        self.require_previous()
            .map(|_| self.offset.saturating_sub(self.paginator.per_page()))
    }

    fn require_next(&self) -> Result<(), PaginationError> {
        if self.number < self.paginator.num_pages() {
            Ok(())
        } else {
            Err(PaginationError::InvalidPage(
                "Next page does not exist".to_string(),
            ))
        }
    }

    fn require_previous(&self) -> Result<(), PaginationError> {
        if self.number > 1 {
            Ok(())
        } else {
            Err(PaginationError::InvalidPage(
                "Previous page does not exist".to_string(),
            ))
        }
    }
}

impl<L: ObjectList> fmt::Debug for Page<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Page {} of {}>",
            self.number,
            self.paginator.num_pages()
        )
    }
}
