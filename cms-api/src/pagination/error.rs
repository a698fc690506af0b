//! Pagination errors and page-number coercion

use thiserror::Error;

/// Errors raised while selecting a page
///
/// These never cross the resource boundary as-is: the API layer converts both
/// variants into a `BadRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The requested page number was not an integer (floats and strings included)
    #[error("{0} is not an integer")]
    PageNotAnInteger(String),

    /// The requested page is out of range, or an adjacent page does not exist
    #[error("{0}")]
    InvalidPage(String),
}

impl PaginationError {
    pub(crate) fn out_of_range(number: impl std::fmt::Display) -> Self {
        Self::InvalidPage(format!("{number} is not a valid page number"))
    }
}

/// Conversion of a candidate page number into an integer
///
/// Only integer types are accepted. Floats, strings (numeric or not) and
/// non-integer JSON values fail with [`PaginationError::PageNotAnInteger`];
/// callers reading page numbers from a query string are expected to parse them
/// first and report parse failures themselves.
///
/// # Example
///
/// ```rust
/// use cms_api::pagination::{IntoPageNumber, PaginationError};
///
/// assert_eq!(3_u32.into_page_number(), Ok(3));
/// assert!(matches!(1.5_f64.into_page_number(), Err(PaginationError::PageNotAnInteger(_))));
/// assert!(matches!("2".into_page_number(), Err(PaginationError::PageNotAnInteger(_))));
/// ```
pub trait IntoPageNumber {
    /// Convert into a signed page number, without range checks
    fn into_page_number(self) -> Result<i64, PaginationError>;
}

macro_rules! impl_integer_page_number {
    ($($t:ty),*) => {
        $(
            impl IntoPageNumber for $t {
                fn into_page_number(self) -> Result<i64, PaginationError> {
                    i64::try_from(self).map_err(|_| PaginationError::out_of_range(self))
                }
            }
        )*
    };
}

impl_integer_page_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl IntoPageNumber for f32 {
    fn into_page_number(self) -> Result<i64, PaginationError> {
        Err(PaginationError::PageNotAnInteger(self.to_string()))
    }
}

impl IntoPageNumber for f64 {
    fn into_page_number(self) -> Result<i64, PaginationError> {
        Err(PaginationError::PageNotAnInteger(self.to_string()))
    }
}

impl IntoPageNumber for &str {
    fn into_page_number(self) -> Result<i64, PaginationError> {
        Err(PaginationError::PageNotAnInteger(format!("'{self}'")))
    }
}

impl IntoPageNumber for String {
    fn into_page_number(self) -> Result<i64, PaginationError> {
        self.as_str().into_page_number()
    }
}

impl IntoPageNumber for &serde_json::Value {
    fn into_page_number(self) -> Result<i64, PaginationError> {
        match self {
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => n
                .as_i64()
                .ok_or_else(|| PaginationError::out_of_range(n)),
            other => Err(PaginationError::PageNotAnInteger(other.to_string())),
        }
    }
}
