//! Page-number pagination over ordered collections
//!
//! A [`Paginator`] wraps anything implementing [`ObjectList`] (a materialised
//! `Vec`, an integer range, or a lazily counted query) together with a page
//! size, and hands out [`Page`] windows on demand.
//!
//! # Example
//!
//! ```rust
//! use cms_api::pagination::Paginator;
//!
//! let paginator = Paginator::new(0..1000_i64, 50);
//! assert_eq!(paginator.count(), 1000);
//! assert_eq!(paginator.num_pages(), 20);
//!
//! let page = paginator.page(12).unwrap();
//! assert_eq!(page.offset(), 550);
//! assert_eq!(page.object_list(), (550..600).collect::<Vec<i64>>().as_slice());
//! ```
//!
//! A page size of `0` means "everything on one page".

mod error;
mod object_list;
mod page;
mod paginator;

pub use error::{IntoPageNumber, PaginationError};
pub use object_list::{ObjectList, ObjectSet};
pub use page::Page;
pub use paginator::Paginator;
