//! Countable, sliceable collections

use std::ops::Range;

/// An ordered collection that a [`Paginator`](super::Paginator) can count and slice
///
/// Implementations only need to answer two questions: how many items there
/// are, and which items fall inside a window. `slice` must clamp to the end of
/// the collection instead of failing.
pub trait ObjectList {
    type Item;

    /// Total number of items
    fn count(&self) -> u64;

    /// Up to `limit` items starting at `offset`
    fn slice(&self, offset: u64, limit: u64) -> Vec<Self::Item>;
}

/// Type-erased object list, as produced by resources and filtered by authorization
pub type ObjectSet<O> = Box<dyn ObjectList<Item = O> + Send + Sync>;

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

impl<T: Clone> ObjectList for [T] {
    type Item = T;

    fn count(&self) -> u64 {
        self.len() as u64
    }

    fn slice(&self, offset: u64, limit: u64) -> Vec<T> {
        self.iter()
            .skip(to_usize(offset))
            .take(to_usize(limit))
            .cloned()
            .collect()
    }
}

impl<T: Clone> ObjectList for Vec<T> {
    type Item = T;

    fn count(&self) -> u64 {
        self.as_slice().count()
    }

    fn slice(&self, offset: u64, limit: u64) -> Vec<T> {
        self.as_slice().slice(offset, limit)
    }
}

impl<L: ObjectList + ?Sized> ObjectList for Box<L> {
    type Item = L::Item;

    fn count(&self) -> u64 {
        (**self).count()
    }

    fn slice(&self, offset: u64, limit: u64) -> Vec<Self::Item> {
        (**self).slice(offset, limit)
    }
}

impl<L: ObjectList + ?Sized> ObjectList for &L {
    type Item = L::Item;

    fn count(&self) -> u64 {
        (**self).count()
    }

    fn slice(&self, offset: u64, limit: u64) -> Vec<Self::Item> {
        (**self).slice(offset, limit)
    }
}

macro_rules! impl_range_object_list {
    ($($t:ty),*) => {
        $(
            impl ObjectList for Range<$t> {
                type Item = $t;

                fn count(&self) -> u64 {
                    if self.end <= self.start {
                        0
                    } else {
                        (self.end as i128 - self.start as i128) as u64
                    }
                }

                fn slice(&self, offset: u64, limit: u64) -> Vec<$t> {
                    self.clone()
                        .skip(to_usize(offset))
                        .take(to_usize(limit))
                        .collect()
                }
            }
        )*
    };
}

impl_range_object_list!(i32, i64, u32, u64, usize);
