//! In-place sort routines over [`GrowableArray`].
//!
//! - Vote ranking uses selection sort: pick the largest remaining vote count
//!   and swap it into the next position. Ties keep encounter order because a
//!   later element only wins when strictly greater.
//! - Name and year ordering use insertion sort, which is stable: an element
//!   moves left only past strictly-greater predecessors.
//!
//! All routines mutate the array they are given. Sort a copy to keep the
//! original order.

use crate::growable_array::GrowableArray;
use crate::model::{CandidacyLink, ElectionEvent, PoliticalActor};
use core::borrow::Borrow;
use core::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Stable insertion sort by `cmp`.
pub fn insertion_sort_by<T, F>(a: &mut GrowableArray<T>, mut cmp: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let s = a.len();
    for e in 1..s {
        let mut i = e;
        while i >= 1 {
            let shift = {
                let (prev, cur) = (&a.as_slice()[i - 1], &a.as_slice()[i]);
                cmp(prev, cur) == Ordering::Greater
            };
            if !shift {
                break;
            }
            a.swap(i - 1, i)
                .expect("insertion positions stay below len");
            i -= 1;
        }
    }
}

/// Selection sort placing the largest `key` first.
pub fn selection_sort_desc_by_key<T, K, F>(a: &mut GrowableArray<T>, mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let s = a.len();
    if s < 2 {
        return;
    }
    for sp in 0..s - 1 {
        let mut highest = sp;
        let mut highest_key = key(&a.as_slice()[sp]);
        for i in sp + 1..s {
            let k = key(&a.as_slice()[i]);
            if k > highest_key {
                highest = i;
                highest_key = k;
            }
        }
        if highest != sp {
            a.swap(sp, highest)
                .expect("selection positions stay below len");
        }
    }
}

/// Case-insensitive comparison used for name ordering and matching.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Highest vote count first.
pub fn sort_by_votes_desc<C>(a: &mut GrowableArray<C>)
where
    C: Borrow<CandidacyLink>,
{
    selection_sort_desc_by_key(a, |c| c.borrow().votes());
}

/// A–Z by name, ignoring case.
pub fn sort_actors_by_name<P>(a: &mut GrowableArray<P>)
where
    P: Borrow<PoliticalActor>,
{
    insertion_sort_by(a, |x, y| cmp_ignore_case(x.borrow().name(), y.borrow().name()));
}

pub fn sort_elections_by_year<E>(a: &mut GrowableArray<E>, order: SortOrder)
where
    E: Borrow<ElectionEvent>,
{
    match order {
        SortOrder::Ascending => insertion_sort_by(a, |x, y| x.borrow().year().cmp(&y.borrow().year())),
        SortOrder::Descending => insertion_sort_by(a, |x, y| y.borrow().year().cmp(&x.borrow().year())),
    }
}
