// ABOUTME: Bounded binary search that brackets a target between adjacent sorted elements
// ABOUTME: Reports a missing neighbour as None instead of an out-of-range index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Bounded Binary Search
//!
//! Given one ascending projection of an interval collection (all starts, or a
//! running maximum of ends), find the two adjacent positions that bracket a
//! target value. Complexity is `O(log n)`; both sides come from a single
//! `partition_point` call.

/// Which side equal elements fall on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchBias {
    /// `left` is the greatest element `<= target`, `right` the smallest `> target`
    #[default]
    Upper,
    /// `left` is the greatest element `< target`, `right` the smallest `>= target`
    Lower,
}

/// Adjacent indices around a target; `None` means no neighbour on that side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    /// Index of the closest element before (or at, for `Upper`) the target
    pub left: Option<usize>,
    /// Index of the closest element after (or at, for `Lower`) the target
    pub right: Option<usize>,
}

impl Bracket {
    /// Build the bracket around a partition point of a slice of length `len`
    const fn around(split: usize, len: usize) -> Self {
        Self {
            left: split.checked_sub(1),
            right: if split < len { Some(split) } else { None },
        }
    }

    /// Target is smaller than every element
    #[must_use]
    pub const fn is_before_all(&self) -> bool {
        self.left.is_none()
    }

    /// Target is past every element on the requested side
    #[must_use]
    pub const fn is_after_all(&self) -> bool {
        self.right.is_none()
    }
}

/// Bracket `target` in `sorted` with [`SearchBias::Upper`]
///
/// ```
/// use gymops_scheduling::locate;
///
/// let starts = [2, 4, 6, 8, 10, 12, 14, 16, 17, 19];
/// let bracket = locate(&11, &starts);
/// assert_eq!((bracket.left, bracket.right), (Some(4), Some(5)));
/// ```
#[must_use]
pub fn locate<T: Ord>(target: &T, sorted: &[T]) -> Bracket {
    locate_with(target, sorted, SearchBias::Upper)
}

/// Bracket `target` in `sorted`, resolving ties toward `bias`
#[must_use]
pub fn locate_with<T: Ord>(target: &T, sorted: &[T], bias: SearchBias) -> Bracket {
    locate_by_key(target, sorted, |value| value, bias)
}

/// Bracket `target` among `items` ordered ascending by `key`
///
/// Lets callers search a slice of records by one field without building a
/// separate projection vector.
pub fn locate_by_key<T, K, F>(target: &K, items: &[T], key: F, bias: SearchBias) -> Bracket
where
    K: Ord + ?Sized,
    F: Fn(&T) -> &K,
{
    debug_assert!(
        items.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1])),
        "locate requires ascending input"
    );
    let split = match bias {
        SearchBias::Upper => items.partition_point(|item| key(item) <= target),
        SearchBias::Lower => items.partition_point(|item| key(item) < target),
    };
    Bracket::around(split, items.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTED: [i32; 10] = [2, 4, 6, 8, 10, 12, 14, 16, 17, 19];

    fn pair(bracket: Bracket) -> (Option<usize>, Option<usize>) {
        (bracket.left, bracket.right)
    }

    #[test]
    fn test_target_between_elements() {
        assert_eq!(pair(locate(&11, &SORTED)), (Some(4), Some(5)));
        assert_eq!(pair(locate(&3, &SORTED)), (Some(0), Some(1)));
        assert_eq!(pair(locate(&18, &SORTED)), (Some(8), Some(9)));
    }

    #[test]
    fn test_target_below_minimum() {
        let bracket = locate(&1, &SORTED);
        assert!(bracket.is_before_all());
        assert_eq!(pair(bracket), (None, Some(0)));
    }

    #[test]
    fn test_target_at_or_above_maximum() {
        let bracket = locate(&25, &SORTED);
        assert!(bracket.is_after_all());
        assert_eq!(pair(bracket), (Some(9), None));

        // Upper bias puts an exact match on the left, leaving no upper neighbour
        assert_eq!(pair(locate(&19, &SORTED)), (Some(9), None));
    }

    #[test]
    fn test_exact_match_respects_bias() {
        assert_eq!(pair(locate(&10, &SORTED)), (Some(4), Some(5)));
        assert_eq!(
            pair(locate_with(&10, &SORTED, SearchBias::Lower)),
            (Some(3), Some(4))
        );
        assert_eq!(
            pair(locate_with(&2, &SORTED, SearchBias::Lower)),
            (None, Some(0))
        );
    }

    #[test]
    fn test_duplicates_resolve_toward_requested_side() {
        let with_duplicates = [1, 3, 3, 3, 5];
        assert_eq!(pair(locate(&3, &with_duplicates)), (Some(3), Some(4)));
        assert_eq!(
            pair(locate_with(&3, &with_duplicates, SearchBias::Lower)),
            (Some(0), Some(1))
        );
    }

    #[test]
    fn test_single_element_and_empty_slices() {
        assert_eq!(pair(locate(&5, &[5])), (Some(0), None));
        assert_eq!(pair(locate(&4, &[5])), (None, Some(0)));
        assert_eq!(pair(locate::<i32>(&4, &[])), (None, None));
    }

    #[test]
    fn test_locate_by_key_on_records() {
        let records = [("a", 2), ("b", 5), ("c", 9)];
        let bracket = locate_by_key(&6, &records, |record| &record.1, SearchBias::Upper);
        assert_eq!(pair(bracket), (Some(1), Some(2)));
    }
}
