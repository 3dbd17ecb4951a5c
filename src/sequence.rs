//! Sequence: contiguous, index-addressable, resizable storage.
//!
//! Insert and delete shift every later element by one slot, so their cost
//! is proportional to `len - index`: appending at the tail is the cheap
//! case, working at the front the expensive one.

use crate::error::{check_index, check_position, Error, Result};
use core::ops::{Index, IndexMut};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Sequence<T> {
    items: Vec<T>,
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        Ok(&self.items[index])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.len())?;
        Ok(&mut self.items[index])
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Place `value` at `index`, shifting `index..len` one slot right.
    /// `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        check_position(index, self.len())?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the tail left.
    pub fn delete(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len())?;
        Ok(self.items.remove(index))
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Result<T> {
        self.items
            .pop()
            .ok_or(Error::IndexOutOfBounds { index: 0, len: 0 })
    }

    /// Insert at the front; shifts every element.
    pub fn unshift(&mut self, value: T) {
        self.items.insert(0, value);
    }

    /// Remove from the front; shifts every remaining element.
    pub fn shift(&mut self) -> Result<T> {
        self.delete(0)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T: PartialEq> Sequence<T> {
    /// Linear scan in index order; first matching index.
    pub fn search(&self, target: &T) -> Option<usize> {
        self.items.iter().position(|x| x == target)
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// Panicking access for callers that already hold a valid index.
impl<T> Index<usize> for Sequence<T> {
    type Output = T;
    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for Sequence<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn seq(xs: &[i32]) -> Sequence<i32> {
        Sequence::from(xs.to_vec())
    }

    fn contents(s: &Sequence<i32>) -> Vec<i32> {
        s.iter().copied().collect()
    }

    /// Invariant: get/set only accept `index < len`.
    #[test]
    fn get_set_bounds() {
        let mut s = seq(&[10, 20, 30]);
        assert_eq!(s.get(0), Ok(&10));
        assert_eq!(s.get(2), Ok(&30));
        assert_eq!(
            s.get(3),
            Err(Error::IndexOutOfBounds { index: 3, len: 3 })
        );
        s.set(1, 25).unwrap();
        assert_eq!(contents(&s), vec![10, 25, 30]);
        assert!(s.set(3, 0).is_err());
        assert_eq!(contents(&s), vec![10, 25, 30]);
    }

    /// Invariant: insert accepts `index <= len` and shifts later elements right.
    #[test]
    fn insert_shifts_right() {
        let mut s = seq(&[1, 2, 3]);
        s.insert(0, 0).unwrap();
        assert_eq!(contents(&s), vec![0, 1, 2, 3]);
        s.insert(2, 9).unwrap();
        assert_eq!(contents(&s), vec![0, 1, 9, 2, 3]);
        s.insert(5, 7).unwrap();
        assert_eq!(contents(&s), vec![0, 1, 9, 2, 3, 7]);
        let err = s.insert(7, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfBounds);
        assert_eq!(s.len(), 6);
    }

    /// Invariant: delete returns the element and closes the gap in order.
    #[test]
    fn delete_shifts_left() {
        let mut s = seq(&[1, 2, 3, 4]);
        assert_eq!(s.delete(1), Ok(2));
        assert_eq!(contents(&s), vec![1, 3, 4]);
        assert_eq!(s.delete(2), Ok(4));
        assert_eq!(contents(&s), vec![1, 3]);
        assert!(s.delete(2).is_err());
        assert_eq!(contents(&s), vec![1, 3]);
    }

    #[test]
    fn push_pop_unshift_shift() {
        let mut s = Sequence::new();
        s.push(2);
        s.push(3);
        s.unshift(1);
        assert_eq!(contents(&s), vec![1, 2, 3]);
        assert_eq!(s.pop(), Ok(3));
        assert_eq!(s.shift(), Ok(1));
        assert_eq!(s.pop(), Ok(2));
        assert!(s.is_empty());
        assert_eq!(
            s.pop(),
            Err(Error::IndexOutOfBounds { index: 0, len: 0 })
        );
        assert!(s.shift().is_err());
    }

    /// Invariant: search returns the first match in index order.
    #[test]
    fn search_first_occurrence() {
        let s = seq(&[5, 7, 5, 9]);
        assert_eq!(s.search(&5), Some(0));
        assert_eq!(s.search(&9), Some(3));
        assert_eq!(s.search(&1), None);
        assert_eq!(Sequence::<i32>::new().search(&1), None);
    }

    #[test]
    fn collect_and_index() {
        let mut s: Sequence<String> = ["a", "b"].iter().map(|x| x.to_string()).collect();
        s[1].push('!');
        assert_eq!(s[1], "b!");
        let owned: Vec<String> = s.into_iter().collect();
        assert_eq!(owned, vec!["a".to_string(), "b!".to_string()]);
    }
}
