//! Chain: singly linked list over a per-chain node arena.
//!
//! Nodes live in a `SlotMap` and link forward by generational key. The
//! chain keeps the head key and a tail key so that both ends are O(1) to
//! reach; any other position is reached by walking forward from the head.
//!
//! Link invariants (checked by the tests after every mutation):
//! - `len == 0` iff `head == tail == None`.
//! - Walking `next` from `head` visits exactly `len` nodes and stops at
//!   `tail`, whose `next` is `None`.
//! - The arena holds no node that is unreachable from `head`.

use crate::error::{check_index, check_position, Error, Result};
use crate::sequence::Sequence;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Clone, Debug)]
struct Node<T> {
    value: T,
    next: Option<DefaultKey>,
}

#[derive(Clone)]
pub struct Chain<T> {
    nodes: SlotMap<DefaultKey, Node<T>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn empty_error(&self) -> Error {
        Error::IndexOutOfBounds {
            index: 0,
            len: self.len(),
        }
    }

    fn last_index(&self) -> Result<usize> {
        self.len().checked_sub(1).ok_or_else(|| self.empty_error())
    }

    /// Key of the node at `index`. O(1) for the head and the tail, O(index)
    /// otherwise.
    fn key_at(&self, index: usize) -> Result<DefaultKey> {
        let len = self.len();
        check_index(index, len)?;
        let found = if index + 1 == len {
            self.tail
        } else {
            let mut cur = self.head;
            for _ in 0..index {
                cur = cur.and_then(|k| self.nodes.get(k)).and_then(|n| n.next);
            }
            cur
        };
        found.ok_or(Error::IndexOutOfBounds { index, len })
    }

    fn pop_head(&mut self) -> Option<T> {
        let head = self.head?;
        let node = self.nodes.remove(head)?;
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        Some(node.value)
    }

    /// Unlink the successor of `prev`, moving the tail back if needed.
    fn unlink_after(&mut self, prev: DefaultKey) -> Option<T> {
        let target = self.nodes.get(prev)?.next?;
        let node = self.nodes.remove(target)?;
        self.nodes[prev].next = node.next;
        if self.tail == Some(target) {
            self.tail = Some(prev);
        }
        Some(node.value)
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        let k = self.key_at(index)?;
        Ok(&self.nodes[k].value)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let k = self.key_at(index)?;
        Ok(&mut self.nodes[k].value)
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn head(&self) -> Result<&T> {
        match self.head {
            Some(k) => Ok(&self.nodes[k].value),
            None => Err(self.empty_error()),
        }
    }

    pub fn tail(&self) -> Result<&T> {
        match self.tail {
            Some(k) => Ok(&self.nodes[k].value),
            None => Err(self.empty_error()),
        }
    }

    pub fn prepend(&mut self, value: T) {
        let k = self.nodes.insert(Node {
            value,
            next: self.head,
        });
        self.head = Some(k);
        if self.tail.is_none() {
            self.tail = Some(k);
        }
    }

    pub fn append(&mut self, value: T) {
        let k = self.nodes.insert(Node { value, next: None });
        match self.tail {
            Some(t) => self.nodes[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    /// Insert so that `value` ends up at `index`; `index == len` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        check_position(index, len)?;
        if index == 0 {
            self.prepend(value);
        } else if index == len {
            self.append(value);
        } else {
            let prev = self.key_at(index - 1)?;
            let next = self.nodes[prev].next;
            let k = self.nodes.insert(Node { value, next });
            self.nodes[prev].next = Some(k);
        }
        Ok(())
    }

    /// Remove the node at `index`. Anything past the head needs its
    /// predecessor to relink, so this walks `index - 1` nodes even for the
    /// tail.
    pub fn delete(&mut self, index: usize) -> Result<T> {
        let len = self.len();
        check_index(index, len)?;
        let removed = if index == 0 {
            self.pop_head()
        } else {
            let prev = self.key_at(index - 1)?;
            self.unlink_after(prev)
        };
        removed.ok_or(Error::IndexOutOfBounds { index, len })
    }

    pub fn delete_first(&mut self) -> Result<T> {
        self.pop_head().ok_or_else(|| self.empty_error())
    }

    pub fn delete_last(&mut self) -> Result<T> {
        let last = self.last_index()?;
        self.delete(last)
    }

    pub fn find<P>(&self, mut pred: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|v| pred(*v))
    }

    pub fn find_mut<P>(&mut self, mut pred: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            if pred(&self.nodes[k].value) {
                return self.nodes.get_mut(k).map(|n| &mut n.value);
            }
            cur = self.nodes[k].next;
        }
        None
    }

    /// Unlink and return the first value matching `pred`.
    pub fn remove_first<P>(&mut self, mut pred: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let head = self.head?;
        if pred(&self.nodes[head].value) {
            return self.pop_head();
        }
        let mut prev = head;
        while let Some(cur) = self.nodes[prev].next {
            if pred(&self.nodes[cur].value) {
                return self.unlink_after(prev);
            }
            prev = cur;
        }
        None
    }

    /// Replace every value with `transform(value)`, keeping order.
    pub fn map<F>(&mut self, mut transform: F)
    where
        F: FnMut(T) -> T,
    {
        // Values are moved out, so the arena is rebuilt; keys never escape
        // the chain.
        let old = core::mem::take(self);
        for value in old {
            self.append(transform(value));
        }
    }

    /// Keep only values matching `pred`, preserving their relative order.
    pub fn filter<P>(&mut self, mut pred: P)
    where
        P: FnMut(&T) -> bool,
    {
        while let Some(head) = self.head {
            if pred(&self.nodes[head].value) {
                break;
            }
            self.pop_head();
        }
        let Some(mut prev) = self.head else {
            return;
        };
        while let Some(cur) = self.nodes[prev].next {
            if pred(&self.nodes[cur].value) {
                prev = cur;
            } else {
                self.unlink_after(prev);
            }
        }
    }

    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&T),
    {
        for v in self.iter() {
            action(v);
        }
    }

    pub fn for_each_mut<F>(&mut self, mut action: F)
    where
        F: FnMut(&mut T),
    {
        let mut cur = self.head;
        while let Some(k) = cur {
            let node = &mut self.nodes[k];
            action(&mut node.value);
            cur = node.next;
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            cur: self.head,
            remaining: self.len(),
        }
    }
}

impl<T: PartialEq> Chain<T> {
    /// Index of the first node equal to `target`.
    pub fn search(&self, target: &T) -> Option<usize> {
        self.iter().position(|v| v == target)
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Chain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Chain<T> {}

impl<T> FromIterator<T> for Chain<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut chain = Chain::new();
        for v in iter {
            chain.append(v);
        }
        chain
    }
}

impl<T> Extend<T> for Chain<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.append(v);
        }
    }
}

impl<T> From<Sequence<T>> for Chain<T> {
    fn from(seq: Sequence<T>) -> Self {
        seq.into_iter().collect()
    }
}

/// Iterator over values from head to tail.
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<DefaultKey, Node<T>>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cur?)?;
        self.cur = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Owning iterator; pops from the head.
pub struct IntoIter<T> {
    chain: Chain<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    #[inline]
    fn next(&mut self) -> Option<T> {
        self.chain.pop_head()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.chain.len();
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Chain<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<T> Chain<T> {
    /// Walk the links and assert every structural invariant.
    pub(crate) fn assert_links(&self) {
        match (self.head, self.tail) {
            (None, None) => assert_eq!(self.nodes.len(), 0, "empty chain holds nodes"),
            (Some(_), Some(tail)) => {
                let mut cur = self.head;
                let mut last = None;
                let mut seen = 0;
                while let Some(k) = cur {
                    seen += 1;
                    assert!(seen <= self.nodes.len(), "cycle in chain");
                    last = Some(k);
                    cur = self.nodes[k].next;
                }
                assert_eq!(seen, self.nodes.len(), "unreachable nodes in arena");
                assert_eq!(last, Some(tail), "tail is not the last reachable node");
            }
            (h, t) => panic!("head/tail disagree: {:?} / {:?}", h, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn chain(xs: &[i32]) -> Chain<i32> {
        xs.iter().copied().collect()
    }

    fn contents(c: &Chain<i32>) -> Vec<i32> {
        c.iter().copied().collect()
    }

    /// Invariant: an empty chain has no head or tail and every end
    /// accessor reports IndexOutOfBounds.
    #[test]
    fn empty_chain_accessors_fail() {
        let mut c: Chain<i32> = Chain::new();
        c.assert_links();
        assert!(c.is_empty());
        assert_eq!(c.head().unwrap_err().kind(), ErrorKind::IndexOutOfBounds);
        assert!(c.tail().is_err());
        assert_eq!(
            c.delete_first(),
            Err(Error::IndexOutOfBounds { index: 0, len: 0 })
        );
        assert!(c.delete_last().is_err());
        assert!(c.get(0).is_err());
        assert!(c.delete(0).is_err());
        assert!(c.insert(1, 5).is_err());
        c.assert_links();
    }

    /// Invariant: prepend/append keep head and tail on the ends.
    #[test]
    fn prepend_append_track_ends() {
        let mut c = Chain::new();
        c.append(2);
        assert_eq!((c.head(), c.tail()), (Ok(&2), Ok(&2)));
        c.prepend(1);
        c.append(3);
        c.assert_links();
        assert_eq!(c.head(), Ok(&1));
        assert_eq!(c.tail(), Ok(&3));
        assert_eq!(contents(&c), vec![1, 2, 3]);
    }

    /// Invariant: insert accepts `index <= len` and places the value at `index`.
    #[test]
    fn positional_insert() {
        let mut c = chain(&[1, 3]);
        c.insert(1, 2).unwrap();
        c.insert(0, 0).unwrap();
        c.insert(4, 4).unwrap();
        c.assert_links();
        assert_eq!(contents(&c), vec![0, 1, 2, 3, 4]);
        assert_eq!(c.tail(), Ok(&4));
        assert_eq!(
            c.insert(6, 9),
            Err(Error::IndexOutOfBounds { index: 6, len: 5 })
        );
        assert_eq!(c.len(), 5);
    }

    /// Invariant: deleting the tail moves the tail back to its predecessor;
    /// deleting the sole node clears both ends.
    #[test]
    fn delete_updates_ends() {
        let mut c = chain(&[1, 2, 3, 4]);
        assert_eq!(c.delete(2), Ok(3));
        c.assert_links();
        assert_eq!(c.delete_last(), Ok(4));
        c.assert_links();
        assert_eq!(c.tail(), Ok(&2));
        assert_eq!(c.delete_first(), Ok(1));
        assert_eq!((c.head(), c.tail()), (Ok(&2), Ok(&2)));
        assert_eq!(c.delete(0), Ok(2));
        c.assert_links();
        assert!(c.head().is_err() && c.tail().is_err());
        assert!(c.delete(0).is_err());
    }

    #[test]
    fn get_set_search() {
        let mut c = chain(&[4, 5, 6, 5]);
        assert_eq!(c.get(1), Ok(&5));
        assert_eq!(c.get(3), Ok(&5));
        assert!(c.get(4).is_err());
        c.set(2, 60).unwrap();
        assert!(c.set(4, 0).is_err());
        assert_eq!(contents(&c), vec![4, 5, 60, 5]);
        assert_eq!(c.search(&5), Some(1));
        assert_eq!(c.search(&7), None);
        *c.get_mut(0).unwrap() += 1;
        assert_eq!(c.head(), Ok(&5));
    }

    /// Invariant: filter keeps matching values in their original order.
    #[test]
    fn filter_preserves_order() {
        let mut c = chain(&[1, 2, 3, 4, 5]);
        c.filter(|x| x % 2 == 0);
        c.assert_links();
        assert_eq!(contents(&c), vec![2, 4]);
        assert_eq!(c.tail(), Ok(&4));
    }

    /// Invariant: filter handles runs of leading and trailing rejects, and
    /// rejecting everything leaves an empty, consistent chain.
    #[test]
    fn filter_edges() {
        let mut c = chain(&[1, 1, 1, 2, 3, 3]);
        c.filter(|x| *x == 2);
        c.assert_links();
        assert_eq!(contents(&c), vec![2]);
        assert_eq!((c.head(), c.tail()), (Ok(&2), Ok(&2)));

        let mut c = chain(&[1, 3, 5]);
        c.filter(|x| x % 2 == 0);
        c.assert_links();
        assert!(c.is_empty());

        let mut c = chain(&[2, 4]);
        c.filter(|_| true);
        assert_eq!(contents(&c), vec![2, 4]);
    }

    #[test]
    fn map_replaces_in_order() {
        let mut c = chain(&[1, 2, 3]);
        c.map(|x| x * 10);
        c.assert_links();
        assert_eq!(contents(&c), vec![10, 20, 30]);
        assert_eq!(c.tail(), Ok(&30));

        let mut empty: Chain<i32> = Chain::new();
        empty.map(|x| x + 1);
        empty.assert_links();
        assert!(empty.is_empty());
    }

    #[test]
    fn find_and_remove_first() {
        let mut c = chain(&[3, 8, 5, 8]);
        assert_eq!(c.find(|x| *x > 4), Some(&8));
        assert_eq!(c.find(|x| *x > 100), None);
        if let Some(v) = c.find_mut(|x| *x == 5) {
            *v = 50;
        }
        assert_eq!(c.remove_first(|x| *x == 8), Some(8));
        c.assert_links();
        assert_eq!(contents(&c), vec![3, 50, 8]);
        assert_eq!(c.remove_first(|x| *x == 8), Some(8));
        c.assert_links();
        assert_eq!(c.tail(), Ok(&50));
        assert_eq!(c.remove_first(|x| *x == 8), None);
        assert_eq!(c.remove_first(|x| *x == 3), Some(3));
        assert_eq!(c.remove_first(|x| *x == 50), Some(50));
        c.assert_links();
        assert_eq!(c.remove_first(|_| true), None);
    }

    #[test]
    fn for_each_visits_head_to_tail() {
        let mut c = chain(&[1, 2, 3]);
        let mut seen = Vec::new();
        c.for_each(|x| seen.push(*x));
        assert_eq!(seen, vec![1, 2, 3]);
        c.for_each_mut(|x| *x += 1);
        assert_eq!(contents(&c), vec![2, 3, 4]);
    }

    #[test]
    fn conversions() {
        let seq = Sequence::from(vec![7, 8, 9]);
        let c = Chain::from(seq);
        c.assert_links();
        assert_eq!(c.iter().len(), 3);
        assert_eq!(format!("{:?}", c), "[7, 8, 9]");
        assert_eq!(c.clone(), chain(&[7, 8, 9]));
        let owned: Vec<i32> = c.into_iter().collect();
        assert_eq!(owned, vec![7, 8, 9]);
    }
}
