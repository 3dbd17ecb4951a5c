//! chain-map: a separate-chaining hash table built from two small
//! collaborators, a dynamic array and a singly linked list.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep each layer small enough that its invariants can be read
//!   off the code and checked by tests after every mutation.
//! - Layers:
//!   - Sequence<T>: contiguous, index-addressable storage with shifting
//!     insert/delete and bounds-checked positional access.
//!   - Chain<T>: singly linked list. Nodes live in a per-chain slotmap
//!     arena and link forward by key; the chain tracks head and tail so
//!     both ends are O(1). Supports find, in-place map/filter, for-each.
//!   - HashTable<K, V, S>: a `Sequence` of `Chain` buckets holding owned
//!     `(key, value)` entries, with doubling growth.
//!
//! Constraints
//! - Single-threaded: no internal locking. `HashTable` is `Send` but not
//!   `Sync`; share it behind a lock if you must.
//! - Unique keys: `set` on a present key overwrites in place.
//! - Growth only: starts at 16 buckets, doubles whenever an insert leaves
//!   the load factor above 0.7, never shrinks.
//! - No unsafe code.
//!
//! Hashing
//! - The bucket for a key is `S::hash_one(key) % bucket_count`. Callers
//!   must uphold `a == b ⇒ hash(a) == hash(b)`, as for std maps.
//! - The default `S` is hashbrown's `DefaultHashBuilder`.
//!
//! Growth
//! - Resize is eager and atomic relative to the `set` that triggers it: a
//!   new array of twice the length is allocated, every entry is moved
//!   (old-bucket order, then chain order) to `hash % new_len`, and the old
//!   array is dropped. Rehashing places entries directly and never runs
//!   the growth check, so it cannot recurse.
//! - Iteration order is bucket order, which is not insertion order once
//!   a resize has happened.
//!
//! Errors
//! - Positional operations on `Sequence` and `Chain` return
//!   `Error::IndexOutOfBounds` before touching anything.
//! - Key absence in `HashTable` is `None`, never an error.
//!
//! Reentrancy policy
//! - Key-based `HashTable` methods and the resize path hold a debug-only
//!   reentrancy guard; user code (`K: Eq/Hash`) that calls back into the
//!   same table while it is probing panics in debug builds.
//!
//! Logging
//! - `tracing` events only; the crate never installs a subscriber. Growth
//!   is logged at `debug`, new-entry placement at `trace`.

pub mod chain;
mod chain_proptest;
pub mod error;
mod reentrancy;
pub mod sequence;
pub mod table;
mod table_proptest;

// Public surface
pub use chain::Chain;
pub use error::{Error, ErrorKind, Result};
pub use sequence::Sequence;
pub use table::{HashTable, INITIAL_BUCKETS, MAX_LOAD_FACTOR};
