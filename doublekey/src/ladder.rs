// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Capacity ladders and the resize policy shared by both table levels.
//!
//! Tables do not double their capacity; they step through a fixed ascending sequence of
//! sizes. Each table keeps its own position on its ladder, which only ever moves up.

use std::sync::Arc;

use crate::error::Error;

/// The reference ladder: primes close to successive doublings.
pub const DEFAULT_TABLE_SIZES: [usize; 19] = [
    5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613,
    393241, 786433, 1572869,
];

/// A validated, non-decreasing sequence of positive table sizes.
///
/// Cloning is cheap, so every inner table holds the same ladder.
///
/// # Examples
///
/// ```
/// use doublekey::ladder::SizeLadder;
///
/// let ladder = SizeLadder::new(vec![5, 13]).unwrap();
/// assert_eq!(ladder.first(), 5);
/// assert_eq!(ladder.get(1), Some(13));
/// assert!(SizeLadder::new(vec![13, 5]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeLadder {
    sizes: Arc<[usize]>,
}

impl SizeLadder {
    /// Creates a ladder from the given sizes.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if the
    /// ladder is empty, contains a zero, or is not non-decreasing.
    pub fn new(sizes: impl Into<Vec<usize>>) -> Result<Self, Error> {
        let sizes = sizes.into();
        if sizes.is_empty() {
            return Err(Error::invalid_sizes("table sizes must not be empty"));
        }
        if let Some(pos) = sizes.iter().position(|&size| size == 0) {
            return Err(Error::invalid_sizes("table sizes must be positive")
                .with_context("index", pos));
        }
        if let Some(pos) = sizes.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::invalid_sizes("table sizes must be non-decreasing")
                .with_context("index", pos + 1)
                .with_context("previous", sizes[pos])
                .with_context("size", sizes[pos + 1]));
        }
        Ok(Self {
            sizes: sizes.into(),
        })
    }

    /// Returns the number of rungs.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// A ladder always has at least one size.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the size at `index`, if the ladder is that long.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    /// Returns the smallest size, used by freshly created tables.
    pub fn first(&self) -> usize {
        self.sizes[0]
    }

    /// Returns the sizes as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }

    /// Returns the rung a table at `current` holding `count` entries should move to.
    ///
    /// This is the first later rung whose size keeps `count` within the load bound, or
    /// the last rung if none does. Returns `None` when `current` is already the last
    /// rung, in which case the table keeps its capacity.
    pub(crate) fn grow_index(&self, current: usize, count: usize) -> Option<usize> {
        let last = self.sizes.len() - 1;
        if current >= last {
            return None;
        }
        let mut next = current + 1;
        while next < last && needs_resize(count, self.sizes[next]) {
            next += 1;
        }
        Some(next)
    }
}

impl Default for SizeLadder {
    fn default() -> Self {
        Self {
            sizes: Arc::from(&DEFAULT_TABLE_SIZES[..]),
        }
    }
}

/// Whether `count` occupied slots exceed half of `capacity`.
pub(crate) fn needs_resize(count: usize, capacity: usize) -> bool {
    count > capacity / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_ladder() {
        let ladder = SizeLadder::default();
        assert_eq!(ladder.len(), DEFAULT_TABLE_SIZES.len());
        assert_eq!(ladder.first(), 5);
        assert_eq!(ladder.get(18), Some(1572869));
        assert_eq!(ladder.get(19), None);
    }

    #[test]
    fn test_rejects_invalid_ladders() {
        let empty = SizeLadder::new(Vec::<usize>::new()).unwrap_err();
        assert_eq!(empty.kind(), ErrorKind::ConfigInvalid);

        let zero = SizeLadder::new(vec![5, 0, 13]).unwrap_err();
        assert_eq!(zero.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(zero.context(), &[("index", "1".to_string())]);

        let decreasing = SizeLadder::new(vec![5, 13, 7]).unwrap_err();
        assert_eq!(decreasing.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(decreasing.message(), "table sizes must be non-decreasing");
    }

    #[test]
    fn test_accepts_repeated_sizes() {
        let ladder = SizeLadder::new(vec![5, 5, 13]).unwrap();
        assert_eq!(ladder.as_slice(), &[5, 5, 13]);
    }

    #[test]
    fn test_needs_resize() {
        assert!(!needs_resize(2, 5));
        assert!(needs_resize(3, 5));
        assert!(!needs_resize(2, 4));
        assert!(needs_resize(3, 4));
        assert!(!needs_resize(0, 1));
        assert!(needs_resize(1, 1));
    }

    #[test]
    fn test_grow_index() {
        let ladder = SizeLadder::new(vec![5, 13, 29]).unwrap();
        assert_eq!(ladder.grow_index(0, 3), Some(1));
        assert_eq!(ladder.grow_index(1, 7), Some(2));
        assert_eq!(ladder.grow_index(2, 15), None);
    }

    #[test]
    fn test_grow_index_skips_rungs_too_small() {
        let ladder = SizeLadder::new(vec![2, 2, 2, 5, 100]).unwrap();
        assert_eq!(ladder.grow_index(0, 2), Some(3));
        // nothing fits, so the largest rung is used
        let ladder = SizeLadder::new(vec![2, 3, 4]).unwrap();
        assert_eq!(ladder.grow_index(0, 10), Some(2));
    }
}
