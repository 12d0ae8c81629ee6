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

//! Hash functions mapping keys onto slots of a table of a given size.
//!
//! The hash of a key depends on the *current* size of the table it is probed in, so a
//! hash code is only meaningful until the table resizes. Tables therefore never cache
//! hash codes; each probe recomputes the start index at the current size.

mod murmur;
mod polynomial;

pub use self::murmur::MurmurHasher;
pub use self::polynomial::HASH_BASE;
pub use self::polynomial::HASH_SEED;
pub use self::polynomial::PolynomialHasher;

/// Maps a key to a start index for linear probing.
///
/// This is the extension point for key types that are not character sequences:
/// implement it for your own hasher and pass it to
/// [`DoubleKeyTableBuilder::hashers`](crate::double_key::DoubleKeyTableBuilder::hashers)
/// or [`LinearProbeTable::with_sizes_and_hasher`](crate::linear_probe::LinearProbeTable::with_sizes_and_hasher).
///
/// # Examples
///
/// ```
/// use doublekey::hash::KeyHasher;
///
/// #[derive(Clone, Default)]
/// struct Identity;
///
/// impl KeyHasher<u32> for Identity {
///     fn hash(&self, key: &u32, table_size: usize) -> usize {
///         *key as usize % table_size
///     }
/// }
///
/// assert_eq!(Identity.hash(&17, 13), 4);
/// ```
pub trait KeyHasher<K: ?Sized> {
    /// Returns an index in `[0, table_size)` for `key`.
    ///
    /// `table_size` is always at least 1.
    fn hash(&self, key: &K, table_size: usize) -> usize;
}
