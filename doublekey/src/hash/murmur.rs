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

use std::hash::Hash;
use std::hash::Hasher;

use crate::hash::KeyHasher;

/// Hashes any [`Hash`] key with MurmurHash3 (x64, 128 bit) and reduces it to a slot.
///
/// Use it for keys that are not character sequences, e.g. integers or tuples.
///
/// # Examples
///
/// ```
/// use doublekey::double_key::DoubleKeyTable;
/// use doublekey::hash::MurmurHasher;
///
/// let mut table = DoubleKeyTable::<u64, (u8, u8), &str>::builder()
///     .hashers(MurmurHasher::default(), MurmurHasher::with_seed(7))
///     .build()
///     .unwrap();
/// table.set(42, (1, 2), "answer").unwrap();
/// assert_eq!(table.get(&42, &(1, 2)).unwrap(), &"answer");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MurmurHasher {
    seed: u32,
}

impl MurmurHasher {
    /// Creates a hasher with the given seed.
    ///
    /// Tables probed with different seeds place the same key at different slots.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    /// Returns the seed of this hasher.
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl<K: Hash + ?Sized> KeyHasher<K> for MurmurHasher {
    fn hash(&self, key: &K, table_size: usize) -> usize {
        debug_assert!(table_size > 0, "table size must be positive");
        let mut sink = ByteSink::default();
        key.hash(&mut sink);
        let (h1, _) = mur3::murmurhash3_x64_128(&sink.bytes, self.seed);
        (h1 % table_size as u64) as usize
    }
}

/// Collects the bytes a key feeds through [`Hash`] so they can be hashed in one pass.
#[derive(Default)]
struct ByteSink {
    bytes: Vec<u8>,
}

impl Hasher for ByteSink {
    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        mur3::murmurhash3_x64_128(&self.bytes, 0).0
    }
}
