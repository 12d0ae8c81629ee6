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

use crate::hash::KeyHasher;

/// Multiplier applied to the running coefficient after every character.
pub const HASH_BASE: u128 = 31;

/// Initial value of the running coefficient.
pub const HASH_SEED: u128 = 31415;

/// Polynomial rolling hash over the characters of a string key.
///
/// For every character `c` the running value becomes `(c + a * value) mod size`, after
/// which the coefficient becomes `(a * HASH_BASE) mod (size - 1)`. Both reductions use
/// the size of the table being probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolynomialHasher;

impl<K: AsRef<str> + ?Sized> KeyHasher<K> for PolynomialHasher {
    fn hash(&self, key: &K, table_size: usize) -> usize {
        debug_assert!(table_size > 0, "table size must be positive");
        // a single slot leaves nothing to choose, and `size - 1` would be zero below
        if table_size <= 1 {
            return 0;
        }

        let size = table_size as u128;
        let mut value: u128 = 0;
        let mut a = HASH_SEED;
        for c in key.as_ref().chars() {
            value = (c as u128 + a * value) % size;
            a = a * HASH_BASE % (size - 1);
        }
        value as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_hashes_to_zero() {
        assert_eq!(PolynomialHasher.hash("", 13), 0);
    }

    #[test]
    fn test_known_values() {
        // "a": 97 % 5 = 2
        assert_eq!(PolynomialHasher.hash("a", 5), 2);
        // "ab": value = 97 % 13 = 6, a = 31415 * 31 % 12 = 5; value = (98 + 5 * 6) % 13 = 11
        assert_eq!(PolynomialHasher.hash("ab", 13), 11);
    }

    #[test]
    fn test_result_in_range() {
        for size in [1, 2, 5, 13, 29, 1572869] {
            for key in ["", "a", "hello", "double key table", "ünïcødé"] {
                assert!(PolynomialHasher.hash(key, size) < size);
            }
        }
    }

    #[test]
    fn test_depends_on_table_size() {
        let key = "mountain";
        let small = PolynomialHasher.hash(key, 5);
        let large = PolynomialHasher.hash(key, 1543);
        assert!(small < 5);
        assert!(large < 1543);
        assert_eq!(PolynomialHasher.hash(key, 5), small);
    }

    #[test]
    fn test_owned_and_borrowed_agree() {
        let owned = String::from("trail");
        assert_eq!(
            PolynomialHasher.hash(&owned, 97),
            PolynomialHasher.hash("trail", 97)
        );
    }
}
