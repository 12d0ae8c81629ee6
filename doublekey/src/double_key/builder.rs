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

use std::marker::PhantomData;

use crate::double_key::DoubleKeyTable;
use crate::error::Error;
use crate::hash::PolynomialHasher;
use crate::ladder::SizeLadder;

/// Builder for [`DoubleKeyTable`].
///
/// Without explicit sizes both levels use
/// [`DEFAULT_TABLE_SIZES`](crate::ladder::DEFAULT_TABLE_SIZES). Without explicit internal
/// sizes the inner tables use the same ladder as the outer level.
///
/// # Examples
///
/// ```
/// use doublekey::double_key::DoubleKeyTable;
///
/// let mut table = DoubleKeyTable::builder()
///     .sizes([5, 13, 29])
///     .internal_sizes([3, 7, 17])
///     .build()
///     .unwrap();
///
/// table.set("lake", "depth", 42).unwrap();
/// assert_eq!(table.internal_sizes().as_slice(), &[3, 7, 17]);
/// ```
#[derive(Debug, Clone)]
pub struct DoubleKeyTableBuilder<K1, K2, V, H1 = PolynomialHasher, H2 = PolynomialHasher> {
    sizes: Option<Vec<usize>>,
    internal_sizes: Option<Vec<usize>>,
    hasher1: H1,
    hasher2: H2,
    _marker: PhantomData<fn() -> (K1, K2, V)>,
}

impl<K1, K2, V> Default for DoubleKeyTableBuilder<K1, K2, V> {
    fn default() -> Self {
        Self {
            sizes: None,
            internal_sizes: None,
            hasher1: PolynomialHasher,
            hasher2: PolynomialHasher,
            _marker: PhantomData,
        }
    }
}

impl<K1, K2, V, H1, H2> DoubleKeyTableBuilder<K1, K2, V, H1, H2> {
    /// Set the size ladder of the outer level.
    ///
    /// The sizes must be positive and non-decreasing; this is checked by
    /// [`build`](Self::build).
    pub fn sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.sizes = Some(sizes.into());
        self
    }

    /// Set the size ladder of every inner table.
    ///
    /// The sizes must be positive and non-decreasing; this is checked by
    /// [`build`](Self::build).
    pub fn internal_sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.internal_sizes = Some(sizes.into());
        self
    }

    /// Set the hashers for the first and the second key.
    ///
    /// Use this for keys that are not character sequences.
    pub fn hashers<G1, G2>(
        self,
        hasher1: G1,
        hasher2: G2,
    ) -> DoubleKeyTableBuilder<K1, K2, V, G1, G2> {
        DoubleKeyTableBuilder {
            sizes: self.sizes,
            internal_sizes: self.internal_sizes,
            hasher1,
            hasher2,
            _marker: PhantomData,
        }
    }

    /// Build the table.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if a
    /// ladder is empty, contains a zero, or decreases.
    pub fn build(self) -> Result<DoubleKeyTable<K1, K2, V, H1, H2>, Error> {
        let sizes = match self.sizes {
            Some(sizes) => SizeLadder::new(sizes).map_err(|e| e.with_context("ladder", "sizes"))?,
            None => SizeLadder::default(),
        };
        let internal_sizes = match self.internal_sizes {
            Some(sizes) => {
                SizeLadder::new(sizes).map_err(|e| e.with_context("ladder", "internal_sizes"))?
            }
            None => sizes.clone(),
        };
        Ok(DoubleKeyTable::from_parts(
            sizes,
            internal_sizes,
            self.hasher1,
            self.hasher2,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hash::MurmurHasher;
    use crate::ladder::DEFAULT_TABLE_SIZES;

    #[test]
    fn test_defaults() {
        let table = DoubleKeyTable::<String, String, i32>::builder().build().unwrap();
        assert_eq!(table.sizes().as_slice(), &DEFAULT_TABLE_SIZES);
        assert_eq!(table.internal_sizes().as_slice(), &DEFAULT_TABLE_SIZES);
        assert_eq!(table.table_size(), 5);
        assert!(table.is_empty());
    }

    #[test]
    fn test_internal_sizes_follow_outer_sizes() {
        let table = DoubleKeyTable::<String, String, i32>::builder()
            .sizes([7, 11])
            .build()
            .unwrap();
        assert_eq!(table.internal_sizes().as_slice(), &[7, 11]);
        assert_eq!(table.table_size(), 7);
    }

    #[test]
    fn test_invalid_ladders() {
        let err = DoubleKeyTable::<String, String, i32>::builder()
            .sizes(Vec::<usize>::new())
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context(), &[("ladder", "sizes".to_string())]);

        let err = DoubleKeyTable::<String, String, i32>::builder()
            .internal_sizes([13, 5])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert!(err.to_string().contains("internal_sizes"));
    }

    #[test]
    fn test_custom_hashers() {
        let mut table = DoubleKeyTable::<u32, u32, &str>::builder()
            .hashers(MurmurHasher::with_seed(1), MurmurHasher::with_seed(2))
            .build()
            .unwrap();
        for i in 0..50 {
            table.set(i % 5, i, "v").unwrap();
        }
        assert_eq!(table.len(), 50);
        assert_eq!(table.keys().len(), 5);
        assert_eq!(table.get(&3, &48).unwrap(), &"v");
    }
}
