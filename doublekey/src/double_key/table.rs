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

use std::borrow::Borrow;

use crate::double_key::DoubleKeyTableBuilder;
use crate::error::Error;
use crate::hash::KeyHasher;
use crate::hash::PolynomialHasher;
use crate::ladder::SizeLadder;
use crate::ladder::needs_resize;
use crate::linear_probe;
use crate::linear_probe::LinearProbeTable;

type Slot<K1, K2, V, H2> = Option<(K1, LinearProbeTable<K2, V, H2>)>;

/// Hash table keyed by a pair of keys.
///
/// The outer level holds one slot per distinct first key, and each slot owns the inner
/// table of all second keys stored under it. Both levels probe linearly, hash with the
/// size they currently have, and grow once more than half of their slots are taken.
///
/// Outer growth is a full stop-the-world rehash: every `(key1, key2, value)` triple is
/// inserted again, so every inner table is rebuilt from the first rung of the inner
/// ladder.
#[derive(Debug, Clone)]
pub struct DoubleKeyTable<K1, K2, V, H1 = PolynomialHasher, H2 = PolynomialHasher> {
    slots: Vec<Slot<K1, K2, V, H2>>,
    // outer slots in use
    occupied: usize,
    // key pairs stored across every inner table
    len: usize,
    size_index: usize,
    sizes: SizeLadder,
    internal_sizes: SizeLadder,
    hasher1: H1,
    hasher2: H2,
}

impl<K1, K2, V> DoubleKeyTable<K1, K2, V> {
    /// Create an empty table on the default size ladder for both levels.
    pub fn new() -> Self {
        let sizes = SizeLadder::default();
        Self::from_parts(sizes.clone(), sizes, PolynomialHasher, PolynomialHasher)
    }

    /// Create a new builder for DoubleKeyTable
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublekey::double_key::DoubleKeyTable;
    /// let table = DoubleKeyTable::<String, String, u32>::builder()
    ///     .sizes([5, 13, 29])
    ///     .internal_sizes([3, 7])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(table.table_size(), 5);
    /// ```
    pub fn builder() -> DoubleKeyTableBuilder<K1, K2, V> {
        DoubleKeyTableBuilder::default()
    }
}

impl<K1, K2, V> Default for DoubleKeyTable<K1, K2, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K1, K2, V, H1, H2> DoubleKeyTable<K1, K2, V, H1, H2> {
    pub(crate) fn from_parts(
        sizes: SizeLadder,
        internal_sizes: SizeLadder,
        hasher1: H1,
        hasher2: H2,
    ) -> Self {
        Self {
            slots: empty_slots(sizes.first()),
            occupied: 0,
            len: 0,
            size_index: 0,
            sizes,
            internal_sizes,
            hasher1,
            hasher2,
        }
    }

    /// Number of key pairs stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no key pair is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of outer slots, i.e. the capacity for distinct first keys.
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// The ladder the outer level grows along.
    pub fn sizes(&self) -> &SizeLadder {
        &self.sizes
    }

    /// The ladder every inner table grows along.
    pub fn internal_sizes(&self) -> &SizeLadder {
        &self.internal_sizes
    }

    /// Iterate over `(key1, key2, value)` triples, in outer slot order and then inner slot
    /// order.
    pub fn iter(&self) -> Iter<'_, K1, K2, V, H2> {
        Iter {
            slots: self.slots.iter(),
            current: None,
            remaining: self.len,
        }
    }

    /// Iterate over the first keys, in outer slot order.
    pub fn iter_keys(&self) -> Keys<'_, K1, K2, V, H2> {
        Keys {
            slots: self.slots.iter(),
            remaining: self.occupied,
        }
    }

    /// All first keys, in outer slot order.
    pub fn keys(&self) -> Vec<&K1> {
        self.iter_keys().collect()
    }

    /// Iterate over every value, in outer slot order and then inner slot order.
    pub fn iter_values(&self) -> Values<'_, K1, K2, V, H2> {
        Values { inner: self.iter() }
    }

    /// All values, in outer slot order and then inner slot order.
    pub fn values(&self) -> Vec<&V> {
        self.iter_values().collect()
    }
}

impl<K1, K2, V, H1, H2> DoubleKeyTable<K1, K2, V, H1, H2>
where
    K1: Eq,
    K2: Eq,
    H1: KeyHasher<K1>,
    H2: KeyHasher<K2> + Clone,
{
    /// Return the value stored under `(key1, key2)`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if either key is
    /// missing at its level.
    pub fn get<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> Result<&V, Error>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Eq + ?Sized,
        Q2: Eq + ?Sized,
        H1: KeyHasher<Q1>,
        H2: KeyHasher<Q2>,
    {
        self.inner_of(key1)?.get(key2)
    }

    /// Return a mutable reference to the value stored under `(key1, key2)`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if either key is
    /// missing at its level.
    pub fn get_mut<Q1, Q2>(&mut self, key1: &Q1, key2: &Q2) -> Result<&mut V, Error>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Eq + ?Sized,
        Q2: Eq + ?Sized,
        H1: KeyHasher<Q1>,
        H2: KeyHasher<Q2>,
    {
        let pos = self.probe(key1, false)?;
        inner_mut(&mut self.slots[pos])?.get_mut(key2)
    }

    /// Whether `(key1, key2)` is stored.
    pub fn contains<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> bool
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Eq + ?Sized,
        Q2: Eq + ?Sized,
        H1: KeyHasher<Q1>,
        H2: KeyHasher<Q2>,
    {
        self.get(key1, key2).is_ok()
    }

    /// Return the outer slot index of `key1` and the inner slot index of `key2`.
    ///
    /// Both indices are only valid until the corresponding level next resizes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublekey::double_key::DoubleKeyTable;
    /// let mut table = DoubleKeyTable::new();
    /// table.set("a", "x", 1).unwrap();
    /// let (outer, inner) = table.position("a", "x").unwrap();
    /// assert!(outer < table.table_size());
    /// assert!(inner < 5);
    /// ```
    pub fn position<Q1, Q2>(&self, key1: &Q1, key2: &Q2) -> Result<(usize, usize), Error>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Eq + ?Sized,
        Q2: Eq + ?Sized,
        H1: KeyHasher<Q1>,
        H2: KeyHasher<Q2>,
    {
        let pos = self.probe(key1, false)?;
        let inner = inner_ref(&self.slots[pos])?.position(key2)?;
        Ok((pos, inner))
    }

    /// Insert `value` under `(key1, key2)`, replacing any previous value.
    ///
    /// The inner table for `key1` is created on its first entry. Once the write is done,
    /// the outer level grows if more than half of its slots are taken.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::TableFull`](crate::error::ErrorKind::TableFull) if the pair is
    /// new and either level has no free slot left after exhausting its size ladder. The
    /// table is left unchanged in that case.
    pub fn set(&mut self, key1: K1, key2: K2, value: V) -> Result<(), Error> {
        let pos = self.probe(&key1, true)?;
        let slot = &mut self.slots[pos];
        if let Some((_, inner)) = slot.as_mut() {
            let before = inner.len();
            inner.set(key2, value)?;
            self.len += inner.len() - before;
        } else {
            let mut inner = LinearProbeTable::with_sizes_and_hasher(
                self.internal_sizes.clone(),
                self.hasher2.clone(),
            );
            inner.set(key2, value)?;
            *slot = Some((key1, inner));
            self.occupied += 1;
            self.len += 1;
        }

        if needs_resize(self.occupied, self.slots.len()) {
            self.rehash();
        }
        Ok(())
    }

    /// Remove `(key1, key2)` and return its value.
    ///
    /// Removing the last second key under `key1` also frees the outer slot of `key1`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if the pair is
    /// not stored.
    pub fn delete<Q1, Q2>(&mut self, key1: &Q1, key2: &Q2) -> Result<V, Error>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Eq + ?Sized,
        Q2: Eq + ?Sized,
        H1: KeyHasher<Q1>,
        H2: KeyHasher<Q2>,
    {
        let pos = self.probe(key1, false)?;
        let inner = inner_mut(&mut self.slots[pos])?;
        let value = inner.delete(key2)?;
        let emptied = inner.is_empty();
        self.len -= 1;

        if emptied {
            log::trace!("last entry removed, releasing outer slot {pos}");
            self.slots[pos] = None;
            self.occupied -= 1;

            // keep the rest of the outer cluster reachable from its hash positions
            let size = self.slots.len();
            let mut next = (pos + 1) % size;
            while let Some(entry) = self.slots[next].take() {
                self.occupied -= 1;
                self.place(entry);
                next = (next + 1) % size;
            }
        }
        Ok(value)
    }

    /// All second keys stored under `key1`, in inner slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if `key1` is not
    /// stored.
    pub fn keys_of<Q1>(&self, key1: &Q1) -> Result<Vec<&K2>, Error>
    where
        K1: Borrow<Q1>,
        Q1: Eq + ?Sized,
        H1: KeyHasher<Q1>,
    {
        Ok(self.iter_keys_of(key1)?.collect())
    }

    /// Iterate over the second keys stored under `key1`, in inner slot order.
    ///
    /// The lookup of `key1` happens before the iterator is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if `key1` is not
    /// stored.
    pub fn iter_keys_of<Q1>(
        &self,
        key1: &Q1,
    ) -> Result<linear_probe::Keys<'_, K2, V>, Error>
    where
        K1: Borrow<Q1>,
        Q1: Eq + ?Sized,
        H1: KeyHasher<Q1>,
    {
        Ok(self.inner_of(key1)?.iter_keys())
    }

    /// All values stored under `key1`, in inner slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if `key1` is not
    /// stored.
    pub fn values_of<Q1>(&self, key1: &Q1) -> Result<Vec<&V>, Error>
    where
        K1: Borrow<Q1>,
        Q1: Eq + ?Sized,
        H1: KeyHasher<Q1>,
    {
        Ok(self.iter_values_of(key1)?.collect())
    }

    /// Iterate over the values stored under `key1`, in inner slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if `key1` is not
    /// stored.
    pub fn iter_values_of<Q1>(
        &self,
        key1: &Q1,
    ) -> Result<linear_probe::Values<'_, K2, V>, Error>
    where
        K1: Borrow<Q1>,
        Q1: Eq + ?Sized,
        H1: KeyHasher<Q1>,
    {
        Ok(self.inner_of(key1)?.iter_values())
    }

    fn inner_of<Q1>(&self, key1: &Q1) -> Result<&LinearProbeTable<K2, V, H2>, Error>
    where
        K1: Borrow<Q1>,
        Q1: Eq + ?Sized,
        H1: KeyHasher<Q1>,
    {
        let pos = self.probe(key1, false)?;
        inner_ref(&self.slots[pos])
    }

    /// Find the outer slot for `key1`: the slot holding it, or when `is_insert` the first
    /// empty slot of its probe sequence.
    fn probe<Q1>(&self, key1: &Q1, is_insert: bool) -> Result<usize, Error>
    where
        K1: Borrow<Q1>,
        Q1: Eq + ?Sized,
        H1: KeyHasher<Q1>,
    {
        let size = self.slots.len();
        let mut pos = self.hasher1.hash(key1, size);
        for _ in 0..size {
            match &self.slots[pos] {
                None if is_insert => return Ok(pos),
                None => return Err(Error::not_found("first key")),
                Some((existing, _)) if <K1 as Borrow<Q1>>::borrow(existing) == key1 => {
                    return Ok(pos);
                }
                Some(_) => pos = (pos + 1) % size,
            }
        }

        if is_insert {
            Err(Error::table_full(size).with_context("level", "outer"))
        } else {
            Err(Error::not_found("first key"))
        }
    }

    /// Put an outer entry whose first key is known to be absent into the first empty slot
    /// of its probe sequence.
    fn place(&mut self, entry: (K1, LinearProbeTable<K2, V, H2>)) {
        let size = self.slots.len();
        debug_assert!(self.occupied < size, "no free outer slot to place an entry");
        let mut pos = self.hasher1.hash(&entry.0, size);
        while self.slots[pos].is_some() {
            pos = (pos + 1) % size;
        }
        self.slots[pos] = Some(entry);
        self.occupied += 1;
    }

    /// Move the outer level up its ladder and insert every triple again.
    fn rehash(&mut self) {
        let Some(next) = self.sizes.grow_index(self.size_index, self.occupied) else {
            log::debug!(
                "outer size ladder exhausted, keeping {} slots for {} first keys",
                self.slots.len(),
                self.occupied
            );
            return;
        };

        let new_size = self.sizes.as_slice()[next];
        log::debug!(
            "growing outer table from {} to {} slots ({} first keys, {} pairs)",
            self.slots.len(),
            new_size,
            self.occupied,
            self.len
        );
        let old_slots = std::mem::replace(&mut self.slots, empty_slots(new_size));
        self.size_index = next;
        self.occupied = 0;
        self.len = 0;
        for (key1, inner) in old_slots.into_iter().flatten() {
            let inner = inner.rebuilt();
            self.len += inner.len();
            self.place((key1, inner));
        }
    }
}

fn inner_ref<K1, K2, V, H2>(
    slot: &Slot<K1, K2, V, H2>,
) -> Result<&LinearProbeTable<K2, V, H2>, Error> {
    slot.as_ref()
        .map(|(_, inner)| inner)
        .ok_or_else(|| Error::not_found("first key"))
}

fn inner_mut<K1, K2, V, H2>(
    slot: &mut Slot<K1, K2, V, H2>,
) -> Result<&mut LinearProbeTable<K2, V, H2>, Error> {
    slot.as_mut()
        .map(|(_, inner)| inner)
        .ok_or_else(|| Error::not_found("first key"))
}

fn empty_slots<T>(size: usize) -> Vec<Option<T>> {
    (0..size).map(|_| None).collect()
}

/// Iterator over the `(key1, key2, value)` triples of a [`DoubleKeyTable`].
#[derive(Debug)]
pub struct Iter<'a, K1, K2, V, H2> {
    slots: std::slice::Iter<'a, Slot<K1, K2, V, H2>>,
    current: Option<(&'a K1, linear_probe::Iter<'a, K2, V>)>,
    remaining: usize,
}

impl<'a, K1, K2, V, H2> Iterator for Iter<'a, K1, K2, V, H2> {
    type Item = (&'a K1, &'a K2, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key1, entries)) = self.current.as_mut() {
                if let Some((key2, value)) = entries.next() {
                    self.remaining -= 1;
                    return Some((*key1, key2, value));
                }
            }
            let (key1, inner) = self.slots.by_ref().find_map(|slot| slot.as_ref())?;
            self.current = Some((key1, inner.iter()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K1, K2, V, H2> ExactSizeIterator for Iter<'_, K1, K2, V, H2> {}

/// Iterator over the first keys of a [`DoubleKeyTable`], in outer slot order.
#[derive(Debug)]
pub struct Keys<'a, K1, K2, V, H2> {
    slots: std::slice::Iter<'a, Slot<K1, K2, V, H2>>,
    remaining: usize,
}

impl<'a, K1, K2, V, H2> Iterator for Keys<'a, K1, K2, V, H2> {
    type Item = &'a K1;

    fn next(&mut self) -> Option<Self::Item> {
        let (key1, _) = self.slots.by_ref().find_map(|slot| slot.as_ref())?;
        self.remaining -= 1;
        Some(key1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K1, K2, V, H2> ExactSizeIterator for Keys<'_, K1, K2, V, H2> {}

/// Iterator over every value of a [`DoubleKeyTable`].
#[derive(Debug)]
pub struct Values<'a, K1, K2, V, H2> {
    inner: Iter<'a, K1, K2, V, H2>,
}

impl<'a, K1, K2, V, H2> Iterator for Values<'a, K1, K2, V, H2> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, _, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K1, K2, V, H2> ExactSizeIterator for Values<'_, K1, K2, V, H2> {}

impl<'a, K1, K2, V, H1, H2> IntoIterator for &'a DoubleKeyTable<K1, K2, V, H1, H2> {
    type Item = (&'a K1, &'a K2, &'a V);
    type IntoIter = Iter<'a, K1, K2, V, H2>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Sends every first key to slot 0 to force one long outer cluster.
    #[derive(Debug, Clone, Copy)]
    struct Colliding;

    impl<K: ?Sized> KeyHasher<K> for Colliding {
        fn hash(&self, _key: &K, _table_size: usize) -> usize {
            0
        }
    }

    fn inner_sizes<K1, K2, V, H1, H2>(table: &DoubleKeyTable<K1, K2, V, H1, H2>) -> Vec<usize> {
        table
            .slots
            .iter()
            .flatten()
            .map(|(_, inner)| inner.table_size())
            .collect()
    }

    #[test]
    fn test_occupancy_counts_first_keys() {
        let mut table = DoubleKeyTable::new();
        table.set("a", "x", 1).unwrap();
        table.set("a", "y", 2).unwrap();
        table.set("b", "z", 3).unwrap();
        assert_eq!(table.occupied, 2);
        assert_eq!(table.len(), 3);

        table.set("a", "x", 10).unwrap();
        assert_eq!(table.occupied, 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_delete_repairs_outer_cluster() {
        let mut table = DoubleKeyTable::<&str, &str, i32>::builder()
            .sizes([7])
            .hashers(Colliding, PolynomialHasher)
            .build()
            .unwrap();
        table.set("a", "x", 1).unwrap();
        table.set("b", "x", 2).unwrap();
        table.set("c", "x", 3).unwrap();
        assert_eq!(table.position("c", "x").unwrap().0, 2);

        assert_eq!(table.delete("a", "x").unwrap(), 1);
        assert_eq!(table.occupied, 2);
        assert_eq!(table.get("b", "x").unwrap(), &2);
        assert_eq!(table.get("c", "x").unwrap(), &3);
        assert_eq!(table.position("b", "x").unwrap().0, 0);
        assert_eq!(table.position("c", "x").unwrap().0, 1);
    }

    #[test]
    fn test_load_factor_bound_after_every_set() {
        let mut table = DoubleKeyTable::new();
        for i in 0..500 {
            table
                .set(format!("first_{}", i % 41), format!("second_{i}"), i)
                .unwrap();
            assert!(table.occupied <= table.table_size() / 2);
            for (_, inner) in table.slots.iter().flatten() {
                assert!(inner.len() <= inner.table_size() / 2);
            }
        }
        assert_eq!(table.len(), 500);
        assert_eq!(table.occupied, 41);
    }

    #[test]
    fn test_outer_rehash_rebuilds_inner_tables() {
        let mut table = DoubleKeyTable::builder()
            .sizes([5, 13])
            .internal_sizes([5, 13, 29])
            .build()
            .unwrap();
        for i in 0..10 {
            table.set("a".to_string(), format!("k{i}"), i).unwrap();
        }
        assert_eq!(inner_sizes(&table), vec![29]);
        for i in 2..10 {
            table.delete("a", format!("k{i}").as_str()).unwrap();
        }
        assert_eq!(inner_sizes(&table), vec![29]);

        table.set("b".to_string(), "k0".to_string(), 0).unwrap();
        table.set("c".to_string(), "k0".to_string(), 0).unwrap();
        assert_eq!(table.table_size(), 13);
        assert_eq!(inner_sizes(&table), vec![5, 5, 5]);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("a", "k1").unwrap(), &1);
    }

    #[test]
    fn test_full_outer_level() {
        let mut table = DoubleKeyTable::builder().sizes([3]).build().unwrap();
        table.set("a", "x", 1).unwrap();
        table.set("b", "x", 2).unwrap();
        table.set("c", "x", 3).unwrap();
        assert_eq!(table.table_size(), 3);

        let err = table.set("d", "x", 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableFull);
        assert_eq!(table.len(), 3);
        assert_eq!(table.occupied, 3);
        assert!(!table.contains("d", "x"));
        assert_eq!(table.get("d", "x").unwrap_err().kind(), ErrorKind::NotFound);

        // existing first keys still accept new second keys
        table.set("a", "y", 5).unwrap();
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_failed_inner_insert_leaves_table_unchanged() {
        let mut table = DoubleKeyTable::builder()
            .sizes([13])
            .internal_sizes([2])
            .build()
            .unwrap();
        table.set("a", "x", 1).unwrap();
        table.set("a", "y", 2).unwrap();

        let err = table.set("a", "z", 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableFull);
        assert_eq!(table.len(), 2);
        assert_eq!(table.occupied, 1);
        assert_eq!(table.values_of("a").unwrap().len(), 2);
    }
}
