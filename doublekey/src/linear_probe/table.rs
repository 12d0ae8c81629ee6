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

use crate::error::Error;
use crate::hash::KeyHasher;
use crate::hash::PolynomialHasher;
use crate::ladder::SizeLadder;
use crate::ladder::needs_resize;

/// Open addressing hash table resolving collisions by linear probing.
///
/// Entries are kept in slot order, which is what [`keys`](Self::keys),
/// [`values`](Self::values) and the iterators report. Slot order is not insertion order
/// and changes whenever the table resizes.
#[derive(Debug, Clone)]
pub struct LinearProbeTable<K, V, H = PolynomialHasher> {
    slots: Vec<Option<(K, V)>>,
    count: usize,
    size_index: usize,
    sizes: SizeLadder,
    hasher: H,
}

impl<K, V> LinearProbeTable<K, V> {
    /// Create an empty table on the default size ladder.
    pub fn new() -> Self {
        Self::with_sizes(SizeLadder::default())
    }

    /// Create an empty table stepping through `sizes`.
    pub fn with_sizes(sizes: SizeLadder) -> Self {
        Self::with_sizes_and_hasher(sizes, PolynomialHasher)
    }
}

impl<K, V> Default for LinearProbeTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> LinearProbeTable<K, V, H> {
    /// Create an empty table stepping through `sizes` and placing keys with `hasher`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use doublekey::hash::MurmurHasher;
    /// # use doublekey::ladder::SizeLadder;
    /// # use doublekey::linear_probe::LinearProbeTable;
    /// let sizes = SizeLadder::new(vec![3, 7, 17]).unwrap();
    /// let mut table = LinearProbeTable::with_sizes_and_hasher(sizes, MurmurHasher::default());
    /// table.set(7u32, "seven").unwrap();
    /// assert_eq!(table.table_size(), 3);
    /// ```
    pub fn with_sizes_and_hasher(sizes: SizeLadder, hasher: H) -> Self {
        Self {
            slots: empty_slots(sizes.first()),
            count: 0,
            size_index: 0,
            sizes,
            hasher,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no entry is stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Current capacity, i.e. the number of slots.
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// The ladder this table grows along.
    pub fn sizes(&self) -> &SizeLadder {
        &self.sizes
    }

    /// Iterate over `(key, value)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.count,
        }
    }

    /// Iterate over keys in slot order.
    pub fn iter_keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterate over values in slot order.
    pub fn iter_values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// All keys in slot order.
    pub fn keys(&self) -> Vec<&K> {
        self.iter_keys().collect()
    }

    /// All values in slot order.
    pub fn values(&self) -> Vec<&V> {
        self.iter_values().collect()
    }
}

impl<K: Eq, V, H: KeyHasher<K>> LinearProbeTable<K, V, H> {
    /// Return the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if the key is
    /// not stored.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let pos = self.probe(key, false)?;
        self.slots[pos]
            .as_ref()
            .map(|(_, value)| value)
            .ok_or_else(|| Error::not_found("key"))
    }

    /// Return a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if the key is
    /// not stored.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let pos = self.probe(key, false)?;
        self.slots[pos]
            .as_mut()
            .map(|(_, value)| value)
            .ok_or_else(|| Error::not_found("key"))
    }

    /// Whether `key` is stored.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        self.get(key).is_ok()
    }

    /// Return the slot index holding `key`.
    ///
    /// The index is only valid until the table next resizes.
    pub fn position<Q>(&self, key: &Q) -> Result<usize, Error>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        self.probe(key, false)
    }

    /// Insert `value` under `key`, replacing any previous value.
    ///
    /// Inserting a new key may grow the table afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::TableFull`](crate::error::ErrorKind::TableFull) if the key is
    /// new, every slot is taken and the size ladder is exhausted. The table is left
    /// unchanged in that case.
    pub fn set(&mut self, key: K, value: V) -> Result<(), Error> {
        let pos = self.probe(&key, true)?;
        let slot = &mut self.slots[pos];
        if let Some((_, existing)) = slot.as_mut() {
            *existing = value;
            return Ok(());
        }

        *slot = Some((key, value));
        self.count += 1;
        if needs_resize(self.count, self.slots.len()) {
            self.rehash();
        }
        Ok(())
    }

    /// Remove `key` and return its value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if the key is
    /// not stored.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let pos = self.probe(key, false)?;
        let (_, value) = self.slots[pos]
            .take()
            .ok_or_else(|| Error::not_found("key"))?;
        self.count -= 1;

        // Entries further along the cluster may have probed past `pos`; re-place them so
        // that lookups, which stop at the first empty slot, still reach them.
        let size = self.slots.len();
        let mut next = (pos + 1) % size;
        while let Some((key, value)) = self.slots[next].take() {
            self.count -= 1;
            self.place(key, value);
            next = (next + 1) % size;
        }
        Ok(value)
    }

    /// Find the slot for `key`: the slot holding it, or when `is_insert` the first empty
    /// slot of its probe sequence.
    fn probe<Q>(&self, key: &Q, is_insert: bool) -> Result<usize, Error>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: KeyHasher<Q>,
    {
        let size = self.slots.len();
        let mut pos = self.hasher.hash(key, size);
        for _ in 0..size {
            match &self.slots[pos] {
                None if is_insert => return Ok(pos),
                None => return Err(Error::not_found("key")),
                Some((existing, _)) if <K as Borrow<Q>>::borrow(existing) == key => {
                    return Ok(pos);
                }
                Some(_) => pos = (pos + 1) % size,
            }
        }

        if is_insert {
            Err(Error::table_full(size))
        } else {
            Err(Error::not_found("key"))
        }
    }

    /// Re-insert every entry into a fresh table starting from the smallest rung of the
    /// same ladder, growing as the entries come back in.
    ///
    /// The rebuilt table never needs more slots than this one has, so every entry fits.
    pub(crate) fn rebuilt(self) -> Self {
        let Self {
            slots,
            sizes,
            hasher,
            ..
        } = self;
        let mut table = Self::with_sizes_and_hasher(sizes, hasher);
        for (key, value) in slots.into_iter().flatten() {
            table.place(key, value);
            if needs_resize(table.count, table.slots.len()) {
                table.rehash();
            }
        }
        table
    }

    /// Put an entry known to be absent into the first empty slot of its probe sequence.
    fn place(&mut self, key: K, value: V) {
        let size = self.slots.len();
        debug_assert!(self.count < size, "no free slot to place an entry");
        let mut pos = self.hasher.hash(&key, size);
        while self.slots[pos].is_some() {
            pos = (pos + 1) % size;
        }
        self.slots[pos] = Some((key, value));
        self.count += 1;
    }

    /// Move up the size ladder and re-place every entry at the new size.
    fn rehash(&mut self) {
        let Some(next) = self.sizes.grow_index(self.size_index, self.count) else {
            log::debug!(
                "size ladder exhausted, keeping {} slots for {} entries",
                self.slots.len(),
                self.count
            );
            return;
        };

        let new_size = self.sizes.as_slice()[next];
        log::debug!(
            "growing table from {} to {} slots ({} entries)",
            self.slots.len(),
            new_size,
            self.count
        );
        let old_slots = std::mem::replace(&mut self.slots, empty_slots(new_size));
        self.size_index = next;
        self.count = 0;
        for (key, value) in old_slots.into_iter().flatten() {
            self.place(key, value);
        }
    }
}

fn empty_slots<T>(size: usize) -> Vec<Option<T>> {
    (0..size).map(|_| None).collect()
}

/// Iterator over the entries of a [`LinearProbeTable`], in slot order.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    slots: std::slice::Iter<'a, Option<(K, V)>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.slots.by_ref().find_map(|slot| slot.as_ref())?;
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over the keys of a [`LinearProbeTable`], in slot order.
#[derive(Debug, Clone)]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`LinearProbeTable`], in slot order.
#[derive(Debug, Clone)]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Owning iterator over the entries of a [`LinearProbeTable`], in slot order.
#[derive(Debug)]
pub struct IntoIter<K, V> {
    slots: std::vec::IntoIter<Option<(K, V)>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, H> IntoIterator for LinearProbeTable<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
            remaining: self.count,
        }
    }
}

impl<'a, K, V, H> IntoIterator for &'a LinearProbeTable<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ladder(sizes: &[usize]) -> SizeLadder {
        SizeLadder::new(sizes.to_vec()).unwrap()
    }

    /// Hashes every key to slot 0 to force long clusters.
    #[derive(Debug, Clone, Copy)]
    struct Colliding;

    impl<K: ?Sized> KeyHasher<K> for Colliding {
        fn hash(&self, _key: &K, _table_size: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_new_table() {
        let table = LinearProbeTable::<String, i32>::new();
        assert!(table.is_empty());
        assert!(!table.is_full());
        assert_eq!(table.len(), 0);
        assert_eq!(table.table_size(), 5);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_set_get_overwrite() {
        let mut table = LinearProbeTable::new();
        table.set("peak".to_string(), 1).unwrap();
        table.set("peak".to_string(), 2).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("peak").unwrap(), &2);

        *table.get_mut("peak").unwrap() += 40;
        assert_eq!(table.get("peak").unwrap(), &42);
    }

    #[test]
    fn test_missing_key() {
        let mut table = LinearProbeTable::<String, i32>::new();
        assert_eq!(table.get("ridge").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(table.delete("ridge").unwrap_err().kind(), ErrorKind::NotFound);
        assert!(!table.contains("ridge"));
    }

    #[test]
    fn test_resize_after_half_full() {
        let mut table = LinearProbeTable::with_sizes(ladder(&[5, 13, 29]));
        table.set("a", 1).unwrap();
        table.set("b", 2).unwrap();
        assert_eq!(table.table_size(), 5);

        // third entry pushes occupancy above 5 / 2
        table.set("c", 3).unwrap();
        assert_eq!(table.table_size(), 13);
        assert_eq!(table.len(), 3);
        for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
            assert_eq!(table.get(key).unwrap(), &value);
        }
    }

    #[test]
    fn test_ladder_exhausted_then_full() {
        let mut table = LinearProbeTable::with_sizes(ladder(&[3]));
        table.set("a", 1).unwrap();
        table.set("b", 2).unwrap();
        table.set("c", 3).unwrap();
        assert!(table.is_full());
        assert_eq!(table.table_size(), 3);

        let err = table.set("d", 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableFull);
        assert_eq!(table.len(), 3);
        assert!(!table.contains("d"));

        // overwriting still works on a full table
        table.set("b", 20).unwrap();
        assert_eq!(table.get("b").unwrap(), &20);
    }

    #[test]
    fn test_single_slot_table() {
        let mut table = LinearProbeTable::with_sizes(ladder(&[1]));
        table.set("only", 1).unwrap();
        assert!(table.is_full());
        assert_eq!(table.set("other", 2).unwrap_err().kind(), ErrorKind::TableFull);
        assert_eq!(table.delete("only").unwrap(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn test_delete_keeps_cluster_reachable() {
        let mut table = LinearProbeTable::with_sizes_and_hasher(ladder(&[7]), Colliding);
        for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
            table.set(key, i).unwrap();
        }
        assert_eq!(table.position("c").unwrap(), 2);

        assert_eq!(table.delete("a").unwrap(), 0);
        assert_eq!(table.get("b").unwrap(), &1);
        assert_eq!(table.get("c").unwrap(), &2);
        assert_eq!(table.position("b").unwrap(), 0);
        assert_eq!(table.position("c").unwrap(), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_keys_and_values_follow_slot_order() {
        let mut table = LinearProbeTable::with_sizes_and_hasher(ladder(&[7]), Colliding);
        table.set("x", 1).unwrap();
        table.set("y", 2).unwrap();
        assert_eq!(table.keys(), vec![&"x", &"y"]);
        assert_eq!(table.values(), vec![&1, &2]);
        assert_eq!(table.iter_keys().len(), 2);
    }

    #[test]
    fn test_rebuilt_starts_from_smallest_size() {
        let mut table = LinearProbeTable::with_sizes(ladder(&[5, 13, 29]));
        for i in 0..10 {
            table.set(i.to_string(), i).unwrap();
        }
        assert_eq!(table.table_size(), 29);
        for i in 0..7 {
            table.delete(i.to_string().as_str()).unwrap();
        }

        let table = table.rebuilt();
        assert_eq!(table.len(), 3);
        assert_eq!(table.table_size(), 13);
        for i in 7..10 {
            assert_eq!(table.get(i.to_string().as_str()).unwrap(), &i);
        }
    }

    #[test]
    fn test_into_iter_yields_all_entries() {
        let mut table = LinearProbeTable::new();
        for i in 0..20 {
            table.set(format!("key_{i}"), i).unwrap();
        }
        let mut entries: Vec<_> = table.into_iter().map(|(_, value)| value).collect();
        entries.sort_unstable();
        assert_eq!(entries, (0..20).collect::<Vec<_>>());
    }
}
