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

//! Composite key hash table built from two levels of linear probing.
//!
//! A [`DoubleKeyTable`] maps a pair `(key1, key2)` to a value. The first key is probed in
//! an outer slot array; every occupied outer slot owns a
//! [`LinearProbeTable`](crate::linear_probe::LinearProbeTable) holding all second keys
//! stored under that first key. The two levels grow independently along their own size
//! ladders, and an inner table disappears together with its last entry.
//!
//! # Usage
//!
//! ```rust
//! # use doublekey::double_key::DoubleKeyTable;
//! let mut table = DoubleKeyTable::builder().sizes([5, 13]).build().unwrap();
//! table.set("a", "x", 1).unwrap();
//! table.set("a", "y", 2).unwrap();
//! table.set("b", "z", 3).unwrap();
//!
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.get("a", "y").unwrap(), &2);
//!
//! table.delete("a", "x").unwrap();
//! table.delete("a", "y").unwrap();
//! assert_eq!(table.keys(), vec![&"b"]);
//! assert_eq!(table.len(), 1);
//! ```

mod builder;
mod table;

pub use self::builder::DoubleKeyTableBuilder;
pub use self::table::DoubleKeyTable;
pub use self::table::Iter;
pub use self::table::Keys;
pub use self::table::Values;
