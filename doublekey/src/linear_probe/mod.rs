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

//! Single level open addressing hash table with linear probing.
//!
//! A [`LinearProbeTable`] stores `(key, value)` pairs directly in its slot array. A key
//! starts probing at the slot its hasher picks for the current table size and walks
//! forward one slot at a time, wrapping around, until it finds itself or an empty slot.
//!
//! The table grows along its [`SizeLadder`](crate::ladder::SizeLadder) right after an
//! insertion pushes occupancy above half the capacity, and never shrinks.
//!
//! # Usage
//!
//! ```rust
//! # use doublekey::linear_probe::LinearProbeTable;
//! let mut table = LinearProbeTable::new();
//! table.set("summit".to_string(), 8848).unwrap();
//! table.set("base".to_string(), 5364).unwrap();
//!
//! assert_eq!(table.get("summit").unwrap(), &8848);
//! assert_eq!(table.delete("base").unwrap(), 5364);
//! assert!(!table.contains("base"));
//! assert_eq!(table.len(), 1);
//! ```

mod table;

pub use self::table::IntoIter;
pub use self::table::Iter;
pub use self::table::Keys;
pub use self::table::LinearProbeTable;
pub use self::table::Values;
