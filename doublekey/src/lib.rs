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

//! # doublekey
//!
//! Hash tables built on open addressing with linear probing:
//!
//! - [`linear_probe::LinearProbeTable`]: a single level table keyed by one key.
//! - [`double_key::DoubleKeyTable`]: a table keyed by a pair of keys, where every first
//!   key owns its own [`linear_probe::LinearProbeTable`] of second keys.
//!
//! Tables grow along a fixed [`ladder::SizeLadder`] of capacities once more than half of
//! their slots are taken. String keys are placed with a polynomial rolling hash over
//! their characters; other key types plug in through [`hash::KeyHasher`].
//!
//! The tables are plain single threaded values. Wrap them in a lock to share them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod double_key;
pub mod error;
pub mod hash;
pub mod ladder;
pub mod linear_probe;
