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

//! Example demonstrating double key table usage
//!
//! Run with `DOUBLEKEY_LOG=debug` to see every resize.

use doublekey::double_key::DoubleKeyTable;
use doublekey::error::ErrorKind;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("DOUBLEKEY_LOG", "info"))
        .init();

    println!("=== Double Key Table Example ===\n");

    // Example 1: Basic usage
    println!("1. Mountains by range:");
    let mut table = DoubleKeyTable::new();
    table.set("Alps", "Mont Blanc", 4806).unwrap();
    table.set("Alps", "Matterhorn", 4478).unwrap();
    table.set("Andes", "Aconcagua", 6961).unwrap();
    table.set("Himalaya", "Everest", 8849).unwrap();
    table.set("Himalaya", "Lhotse", 8516).unwrap();

    for range in table.keys() {
        let peaks = table.keys_of(*range).unwrap();
        println!("   {range}: {peaks:?}");
    }
    println!("   Pairs stored: {}", table.len());
    println!();

    // Example 2: Removing the last peak of a range removes the range
    println!("2. Cascading removal:");
    table.delete("Andes", "Aconcagua").unwrap();
    println!("   Ranges left: {:?}", table.keys());
    println!();

    // Example 3: Growth
    println!("3. Growing past the half full mark:");
    let mut grid = DoubleKeyTable::builder()
        .sizes([5, 13, 29, 53, 97])
        .build()
        .unwrap();
    for row in 0..20 {
        let before = grid.table_size();
        for col in 0..5 {
            grid.set(format!("row_{row}"), format!("col_{col}"), row * col)
                .unwrap();
        }
        if grid.table_size() != before {
            log::info!("outer table grew from {before} to {}", grid.table_size());
        }
    }
    println!("   Table size: {}", grid.table_size());
    println!("   Pairs stored: {}", grid.len());
    println!();

    // Example 4: A ladder with a single size eventually fills up
    println!("4. Fixed size ladder:");
    let mut fixed = DoubleKeyTable::builder().sizes([3]).build().unwrap();
    for i in 0.. {
        match fixed.set(format!("key_{i}"), "value", i) {
            Ok(()) => continue,
            Err(err) if err.kind() == ErrorKind::TableFull => {
                println!("   Full after {} first keys: {err}", fixed.keys().len());
                break;
            }
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
}
