// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Whether a function reads or modifies blockchain state.

use serde::Deserialize;

/// Mirrors Solidity's `stateMutability` descriptor field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum StateMutability {
	/// Specified not to read blockchain state.
	#[serde(rename = "pure")]
	Pure,
	/// Specified not to modify blockchain state.
	#[serde(rename = "view")]
	View,
	/// Does not accept Ether. The default when unspecified.
	#[serde(rename = "nonpayable")]
	NonPayable,
	/// Accepts Ether.
	#[serde(rename = "payable")]
	Payable,
}

impl Default for StateMutability {
	fn default() -> Self {
		Self::NonPayable
	}
}
