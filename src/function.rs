// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Function descriptor: name, inputs, outputs, and the derived selector.

use serde::Deserialize;

use crate::abi_type::Param;
use crate::error::Error;
use crate::hash::short_signature;
use crate::state_mutability::StateMutability;
use crate::util::validate_descriptor;

/// A contract function descriptor, as found in a JSON ABI document or
/// parsed from a textual `function Name(...)` signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Function {
	/// Function name.
	#[serde(deserialize_with = "crate::util::sanitize_name::deserialize")]
	pub name: String,
	/// Function inputs, in declaration order.
	#[serde(default)]
	pub inputs: Vec<Param>,
	/// Function outputs, in declaration order.
	#[serde(default)]
	pub outputs: Vec<Param>,
	/// Whether the function reads or modifies blockchain state.
	#[serde(rename = "stateMutability", default)]
	pub state_mutability: StateMutability,
}

impl Function {
	/// Canonical signature, e.g. `"transfer(address,uint256)"`. This is
	/// what [`Function::selector`] hashes.
	pub fn signature(&self) -> String {
		let inputs = self.inputs.iter().map(|p| p.kind.canonical_string()).collect::<Vec<_>>().join(",");
		format!("{}({})", self.name, inputs)
	}

	/// The 4-byte selector that prefixes this function's call data.
	pub fn selector(&self) -> [u8; 4] {
		short_signature(&self.signature())
	}

	/// Parses a JSON ABI function descriptor, validating that `type`
	/// (when present) is `"function"` and that `name` is non-empty before
	/// handing the document to [`Deserialize`].
	pub fn from_json(json: &str) -> Result<Function, Error> {
		let value: serde_json::Value = serde_json::from_str(json)?;
		validate_descriptor(&value, "function")?;
		Ok(serde_json::from_value(value)?)
	}
}
