// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Event descriptor: name, inputs (each possibly indexed), and the
//! derived topic0.

use serde::Deserialize;

use crate::abi_type::Param;
use crate::error::Error;
use crate::hash::long_signature;
use crate::util::validate_descriptor;

/// A contract event descriptor, as found in a JSON ABI document or
/// parsed from a textual `event Name(...)` signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
	/// Event name.
	#[serde(deserialize_with = "crate::util::sanitize_name::deserialize")]
	pub name: String,
	/// Event inputs, in declaration order. `indexed` marks which ones are
	/// stored as log topics rather than in `data`.
	#[serde(default)]
	pub inputs: Vec<Param>,
	/// An anonymous event has no topic0 and one fewer topic slot
	/// available for indexed arguments.
	#[serde(default)]
	pub anonymous: bool,
}

impl Event {
	/// Canonical signature, e.g. `"Transfer(address,address,uint256)"`.
	/// Indexed-ness does not affect the signature.
	pub fn signature(&self) -> String {
		let inputs = self.inputs.iter().map(|p| p.kind.canonical_string()).collect::<Vec<_>>().join(",");
		format!("{}({})", self.name, inputs)
	}

	/// `keccak256(signature)`, stored as `topic0` in every non-anonymous
	/// log this event produces.
	pub fn topic0(&self) -> [u8; 32] {
		long_signature(&self.signature())
	}

	/// Inputs stored as log topics, in declaration order.
	pub fn indexed_inputs(&self) -> impl Iterator<Item = &Param> {
		self.inputs.iter().filter(|p| p.indexed)
	}

	/// Inputs stored in the log's `data`, in declaration order.
	pub fn data_inputs(&self) -> impl Iterator<Item = &Param> {
		self.inputs.iter().filter(|p| !p.indexed)
	}

	/// Number of topic slots this event consumes besides topic0: one per
	/// indexed input, unconditionally (anonymous events simply don't
	/// reserve a slot for topic0 itself).
	pub fn topic_count(&self) -> usize {
		self.indexed_inputs().count() + if self.anonymous { 0 } else { 1 }
	}

	/// Parses a JSON ABI event descriptor, validating that `type` (when
	/// present) is `"event"` and that `name` is non-empty before handing
	/// the document to [`Deserialize`].
	pub fn from_json(json: &str) -> Result<Event, Error> {
		let value: serde_json::Value = serde_json::from_str(json)?;
		validate_descriptor(&value, "event")?;
		Ok(serde_json::from_value(value)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abi_type::AbiType;

	#[test]
	fn deserializes_from_json_abi() {
		let json = r#"{
			"type": "event",
			"name": "Transfer",
			"inputs": [
				{ "name": "from", "type": "address", "indexed": true },
				{ "name": "to", "type": "address", "indexed": true },
				{ "name": "value", "type": "uint256", "indexed": false }
			],
			"anonymous": false
		}"#;
		let e: Event = serde_json::from_str(json).unwrap();
		assert_eq!(e.name, "Transfer");
		assert_eq!(e.indexed_inputs().count(), 2);
		assert_eq!(e.data_inputs().count(), 1);
	}

	#[test]
	fn from_json_rejects_wrong_descriptor_type() {
		let json = r#"{"type": "function", "name": "transfer", "inputs": []}"#;
		assert!(matches!(Event::from_json(json), Err(Error::WrongDescriptorType(t)) if t == "function"));
	}

	#[test]
	fn from_json_rejects_empty_name() {
		let json = r#"{"type": "event", "name": "", "inputs": []}"#;
		assert!(matches!(Event::from_json(json), Err(Error::EmptyName)));
	}

	#[test]
	fn from_json_accepts_well_formed_descriptor() {
		let json = r#"{"type": "event", "name": "Transfer", "inputs": []}"#;
		assert_eq!(Event::from_json(json).unwrap().name, "Transfer");
	}

	#[test]
	fn topic0_matches_keccak_of_signature() {
		let e = Event {
			name: "Transfer".to_owned(),
			inputs: vec![
				Param { name: "from".to_owned(), kind: AbiType::Address, indexed: true },
				Param { name: "to".to_owned(), kind: AbiType::Address, indexed: true },
				Param { name: "value".to_owned(), kind: AbiType::Uint(256), indexed: false },
			],
			anonymous: false,
		};
		assert_eq!(hex::encode(e.topic0()), "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
		assert_eq!(e.topic_count(), 3);
	}
}
