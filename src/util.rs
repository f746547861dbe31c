// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Utils used by different modules.

use crate::error::Error;

/// Checks a raw JSON ABI descriptor's `type` and `name` fields before it is
/// deserialized into a [`crate::Function`]/[`crate::Event`]: `type`, when
/// present, must equal `expected_type`, and `name` must be non-empty.
pub(crate) fn validate_descriptor(value: &serde_json::Value, expected_type: &str) -> Result<(), Error> {
	if let Some(ty) = value.get("type").and_then(|v| v.as_str()) {
		if ty != expected_type {
			return Err(Error::WrongDescriptorType(ty.to_owned()));
		}
	}
	let name = value.get("name").and_then(|v| v.as_str()).unwrap_or("");
	if name.is_empty() {
		return Err(Error::EmptyName);
	}
	Ok(())
}

/// Strips a trailing `(...)` from a function/event name.
///
/// Some ABI generators emit the full signature (`"transfer(address,uint256)"`)
/// in the `name` field instead of the bare name; every consumer of a
/// parsed descriptor expects the bare name, so this is applied once at
/// deserialization time rather than at every call site.
pub mod sanitize_name {
	use serde::{Deserialize, Deserializer};

	pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
	where
		D: Deserializer<'de>,
	{
		let name = String::deserialize(deserializer)?;
		Ok(sanitize(&name))
	}

	pub fn sanitize(name: &str) -> String {
		match name.find('(') {
			Some(i) => name[..i].to_owned(),
			None => name.to_owned(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::sanitize_name::sanitize;
	use super::validate_descriptor;
	use crate::error::Error;

	#[test]
	fn strips_parameter_list() {
		assert_eq!(sanitize("transfer(address,uint256)"), "transfer");
		assert_eq!(sanitize("transfer"), "transfer");
		assert_eq!(sanitize("()"), "");
	}

	#[test]
	fn validate_descriptor_rejects_mismatched_type() {
		let value = serde_json::json!({ "type": "event", "name": "Foo" });
		assert!(matches!(validate_descriptor(&value, "function"), Err(Error::WrongDescriptorType(t)) if t == "event"));
	}

	#[test]
	fn validate_descriptor_rejects_empty_name() {
		let value = serde_json::json!({ "type": "function", "name": "" });
		assert!(matches!(validate_descriptor(&value, "function"), Err(Error::EmptyName)));
	}

	#[test]
	fn validate_descriptor_accepts_matching_type_and_name() {
		let value = serde_json::json!({ "type": "function", "name": "transfer" });
		assert!(validate_descriptor(&value, "function").is_ok());
	}
}
