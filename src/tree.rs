// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pulls a [`DecodeEvent`] stream back into a named JSON-shaped tree, and
//! the `decode_call_data`/`decode_trace`/`decode_log` entry points that
//! drive it against a [`Function`]/[`Event`] descriptor.

use std::collections::HashMap;

use crate::abi_type::{AbiType, Param};
use crate::decoder::Cursor;
use crate::error::Error;
use crate::event::Event;
use crate::function::Function;
use crate::value::{DecodeEvent, Value};

/// A decoded value, reassembled into the nesting a tuple/array type
/// describes.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
	/// A scalar leaf.
	Leaf(Value),
	/// An array or fixed array, in element order.
	Array(Vec<Tree>),
	/// A tuple, with its field names preserved in declaration order.
	Tuple(Vec<(String, Tree)>),
}

fn next_event<I>(events: &mut I) -> Result<DecodeEvent, Error>
where
	I: Iterator<Item = Result<DecodeEvent, Error>>,
{
	events.next().ok_or_else(|| Error::Internal("decode stream ended mid-value".to_owned()))?
}

fn pull_value<I>(events: &mut I) -> Result<Tree, Error>
where
	I: Iterator<Item = Result<DecodeEvent, Error>>,
{
	match next_event(events)? {
		DecodeEvent::Value { payload, .. } => Ok(Tree::Leaf(payload)),
		DecodeEvent::TupleStart { len, .. } => {
			let mut fields = Vec::with_capacity(len);
			for _ in 0..len {
				let name = match next_event(events)? {
					DecodeEvent::Key { name, .. } => name,
					other => return Err(Error::Internal(format!("expected Key, got {other:?}"))),
				};
				fields.push((name, pull_value(events)?));
			}
			match next_event(events)? {
				DecodeEvent::TupleEnd => Ok(Tree::Tuple(fields)),
				other => Err(Error::Internal(format!("expected TupleEnd, got {other:?}"))),
			}
		}
		DecodeEvent::ArrayStart { len, .. } => {
			let mut items = Vec::with_capacity(len);
			for _ in 0..len {
				match next_event(events)? {
					DecodeEvent::Key { .. } => {}
					other => return Err(Error::Internal(format!("expected Key, got {other:?}"))),
				}
				items.push(pull_value(events)?);
			}
			match next_event(events)? {
				DecodeEvent::ArrayEnd => Ok(Tree::Array(items)),
				other => Err(Error::Internal(format!("expected ArrayEnd, got {other:?}"))),
			}
		}
		other => Err(Error::Internal(format!("expected Key-preceded value, got {other:?}"))),
	}
}

/// Consumes a full argument-list stream (as produced by
/// [`Cursor::for_arguments`]) into `(name, value)` pairs, in declaration
/// order.
pub fn build_arguments<I>(mut events: I) -> Result<Vec<(String, Tree)>, Error>
where
	I: Iterator<Item = Result<DecodeEvent, Error>>,
{
	let mut out = Vec::new();
	while let Some(item) = events.next() {
		let name = match item? {
			DecodeEvent::Key { name, .. } => name,
			other => return Err(Error::Internal(format!("expected Key, got {other:?}"))),
		};
		out.push((name, pull_value(&mut events)?));
	}
	Ok(out)
}

/// Decodes a selector-prefixed payload (call data, or a trace's `input`)
/// against a declared parameter list.
fn decode_inputs(inputs: &[Param], data: &[u8]) -> Result<Vec<(String, Tree)>, Error> {
	if data.len() < 4 {
		return Err(Error::SelectorTooShort(data.len()));
	}
	let payload = &data[4..];
	let types: Vec<(String, AbiType)> = inputs.iter().map(|p| (p.name.clone(), p.kind.clone())).collect();
	build_arguments(Cursor::for_arguments(&types, payload))
}

/// The result of [`decode_call_data`]: a function's canonical signature
/// plus its decoded inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCallData {
	/// Canonical signature, e.g. `"transfer(address,uint256)"`.
	pub signature: String,
	/// Decoded inputs, in declaration order.
	pub inputs: Vec<(String, Tree)>,
}

/// Decodes a contract call's data (4-byte selector + head/tail) against
/// `function`'s declared inputs.
pub fn decode_call_data(function: &Function, data: &[u8]) -> Result<DecodedCallData, Error> {
	let inputs = decode_inputs(&function.inputs, data)?;
	Ok(DecodedCallData { signature: function.signature(), inputs })
}

/// The result of [`decode_trace`]: a function's canonical signature plus
/// its decoded inputs and outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTrace {
	/// Canonical signature, e.g. `"transfer(address,uint256)"`.
	pub signature: String,
	/// Decoded inputs, in declaration order.
	pub inputs: Vec<(String, Tree)>,
	/// Decoded outputs, in declaration order. Empty iff `function`
	/// declares no outputs.
	pub outputs: Vec<(String, Tree)>,
}

/// Decodes a call trace: `input` is the call data (selector + head/tail,
/// decoded against `function`'s declared inputs exactly like
/// [`decode_call_data`]) and `output` is the return payload, decoded
/// against `function`'s declared outputs.
pub fn decode_trace(function: &Function, input: &[u8], output: &[u8]) -> Result<DecodedTrace, Error> {
	let inputs = decode_inputs(&function.inputs, input)?;

	let outputs = if function.outputs.is_empty() {
		if !output.is_empty() {
			return Err(Error::OutputSurplus(output.len()));
		}
		Vec::new()
	} else {
		let types: Vec<(String, AbiType)> = function.outputs.iter().map(|p| (p.name.clone(), p.kind.clone())).collect();
		build_arguments(Cursor::for_arguments(&types, output))?
	};

	Ok(DecodedTrace { signature: function.signature(), inputs, outputs })
}

/// The result of [`decode_log`]: an event's canonical signature plus its
/// decoded inputs, indexed and non-indexed fields merged back into
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
	/// Canonical signature, e.g. `"Transfer(address,address,uint256)"`.
	pub signature: String,
	/// Decoded inputs, in declaration order, regardless of whether each
	/// one came from a topic or from `data`.
	pub inputs: Vec<(String, Tree)>,
}

/// Decodes a log's topics and data against `event`'s declared inputs,
/// returning fields in the event's original declaration order regardless
/// of whether each one came from a topic or from `data`.
pub fn decode_log(event: &Event, topics: &[[u8; 32]], data: &[u8]) -> Result<DecodedLog, Error> {
	let indexed: Vec<_> = event.indexed_inputs().collect();
	if topics.len() != event.topic_count() {
		return Err(Error::TopicCountMismatch { indexed: indexed.len(), topics: topics.len() });
	}
	for param in &indexed {
		if param.kind.is_dynamic() {
			return Err(Error::DynamicIndexed { name: param.name.clone() });
		}
	}

	let topic_skip = if event.anonymous { 0 } else { 1 };
	let mut named: HashMap<String, Tree> = HashMap::new();
	for (param, topic) in indexed.iter().zip(&topics[topic_skip..]) {
		let mut value = None;
		for item in Cursor::for_value(&param.kind, topic) {
			match item? {
				DecodeEvent::Value { payload, .. } => value = Some(Tree::Leaf(payload)),
				DecodeEvent::Key { .. } => {}
				other => return Err(Error::Internal(format!("indexed topic produced composite event {other:?}"))),
			}
		}
		let value = value.ok_or_else(|| Error::Internal("indexed topic decoded no value".to_owned()))?;
		named.insert(param.name.clone(), value);
	}

	let data_params: Vec<_> = event.data_inputs().collect();
	if !data_params.is_empty() && data.is_empty() {
		return Err(Error::MissingData);
	}
	let data_types: Vec<(String, AbiType)> = data_params.iter().map(|p| (p.name.clone(), p.kind.clone())).collect();
	for (name, tree) in build_arguments(Cursor::for_arguments(&data_types, data))? {
		named.insert(name, tree);
	}

	let inputs = event
		.inputs
		.iter()
		.map(|p| {
			named
				.remove(&p.name)
				.map(|tree| (p.name.clone(), tree))
				.ok_or_else(|| Error::Internal(format!("no decoded value for `{}`", p.name)))
		})
		.collect::<Result<Vec<_>, Error>>()?;

	Ok(DecodedLog { signature: event.signature(), inputs })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abi_type::{AbiType, Param};
	use crate::state_mutability::StateMutability;
	use ethereum_types::U256;

	#[test]
	fn decodes_transfer_call_data() {
		let function = Function {
			name: "transfer".to_owned(),
			inputs: vec![Param::new("to", AbiType::Address), Param::new("value", AbiType::Uint(256))],
			outputs: vec![Param::new("", AbiType::Bool)],
			state_mutability: StateMutability::NonPayable,
		};

		let mut data = function.selector().to_vec();
		let mut to_word = [0u8; 32];
		to_word[12..].copy_from_slice(&[0x11; 20]);
		data.extend_from_slice(&to_word);
		let mut value_word = [0u8; 32];
		value_word[31] = 100;
		data.extend_from_slice(&value_word);

		let decoded = decode_call_data(&function, &data).unwrap();
		assert_eq!(decoded.signature, "transfer(address,uint256)");
		assert_eq!(decoded.inputs[0].0, "to");
		match &decoded.inputs[1].1 {
			Tree::Leaf(Value::Uint(v)) => assert_eq!(*v, U256::from(100)),
			other => panic!("unexpected: {other:?}"),
		}
	}

	#[test]
	fn rejects_call_data_shorter_than_selector() {
		let function =
			Function { name: "f".to_owned(), inputs: vec![], outputs: vec![], state_mutability: StateMutability::NonPayable };
		assert!(matches!(decode_call_data(&function, &[1, 2]), Err(Error::SelectorTooShort(2))));
	}

	#[test]
	fn decodes_trace_inputs_and_outputs() {
		let function = Function {
			name: "balanceOf".to_owned(),
			inputs: vec![Param::new("owner", AbiType::Address)],
			outputs: vec![Param::new("", AbiType::Uint(256))],
			state_mutability: StateMutability::View,
		};

		let mut input = function.selector().to_vec();
		let mut owner_word = [0u8; 32];
		owner_word[12..].copy_from_slice(&[0x22; 20]);
		input.extend_from_slice(&owner_word);

		let mut output = [0u8; 32];
		output[31] = 42;

		let decoded = decode_trace(&function, &input, &output).unwrap();
		assert_eq!(decoded.signature, "balanceOf(address)");
		assert_eq!(decoded.inputs[0].0, "owner");
		match &decoded.outputs[0].1 {
			Tree::Leaf(Value::Uint(v)) => assert_eq!(*v, U256::from(42)),
			other => panic!("unexpected: {other:?}"),
		}
	}

	#[test]
	fn rejects_trace_output_surplus_when_no_outputs_declared() {
		let function = Function {
			name: "f".to_owned(),
			inputs: vec![],
			outputs: vec![],
			state_mutability: StateMutability::NonPayable,
		};
		let input = function.selector().to_vec();
		assert!(matches!(decode_trace(&function, &input, &[1]), Err(Error::OutputSurplus(1))));
	}

	#[test]
	fn decodes_transfer_log_preserving_declaration_order() {
		let event = Event {
			name: "Transfer".to_owned(),
			inputs: vec![
				Param { name: "from".to_owned(), kind: AbiType::Address, indexed: true },
				Param { name: "to".to_owned(), kind: AbiType::Address, indexed: true },
				Param { name: "value".to_owned(), kind: AbiType::Uint(256), indexed: false },
			],
			anonymous: false,
		};

		let mut from_topic = [0u8; 32];
		from_topic[12..].copy_from_slice(&[0xaa; 20]);
		let mut to_topic = [0u8; 32];
		to_topic[12..].copy_from_slice(&[0xbb; 20]);
		let topics = [event.topic0(), from_topic, to_topic];

		let mut data = [0u8; 32];
		data[31] = 7;

		let decoded = decode_log(&event, &topics, &data).unwrap();
		assert_eq!(decoded.signature, "Transfer(address,address,uint256)");
		assert_eq!(decoded.inputs.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>(), vec!["from", "to", "value"]);
	}

	#[test]
	fn rejects_dynamic_indexed_argument() {
		let event = Event {
			name: "E".to_owned(),
			inputs: vec![Param { name: "s".to_owned(), kind: AbiType::String, indexed: true }],
			anonymous: false,
		};
		let topics = [event.topic0(), [0u8; 32]];
		assert!(matches!(decode_log(&event, &topics, &[]), Err(Error::DynamicIndexed { .. })));
	}

	#[test]
	fn rejects_topic_count_mismatch() {
		let event = Event {
			name: "E".to_owned(),
			inputs: vec![Param { name: "a".to_owned(), kind: AbiType::Address, indexed: true }],
			anonymous: false,
		};
		assert!(matches!(decode_log(&event, &[event.topic0()], &[]), Err(Error::TopicCountMismatch { .. })));
	}
}
