// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Golden fixtures, pinned as small JSON documents rather than inline
//! literals so each one reads as a single self-contained call/log/trace
//! example. Never read by library code — these exist purely for this
//! test binary.

use evmabi_events::ethereum_types::U256;
use evmabi_events::{decode_call_data, decode_log, decode_trace, Event, Function, Tree, Value};

const TRANSFER_LOG: &str = include_str!("fixtures/transfer_log.json");
const TRANSFER_CALL: &str = include_str!("fixtures/transfer_call.json");
const BALANCE_OF_TRACE: &str = include_str!("fixtures/balance_of_trace.json");
const MALFORMED_SHORT_SELECTOR: &str = include_str!("fixtures/malformed_short_selector.json");

fn topics(raw: &serde_json::Value) -> Vec<[u8; 32]> {
	raw["topics"]
		.as_array()
		.unwrap()
		.iter()
		.map(|t| {
			let bytes = hex::decode(t.as_str().unwrap()).unwrap();
			let mut word = [0u8; 32];
			word.copy_from_slice(&bytes);
			word
		})
		.collect()
}

#[test]
fn decodes_transfer_log_fixture() {
	let _subscriber = tracing_subscriber::fmt().with_test_writer().try_init();

	let fixture: serde_json::Value = serde_json::from_str(TRANSFER_LOG).unwrap();
	let event: Event = serde_json::from_value(fixture["abi"].clone()).unwrap();
	let data = hex::decode(fixture["data"].as_str().unwrap()).unwrap();

	let decoded = decode_log(&event, &topics(&fixture), &data).unwrap();
	assert_eq!(decoded.signature, event.signature());
	assert_eq!(decoded.inputs.len(), 3);
	assert_eq!(decoded.inputs[0].0, "from");
	assert_eq!(decoded.inputs[1].0, "to");
	match &decoded.inputs[2].1 {
		Tree::Leaf(Value::Uint(v)) => assert_eq!(*v, U256::from(1000)),
		other => panic!("unexpected value tree: {other:?}"),
	}
}

#[test]
fn decodes_transfer_call_fixture() {
	let fixture: serde_json::Value = serde_json::from_str(TRANSFER_CALL).unwrap();
	let function: Function = serde_json::from_value(fixture["abi"].clone()).unwrap();
	let calldata = hex::decode(fixture["calldata"].as_str().unwrap()).unwrap();

	assert_eq!(hex::encode(function.selector()), &fixture["calldata"].as_str().unwrap()[..8]);

	let decoded = decode_call_data(&function, &calldata).unwrap();
	assert_eq!(decoded.signature, function.signature());
	match &decoded.inputs[1].1 {
		Tree::Leaf(Value::Uint(v)) => assert_eq!(*v, U256::from(10000)),
		other => panic!("unexpected value tree: {other:?}"),
	}
}

#[test]
fn decodes_balance_of_trace_fixture() {
	let fixture: serde_json::Value = serde_json::from_str(BALANCE_OF_TRACE).unwrap();
	let function: Function = serde_json::from_value(fixture["abi"].clone()).unwrap();
	let input = hex::decode(fixture["input"].as_str().unwrap()).unwrap();
	let output = hex::decode(fixture["output"].as_str().unwrap()).unwrap();

	let decoded = decode_trace(&function, &input, &output).unwrap();
	assert_eq!(decoded.signature, function.signature());
	assert_eq!(decoded.inputs[0].0, "owner");
	match &decoded.outputs[0].1 {
		Tree::Leaf(Value::Uint(v)) => assert_eq!(*v, U256::from(10000)),
		other => panic!("unexpected value tree: {other:?}"),
	}
}

#[test]
fn rejects_malformed_short_selector_fixture() {
	let fixture: serde_json::Value = serde_json::from_str(MALFORMED_SHORT_SELECTOR).unwrap();
	let function: Function = serde_json::from_value(fixture["abi"].clone()).unwrap();
	let calldata = hex::decode(fixture["calldata"].as_str().unwrap()).unwrap();

	assert!(decode_call_data(&function, &calldata).is_err());
}

#[test]
fn selector_matches_hex_literal() {
	use hex_literal::hex;
	let function: Function = serde_json::from_str(
		r#"{"name": "transfer", "inputs": [{"name": "to", "type": "address"}, {"name": "value", "type": "uint256"}]}"#,
	)
	.unwrap();
	assert_eq!(function.selector(), hex!("a9059cbb"));
}
