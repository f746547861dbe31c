// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Function selectors and event topic0, both Keccak256 digests of a
//! canonical signature string.

use sha3::{Digest, Keccak256};

/// The first 4 bytes of `keccak256(signature)`, as used for call data
/// selectors.
pub fn short_signature(signature: &str) -> [u8; 4] {
	let digest = Keccak256::digest(signature.as_bytes());
	let mut out = [0u8; 4];
	out.copy_from_slice(&digest[..4]);
	out
}

/// The full 32-byte `keccak256(signature)`, as used for a log's `topic0`.
pub fn long_signature(signature: &str) -> [u8; 32] {
	let digest = Keccak256::digest(signature.as_bytes());
	let mut out = [0u8; 32];
	out.copy_from_slice(&digest);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn transfer_selector() {
		// transfer(address,uint256) -> a9059cbb
		let sel = short_signature("transfer(address,uint256)");
		assert_eq!(hex::encode(sel), "a9059cbb");
	}

	#[test]
	fn transfer_event_topic0() {
		// Transfer(address,address,uint256) -> ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef
		let topic = long_signature("Transfer(address,address,uint256)");
		assert_eq!(hex::encode(topic), "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
	}
}
