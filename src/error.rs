// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Crate-wide error type.

use thiserror::Error as ThisError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Where a [`Error::ParseError`] occurred while reading a textual signature
/// or JSON ABI descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
	/// A character or token was not expected at this position.
	InvalidToken,
	/// Input ended while a token was still expected.
	UnexpectedEof,
	/// A type name did not match any known scalar or composite type.
	UnknownType,
	/// An array suffix (`[`...`]`) was malformed.
	BadArraySuffix,
	/// A name field that is required to be non-empty was empty.
	EmptyName,
}

impl std::fmt::Display for ParseErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			ParseErrorKind::InvalidToken => "invalid token",
			ParseErrorKind::UnexpectedEof => "unexpected end of input",
			ParseErrorKind::UnknownType => "unknown type",
			ParseErrorKind::BadArraySuffix => "bad array suffix",
			ParseErrorKind::EmptyName => "empty name",
		};
		f.write_str(s)
	}
}

/// Errors produced while decoding ABI binary data or parsing ABI
/// descriptors.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// A read would have gone past the end of the byte slab.
	#[error("read at offset {offset} (len {len}) is out of bounds for a slab of {data_len} bytes")]
	OutOfBounds {
		/// Offset the read was attempted at.
		offset: u64,
		/// Number of bytes the read needed.
		len: u64,
		/// Length of the byte slab.
		data_len: usize,
	},

	/// A 256-bit offset or length did not fit in 64 bits.
	#[error("offset or length does not fit in 64 bits")]
	OffsetOverflow,

	/// A `bool` word was not the canonical `0` or `1` encoding.
	#[error("invalid bool encoding")]
	BadBool,

	/// A decoded integer's magnitude needs more bits than the type declares.
	#[error("{} needs too many bits ({found}/{declared})", if *signed { "int" } else { "uint" })]
	IntTooWide {
		/// Declared bit width.
		declared: usize,
		/// Bits actually required to represent the decoded magnitude.
		found: usize,
		/// Whether the type being decoded was signed.
		signed: bool,
	},

	/// An indexed event argument was declared with a dynamic type.
	#[error("indexed event argument `{name}` has a dynamic type; its value is unrecoverable from a topic hash")]
	DynamicIndexed {
		/// Name of the offending argument.
		name: String,
	},

	/// A type name or type graph was not recognized.
	#[error("unknown type `{0}`")]
	UnknownType(String),

	/// Call data was shorter than the 4-byte selector.
	#[error("call data is only {0} bytes, need at least 4 for a selector")]
	SelectorTooShort(usize),

	/// The number of log topics did not match the number of indexed inputs.
	#[error("event declares {indexed} indexed inputs but the log has {topics} topics")]
	TopicCountMismatch {
		/// Declared indexed input count.
		indexed: usize,
		/// Observed topic count (including topic0).
		topics: usize,
	},

	/// A log declared unindexed inputs but carried no data.
	#[error("event has unindexed inputs but the log has no data")]
	MissingData,

	/// A trace carried output bytes for a method with no declared outputs.
	#[error("trace has {0} bytes of output but the method declares no outputs")]
	OutputSurplus(usize),

	/// A textual signature or JSON ABI descriptor failed to parse.
	#[error("{kind} near `{near}`")]
	ParseError {
		/// What went wrong.
		kind: ParseErrorKind,
		/// A snippet of input near the failure, for diagnostics.
		near: String,
	},

	/// Decoding a JSON ABI document failed at the `serde_json` layer.
	#[error("invalid JSON ABI descriptor: {0}")]
	InvalidJson(String),

	/// A descriptor's `name` field was required but empty.
	#[error("descriptor name must not be empty")]
	EmptyName,

	/// A descriptor's `type` field was neither `"event"` nor `"function"`
	/// (or did not match the operation being parsed).
	#[error("unexpected descriptor type `{0}`")]
	WrongDescriptorType(String),

	/// An internal invariant was violated; this is always a bug in the
	/// decoder rather than a property of the input, caught at the
	/// panic barrier instead of aborting the host.
	#[error("internal decoder error: {0}")]
	Internal(String),
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::InvalidJson(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn int_too_wide_message_distinguishes_signedness() {
		let signed = Error::IntTooWide { declared: 8, found: 9, signed: true };
		let unsigned = Error::IntTooWide { declared: 8, found: 9, signed: false };
		assert_eq!(signed.to_string(), "int needs too many bits (9/8)");
		assert_eq!(unsigned.to_string(), "uint needs too many bits (9/8)");
	}
}
