// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A streaming decoder for Ethereum contract ABI binary data.
//!
//! The core ([`decoder::Cursor`]) turns a byte slab and a known type
//! tree into a flat, well-nested stream of [`value::DecodeEvent`]s
//! without allocating a tree up front. [`tree::build_arguments`] (and
//! the [`tree::decode_call_data`]/[`tree::decode_trace`]/[`tree::decode_log`]
//! entry points built on it) pull that stream back into a [`tree::Tree`]
//! for callers that want the conventional nested shape; callers who only
//! need one field, or who want to stop as soon as they've seen enough,
//! can drive the [`decoder::Cursor`] iterator directly instead.
//!
//! Signatures can come from a JSON ABI document (`serde`-deserialize a
//! [`Function`]/[`Event`]) or from the textual grammar parsed by
//! [`signature::parse_function`]/[`signature::parse_event`].

#![warn(missing_docs)]

mod abi_type;
mod decoder;
mod error;
mod event;
mod function;
mod hash;
mod signature;
mod state_mutability;
mod tree;
mod util;
mod value;

pub use ethereum_types;

pub use crate::abi_type::{AbiType, Param, TupleType};
pub use crate::decoder::{decode_arguments, decode_value, Cursor};
pub use crate::error::{Error, ParseErrorKind, Result};
pub use crate::event::Event;
pub use crate::function::Function;
pub use crate::hash::{long_signature, short_signature};
pub use crate::signature::{parse_event, parse_function, stringify_event, stringify_function, EventSig, FunctionSig};
pub use crate::state_mutability::StateMutability;
pub use crate::tree::{
	build_arguments, decode_call_data, decode_log, decode_trace, DecodedCallData, DecodedLog, DecodedTrace, Tree,
};
pub use crate::value::{DecodeEvent, Int256, Value};
