// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The streaming decoder core: a single-threaded explicit-stack
//! generator that turns a byte slab plus a type tree into an
//! `Iterator<Item = Result<DecodeEvent, Error>>`, and the push-style
//! `decode_arguments`/`decode_value` wrappers built on top of it.

use std::panic::{catch_unwind, AssertUnwindSafe};

use ethereum_types::{H160, H256, U256};

use crate::abi_type::AbiType;
use crate::error::Error;
use crate::value::{DecodeEvent, Int256, Value};

const WORD: usize = 32;

enum Fields {
	Tuple(Vec<(String, AbiType)>),
	Array(AbiType, usize),
}

impl Fields {
	fn len(&self) -> usize {
		match self {
			Fields::Tuple(v) => v.len(),
			Fields::Array(_, n) => *n,
		}
	}

	fn get(&self, i: usize) -> (String, AbiType) {
		match self {
			Fields::Tuple(v) => v[i].clone(),
			Fields::Array(ty, _) => (i.to_string(), ty.clone()),
		}
	}
}

struct PendingField {
	name: String,
	ty: AbiType,
	head_slot: usize,
	index: usize,
}

struct Frame {
	fields: Fields,
	/// Type reported on the matching Start event: the tuple type itself,
	/// or the array's element type.
	boundary_ty: AbiType,
	is_array: bool,
	/// Absolute offset that dynamic-field offsets within this frame are
	/// relative to.
	region_base: usize,
	/// Absolute offset of the next field's head slot.
	head_pos: usize,
	index: usize,
	started: bool,
	/// Root frames decode a flat sequence of arguments and never emit a
	/// matching Start/End pair of their own.
	is_root: bool,
	pending: Option<PendingField>,
}

impl Frame {
	fn start_event(&self) -> DecodeEvent {
		if self.is_array {
			DecodeEvent::ArrayStart { ty: self.boundary_ty.clone(), len: self.fields.len() }
		} else {
			DecodeEvent::TupleStart { ty: self.boundary_ty.clone(), len: self.fields.len() }
		}
	}

	fn end_event(&self) -> DecodeEvent {
		if self.is_array {
			DecodeEvent::ArrayEnd
		} else {
			DecodeEvent::TupleEnd
		}
	}
}

/// Pull-based decoder over a byte slab and a known type tree.
///
/// Each `next()` call returns the next item of a well-nested stream: a
/// `TupleStart`/`ArrayStart` is always eventually followed by a matching
/// `TupleEnd`/`ArrayEnd`, and every element between them is preceded by
/// a `Key`. Dropping the cursor mid-stream is always safe — there is no
/// background thread to join or resource to release.
pub struct Cursor<'a> {
	data: &'a [u8],
	stack: Vec<Frame>,
	poisoned: bool,
}

impl<'a> Cursor<'a> {
	/// A cursor over a flat sequence of top-level arguments (function
	/// inputs/outputs, or non-indexed event data). The sequence itself
	/// emits no enclosing Start/End pair — only a `Key` + value/composite
	/// run per argument.
	pub fn for_arguments(types: &[(String, AbiType)], data: &'a [u8]) -> Cursor<'a> {
		let frame = Frame {
			fields: Fields::Tuple(types.to_vec()),
			boundary_ty: AbiType::Bool, // unused: is_root frames never emit a Start/End
			is_array: false,
			region_base: 0,
			head_pos: 0,
			index: 0,
			started: true, // root frames skip the Start event
			is_root: true,
			pending: None,
		};
		Cursor { data, stack: vec![frame], poisoned: false }
	}

	/// A cursor over a single value of type `ty`, e.g. one decoded
	/// indexed event topic.
	pub fn for_value(ty: &AbiType, data: &'a [u8]) -> Cursor<'a> {
		Self::for_arguments(&[("value".to_owned(), ty.clone())], data)
	}

	fn read_word(&self, abs: usize) -> Result<[u8; WORD], Error> {
		let end = abs.checked_add(WORD).ok_or(Error::OffsetOverflow)?;
		if end > self.data.len() {
			return Err(Error::OutOfBounds { offset: abs as u64, len: WORD as u64, data_len: self.data.len() });
		}
		let mut word = [0u8; WORD];
		word.copy_from_slice(&self.data[abs..end]);
		Ok(word)
	}

	fn read_bytes(&self, abs: usize, len: usize) -> Result<&'a [u8], Error> {
		let end = abs.checked_add(len).ok_or(Error::OffsetOverflow)?;
		if end > self.data.len() {
			return Err(Error::OutOfBounds { offset: abs as u64, len: len as u64, data_len: self.data.len() });
		}
		Ok(&self.data[abs..end])
	}

	fn word_as_usize(word: &[u8; WORD]) -> Result<usize, Error> {
		let n = U256::from_big_endian(word);
		if n > U256::from(u64::MAX) {
			return Err(Error::OffsetOverflow);
		}
		Ok(n.as_u64() as usize)
	}

	fn resolve_content(&self, ty: &AbiType, head_slot: usize, region_base: usize) -> Result<usize, Error> {
		if ty.is_dynamic() {
			let word = self.read_word(head_slot)?;
			let offset = Self::word_as_usize(&word)?;
			region_base.checked_add(offset).ok_or(Error::OffsetOverflow)
		} else {
			Ok(head_slot)
		}
	}

	fn decode_uint(&self, at: usize, bits: usize) -> Result<Value, Error> {
		let word = self.read_word(at)?;
		let n = U256::from_big_endian(&word);
		if bits < 256 && n.bits() > bits {
			return Err(Error::IntTooWide { declared: bits, found: n.bits(), signed: false });
		}
		Ok(Value::Uint(n))
	}

	fn decode_int(&self, at: usize, bits: usize) -> Result<Value, Error> {
		let word = self.read_word(at)?;
		let v = Int256::from_be_bytes(&word);
		if bits < 256 {
			let limit = if v.is_negative() { bits } else { bits.saturating_sub(1) };
			if v.bits() > limit {
				return Err(Error::IntTooWide { declared: bits, found: v.bits(), signed: true });
			}
		}
		Ok(Value::Int(v))
	}

	fn decode_bool(&self, at: usize) -> Result<Value, Error> {
		let word = self.read_word(at)?;
		if word[..WORD - 1].iter().any(|&b| b != 0) || word[WORD - 1] > 1 {
			return Err(Error::BadBool);
		}
		Ok(Value::Bool(word[WORD - 1] == 1))
	}

	fn decode_address(&self, at: usize) -> Result<Value, Error> {
		let word = self.read_word(at)?;
		Ok(Value::Address(H160::from_slice(&word[12..])))
	}

	fn decode_hash(&self, at: usize) -> Result<Value, Error> {
		let word = self.read_word(at)?;
		Ok(Value::Hash(H256::from(word)))
	}

	fn decode_fixed_bytes(&self, at: usize, n: usize) -> Result<Value, Error> {
		let word = self.read_word(at)?;
		Ok(Value::FixedBytes(word[..n].to_vec()))
	}

	fn decode_function(&self, at: usize) -> Result<Value, Error> {
		let word = self.read_word(at)?;
		let address = H160::from_slice(&word[..20]);
		let mut selector = [0u8; 4];
		selector.copy_from_slice(&word[20..24]);
		Ok(Value::Function { address, selector })
	}

	fn length_prefixed_len(&self, at: usize) -> Result<usize, Error> {
		let word = self.read_word(at)?;
		Self::word_as_usize(&word)
	}

	fn decode_bytes(&self, at: usize) -> Result<Value, Error> {
		let len = self.length_prefixed_len(at)?;
		let raw = self.read_bytes(at + WORD, len)?;
		Ok(Value::Bytes(raw.to_vec()))
	}

	fn decode_string(&self, at: usize) -> Result<Value, Error> {
		let len = self.length_prefixed_len(at)?;
		let raw = self.read_bytes(at + WORD, len)?;
		// Arbitrary bytes are valid ABI input for `string`; bytes that are
		// not valid UTF-8 are rendered in their quoted/escaped form rather
		// than rejected, so the payload is always a printable string.
		let s = match std::str::from_utf8(raw) {
			Ok(s) => s.to_owned(),
			Err(_) => format!("{:?}", String::from_utf8_lossy(raw)),
		};
		Ok(Value::String(s))
	}

	/// Pushes a new frame to decode a composite value, or returns a
	/// decoded leaf [`Value`] event directly.
	fn step_field(
		&mut self,
		name: String,
		ty: AbiType,
		index: usize,
		head_slot: usize,
		region_base: usize,
	) -> Result<Option<DecodeEvent>, Error> {
		let content = self.resolve_content(&ty, head_slot, region_base)?;

		match &ty {
			AbiType::Uint(bits) => Ok(Some(DecodeEvent::Value { payload: self.decode_uint(content, *bits)?, ty })),
			AbiType::Int(bits) => Ok(Some(DecodeEvent::Value { payload: self.decode_int(content, *bits)?, ty })),
			AbiType::Bool => Ok(Some(DecodeEvent::Value { payload: self.decode_bool(content)?, ty })),
			AbiType::Address => Ok(Some(DecodeEvent::Value { payload: self.decode_address(content)?, ty })),
			AbiType::Hash => Ok(Some(DecodeEvent::Value { payload: self.decode_hash(content)?, ty })),
			AbiType::FixedBytes(n) => Ok(Some(DecodeEvent::Value { payload: self.decode_fixed_bytes(content, *n)?, ty })),
			AbiType::Function => Ok(Some(DecodeEvent::Value { payload: self.decode_function(content)?, ty })),
			AbiType::Bytes => Ok(Some(DecodeEvent::Value { payload: self.decode_bytes(content)?, ty })),
			AbiType::String => Ok(Some(DecodeEvent::Value { payload: self.decode_string(content)?, ty })),
			AbiType::Tuple(t) => {
				self.stack.push(Frame {
					fields: Fields::Tuple(t.fields.clone()),
					boundary_ty: ty.clone(),
					is_array: false,
					region_base: content,
					head_pos: content,
					index: 0,
					started: false,
					is_root: false,
					pending: None,
				});
				let _ = (name, index);
				Ok(None)
			}
			AbiType::FixedArray(elem, n) => {
				self.stack.push(Frame {
					fields: Fields::Array((**elem).clone(), *n),
					boundary_ty: (**elem).clone(),
					is_array: true,
					region_base: content,
					head_pos: content,
					index: 0,
					started: false,
					is_root: false,
					pending: None,
				});
				Ok(None)
			}
			AbiType::DynArray(elem) => {
				let len = self.length_prefixed_len(content)?;
				let base = content + WORD;
				self.stack.push(Frame {
					fields: Fields::Array((**elem).clone(), len),
					boundary_ty: (**elem).clone(),
					is_array: true,
					region_base: base,
					head_pos: base,
					index: 0,
					started: false,
					is_root: false,
					pending: None,
				});
				Ok(None)
			}
		}
	}

	fn step(&mut self) -> Option<Result<DecodeEvent, Error>> {
		loop {
			let top = self.stack.last_mut()?;

			if !top.started {
				top.started = true;
				return Some(Ok(top.start_event()));
			}

			if let Some(pending) = top.pending.take() {
				let region_base = top.region_base;
				match self.step_field(pending.name, pending.ty, pending.index, pending.head_slot, region_base) {
					Ok(Some(event)) => return Some(Ok(event)),
					Ok(None) => continue, // a child frame was pushed; its Start comes next
					Err(e) => {
						self.poisoned = true;
						self.stack.clear();
						return Some(Err(e));
					}
				}
			}

			if top.index < top.fields.len() {
				let (name, ty) = top.fields.get(top.index);
				let head_slot = top.head_pos;
				let head_size = ty.head_size();
				top.head_pos += head_size;
				let index = top.index;
				top.index += 1;
				top.pending = Some(PendingField { name: name.clone(), ty, head_slot, index });
				return Some(Ok(DecodeEvent::Key { name, index }));
			}

			let frame = self.stack.pop()?;
			if frame.is_root {
				continue;
			}
			return Some(Ok(frame.end_event()));
		}
	}
}

impl<'a> Iterator for Cursor<'a> {
	type Item = Result<DecodeEvent, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.poisoned {
			return None;
		}
		match catch_unwind(AssertUnwindSafe(|| self.step())) {
			Ok(item) => item,
			Err(_) => {
				self.poisoned = true;
				self.stack.clear();
				Some(Err(Error::Internal("decoder panicked".to_owned())))
			}
		}
	}
}

/// Drives a [`Cursor`] over `types`/`data` to completion, calling `sink`
/// for each event and stopping as soon as `sink` returns `false`. Returns
/// `Err` only if the decoder itself produced an error before the sink
/// asked to stop.
pub fn decode_arguments<F>(types: &[(String, AbiType)], data: &[u8], mut sink: F) -> Result<(), Error>
where
	F: FnMut(DecodeEvent) -> bool,
{
	let span = tracing::debug_span!("decode_arguments", types = types.len(), data_len = data.len());
	let _guard = span.enter();
	for item in Cursor::for_arguments(types, data) {
		let event = item?;
		if !sink(event) {
			tracing::trace!("sink requested early stop");
			break;
		}
	}
	Ok(())
}

/// Drives a [`Cursor`] over a single value of type `ty`, calling `sink`
/// for each event and stopping as soon as `sink` returns `false`.
pub fn decode_value<F>(ty: &AbiType, data: &[u8], mut sink: F) -> Result<(), Error>
where
	F: FnMut(DecodeEvent) -> bool,
{
	for item in Cursor::for_value(ty, data) {
		let event = item?;
		if !sink(event) {
			break;
		}
	}
	Ok(())
}
