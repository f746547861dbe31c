// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! ABI type model and its derived predicates.

use std::fmt;

use crate::error::Error;

/// A single ABI type, as it appears in a function/event signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
	/// Unsigned integer, `bits` in `{8, 16, ..., 256}`.
	Uint(usize),
	/// Signed (two's complement) integer, `bits` in `{8, 16, ..., 256}`.
	Int(usize),
	/// Boolean.
	Bool,
	/// 20-byte address, right-aligned in a 32-byte word.
	Address,
	/// Fixed-size byte array, `1 <= n <= 32`.
	FixedBytes(usize),
	/// Function reference: 20-byte address + 4-byte selector.
	Function,
	/// 32-byte hash. Only meaningful for indexed topic decoding.
	Hash,
	/// Variable-length UTF-8 string.
	String,
	/// Variable-length byte array.
	Bytes,
	/// Fixed-size array of `n` elements of a single element type.
	FixedArray(Box<AbiType>, usize),
	/// Variable-length array of a single element type.
	DynArray(Box<AbiType>),
	/// A named tuple: an ordered sequence of named fields.
	Tuple(TupleType),
}

/// A tuple type: an optional raw (Solidity) name plus its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleType {
	/// Raw struct name as declared in the source contract, if known.
	pub raw_name: Option<String>,
	/// Ordered `(field name, field type)` pairs.
	pub fields: Vec<(String, AbiType)>,
}

impl AbiType {
	/// True iff this type's encoding requires a tail offset: `String`,
	/// `Bytes`, `DynArray`, any tuple with a dynamic field, or any fixed
	/// array of a dynamic element.
	pub fn is_dynamic(&self) -> bool {
		match self {
			AbiType::String | AbiType::Bytes | AbiType::DynArray(_) => true,
			AbiType::Tuple(t) => t.fields.iter().any(|(_, ty)| ty.is_dynamic()),
			AbiType::FixedArray(elem, _) => elem.is_dynamic(),
			AbiType::Uint(_)
			| AbiType::Int(_)
			| AbiType::Bool
			| AbiType::Address
			| AbiType::FixedBytes(_)
			| AbiType::Function
			| AbiType::Hash => false,
		}
	}

	/// True iff this type is resolved via the length-prefix scheme
	/// (a 32-byte offset word followed by a 32-byte length word at the
	/// target offset): `String`, `Bytes`, `DynArray`.
	pub fn is_length_prefixed(&self) -> bool {
		matches!(self, AbiType::String | AbiType::Bytes | AbiType::DynArray(_))
	}

	/// Number of bytes this type occupies in the head region when static,
	/// or `32` (a single offset word) when dynamic.
	pub fn head_size(&self) -> usize {
		match self {
			AbiType::FixedArray(elem, n) if !self.is_dynamic() => n * elem.head_size(),
			AbiType::Tuple(t) if !self.is_dynamic() => t.fields.iter().map(|(_, ty)| ty.head_size()).sum(),
			_ => 32,
		}
	}

	/// The canonical ABI type string (`uint256`, `address[]`,
	/// `(uint256,bool)[3]`, ...), the inverse of parsing.
	pub fn canonical_string(&self) -> String {
		match self {
			AbiType::Uint(bits) => format!("uint{bits}"),
			AbiType::Int(bits) => format!("int{bits}"),
			AbiType::Bool => "bool".to_owned(),
			AbiType::Address => "address".to_owned(),
			AbiType::FixedBytes(n) => format!("bytes{n}"),
			AbiType::Function => "function".to_owned(),
			AbiType::Hash => "hash".to_owned(),
			AbiType::String => "string".to_owned(),
			AbiType::Bytes => "bytes".to_owned(),
			AbiType::FixedArray(elem, n) => format!("{}[{n}]", elem.canonical_string()),
			AbiType::DynArray(elem) => format!("{}[]", elem.canonical_string()),
			AbiType::Tuple(t) => {
				let fields = t.fields.iter().map(|(_, ty)| ty.canonical_string()).collect::<Vec<_>>().join(",");
				format!("({fields})")
			}
		}
	}

	/// Parses a canonical ABI type string with no tuple components, e.g.
	/// `"uint256"`, `"bytes32"`, `"address[]"`, `"bool[2][]"`.
	///
	/// Tuples cannot be named this way (there is no textual encoding for
	/// their field names); callers that need tuples build
	/// [`AbiType::Tuple`] directly or go through
	/// [`AbiType::from_json_type`].
	pub fn parse_scalar(name: &str) -> Result<AbiType, Error> {
		Self::from_json_type(name, &[])
	}

	/// Parses a JSON-ABI style type string (`"uint256"`, `"tuple[]"`,
	/// `"tuple[2][]"`, ...), resolving any `"tuple"` occurrence against
	/// `components` (each entry is `(field name, field type)`).
	///
	/// Array suffixes are peeled off from the right, so `"T[2][]"` parses
	/// as a dynamic array of `T[2]` (a fixed array of two `T`s) — matching
	/// Solidity's own reading of nested array declarations.
	pub fn from_json_type(name: &str, components: &[(String, AbiType)]) -> Result<AbiType, Error> {
		let name = name.trim();

		if let Some(stripped) = name.strip_suffix(']') {
			let open = matching_open_bracket(stripped)?;
			let (base, size_str) = (&stripped[..open], &stripped[open + 1..]);
			let elem = Self::from_json_type(base, components)?;
			return if size_str.is_empty() {
				Ok(AbiType::DynArray(Box::new(elem)))
			} else {
				let n: usize = size_str
					.parse()
					.map_err(|_| Error::ParseError { kind: crate::error::ParseErrorKind::BadArraySuffix, near: name.to_owned() })?;
				if n == 0 {
					return Err(Error::ParseError { kind: crate::error::ParseErrorKind::BadArraySuffix, near: name.to_owned() });
				}
				Ok(AbiType::FixedArray(Box::new(elem), n))
			};
		}

		if name == "tuple" {
			return Ok(AbiType::Tuple(TupleType { raw_name: None, fields: components.to_vec() }));
		}

		parse_scalar_token(name)
	}
}

fn matching_open_bracket(s: &str) -> Result<usize, Error> {
	let mut depth = 0i32;
	for (i, c) in s.char_indices().rev() {
		match c {
			']' => depth += 1,
			'[' => {
				if depth == 0 {
					return Ok(i);
				}
				depth -= 1;
			}
			_ => {}
		}
	}
	Err(Error::ParseError { kind: crate::error::ParseErrorKind::BadArraySuffix, near: s.to_owned() })
}

fn parse_scalar_token(s: &str) -> Result<AbiType, Error> {
	match s {
		"address" => return Ok(AbiType::Address),
		"bool" => return Ok(AbiType::Bool),
		"string" => return Ok(AbiType::String),
		"bytes" => return Ok(AbiType::Bytes),
		"function" => return Ok(AbiType::Function),
		"hash" => return Ok(AbiType::Hash),
		"uint" => return Ok(AbiType::Uint(256)),
		"int" => return Ok(AbiType::Int(256)),
		_ => {}
	}

	if let Some(rest) = s.strip_prefix("uint") {
		let bits = parse_bit_width(rest, s)?;
		return Ok(AbiType::Uint(bits));
	}

	if let Some(rest) = s.strip_prefix("int") {
		let bits = parse_bit_width(rest, s)?;
		return Ok(AbiType::Int(bits));
	}

	if let Some(rest) = s.strip_prefix("bytes") {
		let n: usize = rest.parse().map_err(|_| Error::UnknownType(s.to_owned()))?;
		if n == 0 || n > 32 {
			return Err(Error::UnknownType(s.to_owned()));
		}
		return Ok(AbiType::FixedBytes(n));
	}

	Err(Error::UnknownType(s.to_owned()))
}

fn parse_bit_width(rest: &str, whole: &str) -> Result<usize, Error> {
	let bits: usize = rest.parse().map_err(|_| Error::UnknownType(whole.to_owned()))?;
	if bits == 0 || bits > 256 || bits % 8 != 0 {
		return Err(Error::UnknownType(whole.to_owned()));
	}
	Ok(bits)
}

impl fmt::Display for AbiType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.canonical_string())
	}
}

/// A single function/event argument: a name, a type, and whether it is an
/// indexed event topic.
///
/// Function inputs/outputs always carry `indexed: false`; only event
/// arguments make meaningful use of the flag. Using one struct for both
/// (rather than separate `Param`/`EventParam` types) keeps the decoder's
/// "indexed arguments must not be dynamic" check (§[`crate::decoder`])
/// a single code path instead of two near-identical ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	/// Argument name. Synthesized as `arg{i}` if the source left it
	/// unnamed.
	pub name: String,
	/// Argument type.
	pub kind: AbiType,
	/// Whether this argument is stored as a topic rather than in `data`.
	/// Always `false` outside of event contexts.
	pub indexed: bool,
}

impl Param {
	/// Creates a non-indexed param, the common case for function I/O.
	pub fn new(name: impl Into<String>, kind: AbiType) -> Self {
		Param { name: name.into(), kind, indexed: false }
	}
}

impl<'de> serde::Deserialize<'de> for Param {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		deserializer.deserialize_map(ParamVisitor)
	}
}

struct ParamVisitor;

impl<'de> serde::de::Visitor<'de> for ParamVisitor {
	type Value = Param;

	fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		formatter.write_str("a JSON ABI parameter object")
	}

	fn visit_map<A>(self, mut map: A) -> Result<Param, A::Error>
	where
		A: serde::de::MapAccess<'de>,
	{
		let mut name: Option<String> = None;
		let mut kind: Option<String> = None;
		let mut indexed = false;
		let mut components: Vec<(String, AbiType)> = Vec::new();

		while let Some(key) = map.next_key::<String>()? {
			match key.as_str() {
				"name" => name = Some(map.next_value()?),
				"type" => kind = Some(map.next_value()?),
				"indexed" => indexed = map.next_value()?,
				"components" => {
					let raw: Vec<Param> = map.next_value()?;
					components = raw.into_iter().map(|p| (p.name, p.kind)).collect();
				}
				_ => {
					let _: serde::de::IgnoredAny = map.next_value()?;
				}
			}
		}

		let kind = kind.ok_or_else(|| serde::de::Error::missing_field("type"))?;
		let kind = AbiType::from_json_type(&kind, &components).map_err(serde::de::Error::custom)?;
		Ok(Param { name: name.unwrap_or_default(), kind, indexed })
	}
}
