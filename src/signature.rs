// Copyright 2015-2020 Parity Technologies
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parser and stringifier for the textual `event Name(...)` /
//! `function Name(...)(...)` signature grammar, and its compact
//! `Name(...)` variant.
//!
//! There is exactly one tokenizer and one recursive-descent parser here;
//! event and function signatures share both, differing only in what
//! follows the argument list.

use crate::abi_type::{AbiType, Param, TupleType};
use crate::error::{Error, ParseErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
	Ident(String),
	OpenParen,
	CloseParen,
	OpenBracket,
	CloseBracket,
	Comma,
	Integer(usize),
}

fn tokenize(s: &str) -> Result<Vec<Token>, Error> {
	let bytes = s.as_bytes();
	let mut tokens = Vec::new();
	let mut i = 0;
	while i < bytes.len() {
		let c = bytes[i] as char;
		match c {
			' ' | '\t' | '\n' | '\r' => i += 1,
			'(' => {
				tokens.push(Token::OpenParen);
				i += 1;
			}
			')' => {
				tokens.push(Token::CloseParen);
				i += 1;
			}
			'[' => {
				tokens.push(Token::OpenBracket);
				i += 1;
			}
			']' => {
				tokens.push(Token::CloseBracket);
				i += 1;
			}
			',' => {
				tokens.push(Token::Comma);
				i += 1;
			}
			c if c.is_ascii_digit() => {
				let start = i;
				while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
					i += 1;
				}
				let n: usize = s[start..i]
					.parse()
					.map_err(|_| Error::ParseError { kind: ParseErrorKind::InvalidToken, near: s[start..i].to_owned() })?;
				tokens.push(Token::Integer(n));
			}
			c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
				let start = i;
				while i < bytes.len() {
					let c = bytes[i] as char;
					if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
						i += 1;
					} else {
						break;
					}
				}
				tokens.push(Token::Ident(s[start..i].to_owned()));
			}
			other => {
				return Err(Error::ParseError { kind: ParseErrorKind::InvalidToken, near: other.to_string() });
			}
		}
	}
	Ok(tokens)
}

/// A cursor over a token stream, consumed by recursive descent.
struct Cursor<'a> {
	tokens: &'a [Token],
	pos: usize,
	source: &'a str,
}

impl<'a> Cursor<'a> {
	fn new(tokens: &'a [Token], source: &'a str) -> Self {
		Cursor { tokens, pos: 0, source }
	}

	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.pos)
	}

	fn bump(&mut self) -> Option<&Token> {
		let t = self.tokens.get(self.pos);
		if t.is_some() {
			self.pos += 1;
		}
		t
	}

	fn near(&self) -> String {
		match self.peek() {
			Some(Token::Ident(s)) => s.clone(),
			Some(_) | None => self.source.to_owned(),
		}
	}

	fn expect_ident(&mut self) -> Result<String, Error> {
		match self.bump() {
			Some(Token::Ident(s)) => Ok(s.clone()),
			_ => Err(Error::ParseError { kind: ParseErrorKind::InvalidToken, near: self.near() }),
		}
	}

	fn expect_keyword(&mut self, kw: &str) -> Result<(), Error> {
		match self.peek() {
			Some(Token::Ident(s)) if s == kw => {
				self.bump();
				Ok(())
			}
			_ => Err(Error::ParseError { kind: ParseErrorKind::InvalidToken, near: self.near() }),
		}
	}

	fn eat_keyword(&mut self, kw: &str) -> bool {
		match self.peek() {
			Some(Token::Ident(s)) if s == kw => {
				self.bump();
				true
			}
			_ => false,
		}
	}

	fn eat(&mut self, tok: &Token) -> bool {
		if self.peek() == Some(tok) {
			self.bump();
			true
		} else {
			false
		}
	}

	fn expect_eof(&self) -> Result<(), Error> {
		if self.pos == self.tokens.len() {
			Ok(())
		} else {
			Err(Error::ParseError { kind: ParseErrorKind::InvalidToken, near: self.near() })
		}
	}
}

/// An `Event Name(uint256 a, address indexed b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSig {
	/// Event name.
	pub name: String,
	/// Declared inputs, in source order.
	pub inputs: Vec<Param>,
}

/// A `function Name(uint256 a) (bool)`, with optional outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
	/// Function name.
	pub name: String,
	/// Declared inputs, in source order.
	pub inputs: Vec<Param>,
	/// Declared outputs, in source order. Empty when the compact form
	/// with no output list was parsed.
	pub outputs: Vec<Param>,
}

/// Parses `"event Transfer(address indexed from, address indexed to, uint256 value)"`.
pub fn parse_event(s: &str) -> Result<EventSig, Error> {
	let tokens = tokenize(s)?;
	let mut cur = Cursor::new(&tokens, s);
	cur.expect_keyword("event")?;
	let name = cur.expect_ident()?;
	let inputs = parse_arguments(&mut cur)?;
	cur.expect_eof()?;
	Ok(EventSig { name, inputs })
}

/// Parses `"function transfer(address to, uint256 value) (bool)"`, or the
/// compact form `"transfer(address,uint256)"` with no keyword and no
/// outputs.
pub fn parse_function(s: &str) -> Result<FunctionSig, Error> {
	let tokens = tokenize(s)?;
	let mut cur = Cursor::new(&tokens, s);
	cur.eat_keyword("function");
	let name = cur.expect_ident()?;
	let inputs = parse_arguments(&mut cur)?;
	let outputs = if cur.peek() == Some(&Token::OpenParen) { parse_arguments(&mut cur)? } else { Vec::new() };
	cur.expect_eof()?;
	Ok(FunctionSig { name, inputs, outputs })
}

fn parse_arguments(cur: &mut Cursor<'_>) -> Result<Vec<Param>, Error> {
	if !cur.eat(&Token::OpenParen) {
		return Err(Error::ParseError { kind: ParseErrorKind::InvalidToken, near: cur.near() });
	}

	let mut args = Vec::new();
	if cur.eat(&Token::CloseParen) {
		return Ok(args);
	}

	loop {
		let arg = parse_argument(cur, args.len())?;
		args.push(arg);

		if cur.eat(&Token::Comma) {
			continue;
		}
		if cur.eat(&Token::CloseParen) {
			break;
		}
		return Err(Error::ParseError { kind: ParseErrorKind::InvalidToken, near: cur.near() });
	}

	Ok(args)
}

fn parse_argument(cur: &mut Cursor<'_>, index: usize) -> Result<Param, Error> {
	let mut kind = if cur.peek() == Some(&Token::OpenParen) {
		let fields = parse_arguments(cur)?;
		AbiType::Tuple(TupleType {
			raw_name: None,
			fields: fields.into_iter().map(|p| (p.name, p.kind)).collect(),
		})
	} else {
		let name = cur.expect_ident()?;
		AbiType::parse_scalar(&name)?
	};

	while cur.peek() == Some(&Token::OpenBracket) {
		cur.bump();
		kind = if cur.eat(&Token::CloseBracket) {
			AbiType::DynArray(Box::new(kind))
		} else {
			let n = match cur.bump() {
				Some(Token::Integer(n)) if *n > 0 => *n,
				_ => return Err(Error::ParseError { kind: ParseErrorKind::BadArraySuffix, near: cur.near() }),
			};
			if !cur.eat(&Token::CloseBracket) {
				return Err(Error::ParseError { kind: ParseErrorKind::BadArraySuffix, near: cur.near() });
			}
			AbiType::FixedArray(Box::new(kind), n)
		};
	}

	let indexed = cur.eat_keyword("indexed");

	// An argument name is optional in the textual grammar (`uint256`
	// alone is valid); a trailing identifier that is not `indexed` is
	// read as the name.
	let name = match cur.peek() {
		Some(Token::Ident(s)) if s != "indexed" => {
			let s = s.clone();
			cur.bump();
			s
		}
		_ => format!("arg{index}"),
	};

	// `indexed` may also appear after the name.
	let indexed = indexed || cur.eat_keyword("indexed");

	Ok(Param { name, kind, indexed })
}

/// Renders an event signature back to its canonical textual form.
pub fn stringify_event(sig: &EventSig) -> String {
	let args = sig
		.inputs
		.iter()
		.map(|p| {
			if p.indexed {
				format!("{} indexed {}", p.kind.canonical_string(), p.name)
			} else {
				format!("{} {}", p.kind.canonical_string(), p.name)
			}
		})
		.collect::<Vec<_>>()
		.join(", ");
	format!("event {}({})", sig.name, args)
}

/// Renders a function signature back to its canonical textual form.
/// Outputs are omitted when empty, matching the compact form accepted by
/// [`parse_function`].
pub fn stringify_function(sig: &FunctionSig) -> String {
	let inputs = sig.inputs.iter().map(|p| p.kind.canonical_string()).collect::<Vec<_>>().join(",");
	if sig.outputs.is_empty() {
		format!("{}({})", sig.name, inputs)
	} else {
		let outputs = sig.outputs.iter().map(|p| p.kind.canonical_string()).collect::<Vec<_>>().join(",");
		format!("{}({})({})", sig.name, inputs, outputs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_transfer_event() {
		let sig = parse_event("event Transfer(address indexed from, address indexed to, uint256 value)").unwrap();
		assert_eq!(sig.name, "Transfer");
		assert_eq!(sig.inputs.len(), 3);
		assert!(sig.inputs[0].indexed);
		assert!(sig.inputs[1].indexed);
		assert!(!sig.inputs[2].indexed);
		assert_eq!(sig.inputs[2].kind, AbiType::Uint(256));
	}

	#[test]
	fn parses_function_with_outputs() {
		let sig = parse_function("function balanceOf(address owner) (uint256)").unwrap();
		assert_eq!(sig.name, "balanceOf");
		assert_eq!(sig.inputs, vec![Param::new("owner", AbiType::Address)]);
		assert_eq!(sig.outputs, vec![Param::new("arg0", AbiType::Uint(256))]);
	}

	#[test]
	fn parses_compact_function_with_no_keyword_or_outputs() {
		let sig = parse_function("transfer(address,uint256)").unwrap();
		assert_eq!(sig.name, "transfer");
		assert_eq!(sig.inputs.len(), 2);
		assert!(sig.outputs.is_empty());
	}

	#[test]
	fn parses_nested_array_suffix_left_to_right() {
		let sig = parse_function("f(uint256[2][])").unwrap();
		assert_eq!(sig.inputs[0].kind, AbiType::DynArray(Box::new(AbiType::FixedArray(Box::new(AbiType::Uint(256)), 2))));
	}

	#[test]
	fn parses_tuple_argument() {
		let sig = parse_function("f((uint256 a, bool b) pair)").unwrap();
		match &sig.inputs[0].kind {
			AbiType::Tuple(t) => {
				assert_eq!(t.fields.len(), 2);
				assert_eq!(t.fields[0].0, "a");
			}
			other => panic!("expected tuple, got {other:?}"),
		}
	}

	#[test]
	fn rejects_garbage_after_signature() {
		assert!(parse_event("event Foo() extra").is_err());
	}

	#[test]
	fn stringify_round_trips_event() {
		let sig = parse_event("event Transfer(address indexed from, address to, uint256 value)").unwrap();
		assert_eq!(stringify_event(&sig), "event Transfer(address indexed from, address to, uint256 value)");
	}
}
