//! Lexical analysis: source text in, an ordered token sequence out.
//!
//! Scanning is total. An unrecognized character or an unterminated string
//! is recorded as a [`ScanError`] and scanning picks up at the next
//! character, so one pass surfaces every lexical error in the input. The
//! returned token sequence always ends with exactly one [`TokenKind::Eof`]
//! token whose line is the last line seen.
//!
//! A trailing `.` after a number is deliberately not consumed into the
//! literal: `12.` scans as the number `12` followed by a separate `.`
//! token, which keeps `1234.method()`-style access possible later.

mod token;

use std::{iter::Peekable, str::CharIndices};

pub use token::{Token, TokenKind};

use crate::error::scanner::{ScanError, ScanErrorKind};

/// A scanner for Lox source code.
pub struct Scanner<'a> {
	/// The full source text, sliced for lexemes.
	source: &'a str,
	/// Iterator over the source, one character of lookahead.
	chars:  Peekable<CharIndices<'a>>,
	/// Byte offset where the current lexeme begins.
	start:  usize,
	/// Byte offset one past the character last consumed.
	cursor: usize,
	/// 1-based line of the character last consumed.
	line:   usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		Self { source, chars: source.char_indices().peekable(), start: 0, cursor: 0, line: 1 }
	}

	/// Scans the whole input, accumulating every lexical error found.
	pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
		let mut tokens = Vec::new();
		let mut errors = Vec::new();
		while let Some(&(index, _)) = self.chars.peek() {
			// At the beginning of the next lexeme.
			self.start = index;
			self.cursor = index;
			match self.scan_token() {
				Ok(Some(kind)) => {
					let lexeme = &self.source[self.start..self.cursor];
					tokens.push(Token::new(kind, lexeme, self.line));
				}
				Ok(None) => {} // whitespace or a comment
				Err(error) => errors.push(error),
			}
		}
		tokens.push(Token::new(TokenKind::Eof, "", self.line));
		(tokens, errors)
	}

	/// Scans one lexeme; `Ok(None)` means it produced no token.
	fn scan_token(&mut self) -> Result<Option<TokenKind>, ScanError> {
		let Some(c) = self.advance() else { return Ok(None) };
		let kind = match c {
			'(' => TokenKind::LeftParen,
			')' => TokenKind::RightParen,
			'{' => TokenKind::LeftBrace,
			'}' => TokenKind::RightBrace,
			',' => TokenKind::Comma,
			'.' => TokenKind::Dot,
			'-' => TokenKind::Minus,
			'+' => TokenKind::Plus,
			';' => TokenKind::Semicolon,
			'*' => TokenKind::Star,
			'!' => {
				if self.advance_if('=') {
					TokenKind::BangEqual
				} else {
					TokenKind::Bang
				}
			}
			'=' => {
				if self.advance_if('=') {
					TokenKind::EqualEqual
				} else {
					TokenKind::Equal
				}
			}
			'<' => {
				if self.advance_if('=') {
					TokenKind::LessEqual
				} else {
					TokenKind::Less
				}
			}
			'>' => {
				if self.advance_if('=') {
					TokenKind::GreaterEqual
				} else {
					TokenKind::Greater
				}
			}
			'/' => {
				if self.advance_if('/') {
					// A line comment runs to the end of the line.
					while self.peek().is_some_and(|c| c != '\n') {
						self.advance();
					}
					return Ok(None);
				}
				TokenKind::Slash
			}
			' ' | '\r' | '\t' => return Ok(None),
			'\n' => {
				self.line += 1;
				return Ok(None);
			}
			'"' => return self.string().map(Some),
			c if c.is_ascii_digit() => self.number(),
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
			c => return Err(ScanError::new(self.line, ScanErrorKind::UnexpectedCharacter(c))),
		};
		Ok(Some(kind))
	}

	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.chars.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Consumes the next character only when it matches `expected`.
	fn advance_if(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	fn peek(&mut self) -> Option<char> { self.chars.peek().map(|&(_, c)| c) }

	/// One character past `peek`, for the fractional-part lookahead.
	fn peek_second(&mut self) -> Option<char> {
		let mut lookahead = self.chars.clone();
		lookahead.next()?;
		lookahead.peek().map(|&(_, c)| c)
	}

	/// Scans a string literal; embedded newlines are legal and counted.
	fn string(&mut self) -> Result<TokenKind, ScanError> {
		while let Some(c) = self.peek() {
			if c == '"' {
				break;
			}
			if c == '\n' {
				self.line += 1;
			}
			self.advance();
		}
		if self.peek().is_none() {
			return Err(ScanError::new(self.line, ScanErrorKind::UnterminatedString));
		}
		self.advance(); // the closing quote
		let value = &self.source[self.start + 1..self.cursor - 1];
		Ok(TokenKind::Str(value.to_owned()))
	}

	/// Scans a number literal: digits, then a fractional part only when a
	/// digit follows the dot.
	fn number(&mut self) -> TokenKind {
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.advance();
		}
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			self.advance(); // consume '.'
			while self.peek().is_some_and(|c| c.is_ascii_digit()) {
				self.advance();
			}
		}
		// A lexeme of this shape always parses as an f64.
		let value = self.source[self.start..self.cursor].parse().unwrap_or_default();
		TokenKind::Number(value)
	}

	/// Scans a maximal identifier run and checks the reserved-word table.
	fn identifier(&mut self) -> TokenKind {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenKind::keyword(text).unwrap_or(TokenKind::Identifier)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(source: &str) -> (Vec<Token>, Vec<ScanError>) { Scanner::new(source).scan_tokens() }

	fn kinds(source: &str) -> Vec<TokenKind> {
		let (tokens, errors) = scan(source);
		assert!(errors.is_empty(), "unexpected scan errors: {errors:?}");
		tokens.into_iter().map(|t| t.kind).collect()
	}

	#[test]
	fn empty_source_is_one_eof() {
		let (tokens, errors) = scan("");
		assert!(errors.is_empty());
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].kind, TokenKind::Eof);
		assert_eq!(tokens[0].line, 1);
	}

	#[test]
	fn braces_scan_to_three_tokens() {
		assert_eq!(kinds("{}"), vec![TokenKind::LeftBrace, TokenKind::RightBrace, TokenKind::Eof]);
	}

	#[test]
	fn eof_carries_the_last_line() {
		let (tokens, errors) = scan("{\n\n}");
		assert!(errors.is_empty());
		assert_eq!(tokens.len(), 3);
		assert_eq!(tokens[2].kind, TokenKind::Eof);
		assert_eq!(tokens[2].line, 3);
	}

	#[test]
	fn number_with_fraction() {
		assert_eq!(kinds("12.34"), vec![TokenKind::Number(12.34), TokenKind::Eof]);
	}

	#[test]
	fn trailing_dot_is_a_separate_token() {
		assert_eq!(kinds("12."), vec![TokenKind::Number(12.0), TokenKind::Dot, TokenKind::Eof]);
		let (tokens, _) = scan("12.");
		assert_eq!(tokens[0].lexeme, "12");
		assert_eq!(tokens[1].lexeme, ".");
	}

	#[test]
	fn two_character_operators() {
		assert_eq!(
			kinds("!= == <= >= ! = < >"),
			vec![
				TokenKind::BangEqual,
				TokenKind::EqualEqual,
				TokenKind::LessEqual,
				TokenKind::GreaterEqual,
				TokenKind::Bang,
				TokenKind::Equal,
				TokenKind::Less,
				TokenKind::Greater,
				TokenKind::Eof,
			]
		);
	}

	#[test]
	fn reserved_words_never_scan_as_identifiers() {
		let keywords = [
			("and", TokenKind::And),
			("class", TokenKind::Class),
			("else", TokenKind::Else),
			("false", TokenKind::False),
			("for", TokenKind::For),
			("fun", TokenKind::Fun),
			("if", TokenKind::If),
			("nil", TokenKind::Nil),
			("or", TokenKind::Or),
			("print", TokenKind::Print),
			("return", TokenKind::Return),
			("super", TokenKind::Super),
			("this", TokenKind::This),
			("true", TokenKind::True),
			("var", TokenKind::Var),
			("while", TokenKind::While),
		];
		for (word, expected) in keywords {
			assert_eq!(kinds(word), vec![expected, TokenKind::Eof], "keyword {word}");
		}
		assert_eq!(kinds("andy"), vec![TokenKind::Identifier, TokenKind::Eof]);
		assert_eq!(kinds("_or2"), vec![TokenKind::Identifier, TokenKind::Eof]);
	}

	#[test]
	fn comments_and_whitespace_produce_no_tokens() {
		assert_eq!(kinds("\t \r // nothing here ()"), vec![TokenKind::Eof]);
		assert_eq!(kinds("1 // rest\n2"), vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]);
	}

	#[test]
	fn string_literal_value_excludes_the_quotes() {
		let (tokens, errors) = scan(r#""hello world""#);
		assert!(errors.is_empty());
		assert_eq!(tokens[0].kind, TokenKind::Str("hello world".to_owned()));
		assert_eq!(tokens[0].lexeme, r#""hello world""#);
	}

	#[test]
	fn multiline_string_counts_lines() {
		let (tokens, errors) = scan("\"a\nb\"");
		assert!(errors.is_empty());
		assert_eq!(tokens[0].kind, TokenKind::Str("a\nb".to_owned()));
		assert_eq!(tokens[1].line, 2);
	}

	#[test]
	fn unterminated_string_reports_and_yields_no_token() {
		let (tokens, errors) = scan("\"open");
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].to_string(), "[line 1] Error: Unterminated string.");
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].kind, TokenKind::Eof);
	}

	#[test]
	fn scanning_continues_past_unexpected_characters() {
		let (tokens, errors) = scan("@#(");
		assert_eq!(errors.len(), 2);
		assert_eq!(errors[0].to_string(), "[line 1] Error: Unexpected character '@'.");
		assert_eq!(tokens.into_iter().map(|t| t.kind).collect::<Vec<_>>(), vec![
			TokenKind::LeftParen,
			TokenKind::Eof
		]);
	}
}
