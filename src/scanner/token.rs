/// A token produced by the scanner.
///
/// `lexeme` is the exact source substring the token was scanned from, and
/// `line` is the 1-based source line it was completed on (for a string
/// literal spanning lines, the line of the closing quote).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub kind:   TokenKind,
	pub lexeme: String,
	pub line:   usize,
}

impl Token {
	pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
		Self { kind, lexeme: lexeme.into(), line }
	}
}

/// The kinds of token in Lox. Literal payloads live on the kind itself, so
/// only literal-bearing tokens carry a value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
	// Single-character punctuation and operators.
	LeftParen,
	RightParen,
	LeftBrace,
	RightBrace,
	Comma,
	Dot,
	Minus,
	Plus,
	Semicolon,
	Slash,
	Star,

	// One- or two-character operators.
	Bang,
	BangEqual,
	Equal,
	EqualEqual,
	Greater,
	GreaterEqual,
	Less,
	LessEqual,

	// Literals.
	Identifier,
	Str(String),
	Number(f64),

	// Reserved words.
	And,
	Class,
	Else,
	False,
	Fun,
	For,
	If,
	Nil,
	Or,
	Print,
	Return,
	Super,
	This,
	True,
	Var,
	While,

	/// End of input. Every token stream ends with exactly one of these.
	Eof,
}

impl TokenKind {
	/// Looks up an identifier-shaped lexeme in the reserved-word table.
	pub fn keyword(text: &str) -> Option<TokenKind> {
		let kind = match text {
			"and" => TokenKind::And,
			"class" => TokenKind::Class,
			"else" => TokenKind::Else,
			"false" => TokenKind::False,
			"for" => TokenKind::For,
			"fun" => TokenKind::Fun,
			"if" => TokenKind::If,
			"nil" => TokenKind::Nil,
			"or" => TokenKind::Or,
			"print" => TokenKind::Print,
			"return" => TokenKind::Return,
			"super" => TokenKind::Super,
			"this" => TokenKind::This,
			"true" => TokenKind::True,
			"var" => TokenKind::Var,
			"while" => TokenKind::While,
			_ => return None,
		};
		Some(kind)
	}
}
