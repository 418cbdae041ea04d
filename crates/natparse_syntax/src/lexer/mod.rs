//! Lexer for Natural source code
//!
//! Handles tokenization including:
//! - Keywords, identifiers, qualified names (`#GRP.#FIELD`) and statement labels (`R1.`)
//! - System variables and functions (`*DATX`, `*OCC`, `*LINE-COUNT`) with longest-match
//! - String, numeric and typed literals (`'abc'`, `7.5`, `H'0A'`, `D'2024-01-31'`)
//! - Operators and punctuation (`:=`, `<>`, `**`, `(`, `:`)
//! - Comment lines (`*` in column 1) and trailing comments (`/*`)
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, LiteralPrefix)
//! - `literals` - String, typed literal and number scanning
//! - `system_vars` - `*`-prefixed system variable scanning
//!
//! ## Notes
//! - Lexing never fails as a whole: characters that match no rule produce a diagnostic plus an `Error` token, and
//!   scanning resumes with the next character.

mod literals;
mod system_vars;
pub mod tokens;

pub use tokens::{LiteralPrefix, SourceId, Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::{Diagnostic, errors};
use natparse_core::lang::operators::{self, OperatorId};
use natparse_core::lang::punctuation::PunctuationId;

/// Output of one lexer run: the token stream (always ending in `Eof`) and the diagnostics found on the way.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Lexed {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

// ============================================================================
// LEXER STATE
// ============================================================================

/// Lexer for Natural source code.
///
/// Converts source text into a stream of tokens. Natural is line oriented but not line sensitive: newlines only
/// matter for comment lines and for line/column bookkeeping, so they never become tokens.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// 1-based line of `current_pos`.
    line: u32,
    /// Byte offset where the current line starts.
    line_start: usize,
    /// Line and column of the token being scanned.
    token_line: u32,
    token_column: u32,
    source_id: SourceId,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_source_id(source, SourceId::default())
    }

    /// Create a lexer whose tokens are tagged with `source_id`.
    pub fn with_source_id(source: &'a str, source_id: SourceId) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            line_start: 0,
            token_line: 1,
            token_column: 1,
            source_id,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// The token stream always ends with an `Eof` token, even when diagnostics were recorded.
    pub fn tokenize(mut self) -> Lexed {
        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        self.mark_token_start();
        self.add_token(TokenKind::Eof, self.current_pos);

        Lexed {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.current_pos;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn skip_to_line_end(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    fn mark_token_start(&mut self) {
        self.token_line = self.line;
        self.token_column = (self.current_pos - self.line_start + 1) as u32;
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        self.mark_token_start();
        let start = self.current_pos;
        let at_line_start = start == self.line_start;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            // Comment line: `*` in column 1 followed by blank, `*` or end of line
            '*' if at_line_start && self.peek().is_none_or(|n| n.is_whitespace() || n == '*') => {
                self.skip_to_line_end();
            }
            // Trailing comment
            '/' if self.peek() == Some('*') => self.skip_to_line_end(),

            '*' if self.peek().is_some_and(|n| n.is_ascii_alphabetic()) => self.scan_system_variable(start),
            '*' => self.operator(start, OperatorId::Star, &[('*', OperatorId::StarStar)]),
            '/' => self.add_op(OperatorId::Slash, start),
            '+' if self.peek().is_some_and(|n| n.is_ascii_alphabetic()) => self.scan_identifier(start),
            '+' => self.add_op(OperatorId::Plus, start),
            '-' => self.add_op(OperatorId::Minus, start),
            '=' => self.add_op(OperatorId::Eq, start),
            '<' => self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq), ('>', OperatorId::NotEq)]),
            '>' => self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]),
            ':' => {
                if self.match_char('=') {
                    self.add_op(OperatorId::Assign, start);
                } else {
                    self.add_punct(PunctuationId::Colon, start);
                }
            }
            '(' => self.add_punct(PunctuationId::LParen, start),
            ')' => self.add_punct(PunctuationId::RParen, start),
            ',' => self.add_punct(PunctuationId::Comma, start),

            // Strings
            '\'' | '"' => self.scan_string(start, c),

            // Typed literals: H'..', D'..', T'..', U'..'
            _ if LiteralPrefix::from_char(c).is_some() && matches!(self.peek(), Some('\'' | '"')) => {
                self.scan_typed_literal(start, c);
            }

            // Numbers
            '0'..='9' => self.scan_number(start),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => {
                let span = Span::new(start, self.current_pos);
                self.diagnostics.push(errors::unexpected_character(c, span));
                self.add_token(TokenKind::Error(c.to_string()), start);
            }
        }
    }

    // ========================================================================
    // Operator helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.add_token_spanning(kind, start, self.current_pos);
    }

    /// Push a token whose span ends before `current_pos` (trailing characters were consumed but are not part of it).
    fn add_token_spanning(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            text: self.source[start..end].to_string(),
            span: Span::new(start, end),
            line: self.token_line,
            column: self.token_column,
            source: self.source_id,
        });
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match compound operator, fallback to simple.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    /// Scan an identifier, keyword, word operator or label.
    ///
    /// A `.` followed by an identifier character continues a qualified name. Any other `.` directly after the name
    /// turns it into a label (`R1.`), except after keywords, where it is an ignored statement terminator (`END.`).
    fn scan_identifier(&mut self, start: usize) {
        loop {
            while self.peek().is_some_and(is_ident_continue) {
                self.advance();
            }
            if self.peek() == Some('.') && self.peek_next().is_some_and(is_ident_continue) {
                self.advance();
                continue;
            }
            break;
        }

        let end = self.current_pos;
        let spelling = &self.source[start..end];
        let upper = spelling.to_ascii_uppercase();

        if self.peek() == Some('.') {
            self.advance();
            match keyword_id(spelling) {
                Some(id) => self.add_token_spanning(TokenKind::Keyword(id), start, end),
                None => self.add_token(TokenKind::Label(upper), start),
            }
            return;
        }

        if let Some(id) = operators::from_word(spelling) {
            self.add_op(id, start);
        } else if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(upper), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier. `+` (application-independent variables) is handled by the caller.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '#' || c == '&'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '#' | '$' | '@' | '&')
}

/// Lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Lexed {
    Lexer::new(source).tokenize()
}

/// Lex a source string, tagging every token with `source_id`.
#[tracing::instrument(skip_all, fields(source_len = source.len(), source_id = source_id.0))]
pub fn lex_source(source: &str, source_id: SourceId) -> Lexed {
    Lexer::with_source_id(source, source_id).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use natparse_core::lang::keywords::{self, KeywordId};
    use natparse_core::lang::system_vars::SystemVarId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let lexed = lex(source);
        assert!(lexed.diagnostics.is_empty(), "{:?}", lexed.diagnostics);
        lexed.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in keywords::KEYWORDS {
            let tokens = kinds(k.canonical);
            assert_eq!(tokens.len(), 2, "expected keyword + EOF for {:?}, got {:?}", k.id, tokens);
            assert!(tokens[0].is_keyword(k.id), "{:?}", tokens[0]);
            assert_eq!(tokens[1], TokenKind::Eof);
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        for o in operators::OPERATORS {
            for spelling in o.symbols.iter().chain(o.words) {
                // Leading blank: a `*` in column 1 starts a comment line.
                let tokens = kinds(&format!(" {spelling}"));
                assert_eq!(tokens.len(), 2, "expected operator + EOF for {spelling:?}, got {tokens:?}");
                assert!(tokens[0].is_operator(o.id), "{spelling}");
            }
        }
    }

    #[test]
    fn test_punctuation() {
        let tokens = kinds("( ) , :");
        assert!(tokens[0].is_punctuation(PunctuationId::LParen));
        assert!(tokens[1].is_punctuation(PunctuationId::RParen));
        assert!(tokens[2].is_punctuation(PunctuationId::Comma));
        assert!(tokens[3].is_punctuation(PunctuationId::Colon));
    }

    #[test]
    fn test_keywords_ignore_case() {
        let tokens = kinds("examine Examine EXAMINE end-define");
        assert!(tokens[..3].iter().all(|t| t.is_keyword(KeywordId::Examine)));
        assert!(tokens[3].is_keyword(KeywordId::EndDefine));
    }

    #[test]
    fn test_identifiers_are_uppercased() {
        let tokens = kinds("#var-1 +aiv &1& #grp.#field");
        assert_eq!(tokens[0], TokenKind::Ident("#VAR-1".into()));
        assert_eq!(tokens[1], TokenKind::Ident("+AIV".into()));
        assert_eq!(tokens[2], TokenKind::Ident("&1&".into()));
        assert_eq!(tokens[3], TokenKind::Ident("#GRP.#FIELD".into()));
    }

    #[test]
    fn test_labels_and_statement_dots() {
        let lexed = lex("R1. FOR #I 1 10\nEND.");
        assert_eq!(lexed.tokens[0].kind, TokenKind::Label("R1".into()));
        assert_eq!(lexed.tokens[0].text, "R1.");
        let end = &lexed.tokens[lexed.tokens.len() - 2];
        assert!(end.kind.is_keyword(KeywordId::End));
        assert_eq!(end.text, "END");
    }

    #[test]
    fn test_comments() {
        let tokens = kinds("* comment line\n** another\n#A := 1 /* trailing\n*\n#B := 2");
        let idents: Vec<_> = tokens.iter().filter(|t| matches!(t, TokenKind::Ident(_))).collect();
        assert_eq!(idents.len(), 2);
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_star_outside_column_one_is_multiplication() {
        let tokens = kinds("#A := #B * 2 ** 3");
        assert!(tokens[3].is_operator(OperatorId::Star));
        assert!(tokens[5].is_operator(OperatorId::StarStar));
    }

    #[test]
    fn test_system_variables_longest_match() {
        let tokens = kinds("*DAT4E *DATE *LINE-COUNT *LINE *OCCURRENCE *OCC");
        assert_eq!(tokens[0], TokenKind::SystemVar(SystemVarId::Dat4e));
        assert_eq!(tokens[1], TokenKind::SystemVar(SystemVarId::Date));
        assert_eq!(tokens[2], TokenKind::SystemVar(SystemVarId::LineCount));
        assert_eq!(tokens[3], TokenKind::SystemVar(SystemVarId::Line));
        assert_eq!(tokens[4], TokenKind::SystemVar(SystemVarId::Occurrence));
        assert_eq!(tokens[5], TokenKind::SystemVar(SystemVarId::Occ));
    }

    #[test]
    fn test_system_function_argument_is_separate() {
        let tokens = kinds("*TIMD(R1.)");
        assert_eq!(tokens[0], TokenKind::SystemVar(SystemVarId::Timd));
        assert!(tokens[1].is_punctuation(PunctuationId::LParen));
        assert_eq!(tokens[2], TokenKind::Label("R1".into()));
        assert!(tokens[3].is_punctuation(PunctuationId::RParen));
    }

    #[test]
    fn test_system_variable_followed_by_minus() {
        let tokens = kinds("*DATX-1");
        assert_eq!(tokens[0], TokenKind::SystemVar(SystemVarId::Datx));
        assert!(tokens[1].is_operator(OperatorId::Minus));
        assert_eq!(tokens[2], TokenKind::Integer("1".into()));
    }

    #[test]
    fn test_unknown_system_variable_recovers() {
        let lexed = lex("#A := *NOPE #B");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.diagnostics[0].kind, DiagnosticKind::LexError);
        assert_eq!(lexed.tokens[2].kind, TokenKind::Error("*NOPE".into()));
        assert_eq!(lexed.tokens[3].kind, TokenKind::Ident("#B".into()));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("42 3.14 .5");
        assert_eq!(tokens[0], TokenKind::Integer("42".into()));
        assert_eq!(tokens[1], TokenKind::Decimal("3.14".into()));
        assert_eq!(tokens[2], TokenKind::Decimal(".5".into()));
    }

    #[test]
    fn test_filler_bytes_split() {
        let tokens = kinds("FILLER 5X");
        assert!(tokens[0].is_keyword(KeywordId::Filler));
        assert_eq!(tokens[1], TokenKind::Integer("5".into()));
        assert_eq!(tokens[2], TokenKind::Ident("X".into()));
    }

    #[test]
    fn test_strings() {
        let tokens = kinds(r#"'hello' "world" 'it''s'"#);
        assert_eq!(tokens[0], TokenKind::String("hello".into()));
        assert_eq!(tokens[1], TokenKind::String("world".into()));
        assert_eq!(tokens[2], TokenKind::String("it's".into()));
    }

    #[test]
    fn test_unterminated_string_still_produces_token() {
        let lexed = lex("'abc\n#A");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert_eq!(lexed.tokens[0].kind, TokenKind::String("abc".into()));
        assert_eq!(lexed.tokens[1].kind, TokenKind::Ident("#A".into()));
    }

    #[test]
    fn test_typed_literals() {
        let tokens = kinds("H'0A' D'2024-01-31' t'12:00' U'x' HELLO");
        assert_eq!(tokens[0], TokenKind::TypedLiteral(LiteralPrefix::Hex, "0A".into()));
        assert_eq!(tokens[1], TokenKind::TypedLiteral(LiteralPrefix::Date, "2024-01-31".into()));
        assert_eq!(tokens[2], TokenKind::TypedLiteral(LiteralPrefix::Time, "12:00".into()));
        assert_eq!(tokens[3], TokenKind::TypedLiteral(LiteralPrefix::Unicode, "x".into()));
        assert_eq!(tokens[4], TokenKind::Ident("HELLO".into()));
    }

    #[test]
    fn test_type_specification_tokens() {
        let tokens = kinds("(N7,2) (A10/1:*)");
        assert_eq!(tokens[1], TokenKind::Ident("N7".into()));
        assert!(tokens[2].is_punctuation(PunctuationId::Comma));
        assert_eq!(tokens[3], TokenKind::Integer("2".into()));
        assert_eq!(tokens[6], TokenKind::Ident("A10".into()));
        assert!(tokens[7].is_operator(OperatorId::Slash));
        assert!(tokens[9].is_punctuation(PunctuationId::Colon));
        assert!(tokens[10].is_operator(OperatorId::Star));
    }

    #[test]
    fn test_positions() {
        let lexed = lex("DEFINE DATA\n  LOCAL\nEND-DEFINE");
        let local = &lexed.tokens[2];
        assert_eq!((local.line, local.column), (2, 3));
        assert_eq!(local.span, Span::new(14, 19));
        let eof = lexed.tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.span, Span::new(30, 30));
    }

    #[test]
    fn test_unexpected_character() {
        let lexed = lex("#A := 1 ; #B := 2");
        assert_eq!(lexed.diagnostics.len(), 1);
        assert!(lexed.diagnostics[0].message.contains("Unexpected character ';'"));
        assert!(lexed.tokens.iter().any(|t| t.kind == TokenKind::Ident("#B".into())));
    }

    #[test]
    fn test_source_id_is_carried() {
        let lexed = lex_source("#A", SourceId(7));
        assert!(lexed.tokens.iter().all(|t| t.source == SourceId(7)));
    }
}
