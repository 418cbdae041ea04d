/// Type specification parsing.
///
/// This chunk parses the parenthesized type specification of a declaration (`(A10)`, `(N7,2/1:10)`,
/// `(A/1:*) DYNAMIC`) and the dimension-only form of array groups (`(1:10)`).
///
/// The lexer splits a specification into several tokens (`N7`, `,`, `2`); the parser glues their source text back
/// together, replaces constant names used as bounds by their values, and hands the result to
/// [`DataType::from_str`](std::str::FromStr).

/// A parsed type specification.
#[derive(Debug, Clone, PartialEq)]
enum TypeSpec {
    Typed(DataType),
    /// Dimensions without a format: an array of groups.
    Dimensions(Vec<Dimension>),
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Type specifications
    // ========================================================================

    /// Parse `( ... ) [DYNAMIC]` at the current position.
    ///
    /// An invalid specification is reported and replaced by the untyped type, so the declaration still ends up in
    /// the tree.
    fn type_spec(&mut self) -> PResult<TypeSpec> {
        let open = self.expect_punct(PunctuationId::LParen, "Expected '(' to start a type specification")?;
        let start = open.span.start;

        let mut text = String::new();
        let mut in_dimensions = false;
        while !self.check_punct(PunctuationId::RParen) {
            let token = self.peek();
            match &token.kind {
                TokenKind::Eof => return Err(self.error_here("Expected ')' to close the type specification")),
                TokenKind::Operator(OperatorId::Slash) => {
                    in_dimensions = true;
                    text.push('/');
                }
                TokenKind::Ident(name) if in_dimensions || (text.is_empty() && name.starts_with(['#', '+'])) => {
                    match self.constants.get(name) {
                        Some(value) => text.push_str(value),
                        None => text.push_str(name),
                    }
                }
                _ => text.push_str(&token.text.to_ascii_uppercase()),
            }
            self.advance();
        }
        let close = self.advance().span.end;
        let dynamic = self.match_keyword(KeywordId::Dynamic);
        let span = Span::new(start, if dynamic { self.previous_end() } else { close });

        if text.is_empty() {
            return Err(errors::invalid_type("", "empty type specification", span));
        }

        // `(1:10)`, `(*)`, `(#MAX)`: dimensions of a group
        if text.starts_with(|c: char| c.is_ascii_digit() || c == '*') {
            let dims: Result<Vec<Dimension>, _> = text.split(',').map(str::parse::<Dimension>).collect();
            return match dims {
                Ok(dims) => Ok(TypeSpec::Dimensions(dims)),
                Err(e) => {
                    self.errors.push(errors::invalid_type(&text, &e.to_string(), span));
                    Ok(TypeSpec::Typed(DataType::none()))
                }
            };
        }

        let full = if dynamic { format!("{text} DYNAMIC") } else { text.clone() };
        match full.parse::<DataType>() {
            Ok(ty) => Ok(TypeSpec::Typed(ty)),
            Err(e) => {
                self.errors.push(errors::invalid_type(&text, &e.to_string(), span));
                Ok(TypeSpec::Typed(DataType::none()))
            }
        }
    }

    /// Parse the type of a `RETURNS` clause; dimension-only forms are rejected.
    fn returns_type(&mut self) -> PResult<DataType> {
        let start = self.current_span();
        match self.type_spec()? {
            TypeSpec::Typed(ty) => Ok(ty),
            TypeSpec::Dimensions(_) => Err(errors::invalid_type(
                "",
                "a return type needs a format",
                Span::new(start.start, self.previous_end()),
            )),
        }
    }
}
