/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Lookahead predicates shared by several statements (`at_variable`, `at_assignment_target`, ...)
/// - Error recovery (`synchronize`)
///
/// Most functions in this file are internal (`fn`) and are documented primarily
/// to aid maintenance and onboarding.
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        self.peek_at(1)
    }

    /// Return the token `offset` positions ahead, clamped to `Eof`.
    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos - 1]
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> PResult<&Token> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> PResult<&Token> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_op(&mut self, id: OperatorId, msg: &str) -> PResult<&Token> {
        if self.check_op(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    /// Consume a block terminator, or report it missing without abandoning the block.
    ///
    /// Returns the end offset of the block.
    fn expect_terminator(&mut self, id: KeywordId) -> usize {
        if self.check_keyword(id) {
            return self.advance().span.end;
        }
        let msg = format!("Expected {}", keywords::as_str(id));
        let error = self.error_here(&msg);
        self.errors.push(error);
        self.previous_end()
    }

    /// Syntax error at the current token: `"{msg}, found '...'"`.
    fn error_here(&self, msg: &str) -> Diagnostic {
        errors::expected(msg, &self.found(), self.current_span())
    }

    /// Description of the current token for error messages.
    fn found(&self) -> String {
        let token = self.peek();
        match token.kind {
            TokenKind::Eof => "end of file".to_string(),
            _ => format!("'{}'", token.text),
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// End offset of the last consumed token.
    fn previous_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].span.end
    }

    /// Skip statement labels (`R1.`), remembering the last one.
    fn skip_labels(&mut self) {
        while let TokenKind::Label(name) = &self.peek().kind {
            self.label = Some(name.clone());
            self.advance();
        }
    }

    /// Return `true` if the current token is the first on its source line.
    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.tokens[self.pos - 1].line < self.peek().line
    }

    /// Skip tokens until something that can start or close a statement.
    ///
    /// Statement keywords only count at the start of a line, because several of them (`FOR`, `DISPLAY`, ...) also
    /// appear inside clauses. Terminators and the stops of enclosing blocks count anywhere.
    fn synchronize(&mut self) {
        let start = self.pos;
        self.advance();
        while !self.is_at_end() {
            let kind = &self.peek().kind;
            let closes_block = match kind {
                TokenKind::Keyword(id) => {
                    keywords::category(*id) == keywords::KeywordCategory::Terminator || self.block_stops.contains(id)
                }
                _ => false,
            };
            if closes_block {
                break;
            }
            if self.at_line_start() && (kind.is_statement_boundary() || self.at_assignment_target()) {
                break;
            }
            self.advance();
        }
        tracing::debug!(skipped = self.pos - start, "recovered at statement boundary");
    }

    // ========================================================================
    // Lookahead predicates
    // ========================================================================

    /// Name of the current token when it reads as a variable name.
    fn current_name(&self) -> Option<String> {
        self.peek().identifier_name()
    }

    /// Return `true` if the current token names a variable.
    ///
    /// Keywords that can be identifiers only count when a variable of that name is declared.
    fn at_variable(&self) -> bool {
        let token = self.peek();
        match &token.kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(id) => {
                keywords::can_be_identifier(*id) && self.symbols.contains(&token.text.to_ascii_uppercase())
            }
            _ => false,
        }
    }

    /// Return `true` for `name :=` and `name(...) :=`.
    fn at_assignment_target(&self) -> bool {
        if !self.at_variable() {
            return false;
        }
        let next = self.peek_next();
        if next.kind.is_operator(OperatorId::Assign) {
            return true;
        }
        if !next.kind.is_punctuation(PunctuationId::LParen) {
            return false;
        }
        let mut depth = 0usize;
        for (offset, token) in self.tokens[self.pos + 1..].iter().enumerate() {
            match token.kind {
                TokenKind::Punctuation(PunctuationId::LParen) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        return self.peek_at(offset + 2).kind.is_operator(OperatorId::Assign);
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    /// Return `true` if the current token can begin an operand in an operand list.
    fn at_operand_start(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(_)
            | TokenKind::Integer(_)
            | TokenKind::Decimal(_)
            | TokenKind::String(_)
            | TokenKind::TypedLiteral(..)
            | TokenKind::SystemVar(_) => !self.at_assignment_target(),
            TokenKind::Punctuation(PunctuationId::LParen) => true,
            TokenKind::Operator(OperatorId::Minus | OperatorId::Plus) => true,
            TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::Substr) => true,
            TokenKind::Keyword(KeywordId::Space) => !self.at_assignment_target(),
            TokenKind::Keyword(_) => self.at_variable() && !self.at_assignment_target(),
            _ => false,
        }
    }

    /// Return `true` for an attribute list such as `(AD=O)` or `(EM=XX)`.
    fn at_attribute_list(&self) -> bool {
        self.check_punct(PunctuationId::LParen)
            && matches!(&self.peek_next().kind, TokenKind::Ident(name) if name.len() == 2)
            && self.peek_at(2).kind.is_operator(OperatorId::Eq)
    }

    /// Skip a parenthesized attribute list. Returns `true` if one was skipped.
    fn skip_attribute_list(&mut self) -> bool {
        if !self.at_attribute_list() {
            return false;
        }
        self.skip_parenthesized();
        true
    }

    /// Skip a balanced `( ... )` group starting at the current token.
    fn skip_parenthesized(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.advance().kind {
                TokenKind::Punctuation(PunctuationId::LParen) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RParen) => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    /// Skip output spacing/tab notations (`5X`, `10T`). Returns `true` if one was skipped.
    fn skip_spacing(&mut self) -> bool {
        let TokenKind::Integer(_) = self.peek().kind else {
            return false;
        };
        let next = self.peek_next();
        let adjacent = next.span.start == self.peek().span.end;
        if adjacent && matches!(&next.kind, TokenKind::Ident(n) if n == "X" || n == "T") {
            self.advance();
            self.advance();
            return true;
        }
        false
    }

    // ========================================================================
    // Operand check queue
    // ========================================================================

    fn check_operand(&mut self, operand: NodeId, allowed: D) {
        self.checks.push(OperandCheck::Definition { operand, allowed });
    }

    fn check_binary(&mut self, lhs: NodeId, rhs: NodeId, mode: BinaryMode) {
        self.checks.push(OperandCheck::Binary { lhs, rhs, mode });
    }
}
