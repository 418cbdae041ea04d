/// Operand and condition parsing.
///
/// Operands use a small precedence ladder: additive → multiplicative → power → unary → primary. Conditions sit on
/// top of it: `OR` → `AND` → `NOT` → comparison.
///
/// ## Notes
/// - Variable references are bound to their declaration here; unknown names produce a warning, never an error.
/// - Keywords that may also be names (`VALUE`, `NAME`, ...) read as variables only when such a variable is declared.
impl<'a> Parser<'a> {
    // ========================================================================
    // Arithmetic
    // ========================================================================

    fn operand(&mut self) -> PResult<NodeId> {
        self.additive()
    }

    fn additive(&mut self) -> PResult<NodeId> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek().operator_id() {
                Some(OperatorId::Plus) => ArithmeticOp::Add,
                Some(OperatorId::Minus) => ArithmeticOp::Subtract,
                _ => break,
            };
            self.advance();
            let rhs = self.multiplicative()?;
            lhs = self.binary_arithmetic(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> PResult<NodeId> {
        let mut lhs = self.power()?;
        loop {
            let op = match self.peek().operator_id() {
                Some(OperatorId::Star) => ArithmeticOp::Multiply,
                Some(OperatorId::Slash) => ArithmeticOp::Divide,
                _ => break,
            };
            self.advance();
            let rhs = self.power()?;
            lhs = self.binary_arithmetic(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn power(&mut self) -> PResult<NodeId> {
        let lhs = self.unary()?;
        if self.match_op(OperatorId::StarStar) {
            let rhs = self.power()?;
            return Ok(self.binary_arithmetic(ArithmeticOp::Power, lhs, rhs));
        }
        Ok(lhs)
    }

    /// Builds `lhs op rhs` and queues a numeric check for each side that is not itself an expression.
    fn binary_arithmetic(&mut self, op: ArithmeticOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        for side in [lhs, rhs] {
            if !matches!(self.tree.kind(side), NodeKind::Arithmetic { .. }) {
                self.check_operand(side, ARITHMETIC_OPERAND);
            }
        }
        let span = self.tree.span(lhs).merge(self.tree.span(rhs));
        self.tree.alloc(NodeKind::Arithmetic { op, lhs, rhs }, span)
    }

    /// Sign prefixes. A minus directly before a number folds into the literal.
    fn unary(&mut self) -> PResult<NodeId> {
        let start = self.current_span().start;
        if self.match_op(OperatorId::Plus) {
            return self.unary();
        }
        if !self.check_op(OperatorId::Minus) {
            return self.primary();
        }
        self.advance();

        let folded = match &self.peek().kind {
            TokenKind::Integer(n) => Some(Literal::new(LiteralKind::Integer, format!("-{n}"))),
            TokenKind::Decimal(n) => Some(Literal::new(LiteralKind::Decimal, format!("-{n}"))),
            _ => None,
        };
        if let Some(literal) = folded {
            let end = self.advance().span.end;
            return Ok(self.tree.alloc(NodeKind::Literal(literal), Span::new(start, end)));
        }

        let operand = self.unary()?;
        Ok(self
            .tree
            .alloc(NodeKind::Negation { operand }, Span::new(start, self.previous_end())))
    }

    // ========================================================================
    // Primary operands
    // ========================================================================

    fn primary(&mut self) -> PResult<NodeId> {
        let token = self.peek().clone();
        let start = token.span.start;

        let literal = match &token.kind {
            TokenKind::Integer(n) => Some(Literal::new(LiteralKind::Integer, n.clone())),
            TokenKind::Decimal(n) => Some(Literal::new(LiteralKind::Decimal, n.clone())),
            TokenKind::TypedLiteral(prefix, value) => {
                let kind = match prefix {
                    LiteralPrefix::Hex => LiteralKind::Hex,
                    LiteralPrefix::Date => LiteralKind::Date,
                    LiteralPrefix::Time => LiteralKind::Time,
                    LiteralPrefix::Unicode => LiteralKind::Unicode,
                };
                Some(Literal::new(kind, value.clone()))
            }
            TokenKind::Keyword(KeywordId::True) => Some(Literal::new(LiteralKind::Boolean, "TRUE")),
            TokenKind::Keyword(KeywordId::False) => Some(Literal::new(LiteralKind::Boolean, "FALSE")),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(self.tree.alloc(NodeKind::Literal(literal), token.span));
        }

        match &token.kind {
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.operand()?;
                self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
                Ok(inner)
            }
            TokenKind::String(value) => {
                self.advance();
                let mut value = value.clone();
                // 'abc' - 'def' is one literal
                while self.check_op(OperatorId::Minus) {
                    let TokenKind::String(next) = &self.peek_next().kind else {
                        break;
                    };
                    value.push_str(next);
                    self.advance();
                    self.advance();
                }
                Ok(self.tree.alloc(
                    NodeKind::Literal(Literal::new(LiteralKind::String, value)),
                    Span::new(start, self.previous_end()),
                ))
            }
            TokenKind::SystemVar(id) => self.system_variable(*id),
            TokenKind::Keyword(KeywordId::Substr) => self.substring(),
            TokenKind::Label(label) => {
                self.advance();
                Ok(self.tree.alloc(NodeKind::LabelReference { label: label.clone() }, token.span))
            }
            TokenKind::Keyword(KeywordId::Space) if !self.at_variable() => {
                self.advance();
                Ok(self.tree.alloc(
                    NodeKind::KeywordOperand {
                        keyword: KeywordId::Space,
                    },
                    token.span,
                ))
            }
            TokenKind::Ident(_) if self.at_function_call() => self.function_call(),
            _ if self.at_variable() => self.variable_reference(),
            _ => Err(self.error_here("Expected operand")),
        }
    }

    /// `SUBSTR(operand, start [, length])`.
    fn substring(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        self.expect_punct(PunctuationId::LParen, "Expected '(' after SUBSTR")?;
        let operand = self.operand()?;
        let mut from = None;
        let mut length = None;
        if self.match_punct(PunctuationId::Comma) {
            if !self.check_punct(PunctuationId::Comma) {
                from = Some(self.operand()?);
            }
            if self.match_punct(PunctuationId::Comma) {
                length = Some(self.operand()?);
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' to close SUBSTR")?;
        for bound in [from, length].into_iter().flatten() {
            self.check_operand(bound, COUNTER_VALUE.union(D::ARITHMETIC));
        }
        Ok(self.tree.alloc(
            NodeKind::Substring {
                operand,
                start: from,
                length,
            },
            Span::new(start, self.previous_end()),
        ))
    }

    /// `*NAME` or `*NAME(args)`; arguments are checked against the builtin signature.
    fn system_variable(&mut self, id: SystemVarId) -> PResult<NodeId> {
        let start = self.advance().span.start;
        if !system_vars::is_function(id) {
            return Ok(self.tree.alloc(NodeKind::SystemVariable { id }, Span::new(start, self.previous_end())));
        }

        let mut arguments = Vec::new();
        if self.check_punct(PunctuationId::LParen) && !self.at_attribute_list() {
            self.advance();
            if !self.check_punct(PunctuationId::RParen) {
                loop {
                    arguments.push(self.system_function_argument()?);
                    if !self.match_punct(PunctuationId::Comma) {
                        break;
                    }
                }
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' to close the argument list")?;
        }
        let span = Span::new(start, self.previous_end());

        if let Some(definition) = builtins::lookup(id) {
            let params = definition.params();
            let name = system_vars::as_str(id);
            if arguments.len() < definition.mandatory_params() {
                let missing = params[arguments.len()].name;
                self.errors.push(errors::missing_function_argument(name, missing, span));
            } else if arguments.len() > params.len() {
                self.errors.push(errors::too_many_function_arguments(name, params.len(), span));
            }
        }

        Ok(self.tree.alloc(NodeKind::SystemFunctionCall { id, arguments }, span))
    }

    /// Labels (`R1.`) and mode keywords (`UPPER`) are valid system function arguments.
    fn system_function_argument(&mut self) -> PResult<NodeId> {
        let token = self.peek().clone();
        let closes = |kind: &TokenKind| {
            kind.is_punctuation(PunctuationId::Comma) || kind.is_punctuation(PunctuationId::RParen)
        };
        match &token.kind {
            TokenKind::Label(label) => {
                self.advance();
                Ok(self.tree.alloc(NodeKind::LabelReference { label: label.clone() }, token.span))
            }
            TokenKind::Keyword(keyword) if !self.at_variable() && closes(&self.peek_next().kind) => {
                self.advance();
                Ok(self.tree.alloc(NodeKind::KeywordOperand { keyword: *keyword }, token.span))
            }
            _ => self.operand(),
        }
    }

    /// `NAME(<` starts a user function call.
    fn at_function_call(&self) -> bool {
        if !self.peek_next().kind.is_punctuation(PunctuationId::LParen) {
            return false;
        }
        let third = &self.peek_at(2).kind;
        third.is_operator(OperatorId::Lt) || third.is_operator(OperatorId::NotEq)
    }

    /// `NAME(<arg, ...>)`; `NAME(<>)` has no arguments.
    fn function_call(&mut self) -> PResult<NodeId> {
        let name_token = self.advance().clone();
        let name = name_token.identifier_name().unwrap_or_default();
        self.advance(); // (

        let mut arguments = Vec::new();
        if !self.match_op(OperatorId::NotEq) {
            self.expect_op(OperatorId::Lt, "Expected '<' to start the function arguments")?;
            if !self.check_op(OperatorId::Gt) {
                loop {
                    arguments.push(self.operand()?);
                    if !self.match_punct(PunctuationId::Comma) {
                        break;
                    }
                }
            }
            self.expect_op(OperatorId::Gt, "Expected '>' to close the function arguments")?;
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after the function arguments")?;

        let referenced = match self.index.and_then(|index| index.find_module(&name)) {
            Some(summary) => Some(summary.to_ref()),
            None => match self.prototypes.get(&name) {
                Some(return_type) => Some(ModuleRef {
                    name: name.clone(),
                    kind: FileKind::Function,
                    return_type: return_type.clone(),
                }),
                None => {
                    if self.index.is_some() {
                        tracing::debug!(function = %name, "unresolved function");
                        self.errors.push(errors::unresolved_module(&name, name_token.span));
                    }
                    None
                }
            },
        };

        Ok(self.tree.alloc(
            NodeKind::FunctionCall {
                name,
                arguments,
                referenced,
            },
            Span::new(name_token.span.start, self.previous_end()),
        ))
    }

    /// A possibly qualified, possibly indexed variable reference.
    fn variable_reference(&mut self) -> PResult<NodeId> {
        let name_token = self.advance().clone();
        let name = name_token.identifier_name().unwrap_or_default();

        let mut indices = Vec::new();
        if self.check_punct(PunctuationId::LParen) && !self.at_attribute_list() {
            self.advance();
            loop {
                indices.push(self.index_item()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' to close the index")?;
        }

        let declaration = self.symbols.resolve(&name);
        if declaration.is_none() {
            self.report_unresolved_variable(&name, name_token.span);
        }

        Ok(self.tree.alloc(
            NodeKind::VariableReference(VariableReference {
                name,
                indices,
                declaration,
            }),
            Span::new(name_token.span.start, self.previous_end()),
        ))
    }

    /// `i`, `*`, `a:b`, `*:b` or `a:*`.
    fn index_item(&mut self) -> PResult<NodeId> {
        let start = self.current_span().start;
        let lower = self.resize_bound()?;
        if self.match_punct(PunctuationId::Colon) {
            let upper = self.resize_bound()?;
            return Ok(self
                .tree
                .alloc(NodeKind::RangedAccess { lower, upper }, Span::new(start, self.previous_end())));
        }
        match lower {
            Some(index) => Ok(index),
            None => Ok(self.tree.alloc(
                NodeKind::RangedAccess {
                    lower: None,
                    upper: None,
                },
                Span::new(start, self.previous_end()),
            )),
        }
    }

    fn report_unresolved_variable(&mut self, name: &str, span: Span) {
        let suppressed = !self.options.report_unresolved_variables
            || self.options.file_kind == FileKind::Copycode
            || self.unresolved_using
            || self.function_name.as_deref() == Some(name);
        if suppressed {
            return;
        }
        tracing::debug!(variable = %name, "unresolved variable");
        self.errors.push(errors::unresolved_variable(name, span));
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    fn condition(&mut self) -> PResult<NodeId> {
        let mut lhs = self.and_condition()?;
        while self.match_keyword(KeywordId::Or) {
            let rhs = self.and_condition()?;
            lhs = self.logical(LogicalOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_condition(&mut self) -> PResult<NodeId> {
        let mut lhs = self.not_condition()?;
        while self.match_keyword(KeywordId::And) {
            let rhs = self.not_condition()?;
            lhs = self.logical(LogicalOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn logical(&mut self, op: LogicalOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        let span = self.tree.span(lhs).merge(self.tree.span(rhs));
        self.tree.alloc(NodeKind::Logical { op, lhs, rhs }, span)
    }

    fn not_condition(&mut self) -> PResult<NodeId> {
        let start = self.current_span().start;
        if self.match_keyword(KeywordId::Not) {
            let operand = self.not_condition()?;
            return Ok(self.tree.alloc(NodeKind::Not { operand }, Span::new(start, self.previous_end())));
        }
        self.comparison()
    }

    /// `lhs op rhs [THRU upper]`, a parenthesized condition, or a bare (logical) operand.
    fn comparison(&mut self) -> PResult<NodeId> {
        if self.check_punct(PunctuationId::LParen) && self.paren_holds_condition() {
            self.advance();
            let inner = self.condition()?;
            self.expect_punct(PunctuationId::RParen, "Expected ')' to close the condition")?;
            return Ok(inner);
        }

        let lhs = self.operand()?;
        let Some(op) = self.peek().operator_id().filter(|op| operators::is_comparison(*op)) else {
            return Ok(lhs);
        };
        self.advance();

        let rhs_start = self.current_span().start;
        let value = self.operand()?;
        let rhs = if self.match_keyword(KeywordId::Thru) {
            let upper = self.operand()?;
            self.check_binary(lhs, upper, BinaryMode::Compatible);
            self.tree.alloc(
                NodeKind::RangedAccess {
                    lower: Some(value),
                    upper: Some(upper),
                },
                Span::new(rhs_start, self.previous_end()),
            )
        } else {
            value
        };
        self.check_binary(lhs, value, BinaryMode::Compatible);

        let span = Span::new(self.tree.span(lhs).start, self.previous_end());
        Ok(self.tree.alloc(NodeKind::Comparison { op, lhs, rhs }, span))
    }

    /// Return `true` if the parenthesis at the current token wraps a condition rather than an operand.
    fn paren_holds_condition(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.pos..] {
            match &token.kind {
                TokenKind::Punctuation(PunctuationId::LParen) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RParen) => {
                    depth -= 1;
                    if depth == 0 {
                        return false;
                    }
                }
                TokenKind::Operator(op) if depth == 1 && operators::is_comparison(*op) => return true,
                TokenKind::Keyword(KeywordId::And | KeywordId::Or | KeywordId::Not) if depth == 1 => return true,
                TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }
}
