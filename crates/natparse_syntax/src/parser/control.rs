/// Control flow: `IF`, `DECIDE ON`, `DECIDE FOR`, `FOR`, `REPEAT` and `ESCAPE`.
///
/// Bodies are parsed with `body_until`, which also stops at the closing keywords of every enclosing block. A
/// missing terminator is therefore reported once, at the block that lacks it, instead of swallowing the rest of the
/// module.
impl<'a> Parser<'a> {
    // ========================================================================
    // IF
    // ========================================================================

    /// `IF condition [THEN] body [ELSE body] END-IF`.
    fn if_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let condition = self.condition()?;
        self.match_keyword(KeywordId::Then);
        let then_body = self.body_until(&[KeywordId::Else, KeywordId::EndIf]);
        let else_body = if self.match_keyword(KeywordId::Else) {
            self.body_until(&[KeywordId::EndIf])
        } else {
            Vec::new()
        };
        let end = self.expect_terminator(KeywordId::EndIf);
        Ok(self.tree.alloc(
            NodeKind::If {
                condition,
                then_body,
                else_body,
            },
            Span::new(start, end),
        ))
    }

    // ========================================================================
    // DECIDE
    // ========================================================================

    fn decide_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        if self.match_keyword(KeywordId::On) {
            self.decide_on(start)
        } else if self.match_keyword(KeywordId::For) {
            self.decide_for(start)
        } else {
            Err(self.error_here("Expected ON or FOR after DECIDE"))
        }
    }

    fn decide_mode(&mut self) -> PResult<DecideMode> {
        if self.match_keyword(KeywordId::First) {
            Ok(DecideMode::First)
        } else if self.match_keyword(KeywordId::Every) {
            Ok(DecideMode::Every)
        } else {
            Err(self.error_here("Expected FIRST or EVERY"))
        }
    }

    /// `DECIDE ON FIRST|EVERY [VALUE [OF]] operand` followed by `VALUE`/`ANY`/`ALL`/`NONE` branches.
    fn decide_on(&mut self, start: usize) -> PResult<NodeId> {
        let mode = self.decide_mode()?;
        if self.match_keyword(KeywordId::Value) {
            self.match_keyword(KeywordId::Of);
        }
        let operand = self.operand()?;

        const STOPS: &[KeywordId] = &[
            KeywordId::Value,
            KeywordId::Any,
            KeywordId::All,
            KeywordId::None,
            KeywordId::EndDecide,
        ];
        let mut branches = Vec::new();
        let mut has_none = false;
        loop {
            self.skip_labels();
            let branch_start = self.current_span().start;
            let kind = match self.peek().keyword_id() {
                Some(KeywordId::Value) => {
                    self.advance();
                    let values = self.decide_values()?;
                    for value in &values {
                        self.check_binary(operand, *value, BinaryMode::Compatible);
                    }
                    BranchKind::Value(values)
                }
                Some(KeywordId::Any) => self.catch_all_branch(BranchKind::Any),
                Some(KeywordId::All) => self.catch_all_branch(BranchKind::All),
                Some(KeywordId::None) => {
                    has_none = true;
                    self.catch_all_branch(BranchKind::None)
                }
                _ => break,
            };
            let body = self.body_until(STOPS);
            branches.push(self.tree.alloc(
                NodeKind::DecideBranch { kind, body },
                Span::new(branch_start, self.previous_end()),
            ));
        }

        let end = self.expect_terminator(KeywordId::EndDecide);
        let span = Span::new(start, end);
        if !has_none {
            self.errors.push(errors::missing_none_branch(span));
        }
        Ok(self.tree.alloc(
            NodeKind::DecideOn {
                mode,
                operand,
                branches,
            },
            span,
        ))
    }

    /// `v1, v2, lo:hi` after `VALUE`.
    fn decide_values(&mut self) -> PResult<Vec<NodeId>> {
        let mut values = Vec::new();
        loop {
            let start = self.current_span().start;
            let value = self.operand()?;
            if self.match_punct(PunctuationId::Colon) {
                let upper = self.operand()?;
                values.push(self.tree.alloc(
                    NodeKind::RangedAccess {
                        lower: Some(value),
                        upper: Some(upper),
                    },
                    Span::new(start, self.previous_end()),
                ));
            } else {
                values.push(value);
            }
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        Ok(values)
    }

    /// `ANY [VALUE]`, `ALL [VALUE]`, `NONE [VALUE]` and the `[CONDITION]` spelling of DECIDE FOR.
    fn catch_all_branch(&mut self, kind: BranchKind) -> BranchKind {
        self.advance();
        if !self.match_keyword(KeywordId::Value) {
            self.match_keyword(KeywordId::Condition);
        }
        kind
    }

    /// `DECIDE FOR FIRST|EVERY CONDITION` followed by `WHEN` branches.
    fn decide_for(&mut self, start: usize) -> PResult<NodeId> {
        let mode = self.decide_mode()?;
        self.expect_keyword(KeywordId::Condition, "Expected CONDITION")?;

        const STOPS: &[KeywordId] = &[KeywordId::When, KeywordId::EndDecide];
        let mut branches = Vec::new();
        let mut has_none = false;
        loop {
            self.skip_labels();
            let branch_start = self.current_span().start;
            if !self.match_keyword(KeywordId::When) {
                break;
            }
            let kind = match self.peek().keyword_id() {
                Some(KeywordId::Any) => self.catch_all_branch(BranchKind::Any),
                Some(KeywordId::All) => self.catch_all_branch(BranchKind::All),
                Some(KeywordId::None) => {
                    has_none = true;
                    self.catch_all_branch(BranchKind::None)
                }
                _ => BranchKind::When(self.condition()?),
            };
            let body = self.body_until(STOPS);
            branches.push(self.tree.alloc(
                NodeKind::DecideBranch { kind, body },
                Span::new(branch_start, self.previous_end()),
            ));
        }

        let end = self.expect_terminator(KeywordId::EndDecide);
        let span = Span::new(start, end);
        if !has_none {
            self.errors.push(errors::missing_none_branch(span));
        }
        Ok(self.tree.alloc(NodeKind::DecideFor { mode, branches }, span))
    }

    // ========================================================================
    // Loops
    // ========================================================================

    /// `FOR var [:=|=|FROM] from [TO] to [STEP step] body END-FOR`.
    fn for_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let variable = self.primary()?;
        if !self.match_op(OperatorId::Assign) && !self.match_op(OperatorId::Eq) {
            self.match_keyword(KeywordId::From);
        }
        let from = self.operand()?;
        self.match_keyword(KeywordId::To);
        let to = self.operand()?;
        let step = if self.match_keyword(KeywordId::Step) {
            Some(self.operand()?)
        } else {
            None
        };

        self.check_operand(variable, COUNTER_TARGET);
        for bound in [Some(from), Some(to), step].into_iter().flatten() {
            self.check_operand(bound, COUNTER_VALUE.union(D::ARITHMETIC));
        }

        let body = self.body_until(&[KeywordId::EndFor]);
        let end = self.expect_terminator(KeywordId::EndFor);
        Ok(self.tree.alloc(
            NodeKind::For {
                variable,
                from,
                to,
                step,
                body,
            },
            Span::new(start, end),
        ))
    }

    /// `REPEAT [WHILE|UNTIL cond] body [WHILE|UNTIL cond] END-REPEAT`.
    fn repeat_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let head = self.loop_condition()?;
        let body = self.body_until(&[KeywordId::EndRepeat, KeywordId::While, KeywordId::Until]);
        let tail = if head.is_none() { self.loop_condition()? } else { None };
        let end = self.expect_terminator(KeywordId::EndRepeat);
        Ok(self.tree.alloc(NodeKind::Repeat { head, tail, body }, Span::new(start, end)))
    }

    fn loop_condition(&mut self) -> PResult<Option<LoopCondition>> {
        let kind = if self.match_keyword(KeywordId::While) {
            LoopConditionKind::While
        } else if self.match_keyword(KeywordId::Until) {
            LoopConditionKind::Until
        } else {
            return Ok(None);
        };
        let condition = self.condition()?;
        Ok(Some(LoopCondition { kind, condition }))
    }

    /// `ESCAPE TOP [REPOSITION] | BOTTOM [(label.)] [IMMEDIATE] | ROUTINE [IMMEDIATE] | MODULE [IMMEDIATE]`.
    fn escape_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let mut label = None;
        let kind = match self.peek().keyword_id() {
            Some(KeywordId::Top) => {
                self.advance();
                self.match_keyword(KeywordId::Reposition);
                EscapeKind::Top
            }
            Some(KeywordId::Bottom) => {
                self.advance();
                if self.check_punct(PunctuationId::LParen) {
                    if let TokenKind::Label(name) = &self.peek_next().kind {
                        label = Some(name.clone());
                        self.advance();
                        self.advance();
                        self.expect_punct(PunctuationId::RParen, "Expected ')' after the label")?;
                    }
                }
                self.match_keyword(KeywordId::Immediate);
                EscapeKind::Bottom
            }
            Some(KeywordId::Routine) => {
                self.advance();
                self.match_keyword(KeywordId::Immediate);
                EscapeKind::Routine
            }
            Some(KeywordId::Module) => {
                self.advance();
                self.match_keyword(KeywordId::Immediate);
                EscapeKind::Module
            }
            _ => return Err(self.error_here("Expected TOP, BOTTOM, ROUTINE or MODULE after ESCAPE")),
        };
        Ok(self.tree.alloc(NodeKind::Escape { kind, label }, Span::new(start, self.previous_end())))
    }
}
