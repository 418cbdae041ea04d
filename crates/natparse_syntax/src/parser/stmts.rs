/// Statement dispatch and the data manipulation statements.
///
/// This chunk owns `statement()` (keyword dispatch), block bodies, assignments (`ASSIGN`, `COMPUTE`, bare `:=`),
/// `MOVE`, `RESET`, the arithmetic verbs, `COMPRESS`, the output statements, array resizing and the one-word
/// statements.
///
/// Every operand position with constraints queues an [`OperandCheck`] here rather than validating on the spot.

/// Receiving field of an assignment-like statement.
const ASSIGN_TARGET: D = D::SCALAR
    .union(D::ARRAY)
    .union(D::MODIFIABLE_SYSTEM_VARIABLE)
    .union(D::ALL_FORMATS);

/// Formats the arithmetic verbs compute in.
const ARITHMETIC_FORMATS: D = D::NUMERIC_COUNTERS
    .union(D::FORMAT_FLOAT)
    .union(D::FORMAT_DATE)
    .union(D::FORMAT_TIME);

const ARITHMETIC_TARGET: D = D::SCALAR
    .union(D::ARRAY)
    .union(D::MODIFIABLE_SYSTEM_VARIABLE)
    .union(ARITHMETIC_FORMATS);

const ARITHMETIC_OPERAND: D = D::CONSTANT
    .union(D::SCALAR)
    .union(D::ARRAY)
    .union(D::SYSTEM_VARIABLE)
    .union(D::ARITHMETIC)
    .union(ARITHMETIC_FORMATS);

/// Counts, positions and bounds.
const COUNTER_VALUE: D = D::CONSTANT
    .union(D::SCALAR)
    .union(D::SYSTEM_VARIABLE)
    .union(D::NUMERIC_COUNTERS);

/// Fields receiving a count or position.
const COUNTER_TARGET: D = D::SCALAR.union(D::NUMERIC_COUNTERS);

impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse one statement; leading labels have already been skipped.
    fn statement(&mut self) -> PResult<NodeId> {
        let label = self.label.take();
        let Some(keyword) = self.peek().keyword_id() else {
            if self.at_assignment_target() {
                return self.assignment(AssignmentKind::Bare);
            }
            return Err(self.error_here("Expected statement"));
        };

        match keyword {
            KeywordId::Define => self.define_statement(),
            KeywordId::Perform => self.perform_statement(),
            KeywordId::Callnat => self.callnat_statement(),
            KeywordId::Fetch => self.fetch_statement(),
            KeywordId::Include => self.include_statement(),
            KeywordId::Examine => self.examine_statement(),
            KeywordId::Parse => self.parse_statement(),
            KeywordId::Decide => self.decide_statement(),
            KeywordId::If => self.if_statement(),
            KeywordId::For => self.for_statement(),
            KeywordId::Repeat => self.repeat_statement(),
            KeywordId::Escape => self.escape_statement(),
            KeywordId::Resize | KeywordId::Expand | KeywordId::Reduce => self.array_statement(keyword),
            KeywordId::Assign => self.assignment(AssignmentKind::Assign),
            KeywordId::Compute => self.assignment(AssignmentKind::Compute),
            KeywordId::Move => self.move_statement(),
            KeywordId::Reset => self.reset_statement(),
            KeywordId::Add => self.arithmetic_statement(ArithmeticVerb::Add),
            KeywordId::Subtract => self.arithmetic_statement(ArithmeticVerb::Subtract),
            KeywordId::Multiply => self.arithmetic_statement(ArithmeticVerb::Multiply),
            KeywordId::Divide => self.arithmetic_statement(ArithmeticVerb::Divide),
            KeywordId::Compress => self.compress_statement(),
            KeywordId::Write => self.output_statement(OutputKind::Write),
            KeywordId::Display => self.output_statement(OutputKind::Display),
            KeywordId::Print => self.output_statement(OutputKind::Print),
            KeywordId::Set => self.set_statement(label),
            KeywordId::Ignore | KeywordId::End | KeywordId::Stop => self.simple_statement(keyword),
            _ if self.at_assignment_target() => self.assignment(AssignmentKind::Bare),
            _ => Err(self.error_here("Expected statement")),
        }
    }

    /// Parse statements until one of `stops` (or a stop of an enclosing block) is reached.
    ///
    /// The stop keyword is not consumed. Errors inside the body are recorded and skipped.
    fn body_until(&mut self, stops: &[KeywordId]) -> Vec<NodeId> {
        let saved = self.block_stops.len();
        self.block_stops.extend_from_slice(stops);

        let mut body = Vec::new();
        loop {
            self.skip_labels();
            if self.is_at_end() || self.peek().keyword_id().is_some_and(|k| self.block_stops.contains(&k)) {
                break;
            }
            match self.statement() {
                Ok(stmt) => body.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        self.block_stops.truncate(saved);
        body
    }

    /// `DEFINE DATA | SUBROUTINE | PROTOTYPE | FUNCTION`.
    fn define_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        match self.peek().keyword_id() {
            Some(KeywordId::Data) => self.define_data(start),
            Some(KeywordId::Subroutine) => self.define_subroutine(start),
            Some(KeywordId::Prototype) => self.define_prototype(start),
            Some(KeywordId::Function) => self.define_function(start),
            _ => Err(self.error_here("Expected DATA, SUBROUTINE, PROTOTYPE or FUNCTION after DEFINE")),
        }
    }

    fn simple_statement(&mut self, keyword: KeywordId) -> PResult<NodeId> {
        let span = self.advance().span;
        let kind = match keyword {
            KeywordId::Ignore => NodeKind::Ignore,
            KeywordId::Stop => NodeKind::Stop,
            _ => NodeKind::End,
        };
        Ok(self.tree.alloc(kind, span))
    }

    /// `SET TIME`; the statement label is what `*TIMD` refers to.
    fn set_statement(&mut self, label: Option<String>) -> PResult<NodeId> {
        let start = self.advance().span.start;
        self.expect_keyword(KeywordId::Time, "Expected TIME after SET")?;
        Ok(self.tree.alloc(NodeKind::SetTime { label }, Span::new(start, self.previous_end())))
    }

    // ========================================================================
    // Assignments
    // ========================================================================

    /// `ASSIGN [ROUNDED] t = v`, `COMPUTE [ROUNDED] t := v` and the bare `t := v`.
    fn assignment(&mut self, kind: AssignmentKind) -> PResult<NodeId> {
        let start = self.current_span().start;
        let mut rounded = false;
        if kind != AssignmentKind::Bare {
            self.advance();
            rounded = self.match_keyword(KeywordId::Rounded);
        }

        let target = self.primary()?;
        if !self.match_op(OperatorId::Assign) && !self.match_op(OperatorId::Eq) {
            return Err(self.error_here("Expected ':=' after the assignment target"));
        }
        let value = self.operand()?;

        self.check_operand(target, ASSIGN_TARGET);
        self.check_binary(target, value, BinaryMode::Compatible);

        Ok(self.tree.alloc(
            NodeKind::Assignment {
                kind,
                rounded,
                target,
                value,
            },
            Span::new(start, self.previous_end()),
        ))
    }

    /// `MOVE [ROUNDED] [ALL] [BY NAME|POSITION] source TO target...`.
    fn move_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let rounded = self.match_keyword(KeywordId::Rounded);
        self.match_keyword(KeywordId::All);
        let mut by_name = false;
        if self.match_keyword(KeywordId::By) {
            if !self.match_keyword(KeywordId::Name) {
                self.expect_keyword(KeywordId::Position, "Expected NAME or POSITION after MOVE BY")?;
            }
            by_name = true;
        }

        let source = self.operand()?;
        self.skip_attribute_list();
        self.expect_keyword(KeywordId::To, "Expected TO in MOVE")?;

        let mut targets = Vec::new();
        loop {
            let target = self.primary()?;
            self.skip_attribute_list();
            if by_name {
                self.check_operand(target, ASSIGN_TARGET.union(D::GROUP));
            } else {
                self.check_operand(target, ASSIGN_TARGET);
                self.check_binary(target, source, BinaryMode::Compatible);
            }
            targets.push(target);
            if !self.at_operand_start() {
                break;
            }
        }

        Ok(self.tree.alloc(
            NodeKind::Move {
                rounded,
                source,
                targets,
            },
            Span::new(start, self.previous_end()),
        ))
    }

    /// `RESET [INITIAL] target...`.
    fn reset_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let initial = self.match_keyword(KeywordId::Initial);
        let mut targets = Vec::new();
        loop {
            let target = self.primary()?;
            self.check_operand(target, ASSIGN_TARGET.union(D::GROUP));
            targets.push(target);
            if !self.at_operand_start() {
                break;
            }
        }
        Ok(self.tree.alloc(
            NodeKind::Reset { initial, targets },
            Span::new(start, self.previous_end()),
        ))
    }

    /// `ADD`, `SUBTRACT`, `MULTIPLY` and `DIVIDE`.
    ///
    /// - `ADD [ROUNDED] op... TO target [GIVING result]`
    /// - `SUBTRACT [ROUNDED] op... FROM target [GIVING result]`
    /// - `MULTIPLY [ROUNDED] target BY op [GIVING result]`
    /// - `DIVIDE [ROUNDED] op INTO target [GIVING result] [REMAINDER rest]`
    fn arithmetic_statement(&mut self, verb: ArithmeticVerb) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let rounded = self.match_keyword(KeywordId::Rounded);

        let (operands, target) = match verb {
            ArithmeticVerb::Add | ArithmeticVerb::Subtract => {
                let (separator, msg) = if verb == ArithmeticVerb::Add {
                    (KeywordId::To, "Expected TO in ADD")
                } else {
                    (KeywordId::From, "Expected FROM in SUBTRACT")
                };
                let mut operands = Vec::new();
                loop {
                    operands.push(self.unary()?);
                    if self.check_keyword(separator) || !self.at_operand_start() {
                        break;
                    }
                }
                self.expect_keyword(separator, msg)?;
                (operands, self.primary()?)
            }
            ArithmeticVerb::Multiply => {
                let target = self.primary()?;
                self.expect_keyword(KeywordId::By, "Expected BY in MULTIPLY")?;
                (vec![self.unary()?], target)
            }
            ArithmeticVerb::Divide => {
                let divisor = self.unary()?;
                self.expect_keyword(KeywordId::Into, "Expected INTO in DIVIDE")?;
                (vec![divisor], self.primary()?)
            }
        };

        let giving = if self.match_keyword(KeywordId::Giving) {
            Some(self.primary()?)
        } else {
            None
        };
        let remainder = if verb == ArithmeticVerb::Divide && self.match_keyword(KeywordId::Remainder) {
            Some(self.primary()?)
        } else {
            None
        };

        let mode = match verb {
            ArithmeticVerb::Add | ArithmeticVerb::Subtract => BinaryMode::Compatible,
            ArithmeticVerb::Multiply | ArithmeticVerb::Divide => BinaryMode::SameFamily,
        };
        let receiver = giving.unwrap_or(target);
        if giving.is_some() {
            self.check_operand(target, ARITHMETIC_OPERAND);
        }
        self.check_operand(receiver, ARITHMETIC_TARGET);
        for operand in &operands {
            self.check_operand(*operand, ARITHMETIC_OPERAND);
            self.check_binary(receiver, *operand, mode);
        }
        if let Some(rest) = remainder {
            self.check_operand(rest, ARITHMETIC_TARGET);
        }

        Ok(self.tree.alloc(
            NodeKind::ArithmeticStatement(ArithmeticStatement {
                verb,
                rounded,
                operands,
                target,
                giving,
                remainder,
            }),
            Span::new(start, self.previous_end()),
        ))
    }

    /// `COMPRESS [NUMERIC] [FULL] op... INTO target [LEAVING [NO] [SPACE]] [WITH [ALL] DELIMITERS [op]]`.
    fn compress_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let numeric = self.match_keyword(KeywordId::Numeric);
        let full = self.match_keyword(KeywordId::Full);

        let mut operands = Vec::new();
        loop {
            if self.skip_spacing() || self.skip_attribute_list() {
                continue;
            }
            if self.check_keyword(KeywordId::Into) || !self.at_operand_start() {
                break;
            }
            operands.push(self.unary()?);
        }
        if operands.is_empty() {
            return Err(self.error_here("Expected operand after COMPRESS"));
        }
        self.expect_keyword(KeywordId::Into, "Expected INTO in COMPRESS")?;
        let target = self.primary()?;
        self.check_operand(
            target,
            D::SCALAR.union(D::MODIFIABLE_SYSTEM_VARIABLE).union(D::CHARACTER),
        );

        let mut leaving_no_space = false;
        let mut delimiters = None;
        loop {
            if self.match_keyword(KeywordId::Leaving) {
                leaving_no_space = self.match_keyword(KeywordId::No);
                self.match_keyword(KeywordId::Space);
            } else if self.check_keyword(KeywordId::With) {
                self.advance();
                self.match_keyword(KeywordId::All);
                self.expect_keyword(KeywordId::Delimiter, "Expected DELIMITERS after WITH")?;
                let delimiter = if self.at_operand_start() {
                    let delimiter = self.unary()?;
                    self.check_operand(delimiter, D::CONSTANT.union(D::SCALAR).union(D::CHARACTER));
                    Some(delimiter)
                } else {
                    None
                };
                delimiters = Some(delimiter);
            } else {
                break;
            }
        }

        Ok(self.tree.alloc(
            NodeKind::Compress(Compress {
                numeric,
                full,
                operands,
                target,
                leaving_no_space,
                delimiters,
            }),
            Span::new(start, self.previous_end()),
        ))
    }

    /// `WRITE`/`DISPLAY`/`PRINT [(report)] [NOTITLE] item...`.
    ///
    /// Line advances (`/`), spacing (`5X`), attribute lists and repetition factors are skipped; only the
    /// operands end up in the tree.
    fn output_statement(&mut self, kind: OutputKind) -> PResult<NodeId> {
        let start = self.advance().span.start;
        if self.check_punct(PunctuationId::LParen)
            && !self.at_attribute_list()
            && self.peek_at(2).kind.is_punctuation(PunctuationId::RParen)
        {
            self.skip_parenthesized();
        }
        let notitle = self.match_keyword(KeywordId::Notitle);

        let mut operands = Vec::new();
        loop {
            if self.match_op(OperatorId::Slash) || self.skip_spacing() {
                continue;
            }
            if self.check_punct(PunctuationId::LParen) {
                self.skip_parenthesized();
                continue;
            }
            if !self.at_operand_start() {
                break;
            }
            operands.push(self.unary()?);
        }

        Ok(self.tree.alloc(
            NodeKind::Output {
                kind,
                notitle,
                operands,
            },
            Span::new(start, self.previous_end()),
        ))
    }

    // ========================================================================
    // Dynamic arrays
    // ========================================================================

    /// `RESIZE|EXPAND|REDUCE [AND RESET] ARRAY array TO (dims)|0 [GIVING result]`.
    fn array_statement(&mut self, keyword: KeywordId) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let and_reset = if self.match_keyword(KeywordId::And) {
            self.expect_keyword(KeywordId::Reset, "Expected RESET after AND")?;
            true
        } else {
            false
        };
        self.expect_keyword(KeywordId::Array, "Expected ARRAY")?;
        let array = self.primary()?;
        self.expect_keyword(KeywordId::To, "Expected TO")?;

        let mut dimensions = Vec::new();
        if matches!(&self.peek().kind, TokenKind::Integer(n) if n == "0") {
            self.advance();
        } else {
            self.expect_punct(PunctuationId::LParen, "Expected '(' or 0 after TO")?;
            loop {
                dimensions.push(self.resize_dimension()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' to close the dimensions")?;
        }

        let giving = if self.match_keyword(KeywordId::Giving) {
            let giving = self.primary()?;
            self.check_operand(giving, COUNTER_TARGET);
            Some(giving)
        } else {
            None
        };

        self.check_operand(array, D::ARRAY.union(D::ALL_FORMATS));
        for bound in dimensions.iter().flat_map(|d| [d.lower, d.upper]).flatten() {
            self.check_operand(bound, COUNTER_VALUE);
        }

        let resize = ArrayResize {
            and_reset,
            array,
            dimensions,
            giving,
        };
        let kind = match keyword {
            KeywordId::Expand => NodeKind::ExpandArray(resize),
            KeywordId::Reduce => NodeKind::ReduceArray(resize),
            _ => NodeKind::ResizeArray(resize),
        };
        Ok(self.tree.alloc(kind, Span::new(start, self.previous_end())))
    }

    /// `lower:upper` or a lone upper bound; `*` keeps a bound unchanged.
    fn resize_dimension(&mut self) -> PResult<ResizeDimension> {
        let first = self.resize_bound()?;
        if self.match_punct(PunctuationId::Colon) {
            let upper = self.resize_bound()?;
            Ok(ResizeDimension { lower: first, upper })
        } else {
            Ok(ResizeDimension {
                lower: None,
                upper: first,
            })
        }
    }

    fn resize_bound(&mut self) -> PResult<Option<NodeId>> {
        if self.match_op(OperatorId::Star) {
            Ok(None)
        } else {
            Ok(Some(self.operand()?))
        }
    }
}
