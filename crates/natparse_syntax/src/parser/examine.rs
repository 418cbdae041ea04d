/// `EXAMINE` and `PARSE JSON/XML`.
///
/// EXAMINE has the richest clause grammar of the language:
///
/// ```text
/// EXAMINE [DIRECTION FORWARD|BACKWARD|op] [FULL [VALUE [OF]]] operand
///         [STARTING [FROM] POSITION op] [ENDING [AT] POSITION op]
///   ( [AND] TRANSLATE INTO UPPER|LOWER [CASE] | [AND] TRANSLATE USING [INVERTED] table
///   | [FOR] ( [CHARPOSITION op] [CHARLENGTH op] | [FULL [VALUE [OF]]] [PATTERN] pattern [WITH DELIMITERS [op]] )
///     [ [AND] REPLACE [FIRST] [WITH] [FULL [VALUE [OF]]] op | [AND] DELETE [FIRST] ]
///     { [GIVING] NUMBER|POSITION|LENGTH [IN] op | [GIVING] INDEX [IN] op... | GIVING [IN] op } )
/// ```
const EXAMINE_SOURCE: D = D::SCALAR.union(D::ARRAY).union(D::CHARACTER);
const CHARACTER_VALUE: D = D::CONSTANT
    .union(D::SCALAR)
    .union(D::SYSTEM_VARIABLE)
    .union(D::CHARACTER);

impl<'a> Parser<'a> {
    // ========================================================================
    // EXAMINE
    // ========================================================================

    fn examine_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;

        let direction = if self.match_keyword(KeywordId::Direction) {
            if self.match_keyword(KeywordId::Forward) {
                ExamineDirection::Forward
            } else if self.match_keyword(KeywordId::Backward) {
                ExamineDirection::Backward
            } else {
                ExamineDirection::Dynamic(self.primary()?)
            }
        } else {
            ExamineDirection::Forward
        };

        let full = self.match_full_value();
        let operand = self.primary()?;
        self.check_operand(operand, EXAMINE_SOURCE);

        let mut start_position = None;
        let mut end_position = None;
        if self.match_keyword(KeywordId::Starting) {
            self.match_keyword(KeywordId::From);
            self.expect_keyword(KeywordId::Position, "Expected POSITION after STARTING")?;
            start_position = Some(self.counter_value()?);
        }
        if self.match_keyword(KeywordId::Ending) {
            self.match_keyword(KeywordId::At);
            self.expect_keyword(KeywordId::Position, "Expected POSITION after ENDING")?;
            end_position = Some(self.counter_value()?);
        }

        let mut examine = Examine {
            direction,
            full,
            operand,
            start_position,
            end_position,
            pattern: None,
            pattern_full: false,
            is_pattern: false,
            delimiters: None,
            char_position: None,
            char_length: None,
            action: None,
            givings: ExamineGivings::default(),
        };

        if let Some(mode) = self.examine_translate()? {
            examine.action = Some(ExamineAction::Translate(mode));
            return Ok(self.tree.alloc(NodeKind::Examine(examine), Span::new(start, self.previous_end())));
        }

        self.match_keyword(KeywordId::For);
        if self.match_keyword(KeywordId::Charposition) {
            examine.char_position = Some(self.counter_value()?);
        }
        if self.match_keyword(KeywordId::Charlength) {
            examine.char_length = Some(self.counter_value()?);
        }
        if examine.char_position.is_none() && examine.char_length.is_none() {
            examine.pattern_full = self.match_full_value();
            examine.is_pattern = self.match_keyword(KeywordId::Pattern);
            let pattern = self.operand()?;
            self.check_operand(pattern, CHARACTER_VALUE);
            examine.pattern = Some(pattern);
            if self.check_keyword(KeywordId::With) && self.peek_next().kind.is_keyword(KeywordId::Delimiter) {
                self.advance();
                self.advance();
                examine.delimiters = Some(self.examine_delimiter()?);
            }
        }

        examine.action = self.examine_modification()?;
        examine.givings = self.examine_givings()?;

        Ok(self.tree.alloc(NodeKind::Examine(examine), Span::new(start, self.previous_end())))
    }

    /// `[FULL [VALUE [OF]]]`.
    fn match_full_value(&mut self) -> bool {
        if !self.match_keyword(KeywordId::Full) {
            return false;
        }
        if self.match_keyword(KeywordId::Value) {
            self.match_keyword(KeywordId::Of);
        }
        true
    }

    fn counter_value(&mut self) -> PResult<NodeId> {
        let value = self.unary()?;
        self.check_operand(value, COUNTER_VALUE);
        Ok(value)
    }

    /// Delimiter operand after `WITH DELIMITERS`, unless the next token starts another clause.
    fn examine_delimiter(&mut self) -> PResult<Option<NodeId>> {
        let starts_clause = matches!(
            self.peek().keyword_id(),
            Some(KeywordId::And | KeywordId::Replace | KeywordId::Delete | KeywordId::Giving)
        );
        if starts_clause || !self.at_operand_start() {
            return Ok(None);
        }
        let delimiter = self.unary()?;
        self.check_operand(delimiter, CHARACTER_VALUE);
        Ok(Some(delimiter))
    }

    /// `[AND] TRANSLATE INTO UPPER|LOWER [CASE]` or `[AND] TRANSLATE USING [INVERTED] table`.
    fn examine_translate(&mut self) -> PResult<Option<TranslateMode>> {
        let and_translate =
            self.check_keyword(KeywordId::And) && self.peek_next().kind.is_keyword(KeywordId::Translate);
        if !and_translate && !self.check_keyword(KeywordId::Translate) {
            return Ok(None);
        }
        if and_translate {
            self.advance();
        }
        self.advance(); // TRANSLATE

        if self.match_keyword(KeywordId::Into) {
            let mode = if self.match_keyword(KeywordId::Upper) {
                TranslateMode::Upper
            } else if self.match_keyword(KeywordId::Lower) {
                TranslateMode::Lower
            } else {
                return Err(self.error_here("Expected UPPER or LOWER after TRANSLATE INTO"));
            };
            self.match_keyword(KeywordId::Case);
            return Ok(Some(mode));
        }

        self.expect_keyword(KeywordId::Using, "Expected INTO or USING after TRANSLATE")?;
        let inverted = self.match_keyword(KeywordId::Inverted);
        let table = self.primary()?;
        self.check_operand(table, D::SCALAR.union(D::ARRAY).union(D::CHARACTER));
        Ok(Some(TranslateMode::Using { inverted, table }))
    }

    /// `[AND] REPLACE [FIRST] [WITH] [FULL [VALUE [OF]]] op` or `[AND] DELETE [FIRST]`.
    fn examine_modification(&mut self) -> PResult<Option<ExamineAction>> {
        let next_is_modification = |kind: &TokenKind| {
            kind.is_keyword(KeywordId::Replace) || kind.is_keyword(KeywordId::Delete)
        };
        if self.check_keyword(KeywordId::And) && next_is_modification(&self.peek_next().kind) {
            self.advance();
        }

        if self.match_keyword(KeywordId::Replace) {
            let first = self.match_keyword(KeywordId::First);
            self.match_keyword(KeywordId::With);
            let full = self.match_full_value();
            let with = self.operand()?;
            self.check_operand(with, CHARACTER_VALUE);
            return Ok(Some(ExamineAction::Replace { first, full, with }));
        }
        if self.match_keyword(KeywordId::Delete) {
            let first = self.match_keyword(KeywordId::First);
            return Ok(Some(ExamineAction::Delete { first }));
        }
        Ok(None)
    }

    fn examine_givings(&mut self) -> PResult<ExamineGivings> {
        let mut givings = ExamineGivings::default();
        loop {
            let giving = self.match_keyword(KeywordId::Giving);
            match self.peek().keyword_id() {
                Some(KeywordId::Number) => {
                    self.advance();
                    givings.number = Some(self.giving_target()?);
                }
                Some(KeywordId::Position) => {
                    self.advance();
                    givings.position = Some(self.giving_target()?);
                }
                Some(KeywordId::Length) => {
                    self.advance();
                    givings.length = Some(self.giving_target()?);
                }
                Some(KeywordId::Index) => {
                    self.advance();
                    self.match_keyword(KeywordId::In);
                    loop {
                        let target = self.primary()?;
                        self.check_operand(target, COUNTER_TARGET);
                        givings.index.push(target);
                        if !self.at_operand_start() || self.at_line_start() {
                            break;
                        }
                    }
                }
                _ if giving => givings.number = Some(self.giving_target()?),
                _ => break,
            }
        }
        Ok(givings)
    }

    /// `[IN] op` receiving a count or position.
    fn giving_target(&mut self) -> PResult<NodeId> {
        self.match_keyword(KeywordId::In);
        let target = self.primary()?;
        self.check_operand(target, COUNTER_TARGET);
        Ok(target)
    }

    // ========================================================================
    // PARSE JSON / XML
    // ========================================================================

    /// `PARSE JSON|XML source INTO {PATH p | NAME n | VALUE v | GIVING g | SUBCODE s} body END-PARSE`.
    fn parse_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let is_json = if self.match_keyword(KeywordId::Json) {
            true
        } else if self.match_keyword(KeywordId::Xml) {
            false
        } else {
            return Err(self.error_here("Expected JSON or XML after PARSE"));
        };

        let source = self.operand()?;
        self.check_operand(source, CHARACTER_VALUE);
        self.expect_keyword(KeywordId::Into, "Expected INTO in PARSE")?;

        let mut statement = ParseStatement {
            source,
            path: None,
            name: None,
            value: None,
            giving: None,
            subcode: None,
            body: Vec::new(),
        };
        let character_target = D::SCALAR.union(D::CHARACTER);
        loop {
            match self.peek().keyword_id() {
                Some(KeywordId::Path) => {
                    self.advance();
                    let path = self.primary()?;
                    self.check_operand(path, character_target);
                    statement.path = Some(path);
                    if self.match_keyword(KeywordId::With) {
                        // WITH SEPARATOR op
                        self.advance();
                        self.unary()?;
                    }
                }
                Some(KeywordId::Name) => {
                    self.advance();
                    let name = self.primary()?;
                    self.check_operand(name, character_target);
                    statement.name = Some(name);
                }
                Some(KeywordId::Value) => {
                    self.advance();
                    let value = self.primary()?;
                    self.check_operand(value, character_target);
                    statement.value = Some(value);
                }
                Some(KeywordId::Giving) => {
                    self.advance();
                    let giving = self.primary()?;
                    self.check_operand(giving, COUNTER_TARGET);
                    statement.giving = Some(giving);
                }
                Some(KeywordId::Subcode) => {
                    self.advance();
                    let subcode = self.primary()?;
                    self.check_operand(subcode, COUNTER_TARGET);
                    statement.subcode = Some(subcode);
                }
                _ => break,
            }
        }

        statement.body = self.body_until(&[KeywordId::EndParse]);
        let end = self.expect_terminator(KeywordId::EndParse);
        let kind = if is_json {
            NodeKind::ParseJson(statement)
        } else {
            NodeKind::ParseXml(statement)
        };
        Ok(self.tree.alloc(kind, Span::new(start, end)))
    }
}
