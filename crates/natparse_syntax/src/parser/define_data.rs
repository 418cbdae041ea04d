/// `DEFINE DATA` parsing.
///
/// Declarations are read as a flat list of level-numbered lines first and turned into a tree afterwards, because a
/// line's role (group or field, redefinition target) only becomes clear once the following lines are known.
///
/// ## Notes
/// - Groups are declarations without a format; their dimensions still live on their [`DataType`].
/// - A `REDEFINE` binds to the closest preceding declaration of the same name on the same level.
/// - `USING` imports the variables of a resolved data area as synthetic declarations of the using scope.

/// One level-numbered line of a data block.
#[derive(Debug, Clone)]
struct DataLine {
    level: u32,
    span: Span,
    kind: DataLineKind,
}

#[derive(Debug, Clone)]
enum DataLineKind {
    Variable(VariableLine),
    Redefine { target: String },
    Filler { bytes: u32 },
}

#[derive(Debug, Clone)]
struct VariableLine {
    name: String,
    spec: Option<TypeSpec>,
    constant: bool,
    initial: Vec<NodeId>,
    view_of: Option<String>,
}

/// A declaration whose node is not allocated yet, because redefinitions may still follow it.
#[derive(Debug)]
struct PendingVariable<'l> {
    decl: &'l VariableLine,
    level: u32,
    span: Span,
    path: Vec<String>,
    members: Vec<NodeId>,
    redefinitions: Vec<NodeId>,
}

#[derive(Debug)]
enum PendingItem<'l> {
    Variable(PendingVariable<'l>),
    Node(NodeId),
}

impl<'a> Parser<'a> {
    // ========================================================================
    // DEFINE DATA
    // ========================================================================

    /// Parse `DEFINE DATA ... END-DEFINE`; the current token is `DATA`.
    fn define_data(&mut self, start: usize) -> PResult<NodeId> {
        self.advance(); // DATA
        let items = self.define_data_body();
        let end = self.expect_terminator(KeywordId::EndDefine);
        Ok(self.tree.alloc(NodeKind::DefineData { items }, Span::new(start, end)))
    }

    /// Parse scope blocks up to (not including) `END-DEFINE`.
    ///
    /// Broken lines are reported and skipped; the block itself always completes.
    fn define_data_body(&mut self) -> Vec<NodeId> {
        let mut items = Vec::new();
        let mut scope = None;
        loop {
            if let Some(next) = self.scope_keyword() {
                self.advance();
                scope = Some(next);
                if self.check_keyword(KeywordId::Using) {
                    match self.using_clause(next) {
                        Ok(id) => items.push(id),
                        Err(e) => {
                            self.errors.push(e);
                            self.skip_to_next_level();
                        }
                    }
                }
                continue;
            }
            if self.check_keyword(KeywordId::EndDefine) || self.is_at_end() {
                break;
            }
            let at_level = matches!(self.peek().kind, TokenKind::Integer(_));
            match scope {
                Some(scope) if at_level => {
                    let lines = self.data_lines();
                    items.extend(self.build_declarations(&lines, scope, false));
                }
                _ => {
                    let error = self.error_here("Expected GLOBAL, PARAMETER, LOCAL, INDEPENDENT or END-DEFINE");
                    self.errors.push(error);
                    self.advance();
                    self.skip_to_next_level();
                }
            }
        }
        items
    }

    fn scope_keyword(&self) -> Option<VariableScope> {
        match self.peek().keyword_id()? {
            KeywordId::Global => Some(VariableScope::Global),
            KeywordId::Parameter => Some(VariableScope::Parameter),
            KeywordId::Local => Some(VariableScope::Local),
            KeywordId::Independent => Some(VariableScope::Independent),
            _ => None,
        }
    }

    /// `USING name [WITH block]`.
    fn using_clause(&mut self, scope: VariableScope) -> PResult<NodeId> {
        let start = self.advance().span.start; // USING
        let token = self.peek().clone();
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            _ => return Err(self.error_here("Expected data area name after USING")),
        };
        self.advance();
        if self.match_keyword(KeywordId::With) {
            // GDA block name
            self.advance();
        }
        let span = Span::new(start, self.previous_end());

        let summary = self.index.and_then(|index| index.find_module(&name));
        let (referenced, variables) = match summary {
            Some(summary) => {
                let lines: Vec<DataLine> = summary.variables.iter().map(|v| imported_line(v, span)).collect();
                let variables = self.build_declarations(&lines, scope, true);
                (Some(summary.to_ref()), variables)
            }
            None => {
                self.unresolved_using = true;
                if self.index.is_some() {
                    tracing::debug!(module = %name, "unresolved USING");
                    self.errors.push(errors::unresolved_module(&name, token.span));
                }
                (None, Vec::new())
            }
        };

        let id = self.tree.alloc(
            NodeKind::Using(Using {
                scope,
                module: name,
                referenced,
                variables,
            }),
            span,
        );
        self.usings.push(id);
        Ok(id)
    }

    // ========================================================================
    // Lines
    // ========================================================================

    /// Read level-numbered lines until the next scope keyword or `END-DEFINE`.
    fn data_lines(&mut self) -> Vec<DataLine> {
        let mut lines = Vec::new();
        while let TokenKind::Integer(level) = &self.peek().kind {
            let start = self.current_span().start;
            let level = level.parse::<u32>().map_err(|_| self.error_here("Expected level number"));
            self.advance();
            match level.and_then(|level| self.data_line(level, start)) {
                Ok(line) => lines.push(line),
                Err(e) => {
                    self.errors.push(e);
                    self.skip_to_next_level();
                }
            }
        }
        lines
    }

    /// Skip the rest of a broken declaration line.
    fn skip_to_next_level(&mut self) {
        while !self.is_at_end()
            && !(self.at_line_start() && matches!(self.peek().kind, TokenKind::Integer(_)))
            && self.scope_keyword().is_none()
            && !self.check_keyword(KeywordId::EndDefine)
        {
            self.advance();
        }
    }

    fn data_line(&mut self, level: u32, start: usize) -> PResult<DataLine> {
        if self.match_keyword(KeywordId::Redefine) {
            let target = self
                .current_name()
                .ok_or_else(|| self.error_here("Expected variable name after REDEFINE"))?;
            self.advance();
            return Ok(DataLine {
                level,
                span: Span::new(start, self.previous_end()),
                kind: DataLineKind::Redefine { target },
            });
        }

        if self.match_keyword(KeywordId::Filler) {
            let bytes = match &self.peek().kind {
                TokenKind::Integer(n) => n.parse::<u32>().ok(),
                _ => None,
            }
            .ok_or_else(|| self.error_here("Expected filler length such as 5X"))?;
            self.advance();
            if !matches!(&self.peek().kind, TokenKind::Ident(x) if x == "X") {
                return Err(self.error_here("Expected 'X' after filler length"));
            }
            self.advance();
            return Ok(DataLine {
                level,
                span: Span::new(start, self.previous_end()),
                kind: DataLineKind::Filler { bytes },
            });
        }

        let name = self
            .current_name()
            .ok_or_else(|| self.error_here("Expected variable name after level number"))?;
        self.advance();

        let mut view_of = None;
        let mut spec = None;
        if self.match_keyword(KeywordId::View) {
            self.match_keyword(KeywordId::Of);
            let ddm = self
                .current_name()
                .ok_or_else(|| self.error_here("Expected DDM name after VIEW OF"))?;
            self.advance();
            view_of = Some(ddm);
        } else if self.check_punct(PunctuationId::LParen) && !self.at_attribute_list() {
            spec = Some(self.type_spec()?);
        }

        let mut constant = false;
        let mut initial = Vec::new();
        loop {
            if self.skip_attribute_list() {
                continue;
            }
            if self.match_keyword(KeywordId::Init) {
                initial = self.initial_values()?;
            } else if self.check_keyword(KeywordId::Const) {
                let const_span = self.advance().span;
                constant = true;
                if self.check_op(OperatorId::Lt) {
                    initial = self.initial_values()?;
                } else {
                    self.errors.push(errors::constant_without_value(&name, const_span));
                }
            } else {
                break;
            }
        }

        if constant {
            if let [only] = initial.as_slice() {
                if let NodeKind::Literal(Literal {
                    kind: LiteralKind::Integer,
                    value,
                }) = self.tree.kind(*only)
                {
                    self.constants.insert(name.clone(), value.clone());
                }
            }
        }

        Ok(DataLine {
            level,
            span: Span::new(start, self.previous_end()),
            kind: DataLineKind::Variable(VariableLine {
                name,
                spec,
                constant,
                initial,
                view_of,
            }),
        })
    }

    /// `[ALL] [(index)] <v1, v2, ...>` after `INIT`/`CONST`.
    fn initial_values(&mut self) -> PResult<Vec<NodeId>> {
        self.match_keyword(KeywordId::All);
        if self.check_punct(PunctuationId::LParen) {
            self.skip_parenthesized();
        }
        self.expect_op(OperatorId::Lt, "Expected '<' to start the initial values")?;
        let mut values = Vec::new();
        loop {
            values.push(self.unary()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_op(OperatorId::Gt, "Expected '>' to close the initial values")?;
        Ok(values)
    }

    // ========================================================================
    // Tree building
    // ========================================================================

    /// Turn flat lines into `Variable`/`Redefine`/`Filler` nodes and register the declarations.
    fn build_declarations(&mut self, lines: &[DataLine], scope: VariableScope, imported: bool) -> Vec<NodeId> {
        let mut pos = 0;
        let mut items = Vec::new();
        while pos < lines.len() {
            let level = lines[pos].level;
            items.extend(self.build_level(lines, &mut pos, level.saturating_sub(1), scope, &[], imported));
        }
        for item in &items {
            self.record_declarations(*item, scope);
        }
        items
    }

    /// Build all siblings nested deeper than `parent_level`, starting at `lines[*pos]`.
    fn build_level(
        &mut self,
        lines: &[DataLine],
        pos: &mut usize,
        parent_level: u32,
        scope: VariableScope,
        groups: &[String],
        imported: bool,
    ) -> Vec<NodeId> {
        let mut pending: Vec<PendingItem<'_>> = Vec::new();

        while *pos < lines.len() && lines[*pos].level > parent_level {
            let line = &lines[*pos];
            *pos += 1;

            match &line.kind {
                DataLineKind::Variable(decl) => {
                    let mut path = groups.to_vec();
                    path.push(decl.name.clone());
                    let members = self.build_level(lines, pos, line.level, scope, &path, imported);
                    pending.push(PendingItem::Variable(PendingVariable {
                        decl,
                        level: line.level,
                        span: line.span,
                        path,
                        members,
                        redefinitions: Vec::new(),
                    }));
                }
                DataLineKind::Redefine { target } => {
                    let mut path = groups.to_vec();
                    path.push(target.clone());
                    let members = self.build_level(lines, pos, line.level, scope, &path, imported);
                    let redefine = self.tree.alloc(
                        NodeKind::Redefine(Redefine {
                            target: target.clone(),
                            target_decl: None,
                            members,
                        }),
                        line.span,
                    );
                    let owner = pending.iter_mut().rev().find_map(|item| match item {
                        PendingItem::Variable(var) if var.level == line.level && var.decl.name == *target => Some(var),
                        _ => None,
                    });
                    match owner {
                        Some(var) => var.redefinitions.push(redefine),
                        None => {
                            self.errors.push(errors::redefine_without_target(target, line.span));
                            pending.push(PendingItem::Node(redefine));
                        }
                    }
                }
                DataLineKind::Filler { bytes } => {
                    let filler = self.tree.alloc(NodeKind::Filler { bytes: *bytes }, line.span);
                    pending.push(PendingItem::Node(filler));
                }
            }
        }

        pending
            .into_iter()
            .map(|item| match item {
                PendingItem::Node(id) => id,
                PendingItem::Variable(var) => self.alloc_variable(var, scope, imported),
            })
            .collect()
    }

    fn alloc_variable(&mut self, var: PendingVariable<'_>, scope: VariableScope, imported: bool) -> NodeId {
        let decl = var.decl;
        let (mut ty, is_group) = match &decl.spec {
            Some(TypeSpec::Typed(ty)) => (ty.clone(), false),
            Some(TypeSpec::Dimensions(dims)) => (DataType::none().with_dimensions(dims.clone()), true),
            None => (DataType::none(), decl.view_of.is_none() && !var.members.is_empty()),
        };
        if decl.constant {
            ty = ty.into_constant();
        }

        let redefinitions = var.redefinitions.clone();
        let id = self.tree.alloc(
            NodeKind::Variable(VariableDecl {
                level: var.level,
                scope,
                name: decl.name.clone(),
                qualified_name: var.path.join("."),
                ty,
                is_group,
                members: var.members,
                redefinitions: var.redefinitions,
                initial: decl.initial.clone(),
                imported,
                view_of: decl.view_of.clone(),
            }),
            var.span,
        );

        for redefinition in redefinitions {
            if let NodeKind::Redefine(redefine) = self.tree.kind_mut(redefinition) {
                redefine.target_decl = Some(id);
            }
            self.checks.push(OperandCheck::RedefinitionSize { redefinition });
        }

        self.symbols.declare(&decl.name, scope, id);
        if let Some((_, groups)) = var.path.split_last() {
            for group in groups {
                self.symbols.declare(&format!("{group}.{}", decl.name), scope, id);
            }
            if groups.len() > 1 {
                self.symbols.declare(&var.path.join("."), scope, id);
            }
        }
        id
    }

    /// Append `id` and every variable below it to the per-scope declaration list, in source order.
    fn record_declarations(&mut self, id: NodeId, scope: VariableScope) {
        let nodes = std::iter::once(id).chain(self.tree.descendants(id));
        let variables: Vec<NodeId> = nodes
            .filter(|n| matches!(self.tree.kind(*n), NodeKind::Variable(_)))
            .collect();
        self.declarations.entry(scope).or_default().extend(variables);
    }
}

/// Data line for a variable exported by another module.
fn imported_line(variable: &DeclaredVariable, span: Span) -> DataLine {
    let spec = if variable.ty.is_none() && !variable.ty.is_array() {
        None
    } else if variable.ty.is_none() {
        Some(TypeSpec::Dimensions(variable.ty.dimensions.clone()))
    } else {
        Some(TypeSpec::Typed(variable.ty.clone()))
    };
    DataLine {
        level: variable.level,
        span,
        kind: DataLineKind::Variable(VariableLine {
            name: variable.name.clone(),
            spec,
            constant: variable.ty.constant,
            initial: Vec::new(),
            view_of: None,
        }),
    }
}
