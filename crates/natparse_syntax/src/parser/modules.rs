/// Callable units and cross-module references.
///
/// This chunk parses inline subroutines, functions and prototypes, plus the statements that reach other modules
/// (`PERFORM`, `CALLNAT`, `FETCH`, `INCLUDE`). Module names are resolved through the [`ModuleIndex`] when one is
/// available; without an index nothing is reported as unresolved.
impl<'a> Parser<'a> {
    // ========================================================================
    // Definitions
    // ========================================================================

    /// `DEFINE SUBROUTINE name body END-SUBROUTINE`; the current token is `SUBROUTINE`.
    fn define_subroutine(&mut self, start: usize) -> PResult<NodeId> {
        self.advance();
        let name = self
            .current_name()
            .ok_or_else(|| self.error_here("Expected subroutine name"))?;
        self.advance();

        let body = self.body_until(&[KeywordId::EndSubroutine]);
        let end = self.expect_terminator(KeywordId::EndSubroutine);
        let id = self.tree.alloc(
            NodeKind::DefineSubroutine {
                name: name.clone(),
                body,
            },
            Span::new(start, end),
        );
        self.subroutines.entry(name).or_insert(id);
        Ok(id)
    }

    /// `DEFINE FUNCTION name RETURNS [name] (type) body END-FUNCTION`.
    fn define_function(&mut self, start: usize) -> PResult<NodeId> {
        self.advance();
        let name = self
            .current_name()
            .ok_or_else(|| self.error_here("Expected function name"))?;
        self.advance();

        let mut return_type = None;
        if self.match_keyword(KeywordId::Returns) {
            if self.current_name().is_some() {
                // named result variable
                self.advance();
            }
            return_type = Some(self.returns_type()?);
        }

        let outer = self.function_name.replace(name.clone());
        let body = self.body_until(&[KeywordId::EndFunction]);
        self.function_name = outer;
        let end = self.expect_terminator(KeywordId::EndFunction);

        Ok(self.tree.alloc(
            NodeKind::DefineFunction {
                name,
                return_type,
                body,
            },
            Span::new(start, end),
        ))
    }

    /// `DEFINE PROTOTYPE [VARIABLE] name [RETURNS (type)] [DEFINE DATA PARAMETER ... END-DEFINE] END-PROTOTYPE`.
    ///
    /// Parameters are declared in a scope of their own; they are not visible to the rest of the module.
    fn define_prototype(&mut self, start: usize) -> PResult<NodeId> {
        self.advance();
        let is_variable = self.match_keyword(KeywordId::Variable);
        let name = self
            .current_name()
            .ok_or_else(|| self.error_here("Expected prototype name"))?;
        self.advance();

        let return_type = if self.match_keyword(KeywordId::Returns) {
            Some(self.returns_type()?)
        } else {
            None
        };

        let mut parameters = Vec::new();
        if self.check_keyword(KeywordId::Define) && self.peek_next().kind.is_keyword(KeywordId::Data) {
            self.advance();
            self.advance();
            let symbols = std::mem::take(&mut self.symbols);
            let declarations = std::mem::take(&mut self.declarations);
            let usings = std::mem::take(&mut self.usings);
            let unresolved_using = self.unresolved_using;

            let items = self.define_data_body();
            self.expect_terminator(KeywordId::EndDefine);
            parameters = items
                .into_iter()
                .filter(|item| matches!(self.tree.kind(*item), NodeKind::Variable(_)))
                .collect();

            self.symbols = symbols;
            self.declarations = declarations;
            self.usings = usings;
            self.unresolved_using = unresolved_using;
        }
        let end = self.expect_terminator(KeywordId::EndPrototype);

        self.prototypes.insert(name.clone(), return_type.clone());
        let referenced = if is_variable {
            None
        } else {
            self.index.and_then(|index| index.find_module(&name)).map(|m| m.to_ref())
        };

        Ok(self.tree.alloc(
            NodeKind::DefinePrototype(Prototype {
                name,
                is_variable,
                return_type,
                parameters,
                referenced,
            }),
            Span::new(start, end),
        ))
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// `PERFORM name [args]`; the target is bound once the whole module is known.
    fn perform_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let name_span = self.current_span();
        let name = self
            .current_name()
            .ok_or_else(|| self.error_here("Expected subroutine name after PERFORM"))?;
        self.advance();
        let arguments = self.call_arguments()?;
        let id = self.tree.alloc(
            NodeKind::Perform {
                name,
                target: PerformTarget::Unresolved,
                arguments,
            },
            Span::new(start, self.previous_end()),
        );
        self.performs.push((id, name_span));
        Ok(id)
    }

    /// `CALLNAT module [args]`; only literal module names can be resolved.
    fn callnat_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let (module, referenced) = self.module_operand()?;
        let arguments = self.call_arguments()?;
        Ok(self.tree.alloc(
            NodeKind::Callnat {
                module,
                arguments,
                referenced,
            },
            Span::new(start, self.previous_end()),
        ))
    }

    /// `FETCH [RETURN|REPEAT] module [args]`.
    fn fetch_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let mode = if self.match_keyword(KeywordId::Return) {
            FetchMode::Return
        } else if self.match_keyword(KeywordId::Repeat) {
            FetchMode::Repeat
        } else {
            FetchMode::Plain
        };
        let (module, referenced) = self.module_operand()?;
        let arguments = self.call_arguments()?;
        Ok(self.tree.alloc(
            NodeKind::Fetch {
                mode,
                module,
                arguments,
                referenced,
            },
            Span::new(start, self.previous_end()),
        ))
    }

    /// `INCLUDE copycode ['substitution' ...]`.
    fn include_statement(&mut self) -> PResult<NodeId> {
        let start = self.advance().span.start;
        let name_span = self.current_span();
        let name = self
            .current_name()
            .ok_or_else(|| self.error_here("Expected copycode name after INCLUDE"))?;
        self.advance();
        let referenced = self.resolve_module(&name, name_span);
        let arguments = self.call_arguments()?;
        Ok(self.tree.alloc(
            NodeKind::Include {
                name,
                arguments,
                referenced,
            },
            Span::new(start, self.previous_end()),
        ))
    }

    /// The module operand of CALLNAT/FETCH.
    fn module_operand(&mut self) -> PResult<(NodeId, Option<ModuleRef>)> {
        let span = self.current_span();
        let module = self.unary()?;
        let referenced = match self.tree.kind(module) {
            NodeKind::Literal(Literal {
                kind: LiteralKind::String,
                value,
            }) => {
                let name = value.trim().to_ascii_uppercase();
                self.resolve_module(&name, span)
            }
            _ => None,
        };
        Ok((module, referenced))
    }

    /// Operands passed to a called module; spacing and attribute lists between them are ignored.
    fn call_arguments(&mut self) -> PResult<Vec<NodeId>> {
        let mut arguments = Vec::new();
        loop {
            if self.skip_spacing() || self.skip_attribute_list() {
                continue;
            }
            if !self.at_operand_start() {
                break;
            }
            arguments.push(self.unary()?);
        }
        Ok(arguments)
    }
}
