/// Parser core types and entrypoint.
///
/// This chunk defines [`ParseOptions`], the [`ParsedModule`] result, the [`Parser`] state and its top-level
/// `parse()` loop, plus the symbol table used to bind variable references while parsing.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// What the parser reports, as opposed to what it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Kind of the module being parsed; copycode never reports unresolved variables.
    pub file_kind: FileKind,
    pub report_unresolved_variables: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            file_kind: FileKind::Program,
            report_unresolved_variables: true,
        }
    }
}

impl ParseOptions {
    pub fn new(file_kind: FileKind) -> Self {
        Self {
            file_kind,
            ..Self::default()
        }
    }

    pub fn with_unresolved_variables(mut self, report: bool) -> Self {
        self.report_unresolved_variables = report;
        self
    }
}

/// Everything one parse produces.
///
/// ## Notes
/// - `checks` is the deferred operand check queue; it is consumed by the operand checker.
/// - `diagnostics` only holds parser diagnostics (syntax errors and unresolved references).
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub tree: SyntaxTree,
    pub root: NodeId,
    /// Variable declarations per scope in source order, nested members and imported variables included.
    pub declarations: BTreeMap<VariableScope, Vec<NodeId>>,
    pub usings: Vec<NodeId>,
    pub checks: Vec<OperandCheck>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedModule {
    /// Top-level statements of the module.
    pub fn statements(&self) -> &[NodeId] {
        match self.tree.kind(self.root) {
            NodeKind::Module { statements } => statements,
            _ => &[],
        }
    }
}

type PResult<T> = Result<T, Diagnostic>;

/// Declared names, each possibly declared in several scopes.
#[derive(Debug, Default)]
struct SymbolTable {
    by_name: HashMap<String, Vec<(VariableScope, NodeId)>>,
}

impl SymbolTable {
    fn declare(&mut self, name: &str, scope: VariableScope, id: NodeId) {
        self.by_name.entry(name.to_string()).or_default().push((scope, id));
    }

    /// Highest priority scope wins; within a scope the first declaration wins.
    fn resolve(&self, name: &str) -> Option<NodeId> {
        self.by_name
            .get(name)?
            .iter()
            .min_by_key(|(scope, _)| *scope)
            .map(|(_, id)| *id)
    }

    fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass. Forward references only exist for `PERFORM` (subroutines may be defined after
///   their first use); those are fixed up once the whole module is parsed.
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    tree: SyntaxTree,
    options: ParseOptions,
    index: Option<&'a dyn ModuleIndex>,
    symbols: SymbolTable,
    /// Integer constants usable as array bounds in later type specifications.
    constants: HashMap<String, String>,
    declarations: BTreeMap<VariableScope, Vec<NodeId>>,
    usings: Vec<NodeId>,
    /// A `USING` could not be resolved, so undeclared names are expected.
    unresolved_using: bool,
    subroutines: HashMap<String, NodeId>,
    performs: Vec<(NodeId, Span)>,
    /// Return types of prototypes declared in this module.
    prototypes: HashMap<String, Option<DataType>>,
    /// Name of the function being defined; it doubles as the result variable.
    function_name: Option<String>,
    /// Label in front of the statement being parsed.
    label: Option<String>,
    /// Keywords that close one of the enclosing blocks.
    block_stops: Vec<KeywordId>,
    checks: Vec<OperandCheck>,
    errors: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `natparse_syntax::lexer`, ending with `Eof`.
    /// - `options`: Module kind and reporting switches.
    /// - `index`: Project index used to resolve other modules, if any.
    pub fn new(tokens: &'a [Token], options: ParseOptions, index: Option<&'a dyn ModuleIndex>) -> Self {
        Self {
            tokens,
            pos: 0,
            tree: SyntaxTree::new(),
            options,
            index,
            symbols: SymbolTable::default(),
            constants: HashMap::new(),
            declarations: BTreeMap::new(),
            usings: Vec::new(),
            unresolved_using: false,
            subroutines: HashMap::new(),
            performs: Vec::new(),
            prototypes: HashMap::new(),
            function_name: None,
            label: None,
            block_stops: Vec::new(),
            checks: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a [`ParsedModule`].
    ///
    /// The parser recovers after every statement-level error, so the result always carries a tree; problems are
    /// reported in [`ParsedModule::diagnostics`].
    pub fn parse(mut self) -> ParsedModule {
        let mut statements = Vec::new();

        loop {
            self.skip_labels();
            if self.is_at_end() {
                break;
            }
            match self.statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        self.resolve_performs();

        let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        let root = self.tree.alloc(NodeKind::Module { statements }, Span::new(0, end));

        ParsedModule {
            tree: self.tree,
            root,
            declarations: self.declarations,
            usings: self.usings,
            checks: self.checks,
            diagnostics: self.errors,
        }
    }
}
