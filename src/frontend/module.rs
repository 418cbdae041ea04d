//! Module pipeline
//!
//! [`parse_module`] turns one source text into a [`Module`]: lex, parse, then run the deferred operand checks. The
//! result always carries a tree; problems in the source only ever show up as diagnostics.

use std::collections::BTreeMap;
use std::path::Path;

use natparse_core::types::UnknownExtension;
use natparse_core::{DataType, FileKind, VariableScope};
use natparse_syntax::ast::{NodeId, NodeKind, SyntaxTree};
use natparse_syntax::diagnostics::Diagnostic;
use natparse_syntax::lexer;
use natparse_syntax::module_index::{DeclaredVariable, ModuleIndex, ModuleSummary};
use natparse_syntax::parser;
use thiserror::Error;

use super::config::FrontendConfig;
use super::operand_checker;

/// Errors deriving a module identity from a file path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("'{0}' has no file name")]
    MissingName(String),
    #[error(transparent)]
    UnknownExtension(#[from] UnknownExtension),
}

/// Name and kind of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentity {
    /// Upper-case module name, as other modules refer to it.
    pub name: String,
    pub kind: FileKind,
}

impl ModuleIdentity {
    pub fn new(name: impl Into<String>, kind: FileKind) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            kind,
        }
    }

    /// Identity of a source file: the upper-cased file stem and the kind its extension names.
    ///
    /// ## Errors
    /// - [`IdentityError::MissingName`] when the path has no file stem.
    /// - [`IdentityError::UnknownExtension`] when the extension is missing or not a Natural source extension.
    pub fn from_path(path: &Path) -> Result<Self, IdentityError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| IdentityError::MissingName(path.display().to_string()))?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let kind = FileKind::from_extension(extension)?;
        Ok(Self::new(stem, kind))
    }
}

/// A parsed and checked module.
#[derive(Debug, Clone)]
pub struct Module {
    pub identity: ModuleIdentity,
    pub tree: SyntaxTree,
    pub root: NodeId,
    /// Variable declarations per scope, in source order.
    pub declarations: BTreeMap<VariableScope, Vec<NodeId>>,
    pub usings: Vec<NodeId>,
    /// Lexer, parser and checker diagnostics ordered by source position.
    pub diagnostics: Vec<Diagnostic>,
}

impl Module {
    /// Top-level statements.
    pub fn statements(&self) -> &[NodeId] {
        match self.tree.kind(self.root) {
            NodeKind::Module { statements } => statements,
            _ => &[],
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// What other modules see of this one.
    ///
    /// Exports every variable declared in this module (redefinition members excluded, since a `USING` rebuilds the
    /// layout from levels alone) and, for functions, the declared return type.
    pub fn summary(&self) -> ModuleSummary {
        let mut summary = ModuleSummary::new(self.identity.name.clone(), self.identity.kind);
        for (scope, ids) in &self.declarations {
            for id in ids {
                let NodeKind::Variable(decl) = self.tree.kind(*id) else {
                    continue;
                };
                if decl.imported || self.in_redefinition(*id) {
                    continue;
                }
                summary.variables.push(DeclaredVariable {
                    name: decl.name.clone(),
                    level: decl.level,
                    scope: *scope,
                    ty: decl.ty.clone(),
                });
            }
        }
        if self.identity.kind == FileKind::Function {
            summary.return_type = self.return_type();
        }
        summary
    }

    fn in_redefinition(&self, id: NodeId) -> bool {
        self.tree
            .ancestors(id)
            .any(|a| matches!(self.tree.kind(a), NodeKind::Redefine(_)))
    }

    fn return_type(&self) -> Option<DataType> {
        self.statements().iter().find_map(|s| match self.tree.kind(*s) {
            NodeKind::DefineFunction { return_type, .. } => return_type.clone(),
            _ => None,
        })
    }
}

/// Lex, parse and check one module.
///
/// ## Parameters
/// - `source`: the module's source text.
/// - `identity`: module name and kind; the kind decides which statements are legal and whether unresolved
///   variables are reported.
/// - `index`: resolves `USING`, calls and function references. `None` disables module-level unresolved diagnostics.
/// - `config`: reporting switches.
///
/// ## Returns
/// - A [`Module`]; never fails. Diagnostics are sorted by source position (stable, so diagnostics at the same
///   position keep the lexer, parser, checker order) and capped at `config.max_diagnostics`.
#[tracing::instrument(skip_all, fields(module = %identity.name, kind = %identity.kind))]
pub fn parse_module(
    source: &str,
    identity: ModuleIdentity,
    index: Option<&dyn ModuleIndex>,
    config: &FrontendConfig,
) -> Module {
    let lexed = lexer::lex(source);
    let parsed = parser::parse(&lexed.tokens, &config.parse_options(identity.kind), index);
    let checked = operand_checker::check(&parsed.tree, &parsed.checks, config);

    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(parsed.diagnostics);
    diagnostics.extend(checked);
    diagnostics.sort_by_key(|d| d.span.start);
    if let Some(max) = config.max_diagnostics {
        diagnostics.truncate(max);
    }
    tracing::debug!(diagnostics = diagnostics.len(), "module parsed");

    Module {
        identity,
        tree: parsed.tree,
        root: parsed.root,
        declarations: parsed.declarations,
        usings: parsed.usings,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natparse_syntax::diagnostics::DiagnosticKind;
    use std::path::PathBuf;

    fn program(source: &str) -> Module {
        parse_module(
            source,
            ModuleIdentity::new("TESTPROG", FileKind::Program),
            None,
            &FrontendConfig::default(),
        )
    }

    // ========================================
    // ModuleIdentity tests
    // ========================================

    #[test]
    fn test_identity_from_path() {
        let identity = ModuleIdentity::from_path(&PathBuf::from("/src/lib/custlda.nsl")).unwrap();
        assert_eq!(identity, ModuleIdentity::new("CUSTLDA", FileKind::Lda));
        let identity = ModuleIdentity::from_path(Path::new("CALC.NS7")).unwrap();
        assert_eq!(identity.kind, FileKind::Function);
    }

    #[test]
    fn test_identity_rejects_unknown_extension() {
        assert!(matches!(
            ModuleIdentity::from_path(Path::new("readme.md")),
            Err(IdentityError::UnknownExtension(_))
        ));
        assert!(matches!(
            ModuleIdentity::from_path(Path::new("NOEXT")),
            Err(IdentityError::UnknownExtension(_))
        ));
    }

    // ========================================
    // Pipeline tests
    // ========================================

    #[test]
    fn test_clean_module() {
        let module = program("DEFINE DATA LOCAL\n1 #N (N5)\nEND-DEFINE\n#N := 1\nWRITE #N\nEND\n");
        assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
        assert!(!module.has_errors());
        assert_eq!(module.statements().len(), 4);
        assert_eq!(module.declarations[&VariableScope::Local].len(), 1);
    }

    #[test]
    fn test_diagnostics_from_every_stage_are_sorted() {
        let module = program("DEFINE DATA LOCAL\n1 #N (N5)\nEND-DEFINE\n#N := 'abc'\nWRITE #N ; 1\nEND\n");
        let kinds: Vec<_> = module.diagnostics.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiagnosticKind::TypeMismatch));
        assert!(kinds.contains(&DiagnosticKind::LexError));
        assert!(
            module
                .diagnostics
                .windows(2)
                .all(|w| w[0].span.start <= w[1].span.start)
        );
        assert!(module.has_errors());
    }

    #[test]
    fn test_max_diagnostics() {
        let source = "DEFINE DATA LOCAL\n1 #N (N5)\nEND-DEFINE\n#N := 'a'\n#N := 'b'\n#N := 'c'\nEND\n";
        let config = FrontendConfig::new().with_max_diagnostics(Some(2));
        let module = parse_module(source, ModuleIdentity::new("P", FileKind::Program), None, &config);
        assert_eq!(module.diagnostics.len(), 2);
    }

    #[test]
    fn test_summary_of_a_data_area() {
        let source = "DEFINE DATA LOCAL\n1 #GRP\n  2 #A (A10)\n  2 #B (N3/1:5)\n1 #X (A4)\n1 REDEFINE #X\n  2 #X1 (A2)\nEND-DEFINE\n";
        let module = parse_module(
            source,
            ModuleIdentity::new("CUSTLDA", FileKind::Lda),
            None,
            &FrontendConfig::default(),
        );
        let summary = module.summary();
        assert_eq!(summary.name, "CUSTLDA");
        assert_eq!(summary.kind, FileKind::Lda);
        let names: Vec<_> = summary
            .variables
            .iter()
            .map(|v| format!("{} {} {}", v.level, v.name, v.ty))
            .collect();
        insta::assert_debug_snapshot!(names, @r#"
        [
            "1 #GRP ",
            "2 #A A10",
            "2 #B N3/1:5",
            "1 #X A4",
        ]
        "#);
        assert_eq!(summary.return_type, None);
    }

    #[test]
    fn test_summary_of_a_function() {
        let source = "DEFINE FUNCTION CALC\n  RETURNS (N7,2)\n  CALC := 1\nEND-FUNCTION\nEND\n";
        let module = parse_module(
            source,
            ModuleIdentity::new("CALC", FileKind::Function),
            None,
            &FrontendConfig::default(),
        );
        let summary = module.summary();
        assert_eq!(summary.return_type.map(|t| t.to_string()).as_deref(), Some("N7,2"));
    }
}
