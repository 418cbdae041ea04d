//! Operand checker for parsed Natural modules.
//!
//! Runs the [`OperandCheck`] queue the parser collected, once the whole tree exists. Each queued request is judged on
//! its own; the checker never stops early, so one run reports every problem in the module.
//!
//! ## Notes
//!
//! - **Definition checks** compare an operand against an [`OperandDefinitions`] set: first its inferred format, then
//!   its shape (constant, scalar, array, group, system variable, arithmetic expression).
//! - **Binary checks** compare the inferred types of two operands, either for implicit convertibility (assignment) or
//!   for membership in the same format family. An operand whose format a definition check already rejected is not
//!   reported again.
//! - **Redefinition size checks** make sure the members of a `REDEFINE` fit into the redefined variable.
//! - Unknown types (see [`type_inference::infer`](super::type_inference::infer)) skip format checks instead of
//!   failing them.
//!
//! ## Examples
//!
//! ```rust
//! use natparse::frontend::{FrontendConfig, lexer, operand_checker, parser};
//!
//! let source = "DEFINE DATA LOCAL\n1 #N (N5)\nEND-DEFINE\n#N := 'abc'\nEND\n";
//! let lexed = lexer::lex(source);
//! let parsed = parser::parse(&lexed.tokens, &parser::ParseOptions::default(), None);
//! let diagnostics = operand_checker::check(&parsed.tree, &parsed.checks, &FrontendConfig::default());
//! assert_eq!(diagnostics.len(), 1);
//! ```
//!
//! [`OperandDefinitions`]: natparse_core::lang::operand_definitions::OperandDefinitions

mod binary;
mod definition;
mod redefine;

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use crate::frontend::config::FrontendConfig;
use natparse_syntax::ast::{NodeId, SyntaxTree};
use natparse_syntax::diagnostics::Diagnostic;
use natparse_syntax::operand_check::OperandCheck;

/// Operand checker state.
///
/// Borrows the tree for the duration of one module's check and accumulates diagnostics in queue order.
pub struct OperandChecker<'a> {
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) config: &'a FrontendConfig,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Operands that already failed a format check.
    pub(crate) format_rejected: HashSet<NodeId>,
}

impl<'a> OperandChecker<'a> {
    pub fn new(tree: &'a SyntaxTree, config: &'a FrontendConfig) -> Self {
        Self {
            tree,
            config,
            diagnostics: Vec::new(),
            format_rejected: HashSet::new(),
        }
    }

    /// Run every queued check and return the diagnostics, in queue order.
    pub fn run(mut self, checks: &[OperandCheck]) -> Vec<Diagnostic> {
        for check in checks {
            match check {
                OperandCheck::Definition { operand, allowed } => self.check_definition(*operand, *allowed),
                OperandCheck::Binary { lhs, rhs, mode } => self.check_binary(*lhs, *rhs, *mode),
                OperandCheck::RedefinitionSize { redefinition } => {
                    if self.config.check_redefinition_sizes {
                        self.check_redefinition_size(*redefinition);
                    }
                }
            }
        }
        self.diagnostics
    }
}

/// Check a module's operand queue.
///
/// ## Parameters
/// - `tree`: the parsed tree the queue refers to.
/// - `checks`: the queue collected by the parser ([`ParsedModule::checks`]).
/// - `config`: front end switches; only `check_redefinition_sizes` is consulted here.
///
/// [`ParsedModule::checks`]: natparse_syntax::parser::ParsedModule::checks
#[tracing::instrument(skip_all, fields(queue_len = checks.len()))]
pub fn check(tree: &SyntaxTree, checks: &[OperandCheck], config: &FrontendConfig) -> Vec<Diagnostic> {
    let diagnostics = OperandChecker::new(tree, config).run(checks);
    tracing::debug!(found = diagnostics.len(), "operand checks done");
    diagnostics
}
