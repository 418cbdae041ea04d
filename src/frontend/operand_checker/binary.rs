//! Binary checks: the inferred types of two operands must fit together.

use natparse_core::types::compat;
use natparse_syntax::ast::{NodeId, NodeKind};
use natparse_syntax::diagnostics::errors;
use natparse_syntax::operand_check::BinaryMode;

use super::OperandChecker;
use crate::frontend::type_inference;

impl OperandChecker<'_> {
    pub(crate) fn check_binary(&mut self, lhs: NodeId, rhs: NodeId, mode: BinaryMode) {
        // `low:high` values are judged bound by bound
        if let NodeKind::RangedAccess { lower, upper } = self.tree.kind(rhs) {
            for bound in [*lower, *upper].into_iter().flatten() {
                self.check_binary(lhs, bound, mode);
            }
            return;
        }

        if self.format_rejected.contains(&rhs) {
            return;
        }

        let Some(target) = type_inference::infer(self.tree, lhs) else {
            return;
        };
        let Some(found) = type_inference::infer(self.tree, rhs) else {
            return;
        };

        let span = self.tree.span(rhs);
        let diagnostic = match mode {
            BinaryMode::Compatible if !compat::is_compatible(&target, &found) => {
                errors::incompatible_types(&target.to_string(), &found.to_string(), span)
            }
            BinaryMode::SameFamily if !compat::is_same_family(&target, &found) => {
                errors::different_families(&target.to_string(), &found.to_string(), span)
            }
            _ => return,
        };
        self.diagnostics.push(diagnostic);
    }
}
