//! REDEFINE size checks.
//!
//! Members of a redefinition overlay the storage of the redefined variable, so together they must not take more
//! bytes than it has. Sizes that aren't statically known (dynamic or unbound members, views) or that overflow skip the
//! check.

use natparse_core::types::occurrences_size;
use natparse_syntax::ast::{NodeId, NodeKind};
use natparse_syntax::diagnostics::errors;

use super::OperandChecker;

impl OperandChecker<'_> {
    pub(crate) fn check_redefinition_size(&mut self, redefinition: NodeId) {
        let NodeKind::Redefine(redefine) = self.tree.kind(redefinition) else {
            return;
        };
        let Some(available) = redefine.target_decl.and_then(|target| self.declared_size(target)) else {
            return;
        };
        let required = redefine
            .members
            .iter()
            .try_fold(0u64, |sum, member| sum.checked_add(self.member_size(*member)?));
        let Some(required) = required else {
            return;
        };

        if required > available {
            tracing::debug!(target = %redefine.target, available, required, "redefinition too large");
            self.diagnostics.push(errors::redefinition_too_large(
                &redefine.target,
                available,
                required,
                self.tree.span(redefinition),
            ));
        }
    }

    fn member_size(&self, member: NodeId) -> Option<u64> {
        match self.tree.kind(member) {
            NodeKind::Filler { bytes } => Some(u64::from(*bytes)),
            NodeKind::Variable(_) => self.declared_size(member),
            _ => None,
        }
    }

    /// Storage of a declared variable in bytes; a group takes the sum of its members per occurrence.
    pub(crate) fn declared_size(&self, declaration: NodeId) -> Option<u64> {
        let NodeKind::Variable(decl) = self.tree.kind(declaration) else {
            return None;
        };
        if !decl.is_group {
            return decl.ty.byte_size();
        }
        let element = decl
            .members
            .iter()
            .try_fold(0u64, |sum, member| sum.checked_add(self.declared_size(*member)?))?;
        occurrences_size(element, &decl.ty.dimensions)
    }
}
