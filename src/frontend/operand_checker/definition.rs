//! Definition checks: one operand against what its position admits.

use natparse_core::lang::builtins;
use natparse_core::lang::operand_definitions::OperandDefinitions as D;
use natparse_syntax::ast::{NodeId, NodeKind, Span};
use natparse_syntax::diagnostics::{Diagnostic, errors};

use super::OperandChecker;
use crate::frontend::type_inference;

/// What an operand is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Structure {
    Scalar,
    Array,
    Group,
    SystemVariable { modifiable: bool },
    Arithmetic,
}

/// Structural facts of an operand. Constness is independent of the structure: a `CONST` array is both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shape {
    pub structure: Structure,
    pub constant: bool,
}

impl Shape {
    fn of(structure: Structure) -> Self {
        Self {
            structure,
            constant: false,
        }
    }

    fn constant(structure: Structure) -> Self {
        Self {
            structure,
            constant: true,
        }
    }
}

impl OperandChecker<'_> {
    pub(crate) fn check_definition(&mut self, operand: NodeId, allowed: D) {
        let span = self.tree.span(operand);

        let rejected = type_inference::infer(self.tree, operand).filter(|ty| !allowed.accepts_format(ty.format));
        if let Some(ty) = rejected {
            self.diagnostics.push(errors::format_not_allowed(
                ty.format.shortform(),
                &allowed.allowed_formats_text(),
                span,
            ));
            self.format_rejected.insert(operand);
        }

        let Some(shape) = self.shape(operand) else {
            return;
        };
        let structures = allowed.allowed_structures_text();
        // the argument of RESIZE/EXPAND/REDUCE ARRAY is the whole array, which a scalar position also takes
        let whole_array = shape.structure == Structure::Array
            && allowed.contains(D::SCALAR)
            && self.addresses_whole_array(operand);
        let structure = structure_diagnostic(shape.structure, allowed, &structures, span).filter(|_| !whole_array);
        if let Some(diagnostic) = structure {
            self.diagnostics.push(diagnostic);
        }
        if shape.constant && !allowed.contains(D::CONSTANT) {
            self.diagnostics.push(errors::constant_not_allowed(&structures, span));
        }
    }

    /// Shape of `operand`, or `None` when it can't be judged (unresolved references, labels, conditions).
    ///
    /// A reference to an array without an index, or with a ranged index, addresses the array; this includes the
    /// argument of `RESIZE`/`EXPAND`/`REDUCE ARRAY`.
    pub(crate) fn shape(&self, operand: NodeId) -> Option<Shape> {
        match self.tree.kind(operand) {
            NodeKind::Literal(_) | NodeKind::KeywordOperand { .. } => Some(Shape::constant(Structure::Scalar)),
            NodeKind::Arithmetic { .. } | NodeKind::Negation { .. } => Some(Shape::of(Structure::Arithmetic)),
            NodeKind::SystemVariable { id } => Some(Shape::of(Structure::SystemVariable {
                modifiable: builtins::lookup(*id).is_some_and(|b| b.is_modifiable()),
            })),
            NodeKind::SystemFunctionCall { .. } => Some(Shape::of(Structure::SystemVariable { modifiable: false })),
            NodeKind::Substring { .. } | NodeKind::FunctionCall { .. } => Some(Shape::of(Structure::Scalar)),
            NodeKind::VariableReference(reference) => {
                let NodeKind::Variable(decl) = self.tree.kind(reference.declaration?) else {
                    return None;
                };
                let ranged = reference
                    .indices
                    .iter()
                    .any(|i| matches!(self.tree.kind(*i), NodeKind::RangedAccess { .. }));
                let structure = if decl.is_group {
                    Structure::Group
                } else if decl.is_array() && (reference.indices.is_empty() || ranged) {
                    Structure::Array
                } else {
                    Structure::Scalar
                };
                Some(Shape {
                    structure,
                    constant: decl.is_constant(),
                })
            }
            _ => None,
        }
    }

    fn addresses_whole_array(&self, operand: NodeId) -> bool {
        let Some(parent) = self.tree.parent(operand) else {
            return false;
        };
        match self.tree.kind(parent) {
            NodeKind::ResizeArray(resize) | NodeKind::ExpandArray(resize) | NodeKind::ReduceArray(resize) => {
                resize.array == operand
            }
            _ => false,
        }
    }
}

fn structure_diagnostic(structure: Structure, allowed: D, structures: &str, span: Span) -> Option<Diagnostic> {
    let diagnostic = match structure {
        Structure::Scalar if !allowed.contains(D::SCALAR) => errors::scalar_not_allowed(structures, span),
        Structure::Array if !allowed.contains(D::ARRAY) => errors::array_not_allowed(structures, span),
        Structure::Group if !allowed.contains(D::GROUP) => errors::group_not_allowed(structures, span),
        Structure::Arithmetic if !allowed.contains(D::ARITHMETIC) => errors::arithmetic_not_allowed(structures, span),
        Structure::SystemVariable { modifiable } => {
            if allowed.contains(D::SYSTEM_VARIABLE) {
                return None;
            }
            // a modifiable system variable stands in for a scalar field
            if modifiable && allowed.intersects(D::MODIFIABLE_SYSTEM_VARIABLE | D::SCALAR) {
                return None;
            }
            if modifiable {
                errors::scalar_not_allowed(structures, span)
            } else {
                errors::unmodifiable_system_variable(structures, span)
            }
        }
        _ => return None,
    };
    Some(diagnostic)
}
