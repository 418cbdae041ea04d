//! Deferred operand checks.
//!
//! While parsing, every operand position with constraints queues an [`OperandCheck`] instead of validating on the
//! spot. The queue is handed to the operand checker once the whole tree exists, because some rules need context
//! that is only complete after parsing (the parent statement, resolved declarations).

use natparse_core::lang::operand_definitions::OperandDefinitions;

use crate::ast::NodeId;

/// How the two sides of a binary check must relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryMode {
    /// The right side must be implicitly convertible into the left (assignment).
    Compatible,
    /// Both sides must belong to the same format family.
    SameFamily,
}

/// One queued request.
#[derive(Debug, Clone, PartialEq)]
pub enum OperandCheck {
    Definition {
        operand: NodeId,
        allowed: OperandDefinitions,
    },
    Binary {
        lhs: NodeId,
        rhs: NodeId,
        mode: BinaryMode,
    },
    /// Members of a `Redefine` node must fit into the redefined variable.
    RedefinitionSize {
        redefinition: NodeId,
    },
}
