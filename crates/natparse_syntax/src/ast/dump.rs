//! Indented text rendering of a tree, used by `--parse` and by snapshot tests.

use std::fmt::Write;

use natparse_core::lang::{keywords, operators, system_vars};

use super::{NodeId, NodeKind, SyntaxTree};
use super::nodes::*;

/// Render the subtree rooted at `root`, one node per line, children indented by two spaces.
///
/// ## Examples
/// ```rust
/// use natparse_syntax::ast::{self, Literal, LiteralKind, NodeKind, Span, SyntaxTree};
///
/// let mut tree = SyntaxTree::new();
/// let one = tree.alloc(NodeKind::Literal(Literal::new(LiteralKind::Integer, "1")), Span::new(0, 1));
/// let neg = tree.alloc(NodeKind::Negation { operand: one }, Span::new(0, 2));
/// assert_eq!(ast::dump(&tree, neg), "Negation\n  Literal Integer 1\n");
/// ```
pub fn dump(tree: &SyntaxTree, root: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, root, 0, &mut out);
    out
}

fn write_node(tree: &SyntaxTree, id: NodeId, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{:indent$}{}", "", label(tree.kind(id)), indent = depth * 2);
    for child in tree.children(id) {
        write_node(tree, child, depth + 1, out);
    }
}

fn label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Module { .. } => "Module".into(),
        NodeKind::DefineData { .. } => "DefineData".into(),
        NodeKind::Using(using) => {
            let state = if using.referenced.is_some() { "" } else { " (unresolved)" };
            format!("Using {} {}{}", using.scope, using.module, state)
        }
        NodeKind::Variable(decl) => {
            let mut text = format!("Variable {} {} {}", decl.scope, decl.level, decl.name);
            if decl.is_group {
                text.push_str(" group");
                if decl.ty.is_array() {
                    let dims: Vec<String> = decl.ty.dimensions.iter().map(|d| d.to_string()).collect();
                    let _ = write!(text, " /{}", dims.join(","));
                }
            } else if let Some(ddm) = &decl.view_of {
                let _ = write!(text, " view of {ddm}");
            } else {
                let _ = write!(text, " {}", decl.ty.declaration());
            }
            text
        }
        NodeKind::Redefine(redefine) => format!("Redefine {}", redefine.target),
        NodeKind::Filler { bytes } => format!("Filler {bytes}X"),
        NodeKind::Examine(examine) => {
            let mut text = String::from("Examine");
            match examine.direction {
                ExamineDirection::Forward => {}
                ExamineDirection::Backward => text.push_str(" backward"),
                ExamineDirection::Dynamic(_) => text.push_str(" direction"),
            }
            if examine.full {
                text.push_str(" full");
            }
            if examine.is_pattern {
                text.push_str(" pattern");
            }
            if examine.delimiters.is_some() {
                text.push_str(" delimiters");
            }
            match examine.action {
                Some(ExamineAction::Replace { first, .. }) => text.push_str(if first { " replace-first" } else { " replace" }),
                Some(ExamineAction::Delete { first }) => text.push_str(if first { " delete-first" } else { " delete" }),
                Some(ExamineAction::Translate(TranslateMode::Upper)) => text.push_str(" translate-upper"),
                Some(ExamineAction::Translate(TranslateMode::Lower)) => text.push_str(" translate-lower"),
                Some(ExamineAction::Translate(TranslateMode::Using { inverted, .. })) => {
                    text.push_str(if inverted { " translate-inverted" } else { " translate-using" })
                }
                None => {}
            }
            text
        }
        NodeKind::ParseJson(_) => "ParseJson".into(),
        NodeKind::ParseXml(_) => "ParseXml".into(),
        NodeKind::DecideOn { mode, .. } => format!("DecideOn {mode:?}"),
        NodeKind::DecideFor { mode, .. } => format!("DecideFor {mode:?}"),
        NodeKind::DecideBranch { kind, .. } => match kind {
            BranchKind::Value(_) => "Value".into(),
            BranchKind::When(_) => "When".into(),
            BranchKind::Any => "Any".into(),
            BranchKind::All => "All".into(),
            BranchKind::None => "None".into(),
        },
        NodeKind::If { .. } => "If".into(),
        NodeKind::For { .. } => "For".into(),
        NodeKind::Repeat { head, tail, .. } => {
            let cond = head.or(*tail).map(|c| format!(" {:?}", c.kind)).unwrap_or_default();
            format!("Repeat{cond}")
        }
        NodeKind::ResizeArray(r) => resize_label("ResizeArray", r),
        NodeKind::ExpandArray(r) => resize_label("ExpandArray", r),
        NodeKind::ReduceArray(r) => resize_label("ReduceArray", r),
        NodeKind::DefinePrototype(p) => {
            let variable = if p.is_variable { " variable" } else { "" };
            let returns = p
                .return_type
                .as_ref()
                .map(|t| format!(" returns {}", t.declaration()))
                .unwrap_or_default();
            format!("DefinePrototype{variable} {}{returns}", p.name)
        }
        NodeKind::DefineFunction { name, return_type, .. } => {
            let returns = return_type
                .as_ref()
                .map(|t| format!(" returns {}", t.declaration()))
                .unwrap_or_default();
            format!("DefineFunction {name}{returns}")
        }
        NodeKind::DefineSubroutine { name, .. } => format!("DefineSubroutine {name}"),
        NodeKind::Perform { name, target, .. } => {
            let target = match target {
                PerformTarget::Internal(_) => "internal",
                PerformTarget::External(_) => "external",
                PerformTarget::Unresolved => "unresolved",
            };
            format!("Perform {name} ({target})")
        }
        NodeKind::Callnat { .. } => "Callnat".into(),
        NodeKind::Fetch { mode, .. } => format!("Fetch {mode:?}"),
        NodeKind::Include { name, .. } => format!("Include {name}"),
        NodeKind::Assignment { kind, rounded, .. } => {
            format!("Assignment {kind:?}{}", if *rounded { " rounded" } else { "" })
        }
        NodeKind::Move { .. } => "Move".into(),
        NodeKind::Reset { initial, .. } => format!("Reset{}", if *initial { " initial" } else { "" }),
        NodeKind::ArithmeticStatement(stmt) => format!("{:?}", stmt.verb),
        NodeKind::Output { kind, notitle, .. } => {
            format!("{kind:?}{}", if *notitle { " notitle" } else { "" })
        }
        NodeKind::Compress(_) => "Compress".into(),
        NodeKind::Escape { kind, label } => match label {
            Some(l) => format!("Escape {kind:?} ({l}.)"),
            None => format!("Escape {kind:?}"),
        },
        NodeKind::Ignore => "Ignore".into(),
        NodeKind::SetTime { .. } => "SetTime".into(),
        NodeKind::End => "End".into(),
        NodeKind::Stop => "Stop".into(),
        NodeKind::VariableReference(r) => {
            let state = if r.declaration.is_some() { "" } else { " (unresolved)" };
            format!("Ref {}{state}", r.name)
        }
        NodeKind::Literal(lit) => format!("Literal {:?} {}", lit.kind, lit.value),
        NodeKind::Arithmetic { op, .. } => format!("Arithmetic {}", op.symbol()),
        NodeKind::Negation { .. } => "Negation".into(),
        NodeKind::Substring { .. } => "Substring".into(),
        NodeKind::SystemVariable { id } => format!("SystemVariable {}", system_vars::as_str(*id)),
        NodeKind::SystemFunctionCall { id, .. } => format!("SystemFunction {}", system_vars::as_str(*id)),
        NodeKind::FunctionCall { name, .. } => format!("FunctionCall {name}"),
        NodeKind::RangedAccess { lower, upper } => {
            let bound = |b: &Option<NodeId>| if b.is_some() { "_" } else { "*" };
            format!("Range {}:{}", bound(lower), bound(upper))
        }
        NodeKind::LabelReference { label } => format!("Label {label}"),
        NodeKind::KeywordOperand { keyword } => format!("Keyword {}", keywords::as_str(*keyword)),
        NodeKind::Comparison { op, .. } => format!("Comparison {}", operators::as_str(*op)),
        NodeKind::Logical { op, .. } => format!("Logical {op:?}"),
        NodeKind::Not { .. } => "Not".into(),
    }
}

fn resize_label(name: &str, resize: &ArrayResize) -> String {
    let reset = if resize.and_reset { " and-reset" } else { "" };
    if resize.dimensions.is_empty() {
        format!("{name}{reset} to 0")
    } else {
        format!("{name}{reset} dims={}", resize.dimensions.len())
    }
}
