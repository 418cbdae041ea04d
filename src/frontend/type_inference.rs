//! Type inference for operands.
//!
//! [`infer`] computes the [`DataType`] an operand evaluates to by structural recursion over its node kind. It never
//! reports anything: when a type can't be determined (unresolved reference, group, label) it returns `None`, and
//! callers must treat that as "skip the check", never as a mismatch.
//!
//! ## Notes
//! - Literals get their natural type: `'abc'` is `A3`, `12` is `N2`, `1.25` is `N1,2`, `H'0A0B'` is `B2`.
//! - Arithmetic takes the widest operand type ([`compat::widest`]); mixing families is the checker's business.
//! - Conditions are logical (`L`).
//!
//! ## Examples
//! ```rust
//! use natparse::frontend::type_inference::infer;
//! use natparse_syntax::ast::{Literal, LiteralKind, NodeKind, Span, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let lit = tree.alloc(NodeKind::Literal(Literal::new(LiteralKind::String, "abc")), Span::new(0, 5));
//! assert_eq!(infer(&tree, lit).map(|t| t.to_string()).as_deref(), Some("A3"));
//! ```

use natparse_core::lang::builtins;
use natparse_core::lang::keywords::KeywordId;
use natparse_core::types::compat;
use natparse_core::{DataFormat, DataType};
use natparse_syntax::ast::{Literal, LiteralKind, NodeId, NodeKind, SyntaxTree};

/// Infer the type of `node`.
///
/// ## Returns
/// - `None` when the operand's type is unknown; never a type of the untyped format.
pub fn infer(tree: &SyntaxTree, node: NodeId) -> Option<DataType> {
    let ty = match tree.kind(node) {
        NodeKind::Literal(literal) => Some(literal_type(literal)),
        NodeKind::VariableReference(reference) => {
            let declaration = reference.declaration?;
            let NodeKind::Variable(decl) = tree.kind(declaration) else {
                return None;
            };
            let addresses_elements = reference.indices.is_empty()
                || reference
                    .indices
                    .iter()
                    .any(|i| matches!(tree.kind(*i), NodeKind::RangedAccess { .. }));
            if addresses_elements {
                Some(decl.ty.clone())
            } else {
                Some(decl.ty.element_type())
            }
        }
        NodeKind::Arithmetic { lhs, rhs, .. } => {
            let (lhs, rhs) = (infer(tree, *lhs)?, infer(tree, *rhs)?);
            Some(compat::widest(&lhs, &rhs))
        }
        NodeKind::Negation { operand } => infer(tree, *operand),
        NodeKind::Substring { length, .. } => {
            let known = length.and_then(|l| match tree.kind(l) {
                NodeKind::Literal(Literal {
                    kind: LiteralKind::Integer,
                    value,
                }) => value.parse::<u32>().ok(),
                _ => None,
            });
            Some(match known {
                Some(n) => DataType::new(DataFormat::Alphanumeric, f64::from(n)),
                None => DataType::dynamic(DataFormat::Alphanumeric),
            })
        }
        NodeKind::SystemVariable { id } | NodeKind::SystemFunctionCall { id, .. } => {
            builtins::lookup(*id).map(|b| b.result_type().clone())
        }
        NodeKind::FunctionCall { referenced, .. } => referenced.as_ref()?.return_type.clone(),
        NodeKind::KeywordOperand {
            keyword: KeywordId::Space,
        } => Some(DataType::new(DataFormat::Alphanumeric, 1.0)),
        NodeKind::Comparison { .. } | NodeKind::Logical { .. } | NodeKind::Not { .. } => {
            Some(DataType::new(DataFormat::Logic, 1.0))
        }
        _ => None,
    };
    ty.filter(|t| !t.is_none())
}

/// Natural type of a literal.
pub fn literal_type(literal: &Literal) -> DataType {
    let chars = literal.value.chars().count().max(1) as f64;
    match literal.kind {
        LiteralKind::String => DataType::new(DataFormat::Alphanumeric, chars),
        LiteralKind::Unicode => DataType::new(DataFormat::Unicode, chars),
        LiteralKind::Hex => DataType::new(DataFormat::Binary, (chars / 2.0).ceil()),
        LiteralKind::Integer | LiteralKind::Decimal => numeric_literal_type(&literal.value),
        LiteralKind::Date => DataType::new(DataFormat::Date, 0.0),
        LiteralKind::Time => DataType::new(DataFormat::Time, 0.0),
        LiteralKind::Boolean => DataType::new(DataFormat::Logic, 1.0),
    }
}

fn numeric_literal_type(value: &str) -> DataType {
    let digits = value.trim_start_matches(['-', '+']);
    let (integral, fractional) = digits.split_once(['.', ',']).unwrap_or((digits, ""));
    let count = |s: &str| s.chars().filter(char::is_ascii_digit).count() as u32;
    DataType::with_digits(DataFormat::Numeric, count(integral).max(1), count(fractional))
}

#[cfg(test)]
mod tests {
    use super::*;
    use natparse_syntax::lexer;
    use natparse_syntax::parser::{self, ParseOptions, ParsedModule};

    fn parse(source: &str) -> ParsedModule {
        let lexed = lexer::lex(source);
        parser::parse(&lexed.tokens, &ParseOptions::default(), None)
    }

    /// Inferred type of the value of the last assignment in `source`, rendered.
    fn value_type(source: &str) -> Option<String> {
        let parsed = parse(source);
        let value = parsed
            .statements()
            .iter()
            .rev()
            .find_map(|s| match parsed.tree.kind(*s) {
                NodeKind::Assignment { value, .. } => Some(*value),
                _ => None,
            })
            .expect("an assignment");
        infer(&parsed.tree, value).map(|t| t.to_string())
    }

    const DATA: &str = "DEFINE DATA LOCAL\n\
        1 #A (A10)\n\
        1 #N (N7,2)\n\
        1 #I (I4)\n\
        1 #P (P12,3)\n\
        1 #ARR (A5/1:10)\n\
        1 #GRP\n\
        2 #F (A1)\n\
        1 #R (A20)\n\
        END-DEFINE\n";

    #[test]
    fn literals() {
        assert_eq!(value_type(&format!("{DATA}#R := 'hello'")).as_deref(), Some("A5"));
        assert_eq!(value_type(&format!("{DATA}#R := 123")).as_deref(), Some("N3"));
        assert_eq!(value_type(&format!("{DATA}#R := -1.25")).as_deref(), Some("N1,2"));
        assert_eq!(value_type(&format!("{DATA}#R := H'0A0B'")).as_deref(), Some("B2"));
        assert_eq!(value_type(&format!("{DATA}#R := TRUE")).as_deref(), Some("L"));
        assert_eq!(value_type(&format!("{DATA}#R := ''")).as_deref(), Some("A1"));
    }

    #[test]
    fn references_use_the_declaration() {
        assert_eq!(value_type(&format!("{DATA}#R := #A")).as_deref(), Some("A10"));
        assert_eq!(value_type(&format!("{DATA}#R := #ARR")).as_deref(), Some("A5/1:10"));
        assert_eq!(value_type(&format!("{DATA}#R := #ARR(2)")).as_deref(), Some("A5"));
        assert_eq!(value_type(&format!("{DATA}#R := #ARR(1:3)")).as_deref(), Some("A5/1:10"));
    }

    #[test]
    fn groups_and_unresolved_references_are_unknown() {
        assert_eq!(value_type(&format!("{DATA}#R := #GRP")), None);
        assert_eq!(value_type(&format!("{DATA}#R := #MISSING")), None);
    }

    #[test]
    fn arithmetic_takes_the_widest_type() {
        assert_eq!(value_type(&format!("{DATA}#R := #I + #N")).as_deref(), Some("N7,2"));
        assert_eq!(value_type(&format!("{DATA}#R := #N * #P")).as_deref(), Some("P12,3"));
        assert_eq!(value_type(&format!("{DATA}#R := -#I")).as_deref(), Some("I4"));
        assert_eq!(value_type(&format!("{DATA}#R := #I + #MISSING")), None);
    }

    #[test]
    fn substring_length() {
        assert_eq!(value_type(&format!("{DATA}#R := SUBSTR(#A, 2, 3)")).as_deref(), Some("A3"));
        assert_eq!(value_type(&format!("{DATA}#R := SUBSTR(#A, 2, #I)")).as_deref(), Some("A DYNAMIC"));
    }

    #[test]
    fn builtins_use_the_registry() {
        assert_eq!(value_type(&format!("{DATA}#R := *DATX")).as_deref(), Some("D"));
        assert_eq!(value_type(&format!("{DATA}#R := *OCC(#ARR)")).as_deref(), Some("I4"));
    }
}
