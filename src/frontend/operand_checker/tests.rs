//! Operand checker unit tests.

use super::*;
use natparse_core::lang::operand_definitions::OperandDefinitions as D;
use natparse_syntax::ast::{NodeId, NodeKind};
use natparse_syntax::diagnostics::DiagnosticKind;
use natparse_syntax::lexer;
use natparse_syntax::parser::{self, ParseOptions, ParsedModule};

const DATA: &str = "DEFINE DATA LOCAL
1 #A (A10)
1 #N (N5)
1 #I (I4)
1 #F (F8)
1 #D (D)
1 #R (A20)
1 #C (N3) CONST <5>
1 #CARR (N3/1:3) CONST <1, 2, 3>
1 #ARR (I4/1:3)
1 #DYN (A10/1:*)
1 #GRP
  2 #G1 (A2)
  2 #G2 (N3)
END-DEFINE
";

fn parse(body: &str) -> ParsedModule {
    let source = format!("{DATA}{body}\nEND\n");
    let lexed = lexer::lex(&source);
    parser::parse(&lexed.tokens, &ParseOptions::default(), None)
}

fn check_parsed(parsed: &ParsedModule) -> Vec<Diagnostic> {
    check(&parsed.tree, &parsed.checks, &FrontendConfig::default())
}

fn check_str(body: &str) -> Vec<Diagnostic> {
    check_parsed(&parse(body))
}

fn messages(body: &str) -> Vec<String> {
    check_str(body).into_iter().map(|d| d.message).collect()
}

/// First top-level statement (after DEFINE DATA) matching `pick`.
fn find_statement<T>(parsed: &ParsedModule, pick: impl Fn(&NodeKind) -> Option<T>) -> T {
    parsed
        .statements()
        .iter()
        .find_map(|s| pick(parsed.tree.kind(*s)))
        .expect("statement not found")
}

fn run_single(parsed: &ParsedModule, operand: NodeId, allowed: D) -> Vec<Diagnostic> {
    let checks = [OperandCheck::Definition { operand, allowed }];
    check(&parsed.tree, &checks, &FrontendConfig::default())
}

// ========================================
// Format checks
// ========================================

#[test]
fn test_string_into_numeric_is_one_mismatch() {
    let diagnostics = check_str("#N := 'abc'");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::TypeMismatch);
    insta::assert_snapshot!(
        diagnostics[0].message,
        @"Type mismatch: inferred type A3 is not compatible with N5"
    );
}

#[test]
fn test_number_into_numeric_is_fine() {
    assert!(check_str("#N := 123").is_empty());
    assert!(check_str("#N := #I + #F").is_empty());
    assert!(check_str("#A := 42").is_empty());
}

#[test]
fn test_arithmetic_operand_format() {
    assert_eq!(
        messages("ADD 'X' TO #N"),
        vec!["Operand can't be of format A. Allowed formats: D, F, I, N, P, T"]
    );
    assert_eq!(check_str("SUBTRACT #A FROM #N").len(), 1);
    assert_eq!(check_str("MULTIPLY #N BY 'X'").len(), 1);
}

#[test]
fn test_alphanumeric_inside_arithmetic() {
    assert_eq!(
        messages("#N := #A + 1"),
        vec!["Operand can't be of format A. Allowed formats: D, F, I, N, P, T"]
    );
    assert_eq!(check_str("#N := 2 * (#A - #R)").len(), 2);
    assert!(check_str("#N := #I * 2 - #F").is_empty());
}

#[test]
fn test_no_formats_allowed_rejects_typed_operands() {
    let parsed = parse("#N := #I");
    let value = find_statement(&parsed, |k| match k {
        NodeKind::Assignment { value, .. } => Some(*value),
        _ => None,
    });
    assert_eq!(
        run_single(&parsed, value, D::SCALAR)
            .into_iter()
            .map(|d| d.message)
            .collect::<Vec<_>>(),
        vec!["Operand can't be of format I. Allowed formats: none"]
    );
}

#[test]
fn test_same_family_for_multiply() {
    assert!(check_str("MULTIPLY #N BY #F").is_empty());
    let diagnostics = check_str("MULTIPLY #N BY #D");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "Type mismatch: inferred type D is not in the same format family as N5"
    );
}

#[test]
fn test_decide_ranges_check_both_bounds() {
    let body = "DECIDE ON FIRST VALUE OF #N\n  VALUE 'A':'Z'\n    IGNORE\n  NONE\n    IGNORE\nEND-DECIDE";
    assert_eq!(check_str(body).len(), 2);
    let body = "DECIDE ON FIRST VALUE OF #N\n  VALUE 1:9\n    IGNORE\n  NONE\n    IGNORE\nEND-DECIDE";
    assert!(check_str(body).is_empty());
}

#[test]
fn test_comparison_mismatch() {
    assert_eq!(check_str("IF #N = 'X'\n  IGNORE\nEND-IF").len(), 1);
    assert!(check_str("IF #A = 'X'\n  IGNORE\nEND-IF").is_empty());
}

#[test]
fn test_unknown_types_are_skipped() {
    assert!(check_str("#N := #MISSING").is_empty());
    assert!(check_str("#MISSING := 'abc'").is_empty());
}

// ========================================
// Shape checks
// ========================================

#[test]
fn test_assigning_to_a_constant() {
    let diagnostics = check_str("#C := 1");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ReferenceNotMutable);
    insta::assert_snapshot!(
        diagnostics[0].message,
        @"Operand can not be a constant value. It must be one of: a scalar value, an array, a modifiable system variable"
    );
}

#[test]
fn test_system_variable_mutability() {
    let diagnostics = check_str("ASSIGN *DATX := #D");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ReferenceNotMutable);
    assert!(check_str("ASSIGN *PAGE-NUMBER := 5").is_empty());
}

#[test]
fn test_group_targets() {
    assert_eq!(
        messages("MOVE 'X' TO #GRP"),
        vec!["Operand can not be a group. It must be one of: a scalar value, an array, a modifiable system variable"]
    );
    assert!(check_str("RESET #GRP").is_empty());
}

#[test]
fn test_indexed_element_is_scalar() {
    assert!(check_str("EXAMINE #A STARTING FROM POSITION #ARR(1) FOR 'X'").is_empty());
    let diagnostics = check_str("EXAMINE #A STARTING FROM POSITION #ARR FOR 'X'");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.starts_with("Operand can not be an array."));
}

#[test]
fn test_resize_argument_addresses_the_whole_array() {
    let parsed = parse("RESIZE ARRAY #DYN TO (1:5)");
    assert!(check_parsed(&parsed).is_empty());

    let array = find_statement(&parsed, |k| match k {
        NodeKind::ResizeArray(resize) => Some(resize.array),
        _ => None,
    });
    assert!(run_single(&parsed, array, D::ARRAY | D::ALL_FORMATS).is_empty());
    assert!(run_single(&parsed, array, D::SCALAR | D::CONSTANT | D::ALL_FORMATS).is_empty());

    // classified as an array, not as a scalar
    let diagnostics = run_single(&parsed, array, D::CONSTANT | D::ALL_FORMATS);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.starts_with("Operand can not be an array."));
}

#[test]
fn test_constant_array_reports_both_shapes() {
    let parsed = parse("#N := #CARR(1)\n#R := #CARR");
    let values: Vec<NodeId> = parsed
        .statements()
        .iter()
        .filter_map(|s| match parsed.tree.kind(*s) {
            NodeKind::Assignment { value, .. } => Some(*value),
            _ => None,
        })
        .collect();

    let element = run_single(&parsed, values[0], D::SCALAR | D::ALL_FORMATS);
    assert_eq!(element.len(), 1);
    assert_eq!(element[0].kind, DiagnosticKind::ReferenceNotMutable);

    let whole: Vec<String> = run_single(&parsed, values[1], D::SCALAR | D::ALL_FORMATS)
        .into_iter()
        .map(|d| d.message)
        .collect();
    assert_eq!(whole.len(), 2);
    assert!(whole[0].starts_with("Operand can not be an array."));
    assert!(whole[1].starts_with("Operand can not be a constant value."));
}

#[test]
fn test_plain_array_outside_resize() {
    let parsed = parse("#R := #DYN");
    let value = find_statement(&parsed, |k| match k {
        NodeKind::Assignment { value, .. } => Some(*value),
        _ => None,
    });
    let diagnostics = run_single(&parsed, value, D::SCALAR | D::CONSTANT | D::ALL_FORMATS);
    assert_eq!(diagnostics.len(), 1);
    insta::assert_snapshot!(
        diagnostics[0].message,
        @"Operand can not be an array. It must be one of: a constant, a scalar value"
    );
}

#[test]
fn test_arithmetic_not_allowed() {
    let parsed = parse("#N := #I + 1");
    let value = find_statement(&parsed, |k| match k {
        NodeKind::Assignment { value, .. } => Some(*value),
        _ => None,
    });
    let diagnostics = run_single(&parsed, value, D::SCALAR | D::ALL_FORMATS);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.starts_with("Operand can not be an arithmetic expression."));
    assert!(run_single(&parsed, value, D::ARITHMETIC | D::ALL_FORMATS).is_empty());
}

#[test]
fn test_literal_where_only_variables_are_allowed() {
    let parsed = parse("#N := 7");
    let value = find_statement(&parsed, |k| match k {
        NodeKind::Assignment { value, .. } => Some(*value),
        _ => None,
    });
    let diagnostics = run_single(&parsed, value, D::SCALAR | D::NUMERIC_COUNTERS);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ReferenceNotMutable);
}

// ========================================
// REDEFINE sizes
// ========================================

const REDEFINE_TOO_LARGE: &str = "DEFINE DATA LOCAL
1 #X (A5)
1 REDEFINE #X
  2 #X1 (A3)
  2 #X2 (N3)
END-DEFINE
END
";

fn parse_source(source: &str) -> ParsedModule {
    let lexed = lexer::lex(source);
    parser::parse(&lexed.tokens, &ParseOptions::default(), None)
}

#[test]
fn test_redefinition_too_large() {
    let parsed = parse_source(REDEFINE_TOO_LARGE);
    let diagnostics = check_parsed(&parsed);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::RedefinitionTooLarge);
    insta::assert_snapshot!(
        diagnostics[0].message,
        @"Redefinition of #X (5 bytes) exceeds its size: members take 6 bytes"
    );
}

#[test]
fn test_redefinition_check_can_be_disabled() {
    let parsed = parse_source(REDEFINE_TOO_LARGE);
    let config = FrontendConfig::new().with_redefinition_sizes(false);
    assert!(check(&parsed.tree, &parsed.checks, &config).is_empty());
}

#[test]
fn test_redefinition_with_filler_fits() {
    let source = "DEFINE DATA LOCAL
1 #X (A5)
1 REDEFINE #X
  2 FILLER 2X
  2 #X1 (A3)
END-DEFINE
END
";
    assert!(check_parsed(&parse_source(source)).is_empty());
}

#[test]
fn test_redefinition_of_a_group() {
    let source = "DEFINE DATA LOCAL
1 #G (1:2)
  2 #G1 (A2)
  2 #G2 (P3)
1 REDEFINE #G
  2 #ALL (A8)
END-DEFINE
END
";
    // P3 takes 2 bytes, so the group holds 2 * (2 + 2) = 8
    assert!(check_parsed(&parse_source(source)).is_empty());
}

#[test]
fn test_dynamic_redefinitions_are_not_checked() {
    let source = "DEFINE DATA LOCAL
1 #X (A) DYNAMIC
1 REDEFINE #X
  2 #X1 (A3)
END-DEFINE
END
";
    assert!(check_parsed(&parse_source(source)).is_empty());
}

#[test]
fn test_oversized_redefinitions_are_not_checked() {
    let source = "DEFINE DATA LOCAL
1 #G (1:4000000000)
  2 #G1 (A253/1:4000000000,1:4000000000)
1 REDEFINE #G
  2 #G2 (A3)
1 #Y (A5)
1 REDEFINE #Y
  2 #Y1 (A253/1:4000000000,1:4000000000,1:4000000000)
END-DEFINE
END
";
    assert!(check_parsed(&parse_source(source)).is_empty());
}
