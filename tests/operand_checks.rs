//! Operand checks through `parse_module`.
//!
//! Unit tests in the checker exercise the individual rules; these cover what a caller of the pipeline sees, with
//! configuration switches and cross-module declarations in play.

use natparse::frontend::diagnostics::{DiagnosticKind, Severity};
use natparse::frontend::index::InMemoryIndex;
use natparse::frontend::module_index::ModuleIndex;
use natparse::frontend::{FrontendConfig, Module, ModuleIdentity, parse_module};
use natparse_core::FileKind;

const DATA: &str = "DEFINE DATA LOCAL
1 #A (A10)
1 #N (N5)
1 #P (P7,2)
1 #ARR (I4/1:3)
1 #DYN (A10/1:*)
1 #X (A5)
1 REDEFINE #X
  2 #X1 (A3)
  2 #X2 (N3)
END-DEFINE
";

fn parse_with(body: &str, config: &FrontendConfig, index: Option<&dyn ModuleIndex>) -> Module {
    let source = format!("{DATA}{body}\nEND\n");
    parse_module(&source, ModuleIdentity::new("CHECKS", FileKind::Program), index, config)
}

fn parse(body: &str) -> Module {
    parse_with(body, &FrontendConfig::default(), None)
}

fn kinds(module: &Module) -> Vec<DiagnosticKind> {
    module.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn string_into_numeric_position_is_exactly_one_mismatch() {
    let module = parse("#N := 'abc'");
    assert_eq!(
        kinds(&module),
        vec![DiagnosticKind::RedefinitionTooLarge, DiagnosticKind::TypeMismatch]
    );
    insta::assert_snapshot!(
        module.diagnostics[1].message,
        @"Type mismatch: inferred type A3 is not compatible with N5"
    );
}

#[test]
fn string_operand_of_an_arithmetic_verb_is_exactly_one_mismatch() {
    let config = FrontendConfig::new().with_redefinition_sizes(false);
    for body in ["ADD 'abc' TO #N", "SUBTRACT 'x' FROM #N", "ADD #A TO #N GIVING #P", "DIVIDE 'x' INTO #N"] {
        let module = parse_with(body, &config, None);
        assert_eq!(kinds(&module), vec![DiagnosticKind::TypeMismatch], "{body}");
    }
    let module = parse_with("ADD 'abc' TO #N", &config, None);
    insta::assert_snapshot!(
        module.diagnostics[0].message,
        @"Operand can't be of format A. Allowed formats: D, F, I, N, P, T"
    );
}

#[test]
fn alphanumeric_inside_an_expression_is_reported_once() {
    let config = FrontendConfig::new().with_redefinition_sizes(false);
    let module = parse_with("#N := #A + 1", &config, None);
    assert_eq!(kinds(&module), vec![DiagnosticKind::TypeMismatch]);
    assert!(module.diagnostics[0].message.starts_with("Operand can't be of format A."));
}

#[test]
fn numeric_into_numeric_position_is_clean() {
    let config = FrontendConfig::new().with_redefinition_sizes(false);
    for body in ["#N := 42", "#N := #P", "#P := #N * 2", "MOVE 1 TO #N", "ADD #P TO #N"] {
        let module = parse_with(body, &config, None);
        assert!(module.diagnostics.is_empty(), "{body}: {:?}", module.diagnostics);
    }
}

#[test]
fn redefinition_size_check_follows_the_config() {
    let module = parse("IGNORE");
    assert_eq!(kinds(&module), vec![DiagnosticKind::RedefinitionTooLarge]);
    assert!(module.has_errors());

    let relaxed = parse_with("IGNORE", &FrontendConfig::new().with_redefinition_sizes(false), None);
    assert!(relaxed.diagnostics.is_empty());
}

#[test]
fn resize_addresses_the_whole_array() {
    let config = FrontendConfig::new().with_redefinition_sizes(false);
    let module = parse_with("RESIZE ARRAY #DYN TO (1:5)", &config, None);
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);

    let module = parse_with("EXAMINE #A STARTING FROM POSITION #ARR FOR 'X'", &config, None);
    assert_eq!(module.diagnostics.len(), 1, "{:?}", module.diagnostics);
    assert!(module.diagnostics[0].message.starts_with("Operand can not be an array."));
}

#[test]
fn unresolved_variables_are_warnings_and_can_be_silenced() {
    let config = FrontendConfig::new().with_redefinition_sizes(false);
    let module = parse_with("#N := #MISSING", &config, None);
    assert_eq!(kinds(&module), vec![DiagnosticKind::UnresolvedReference]);
    assert_eq!(module.diagnostics[0].severity, Severity::Warning);
    assert!(!module.has_errors());

    let quiet = parse_with("#N := #MISSING", &config.with_unresolved_variables(false), None);
    assert!(quiet.diagnostics.is_empty());
}

#[test]
fn imported_declarations_are_checked_like_local_ones() {
    let mut index = InMemoryIndex::new();
    index.add_source(
        ModuleIdentity::new("SHARED", FileKind::Lda),
        "DEFINE DATA LOCAL\n1 #COUNT (I4)\n1 #LABEL (A8)\nEND-DEFINE\n",
    );
    let source = "DEFINE DATA LOCAL USING SHARED\nEND-DEFINE\n#COUNT := 'x'\n#LABEL := 'ok'\nADD 1 TO #COUNT\nEND\n";
    let module = parse_module(
        source,
        ModuleIdentity::new("MAIN", FileKind::Program),
        Some(&index),
        &FrontendConfig::default(),
    );
    assert_eq!(kinds(&module), vec![DiagnosticKind::TypeMismatch]);
    assert!(module.diagnostics[0].message.ends_with("is not compatible with I4"));
}
