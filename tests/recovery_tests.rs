//! Error recovery through the whole pipeline.
//!
//! A broken statement costs exactly that statement: everything after it is still parsed, bound and checked.

use natparse::frontend::ast::NodeKind;
use natparse::frontend::diagnostics::DiagnosticKind;
use natparse::frontend::{FrontendConfig, Module, ModuleIdentity, parse_module};
use natparse_core::FileKind;

const DATA: &str = "DEFINE DATA LOCAL
1 #A (A10)
1 #B (A20)
1 #N (N5)
END-DEFINE
";

const WELL_FORMED: [&str; 10] = [
    "#A := 'X'",
    "#N := 5",
    "ADD 1 TO #N",
    "MOVE 'Y' TO #A",
    "RESET #N",
    "WRITE #A #N",
    "COMPRESS #A 'Z' INTO #B",
    "IF #N > 3\n  IGNORE\nEND-IF",
    "SUBTRACT 2 FROM #N",
    "EXAMINE #A FOR 'X' GIVING NUMBER #N",
];

fn parse(body: &str) -> Module {
    let source = format!("{DATA}{body}\nEND\n");
    parse_module(
        &source,
        ModuleIdentity::new("RECOVER", FileKind::Program),
        None,
        &FrontendConfig::default(),
    )
}

#[test]
fn well_formed_statements_are_clean() {
    let module = parse(&WELL_FORMED.join("\n"));
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    // DEFINE DATA + ten statements + END
    assert_eq!(module.statements().len(), 12);
}

#[test]
fn one_bad_statement_before_ten_good_ones() {
    let body = format!("MOVE TO #A\n{}", WELL_FORMED.join("\n"));
    let module = parse(&body);

    assert_eq!(module.diagnostics.len(), 1, "{:?}", module.diagnostics);
    assert_eq!(module.diagnostics[0].kind, DiagnosticKind::SyntaxError);
    assert_eq!(module.statements().len(), 12);
}

#[test]
fn bad_statement_in_the_middle() {
    let mut lines: Vec<&str> = WELL_FORMED.to_vec();
    lines.insert(5, "ADD #N");
    let module = parse(&lines.join("\n"));

    assert_eq!(module.diagnostics.len(), 1, "{:?}", module.diagnostics);
    assert_eq!(module.diagnostics[0].kind, DiagnosticKind::SyntaxError);
    assert_eq!(module.statements().len(), 12);
    let last = module.statements()[10];
    assert!(matches!(module.tree.kind(last), NodeKind::Examine(_)));
}

#[test]
fn statements_after_the_error_are_still_checked() {
    let body = format!("MOVE TO #A\n{}\n#N := 'abc'", WELL_FORMED.join("\n"));
    let module = parse(&body);
    let kinds: Vec<_> = module.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::SyntaxError, DiagnosticKind::TypeMismatch]);
}

#[test]
fn empty_and_garbage_sources_still_give_a_tree() {
    for source in ["", "\n\n", "))))", "END-IF END-IF", "DEFINE DATA"] {
        let module = parse_module(
            source,
            ModuleIdentity::new("RECOVER", FileKind::Program),
            None,
            &FrontendConfig::default(),
        );
        assert!(matches!(module.tree.kind(module.root), NodeKind::Module { .. }), "{source:?}");
    }
}
