//! EXAMINE clause permutations.
//!
//! The GIVING clauses of EXAMINE may appear in any order; the resulting bindings must not depend on it.

use natparse::frontend::ast::{Examine, ExamineAction, NodeId, NodeKind};
use natparse::frontend::{FrontendConfig, Module, ModuleIdentity, parse_module};
use natparse_core::FileKind;

const DATA: &str = "DEFINE DATA LOCAL
1 #V (A20)
1 #N (I4)
1 #P (I4)
1 #L (I4)
1 #I1 (I4)
1 #I2 (I4)
1 #R (A1)
END-DEFINE
";

fn parse(statement: &str) -> Module {
    let source = format!("{DATA}{statement}\nEND\n");
    parse_module(
        &source,
        ModuleIdentity::new("EXAM", FileKind::Program),
        None,
        &FrontendConfig::default(),
    )
}

fn examine(module: &Module) -> &Examine {
    module
        .statements()
        .iter()
        .find_map(|s| match module.tree.kind(*s) {
            NodeKind::Examine(examine) => Some(examine),
            _ => None,
        })
        .expect("an EXAMINE statement")
}

fn name(module: &Module, node: Option<NodeId>) -> Option<String> {
    match module.tree.kind(node?) {
        NodeKind::VariableReference(reference) => Some(reference.name.clone()),
        _ => None,
    }
}

/// Resolved givings as `(number, position, length, index)`.
fn givings(module: &Module) -> (Option<String>, Option<String>, Option<String>, Vec<String>) {
    let givings = &examine(module).givings;
    let index = givings
        .index
        .iter()
        .filter_map(|i| name(module, Some(*i)))
        .collect();
    (
        name(module, givings.number),
        name(module, givings.position),
        name(module, givings.length),
        index,
    )
}

fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for (i, first) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            out.push(tail);
        }
    }
    out
}

#[test]
fn number_and_position_in_either_order() {
    let a = parse("EXAMINE #V FOR 'a' GIVING NUMBER #N GIVING POSITION #P");
    let b = parse("EXAMINE #V FOR 'a' GIVING POSITION #P GIVING NUMBER #N");
    assert!(a.diagnostics.is_empty(), "{:?}", a.diagnostics);
    assert!(b.diagnostics.is_empty(), "{:?}", b.diagnostics);
    assert_eq!(givings(&a), givings(&b));
    assert_eq!(givings(&a).0.as_deref(), Some("#N"));
    assert_eq!(givings(&a).1.as_deref(), Some("#P"));
}

#[test]
fn every_giving_permutation_binds_the_same_targets() {
    let clauses = [
        "GIVING NUMBER #N",
        "GIVING POSITION #P",
        "GIVING LENGTH #L",
        "GIVING INDEX #I1 #I2",
    ];
    let expected = (
        Some("#N".to_string()),
        Some("#P".to_string()),
        Some("#L".to_string()),
        vec!["#I1".to_string(), "#I2".to_string()],
    );
    for order in permutations(&clauses) {
        let statement = format!("EXAMINE #V FOR 'a' {}", order.join(" "));
        let module = parse(&statement);
        assert!(module.diagnostics.is_empty(), "{statement}: {:?}", module.diagnostics);
        assert_eq!(givings(&module), expected, "{statement}");
    }
}

#[test]
fn giving_keyword_is_optional_between_clauses() {
    let module = parse("EXAMINE #V FOR 'a' NUMBER #N POSITION #P");
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    assert_eq!(givings(&module).0.as_deref(), Some("#N"));
    assert_eq!(givings(&module).1.as_deref(), Some("#P"));
}

#[test]
fn bare_giving_means_number() {
    let module = parse("EXAMINE #V FOR 'a' GIVING #N");
    assert_eq!(givings(&module).0.as_deref(), Some("#N"));
}

#[test]
fn replace_with_givings() {
    let module = parse("EXAMINE #V FOR 'a' REPLACE FIRST WITH 'b' GIVING POSITION #P GIVING NUMBER #N");
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    assert!(matches!(
        examine(&module).action,
        Some(ExamineAction::Replace { first: true, .. })
    ));
    assert_eq!(givings(&module).0.as_deref(), Some("#N"));
}

#[test]
fn giving_targets_must_be_numeric_counters() {
    let module = parse("EXAMINE #V FOR 'a' GIVING NUMBER #R");
    assert_eq!(module.diagnostics.len(), 1);
    assert!(module.diagnostics[0].message.starts_with("Operand can't be of format A."));
}

#[test]
fn charposition_and_charlength_stand_alone() {
    let cases = [
        ("EXAMINE #V FOR CHARPOSITION #P GIVING LENGTH #L", true, false),
        ("EXAMINE #V FOR CHARPOSITION #P CHARLENGTH #N GIVING LENGTH #L", true, true),
        ("EXAMINE #V CHARLENGTH #N GIVING LENGTH #L", false, true),
        ("EXAMINE #V FOR CHARLENGTH #N GIVING LENGTH #L", false, true),
    ];
    for (statement, has_position, has_length) in cases {
        let module = parse(statement);
        assert!(module.diagnostics.is_empty(), "{statement}: {:?}", module.diagnostics);
        let examine = examine(&module);
        assert_eq!(examine.char_position.is_some(), has_position, "{statement}");
        assert_eq!(examine.char_length.is_some(), has_length, "{statement}");
        assert!(examine.pattern.is_none(), "{statement}");
        assert_eq!(givings(&module).2.as_deref(), Some("#L"), "{statement}");
    }
}

#[test]
fn space_is_a_delimiter_operand() {
    let module = parse("EXAMINE #V FOR 'a' WITH DELIMITER SPACE AND DELETE FIRST INDEX #I1");
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    let stmt = examine(&module);
    let delimiter = stmt.delimiters.flatten().expect("a delimiter operand");
    assert!(matches!(module.tree.kind(delimiter), NodeKind::KeywordOperand { .. }));
    assert!(matches!(stmt.action, Some(ExamineAction::Delete { first: true })));
    assert_eq!(givings(&module).3, vec!["#I1".to_string()]);

    let module = parse("EXAMINE #V 'a' WITH DELIMITER SPACE REPLACE ' '");
    assert!(module.diagnostics.is_empty(), "{:?}", module.diagnostics);
    assert!(examine(&module).delimiters.flatten().is_some());
    assert!(matches!(examine(&module).action, Some(ExamineAction::Replace { first: false, .. })));
}
