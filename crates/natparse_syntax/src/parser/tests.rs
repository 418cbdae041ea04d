#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the shape of the produced tree, on declaration binding, and on the parser's error recovery
/// behavior (one clear diagnostic per problem, no cascades).
mod tests {
    use super::*;
    use crate::ast;
    use crate::diagnostics::Severity;
    use crate::lexer;
    use crate::module_index::ModuleSummary;

    fn parse_with(source: &str, options: ParseOptions, index: Option<&dyn ModuleIndex>) -> ParsedModule {
        let lexed = lexer::lex(source);
        assert!(lexed.diagnostics.is_empty(), "lex errors: {:?}", lexed.diagnostics);
        parse(&lexed.tokens, &options, index)
    }

    fn parse_str(source: &str) -> ParsedModule {
        parse_with(source, ParseOptions::default(), None)
    }

    /// Dump of a source that must parse cleanly.
    fn dump_str(source: &str) -> String {
        let parsed = parse_str(source);
        assert!(parsed.diagnostics.is_empty(), "unexpected diagnostics: {:?}", parsed.diagnostics);
        ast::dump(&parsed.tree, parsed.root)
    }

    fn messages(parsed: &ParsedModule) -> Vec<&str> {
        parsed.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    fn declaration<'t>(parsed: &'t ParsedModule, name: &str) -> &'t VariableDecl {
        parsed
            .declarations
            .values()
            .flatten()
            .find_map(|id| match parsed.tree.kind(*id) {
                NodeKind::Variable(decl) if decl.name == name => Some(decl),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no declaration {name}"))
    }

    struct TestIndex(Vec<ModuleSummary>);

    impl ModuleIndex for TestIndex {
        fn find_module(&self, name: &str) -> Option<ModuleSummary> {
            self.0.iter().find(|m| m.name == name).cloned()
        }
    }

    fn lda_index() -> TestIndex {
        let mut lda = ModuleSummary::new("MYLDA", FileKind::Lda);
        lda.variables.push(DeclaredVariable {
            name: "#FROM-LDA".to_string(),
            level: 1,
            scope: VariableScope::Local,
            ty: "A10".parse().unwrap(),
        });
        TestIndex(vec![lda])
    }

    // ---- DEFINE DATA ----

    #[test]
    fn test_minimal_module() {
        insta::assert_snapshot!(dump_str("DEFINE DATA LOCAL\n1 #A (N5)\nEND-DEFINE\n#A := 1\nEND\n"), @r"
        Module
          DefineData
            Variable LOCAL 1 #A (N5)
          Assignment Bare
            Ref #A
            Literal Integer 1
          End
        ");
    }

    #[test]
    fn test_groups_and_redefine() {
        let source = "\
DEFINE DATA LOCAL
1 #GRP
  2 #A (A10)
  2 #B (N5)
1 #X (A8)
1 REDEFINE #X
  2 #X1 (A4)
  2 FILLER 4X
END-DEFINE
END
";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          DefineData
            Variable LOCAL 1 #GRP group
              Variable LOCAL 2 #A (A10)
              Variable LOCAL 2 #B (N5)
            Variable LOCAL 1 #X (A8)
              Redefine #X
                Variable LOCAL 2 #X1 (A4)
                Filler 4X
          End
        ");

        let parsed = parse_str(source);
        assert_eq!(declaration(&parsed, "#A").qualified_name, "#GRP.#A");
        assert!(parsed
            .checks
            .iter()
            .any(|c| matches!(c, OperandCheck::RedefinitionSize { .. })));

        let redefine = parsed
            .tree
            .iter()
            .find_map(|(_, node)| match &node.kind {
                NodeKind::Redefine(r) => Some(r.clone()),
                _ => None,
            })
            .unwrap();
        let target = redefine.target_decl.expect("REDEFINE must be bound");
        assert!(matches!(parsed.tree.kind(target), NodeKind::Variable(v) if v.name == "#X"));
    }

    #[test]
    fn test_qualified_names_resolve_to_members() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #GRP\n  2 #A (A10)\nEND-DEFINE\n#GRP.#A := 'X'\nEND\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    }

    #[test]
    fn test_constant_bounds_are_substituted() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #MAX (I4) CONST <10>\n1 #ARR (A5/1:#MAX)\nEND-DEFINE\nEND\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert_eq!(declaration(&parsed, "#ARR").ty.to_string(), "A5/1:10");
        assert!(declaration(&parsed, "#MAX").is_constant());
    }

    #[test]
    fn test_const_without_value_is_reported() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #C (N3) CONST\nEND-DEFINE\nEND\n");
        assert_eq!(messages(&parsed), vec!["Constant #C must be initialized with CONST <...>"]);
    }

    #[test]
    fn test_group_array_and_dynamic_types() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #ROWS (1:*)\n  2 #COL (A10)\n1 #TEXT (A) DYNAMIC\nEND-DEFINE\nEND\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let rows = declaration(&parsed, "#ROWS");
        assert!(rows.is_group);
        assert!(rows.is_array());
        assert_eq!(declaration(&parsed, "#TEXT").ty.declaration(), "(A) DYNAMIC");
    }

    #[test]
    fn test_invalid_type_keeps_declaration() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #BAD (X10)\nEND-DEFINE\nWRITE #BAD\nEND\n");
        assert_eq!(parsed.diagnostics.len(), 1);
        assert!(parsed.diagnostics[0].message.starts_with("Invalid type specification (X10)"));
        assert!(declaration(&parsed, "#BAD").ty.is_none());
    }

    #[test]
    fn test_redefine_without_target() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #A (A4)\n1 REDEFINE #B\n  2 #B1 (A2)\nEND-DEFINE\nEND\n");
        assert_eq!(messages(&parsed), vec!["REDEFINE target #B is not declared on this level"]);
    }

    #[test]
    fn test_using_imports_declarations() {
        let index = lda_index();
        let parsed = parse_with(
            "DEFINE DATA LOCAL USING MYLDA\nEND-DEFINE\nWRITE #FROM-LDA\nEND\n",
            ParseOptions::default(),
            Some(&index),
        );
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert_eq!(parsed.usings.len(), 1);
        let imported = declaration(&parsed, "#FROM-LDA");
        assert!(imported.imported);
        assert_eq!(imported.ty.to_string(), "A10");
    }

    #[test]
    fn test_unresolved_using_silences_variables() {
        let index = TestIndex(Vec::new());
        let parsed = parse_with(
            "DEFINE DATA LOCAL USING NOLDA\nEND-DEFINE\nWRITE #SOMETHING\nEND\n",
            ParseOptions::default(),
            Some(&index),
        );
        assert_eq!(messages(&parsed), vec!["Unresolved module: NOLDA"]);
        assert_eq!(parsed.diagnostics[0].severity, Severity::Warning);
    }

    // ---- Statements ----

    #[test]
    fn test_unresolved_variable_is_a_warning() {
        let parsed = parse_str("WRITE #UNKNOWN\nEND\n");
        assert_eq!(messages(&parsed), vec!["Unresolved reference: #UNKNOWN"]);
        assert_eq!(parsed.diagnostics[0].severity, Severity::Warning);

        let copycode = parse_with("WRITE #UNKNOWN\n", ParseOptions::new(FileKind::Copycode), None);
        assert!(copycode.diagnostics.is_empty());

        let silenced = parse_with(
            "WRITE #UNKNOWN\n",
            ParseOptions::default().with_unresolved_variables(false),
            None,
        );
        assert!(silenced.diagnostics.is_empty());
    }

    #[test]
    fn test_keyword_names_need_a_declaration() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 VALUE (A10)\nEND-DEFINE\nVALUE := 'X'\nEND\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert!(matches!(
            parsed.tree.kind(parsed.statements()[1]),
            NodeKind::Assignment { kind: AssignmentKind::Bare, .. }
        ));
    }

    #[test]
    fn test_data_manipulation_statements() {
        let source = "\
DEFINE DATA LOCAL
1 #A (N5)
1 #B (N5)
1 #T (A20)
END-DEFINE
ADD 1 #B TO #A
SUBTRACT 1 FROM #A GIVING #B
MULTIPLY ROUNDED #A BY 2
DIVIDE 3 INTO #A GIVING #B REMAINDER #A
COMPUTE ROUNDED #A = #B * 2 + 1
MOVE 'X' TO #T
RESET INITIAL #A #B
COMPRESS 'A' #T INTO #T LEAVING NO SPACE
END
";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          DefineData
            Variable LOCAL 1 #A (N5)
            Variable LOCAL 1 #B (N5)
            Variable LOCAL 1 #T (A20)
          Add
            Literal Integer 1
            Ref #B
            Ref #A
          Subtract
            Literal Integer 1
            Ref #A
            Ref #B
          Multiply
            Literal Integer 2
            Ref #A
          Divide
            Literal Integer 3
            Ref #A
            Ref #B
            Ref #A
          Assignment Compute rounded
            Ref #A
            Arithmetic +
              Arithmetic *
                Ref #B
                Literal Integer 2
              Literal Integer 1
          Move
            Literal String X
            Ref #T
          Reset initial
            Ref #A
            Ref #B
          Compress
            Literal String A
            Ref #T
            Ref #T
          End
        ");
    }

    #[test]
    fn test_output_skips_layout_items() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #A (A10)\nEND-DEFINE\nWRITE NOTITLE 'A' 5X #A (AD=O) / 'B'\nEND\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let NodeKind::Output { notitle, operands, .. } = parsed.tree.kind(parsed.statements()[1]) else {
            panic!("expected WRITE");
        };
        assert!(*notitle);
        assert_eq!(operands.len(), 3);
    }

    #[test]
    fn test_array_statements() {
        let source = "\
DEFINE DATA LOCAL
1 #ARR (A5/1:*)
1 #RC (I4)
END-DEFINE
RESIZE AND RESET ARRAY #ARR TO (1:10) GIVING #RC
EXPAND ARRAY #ARR TO (*:20)
REDUCE ARRAY #ARR TO 0
END
";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          DefineData
            Variable LOCAL 1 #ARR (A5/1:*)
            Variable LOCAL 1 #RC (I4)
          ResizeArray and-reset dims=1
            Ref #ARR
            Literal Integer 1
            Literal Integer 10
            Ref #RC
          ExpandArray dims=1
            Ref #ARR
            Literal Integer 20
          ReduceArray to 0
            Ref #ARR
          End
        ");
    }

    #[test]
    fn test_indexed_and_ranged_references() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #ARR (A5/1:10)\nEND-DEFINE\nWRITE #ARR(1) #ARR(2:5) #ARR(*)\nEND\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let dump = ast::dump(&parsed.tree, parsed.statements()[1]);
        assert!(dump.contains("Range _:_"), "{dump}");
        assert!(dump.contains("Range *:*"), "{dump}");
    }

    // ---- Control flow ----

    #[test]
    fn test_if_with_word_operators() {
        let source = "\
DEFINE DATA LOCAL
1 #A (N5)
1 #B (A1)
END-DEFINE
IF #A EQ 1 AND NOT #B = 'X'
  IGNORE
ELSE
  #A := 2
END-IF
END
";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          DefineData
            Variable LOCAL 1 #A (N5)
            Variable LOCAL 1 #B (A1)
          If
            Logical And
              Comparison =
                Ref #A
                Literal Integer 1
              Not
                Comparison =
                  Ref #B
                  Literal String X
            Ignore
            Assignment Bare
              Ref #A
              Literal Integer 2
          End
        ");
    }

    #[test]
    fn test_decide_on_values_and_ranges() {
        let source = "\
DEFINE DATA LOCAL
1 #A (N5)
END-DEFINE
DECIDE ON FIRST VALUE OF #A
  VALUE 1, 2
    IGNORE
  VALUE 3 : 5
    IGNORE
  NONE VALUE
    IGNORE
END-DECIDE
END
";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          DefineData
            Variable LOCAL 1 #A (N5)
          DecideOn First
            Ref #A
            Value
              Literal Integer 1
              Literal Integer 2
              Ignore
            Value
              Range _:_
                Literal Integer 3
                Literal Integer 5
              Ignore
            None
              Ignore
          End
        ");
    }

    #[test]
    fn test_decide_without_none_branch() {
        let parsed = parse_with(
            "DECIDE ON FIRST VALUE OF #A\n  VALUE 1\n    IGNORE\nEND-DECIDE\nEND\n",
            ParseOptions::default().with_unresolved_variables(false),
            None,
        );
        assert_eq!(messages(&parsed), vec!["DECIDE requires a NONE branch"]);
        assert_eq!(parsed.statements().len(), 2);
    }

    #[test]
    fn test_decide_for_conditions() {
        let source = "\
DEFINE DATA LOCAL
1 #A (N5)
END-DEFINE
DECIDE FOR EVERY CONDITION
  WHEN #A = 1
    IGNORE
  WHEN NONE
    IGNORE
END-DECIDE
END
";
        let dump = dump_str(source);
        assert!(dump.contains("DecideFor Every"), "{dump}");
        assert!(dump.contains("When"), "{dump}");
    }

    #[test]
    fn test_loops_and_escape_labels() {
        let source = "\
DEFINE DATA LOCAL
1 #I (I4)
END-DEFINE
FOR #I = 1 TO 10 STEP 2
  IGNORE
END-FOR
R1. REPEAT
  ESCAPE BOTTOM (R1.) IMMEDIATE
END-REPEAT
REPEAT UNTIL #I > 3
  #I := #I + 1
END-REPEAT
END
";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          DefineData
            Variable LOCAL 1 #I (I4)
          For
            Ref #I
            Literal Integer 1
            Literal Integer 10
            Literal Integer 2
            Ignore
          Repeat
            Escape Bottom (R1.)
          Repeat Until
            Comparison >
              Ref #I
              Literal Integer 3
            Assignment Bare
              Ref #I
              Arithmetic +
                Ref #I
                Literal Integer 1
          End
        ");
    }

    // ---- Modules and calls ----

    #[test]
    fn test_perform_binds_to_later_subroutine() {
        let source = "PERFORM MY-SUB\nDEFINE SUBROUTINE MY-SUB\n  IGNORE\nEND-SUBROUTINE\nEND\n";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          Perform MY-SUB (internal)
          DefineSubroutine MY-SUB
            Ignore
          End
        ");
    }

    #[test]
    fn test_unknown_perform_only_reported_with_index() {
        let parsed = parse_str("PERFORM ELSEWHERE\nEND\n");
        assert!(parsed.diagnostics.is_empty());

        let index = TestIndex(vec![ModuleSummary::new("ELSEWHERE", FileKind::Subroutine)]);
        let resolved = parse_with("PERFORM ELSEWHERE\nEND\n", ParseOptions::default(), Some(&index));
        assert!(resolved.diagnostics.is_empty());
        assert!(matches!(
            resolved.tree.kind(resolved.statements()[0]),
            NodeKind::Perform {
                target: PerformTarget::External(_),
                ..
            }
        ));

        let empty = TestIndex(Vec::new());
        let missing = parse_with("PERFORM NOWHERE\nEND\n", ParseOptions::default(), Some(&empty));
        assert_eq!(messages(&missing), vec!["Unresolved subroutine: NOWHERE"]);
    }

    #[test]
    fn test_callnat_resolves_literal_names() {
        let index = TestIndex(vec![ModuleSummary::new("SUBPROG", FileKind::Subprogram)]);
        let parsed = parse_with(
            "DEFINE DATA LOCAL\n1 #A (A10)\nEND-DEFINE\nCALLNAT 'SUBPROG' #A\nFETCH RETURN 'MISSING'\nEND\n",
            ParseOptions::default(),
            Some(&index),
        );
        assert_eq!(messages(&parsed), vec!["Unresolved module: MISSING"]);
        let NodeKind::Callnat {
            arguments, referenced, ..
        } = parsed.tree.kind(parsed.statements()[1])
        else {
            panic!("expected CALLNAT");
        };
        assert_eq!(arguments.len(), 1);
        assert_eq!(referenced.as_ref().map(|r| r.kind), Some(FileKind::Subprogram));
    }

    #[test]
    fn test_prototype_parameters_stay_local() {
        let source = "\
DEFINE PROTOTYPE F#ADD RETURNS (I4)
  DEFINE DATA PARAMETER
  1 #P (I4)
  END-DEFINE
END-PROTOTYPE
DEFINE DATA LOCAL
1 #R (I4)
END-DEFINE
#R := F#ADD(<1>)
END
";
        let parsed = parse_str(source);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert!(!parsed.declarations.contains_key(&VariableScope::Parameter));

        let NodeKind::DefinePrototype(prototype) = parsed.tree.kind(parsed.statements()[0]) else {
            panic!("expected prototype");
        };
        assert_eq!(prototype.parameters.len(), 1);

        let call = parsed
            .tree
            .iter()
            .find_map(|(_, node)| match &node.kind {
                NodeKind::FunctionCall { referenced, .. } => referenced.clone(),
                _ => None,
            })
            .expect("function call must reference the prototype");
        assert_eq!(call.return_type.map(|t| t.to_string()), Some("I4".to_string()));
    }

    #[test]
    fn test_function_result_name_is_not_reported() {
        let source = "DEFINE FUNCTION F#ONE\n  RETURNS (I4)\n  F#ONE := 1\nEND-FUNCTION\nEND\n";
        insta::assert_snapshot!(dump_str(source), @r"
        Module
          DefineFunction F#ONE returns (I4)
            Assignment Bare
              Ref F#ONE (unresolved)
              Literal Integer 1
          End
        ");
    }

    // ---- Operands ----

    #[test]
    fn test_system_functions_check_arity() {
        let parsed = parse_with(
            "R1. SET TIME\nWRITE *TIMD(R1.) *TRANSLATE('a', UPPER) *OCC\nEND\n",
            ParseOptions::default(),
            None,
        );
        assert_eq!(messages(&parsed), vec!["*OCC requires the parameter array"]);
        let dump = ast::dump(&parsed.tree, parsed.statements()[1]);
        assert!(dump.contains("Label R1"), "{dump}");
        assert!(dump.contains("Keyword UPPER"), "{dump}");
    }

    #[test]
    fn test_too_many_system_function_arguments() {
        let parsed = parse_str("WRITE *TRIM('a', 'b')\nEND\n");
        assert_eq!(messages(&parsed), vec!["*TRIM takes at most 1 parameter(s)"]);
    }

    #[test]
    fn test_substring_and_negative_literals() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #A (A10)\n1 #N (N5)\nEND-DEFINE\n#A := SUBSTR(#A, 2, 3)\n#N := -5\nEND\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let dump = ast::dump(&parsed.tree, parsed.root);
        assert!(dump.contains("Substring"), "{dump}");
        assert!(dump.contains("Literal Integer -5"), "{dump}");
    }

    // ---- Recovery ----

    #[test]
    fn test_bad_statement_recovers_at_next_line() {
        let parsed = parse_str("DEFINE DATA LOCAL\n1 #A (A10)\nEND-DEFINE\nMOVE TO #A\n#A := 'X'\nEND\n");
        assert_eq!(messages(&parsed), vec!["Expected operand, found 'TO'"]);
        assert_eq!(parsed.statements().len(), 3);
    }

    #[test]
    fn test_missing_end_if_is_single_error() {
        let parsed = parse_with(
            "IF #A = 1\n  IGNORE\nEND\n",
            ParseOptions::default().with_unresolved_variables(false),
            None,
        );
        assert_eq!(messages(&parsed), vec!["Expected END-IF, found end of file"]);
    }

    #[test]
    fn test_errors_inside_blocks_do_not_escape() {
        let parsed = parse_with(
            "IF #A = 1\n  ESCAPE SIDEWAYS\n  IGNORE\nEND-IF\nEND\n",
            ParseOptions::default().with_unresolved_variables(false),
            None,
        );
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.statements().len(), 2);
    }

    #[test]
    fn test_tokens_without_eof_are_accepted() {
        let mut tokens = lexer::lex("END").tokens;
        tokens.pop();
        let parsed = parse(&tokens, &ParseOptions::default(), None);
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.statements().len(), 1);
    }
}
