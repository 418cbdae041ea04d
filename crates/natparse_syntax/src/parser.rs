//! Parser for Natural modules
//!
//! Converts a token stream into an arena [`SyntaxTree`], binding variable references to their declarations as it
//! goes and queueing [`OperandCheck`]s for the operand checker.
//!
//! Parsing never fails as a whole. A statement that violates the grammar is reported and skipped up to the next
//! statement boundary; semantically wrong but well-formed operands stay in the tree and are judged later.
//!
//! ## Examples
//!
//! ```rust
//! use natparse_syntax::{lexer, parser};
//!
//! let source = "DEFINE DATA LOCAL\n1 #A (N5)\nEND-DEFINE\n#A := 1\nEND\n";
//! let lexed = lexer::lex(source);
//! let parsed = parser::parse(&lexed.tokens, &parser::ParseOptions::default(), None);
//! assert!(parsed.diagnostics.is_empty());
//! assert_eq!(parsed.statements().len(), 3);
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::ast::*;
use crate::diagnostics::{Diagnostic, errors};
use crate::lexer::{LiteralPrefix, Token, TokenKind};
use crate::module_index::{DeclaredVariable, ModuleIndex};
use crate::operand_check::{BinaryMode, OperandCheck};
use natparse_core::lang::builtins;
use natparse_core::lang::keywords::{self, KeywordId};
use natparse_core::lang::operand_definitions::OperandDefinitions as D;
use natparse_core::lang::operators::{self, OperatorId};
use natparse_core::lang::punctuation::PunctuationId;
use natparse_core::lang::system_vars::{self, SystemVarId};
use natparse_core::{DataType, Dimension, FileKind, VariableScope};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/define_data.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/control.rs");
include!("parser/examine.rs");
include!("parser/modules.rs");
include!("parser/operands.rs");
include!("parser/resolve.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
