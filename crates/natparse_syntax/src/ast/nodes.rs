// Node kinds. Every variant lists its children in `NodeKind::children`; lookup links are excluded there.

use natparse_core::lang::keywords::KeywordId;
use natparse_core::lang::operators::OperatorId;
use natparse_core::lang::system_vars::SystemVarId;
use natparse_core::{DataType, FileKind, VariableScope};

use super::NodeId;

/// A module another node refers to, as resolved against the module index.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRef {
    pub name: String,
    pub kind: FileKind,
    /// Declared return type, for functions.
    pub return_type: Option<DataType>,
}

// ============================================================================
// Node kinds
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Module {
        statements: Vec<NodeId>,
    },

    // ---- Data definition ----
    /// `DEFINE DATA ... END-DEFINE`; items are `Using` and level-1 `Variable` nodes in source order.
    DefineData {
        items: Vec<NodeId>,
    },
    Using(Using),
    Variable(VariableDecl),
    Redefine(Redefine),
    /// `FILLER nX` inside a REDEFINE.
    Filler {
        bytes: u32,
    },

    // ---- Statements ----
    Examine(Examine),
    ParseJson(ParseStatement),
    ParseXml(ParseStatement),
    DecideOn {
        mode: DecideMode,
        operand: NodeId,
        branches: Vec<NodeId>,
    },
    DecideFor {
        mode: DecideMode,
        branches: Vec<NodeId>,
    },
    DecideBranch {
        kind: BranchKind,
        body: Vec<NodeId>,
    },
    If {
        condition: NodeId,
        then_body: Vec<NodeId>,
        else_body: Vec<NodeId>,
    },
    For {
        variable: NodeId,
        from: NodeId,
        to: NodeId,
        step: Option<NodeId>,
        body: Vec<NodeId>,
    },
    Repeat {
        head: Option<LoopCondition>,
        tail: Option<LoopCondition>,
        body: Vec<NodeId>,
    },
    ResizeArray(ArrayResize),
    ExpandArray(ArrayResize),
    ReduceArray(ArrayResize),
    DefinePrototype(Prototype),
    DefineFunction {
        name: String,
        return_type: Option<DataType>,
        body: Vec<NodeId>,
    },
    DefineSubroutine {
        name: String,
        body: Vec<NodeId>,
    },
    Perform {
        name: String,
        target: PerformTarget,
        arguments: Vec<NodeId>,
    },
    Callnat {
        module: NodeId,
        arguments: Vec<NodeId>,
        referenced: Option<ModuleRef>,
    },
    Fetch {
        mode: FetchMode,
        module: NodeId,
        arguments: Vec<NodeId>,
        referenced: Option<ModuleRef>,
    },
    Include {
        name: String,
        arguments: Vec<NodeId>,
        referenced: Option<ModuleRef>,
    },
    Assignment {
        kind: AssignmentKind,
        rounded: bool,
        target: NodeId,
        value: NodeId,
    },
    Move {
        rounded: bool,
        source: NodeId,
        targets: Vec<NodeId>,
    },
    Reset {
        initial: bool,
        targets: Vec<NodeId>,
    },
    ArithmeticStatement(ArithmeticStatement),
    Output {
        kind: OutputKind,
        notitle: bool,
        operands: Vec<NodeId>,
    },
    Compress(Compress),
    Escape {
        kind: EscapeKind,
        label: Option<String>,
    },
    Ignore,
    SetTime {
        label: Option<String>,
    },
    End,
    Stop,

    // ---- Operands ----
    VariableReference(VariableReference),
    Literal(Literal),
    Arithmetic {
        op: ArithmeticOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Negation {
        operand: NodeId,
    },
    /// `SUBSTR(operand, start, length)`.
    Substring {
        operand: NodeId,
        start: Option<NodeId>,
        length: Option<NodeId>,
    },
    SystemVariable {
        id: SystemVarId,
    },
    SystemFunctionCall {
        id: SystemVarId,
        arguments: Vec<NodeId>,
    },
    /// Call of a user-defined function (`F#NAME(<...>)`).
    FunctionCall {
        name: String,
        arguments: Vec<NodeId>,
        referenced: Option<ModuleRef>,
    },
    /// Index range `lower:upper`; `None` bounds are written `*`.
    RangedAccess {
        lower: Option<NodeId>,
        upper: Option<NodeId>,
    },
    /// `(R1.)` style reference to a statement label.
    LabelReference {
        label: String,
    },
    /// A keyword standing in for a value (`SPACE`).
    KeywordOperand {
        keyword: KeywordId,
    },
    Comparison {
        op: OperatorId,
        lhs: NodeId,
        rhs: NodeId,
    },
    Logical {
        op: LogicalOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Not {
        operand: NodeId,
    },
}

// ============================================================================
// Data definition payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Using {
    pub scope: VariableScope,
    pub module: String,
    pub referenced: Option<ModuleRef>,
    /// Declarations imported from the referenced data area.
    pub variables: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub level: u32,
    pub scope: VariableScope,
    pub name: String,
    /// Name qualified with every enclosing group (`#GRP.#FIELD`).
    pub qualified_name: String,
    /// Groups carry the untyped format; their dimensions still live here.
    pub ty: DataType,
    pub is_group: bool,
    pub members: Vec<NodeId>,
    pub redefinitions: Vec<NodeId>,
    /// `INIT <...>` or `CONST <...>` values.
    pub initial: Vec<NodeId>,
    /// Declared by a resolved `USING` rather than in this module.
    pub imported: bool,
    /// `VIEW OF <ddm>`.
    pub view_of: Option<String>,
}

impl VariableDecl {
    pub fn is_array(&self) -> bool {
        self.ty.is_array()
    }

    pub fn is_constant(&self) -> bool {
        self.ty.constant
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Redefine {
    pub target: String,
    pub target_decl: Option<NodeId>,
    /// `Variable` and `Filler` nodes.
    pub members: Vec<NodeId>,
}

// ============================================================================
// Statement payloads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamineDirection {
    Forward,
    Backward,
    /// `DIRECTION #D`: decided at runtime.
    Dynamic(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateMode {
    Upper,
    Lower,
    Using { inverted: bool, table: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamineAction {
    Replace { first: bool, full: bool, with: NodeId },
    Delete { first: bool },
    Translate(TranslateMode),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamineGivings {
    pub number: Option<NodeId>,
    pub position: Option<NodeId>,
    pub length: Option<NodeId>,
    pub index: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Examine {
    pub direction: ExamineDirection,
    pub full: bool,
    pub operand: NodeId,
    pub start_position: Option<NodeId>,
    pub end_position: Option<NodeId>,
    pub pattern: Option<NodeId>,
    pub pattern_full: bool,
    /// `PATTERN` keyword: wildcard matching.
    pub is_pattern: bool,
    /// `WITH DELIMITERS [op]`; `Some(None)` uses the default delimiters.
    pub delimiters: Option<Option<NodeId>>,
    pub char_position: Option<NodeId>,
    pub char_length: Option<NodeId>,
    pub action: Option<ExamineAction>,
    pub givings: ExamineGivings,
}

/// `PARSE JSON` / `PARSE XML`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseStatement {
    pub source: NodeId,
    pub path: Option<NodeId>,
    pub name: Option<NodeId>,
    pub value: Option<NodeId>,
    pub giving: Option<NodeId>,
    pub subcode: Option<NodeId>,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecideMode {
    First,
    Every,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BranchKind {
    Value(Vec<NodeId>),
    When(NodeId),
    Any,
    All,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopConditionKind {
    While,
    Until,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopCondition {
    pub kind: LoopConditionKind,
    pub condition: NodeId,
}

/// One `(lower:upper)` entry of a RESIZE/EXPAND/REDUCE dimension list; `None` bounds are `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDimension {
    pub lower: Option<NodeId>,
    pub upper: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayResize {
    pub and_reset: bool,
    pub array: NodeId,
    /// Empty for `TO 0`.
    pub dimensions: Vec<ResizeDimension>,
    pub giving: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    /// `DEFINE PROTOTYPE VARIABLE`: the name is a variable holding the function name.
    pub is_variable: bool,
    pub return_type: Option<DataType>,
    /// Parameter `Variable` nodes.
    pub parameters: Vec<NodeId>,
    pub referenced: Option<ModuleRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PerformTarget {
    /// Defined in this module.
    Internal(NodeId),
    External(ModuleRef),
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Plain,
    Return,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    /// `#A := 1`
    Bare,
    Assign,
    Compute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticVerb {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// `ADD`/`SUBTRACT`/`MULTIPLY`/`DIVIDE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticStatement {
    pub verb: ArithmeticVerb,
    pub rounded: bool,
    pub operands: Vec<NodeId>,
    pub target: NodeId,
    pub giving: Option<NodeId>,
    pub remainder: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Write,
    Display,
    Print,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compress {
    pub numeric: bool,
    pub full: bool,
    pub operands: Vec<NodeId>,
    pub target: NodeId,
    pub leaving_no_space: bool,
    /// `WITH [ALL] DELIMITERS [op]`; `Some(None)` uses the default delimiter.
    pub delimiters: Option<Option<NodeId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    Top,
    Bottom,
    Routine,
    Module,
}

// ============================================================================
// Operand payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct VariableReference {
    pub name: String,
    pub indices: Vec<NodeId>,
    pub declaration: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Integer,
    Decimal,
    Hex,
    Date,
    Time,
    Unicode,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Value with quotes and escapes removed; numbers keep their sign.
    pub value: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl ArithmeticOp {
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        match id {
            OperatorId::Plus => Some(ArithmeticOp::Add),
            OperatorId::Minus => Some(ArithmeticOp::Subtract),
            OperatorId::Star => Some(ArithmeticOp::Multiply),
            OperatorId::Slash => Some(ArithmeticOp::Divide),
            OperatorId::StarStar => Some(ArithmeticOp::Power),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Power => "**",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

// ============================================================================
// Structure
// ============================================================================

fn push_opt(out: &mut Vec<NodeId>, id: Option<NodeId>) {
    out.extend(id);
}

impl NodeKind {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::Module { statements } => out.extend(statements),
            NodeKind::DefineData { items } => out.extend(items),
            NodeKind::Using(using) => out.extend(&using.variables),
            NodeKind::Variable(decl) => {
                out.extend(&decl.initial);
                out.extend(&decl.members);
                out.extend(&decl.redefinitions);
            }
            NodeKind::Redefine(redefine) => out.extend(&redefine.members),
            NodeKind::Examine(examine) => {
                if let ExamineDirection::Dynamic(d) = examine.direction {
                    out.push(d);
                }
                out.push(examine.operand);
                push_opt(&mut out, examine.start_position);
                push_opt(&mut out, examine.end_position);
                push_opt(&mut out, examine.pattern);
                push_opt(&mut out, examine.delimiters.flatten());
                push_opt(&mut out, examine.char_position);
                push_opt(&mut out, examine.char_length);
                match examine.action {
                    Some(ExamineAction::Replace { with, .. }) => out.push(with),
                    Some(ExamineAction::Translate(TranslateMode::Using { table, .. })) => out.push(table),
                    _ => {}
                }
                push_opt(&mut out, examine.givings.number);
                push_opt(&mut out, examine.givings.position);
                push_opt(&mut out, examine.givings.length);
                out.extend(&examine.givings.index);
            }
            NodeKind::ParseJson(parse) | NodeKind::ParseXml(parse) => {
                out.push(parse.source);
                push_opt(&mut out, parse.path);
                push_opt(&mut out, parse.name);
                push_opt(&mut out, parse.value);
                push_opt(&mut out, parse.giving);
                push_opt(&mut out, parse.subcode);
                out.extend(&parse.body);
            }
            NodeKind::DecideOn { operand, branches, .. } => {
                out.push(*operand);
                out.extend(branches);
            }
            NodeKind::DecideFor { branches, .. } => out.extend(branches),
            NodeKind::DecideBranch { kind, body } => {
                match kind {
                    BranchKind::Value(values) => out.extend(values),
                    BranchKind::When(condition) => out.push(*condition),
                    BranchKind::Any | BranchKind::All | BranchKind::None => {}
                }
                out.extend(body);
            }
            NodeKind::If {
                condition,
                then_body,
                else_body,
            } => {
                out.push(*condition);
                out.extend(then_body);
                out.extend(else_body);
            }
            NodeKind::For {
                variable,
                from,
                to,
                step,
                body,
            } => {
                out.extend([*variable, *from, *to]);
                push_opt(&mut out, *step);
                out.extend(body);
            }
            NodeKind::Repeat { head, tail, body } => {
                push_opt(&mut out, head.map(|c| c.condition));
                out.extend(body);
                push_opt(&mut out, tail.map(|c| c.condition));
            }
            NodeKind::ResizeArray(resize) | NodeKind::ExpandArray(resize) | NodeKind::ReduceArray(resize) => {
                out.push(resize.array);
                for dim in &resize.dimensions {
                    push_opt(&mut out, dim.lower);
                    push_opt(&mut out, dim.upper);
                }
                push_opt(&mut out, resize.giving);
            }
            NodeKind::DefinePrototype(prototype) => out.extend(&prototype.parameters),
            NodeKind::DefineFunction { body, .. } | NodeKind::DefineSubroutine { body, .. } => out.extend(body),
            NodeKind::Perform { arguments, .. } | NodeKind::Include { arguments, .. } => out.extend(arguments),
            NodeKind::Callnat { module, arguments, .. } | NodeKind::Fetch { module, arguments, .. } => {
                out.push(*module);
                out.extend(arguments);
            }
            NodeKind::Assignment { target, value, .. } => out.extend([*target, *value]),
            NodeKind::Move { source, targets, .. } => {
                out.push(*source);
                out.extend(targets);
            }
            NodeKind::Reset { targets, .. } => out.extend(targets),
            NodeKind::ArithmeticStatement(stmt) => {
                out.extend(&stmt.operands);
                out.push(stmt.target);
                push_opt(&mut out, stmt.giving);
                push_opt(&mut out, stmt.remainder);
            }
            NodeKind::Output { operands, .. } => out.extend(operands),
            NodeKind::Compress(compress) => {
                out.extend(&compress.operands);
                out.push(compress.target);
                push_opt(&mut out, compress.delimiters.flatten());
            }
            NodeKind::VariableReference(reference) => out.extend(&reference.indices),
            NodeKind::Arithmetic { lhs, rhs, .. }
            | NodeKind::Comparison { lhs, rhs, .. }
            | NodeKind::Logical { lhs, rhs, .. } => out.extend([*lhs, *rhs]),
            NodeKind::Negation { operand } | NodeKind::Not { operand } => out.push(*operand),
            NodeKind::Substring { operand, start, length } => {
                out.push(*operand);
                push_opt(&mut out, *start);
                push_opt(&mut out, *length);
            }
            NodeKind::SystemFunctionCall { arguments, .. } | NodeKind::FunctionCall { arguments, .. } => {
                out.extend(arguments)
            }
            NodeKind::RangedAccess { lower, upper } => {
                push_opt(&mut out, *lower);
                push_opt(&mut out, *upper);
            }
            NodeKind::Filler { .. }
            | NodeKind::Escape { .. }
            | NodeKind::Ignore
            | NodeKind::SetTime { .. }
            | NodeKind::End
            | NodeKind::Stop
            | NodeKind::Literal(_)
            | NodeKind::SystemVariable { .. }
            | NodeKind::LabelReference { .. }
            | NodeKind::KeywordOperand { .. } => {}
        }
        out
    }

    /// Return `true` for operand kinds (anything that can appear as a statement argument).
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            NodeKind::VariableReference(_)
                | NodeKind::Literal(_)
                | NodeKind::Arithmetic { .. }
                | NodeKind::Negation { .. }
                | NodeKind::Substring { .. }
                | NodeKind::SystemVariable { .. }
                | NodeKind::SystemFunctionCall { .. }
                | NodeKind::FunctionCall { .. }
                | NodeKind::RangedAccess { .. }
                | NodeKind::LabelReference { .. }
                | NodeKind::KeywordOperand { .. }
                | NodeKind::Comparison { .. }
                | NodeKind::Logical { .. }
                | NodeKind::Not { .. }
        )
    }

    /// Return `true` for RESIZE, EXPAND and REDUCE ARRAY.
    pub fn is_array_resize(&self) -> bool {
        matches!(
            self,
            NodeKind::ResizeArray(_) | NodeKind::ExpandArray(_) | NodeKind::ReduceArray(_)
        )
    }
}
