use la_arena::{Arena, Idx};
use smol_str::SmolStr;

// ── Spans ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A name together with the span it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub value: SmolStr,
    pub span: Span,
}

impl Ident {
    pub fn new(value: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}

// ── ID types ──────────────────────────────────────────────────────

pub type TypeExprId = Idx<TypeExpr>;
pub type ExprId = Idx<Expr>;

// ── Module ────────────────────────────────────────────────────────

/// A parsed compilation unit: the root namespace plus the arenas its
/// type expressions and expressions live in.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub root: ParsedNamespace,
    pub type_exprs: Arena<TypeExpr>,
    pub exprs: Arena<Expr>,
}

impl ParsedModule {
    pub fn new() -> Self {
        Self {
            root: ParsedNamespace::default(),
            type_exprs: Arena::new(),
            exprs: Arena::new(),
        }
    }

    pub fn alloc_type(&mut self, kind: TypeExprKind, span: Span) -> TypeExprId {
        self.type_exprs.alloc(TypeExpr { kind, span })
    }

    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.exprs.alloc(Expr { kind, span })
    }

    /// Shorthand for a bare type name such as `Point` or `T`.
    pub fn named_type(&mut self, name: impl Into<SmolStr>, span: Span) -> TypeExprId {
        self.alloc_type(TypeExprKind::Name(name.into()), span)
    }

    /// Shorthand for `Name<args...>`.
    pub fn generic_type(
        &mut self,
        name: impl Into<SmolStr>,
        args: Vec<TypeExprId>,
        span: Span,
    ) -> TypeExprId {
        self.alloc_type(
            TypeExprKind::Generic {
                name: name.into(),
                args,
            },
            span,
        )
    }
}

impl Default for ParsedModule {
    fn default() -> Self {
        Self::new()
    }
}

// ── Declarations ──────────────────────────────────────────────────

/// `namespace name { ... }`. The root namespace has no name.
#[derive(Debug, Clone, Default)]
pub struct ParsedNamespace {
    pub name: Option<SmolStr>,
    pub namespaces: Vec<ParsedNamespace>,
    pub objects: Vec<ParsedObject>,
}

impl ParsedNamespace {
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Record declaration: `struct Name<T, U> { fields... methods... }`
#[derive(Debug, Clone)]
pub struct ParsedObject {
    pub id: Ident,
    pub generic_params: Vec<GenericParameter>,
    pub fields: Vec<ParsedField>,
    pub methods: Vec<ParsedMethod>,
    pub span: Span,
}

impl ParsedObject {
    pub fn new(id: Ident) -> Self {
        let span = id.span;
        Self {
            id,
            generic_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenericParameter {
    pub id: Ident,
}

#[derive(Debug, Clone)]
pub struct ParsedField {
    pub id: Ident,
    pub type_ann: TypeExprId,
}

/// Method declaration inside a record. The body is kept but never checked
/// by declaration checking.
#[derive(Debug, Clone)]
pub struct ParsedMethod {
    pub id: Ident,
    pub generic_params: Vec<GenericParameter>,
    pub parameters: Vec<ParsedParameter>,
    pub ret_type: Option<TypeExprId>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl ParsedMethod {
    pub fn new(id: Ident) -> Self {
        let span = id.span;
        Self {
            id,
            generic_params: Vec::new(),
            parameters: Vec::new(),
            ret_type: None,
            body: Vec::new(),
            span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParsedParameter {
    pub id: Ident,
    pub type_ann: TypeExprId,
    pub requires_label: bool,
}

// ── Statements ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Nested record declaration.
    Object(Box<ParsedObject>),
    /// `interface Name { ... }`
    Interface(Ident),
    /// Nested function declaration.
    Fun(Box<ParsedMethod>),
    /// `let name: T = init`
    Var {
        id: Ident,
        type_ann: TypeExprId,
        init: ExprId,
    },
    Return(Option<ExprId>),
    Expr(ExprId),
}

impl StmtKind {
    /// Human-readable kind name, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Object(_) => "record declaration",
            StmtKind::Interface(_) => "interface declaration",
            StmtKind::Fun(_) => "function declaration",
            StmtKind::Var { .. } => "variable declaration",
            StmtKind::Return(_) => "return",
            StmtKind::Expr(_) => "expression",
        }
    }
}

// ── Expressions ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Null,
    Id(SmolStr),
    Int(i64),
    Str(SmolStr),
    /// `callee(label: arg, ...)`
    Call { callee: Ident, args: Vec<CallArg> },
    /// `base[index]`
    Index { base: ExprId, index: ExprId },
    /// Explicitly instantiated name: `Name<A, B>`
    Generic { id: Ident, args: Vec<TypeExprId> },
    Unary { op: UnaryOp, operand: ExprId },
    Binary { op: BinaryOp, lhs: ExprId, rhs: ExprId },
    If {
        cond: ExprId,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    /// `base.field`
    Access { base: ExprId, field: Ident },
    Switch { scrutinee: ExprId, cases: Vec<SwitchCase> },
    UnsafeBlock(Vec<Stmt>),
}

impl ExprKind {
    /// Human-readable kind name, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Null => "null",
            ExprKind::Id(_) => "identifier",
            ExprKind::Int(_) => "integer literal",
            ExprKind::Str(_) => "string literal",
            ExprKind::Call { .. } => "call",
            ExprKind::Index { .. } => "index",
            ExprKind::Generic { .. } => "generic instantiation",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Binary { .. } => "binary",
            ExprKind::If { .. } => "if",
            ExprKind::Access { .. } => "member access",
            ExprKind::Switch { .. } => "switch",
            ExprKind::UnsafeBlock(_) => "unsafe block",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallArg {
    pub label: Option<Ident>,
    pub value: ExprId,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// `None` for the `default` arm.
    pub pattern: Option<ExprId>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    AddressOf,
    Deref,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Gt,
    And,
    Or,
    Assign,
}

// ── Type expressions ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// No annotation written; the type is to be inferred later.
    Undetermined,
    /// Bare name: `Point`, `T`
    Name(SmolStr),
    /// `String`
    Str,
    /// `Int`
    Int,
    /// `[T]`
    Array(TypeExprId),
    /// `weak T`
    Weak(TypeExprId),
    /// `raw T`
    Raw(TypeExprId),
    /// `T?`
    Optional(TypeExprId),
    /// `Name<A, B>`
    Generic { name: SmolStr, args: Vec<TypeExprId> },
}
