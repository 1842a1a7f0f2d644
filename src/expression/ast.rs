//! Predicate expression tree
//!
//! Nodes are immutable. Children are reference counted so a sub-tree can
//! be shared between several parents and visited more than once.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use super::types::{DeclaringKind, ExprType};

/// Shared handle to an expression node
pub type ExprRef = Arc<Expr>;

static NEXT_PARAMETER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a lambda parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterId(u64);

impl ParameterId {
    fn next() -> Self {
        ParameterId(NEXT_PARAMETER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    AndAlso,
    OrElse,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::AndAlso => "&&",
            BinaryOp::OrElse => "||",
        }
    }

    /// Returns the comparison that holds with operands swapped
    pub fn mirrored(&self) -> Self {
        match self {
            BinaryOp::Gt => BinaryOp::Lt,
            BinaryOp::Gte => BinaryOp::Lte,
            BinaryOp::Lt => BinaryOp::Gt,
            BinaryOp::Lte => BinaryOp::Gte,
            other => *other,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation
    Not,
    /// Type cast; wraps enum members in comparisons
    Convert,
    /// Arithmetic negation
    Negate,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "Not",
            UnaryOp::Convert => "Convert",
            UnaryOp::Negate => "Negate",
        }
    }
}

/// A lambda parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: ParameterId,
    pub name: String,
    pub ty: ExprType,
}

impl Parameter {
    /// Creates a parameter with a fresh identity
    pub fn new(name: impl Into<String>, ty: ExprType) -> Self {
        Self {
            id: ParameterId::next(),
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodCall {
    /// Receiver of an instance call; `None` for static calls
    pub target: Option<ExprRef>,
    pub method: String,
    pub declaring: DeclaringKind,
    pub arguments: Vec<ExprRef>,
    pub ty: ExprType,
}

#[derive(Debug, Clone)]
pub struct Constant {
    pub value: Value,
    pub ty: ExprType,
}

#[derive(Debug, Clone)]
pub struct MemberAccess {
    pub target: ExprRef,
    pub member: String,
    pub ty: ExprType,
}

#[derive(Debug, Clone)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: ExprRef,
    pub right: ExprRef,
}

#[derive(Debug, Clone)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: ExprRef,
    pub ty: ExprType,
}

#[derive(Debug, Clone)]
pub struct Lambda {
    pub parameters: Vec<Parameter>,
    pub body: ExprRef,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub lambda: ExprRef,
    pub arguments: Vec<ExprRef>,
}

/// A host value captured when the predicate was built.
///
/// The closure is invoked at translation time to obtain a literal.
#[derive(Clone)]
pub struct Captured {
    pub name: String,
    pub ty: ExprType,
    eval: Arc<dyn Fn() -> Value + Send + Sync>,
}

impl Captured {
    pub fn new(
        name: impl Into<String>,
        ty: ExprType,
        eval: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            ty,
            eval: Arc::new(eval),
        }
    }

    /// Invokes the captured closure
    pub fn evaluate(&self) -> Value {
        (self.eval)()
    }
}

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Captured")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

/// A predicate expression node
#[derive(Debug, Clone)]
pub enum Expr {
    MethodCall(MethodCall),
    Constant(Constant),
    MemberAccess(MemberAccess),
    Binary(Binary),
    Unary(Unary),
    Lambda(Lambda),
    Invocation(Invocation),
    Parameter(Parameter),
    ArrayLiteral(Vec<ExprRef>),
    /// Quoting wrapper around a lambda passed to a query operator
    Quote(ExprRef),
    Captured(Captured),
}

/// Member chain rooted at a parameter, e.g. `a.Supplier.Name`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberPath<'a> {
    pub root: &'a Parameter,
    pub segments: Vec<&'a str>,
}

impl MemberPath<'_> {
    /// Dot-joined member names, without the root parameter
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl Expr {
    /// Node kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::MethodCall(_) => "MethodCall",
            Expr::Constant(_) => "Constant",
            Expr::MemberAccess(_) => "MemberAccess",
            Expr::Binary(_) => "Binary",
            Expr::Unary(_) => "Unary",
            Expr::Lambda(_) => "Lambda",
            Expr::Invocation(_) => "Invocation",
            Expr::Parameter(_) => "Parameter",
            Expr::ArrayLiteral(_) => "ArrayLiteral",
            Expr::Quote(_) => "Quote",
            Expr::Captured(_) => "Captured",
        }
    }

    /// Static type of the node
    pub fn ty(&self) -> ExprType {
        match self {
            Expr::MethodCall(call) => call.ty.clone(),
            Expr::Constant(c) => c.ty.clone(),
            Expr::MemberAccess(m) => m.ty.clone(),
            Expr::Binary(_) => ExprType::Bool,
            Expr::Unary(u) => u.ty.clone(),
            Expr::Lambda(_) | Expr::Invocation(_) => ExprType::Object,
            Expr::Parameter(p) => p.ty.clone(),
            Expr::ArrayLiteral(_) => ExprType::collection_of(ExprType::Object),
            Expr::Quote(inner) => inner.ty(),
            Expr::Captured(c) => c.ty.clone(),
        }
    }

    /// Removes any quoting wrappers
    pub fn strip_quotes(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Quote(inner) = expr {
            expr = inner;
        }
        expr
    }

    /// Returns the lambda behind any quoting wrappers
    pub fn as_lambda(&self) -> Option<&Lambda> {
        match self.strip_quotes() {
            Expr::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }

    /// Returns the member chain of this node if it is rooted at a parameter.
    ///
    /// `Convert` wrappers are transparent, and a `Select(source, x => x.M)`
    /// projection extends the source path with the projected members.
    pub fn member_path(&self) -> Option<MemberPath<'_>> {
        match self {
            Expr::Parameter(p) => Some(MemberPath {
                root: p,
                segments: Vec::new(),
            }),
            Expr::MemberAccess(m) => {
                let mut path = m.target.member_path()?;
                path.segments.push(&m.member);
                Some(path)
            }
            Expr::Unary(Unary {
                op: UnaryOp::Convert,
                operand,
                ..
            }) => operand.member_path(),
            Expr::MethodCall(call) if call.method == "Select" && call.arguments.len() == 2 => {
                let mut path = call.arguments[0].member_path()?;
                let projection = call.arguments[1].as_lambda()?.body.member_path()?;
                path.segments.extend(projection.segments);
                Some(path)
            }
            _ => None,
        }
    }

    /// Returns the enum operand type when this node is a cast over an enum
    pub fn converted_enum(&self) -> Option<&ExprType> {
        match self {
            Expr::Unary(Unary {
                op: UnaryOp::Convert,
                operand,
                ..
            }) => match operand.as_ref() {
                Expr::MemberAccess(m) if m.ty.as_enum().is_some() => Some(&m.ty),
                Expr::Parameter(p) if p.ty.as_enum().is_some() => Some(&p.ty),
                _ => None,
            },
            _ => None,
        }
    }
}
