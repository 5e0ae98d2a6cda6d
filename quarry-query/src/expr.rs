//! Host-side predicate expressions.
//!
//! [`Expr`] is the compiler's front end: a closed union of the node
//! shapes a boolean predicate over one entity can take. The host layer
//! lowers its own predicate representation into this union (or builds
//! it directly with the fluent constructors), and [`crate::compiler`]
//! walks it with an ordinary recursive match. No reflection is
//! involved at any point; closed-over host state enters through the
//! [`Capture`] trait.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smol_str::SmolStr;

use crate::predicate::{CompareOp, Connector};
use crate::value::Value;

/// A captured host instance a predicate can read members from.
///
/// This is the seam that replaces runtime reflection: a closed-over
/// value exposes named member reads and zero-argument calls, nothing
/// else. Members may yield further instances, which is how chained
/// paths resolve.
pub trait Capture: fmt::Debug + Send + Sync {
    /// Read a named field or property.
    fn get(&self, member: &str) -> Option<Operand>;

    /// Invoke a named zero-argument method.
    fn call(&self, method: &str) -> Option<Operand>;
}

/// A constant operand: either a finished value or a captured instance
/// still awaiting member resolution.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A value from the supported set.
    Value(Value),
    /// A captured host instance.
    Instance(Arc<dyn Capture>),
}

impl Operand {
    /// Wrap a plain value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Wrap a captured instance.
    pub fn instance(instance: impl Capture + 'static) -> Self {
        Self::Instance(Arc::new(instance))
    }
}

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            // captured instances compare by pointer, not contents
            (Self::Instance(a), Self::Instance(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Operand {}

impl Hash for Operand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Value(value) => {
                0u8.hash(state);
                value.hash(state);
            }
            Self::Instance(instance) => {
                1u8.hash(state);
                (Arc::as_ptr(instance) as *const () as usize).hash(state);
            }
        }
    }
}

/// A parameterless host function producing a value when invoked.
///
/// Identity is pointer-based: two handles are the same only when they
/// share the underlying allocation.
#[derive(Clone)]
pub struct ValueFn(Arc<dyn Fn() -> Value + Send + Sync>);

impl ValueFn {
    /// Wrap a host function.
    pub fn new(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invoke the function.
    pub fn invoke(&self) -> Value {
        (self.0)()
    }

    fn ptr_usize(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ValueFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueFn(0x{:x})", self.ptr_usize())
    }
}

impl PartialEq for ValueFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ValueFn {}

impl Hash for ValueFn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr_usize().hash(state);
    }
}

/// Binary operators a host expression can carry.
///
/// Arithmetic operators are representable so the compiler can reject
/// them with a precise error instead of the host front end having to
/// pre-filter its trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// Equals.
    Eq,
    /// Not equals.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Addition (rejected by the compiler).
    Add,
    /// Subtraction (rejected by the compiler).
    Sub,
    /// Multiplication (rejected by the compiler).
    Mul,
    /// Division (rejected by the compiler).
    Div,
    /// Remainder (rejected by the compiler).
    Rem,
}

impl BinaryOp {
    /// The connector this operator maps to, if it is one.
    pub fn connector(self) -> Option<Connector> {
        match self {
            Self::And => Some(Connector::And),
            Self::Or => Some(Connector::Or),
            _ => None,
        }
    }

    /// The comparison this operator maps to, if it is one.
    pub fn compare_op(self) -> Option<CompareOp> {
        match self {
            Self::Eq => Some(CompareOp::Eq),
            Self::Ne => Some(CompareOp::Ne),
            Self::Gt => Some(CompareOp::Gt),
            Self::Gte => Some(CompareOp::Gte),
            Self::Lt => Some(CompareOp::Lt),
            Self::Lte => Some(CompareOp::Lte),
            _ => None,
        }
    }
}

/// One node of a host predicate expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Two sub-expressions joined by a binary operator.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Member access. A `None` target is rooted at the entity row and
    /// names one of its columns.
    Member {
        /// Expression the member is read from, if any.
        target: Option<Box<Expr>>,
        /// Member name.
        name: SmolStr,
    },
    /// A literal or captured constant.
    Constant(Operand),
    /// A method call on a target expression.
    Call {
        /// Expression the method is invoked on.
        target: Box<Expr>,
        /// Method name.
        method: SmolStr,
        /// Argument expressions; anything non-empty is rejected.
        args: Vec<Expr>,
    },
    /// A target-less parameterless call.
    Invoke(ValueFn),
}

impl Expr {
    /// A column of the filtered entity.
    pub fn field(name: impl Into<SmolStr>) -> Self {
        Self::Member {
            target: None,
            name: name.into(),
        }
    }

    /// A literal value.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Constant(Operand::Value(value.into()))
    }

    /// A captured host instance.
    pub fn captured(instance: impl Capture + 'static) -> Self {
        Self::Constant(Operand::instance(instance))
    }

    /// A shared captured host instance.
    pub fn captured_arc(instance: Arc<dyn Capture>) -> Self {
        Self::Constant(Operand::Instance(instance))
    }

    /// A target-less parameterless call.
    pub fn invoke(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Invoke(ValueFn::new(f))
    }

    /// Read `name` from this expression.
    pub fn member(self, name: impl Into<SmolStr>) -> Self {
        Self::Member {
            target: Some(Box::new(self)),
            name: name.into(),
        }
    }

    /// Call the zero-argument method `method` on this expression.
    pub fn call(self, method: impl Into<SmolStr>) -> Self {
        Self::Call {
            target: Box::new(self),
            method: method.into(),
            args: Vec::new(),
        }
    }

    /// Call `method` with arguments. The compiler rejects these; the
    /// shape exists so host front ends can lower faithfully and get
    /// the precise error.
    pub fn call_with(self, method: impl Into<SmolStr>, args: Vec<Expr>) -> Self {
        Self::Call {
            target: Box::new(self),
            method: method.into(),
            args,
        }
    }

    /// Join two expressions with an arbitrary operator.
    pub fn binary(op: BinaryOp, left: impl Into<Expr>, right: impl Into<Expr>) -> Self {
        Self::Binary {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    /// `self = rhs`
    pub fn eq(self, rhs: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Eq, self, rhs)
    }

    /// `self != rhs`
    pub fn ne(self, rhs: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Ne, self, rhs)
    }

    /// `self > rhs`
    pub fn gt(self, rhs: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Gt, self, rhs)
    }

    /// `self >= rhs`
    pub fn gte(self, rhs: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Gte, self, rhs)
    }

    /// `self < rhs`
    pub fn lt(self, rhs: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    /// `self <= rhs`
    pub fn lte(self, rhs: impl Into<Expr>) -> Self {
        Self::binary(BinaryOp::Lte, self, rhs)
    }

    /// `self && rhs`
    pub fn and(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::And, self, rhs)
    }

    /// `self || rhs`
    pub fn or(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Or, self, rhs)
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::value(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::value(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::value(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::value(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::value(value)
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::value(value)
    }
}
