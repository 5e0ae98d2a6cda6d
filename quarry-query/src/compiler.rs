//! Lowering host predicate expressions into filter trees.
//!
//! The entry point is [`compile`]. The walk mirrors the shape of the
//! input: connectors recurse into both children and produce a
//! [`CombinedFilter`]; comparisons resolve their left side to a field
//! name and their right side to a value and produce a single-predicate
//! [`SingleFilter`]. Resolution state lives in a [`BranchResolver`]
//! created fresh for every comparison side, so nothing leaks between
//! siblings.
//!
//! [`CombinedFilter`]: crate::filter::CombinedFilter

use std::sync::Arc;

use smol_str::SmolStr;
use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::expr::{Capture, Expr, Operand};
use crate::filter::{QueryFilter, SingleFilter};
use crate::predicate::FieldPredicate;
use crate::value::Value;

/// Compile a predicate expression into a filter tree.
///
/// The root must be a binary node, either a connector or one of the
/// six comparisons; any other root fails with
/// [`QueryError::UnsupportedPredicate`]. The walk is pure and total:
/// ill-formed input fails, it never loops.
///
/// # Example
///
/// ```rust
/// use quarry_query::compiler::compile;
/// use quarry_query::expr::Expr;
///
/// let predicate = Expr::field("age").gte(21).and(Expr::field("name").eq("alice"));
/// let filter = compile(&predicate).unwrap();
/// assert_eq!(filter.predicate_count(), 2);
/// ```
pub fn compile(expr: &Expr) -> QueryResult<QueryFilter> {
    let filter = compile_node(expr)?;
    debug!(predicates = filter.predicate_count(), "compiled predicate");
    Ok(filter)
}

fn compile_node(expr: &Expr) -> QueryResult<QueryFilter> {
    let Expr::Binary { op, left, right } = expr else {
        return Err(QueryError::unsupported_predicate(format!(
            "expected a comparison or connector, found a {} node",
            node_kind(expr)
        )));
    };

    if let Some(connector) = op.connector() {
        let left = compile_node(left)?;
        let right = compile_node(right)?;
        return Ok(QueryFilter::combine(left, right, connector));
    }

    let Some(compare) = op.compare_op() else {
        return Err(QueryError::unsupported_predicate(format!(
            "binary operator {op:?} has no SQL comparison form"
        )));
    };

    let field = BranchResolver::default().into_field(left)?;
    let value = BranchResolver::default().into_value(right)?;

    let mut single = SingleFilter::new();
    single.insert(FieldPredicate::new(field, compare, value));
    Ok(QueryFilter::Single(single))
}

/// Resolution state for one side of one comparison.
///
/// `captured` is the first member name seen while walking outward-in;
/// on a field side it becomes the recorded field name, on a value side
/// it is consumed as the member to read from the root constant. The
/// resolver is never reused across sides.
#[derive(Default)]
struct BranchResolver {
    captured: Option<SmolStr>,
}

impl BranchResolver {
    /// Resolve a comparison's left side to the field it names.
    fn into_field(mut self, expr: &Expr) -> QueryResult<SmolStr> {
        match self.resolve(expr)? {
            None => self.captured.ok_or_else(|| {
                QueryError::unsupported_predicate(
                    "comparison side resolved to neither a field nor a value",
                )
            }),
            Some(_) => Err(QueryError::unsupported_predicate(
                "left side of a comparison must name an entity field",
            )),
        }
    }

    /// Resolve a comparison's right side to a concrete value.
    fn into_value(mut self, expr: &Expr) -> QueryResult<Value> {
        match self.resolve(expr)? {
            Some(operand) => into_whitelisted(operand),
            // the side named a field; there is nothing to bind
            None => Ok(Value::Null),
        }
    }

    /// Walk one node. `Ok(Some)` is a produced operand, `Ok(None)`
    /// means the side named a field instead.
    fn resolve(&mut self, expr: &Expr) -> QueryResult<Option<Operand>> {
        match expr {
            Expr::Member { target: None, name } => {
                self.capture(name);
                Ok(None)
            }
            Expr::Member {
                target: Some(target),
                name,
            } => match target.as_ref() {
                // chained path: the outermost name wins, inner names
                // are skipped on the way to the root
                Expr::Member { .. } | Expr::Constant(_) => {
                    self.capture(name);
                    self.resolve(target)
                }
                other => Err(QueryError::unsupported_predicate(format!(
                    "member `{name}` read from a {} node",
                    node_kind(other)
                ))),
            },
            Expr::Constant(operand) => match self.captured.take() {
                None => Ok(Some(operand.clone())),
                // the constant is the instance for the pending read
                Some(name) => read_member(operand, &name).map(Some),
            },
            Expr::Call {
                target,
                method,
                args,
            } => {
                if !args.is_empty() {
                    return Err(QueryError::unsupported_call(method.as_str(), args.len()));
                }
                let instance = self.resolve_call_target(target, method)?;
                let operand = instance.call(method).ok_or_else(|| {
                    QueryError::unsupported_constant(format!(
                        "captured instance has no zero-argument method `{method}`"
                    ))
                })?;
                Ok(Some(operand))
            }
            Expr::Invoke(f) => Ok(Some(Operand::Value(f.invoke()))),
            Expr::Binary { op, .. } => Err(QueryError::unsupported_predicate(format!(
                "binary operator {op:?} nested inside a comparison side"
            ))),
        }
    }

    /// Resolve a call target down to a captured instance.
    fn resolve_call_target(
        &mut self,
        target: &Expr,
        method: &str,
    ) -> QueryResult<Arc<dyn Capture>> {
        match self.resolve(target)? {
            Some(Operand::Instance(instance)) => Ok(instance),
            Some(Operand::Value(value)) => Err(QueryError::unsupported_constant(format!(
                "cannot call `{method}` on a {} value",
                value.kind()
            ))),
            None => Err(QueryError::unsupported_predicate(format!(
                "target of call `{method}` must be a captured instance"
            ))),
        }
    }

    /// First member name wins; later captures along the same branch
    /// are the inner links of a chain.
    fn capture(&mut self, name: &SmolStr) {
        if self.captured.is_none() {
            self.captured = Some(name.clone());
        }
    }
}

fn read_member(operand: &Operand, name: &str) -> QueryResult<Operand> {
    match operand {
        Operand::Instance(instance) => instance.get(name).ok_or_else(|| {
            QueryError::unsupported_constant(format!("captured instance has no member `{name}`"))
        }),
        Operand::Value(value) => Err(QueryError::unsupported_predicate(format!(
            "cannot read member `{name}` from a {} value",
            value.kind()
        ))),
    }
}

fn into_whitelisted(operand: Operand) -> QueryResult<Value> {
    match operand {
        Operand::Value(value) => Ok(value),
        Operand::Instance(instance) => Err(QueryError::unsupported_constant(format!(
            "composite value {instance:?} cannot be a comparison operand"
        ))),
    }
}

fn node_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Binary { .. } => "binary",
        Expr::Member { .. } => "member",
        Expr::Constant(_) => "constant",
        Expr::Call { .. } => "call",
        Expr::Invoke(_) => "invoke",
    }
}
