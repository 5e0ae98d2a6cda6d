//! # quarry-query
//!
//! Predicate compiler and SQL filter model for the Quarry data access layer.
//!
//! This crate provides the database-agnostic core, including:
//! - A whitelisted [`Value`] set for filter parameters
//! - Composable filter trees (`SingleFilter`, `CombinedFilter`, `QueryFilter`)
//! - A host expression union ([`Expr`]) and the [`compile`] pass that lowers it
//! - Captured-state resolution through the [`Capture`] trait instead of reflection
//! - Dialect-parameterized SQL rendering via [`SqlDialect`]
//! - A concurrency-safe compiled-filter cache ([`FilterCache`])
//!
//! ## Filters
//!
//! Build filter trees directly with the fluent adders:
//!
//! ```rust
//! use quarry_query::{Connector, QueryFilter, SingleFilter};
//!
//! // Conjunction of two predicates on one entity
//! let adults = SingleFilter::new().eq("active", true).gte("age", 18);
//! assert_eq!(adults.len(), 2);
//!
//! // Predicates joined with OR instead
//! let staff = SingleFilter::with_connector(Connector::Or)
//!     .eq("role", "admin")
//!     .eq("role", "moderator");
//!
//! // Combine whole groups
//! let filter = QueryFilter::and(adults, staff);
//! assert_eq!(filter.predicate_count(), 4);
//! ```
//!
//! ## Filter Values
//!
//! Convert Rust types to filter values:
//!
//! ```rust
//! use quarry_query::Value;
//!
//! // Integer values
//! let val: Value = 42.into();
//! assert!(matches!(val, Value::Int(42)));
//!
//! // Text values
//! let val: Value = "hello".into();
//! assert!(matches!(val, Value::Text(_)));
//!
//! // Boolean values
//! let val: Value = true.into();
//! assert!(matches!(val, Value::Bool(true)));
//!
//! // Absent optionals collapse to NULL
//! let val: Value = Option::<i64>::None.into();
//! assert!(val.is_null());
//! ```
//!
//! ## Expressions
//!
//! Lower a host-side predicate expression into a filter:
//!
//! ```rust
//! use quarry_query::{compile, Expr};
//!
//! let expr = Expr::field("age").gte(18).and(Expr::field("active").eq(true));
//! let filter = compile(&expr).unwrap();
//! assert_eq!(filter.predicate_count(), 2);
//! ```
//!
//! ## Captured State
//!
//! Closed-over host values participate through [`Capture`]:
//!
//! ```rust
//! use quarry_query::{compile, Capture, Expr, Operand};
//!
//! #[derive(Debug)]
//! struct Policy {
//!     min_age: i64,
//! }
//!
//! impl Capture for Policy {
//!     fn get(&self, member: &str) -> Option<Operand> {
//!         match member {
//!             "min_age" => Some(Operand::value(self.min_age)),
//!             _ => None,
//!         }
//!     }
//!
//!     fn call(&self, _method: &str) -> Option<Operand> {
//!         None
//!     }
//! }
//!
//! let policy = Policy { min_age: 21 };
//! let expr = Expr::field("age").gte(Expr::captured(policy).member("min_age"));
//! let filter = compile(&expr).unwrap();
//! assert_eq!(filter.predicate_count(), 1);
//! ```
//!
//! ## Caching
//!
//! Reuse compiled filters across repeated evaluations:
//!
//! ```rust
//! use quarry_query::{Expr, FilterCache};
//!
//! let cache = FilterCache::new(128);
//! let expr = Expr::field("tier").eq("gold");
//!
//! let first = cache.get_or_compile(&expr).unwrap();
//! let second = cache.get_or_compile(&expr).unwrap();
//! assert_eq!(first, second);
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 1);
//! ```
//!
//! ## Error Handling
//!
//! Work with compilation errors:
//!
//! ```rust
//! use quarry_query::{compile, Expr, QueryError};
//!
//! // A bare member read is not a boolean predicate
//! let err = compile(&Expr::field("age")).unwrap_err();
//! assert!(matches!(err, QueryError::UnsupportedPredicate { .. }));
//!
//! let err = QueryError::invalid_argument("page size must be positive");
//! assert!(err.to_string().contains("page size"));
//! ```

pub mod cache;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod filter;
pub mod logging;
pub mod predicate;
pub mod sql;
pub mod value;

pub use error::{QueryError, QueryResult};
pub use filter::{CombinedFilter, QueryFilter, SingleFilter};
pub use predicate::{CompareOp, Connector, FieldPredicate};
pub use value::Value;

// Re-export expression types
pub use expr::{BinaryOp, Capture, Expr, Operand, ValueFn};

// Re-export the compiler entry point
pub use compiler::compile;

// Re-export SQL generation types
pub use sql::{BatchParam, ParamBinder, SqlDialect};

// Re-export cache types
pub use cache::{CacheStats, FilterCache};
