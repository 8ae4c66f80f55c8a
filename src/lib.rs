//! 结构化查询表达式到文件搜索 API 查询语法的编译器
//!
//! ```
//! use drive_query::{compile, QueryExpression};
//!
//! let expr = QueryExpression::from_json(r#"{"name": {"any": ["budget", "plan"]}}"#).unwrap();
//! let compiled = compile(&expr).unwrap();
//! assert_eq!(compiled.query_string, "(name contains 'budget' or name contains 'plan')");
//! assert_eq!(compiled.filters.name, ["budget", "plan"]);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod query_compiler;
pub mod scope;
pub mod summary;

pub use ast::{DateRange, Field, FieldOperator, FieldValue, Flag, QueryExpression, QueryNode};
pub use config::CompilerConfig;
pub use error::{CompileError, CompileResult, ConfigError};
pub use query_compiler::{compile, CompiledQuery, QueryCompiler};
pub use scope::SearchScope;
pub use summary::FilterSummary;
