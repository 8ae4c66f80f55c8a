//! Error types for query compilation and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a query expression into a query string.
#[derive(Error, Debug)]
pub enum CompileError {
    /// A node outside the documented AST reached the compiler.
    #[error("contract violation at {node}: {reason}")]
    ContractViolation {
        /// The offending node rendered as JSON.
        node: String,
        reason: String,
    },

    /// JSON input that does not have the query expression shape.
    #[error("malformed query expression: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl CompileError {
    pub(crate) fn contract_violation(node: String, reason: impl Into<String>) -> Self {
        CompileError::ContractViolation { node, reason: reason.into() }
    }
}

/// 配置文件错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {}", .0.display())]
    NotFound(PathBuf),

    #[error("无法读取配置文件 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("无法解析JSON配置文件 {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type CompileResult<T> = std::result::Result<T, CompileError>;
