//! 配置模块，负责加载JSON配置文件

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::scope::SearchScope;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "drive_query.json";

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "DRIVE_QUERY_CONFIG";

/// 编译器配置结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerConfig {
    /// 作用域编译时追加的文件夹/回收站条件
    pub scope: SearchScope,
    /// 未设置 RUST_LOG 时使用的日志级别
    pub log_level: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            scope: SearchScope::default(),
            log_level: "info".to_string(),
        }
    }
}

impl CompilerConfig {
    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::NotFound(path_ref.to_path_buf()));
        }

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path_ref.to_path_buf(),
            source,
        })
    }

    /// 配置文件路径: 环境变量优先, 否则使用默认路径
    pub fn default_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_json_config() {
        // 创建临时配置文件
        let temp_file = "test_drive_query_config.json";
        let mut file = fs::File::create(temp_file).unwrap();
        writeln!(file, r#"{{
            "scope": {{ "folderId": "0AbCdEf", "includeTrashed": true }},
            "logLevel": "debug"
        }}"#).unwrap();

        let config = CompilerConfig::from_json_file(temp_file).unwrap();
        assert_eq!(config.scope.folder_id.as_deref(), Some("0AbCdEf"));
        assert!(config.scope.include_trashed);
        assert_eq!(config.log_level, "debug");

        // 清理
        fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_file = "test_drive_query_partial.json";
        let mut file = fs::File::create(temp_file).unwrap();
        writeln!(file, r#"{{ "scope": {{ "folderId": "abc" }} }}"#).unwrap();

        let config = CompilerConfig::from_json_file(temp_file).unwrap();
        assert_eq!(config.scope, SearchScope::folder("abc"));
        assert_eq!(config.log_level, "info");

        fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_invalid_json_config() {
        let temp_file = "test_drive_query_invalid.json";
        let mut file = fs::File::create(temp_file).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = CompilerConfig::from_json_file(temp_file);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));

        fs::remove_file(temp_file).ok();
    }

    #[test]
    fn test_missing_file() {
        let result = CompilerConfig::from_json_file("non_existent_file.json");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.scope.folder_id, None);
        assert!(!config.scope.include_trashed);
        assert_eq!(config.log_level, "info");
    }
}
