//! Folder and trash restrictions the hosting search tool ANDs onto every
//! compiled or raw query.

use serde::{Deserialize, Serialize};

use crate::ast::QueryExpression;
use crate::query_compiler::{escape, has_top_level_operator};

/// 搜索作用域
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchScope {
    /// 仅搜索该文件夹的直接子项
    pub folder_id: Option<String>,
    /// 为 false 时追加 `trashed = false`, 除非根节点本身已约束 trashed
    pub include_trashed: bool,
}

impl SearchScope {
    pub fn folder(folder_id: impl Into<String>) -> Self {
        Self { folder_id: Some(folder_id.into()), include_trashed: false }
    }

    /// AND the scope conjuncts onto `query`, the compiled form of `expr`.
    /// A query with a top-level `and` / `or` is parenthesized first so the
    /// conjuncts bind to all of it.
    pub fn apply(&self, query: &str, expr: &QueryExpression) -> String {
        let mut parts = Vec::new();

        if !query.trim().is_empty() {
            parts.push(query.to_string());
        }
        if let Some(folder) = self.folder_id.as_deref().filter(|f| !f.trim().is_empty()) {
            parts.push(format!("'{}' in parents", escape(folder)));
        }
        if !self.include_trashed && !expr.constrains_trashed() {
            parts.push("trashed = false".to_string());
        }

        if parts.len() > 1 && !query.trim().is_empty() && has_top_level_operator(query) {
            parts[0] = format!("({})", query);
        }
        parts.join(" and ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(input: &str) -> QueryExpression {
        QueryExpression::from_json(input).unwrap()
    }

    fn empty() -> QueryExpression {
        expr("{}")
    }

    #[test]
    fn test_default_scope_excludes_trash() {
        let scope = SearchScope::default();
        assert_eq!(
            scope.apply("name contains 'a'", &expr(r#"{"name": "a"}"#)),
            "name contains 'a' and trashed = false"
        );
        assert_eq!(scope.apply("", &empty()), "trashed = false");
    }

    #[test]
    fn test_root_trashed_flag_wins() {
        let scope = SearchScope::default();
        assert_eq!(scope.apply("trashed = true", &expr(r#"{"trashed": true}"#)), "trashed = true");
        assert_eq!(
            scope.apply(
                "name contains 'x' and trashed = true",
                &expr(r#"{"$and": [{"name": "x"}, {"trashed": true}]}"#)
            ),
            "name contains 'x' and trashed = true"
        );
    }

    #[test]
    fn test_trashed_inside_disjunction_keeps_trash_filter() {
        let scope = SearchScope::default();
        assert_eq!(
            scope.apply(
                "trashed = true or name contains 'x'",
                &expr(r#"{"$or": [{"trashed": true}, {"name": "x"}]}"#)
            ),
            "(trashed = true or name contains 'x') and trashed = false"
        );
        assert_eq!(
            scope.apply("not (trashed = true)", &expr(r#"{"$not": {"trashed": true}}"#)),
            "not (trashed = true) and trashed = false"
        );
        assert_eq!(
            scope.apply("trashed = true", &QueryExpression::raw("trashed = true")),
            "trashed = true and trashed = false"
        );
    }

    #[test]
    fn test_folder_scope_wraps_disjunction() {
        let scope = SearchScope { folder_id: Some("f'1".to_string()), include_trashed: true };
        assert_eq!(
            scope.apply("starred = true or sharedWithMe = true", &empty()),
            "(starred = true or sharedWithMe = true) and 'f\\'1' in parents"
        );
        assert_eq!(
            scope.apply("(a or b)", &empty()),
            "(a or b) and 'f\\'1' in parents"
        );
    }

    #[test]
    fn test_include_trashed_without_folder_is_identity() {
        let scope = SearchScope { folder_id: None, include_trashed: true };
        assert_eq!(scope.apply("a or b", &empty()), "a or b");
        assert_eq!(scope.apply("", &empty()), "");
    }

    #[test]
    fn test_blank_folder_ignored() {
        let scope = SearchScope { folder_id: Some("  ".to_string()), include_trashed: true };
        assert_eq!(scope.apply("x", &empty()), "x");
        assert_eq!(SearchScope::folder("abc").folder_id.as_deref(), Some("abc"));
    }
}
