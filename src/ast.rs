//! 结构化查询表达式的 AST
//!
//! JSON 形式与调用方的工具请求一致, 例如：
//!
//! ```text
//! { "$or": [ { "name": { "any": ["budget", "plan"] } }, { "starred": true } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// 查询表达式的根节点: 原始字符串或组合节点
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QueryExpression {
    /// 原样透传的查询片段, 不做转义
    Raw(String),
    Node(Box<QueryNode>),
}

impl QueryExpression {
    /// 从 JSON 文本解析表达式
    pub fn from_json(input: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(input)?)
    }

    /// 原始字符串无法判断, 视为未约束
    pub fn constrains_trashed(&self) -> bool {
        match self {
            QueryExpression::Raw(_) => false,
            QueryExpression::Node(node) => node.constrains_trashed(),
        }
    }

    pub fn raw(fragment: impl Into<String>) -> Self {
        QueryExpression::Raw(fragment.into())
    }

    pub fn node(node: QueryNode) -> Self {
        QueryExpression::Node(Box::new(node))
    }
}

impl From<QueryNode> for QueryExpression {
    fn from(node: QueryNode) -> Self {
        QueryExpression::node(node)
    }
}

/// 组合节点. 逻辑组合子与叶子条件可以同时出现, 两者结果以 AND 连接
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QueryNode {
    #[serde(rename = "$and", default)]
    pub and: Option<Vec<QueryExpression>>,
    #[serde(rename = "$or", default)]
    pub or: Option<Vec<QueryExpression>>,
    #[serde(rename = "$not", default)]
    pub not: Option<QueryExpression>,

    #[serde(default)]
    pub name: Option<FieldValue>,
    #[serde(default)]
    pub mime_type: Option<FieldValue>,
    #[serde(default)]
    pub full_text: Option<FieldValue>,
    #[serde(default)]
    pub parent_id: Option<FieldValue>,
    #[serde(default)]
    pub owner: Option<FieldValue>,

    #[serde(default)]
    pub starred: Option<bool>,
    #[serde(default)]
    pub shared_with_me: Option<bool>,
    #[serde(default)]
    pub trashed: Option<bool>,

    #[serde(default)]
    pub modified_time: Option<DateRange>,

    /// 已成形的语法片段, 原样插入
    #[serde(default)]
    pub raw_query: Option<String>,
}

impl QueryNode {
    pub fn field(&self, field: Field) -> Option<&FieldValue> {
        match field {
            Field::Name => self.name.as_ref(),
            Field::MimeType => self.mime_type.as_ref(),
            Field::FullText => self.full_text.as_ref(),
            Field::ParentId => self.parent_id.as_ref(),
            Field::Owner => self.owner.as_ref(),
        }
    }

    pub fn flag(&self, flag: Flag) -> Option<bool> {
        match flag {
            Flag::Starred => self.starred,
            Flag::SharedWithMe => self.shared_with_me,
            Flag::Trashed => self.trashed,
        }
    }

    /// 该节点自身是否约束了 trashed: 叶子标记, 或任一 `$and` 子句约束了它.
    /// `$or` / `$not` 分支不算.
    pub fn constrains_trashed(&self) -> bool {
        self.trashed.is_some()
            || self
                .and
                .iter()
                .flatten()
                .any(QueryExpression::constrains_trashed)
    }
}

/// 字段的取值: 单个字符串或多值运算符
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Plain(String),
    Operator(FieldOperator),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Plain(value.to_string())
    }
}

impl From<FieldOperator> for FieldValue {
    fn from(op: FieldOperator) -> Self {
        FieldValue::Operator(op)
    }
}

/// 多值匹配: any → OR, all → AND, none → NOT (OR)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOperator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub none: Option<Vec<String>>,
}

impl FieldOperator {
    pub fn any<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { any: Some(values.into_iter().map(Into::into).collect()), ..Default::default() }
    }

    pub fn all<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { all: Some(values.into_iter().map(Into::into).collect()), ..Default::default() }
    }

    pub fn none<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { none: Some(values.into_iter().map(Into::into).collect()), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.any.is_none() && self.all.is_none() && self.none.is_none()
    }
}

/// 修改时间范围: 包含下界 `gte`, 不包含上界 `lt`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateRange {
    #[serde(default)]
    pub gte: Option<String>,
    #[serde(default)]
    pub lt: Option<String>,
}

/// 叶子字段, 声明顺序即编译顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    MimeType,
    FullText,
    ParentId,
    Owner,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::MimeType,
        Field::FullText,
        Field::ParentId,
        Field::Owner,
    ];

    /// 对应的 JSON 键名
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::MimeType => "mimeType",
            Field::FullText => "fullText",
            Field::ParentId => "parentId",
            Field::Owner => "owner",
        }
    }
}

/// 三态布尔标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Starred,
    SharedWithMe,
    Trashed,
}

impl Flag {
    pub const ALL: [Flag; 3] = [Flag::Starred, Flag::SharedWithMe, Flag::Trashed];

    pub fn key(self) -> &'static str {
        match self {
            Flag::Starred => "starred",
            Flag::SharedWithMe => "sharedWithMe",
            Flag::Trashed => "trashed",
        }
    }
}
