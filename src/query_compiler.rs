//! Query compiler that converts a structured query expression into the
//! search API's boolean query grammar.
//!
//! Fragment rules:
//! - a single fragment is emitted as is, two or more are joined and wrapped in
//!   one pair of parentheses ([`chain`]);
//! - a `$and` / `$or` at the root is left unwrapped so callers can append
//!   further conjuncts;
//! - blank fragments are dropped everywhere, so empty branches never leave a
//!   dangling `and` / `or` behind.

use serde::Serialize;
use tracing::{debug, warn};

use crate::ast::{DateRange, Field, FieldOperator, FieldValue, Flag, QueryExpression, QueryNode};
use crate::error::{CompileError, CompileResult};
use crate::scope::SearchScope;
use crate::summary::FilterSummary;

/// Logical keyword used to join fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    fn separator(self) -> &'static str {
        match self {
            LogicalOp::And => " and ",
            LogicalOp::Or => " or ",
        }
    }
}

/// Result of compiling one expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub query_string: String,
    pub filters: FilterSummary,
}

/// Compiler front end. Holds only the search scope applied by
/// [`QueryCompiler::compile_scoped`]; compilation itself is stateless.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    scope: SearchScope,
}

impl QueryCompiler {
    pub fn with_scope(scope: SearchScope) -> Self {
        Self { scope }
    }

    /// Compile an expression into a query string and its filters summary
    pub fn compile(&self, expr: &QueryExpression) -> CompileResult<CompiledQuery> {
        compile(expr)
    }

    /// Compile an expression and AND the configured folder / trash
    /// conjuncts onto the result
    pub fn compile_scoped(&self, expr: &QueryExpression) -> CompileResult<CompiledQuery> {
        let mut compiled = compile(expr)?;
        compiled.query_string = self.scope.apply(&compiled.query_string, expr);
        Ok(compiled)
    }
}

/// Compile an expression. A raw string at the root is passed through
/// untouched; everything else goes through [`emit_top`].
pub fn compile(expr: &QueryExpression) -> CompileResult<CompiledQuery> {
    let mut filters = FilterSummary::new();

    let query_string = match expr {
        QueryExpression::Raw(raw) => raw.clone(),
        QueryExpression::Node(node) => {
            let emitted = emit_top(node, &mut filters)?;
            let cleaned = strip_dangling(&emitted);
            if cleaned != emitted {
                warn!(original = %emitted, cleaned = %cleaned, "stripped dangling operator from compiled query");
            }
            cleaned.to_string()
        }
    };

    debug!(query = %query_string, filters = ?filters, "compiled query expression");

    Ok(CompiledQuery { query_string, filters })
}

/// Emit a nested expression. Grouped combinators keep their parentheses.
fn emit(expr: &QueryExpression, filters: &mut FilterSummary) -> CompileResult<String> {
    match expr {
        QueryExpression::Raw(raw) => Ok(raw.clone()),
        QueryExpression::Node(node) => emit_node(node, filters, false),
    }
}

/// Emit the root node. A lone `$and` / `$or` is not wrapped.
fn emit_top(node: &QueryNode, filters: &mut FilterSummary) -> CompileResult<String> {
    emit_node(node, filters, true)
}

/// A fragment produced by one part of a node
struct Fragment {
    text: String,
    /// Joined combinator output that still needs its enclosing parentheses
    grouped: bool,
}

fn emit_node(node: &QueryNode, filters: &mut FilterSummary, top: bool) -> CompileResult<String> {
    let mut fragments = Vec::new();

    if let Some(children) = &node.and {
        fragments.push(Fragment { text: emit_group(LogicalOp::And, children, filters)?, grouped: true });
    }
    if let Some(children) = &node.or {
        fragments.push(Fragment { text: emit_group(LogicalOp::Or, children, filters)?, grouped: true });
    }
    if let Some(child) = &node.not {
        let inner = emit(child, filters)?;
        let text = if is_blank(&inner) { String::new() } else { format!("not ({})", inner) };
        fragments.push(Fragment { text, grouped: false });
    }

    let leaves = leaf_fragments(node, filters)?;
    fragments.push(Fragment { text: chain(LogicalOp::And, leaves), grouped: false });

    fragments.retain(|f| !is_blank(&f.text));

    if top && fragments.len() == 1 {
        return Ok(fragments.pop().map(|f| f.text).unwrap_or_default());
    }

    let parts = fragments
        .into_iter()
        .map(|f| if f.grouped { format!("({})", f.text) } else { f.text })
        .collect();
    Ok(chain(LogicalOp::And, parts))
}

/// Emit every child of a combinator and join the non-blank results
fn emit_group(op: LogicalOp, children: &[QueryExpression], filters: &mut FilterSummary) -> CompileResult<String> {
    let parts = children
        .iter()
        .map(|child| emit(child, filters))
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(join(op, parts).0)
}

/// Leaf fragments of a node in their fixed order: flags, date range,
/// fields, raw query.
fn leaf_fragments(node: &QueryNode, filters: &mut FilterSummary) -> CompileResult<Vec<String>> {
    let mut parts = Vec::new();

    for flag in Flag::ALL {
        if let Some(value) = node.flag(flag) {
            filters.record_flag(flag, value);
            parts.push(format!("{} = {}", flag.key(), value));
        }
    }

    if let Some(range) = &node.modified_time {
        parts.push(date_range(range));
    }

    for field in Field::ALL {
        if let Some(value) = node.field(field) {
            parts.push(field_expr(field, value, filters)?);
        }
    }

    if let Some(raw) = &node.raw_query {
        parts.push(raw.clone());
    }

    Ok(parts)
}

/// Compile one field's value, plain or operator
fn field_expr(field: Field, value: &FieldValue, filters: &mut FilterSummary) -> CompileResult<String> {
    match value {
        FieldValue::Plain(v) if is_blank(v) => Ok(String::new()),
        FieldValue::Plain(v) => Ok(field_value(field, v, filters)),
        FieldValue::Operator(op) => operator_expr(field, op, filters),
    }
}

/// `any` → OR chain, `all` → AND chain, `none` → `not (a or b ...)`.
/// Several populated keys are ANDed in that order.
fn operator_expr(field: Field, op: &FieldOperator, filters: &mut FilterSummary) -> CompileResult<String> {
    if op.is_empty() {
        return Err(CompileError::contract_violation(
            render_operator(field, op),
            "field operator must carry one of `any`, `all` or `none`",
        ));
    }

    let mut parts = Vec::new();
    if let Some(values) = &op.any {
        parts.push(chain(LogicalOp::Or, field_values(field, values, filters)));
    }
    if let Some(values) = &op.all {
        parts.push(chain(LogicalOp::And, field_values(field, values, filters)));
    }
    if let Some(values) = &op.none {
        let (inner, _) = join(LogicalOp::Or, field_values(field, values, filters));
        if !inner.is_empty() {
            parts.push(format!("not ({})", inner));
        }
    }

    Ok(chain(LogicalOp::And, parts))
}

fn field_values(field: Field, values: &[String], filters: &mut FilterSummary) -> Vec<String> {
    values
        .iter()
        .filter(|v| !is_blank(v))
        .map(|v| field_value(field, v, filters))
        .collect()
}

/// Grammar fragment for a single literal. The literal is recorded in the
/// summary whatever the surrounding logical context.
fn field_value(field: Field, value: &str, filters: &mut FilterSummary) -> String {
    filters.record_value(field, value);
    let escaped = escape(value);
    match field {
        Field::Name => format!("name contains '{}'", escaped),
        Field::MimeType => format!("mimeType = '{}'", escaped),
        Field::FullText => format!("fullText contains '{}'", escaped),
        Field::ParentId => format!("'{}' in parents", escaped),
        Field::Owner => format!("'{}' in owners", escaped),
    }
}

/// `gte` is inclusive, `lt` exclusive. Both bounds form one parenthesized
/// fragment.
fn date_range(range: &DateRange) -> String {
    let lower = range
        .gte
        .as_deref()
        .filter(|v| !is_blank(v))
        .map(|v| format!("modifiedTime >= '{}'", escape(v)));
    let upper = range
        .lt
        .as_deref()
        .filter(|v| !is_blank(v))
        .map(|v| format!("modifiedTime < '{}'", escape(v)));

    match (lower, upper) {
        (Some(lower), Some(upper)) => format!("({} and {})", lower, upper),
        (Some(bound), None) | (None, Some(bound)) => bound,
        (None, None) => String::new(),
    }
}

/// Join fragments with `op`, parenthesizing only when two or more remain
pub fn chain(op: LogicalOp, parts: Vec<String>) -> String {
    match join(op, parts) {
        (joined, count) if count >= 2 => format!("({})", joined),
        (joined, _) => joined,
    }
}

/// Drop blank fragments and join the rest; returns the joined text and how
/// many fragments it holds.
fn join(op: LogicalOp, parts: Vec<String>) -> (String, usize) {
    let parts: Vec<String> = parts.into_iter().filter(|p| !is_blank(p)).collect();
    (parts.join(op.separator()), parts.len())
}

/// Escape a literal for a single-quoted string: only `'` becomes `\'`
pub fn escape(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// Remove leading `and ` / `or ` and trailing ` and` / ` or` tokens.
/// Nothing else is touched, surrounding whitespace included.
fn strip_dangling(query: &str) -> &str {
    let mut rest = query;
    loop {
        let next = rest
            .strip_prefix("and ")
            .or_else(|| rest.strip_prefix("or "))
            .or_else(|| rest.strip_suffix(" and"))
            .or_else(|| rest.strip_suffix(" or"));
        match next {
            Some(stripped) => rest = stripped,
            None => return rest,
        }
    }
}

/// Whether `query` has an `and` / `or` outside any parentheses or quoted
/// literal, i.e. whether appending a conjunct would rebind it.
pub(crate) fn has_top_level_operator(query: &str) -> bool {
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;

    for (i, c) in query.char_indices() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '\'' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '\'' => in_quote = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 => {
                let rest = &query[i..];
                if rest.starts_with(" and ") || rest.starts_with(" or ") {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn render_operator(field: Field, op: &FieldOperator) -> String {
    let mut node = serde_json::Map::new();
    node.insert(field.key().to_string(), serde_json::to_value(op).unwrap_or_default());
    serde_json::Value::Object(node).to_string()
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
