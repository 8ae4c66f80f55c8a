//! Flattened record of the literals and flags a compilation referenced.

use serde::{Deserialize, Serialize};

use crate::ast::{Field, Flag};

/// Values referenced anywhere in the tree, independent of the logical
/// structure that combined them. Literals under `$not` or `none` are
/// recorded too, and each flag keeps the last value seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mime_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub full_text: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_id: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with_me: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trashed: Option<bool>,
}

impl FilterSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_value(&mut self, field: Field, value: &str) {
        self.values_mut(field).push(value.to_string());
    }

    pub fn record_flag(&mut self, flag: Flag, value: bool) {
        *self.flag_mut(flag) = Some(value);
    }

    pub fn values(&self, field: Field) -> &[String] {
        match field {
            Field::Name => &self.name,
            Field::MimeType => &self.mime_type,
            Field::FullText => &self.full_text,
            Field::ParentId => &self.parent_id,
            Field::Owner => &self.owner,
        }
    }

    pub fn flag(&self, flag: Flag) -> Option<bool> {
        match flag {
            Flag::Starred => self.starred,
            Flag::SharedWithMe => self.shared_with_me,
            Flag::Trashed => self.trashed,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.values(*f).is_empty())
            && Flag::ALL.iter().all(|f| self.flag(*f).is_none())
    }

    fn values_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::Name => &mut self.name,
            Field::MimeType => &mut self.mime_type,
            Field::FullText => &mut self.full_text,
            Field::ParentId => &mut self.parent_id,
            Field::Owner => &mut self.owner,
        }
    }

    fn flag_mut(&mut self, flag: Flag) -> &mut Option<bool> {
        match flag {
            Flag::Starred => &mut self.starred,
            Flag::SharedWithMe => &mut self.shared_with_me,
            Flag::Trashed => &mut self.trashed,
        }
    }
}
