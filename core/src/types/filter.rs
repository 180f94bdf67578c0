//! Query filters for list and batch-load actions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_FROM_ROW: i32 = 0;
pub const DEFAULT_TO_ROW: i32 = 100;

/// Comparison applied by an `ItemMatcher`. Serialized by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareType {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Contains,
    NotContains,
    In,
    NotIn,
}

/// How the conditions of a `Matcher` combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SortBy {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortBy {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// One leaf condition: `field <compare_type> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemMatcher {
    pub field: String,
    #[serde(default)]
    pub compare_type: CompareType,
    #[serde(default)]
    pub value: Value,
}

impl ItemMatcher {
    pub fn new(field: impl Into<String>, compare_type: CompareType, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            compare_type,
            value: value.into(),
        }
    }

    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareType::Equal, value)
    }
}

/// Conditions joined by `And` or `Or`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Matcher {
    #[serde(rename = "Type", default)]
    pub match_type: MatchType,
    #[serde(default)]
    pub conditions: Vec<ItemMatcher>,
}

impl Matcher {
    pub fn and(conditions: Vec<ItemMatcher>) -> Self {
        Self {
            match_type: MatchType::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<ItemMatcher>) -> Self {
        Self {
            match_type: MatchType::Or,
            conditions,
        }
    }

    pub fn push(mut self, condition: ItemMatcher) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// Paged, optionally sorted and filtered query against one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Filter {
    pub from_row_num: i32,
    pub to_row_num: i32,
    pub require_count: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_items: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by_collection: Option<Vec<SortBy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<Matcher>,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            from_row_num: DEFAULT_FROM_ROW,
            to_row_num: DEFAULT_TO_ROW,
            require_count: true,
            return_items: None,
            sort_by_collection: None,
            matcher: None,
        }
    }
}

impl Filter {
    /// Rows `[from, to)` of the result set.
    pub fn rows(from_row_num: i32, to_row_num: i32) -> Self {
        Self {
            from_row_num,
            to_row_num,
            ..Self::default()
        }
    }

    pub fn require_count(mut self, require_count: bool) -> Self {
        self.require_count = require_count;
        self
    }

    pub fn return_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_items = Some(items.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by_collection.get_or_insert_with(Vec::new).push(sort);
        self
    }

    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// JSON text form used by actions that take the filter as a string.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
