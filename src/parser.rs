// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for API documentation trees.
//!
//! The documentation tree is a JSON object mapping fully-qualified class
//! names (e.g. `"Titanium.UI.View"`) to class descriptors. Each class lists
//! its methods, properties and events along with summaries, platform
//! availability, deprecation notes and examples.
//!
//! # Leniency
//!
//! The tree is produced by an upstream documentation loader and is not
//! validated here. Every node is read from a [`serde_json::Value`] with
//! tolerant getters. Fields that are copied to the output unchanged (names,
//! `extends`, `__subtype`, versions, types) keep whatever value they hold;
//! text fields with an unexpected type are treated as absent.
//! Presence checks follow the truthiness rules of the documentation format,
//! so `null`, `false`, `0` and `""` count as "not set" while arrays and
//! objects (even empty ones) count as set.
//!
//! # Example
//!
//! ```
//! use apidoc_json::parser::parse_tree;
//!
//! let json = r#"{
//!     "Titanium.Blob": {
//!         "name": "Titanium.Blob",
//!         "summary": "A container for binary data.",
//!         "since": { "android": "3.0.0", "iphone": "3.0.0" }
//!     }
//! }"#;
//!
//! let tree = parse_tree(json).unwrap();
//! assert_eq!(tree.len(), 1);
//! assert_eq!(tree.get("Titanium.Blob").unwrap().since.len(), 2);
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use snafu::prelude::*;

/// Error type for JSON parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// A complete documentation tree, keyed by class name.
///
/// Keys keep the order in which they appear in the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocTree {
    classes: IndexMap<String, ClassNode>,
}

impl DocTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a class under `key`.
    ///
    /// An existing class with the same key is replaced in place and
    /// returned, so the key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, class: ClassNode) -> Option<ClassNode> {
        self.classes.insert(key.into(), class)
    }

    /// Looks up a class by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ClassNode> {
        self.classes.get(key)
    }

    /// Iterates over `(key, class)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassNode)> {
        self.classes.iter().map(|(k, class)| (k.as_str(), class))
    }

    /// Number of classes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the tree has no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<(String, ClassNode)> for DocTree {
    fn from_iter<I: IntoIterator<Item = (String, ClassNode)>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DocTree {
    type Item = (String, ClassNode);
    type IntoIter = indexmap::map::IntoIter<String, ClassNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.into_iter()
    }
}

impl<'de> Deserialize<'de> for DocTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let Value::Object(classes) = Value::deserialize(deserializer)? else {
            return Err(serde::de::Error::custom(
                "documentation tree must be a JSON object",
            ));
        };

        Ok(classes
            .iter()
            .map(|(key, class)| (key.clone(), ClassNode::from_value(class)))
            .collect())
    }
}

/// Accessors shared by every documented node.
///
/// Lets the summary, description, deprecation, platform and example
/// extractors accept classes, members and parameters alike.
pub trait ApiNode {
    /// The summary text, if set.
    fn summary(&self) -> Option<&str>;

    /// The long-form description, if set.
    fn description(&self) -> Option<&str>;

    /// Deprecation details, if the node is deprecated.
    fn deprecated(&self) -> Option<&Deprecation>;

    /// Platform availability, in document order.
    fn since(&self) -> &[Since] {
        &[]
    }

    /// Code examples, if the node has an `examples` field.
    fn examples(&self) -> Option<&[Example]> {
        None
    }
}

/// A documented class, module or proxy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassNode {
    /// Fully-qualified name, copied as-is. May be missing in malformed input.
    pub name: Option<Value>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Name of the parent class.
    pub extends: Option<Value>,
    /// Platform availability.
    pub since: Vec<Since>,
    /// Deprecation details.
    pub deprecated: Option<Deprecation>,
    /// Code examples.
    pub examples: Option<Vec<Example>>,
    /// Methods, including inherited ones.
    pub methods: Option<Vec<MemberNode>>,
    /// Properties, including inherited ones.
    pub properties: Option<Vec<MemberNode>>,
    /// Events, including inherited ones.
    pub events: Option<Vec<MemberNode>>,
    /// Subtype hint from `__subtype` (`"proxy"`, `"view"`, `"module"`, ...).
    pub subtype: Option<Value>,
}

impl ClassNode {
    /// Reads a class from a JSON value, ignoring fields it cannot interpret.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: value.get("name").cloned(),
            summary: truthy_string(value, "summary"),
            description: truthy_string(value, "description"),
            extends: truthy(value, "extends").cloned(),
            since: since_entries(value),
            deprecated: truthy(value, "deprecated").map(Deprecation::from_value),
            examples: list(value, "examples", Example::from_value),
            methods: list(value, "methods", MemberNode::from_value),
            properties: list(value, "properties", MemberNode::from_value),
            events: list(value, "events", MemberNode::from_value),
            subtype: truthy(value, "__subtype").cloned(),
        }
    }
}

/// A method, property or event of a class.
///
/// The kind is implied by which list of the class the member appears in;
/// fields that do not apply to that kind are ignored on export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberNode {
    /// Member name, copied as-is.
    pub name: Option<Value>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Declared type. Either a type name or a list of type names.
    pub type_name: Option<Value>,
    /// Platform availability.
    pub since: Vec<Since>,
    /// Deprecation details.
    pub deprecated: Option<Deprecation>,
    /// Code examples.
    pub examples: Option<Vec<Example>>,
    /// Method parameters.
    pub parameters: Option<Vec<ParamNode>>,
    /// Method return type(s).
    pub returns: Option<Returns>,
    /// Event payload properties.
    pub properties: Option<Vec<ParamNode>>,
    /// Property access mode (e.g. `"creation"`).
    pub availability: Option<Value>,
    /// Property default value.
    pub default: Option<Value>,
    /// Whether a property may be omitted.
    pub optional: Option<Value>,
    /// Property permission (e.g. `"read-only"`).
    pub permission: Option<Value>,
    /// Constant value of a property.
    pub value: Option<Value>,
    /// `__hide`: suppress the member from output.
    pub hidden: bool,
    /// `__accessor`: generated getter/setter, suppressed from output.
    pub accessor: bool,
    /// `__inherits`: name of the class that declared this member.
    pub inherits: Option<Value>,
}

impl MemberNode {
    /// Reads a member from a JSON value, ignoring fields it cannot interpret.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: value.get("name").cloned(),
            summary: truthy_string(value, "summary"),
            description: truthy_string(value, "description"),
            type_name: truthy(value, "type").cloned(),
            since: since_entries(value),
            deprecated: truthy(value, "deprecated").map(Deprecation::from_value),
            examples: list(value, "examples", Example::from_value),
            parameters: list(value, "parameters", ParamNode::from_value),
            returns: truthy(value, "returns").map(Returns::from_value),
            properties: list(value, "properties", ParamNode::from_value),
            availability: truthy(value, "availability").cloned(),
            default: truthy(value, "default").cloned(),
            optional: truthy(value, "optional").cloned(),
            permission: truthy(value, "permission").cloned(),
            value: truthy(value, "value").cloned(),
            hidden: truthy(value, "__hide").is_some(),
            accessor: truthy(value, "__accessor").is_some(),
            inherits: value.get("__inherits").cloned(),
        }
    }
}

/// A method parameter or event property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamNode {
    /// Parameter name, copied as-is.
    pub name: Option<Value>,
    /// One-line summary.
    pub summary: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Declared type. Either a type name or a list of type names.
    pub type_name: Option<Value>,
    /// Whether the parameter may be omitted.
    pub optional: bool,
    /// Deprecation details.
    pub deprecated: Option<Deprecation>,
}

impl ParamNode {
    /// Reads a parameter from a JSON value, ignoring fields it cannot interpret.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: value.get("name").cloned(),
            summary: truthy_string(value, "summary"),
            description: truthy_string(value, "description"),
            type_name: truthy(value, "type").cloned(),
            optional: truthy(value, "optional").is_some(),
            deprecated: truthy(value, "deprecated").map(Deprecation::from_value),
        }
    }
}

impl From<&MemberNode> for ParamNode {
    fn from(member: &MemberNode) -> Self {
        Self {
            name: member.name.clone(),
            summary: member.summary.clone(),
            description: member.description.clone(),
            type_name: member.type_name.clone(),
            optional: member.optional.is_some(),
            deprecated: member.deprecated.clone(),
        }
    }
}

/// Deprecation details of a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deprecation {
    /// Free-form notes, e.g. the suggested replacement.
    pub notes: Option<String>,
    /// Version the node was deprecated in.
    pub since: Option<Value>,
    /// Version the node was removed in.
    pub removed: Option<Value>,
}

impl Deprecation {
    /// Reads deprecation details. A bare `true` yields empty details.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            notes: truthy_string(value, "notes"),
            since: value.get("since").cloned(),
            removed: value.get("removed").cloned(),
        }
    }
}

/// A titled code example.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Example {
    /// Example title.
    pub title: Option<Value>,
    /// Example body, usually Markdown with a fenced code block.
    pub example: Option<Value>,
}

impl Example {
    /// Reads an example entry.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            title: value.get("title").cloned(),
            example: value.get("example").cloned(),
        }
    }
}

/// Availability on one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Since {
    /// Platform name (e.g. `"android"`).
    pub platform: String,
    /// First version the platform supports the node in.
    pub version: Value,
}

/// The `returns` field of a method, as written in the source.
///
/// The documentation format allows either a single return descriptor or a
/// list of alternatives.
#[derive(Debug, Clone, PartialEq)]
pub enum Returns {
    /// A single return descriptor.
    One(ReturnNode),
    /// A list of alternative return descriptors.
    Many(Vec<ReturnNode>),
}

impl Returns {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Many(items.iter().map(ReturnNode::from_value).collect()),
            other => Self::One(ReturnNode::from_value(other)),
        }
    }

    /// Views the descriptors as a slice, wrapping a single one.
    #[must_use]
    pub fn as_slice(&self) -> &[ReturnNode] {
        match self {
            Self::One(node) => std::slice::from_ref(node),
            Self::Many(nodes) => nodes,
        }
    }
}

/// A single return descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnNode {
    /// Description of the returned value.
    pub summary: Option<Value>,
    /// Returned type. Copied verbatim, including `null`.
    pub type_name: Option<Value>,
}

impl ReturnNode {
    /// Reads a return descriptor.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            summary: truthy(value, "summary").cloned(),
            type_name: value.get("type").cloned(),
        }
    }
}

impl ApiNode for ClassNode {
    fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn deprecated(&self) -> Option<&Deprecation> {
        self.deprecated.as_ref()
    }

    fn since(&self) -> &[Since] {
        &self.since
    }

    fn examples(&self) -> Option<&[Example]> {
        self.examples.as_deref()
    }
}

impl ApiNode for MemberNode {
    fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn deprecated(&self) -> Option<&Deprecation> {
        self.deprecated.as_ref()
    }

    fn since(&self) -> &[Since] {
        &self.since
    }

    fn examples(&self) -> Option<&[Example]> {
        self.examples.as_deref()
    }
}

impl ApiNode for ParamNode {
    fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn deprecated(&self) -> Option<&Deprecation> {
        self.deprecated.as_ref()
    }
}

macro_rules! deserialize_from_value {
    ($($ty:ty),+) => {$(
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                Ok(Self::from_value(&Value::deserialize(deserializer)?))
            }
        }
    )+};
}

deserialize_from_value!(ClassNode, MemberNode, ParamNode);

/// Returns `true` if the value counts as set in the documentation format.
///
/// `null`, `false`, zero and the empty string are unset; everything else,
/// including empty arrays and objects, is set.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the field `key` if it is present and truthy.
fn truthy<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_truthy(v))
}

/// Like [`truthy`] but only accepts strings.
fn truthy_string(value: &Value, key: &str) -> Option<String> {
    truthy(value, key)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Reads a list-valued field.
///
/// A truthy field that is not an array yields an empty list, matching how
/// the documentation tooling treats it.
fn list<T>(value: &Value, key: &str, node: impl Fn(&Value) -> T) -> Option<Vec<T>> {
    truthy(value, key).map(|field| {
        field
            .as_array()
            .map(|items| items.iter().map(&node).collect())
            .unwrap_or_default()
    })
}

/// Reads the `since` mapping of platform name to version.
fn since_entries(value: &Value) -> Vec<Since> {
    value
        .get("since")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .map(|(platform, version)| Since {
            platform: platform.clone(),
            version: version.clone(),
        })
        .collect()
}

/// Parses a JSON string into a [`DocTree`].
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or its root is not a
/// JSON object. Malformed class descriptors are not an error.
///
/// # Example
///
/// ```
/// use apidoc_json::parser::parse_tree;
///
/// assert!(parse_tree("{}").unwrap().is_empty());
/// assert!(parse_tree("[]").is_err());
/// ```
pub fn parse_tree(json_str: &str) -> Result<DocTree, ParseError> {
    serde_json::from_str(json_str).context(JsonSnafu)
}
