// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Simplified JSON export of a parsed documentation tree.
//!
//! This module maps a [`DocTree`] onto the reduced schema consumed by
//! third-party tooling (editor plugins, completion engines). Each class keeps
//! its key; its value is flattened into an [`ExportedClass`] with a fixed
//! set of fields.
//!
//! # Output Format
//!
//! - Optional fields are omitted rather than written as `null` or `[]`.
//! - `summary` is always a string and `platforms` is always an array.
//! - A method's `returns` is a single object when there is exactly one
//!   return descriptor and an array otherwise.
//! - Properties of `Titanium.Event` are appended to every event's own
//!   properties.
//!
//! # Example
//!
//! ```
//! use apidoc_json::exporter::{JsonStyle, export};
//! use apidoc_json::parser::parse_tree;
//!
//! let tree = parse_tree(r#"{
//!     "Titanium.UI.View": {
//!         "name": "Titanium.UI.View",
//!         "summary": "An empty drawing surface.",
//!         "extends": "Titanium.Proxy",
//!         "since": { "android": "0.9" },
//!         "__subtype": "view"
//!     }
//! }"#).unwrap();
//!
//! let exported = export(&tree);
//! let view = exported.get("Titanium.UI.View").unwrap();
//! assert_eq!(view.kind, "object");
//! assert_eq!(view.subtype.as_deref(), Some("view"));
//!
//! let json = exported.to_json(JsonStyle::Compact).unwrap();
//! assert!(json.starts_with(r#"{"Titanium.UI.View":{"name":"Titanium.UI.View""#));
//! ```

use crate::parser::{ApiNode, ClassNode, DocTree, Example, MemberNode, ParamNode, ReturnNode, Since};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Class whose properties are shared by every event payload.
pub const EVENT_CLASS: &str = "Titanium.Event";

/// Default `type` of parameters and properties that declare none.
const DEFAULT_TYPE: &str = "String";

/// Subtypes that are reported through `subtype` with `type` set to `"object"`.
const OBJECT_SUBTYPES: [&str; 2] = ["proxy", "view"];

/// Layout of the serialized JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// Single line, no whitespace.
    Compact,
    /// Indented, one field per line.
    #[default]
    Pretty,
}

/// Which member list of a class to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// The `events` list.
    Events,
    /// The `methods` list.
    Methods,
    /// The `properties` list.
    Properties,
}

impl MemberKind {
    /// The member list of `class` for this kind, if the class has one.
    #[must_use]
    pub fn members(self, class: &ClassNode) -> Option<&[MemberNode]> {
        match self {
            Self::Events => class.events.as_deref(),
            Self::Methods => class.methods.as_deref(),
            Self::Properties => class.properties.as_deref(),
        }
    }
}

/// What a list of [`ParamNode`]s describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Method parameters. These carry an `optional` flag.
    Parameters,
    /// Event payload properties.
    Properties,
}

/// The exported tree, keyed like the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExportedTree {
    classes: IndexMap<String, ExportedClass>,
}

impl ExportedTree {
    /// Looks up an exported class by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ExportedClass> {
        self.classes.get(key)
    }

    /// Iterates over `(key, class)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExportedClass)> {
        self.classes.iter().map(|(k, class)| (k.as_str(), class))
    }

    /// Number of exported classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no classes were exported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Serializes the tree as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, style: JsonStyle) -> Result<String, serde_json::Error> {
        match style {
            JsonStyle::Compact => serde_json::to_string(self),
            JsonStyle::Pretty => serde_json::to_string_pretty(self),
        }
    }
}

impl FromIterator<(String, ExportedClass)> for ExportedTree {
    fn from_iter<I: IntoIterator<Item = (String, ExportedClass)>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

/// An exported class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedClass {
    /// Fully-qualified class name, copied as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// Summary, empty if the class has none.
    pub summary: String,
    /// Parent class, `"Object"` by default.
    pub extends: Value,
    /// Platform availability.
    pub platforms: Vec<Platform>,
    /// Class type, `"object"` by default.
    #[serde(rename = "type")]
    pub kind: Value,
    /// Deprecation details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ExportedDeprecation>,
    /// Long-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<ExportedMember>>,
    /// Code examples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<ExportedExample>>,
    /// Methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<ExportedMember>>,
    /// Properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<ExportedMember>>,
    /// `"proxy"` or `"view"` for those kinds of objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

/// An exported method, property or event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedMember {
    /// Member name, copied as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// Deprecation details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ExportedDeprecation>,
    /// Summary, empty if the member has none.
    pub summary: String,
    /// Long-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Platform availability.
    pub platforms: Vec<Platform>,
    /// Declaring class, when the member is inherited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<Value>,
    /// Fields specific to the member's kind.
    #[serde(flatten)]
    pub details: MemberDetails,
}

/// Kind-specific fields of an [`ExportedMember`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MemberDetails {
    /// Event fields.
    Event {
        /// Payload properties, including the shared event properties.
        #[serde(skip_serializing_if = "Option::is_none")]
        properties: Option<Vec<ExportedParam>>,
    },
    /// Method fields.
    Method {
        /// Code examples.
        #[serde(skip_serializing_if = "Option::is_none")]
        examples: Option<Vec<ExportedExample>>,
        /// Parameters.
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<Vec<ExportedParam>>,
        /// Return type(s).
        returns: ExportedReturns,
    },
    /// Property fields.
    Property {
        /// Code examples.
        #[serde(skip_serializing_if = "Option::is_none")]
        examples: Option<Vec<ExportedExample>>,
        /// Declared type, `"String"` by default.
        #[serde(rename = "type")]
        kind: Value,
        /// Access mode.
        #[serde(skip_serializing_if = "Option::is_none")]
        availability: Option<Value>,
        /// Default value.
        #[serde(skip_serializing_if = "Option::is_none")]
        default: Option<Value>,
        /// Whether the property may be omitted.
        #[serde(skip_serializing_if = "Option::is_none")]
        optional: Option<Value>,
        /// Read/write permission.
        #[serde(skip_serializing_if = "Option::is_none")]
        permission: Option<Value>,
        /// Constant value.
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
}

/// An exported method parameter or event property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedParam {
    /// Parameter name, copied as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    /// Deprecation details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<ExportedDeprecation>,
    /// Summary, empty if the parameter has none.
    pub summary: String,
    /// Long-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared type, `"String"` by default.
    #[serde(rename = "type")]
    pub kind: Value,
    /// Set for method parameters only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// Exported deprecation details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedDeprecation {
    /// Notes, empty if there are none.
    pub notes: String,
    /// Version the node was deprecated in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<Value>,
    /// Version the node was removed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<Value>,
}

/// An exported code example.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedExample {
    /// The example's title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    /// The example's body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
}

/// Availability on one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Platform {
    /// First supporting version.
    pub since: Value,
    /// Platform name.
    pub name: String,
}

/// A method's return type(s).
///
/// Serialized as a bare object when there is exactly one descriptor and as
/// an array otherwise. Consumers rely on this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportedReturns {
    /// Exactly one return descriptor.
    Single(ReturnType),
    /// Zero or several return descriptors.
    Multiple(Vec<ReturnType>),
}

/// An exported return descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnType {
    /// Description of the returned value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    /// Returned type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
}

impl ReturnType {
    fn void() -> Self {
        Self {
            summary: None,
            kind: Some(Value::from("void")),
        }
    }
}

impl From<&ReturnNode> for ReturnType {
    fn from(node: &ReturnNode) -> Self {
        Self {
            summary: node.summary.clone(),
            kind: node.type_name.clone(),
        }
    }
}

/// Exports a node's deprecation details, or `None` if it is not deprecated.
#[must_use]
pub fn export_deprecated(node: &impl ApiNode) -> Option<ExportedDeprecation> {
    node.deprecated().map(|deprecation| ExportedDeprecation {
        notes: deprecation.notes.clone().unwrap_or_default(),
        since: deprecation.since.clone(),
        removed: deprecation.removed.clone(),
    })
}

/// Exports a node's summary. Never fails; returns `""` when unset.
#[must_use]
pub fn export_summary(node: &impl ApiNode) -> String {
    node.summary().unwrap_or_default().to_owned()
}

/// Exports a node's description, or `None` when unset.
#[must_use]
pub fn export_description(node: &impl ApiNode) -> Option<String> {
    node.description().map(str::to_owned)
}

/// Exports a node's examples; empty when it has none.
#[must_use]
pub fn export_examples(node: &impl ApiNode) -> Vec<ExportedExample> {
    node.examples()
        .unwrap_or_default()
        .iter()
        .map(|example: &Example| ExportedExample {
            description: example.title.clone(),
            code: example.example.clone(),
        })
        .collect()
}

/// Exports a node's platform availability in document order.
#[must_use]
pub fn export_platforms(node: &impl ApiNode) -> Vec<Platform> {
    node.since()
        .iter()
        .map(|since: &Since| Platform {
            since: since.version.clone(),
            name: since.platform.clone(),
        })
        .collect()
}

/// Exports method parameters or event properties, preserving order.
///
/// Only [`ParamKind::Parameters`] carries the `optional` flag.
#[must_use]
pub fn export_params(params: &[ParamNode], kind: ParamKind) -> Vec<ExportedParam> {
    params
        .iter()
        .map(|param| ExportedParam {
            name: param.name.clone(),
            deprecated: export_deprecated(param),
            summary: export_summary(param),
            description: export_description(param),
            kind: type_or_default(param.type_name.as_ref()),
            optional: (kind == ParamKind::Parameters).then_some(param.optional),
        })
        .collect()
}

/// Exports a method's return type(s).
///
/// A method without `returns` returns `void`. A single descriptor is
/// exported as-is; any other count is exported as a list.
#[must_use]
pub fn export_returns(member: &MemberNode) -> ExportedReturns {
    let returns: Vec<ReturnType> = match &member.returns {
        Some(returns) => returns.as_slice().iter().map(ReturnType::from).collect(),
        None => vec![ReturnType::void()],
    };

    match <[ReturnType; 1]>::try_from(returns) {
        Ok([single]) => ExportedReturns::Single(single),
        Err(returns) => ExportedReturns::Multiple(returns),
    }
}

/// Exports one member list of `class`.
///
/// Hidden members and generated accessors are skipped; the remaining order
/// is kept. `tree` is used to resolve the shared [`EVENT_CLASS`] properties.
#[must_use]
pub fn export_members(class: &ClassNode, kind: MemberKind, tree: &DocTree) -> Vec<ExportedMember> {
    members_with(class, kind, shared_event_properties(tree))
}

/// Properties of [`EVENT_CLASS`], or none if the tree lacks it.
fn shared_event_properties(tree: &DocTree) -> &[MemberNode] {
    tree.get(EVENT_CLASS)
        .and_then(|event| event.properties.as_deref())
        .unwrap_or_default()
}

fn members_with(class: &ClassNode, kind: MemberKind, shared: &[MemberNode]) -> Vec<ExportedMember> {
    let Some(members) = kind.members(class) else {
        return Vec::new();
    };

    members
        .iter()
        .filter(|member| !member.hidden && !member.accessor)
        .map(|member| ExportedMember {
            name: member.name.clone(),
            deprecated: export_deprecated(member),
            summary: export_summary(member),
            description: export_description(member),
            platforms: export_platforms(member),
            inherits: member.inherits.clone().filter(|_| member.inherits != class.name),
            details: match kind {
                MemberKind::Events => event_details(member, shared),
                MemberKind::Methods => method_details(member),
                MemberKind::Properties => property_details(member),
            },
        })
        .collect()
}

fn event_details(member: &MemberNode, shared: &[MemberNode]) -> MemberDetails {
    let properties = member.properties.as_ref().map(|own| {
        let combined: Vec<ParamNode> = own
            .iter()
            .cloned()
            .chain(shared.iter().map(ParamNode::from))
            .collect();
        export_params(&combined, ParamKind::Properties)
    });

    MemberDetails::Event { properties }
}

fn method_details(member: &MemberNode) -> MemberDetails {
    MemberDetails::Method {
        examples: member.examples.is_some().then(|| export_examples(member)),
        parameters: member
            .parameters
            .as_deref()
            .map(|params| export_params(params, ParamKind::Parameters)),
        returns: export_returns(member),
    }
}

fn property_details(member: &MemberNode) -> MemberDetails {
    MemberDetails::Property {
        examples: member.examples.is_some().then(|| export_examples(member)),
        kind: type_or_default(member.type_name.as_ref()),
        availability: member.availability.clone(),
        default: member.default.clone(),
        optional: member.optional.clone(),
        permission: member.permission.clone(),
        value: member.value.clone(),
    }
}

fn type_or_default(type_name: Option<&Value>) -> Value {
    type_name
        .cloned()
        .unwrap_or_else(|| Value::from(DEFAULT_TYPE))
}

/// Exports a single class.
#[must_use]
pub fn export_class(class: &ClassNode, tree: &DocTree) -> ExportedClass {
    class_with(class, shared_event_properties(tree))
}

fn class_with(class: &ClassNode, shared: &[MemberNode]) -> ExportedClass {
    let kind = class.subtype.clone().unwrap_or_else(|| Value::from("object"));
    let (kind, subtype) = match kind.as_str() {
        Some(subtype) if OBJECT_SUBTYPES.contains(&subtype) => {
            (Value::from("object"), Some(subtype.to_owned()))
        }
        _ => (kind, None),
    };

    let members = |member_kind: MemberKind| {
        member_kind
            .members(class)
            .is_some()
            .then(|| members_with(class, member_kind, shared))
    };

    ExportedClass {
        name: class.name.clone(),
        summary: export_summary(class),
        extends: class.extends.clone().unwrap_or_else(|| Value::from("Object")),
        platforms: export_platforms(class),
        kind,
        deprecated: export_deprecated(class),
        description: export_description(class),
        events: members(MemberKind::Events),
        examples: class.examples.is_some().then(|| export_examples(class)),
        methods: members(MemberKind::Methods),
        properties: members(MemberKind::Properties),
        subtype,
    }
}

/// Exports every class of `tree`, keeping keys and their order.
///
/// The input is only borrowed; exporting the same tree twice yields equal
/// results.
#[must_use]
pub fn export(tree: &DocTree) -> ExportedTree {
    tracing::info!(classes = tree.len(), "JSON export starting");

    let shared = shared_event_properties(tree);
    tree.iter()
        .map(|(key, class)| {
            tracing::debug!(class = key, "exporting class");
            (key.to_owned(), class_with(class, shared))
        })
        .collect()
}
