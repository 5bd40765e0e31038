use bumpalo::collections::Vec;
use hashbrown::{hash_map::DefaultHashBuilder, HashSet};
use serde_json::{Map as JSMap, Number, Value as JSValue};

use crate::context::ASTContext;

/// The marker character prefixing variable tokens in templates and URLs.
pub(crate) const VARIABLE_MARKER: char = '$';

/// The set of variable names a parsed body template references, without the
/// marker character, collected from arbitrarily deep inside the tree.
pub type RequiredVariables<'a> = HashSet<&'a str, DefaultHashBuilder, &'a bumpalo::Bump>;

/// Request-time variable values, keyed by variable name without the marker
/// character. Values are plain JSON scalars or structures.
pub type TemplateVariables = JSMap<String, JSValue>;

/// A variable reference inside a body template.
///
/// These are identifiers prefixed with a `$` sign standing in for a
/// request-time value supplied separately.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct VariableRef<'a> {
    pub name: &'a str,
}

/// Node of a parsed body template.
///
/// A template tree is JSON-shaped with one extra leaf kind: a [VariableRef]
/// that substitution replaces with a concrete value. Besides that marker-
/// prefixed form, a variable leaf is indistinguishable from a string leaf.
#[derive(Debug, PartialEq, Clone)]
pub enum TemplateValue<'a> {
    Variable(VariableRef<'a>),
    String(&'a str),
    Number(Number),
    Boolean(bool),
    Object(TemplateObject<'a>),
    List(TemplateList<'a>),
    /// Representing JSON-like `null` values or the absence of a value
    Null,
}

/// Node for a field of a template Object.
#[derive(Debug, PartialEq, Clone)]
pub struct TemplateField<'a> {
    pub name: &'a str,
    pub value: TemplateValue<'a>,
}

/// Node for a template Object, which is a list of keyed values.
///
/// Fields keep the order in which the template declared them.
#[derive(Debug, PartialEq, Clone)]
pub struct TemplateObject<'a> {
    pub children: Vec<'a, TemplateField<'a>>,
}

impl<'a> TemplateObject<'a> {
    /// Checks whether this Object contains any fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Get a field's value by name
    pub fn get(&self, name: &str) -> Option<&TemplateValue<'a>> {
        self.children
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }
}

/// Node for a template List of values.
#[derive(Debug, PartialEq, Clone)]
pub struct TemplateList<'a> {
    pub children: Vec<'a, TemplateValue<'a>>,
}

impl<'a> TemplateList<'a> {
    /// Checks whether this List contains any values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<'a> TemplateValue<'a> {
    /// Convert a [serde_json::Value] into a template value, verbatim.
    ///
    /// Strings are taken as-is and never reinterpreted as variable references;
    /// this is the conversion substitution uses for replacement values.
    pub fn from_json(ctx: &'a ASTContext, value: &JSValue) -> TemplateValue<'a> {
        match value {
            JSValue::Null => TemplateValue::Null,
            JSValue::Bool(value) => TemplateValue::Boolean(*value),
            JSValue::Number(number) => TemplateValue::Number(number.clone()),
            JSValue::String(string) => TemplateValue::String(ctx.alloc_str(string)),
            JSValue::Array(list) => {
                let mut children = Vec::new_in(&ctx.arena);
                for item in list.iter() {
                    children.push(TemplateValue::from_json(ctx, item));
                }
                TemplateValue::List(TemplateList { children })
            }
            JSValue::Object(map) => {
                let mut children = Vec::new_in(&ctx.arena);
                for (key, value) in map.iter() {
                    children.push(TemplateField {
                        name: ctx.alloc_str(key),
                        value: TemplateValue::from_json(ctx, value),
                    });
                }
                TemplateValue::Object(TemplateObject { children })
            }
        }
    }

    /// Convert this template value back into a [serde_json::Value].
    ///
    /// Variable references render as their marker-prefixed token, which is the
    /// wire representation of an unsubstituted template.
    pub fn to_json(&self) -> JSValue {
        match self {
            TemplateValue::Variable(var) => {
                JSValue::String(format!("{}{}", VARIABLE_MARKER, var.name))
            }
            TemplateValue::String(value) => JSValue::String((*value).into()),
            TemplateValue::Number(number) => JSValue::Number(number.clone()),
            TemplateValue::Boolean(value) => JSValue::Bool(*value),
            TemplateValue::Null => JSValue::Null,
            TemplateValue::List(list) => {
                JSValue::Array(list.children.iter().map(TemplateValue::to_json).collect())
            }
            TemplateValue::Object(object) => {
                let mut map = JSMap::new();
                for field in object.children.iter() {
                    map.insert(field.name.to_string(), field.value.to_json());
                }
                JSValue::Object(map)
            }
        }
    }
}
