use arc_swap::ArcSwap;
use hashbrown::HashMap;
use std::sync::Arc;

use crate::schema::{
    Schema, SchemaDirectives, SchemaField, SchemaFields, SchemaInterfaces, SchemaType,
};

/// The directive carrying storage-level naming overrides.
const DGRAPH_DIRECTIVE: &str = "dgraph";
/// Directive argument naming a storage-level type prefix on a type or interface.
const TYPE_ARGUMENT: &str = "type";
/// Directive argument naming a storage-level predicate directly on a field.
const PRED_ARGUMENT: &str = "pred";

/// The compiled mapping from GraphQL type and field names onto storage
/// predicate names.
///
/// A predicate map is a pure function of the schema definition: it is resolved
/// once at schema load and consulted, read-only, for the rest of the schema's
/// life. The map owns its strings so it can outlive the schema's arena and be
/// shared across threads behind an [Arc].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredicateMap {
    types: HashMap<String, HashMap<String, String>>,
}

impl PredicateMap {
    /// Create an empty predicate map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles the full predicate map for a schema.
    ///
    /// Interfaces resolve first: a field declared on an interface maps to one
    /// predicate, shared verbatim by every implementing type. Fields declared
    /// directly on a type resolve through three tiers, in order: an explicit
    /// `@dgraph(pred:)` override on the field, the type's `@dgraph(type:)`
    /// prefix joined with the field name, and finally the type's own name
    /// joined with the field name. Identifier fields carry no predicate and
    /// root operation types get no entries.
    pub fn resolve(schema: &Schema<'_>) -> Self {
        let mut types: HashMap<String, HashMap<String, String>> = HashMap::new();

        for typ in schema.types.values() {
            if let SchemaType::Interface(interface) = typ {
                let prefix = type_prefix(interface.name, &interface.directives);
                let mut entry = HashMap::new();
                for field in interface.get_fields() {
                    if field.is_id() {
                        continue;
                    }
                    entry.insert(field.name.to_string(), field_predicate(field, prefix));
                }
                types.insert(interface.name.to_string(), entry);
            }
        }

        for typ in schema.types.values() {
            if let SchemaType::Object(object) = typ {
                if schema.is_root_type(object.name) {
                    continue;
                }

                let mut entry = HashMap::new();
                // Inherited fields reuse the interface's predicate and are
                // never re-derived from the object's own overrides.
                for interface in object.get_interfaces() {
                    if let Some(interface_entry) = types.get(*interface) {
                        for (field, predicate) in interface_entry.iter() {
                            entry
                                .entry(field.clone())
                                .or_insert_with(|| predicate.clone());
                        }
                    }
                }

                let prefix = type_prefix(object.name, &object.directives);
                for field in object.get_fields() {
                    if field.is_id() {
                        continue;
                    }
                    if let Some(predicate) = field_override(field) {
                        entry.insert(field.name.to_string(), predicate.to_string());
                    } else if !entry.contains_key(field.name) {
                        entry.insert(field.name.to_string(), field_predicate(field, prefix));
                    }
                }
                types.insert(object.name.to_string(), entry);
            }
        }

        // Mutation payload types mirror their base type's entry, by value.
        // Only types with an identifier field receive update and delete
        // mutations, so only those get payload entries.
        let mut payloads = HashMap::new();
        for typ in schema.types.values() {
            let name = match typ {
                SchemaType::Object(object) if has_id_field(schema, object.get_fields(), object.get_interfaces()) => object.name,
                SchemaType::Interface(interface) if interface.get_fields().iter().any(SchemaField::is_id) => interface.name,
                _ => continue,
            };
            if schema.is_root_type(name) {
                continue;
            }
            if let Some(entry) = types.get(name) {
                payloads.insert(format!("Update{}Payload", name), entry.clone());
                payloads.insert(format!("Delete{}Payload", name), entry.clone());
            }
        }
        types.extend(payloads);

        PredicateMap { types }
    }

    /// Look up the storage predicate a field of a type maps onto.
    pub fn predicate(&self, type_name: &str, field_name: &str) -> Option<&str> {
        self.types
            .get(type_name)
            .and_then(|fields| fields.get(field_name))
            .map(String::as_str)
    }

    /// Returns the field-to-predicate mapping of a single type.
    pub fn type_predicates(&self, type_name: &str) -> Option<&HashMap<String, String>> {
        self.types.get(type_name)
    }

    /// The number of types with predicate entries.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Checks whether the map contains any entries.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Handle for publishing a [PredicateMap] to concurrently running readers.
///
/// A schema reload resolves a brand-new map and stores it wholesale. Readers
/// observe either the previous or the new complete map, never a partially
/// built one, and may hold onto a loaded snapshot for as long as they need it.
pub struct SharedPredicateMap {
    inner: ArcSwap<PredicateMap>,
}

impl SharedPredicateMap {
    /// Create a new handle publishing the given map.
    pub fn new(map: PredicateMap) -> Self {
        SharedPredicateMap {
            inner: ArcSwap::from_pointee(map),
        }
    }

    /// Returns a snapshot of the currently published map.
    pub fn load(&self) -> Arc<PredicateMap> {
        self.inner.load_full()
    }

    /// Publishes a newly resolved map, replacing the previous one.
    pub fn store(&self, map: PredicateMap) {
        self.inner.store(Arc::new(map));
    }
}

impl Default for SharedPredicateMap {
    fn default() -> Self {
        Self::new(PredicateMap::new())
    }
}

fn type_prefix<'a>(name: &'a str, directives: &SchemaDirectives<'a>) -> &'a str {
    directives
        .get(DGRAPH_DIRECTIVE)
        .and_then(|directive| directive.string_argument(TYPE_ARGUMENT))
        .unwrap_or(name)
}

fn field_override<'a>(field: &SchemaField<'a>) -> Option<&'a str> {
    field
        .directives
        .get(DGRAPH_DIRECTIVE)
        .and_then(|directive| directive.string_argument(PRED_ARGUMENT))
}

fn field_predicate(field: &SchemaField<'_>, prefix: &str) -> String {
    match field_override(field) {
        Some(predicate) => predicate.to_string(),
        None => format!("{}.{}", prefix, field.name),
    }
}

/// Whether a type carries an identifier field, either declared directly or
/// inherited from an implemented interface.
fn has_id_field(schema: &Schema<'_>, fields: &[SchemaField<'_>], interfaces: &[&str]) -> bool {
    if fields.iter().any(SchemaField::is_id) {
        return true;
    }
    interfaces.iter().any(|name| {
        schema
            .get_type(name)
            .and_then(SchemaType::interface)
            .map_or(false, |interface| {
                interface.get_fields().iter().any(SchemaField::is_id)
            })
    })
}
