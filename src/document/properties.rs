use std::sync::Arc;

use glam::Vec3;
use rustc_hash::FxHashMap;

/// A single typed property value as produced by the document parser.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Vector3(Vec3),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Text(String),
}

/// Name → value table of a source object.
///
/// Lookups that miss fall through to the optional template table, which the
/// source format uses to share defaults between all objects of one class.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    values: FxHashMap<String, PropertyValue>,
    template: Option<Arc<PropertyTable>>,
}

impl PropertyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table backed by a shared template.
    #[must_use]
    pub fn with_template(template: Arc<PropertyTable>) -> Self {
        Self {
            values: FxHashMap::default(),
            template: Some(template),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Builder-style helper for vector properties.
    #[must_use]
    pub fn with_vec3(mut self, name: &str, value: Vec3) -> Self {
        self.insert(name, PropertyValue::Vector3(value));
        self
    }

    /// Builder-style helper for integer properties.
    #[must_use]
    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.insert(name, PropertyValue::Integer(value));
        self
    }

    /// Raw lookup, consulting the template on miss.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values
            .get(name)
            .or_else(|| self.template.as_deref().and_then(|t| t.get(name)))
    }

    /// Returns `true` if the property is present in this table or its template.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        match self.get(name)? {
            PropertyValue::Vector3(v) => Some(*v),
            other => {
                log::warn!("Property '{name}' is not a vector: {other:?}");
                None
            }
        }
    }

    /// Integer lookup. Booleans and numbers are accepted as the parser may
    /// store enum codes under either type.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::Integer(v) => Some(*v),
            PropertyValue::Bool(b) => Some(i64::from(*b)),
            PropertyValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            other => {
                log::warn!("Property '{name}' is not an integer: {other:?}");
                None
            }
        }
    }

    #[must_use]
    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PropertyValue::Number(v) => Some(*v),
            PropertyValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
