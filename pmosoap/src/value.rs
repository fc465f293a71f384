//! Modèle de valeurs échangées avec un service SOAP
//!
//! [`SoapValue`] est un type fermé : chaque variante correspond à une
//! représentation XML connue, ce qui permet de choisir la balise d'un
//! élément de liste sans inspection dynamique.

use crate::error::{Result, SoapError};
use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Valeur native sérialisable en XML ou désérialisée depuis une réponse
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SoapValue {
    #[default]
    Null,
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    DateTime(DateTime<FixedOffset>),
    /// Séquence ordonnée (types `ArrayOf...`)
    List(Vec<SoapValue>),
    /// Objet : clés dans l'ordre d'insertion
    Map(IndexMap<String, SoapValue>),
}

impl SoapValue {
    /// Convertit n'importe quelle valeur `Serialize` (struct, vecteur...)
    ///
    /// Les objets deviennent des `Map` dans l'ordre des champs, les
    /// séquences des `List`.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)
            .map_err(|_| SoapError::unsupported_type(std::any::type_name::<T>()))?;
        Ok(Self::from_json(json))
    }

    fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => SoapValue::Null,
            JsonValue::Bool(b) => SoapValue::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => SoapValue::Int(i),
                None => SoapValue::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => SoapValue::String(s),
            JsonValue::Array(items) => {
                SoapValue::List(items.into_iter().map(Self::from_json).collect())
            }
            JsonValue::Object(fields) => SoapValue::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Balise utilisée pour un membre de liste, `None` pour `Null`
    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            SoapValue::Null => None,
            SoapValue::String(_) => Some("string"),
            SoapValue::Int(_) => Some("int"),
            SoapValue::Double(_) => Some("double"),
            SoapValue::Bool(_) => Some("bool"),
            SoapValue::DateTime(_) => Some("DateTime"),
            SoapValue::List(_) => Some("Array"),
            SoapValue::Map(_) => Some("Object"),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SoapValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SoapValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SoapValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SoapValue::Double(d) => Some(*d),
            SoapValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SoapValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            SoapValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SoapValue]> {
        match self {
            SoapValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, SoapValue>> {
        match self {
            SoapValue::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Accès à un champ d'objet
    pub fn get(&self, key: &str) -> Option<&SoapValue> {
        self.as_map().and_then(|fields| fields.get(key))
    }
}

impl From<&str> for SoapValue {
    fn from(value: &str) -> Self {
        SoapValue::String(value.to_string())
    }
}

impl From<String> for SoapValue {
    fn from(value: String) -> Self {
        SoapValue::String(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SoapValue {
                fn from(value: $t) -> Self {
                    SoapValue::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for SoapValue {
    fn from(value: f32) -> Self {
        SoapValue::Double(f64::from(value))
    }
}

impl From<f64> for SoapValue {
    fn from(value: f64) -> Self {
        SoapValue::Double(value)
    }
}

impl From<bool> for SoapValue {
    fn from(value: bool) -> Self {
        SoapValue::Bool(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for SoapValue {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        SoapValue::DateTime(value.with_timezone(&offset))
    }
}

impl<T: Into<SoapValue>> From<Vec<T>> for SoapValue {
    fn from(items: Vec<T>) -> Self {
        SoapValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SoapValue>> From<IndexMap<String, T>> for SoapValue {
    fn from(fields: IndexMap<String, T>) -> Self {
        SoapValue::Map(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<SoapValue>> From<Option<T>> for SoapValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SoapValue::Null)
    }
}
