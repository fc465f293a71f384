//! Paramètres d'un appel SOAP et leur sérialisation XML

use crate::error::{Result, SoapError};
use crate::value::SoapValue;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

/// Ensemble ordonné de paramètres nommés
///
/// L'ordre d'insertion est conservé dans le XML émis. Ajouter un nom déjà
/// présent remplace sa valeur sans changer sa position.
///
/// # Exemple
///
/// ```
/// use pmosoap::SoapParameters;
///
/// let params = SoapParameters::new()
///     .add("UserId", 42)
///     .add("Name", "Ada & Bob");
///
/// assert_eq!(
///     params.to_xml().unwrap(),
///     "<UserId>42</UserId><Name>Ada &amp; Bob</Name>"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoapParameters {
    values: IndexMap<String, SoapValue>,
}

impl SoapParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute un paramètre (style builder)
    pub fn add(mut self, name: impl Into<String>, value: impl Into<SoapValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Ajoute un paramètre sur un ensemble emprunté
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SoapValue>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&SoapValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SoapValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sérialise les paramètres en fragment XML
    ///
    /// Les paramètres `Null` sont ignorés.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::new();
        for (name, value) in &self.values {
            if value.is_null() {
                continue;
            }
            push_element(&mut xml, name, &serialize(value)?);
        }
        Ok(xml)
    }
}

impl<K: Into<String>, V: Into<SoapValue>> FromIterator<(K, V)> for SoapParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = SoapParameters::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

fn push_element(xml: &mut String, tag: &str, content: &str) {
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(content);
    xml.push_str("</");
    xml.push_str(tag);
    xml.push('>');
}

/// Sérialise une valeur en contenu XML
///
/// Les membres d'une liste sont enveloppés dans une balise déduite de leur
/// variante (`string`, `int`, `double`, `bool`, `DateTime`...), les champs
/// d'un objet dans une balise portant leur nom.
pub fn serialize(value: &SoapValue) -> Result<String> {
    let xml = match value {
        SoapValue::Null => String::new(),
        SoapValue::String(s) => escape_text(s),
        SoapValue::Int(i) => i.to_string(),
        SoapValue::Bool(b) => b.to_string(),
        SoapValue::Double(d) => format_double(*d),
        SoapValue::DateTime(dt) => format_datetime(dt),
        SoapValue::List(items) => {
            let mut xml = String::new();
            for item in items {
                let tag = item
                    .type_tag()
                    .ok_or_else(|| SoapError::unsupported_type("null"))?;
                push_element(&mut xml, tag, &serialize(item)?);
            }
            xml
        }
        SoapValue::Map(fields) => {
            let mut xml = String::new();
            for (name, field) in fields {
                push_element(&mut xml, name, &serialize(field)?);
            }
            xml
        }
    };
    Ok(xml)
}

/// Échappe `&`, `<` et `>` (contenu d'élément, pas d'attribut)
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let inf = if value > 0.0 { "INF" } else { "-INF" };
        inf.to_string()
    } else {
        value.to_string()
    }
}

/// Format `YYYY-MM-DDTHH:mm:ss.mmm±HH:MM`
pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    let offset_secs = dt.offset().local_minus_utc();
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let total_minutes = offset_secs.unsigned_abs() / 60;
    format!(
        "{}{}{:02}:{:02}",
        dt.format("%Y-%m-%dT%H:%M:%S%.3f"),
        sign,
        total_minutes / 60,
        total_minutes % 60
    )
}
