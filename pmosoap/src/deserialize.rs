//! Conversion des réponses XML en [`SoapValue`]
//!
//! Le texte XML n'est pas typé : c'est le type déclaré dans le WSDL pour
//! chaque balise qui décide si `"1"` est l'entier 1 ou la chaîne `"1"`, et
//! si des balises répétées forment une liste ou un objet.

use crate::value::SoapValue;
use crate::wsdl::TypeMap;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use tracing::debug;
use xmltree::{Element, XMLNode};

/// Convertit un nœud XML quelconque
///
/// `parent` est le nom de l'élément contenant `node` : c'est son type
/// déclaré qui s'applique aux nœuds texte.
pub fn to_value(node: Option<&XMLNode>, parent: &str, types: &TypeMap) -> SoapValue {
    match node {
        None => SoapValue::Null,
        Some(XMLNode::Text(text)) | Some(XMLNode::CData(text)) => {
            text_to_value(Some(text.as_str()), types.lookup(parent))
        }
        Some(XMLNode::Element(element)) => node_to_value(element, types),
        Some(_) => SoapValue::Null,
    }
}

/// Convertit un élément et son sous-arbre
pub fn node_to_value(element: &Element, types: &TypeMap) -> SoapValue {
    let children: Vec<&XMLNode> = element
        .children
        .iter()
        .filter(|node| is_significant(node))
        .collect();

    // Feuille : un seul nœud texte
    if let [single] = children.as_slice() {
        if matches!(single, XMLNode::Text(_) | XMLNode::CData(_)) {
            return to_value(Some(*single), &element.name, types);
        }
    }

    let declared_type = types.lookup(&element.name);
    let is_array = types.is_array(&element.name);

    if children.is_empty() {
        return if is_array {
            SoapValue::List(Vec::new())
        } else if is_scalar_type(declared_type) {
            text_to_value(None, declared_type)
        } else {
            SoapValue::Null
        };
    }

    let elements = children.into_iter().filter_map(XMLNode::as_element);
    if is_array {
        SoapValue::List(elements.map(|child| node_to_value(child, types)).collect())
    } else {
        SoapValue::Map(
            elements
                .map(|child| (child.name.clone(), node_to_value(child, types)))
                .collect(),
        )
    }
}

fn is_significant(node: &XMLNode) -> bool {
    match node {
        XMLNode::Element(_) | XMLNode::CData(_) => true,
        XMLNode::Text(text) => !text.trim().is_empty(),
        _ => false,
    }
}

/// Nom du type sans préfixe de namespace, en minuscules
fn scalar_kind(declared_type: &str) -> String {
    declared_type
        .rsplit(':')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

fn is_scalar_type(declared_type: &str) -> bool {
    matches!(
        scalar_kind(declared_type).as_str(),
        "boolean" | "int" | "long" | "double" | "datetime" | "string"
    )
}

/// Convertit un texte selon le type déclaré de son élément
pub fn text_to_value(text: Option<&str>, declared_type: &str) -> SoapValue {
    let text = text.unwrap_or_default();
    match scalar_kind(declared_type).as_str() {
        "boolean" => SoapValue::Bool(text == "true"),
        "int" | "long" => SoapValue::Int(parse_integer(text, declared_type)),
        "double" => SoapValue::Double(parse_number(text, declared_type)),
        "datetime" => parse_datetime(text)
            .map(SoapValue::DateTime)
            .unwrap_or(SoapValue::Null),
        _ => SoapValue::String(text.to_string()),
    }
}

fn parse_number<T: std::str::FromStr + Default>(text: &str, declared_type: &str) -> T {
    let text = text.trim();
    if text.is_empty() {
        return T::default();
    }
    text.parse().unwrap_or_else(|_| {
        debug!("Cannot parse {:?} as {}, using default", text, declared_type);
        T::default()
    })
}

/// Lit l'entier en tête du texte (`"3.7"` donne 3, `"12px"` donne 12)
fn parse_integer(text: &str, declared_type: &str) -> i64 {
    let text = text.trim_start();
    let digits_start = usize::from(text.starts_with(['+', '-']));
    let digits_end = text[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |i| digits_start + i);
    if digits_end == digits_start {
        if !text.is_empty() {
            debug!("Cannot parse {:?} as {}, using default", text, declared_type);
        }
        return 0;
    }
    parse_number(&text[..digits_end], declared_type)
}

/// Parse une date SOAP
///
/// Une date avec décalage horaire est lue en RFC 3339. Sinon les fractions
/// de seconde sont retirées et la date est interprétée en heure locale.
pub fn parse_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    let without_fraction = match text.rfind('.') {
        Some(idx) => &text[..idx],
        None => text,
    };
    let normalized = without_fraction.replace(['T', 't'], " ").replace('-', "/");

    let naive = NaiveDateTime::parse_from_str(&normalized, "%Y/%m/%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(&normalized, "%Y/%m/%d")
                .map(|date| date.and_time(NaiveTime::default()))
        });

    match naive {
        Ok(naive) => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset()),
        Err(_) => {
            debug!("Cannot parse {:?} as a date", text);
            None
        }
    }
}
