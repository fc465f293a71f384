//! Enveloppes SOAP 1.1 : construction des requêtes, lecture des réponses

use crate::error::Result;
use std::fmt;
use std::io::BufReader;
use xmltree::{Element, XMLNode};

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// Valeur de l'en-tête `Content-Type` des requêtes SOAP 1.1
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Construit l'enveloppe d'une requête
///
/// * `namespace` - targetNamespace du WSDL, namespace par défaut de l'action
/// * `method` - nom de l'action (ex: "GetUser")
/// * `params_xml` - paramètres déjà sérialisés
pub fn build_soap_request(namespace: &str, method: &str, params_xml: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:xsi="{xsi}" xmlns:xsd="{xsd}" xmlns:soap="{soap}">"#,
            r#"<soap:Body><{method} xmlns="{ns}">{params}</{method}></soap:Body>"#,
            r#"</soap:Envelope>"#
        ),
        xsi = XSI_NS,
        xsd = XSD_NS,
        soap = SOAP_ENVELOPE_NS,
        method = method,
        ns = namespace,
        params = params_xml,
    )
}

/// Valeur de l'en-tête `SOAPAction` : `namespace[/]method`
pub fn soap_action(namespace: &str, method: &str) -> String {
    if namespace.ends_with('/') {
        format!("{}{}", namespace, method)
    } else {
        format!("{}/{}", namespace, method)
    }
}

/// Parse le corps XML d'une réponse
pub fn parse_response(xml: &[u8]) -> Result<Element> {
    Ok(Element::parse(BufReader::new(xml))?)
}

/// Erreur SOAP (Fault)
#[derive(Debug, Clone, PartialEq)]
pub struct SoapFault {
    /// Code du fault (ex: "soap:Server")
    pub fault_code: String,

    /// Description de l'erreur
    pub fault_string: String,

    /// Origine du fault, si le serveur la fournit
    pub fault_actor: Option<String>,
}

impl SoapFault {
    pub fn new(fault_code: impl Into<String>, fault_string: impl Into<String>) -> Self {
        Self {
            fault_code: fault_code.into(),
            fault_string: fault_string.into(),
            fault_actor: None,
        }
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fault_string)
    }
}

/// Ce qu'une réponse contient
#[derive(Debug)]
pub enum ResponseContent<'a> {
    /// Élément `<Method>Result` ou `<return>`
    Result(&'a Element),
    Fault(SoapFault),
    /// Ni résultat ni fault (action sans valeur de retour)
    Empty,
}

/// Localise le résultat d'une action dans une réponse
///
/// Cherche, dans l'ordre du document, `<{method}Result>`, puis `<return>`,
/// puis `<faultcode>`.
pub fn locate_result<'a>(root: &'a Element, method: &str) -> ResponseContent<'a> {
    let result_name = format!("{}Result", method);
    if let Some(result) = find_descendant(root, &result_name) {
        return ResponseContent::Result(result);
    }
    if let Some(result) = find_descendant(root, "return") {
        return ResponseContent::Result(result);
    }
    match find_descendant(root, "faultcode") {
        Some(code) => ResponseContent::Fault(SoapFault {
            fault_code: element_text(code),
            fault_string: find_descendant(root, "faultstring")
                .map(element_text)
                .unwrap_or_default(),
            fault_actor: find_descendant(root, "faultactor").map(element_text),
        }),
        None => ResponseContent::Empty,
    }
}

/// Premier descendant (ou soi-même) portant ce nom local
pub fn find_descendant<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    if element.name == name {
        return Some(element);
    }
    element.children.iter().find_map(|node| match node {
        XMLNode::Element(child) => find_descendant(child, name),
        _ => None,
    })
}

fn element_text(element: &Element) -> String {
    element
        .get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}
