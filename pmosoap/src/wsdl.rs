//! Lecture des documents WSDL
//!
//! Un [`WsdlDocument`] garde l'élément racine du WSDL et la table
//! nom d'élément → type déclaré ([`TypeMap`]) extraite des déclarations
//! `<s:element name=".." type=".."/>` du schéma.

use crate::error::{Result, SoapError};
use std::collections::HashMap;
use std::io::BufReader;
use tracing::debug;
use xmltree::{Element, XMLNode};

/// Namespace W3C XML Schema
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// URL de récupération du WSDL d'un endpoint
pub fn wsdl_url(url: &str) -> String {
    format!("{}?wsdl", url)
}

/// Table nom d'élément → type déclaré (ex: "s:int", "s:ArrayOfString")
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeMap {
    types: HashMap<String, String>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Déclare (ou redéclare) le type d'un élément
    pub fn insert(&mut self, name: impl Into<String>, declared_type: impl Into<String>) {
        self.types.insert(name.into(), declared_type.into());
    }

    /// Type déclaré de `name`, chaîne vide si inconnu
    pub fn lookup(&self, name: &str) -> &str {
        self.types.get(name).map(String::as_str).unwrap_or("")
    }

    /// Vrai si le type déclaré de `name` est un type `ArrayOf...`
    pub fn is_array(&self, name: &str) -> bool {
        self.lookup(name).to_lowercase().contains("arrayof")
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TypeMap::new();
        for (name, declared_type) in iter {
            map.insert(name, declared_type);
        }
        map
    }
}

/// Document WSDL analysé
#[derive(Debug, Clone)]
pub struct WsdlDocument {
    url: String,
    root: Element,
    types: TypeMap,
}

impl WsdlDocument {
    /// Parse un WSDL à partir de bytes XML
    ///
    /// `url` est l'endpoint du service, utilisé dans les messages d'erreur.
    pub fn parse(url: &str, xml: &[u8]) -> Result<Self> {
        let root = Element::parse(BufReader::new(xml))?;
        Ok(Self::from_element(url, root))
    }

    pub fn from_element(url: &str, root: Element) -> Self {
        let types = extract_types(&root);
        debug!("WSDL for {} declares {} typed elements", url, types.len());
        Self {
            url: url.to_string(),
            root,
            types,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn types(&self) -> &TypeMap {
        &self.types
    }

    /// Attribut `targetNamespace` de l'élément racine
    ///
    /// # Errors
    ///
    /// [`SoapError::MissingTargetNamespace`] si l'attribut est absent ou vide.
    pub fn target_namespace(&self) -> Result<&str> {
        self.root
            .attributes
            .get("targetNamespace")
            .map(String::as_str)
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| SoapError::MissingTargetNamespace(self.url.clone()))
    }
}

/// Extrait les couples nom → type de toutes les déclarations `element`
///
/// Les balises préfixées (`s:element`, `xsd:element`) comme non préfixées
/// sont acceptées. Les déclarations sans `name` ou sans `type` sont ignorées.
pub fn extract_types(root: &Element) -> TypeMap {
    let mut types = TypeMap::new();
    collect_types(root, &mut types);
    types
}

fn collect_types(element: &Element, types: &mut TypeMap) {
    if is_schema_element(element) {
        if let (Some(name), Some(declared_type)) = (
            element.attributes.get("name"),
            element.attributes.get("type"),
        ) {
            types.insert(name.clone(), declared_type.clone());
        }
    }

    for child in &element.children {
        if let XMLNode::Element(child) = child {
            collect_types(child, types);
        }
    }
}

fn is_schema_element(element: &Element) -> bool {
    element.name == "element"
        && element
            .namespace
            .as_deref()
            .is_none_or(|ns| ns == XSD_NAMESPACE)
}
