//! Cache des documents WSDL
//!
//! Le cache appartient à un [`SoapClient`](crate::SoapClient) et est partagé
//! par tous ses appels. Les entrées, indexées par l'URL exacte de
//! l'endpoint, ne sont jamais rafraîchies automatiquement : seul
//! [`WsdlCache::remove`] ou [`WsdlCache::clear`] force un nouveau
//! téléchargement.

use crate::wsdl::WsdlDocument;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct WsdlCache {
    documents: RwLock<HashMap<String, Arc<WsdlDocument>>>,
}

impl WsdlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Récupère le WSDL d'un endpoint depuis le cache
    pub fn get(&self, url: &str) -> Option<Arc<WsdlDocument>> {
        self.documents.read().get(url).cloned()
    }

    /// Ajoute un WSDL au cache
    ///
    /// Deux premiers téléchargements concurrents du même endpoint
    /// s'écrasent : le dernier écrit gagne.
    pub fn insert(&self, url: &str, document: WsdlDocument) -> Arc<WsdlDocument> {
        let document = Arc::new(document);
        self.documents
            .write()
            .insert(url.to_string(), document.clone());
        document
    }

    /// Invalide le WSDL d'un endpoint
    pub fn remove(&self, url: &str) -> Option<Arc<WsdlDocument>> {
        self.documents.write().remove(url)
    }

    pub fn clear(&self) {
        self.documents.write().clear();
    }

    pub fn contains(&self, url: &str) -> bool {
        self.documents.read().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}
