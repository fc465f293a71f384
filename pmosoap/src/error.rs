//! Gestion des erreurs pour le client SOAP

use crate::envelope::SoapFault;
use thiserror::Error;

/// Type Result personnalisé pour pmosoap
pub type Result<T> = std::result::Result<T, SoapError>;

/// Erreurs possibles lors d'un appel SOAP
#[derive(Error, Debug)]
pub enum SoapError {
    /// Valeur sans représentation XML
    #[error("Unsupported value type for SOAP serialization: {0}")]
    UnsupportedType(String),

    /// Le serveur a répondu par un SOAP Fault
    #[error("{0}")]
    Fault(SoapFault),

    /// Échec réseau ou HTTP (WSDL ou POST)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Document XML illisible (WSDL ou réponse)
    #[error("XML parse error: {0}")]
    Xml(#[from] xmltree::ParseError),

    /// Le WSDL ne déclare pas de targetNamespace
    #[error("WSDL at {0} has no targetNamespace attribute")]
    MissingTargetNamespace(String),

    /// `spawn_invoke` appelé hors d'un runtime tokio
    #[error("No tokio runtime available to spawn the SOAP call")]
    NoRuntime,

    /// Erreur de configuration
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

/// Erreurs de transport HTTP
#[derive(Error, Debug)]
pub enum TransportError {
    /// Erreur du client HTTP asynchrone
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur du client HTTP bloquant
    #[error("HTTP error: {0}")]
    Blocking(Box<ureq::Error>),

    /// Statut HTTP inattendu sans corps SOAP exploitable
    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    /// La tâche d'appel s'est arrêtée avant de livrer son résultat
    #[error("SOAP call task aborted before completion")]
    Aborted,
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        TransportError::Blocking(Box::new(err))
    }
}

impl From<reqwest::Error> for SoapError {
    fn from(err: reqwest::Error) -> Self {
        SoapError::Transport(TransportError::Http(err))
    }
}

impl From<ureq::Error> for SoapError {
    fn from(err: ureq::Error) -> Self {
        SoapError::Transport(err.into())
    }
}

impl SoapError {
    pub fn unsupported_type(type_name: &str) -> Self {
        SoapError::UnsupportedType(type_name.to_string())
    }

    /// Vérifie si l'erreur est un SOAP Fault
    pub fn is_fault(&self) -> bool {
        matches!(self, SoapError::Fault(_))
    }

    /// Vérifie si l'erreur provient du transport HTTP
    pub fn is_transport(&self) -> bool {
        matches!(self, SoapError::Transport(_))
    }

    /// Retourne le fault SOAP porté par l'erreur, s'il y en a un
    pub fn fault(&self) -> Option<&SoapFault> {
        match self {
            SoapError::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}
