//! # pmosoap - Client SOAP 1.1 piloté par WSDL
//!
//! Cette crate transforme un nom d'action et des paramètres natifs en
//! requête SOAP, l'envoie en HTTP, puis convertit la réponse XML en valeurs
//! natives. Le WSDL du service fait autorité pour le typage : c'est lui qui
//! dit si `<Age>3</Age>` est un entier et si `<Items>` est une liste.
//!
//! ## Architecture
//!
//! - [`SoapParameters`] : paramètres ordonnés d'un appel et sérialisation XML
//! - [`SoapValue`] : modèle fermé des valeurs échangées
//! - [`WsdlDocument`] / [`TypeMap`] : table nom d'élément → type déclaré
//! - [`WsdlCache`] : cache des WSDL par endpoint, propre à chaque client
//! - [`SoapClient`] : enchaîne WSDL, enveloppe, POST et désérialisation
//!
//! ## Structure des modules
//!
//! ```text
//! pmosoap/
//! ├── src/
//! │   ├── lib.rs          # Module principal (ce fichier)
//! │   ├── client.rs       # SoapClient (modes async, tâche, bloquant)
//! │   ├── params.rs       # SoapParameters et sérialisation
//! │   ├── value.rs        # SoapValue
//! │   ├── wsdl.rs         # WsdlDocument, TypeMap
//! │   ├── cache.rs        # WsdlCache
//! │   ├── envelope.rs     # Enveloppes et SOAP Faults
//! │   ├── deserialize.rs  # Réponse XML → SoapValue
//! │   ├── auth.rs         # HTTP Basic
//! │   ├── config.rs       # SoapConfig
//! │   └── error.rs        # Gestion des erreurs
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmosoap::{SoapClient, SoapParameters, SoapError};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SoapClient::new()?;
//!     client.set_credentials("alice", "s3cret");
//!
//!     let params = SoapParameters::new()
//!         .add("UserId", 42)
//!         .add("IncludeGroups", true);
//!
//!     match client.invoke("http://localhost/Users.asmx", "GetUser", &params).await {
//!         Ok(user) => println!("{:?}", user.get("Name")),
//!         Err(SoapError::Fault(fault)) => eprintln!("server fault: {}", fault),
//!         Err(e) => return Err(e.into()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Cache WSDL
//!
//! Le WSDL d'un endpoint est téléchargé (`GET <url>?wsdl`) au premier appel
//! puis conservé par le client pour toute sa durée de vie. Pour forcer un
//! nouveau téléchargement, utiliser [`SoapClient::forget_wsdl`].

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod deserialize;
pub mod envelope;
pub mod error;
pub mod params;
pub mod value;
pub mod wsdl;

pub use auth::Credentials;
pub use cache::WsdlCache;
pub use client::{SoapCall, SoapClient, SoapOutcome, SoapReply};
pub use config::SoapConfig;
pub use envelope::SoapFault;
pub use error::{Result, SoapError, TransportError};
pub use params::SoapParameters;
pub use value::SoapValue;
pub use wsdl::{TypeMap, WsdlDocument};
