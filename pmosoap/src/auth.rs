//! Authentification HTTP Basic
//!
//! L'en-tête `Authorization` est envoyé dès la première requête : certains
//! serveurs SOAP ne gèrent pas le challenge/réponse HTTP Basic.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Couple identifiant / mot de passe
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Valeur de l'en-tête `Authorization`
    pub fn authorization_header(&self) -> String {
        format!(
            "Basic {}",
            to_base64(&format!("{}:{}", self.username, self.password))
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Encode une chaîne UTF-8 en base64 standard
pub fn to_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}
