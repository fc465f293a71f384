//! Client SOAP haut-niveau
//!
//! [`SoapClient`] enchaîne, pour chaque appel : récupération du WSDL (ou
//! lecture du cache), construction de l'enveloppe, POST HTTP puis
//! conversion de la réponse en [`SoapValue`].
//!
//! Trois modes d'appel sont proposés :
//! - [`SoapClient::invoke`] : future à attendre dans un runtime tokio
//! - [`SoapClient::spawn_invoke`] : tâche tokio détachée, résultat livré
//!   une seule fois par le handle [`SoapCall`]
//! - [`SoapClient::invoke_blocking`] : appel bloquant (client `ureq`), à
//!   utiliser hors de toute tâche asynchrone

use crate::auth::Credentials;
use crate::cache::WsdlCache;
use crate::config::SoapConfig;
use crate::deserialize::node_to_value;
use crate::envelope::{
    CONTENT_TYPE, ResponseContent, build_soap_request, locate_result, parse_response, soap_action,
};
use crate::error::{Result, SoapError, TransportError};
use crate::params::SoapParameters;
use crate::value::SoapValue;
use crate::wsdl::{WsdlDocument, wsdl_url};
use parking_lot::RwLock;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use ureq::Agent;
use xmltree::Element;

/// Résultat d'un appel réussi, avec le document de réponse brut
#[derive(Debug, Clone)]
pub struct SoapReply {
    pub value: SoapValue,
    pub document: Element,
}

/// Issue d'un appel lancé par [`SoapClient::spawn_invoke`]
///
/// `document` est présent dès que le serveur a renvoyé un XML lisible,
/// y compris pour un SOAP Fault.
#[derive(Debug)]
pub struct SoapOutcome {
    pub result: Result<SoapValue>,
    pub document: Option<Element>,
}

impl SoapOutcome {
    fn failed(error: SoapError) -> Self {
        Self {
            result: Err(error),
            document: None,
        }
    }
}

/// Handle d'un appel SOAP en cours
///
/// Le handle est une future qui se résout une seule fois. S'il est
/// abandonné avant la fin de l'appel, une erreur éventuelle est
/// journalisée (`warn`) au lieu d'être perdue.
#[derive(Debug)]
pub struct SoapCall {
    rx: oneshot::Receiver<SoapOutcome>,
}

impl Future for SoapCall {
    type Output = SoapOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| {
                received.unwrap_or_else(|_| SoapOutcome::failed(TransportError::Aborted.into()))
            })
    }
}

/// Réponse analysée : le document et ce qu'il signifie
struct Exchange {
    document: Element,
    result: Result<SoapValue>,
}

impl From<Result<Exchange>> for SoapOutcome {
    fn from(exchange: Result<Exchange>) -> Self {
        match exchange {
            Ok(exchange) => SoapOutcome {
                result: exchange.result,
                document: Some(exchange.document),
            },
            Err(error) => SoapOutcome::failed(error),
        }
    }
}

struct ClientInner {
    http: reqwest::Client,
    agent: Agent,
    user_agent: String,
    cache: WsdlCache,
    credentials: RwLock<Option<Credentials>>,
}

/// Client SOAP 1.1 piloté par WSDL
///
/// Le client se clone à faible coût : les clones partagent le cache WSDL
/// et les identifiants.
///
/// # Exemple
///
/// ```rust,no_run
/// use pmosoap::{SoapClient, SoapParameters};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = SoapClient::new()?;
///     let params = SoapParameters::new().add("UserId", 42);
///
///     let user = client
///         .invoke("http://localhost/UserService.asmx", "GetUser", &params)
///         .await?;
///     println!("{:?}", user);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SoapClient {
    inner: Arc<ClientInner>,
}

impl SoapClient {
    /// Crée un client avec la configuration par défaut
    pub fn new() -> Result<Self> {
        Self::from_config(&SoapConfig::default())
    }

    /// Crée un client depuis une configuration
    pub fn from_config(config: &SoapConfig) -> Result<Self> {
        info!(
            "Creating SOAP client (timeout {}s, authenticated: {})",
            config.timeout_secs,
            config.credentials().is_some()
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Les faults SOAP arrivent avec un statut 500 : le corps doit
        // rester lisible, le statut n'est donc pas une erreur pour ureq.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .build()
            .into();

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                agent,
                user_agent: config.user_agent.clone(),
                cache: WsdlCache::new(),
                credentials: RwLock::new(config.credentials()),
            }),
        })
    }

    /// Charge la configuration (fichier optionnel + environnement) et crée le client
    pub fn from_config_file(path: Option<&std::path::Path>) -> Result<Self> {
        let config = SoapConfig::load(path)?;
        Self::from_config(&config)
    }

    // ============ Identifiants ============

    /// Définit les identifiants HTTP Basic utilisés par tous les appels suivants
    pub fn set_credentials(&self, username: impl Into<String>, password: impl Into<String>) {
        *self.inner.credentials.write() = Some(Credentials::new(username, password));
    }

    pub fn clear_credentials(&self) {
        *self.inner.credentials.write() = None;
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.inner.credentials.read().clone()
    }

    fn authorization(&self) -> Option<String> {
        self.inner
            .credentials
            .read()
            .as_ref()
            .map(Credentials::authorization_header)
    }

    // ============ Cache WSDL ============

    /// WSDL déjà chargé pour cet endpoint
    pub fn cached_wsdl(&self, url: &str) -> Option<Arc<WsdlDocument>> {
        self.inner.cache.get(url)
    }

    /// Oublie le WSDL d'un endpoint : le prochain appel le retélécharge
    pub fn forget_wsdl(&self, url: &str) -> bool {
        self.inner.cache.remove(url).is_some()
    }

    pub fn clear_wsdl_cache(&self) {
        self.inner.cache.clear();
    }

    pub fn wsdl_cache(&self) -> &WsdlCache {
        &self.inner.cache
    }

    // ============ Mode asynchrone ============

    /// Appelle `method` sur l'endpoint `url`
    ///
    /// Les erreurs de sérialisation des paramètres sont retournées avant
    /// toute requête réseau.
    pub async fn invoke(
        &self,
        url: &str,
        method: &str,
        params: &SoapParameters,
    ) -> Result<SoapValue> {
        Ok(self.invoke_with_document(url, method, params).await?.value)
    }

    /// Comme [`invoke`](Self::invoke), en retournant aussi le document de réponse
    pub async fn invoke_with_document(
        &self,
        url: &str,
        method: &str,
        params: &SoapParameters,
    ) -> Result<SoapReply> {
        let params_xml = params.to_xml()?;
        let exchange = self.exchange(url, method, &params_xml).await?;
        Ok(SoapReply {
            value: exchange.result?,
            document: exchange.document,
        })
    }

    /// Lance l'appel dans une tâche tokio et retourne immédiatement
    ///
    /// Les paramètres sont sérialisés avant le lancement : une
    /// [`SoapError::UnsupportedType`] est donc retournée ici, pas via le
    /// handle.
    ///
    /// # Errors
    ///
    /// [`SoapError::NoRuntime`] hors d'un runtime tokio.
    pub fn spawn_invoke(
        &self,
        url: &str,
        method: &str,
        params: &SoapParameters,
    ) -> Result<SoapCall> {
        let params_xml = params.to_xml()?;
        let handle = tokio::runtime::Handle::try_current().map_err(|_| SoapError::NoRuntime)?;

        let (tx, rx) = oneshot::channel();
        let client = self.clone();
        let url = url.to_string();
        let method = method.to_string();

        handle.spawn(async move {
            let outcome: SoapOutcome = client.exchange(&url, &method, &params_xml).await.into();
            if let Err(outcome) = tx.send(outcome) {
                report_unclaimed(&url, &method, &outcome);
            }
        });

        Ok(SoapCall { rx })
    }

    async fn exchange(&self, url: &str, method: &str, params_xml: &str) -> Result<Exchange> {
        let wsdl = self.load_wsdl(url).await?;
        let namespace = wsdl.target_namespace()?;
        let envelope = build_soap_request(namespace, method, params_xml);
        let action = soap_action(namespace, method);

        debug!("POST {} (SOAPAction: {})", url, action);

        let mut request = self
            .inner
            .http
            .post(url)
            .header("Content-Type", CONTENT_TYPE)
            .header("SOAPAction", action.as_str())
            .body(envelope);
        if let Some(authorization) = self.authorization() {
            request = request.header("Authorization", authorization);
        }

        let response = request.send().await.map_err(|e| {
            warn!("SOAP request to {} failed: {}", url, e);
            SoapError::from(e)
        })?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        interpret_response(url, method, status, &body, &wsdl)
    }

    async fn load_wsdl(&self, url: &str) -> Result<Arc<WsdlDocument>> {
        if let Some(wsdl) = self.inner.cache.get(url) {
            debug!("WSDL for {} found in cache", url);
            return Ok(wsdl);
        }

        let location = wsdl_url(url);
        debug!("GET {}", location);

        let response = self.inner.http.get(&location).send().await.map_err(|e| {
            warn!("WSDL request to {} failed: {}", location, e);
            SoapError::from(e)
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!("WSDL request to {} answered {}", location, status);
            return Err(TransportError::Status {
                url: location,
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.bytes().await?;
        let wsdl = WsdlDocument::parse(url, &body)?;
        info!("WSDL for {} loaded ({} typed elements)", url, wsdl.types().len());

        Ok(self.inner.cache.insert(url, wsdl))
    }

    // ============ Mode bloquant ============

    /// Appel bloquant : attend la réponse avant de retourner
    ///
    /// Ne doit pas être appelé depuis une tâche asynchrone.
    pub fn invoke_blocking(
        &self,
        url: &str,
        method: &str,
        params: &SoapParameters,
    ) -> Result<SoapValue> {
        Ok(self.invoke_blocking_with_document(url, method, params)?.value)
    }

    pub fn invoke_blocking_with_document(
        &self,
        url: &str,
        method: &str,
        params: &SoapParameters,
    ) -> Result<SoapReply> {
        let params_xml = params.to_xml()?;
        let wsdl = self.load_wsdl_blocking(url)?;
        let namespace = wsdl.target_namespace()?;
        let envelope = build_soap_request(namespace, method, &params_xml);
        let action = soap_action(namespace, method);

        debug!("POST {} (SOAPAction: {}, blocking)", url, action);

        let mut request = self
            .inner
            .agent
            .post(url)
            .header("Content-Type", CONTENT_TYPE)
            .header("SOAPAction", action.as_str())
            .header("User-Agent", self.inner.user_agent.as_str());
        if let Some(authorization) = self.authorization() {
            request = request.header("Authorization", authorization.as_str());
        }

        let mut response = request.send(envelope).map_err(|e| {
            warn!("SOAP request to {} failed: {}", url, e);
            SoapError::from(e)
        })?;
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        let exchange = interpret_response(url, method, status, body.as_bytes(), &wsdl)?;
        Ok(SoapReply {
            value: exchange.result?,
            document: exchange.document,
        })
    }

    fn load_wsdl_blocking(&self, url: &str) -> Result<Arc<WsdlDocument>> {
        if let Some(wsdl) = self.inner.cache.get(url) {
            debug!("WSDL for {} found in cache", url);
            return Ok(wsdl);
        }

        let location = wsdl_url(url);
        debug!("GET {} (blocking)", location);

        let mut response = self
            .inner
            .agent
            .get(&location)
            .header("User-Agent", self.inner.user_agent.as_str())
            .call()
            .map_err(|e| {
                warn!("WSDL request to {} failed: {}", location, e);
                SoapError::from(e)
            })?;
        let status = response.status();
        if !status.is_success() {
            warn!("WSDL request to {} answered {}", location, status);
            return Err(TransportError::Status {
                url: location,
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.body_mut().read_to_string()?;
        let wsdl = WsdlDocument::parse(url, body.as_bytes())?;
        info!("WSDL for {} loaded ({} typed elements)", url, wsdl.types().len());

        Ok(self.inner.cache.insert(url, wsdl))
    }
}

/// Interprète le corps d'une réponse SOAP
///
/// Le statut HTTP seul n'est pas une erreur : un fault SOAP est renvoyé
/// avec un statut 500. Un corps illisible ou vide de sens l'est en
/// revanche quand le statut n'est pas 2xx.
fn interpret_response(
    url: &str,
    method: &str,
    status: u16,
    body: &[u8],
    wsdl: &WsdlDocument,
) -> Result<Exchange> {
    let success = (200..300).contains(&status);
    debug!("{} answered {} for {}", url, status, method);

    let status_error = || -> SoapError {
        warn!("{} answered HTTP {} without a SOAP result", url, status);
        TransportError::Status {
            url: url.to_string(),
            status,
        }
        .into()
    };

    let document = match parse_response(body) {
        Ok(document) => document,
        Err(_) if !success => return Err(status_error()),
        Err(e) => return Err(e),
    };

    let result = match locate_result(&document, method) {
        ResponseContent::Result(element) => Ok(node_to_value(element, wsdl.types())),
        ResponseContent::Fault(fault) => {
            warn!(
                "SOAP fault from {} for {}: {} ({})",
                url, method, fault.fault_string, fault.fault_code
            );
            Err(SoapError::Fault(fault))
        }
        ResponseContent::Empty if !success => return Err(status_error()),
        ResponseContent::Empty => {
            debug!("No result element for {}, returning null", method);
            Ok(SoapValue::Null)
        }
    };

    Ok(Exchange { document, result })
}

/// Journalise l'issue d'un appel dont le handle a été abandonné
fn report_unclaimed(url: &str, method: &str, outcome: &SoapOutcome) {
    match &outcome.result {
        Err(error) => warn!(
            url = %url,
            method = %method,
            error = %error,
            "SOAP call failed after its handle was dropped"
        ),
        Ok(_) => debug!("SOAP call {} on {} completed, handle dropped", method, url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WSDL: &str = r#"<definitions xmlns:s="http://www.w3.org/2001/XMLSchema" targetNamespace="http://tempuri.org/">
  <s:element name="GetUserResult" type="s:int"/>
  <s:element name="return" type="s:int"/>
</definitions>"#;

    fn wsdl() -> WsdlDocument {
        WsdlDocument::parse("http://host/svc", WSDL.as_bytes()).unwrap()
    }

    #[test]
    fn test_interpret_result() {
        let body = r#"<Envelope><Body><GetUserResponse><GetUserResult>7</GetUserResult></GetUserResponse></Body></Envelope>"#;
        let exchange =
            interpret_response("http://host/svc", "GetUser", 200, body.as_bytes(), &wsdl())
                .unwrap();
        assert_eq!(exchange.result.unwrap(), SoapValue::Int(7));
        assert_eq!(exchange.document.name, "Envelope");
    }

    #[test]
    fn test_interpret_return_fallback() {
        let body = r#"<Envelope><Body><GetUserResponse><return>42</return></GetUserResponse></Body></Envelope>"#;
        let exchange =
            interpret_response("http://host/svc", "GetUser", 200, body.as_bytes(), &wsdl())
                .unwrap();
        assert_eq!(exchange.result.unwrap(), SoapValue::Int(42));
    }

    #[test]
    fn test_interpret_fault_keeps_document() {
        let body = r#"<Envelope><Body><Fault><faultcode>Server</faultcode><faultstring>Boom</faultstring></Fault></Body></Envelope>"#;
        let exchange =
            interpret_response("http://host/svc", "GetUser", 500, body.as_bytes(), &wsdl())
                .unwrap();

        match exchange.result {
            Err(SoapError::Fault(fault)) => {
                assert_eq!(fault.fault_string, "Boom");
                assert_eq!(fault.fault_code, "Server");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(crate::envelope::find_descendant(&exchange.document, "Fault").is_some());
    }

    #[test]
    fn test_interpret_non_xml_error_status() {
        let err = interpret_response("http://host/svc", "GetUser", 503, b"Service Unavailable", &wsdl())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SoapError::Transport(TransportError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn test_interpret_non_xml_success_is_xml_error() {
        let err = interpret_response("http://host/svc", "GetUser", 200, b"not xml", &wsdl())
            .err()
            .unwrap();
        assert!(matches!(err, SoapError::Xml(_)));
    }

    #[test]
    fn test_interpret_void_method() {
        let body = r#"<Envelope><Body><PingResponse/></Body></Envelope>"#;
        let exchange =
            interpret_response("http://host/svc", "Ping", 200, body.as_bytes(), &wsdl()).unwrap();
        assert_eq!(exchange.result.unwrap(), SoapValue::Null);
    }

    #[test]
    fn test_credentials_are_shared_by_clones() {
        let client = SoapClient::new().unwrap();
        let clone = client.clone();

        client.set_credentials("user", "pass");
        assert_eq!(clone.credentials(), Some(Credentials::new("user", "pass")));
        assert_eq!(
            clone.authorization().as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );

        clone.clear_credentials();
        assert!(client.credentials().is_none());
    }

    #[test]
    fn test_credentials_from_config() {
        let config = SoapConfig {
            username: Some("user".to_string()),
            password: Some("pass".to_string()),
            ..SoapConfig::default()
        };
        let client = SoapClient::from_config(&config).unwrap();
        assert_eq!(client.credentials(), Some(Credentials::new("user", "pass")));
    }

    #[test]
    fn test_spawn_outside_runtime() {
        let client = SoapClient::new().unwrap();
        let err = client
            .spawn_invoke("http://host/svc", "GetUser", &SoapParameters::new())
            .err()
            .unwrap();
        assert!(matches!(err, SoapError::NoRuntime));
    }

    #[test]
    fn test_spawn_reports_unsupported_type_synchronously() {
        let client = SoapClient::new().unwrap();
        let params = SoapParameters::new().add("Items", SoapValue::List(vec![SoapValue::Null]));

        tokio_test::block_on(async {
            let err = client
                .spawn_invoke("http://host/svc", "GetUser", &params)
                .err()
                .unwrap();
            assert!(matches!(err, SoapError::UnsupportedType(_)));
        });
    }

    #[tokio::test]
    async fn test_dropped_sender_yields_aborted() {
        let (tx, rx) = oneshot::channel::<SoapOutcome>();
        drop(tx);

        let outcome = SoapCall { rx }.await;
        assert!(matches!(
            outcome.result,
            Err(SoapError::Transport(TransportError::Aborted))
        ));
        assert!(outcome.document.is_none());
    }
}
