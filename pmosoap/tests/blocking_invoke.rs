mod common;

use common::*;
use mockito::{Matcher, Server};
use pmosoap::envelope::build_soap_request;
use pmosoap::{SoapClient, SoapConfig, SoapError, SoapParameters, SoapValue, TransportError};

#[test]
fn blocking_invoke_round_trip() -> anyhow::Result<()> {
    let mut server = Server::new();
    let wsdl = server
        .mock("GET", "/echo")
        .match_query(Matcher::Regex("^wsdl$".to_string()))
        .with_body(ECHO_WSDL)
        .expect(1)
        .create();
    let call = server
        .mock("POST", "/echo")
        .match_header("content-type", "text/xml; charset=utf-8")
        .match_header("soapaction", "urn:echo/Echo")
        .match_header("authorization", "Basic YWxpY2U6czNjcmV0")
        .match_body(Matcher::Exact(build_soap_request(
            "urn:echo",
            "Echo",
            "<Text>hello</Text><Repeat>2</Repeat>",
        )))
        .with_body(ECHO_RESPONSE)
        .expect(2)
        .create();

    let config = SoapConfig {
        username: Some("alice".to_string()),
        password: Some("s3cret".to_string()),
        ..SoapConfig::default()
    };
    let client = SoapClient::from_config(&config)?;
    let url = format!("{}/echo", server.url());
    let params = SoapParameters::new().add("Text", "hello").add("Repeat", 2);

    assert_eq!(
        client.invoke_blocking(&url, "Echo", &params)?,
        SoapValue::from("hello")
    );
    let reply = client.invoke_blocking_with_document(&url, "Echo", &params)?;
    assert_eq!(reply.value, SoapValue::from("hello"));
    assert_eq!(reply.document.name, "Envelope");

    wsdl.assert();
    call.assert();
    Ok(())
}

#[test]
fn blocking_fault_is_raised() -> anyhow::Result<()> {
    let mut server = Server::new();
    server
        .mock("GET", "/Users.asmx")
        .match_query(Matcher::Regex("^wsdl$".to_string()))
        .with_body(USER_WSDL)
        .create();
    server
        .mock("POST", "/Users.asmx")
        .with_status(500)
        .with_body(FAULT_RESPONSE)
        .create();

    let client = SoapClient::new()?;
    let url = format!("{}/Users.asmx", server.url());

    let err = client
        .invoke_blocking(&url, "GetUser", &SoapParameters::new())
        .unwrap_err();
    assert!(matches!(err, SoapError::Fault(ref f) if f.fault_string == "Boom"));
    Ok(())
}

#[test]
fn blocking_http_error_without_soap_body() -> anyhow::Result<()> {
    let mut server = Server::new();
    server
        .mock("GET", "/Users.asmx")
        .match_query(Matcher::Regex("^wsdl$".to_string()))
        .with_body(USER_WSDL)
        .create();
    server
        .mock("POST", "/Users.asmx")
        .with_status(502)
        .with_body("Bad Gateway")
        .create();

    let client = SoapClient::new()?;
    let url = format!("{}/Users.asmx", server.url());

    let err = client
        .invoke_blocking(&url, "GetUser", &SoapParameters::new())
        .unwrap_err();
    assert!(matches!(
        err,
        SoapError::Transport(TransportError::Status { status: 502, .. })
    ));
    Ok(())
}

#[test]
fn unsupported_value_fails_before_any_request() -> anyhow::Result<()> {
    let mut server = Server::new();
    let wsdl = server.mock("GET", Matcher::Any).expect(0).create();

    let client = SoapClient::new()?;
    let url = format!("{}/Users.asmx", server.url());
    let params = SoapParameters::new().add("Ids", SoapValue::List(vec![SoapValue::Null]));

    let err = client.invoke_blocking(&url, "GetUser", &params).unwrap_err();
    assert!(matches!(err, SoapError::UnsupportedType(_)));
    wsdl.assert();
    Ok(())
}

#[test]
fn blocking_and_async_share_the_cache() -> anyhow::Result<()> {
    let mut server = Server::new();
    let wsdl = server
        .mock("GET", "/Users.asmx")
        .match_query(Matcher::Regex("^wsdl$".to_string()))
        .with_body(USER_WSDL)
        .expect(1)
        .create();
    server
        .mock("POST", "/Users.asmx")
        .with_body(RETURN_RESPONSE)
        .expect(2)
        .create();

    let client = SoapClient::new()?;
    let url = format!("{}/Users.asmx", server.url());
    let params = SoapParameters::new();

    assert_eq!(client.invoke_blocking(&url, "GetUser", &params)?, SoapValue::Int(42));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let value = runtime.block_on(client.invoke(&url, "GetUser", &params))?;
    assert_eq!(value, SoapValue::Int(42));

    wsdl.assert();
    Ok(())
}
