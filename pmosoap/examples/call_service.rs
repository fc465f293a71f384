//! Example: call a SOAP action and print the decoded result
//!
//! Run with:
//!   cargo run -p pmosoap --example call_service -- <url> <method> [name=value ...]
//!
//! Credentials are read from PMOSOAP_CONFIG__USERNAME / PMOSOAP_CONFIG__PASSWORD.

use pmosoap::{SoapClient, SoapError, SoapParameters};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(url), Some(method)) = (args.next(), args.next()) else {
        eprintln!("usage: call_service <url> <method> [name=value ...]");
        std::process::exit(2);
    };

    let mut params = SoapParameters::new();
    for arg in args {
        match arg.split_once('=') {
            Some((name, value)) => {
                params.insert(name, value);
            }
            None => eprintln!("ignoring malformed parameter {:?}", arg),
        }
    }

    let client = SoapClient::from_config_file(None)?;

    match client.invoke_with_document(&url, &method, &params).await {
        Ok(reply) => {
            println!("{:#?}", reply.value);
        }
        Err(SoapError::Fault(fault)) => {
            eprintln!("SOAP fault {}: {}", fault.fault_code, fault.fault_string);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
