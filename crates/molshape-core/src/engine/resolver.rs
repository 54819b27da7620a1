use super::config::ResolverConfig;
use super::error::EngineError;
use crate::core::models::identifier::StructureIdentifier;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Lookup service answered with HTTP status {status}")]
    NotFound { status: u16 },
    #[error("Lookup service returned an empty identifier")]
    EmptyResponse,
    #[error("Request could not be completed: {0}")]
    Transport(String),
}

/// Maps a free-text chemical name to a canonical structure identifier.
///
/// Implementations must be shareable across worker threads.
pub trait NameResolver: Send + Sync {
    /// Looks up a single name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] or [`ResolveError::EmptyResponse`]
    /// when the service has no usable answer, and [`ResolveError::Transport`]
    /// when the request itself could not be completed.
    fn resolve(&self, name: &str) -> Result<StructureIdentifier, ResolveError>;
}

/// Resolves names against a PubChem PUG REST endpoint.
///
/// One `GET {base_url}/compound/name/{name}/property/{property}/TXT` is issued
/// per call. There are no retries and no caching.
pub struct PubChemResolver {
    client: Client,
    base_url: String,
    property: String,
}

impl PubChemResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .user_agent(concat!("molshape/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EngineError::HttpClient(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ResolverConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            property: config.property.clone(),
        }
    }

    /// The request URL for `name`; the name is percent-encoded as one path
    /// segment and otherwise left untouched.
    pub fn lookup_url(&self, name: &str) -> String {
        format!(
            "{}/compound/name/{}/property/{}/TXT",
            self.base_url,
            urlencoding::encode(name),
            self.property
        )
    }
}

impl NameResolver for PubChemResolver {
    fn resolve(&self, name: &str) -> Result<StructureIdentifier, ResolveError> {
        let url = self.lookup_url(name);
        debug!(%url, "Requesting structure identifier");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ResolveError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ResolveError::NotFound {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|e| ResolveError::Transport(e.to_string()))?;
        let identifier = body.trim();
        if identifier.is_empty() {
            return Err(ResolveError::EmptyResponse);
        }
        Ok(StructureIdentifier::new(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves exactly one HTTP response and hands back the request line.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                let read = reader.read_line(&mut header).unwrap();
                if read == 0 || header == "\r\n" {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request_line.trim_end().to_string()
        });
        (format!("http://{address}/rest/pug"), handle)
    }

    fn resolver(base_url: &str) -> PubChemResolver {
        let client = Client::builder().no_proxy().build().unwrap();
        PubChemResolver::with_client(
            client,
            &ResolverConfig {
                base_url: base_url.to_string(),
                property: "CanonicalSMILES".to_string(),
            },
        )
    }

    #[test]
    fn lookup_url_encodes_name_as_single_segment() {
        let resolver = resolver("https://pubchem.ncbi.nlm.nih.gov/rest/pug/");
        assert_eq!(
            resolver.lookup_url("acetic acid/ester"),
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/name/acetic%20acid%2Fester/property/CanonicalSMILES/TXT"
        );
    }

    #[test]
    fn ok_response_body_is_trimmed_into_identifier() {
        let (base_url, server) = serve_once("200 OK", "CCO\n");
        let identifier = resolver(&base_url).resolve("ethanol").unwrap();

        assert_eq!(identifier.as_str(), "CCO");
        assert_eq!(
            server.join().unwrap(),
            "GET /rest/pug/compound/name/ethanol/property/CanonicalSMILES/TXT HTTP/1.1"
        );
    }

    #[test]
    fn multi_line_body_is_kept_whole() {
        let (base_url, server) = serve_once("200 OK", "CCO\nCCC\n");
        let identifier = resolver(&base_url).resolve("mixture").unwrap();
        server.join().unwrap();

        assert_eq!(identifier.as_str(), "CCO\nCCC");
    }

    #[test]
    fn non_ok_status_is_not_found() {
        let (base_url, server) = serve_once("404 Not Found", "Status: 404\n");
        let result = resolver(&base_url).resolve("notachemical");
        server.join().unwrap();

        assert_eq!(result, Err(ResolveError::NotFound { status: 404 }));
    }

    #[test]
    fn server_errors_are_not_found_as_well() {
        let (base_url, server) = serve_once("503 Service Unavailable", "");
        let result = resolver(&base_url).resolve("ethanol");
        server.join().unwrap();

        assert_eq!(result, Err(ResolveError::NotFound { status: 503 }));
    }

    #[test]
    fn blank_ok_body_is_empty_response() {
        let (base_url, server) = serve_once("200 OK", "  \n");
        let result = resolver(&base_url).resolve("ethanol");
        server.join().unwrap();

        assert_eq!(result, Err(ResolveError::EmptyResponse));
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let result = resolver(&format!("http://{address}/rest/pug")).resolve("ethanol");
        assert!(matches!(result, Err(ResolveError::Transport(_))));
    }
}
