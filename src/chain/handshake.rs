//! Live TLS peer-certificate retrieval
//!
//! Opens a blocking TLS connection that accepts any server certificate so
//! the full presented chain can be captured. Trust is NOT enforced here;
//! verification is a separate, later step.

use crate::utils::{Result, TlsError};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error as RustlsError, SignatureScheme};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// Certificate verifier that accepts any server certificate, so the chain
/// can be retrieved from servers whose configuration is the thing being
/// diagnosed.
#[derive(Debug)]
struct AcceptAnyServerCert;

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, RustlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}

/// Connect to `host:port`, complete the handshake, and return the peer
/// certificate list in presentation order as DER buffers.
pub(crate) fn fetch_peer_certificates(host: &str, port: u16) -> Result<Vec<Vec<u8>>> {
    let config = ClientConfig::builder()
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert))
        .with_no_client_auth();

    let server_name: ServerName<'static> =
        host.to_string()
            .try_into()
            .map_err(|_| TlsError::Configuration {
                message: format!("invalid server name: {}", host),
            })?;

    let mut conn = rustls::ClientConnection::new(Arc::new(config), server_name).map_err(|e| {
        TlsError::Configuration {
            message: e.to_string(),
        }
    })?;

    let addr = format!("{}:{}", host, port);
    let socket_addr = addr
        .to_socket_addrs()
        .map_err(|e| TlsError::Connection {
            host: host.to_string(),
            port,
            message: e.to_string(),
        })?
        .next()
        .ok_or_else(|| TlsError::Connection {
            host: host.to_string(),
            port,
            message: "no addresses resolved".to_string(),
        })?;

    let mut sock =
        TcpStream::connect_timeout(&socket_addr, IO_TIMEOUT).map_err(|e| TlsError::Connection {
            host: host.to_string(),
            port,
            message: e.to_string(),
        })?;
    sock.set_read_timeout(Some(IO_TIMEOUT))?;
    sock.set_write_timeout(Some(IO_TIMEOUT))?;

    while conn.is_handshaking() {
        conn.complete_io(&mut sock).map_err(|e| TlsError::Connection {
            host: host.to_string(),
            port,
            message: e.to_string(),
        })?;
    }

    let peer_certs = conn
        .peer_certificates()
        .ok_or_else(|| TlsError::NoPeerCertificates {
            host: host.to_string(),
            port,
        })?;
    if peer_certs.is_empty() {
        return Err(TlsError::NoPeerCertificates {
            host: host.to_string(),
            port,
        }
        .into());
    }

    Ok(peer_certs.iter().map(|der| der.as_ref().to_vec()).collect())
}
