#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use crl_registry::{
    config::Config,
    pki::crl::CrlRegistry,
    server::{Server, ServerConfig},
    storage::MemoryStorage,
    telemetry,
};
use rcgen::{
    BasicConstraints, CertificateParams, CertificateRevocationList,
    CertificateRevocationListParams, DistinguishedName, DnType, IsCa, Issuer, KeyIdMethod,
    KeyPair, KeyUsagePurpose, RevocationReason, RevokedCertParams, SerialNumber,
};
use time::{Duration, OffsetDateTime};

/// Spawns a server on a random port over the given storage, populating the
/// registry first. Returns the base URL.
pub async fn spawn_server(storage: MemoryStorage) -> String {
    telemetry::init_tracing();

    let config = {
        let mut config = Config::load_with_sources(Some(HashMap::new())).unwrap();
        config.server.host = "127.0.0.1".to_string();
        // Use a random OS port
        config.server.port = 0;
        config
    };

    let registry = Arc::new(CrlRegistry::new(storage));
    registry.populate().await.unwrap();

    let server_config = ServerConfig {
        host: &config.server.host,
        port: config.server.port,
    };
    let server = Server::new(registry, server_config).await.unwrap();

    let port = server.port().unwrap();
    tokio::spawn(async move {
        server.run().await.expect("failed to run server");
    });

    format!("http://{}:{}", config.server.host, port)
}

/// Generates a CRL signed by a throwaway CA, revoking the given serials
pub fn gen_crl(serials: &[&[u8]]) -> CertificateRevocationList {
    let mut params = CertificateParams::default();
    let key_pair = KeyPair::generate().unwrap();

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "Test CA Root");
    dn.push(DnType::OrganizationName, "Test Organization");
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    let issuer = Issuer::new(params, key_pair);

    let now = OffsetDateTime::now_utc();
    let revoked_certs = serials
        .iter()
        .map(|serial| RevokedCertParams {
            serial_number: SerialNumber::from_slice(serial),
            revocation_time: now,
            reason_code: Some(RevocationReason::Superseded),
            invalidity_date: None,
        })
        .collect();

    CertificateRevocationListParams {
        this_update: now,
        next_update: now + Duration::days(30),
        crl_number: SerialNumber::from(1u64),
        issuing_distribution_point: None,
        revoked_certs,
        key_identifier_method: KeyIdMethod::Sha256,
    }
    .signed_by(&issuer)
    .unwrap()
}

pub fn gen_crl_pem(serials: &[&[u8]]) -> String {
    gen_crl(serials).pem().unwrap()
}
