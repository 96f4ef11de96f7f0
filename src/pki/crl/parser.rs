use tracing::debug;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

use super::errors::{CrlError, CrlResult};
use super::types::RevokedSerials;

const PEM_ARMOR: &[u8] = b"-----BEGIN";
const PEM_CRL_LABEL: &str = "X509 CRL";

/// Extract the revoked serial numbers from a DER or PEM encoded CRL.
///
/// Only the revoked certificate entries of the `TBSCertList` are kept. The
/// signature and the thisUpdate/nextUpdate window are not checked; callers
/// are trusted to submit authentic CRLs.
pub fn decode_crl(blob: &[u8]) -> CrlResult<RevokedSerials> {
    let der = if is_pem(blob) {
        pem_to_der(blob)?
    } else {
        blob.to_vec()
    };

    if der.is_empty() {
        return Err(CrlError::Decode("CRL is empty".to_string()));
    }

    let (rem, crl) = CertificateRevocationList::from_der(&der)
        .map_err(|e| CrlError::Decode(e.to_string()))?;
    if !rem.is_empty() {
        return Err(CrlError::Decode(format!(
            "{} trailing bytes after CRL",
            rem.len()
        )));
    }

    let serials: RevokedSerials = crl
        .iter_revoked_certificates()
        .map(|revoked| revoked.user_certificate.clone())
        .collect();

    debug!(
        issuer = %crl.issuer(),
        revoked = serials.len(),
        "Decoded CRL"
    );
    Ok(serials)
}

fn is_pem(blob: &[u8]) -> bool {
    blob.trim_ascii_start().starts_with(PEM_ARMOR)
}

fn pem_to_der(blob: &[u8]) -> CrlResult<Vec<u8>> {
    let (_, pem) = parse_x509_pem(blob.trim_ascii_start())
        .map_err(|e| CrlError::Decode(format!("invalid PEM: {e}")))?;

    if pem.label != PEM_CRL_LABEL {
        return Err(CrlError::Decode(format!(
            "unexpected PEM block {:?}, expected {PEM_CRL_LABEL:?}",
            pem.label
        )));
    }
    Ok(pem.contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{
        BasicConstraints, CertificateParams, CertificateRevocationList,
        CertificateRevocationListParams, DistinguishedName, DnType, IsCa, Issuer, KeyIdMethod,
        KeyPair, KeyUsagePurpose, RevocationReason, RevokedCertParams, SerialNumber,
    };
    use ::time::{Duration, OffsetDateTime};
    use x509_parser::num_bigint::BigUint;

    fn gen_crl(serials: &[u64]) -> CertificateRevocationList {
        let mut params = CertificateParams::default();
        let key_pair = KeyPair::generate().unwrap();

        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, "Test CRL Issuer");
        params.distinguished_name = dn;
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
        let issuer = Issuer::new(params, key_pair);

        let now = OffsetDateTime::now_utc();
        let revoked_certs = serials
            .iter()
            .map(|serial| RevokedCertParams {
                serial_number: SerialNumber::from_slice(&BigUint::from(*serial).to_bytes_be()),
                revocation_time: now,
                reason_code: Some(RevocationReason::KeyCompromise),
                invalidity_date: None,
            })
            .collect();

        CertificateRevocationListParams {
            this_update: now,
            next_update: now + Duration::days(7),
            crl_number: SerialNumber::from(1u64),
            issuing_distribution_point: None,
            revoked_certs,
            key_identifier_method: KeyIdMethod::Sha256,
        }
        .signed_by(&issuer)
        .unwrap()
    }

    #[test]
    fn test_decode_der() {
        let crl = gen_crl(&[1000, 42, 0xdead_beef]);
        let serials = decode_crl(crl.der()).unwrap();

        assert_eq!(serials.len(), 3);
        assert!(serials.contains(&BigUint::from(1000u32)));
        assert!(serials.contains(&BigUint::from(42u32)));
        assert!(serials.contains(&BigUint::from(0xdead_beefu32)));
    }

    #[test]
    fn test_decode_pem_with_leading_whitespace() {
        let pem = gen_crl(&[1000]).pem().unwrap();
        let blob = format!("\n  {pem}");

        let serials = decode_crl(blob.as_bytes()).unwrap();
        assert_eq!(serials.len(), 1);
        assert!(serials.contains(&BigUint::from(1000u32)));
    }

    #[test]
    fn test_decode_crl_without_revocations() {
        let crl = gen_crl(&[]);
        let serials = decode_crl(crl.der()).unwrap();
        assert!(serials.is_empty());
    }

    #[test]
    fn test_reject_garbage() {
        assert!(matches!(decode_crl(b""), Err(CrlError::Decode(_))));
        assert!(matches!(decode_crl(&[0u8; 10]), Err(CrlError::Decode(_))));
        assert!(matches!(
            decode_crl(b"definitely not a CRL"),
            Err(CrlError::Decode(_))
        ));
    }

    #[test]
    fn test_reject_truncated_der() {
        let crl = gen_crl(&[1, 2]);
        let der = crl.der();
        let truncated = &der[..der.len() - 5];
        assert!(matches!(decode_crl(truncated), Err(CrlError::Decode(_))));
    }

    #[test]
    fn test_reject_trailing_data() {
        let crl = gen_crl(&[1]);
        let mut der = crl.der().to_vec();
        der.extend_from_slice(&[0, 0]);
        assert!(matches!(decode_crl(&der), Err(CrlError::Decode(_))));
    }

    #[test]
    fn test_reject_wrong_pem_label() {
        let pem = gen_crl(&[1])
            .pem()
            .unwrap()
            .replace("X509 CRL", "CERTIFICATE");
        let err = decode_crl(pem.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("CERTIFICATE"));
    }

    #[test]
    fn test_reject_broken_pem() {
        let blob = b"-----BEGIN X509 CRL-----\n!!!!\n-----END X509 CRL-----\n";
        assert!(matches!(decode_crl(blob), Err(CrlError::Decode(_))));
    }
}
