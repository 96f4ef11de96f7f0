use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    pki::crl::{CrlError, CrlRegistry, CrlResult, decode_crl, parse_serial},
    server::AppState,
    storage::Storage,
};

/// Body of a CRL write
#[derive(Debug, Default, Deserialize)]
pub struct WriteCrlRequest {
    /// PEM text, or base64 of the DER bytes
    #[serde(default)]
    pub crl: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadCrlQuery {
    /// Serial to look up instead of the named CRL
    pub serial: Option<String>,
}

/// Decodes the submitted CRL and replaces whatever was stored under `name`.
pub async fn write_crl<S: Storage>(
    State(state): State<AppState<S>>,
    name: Result<Path<String>, PathRejection>,
    request: Result<Json<WriteCrlRequest>, JsonRejection>,
) -> CrlResult<StatusCode> {
    let Path(name) = name?;
    let Json(request) = request?;
    if name.is_empty() {
        return Err(CrlError::Validation(
            r#""name" parameter cannot be empty"#.to_string(),
        ));
    }
    if request.crl.trim().is_empty() {
        return Err(CrlError::Validation(
            r#""crl" parameter cannot be empty"#.to_string(),
        ));
    }

    let blob = crl_bytes(&request.crl)?;
    let revoked = decode_crl(&blob)?;
    state.registry.upsert(&name, &revoked).await?;

    info!("CRL {name} written with {} revoked serials", revoked.len());
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the named CRL, or the CRLs revoking `serial` when it is given.
pub async fn read_crl<S: Storage>(
    State(state): State<AppState<S>>,
    name: Result<Path<String>, PathRejection>,
    query: Result<Query<ReadCrlQuery>, QueryRejection>,
) -> CrlResult<Response> {
    let Path(name) = name?;
    let Query(query) = query?;
    read(&state.registry, Some(&name), query.serial.as_deref()).await
}

/// Serial lookup without a CRL name in the path
pub async fn read_crl_by_serial<S: Storage>(
    State(state): State<AppState<S>>,
    query: Result<Query<ReadCrlQuery>, QueryRejection>,
) -> CrlResult<Response> {
    let Query(query) = query?;
    read(&state.registry, None, query.serial.as_deref()).await
}

pub async fn delete_crl<S: Storage>(
    State(state): State<AppState<S>>,
    name: Result<Path<String>, PathRejection>,
) -> CrlResult<StatusCode> {
    let Path(name) = name?;
    state.registry.remove(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read<S: Storage>(
    registry: &CrlRegistry<S>,
    name: Option<&str>,
    serial: Option<&str>,
) -> CrlResult<Response> {
    let name = name.filter(|n| !n.is_empty());
    let serial = serial.filter(|s| !s.is_empty());

    match (serial, name) {
        (Some(serial), _) => {
            let parsed = parse_serial(serial)?;
            let found = registry.find_by_serial(&parsed).await;
            debug!("Serial {serial} found in {} CRLs", found.len());
            Ok(Json(found).into_response())
        }
        (None, Some(name)) => {
            let record = registry.lookup_by_name(name).await?;
            Ok(Json(record).into_response())
        }
        (None, None) => Err(CrlError::Validation(
            r#""name" or "serial" parameter must be set"#.to_string(),
        )),
    }
}

/// PEM is passed through as-is; anything else must be base64 encoded DER.
fn crl_bytes(crl: &str) -> CrlResult<Vec<u8>> {
    if crl.trim_start().starts_with("-----BEGIN") {
        return Ok(crl.as_bytes().to_vec());
    }

    let compact: String = crl.split_whitespace().collect();
    STANDARD
        .decode(compact)
        .map_err(|e| CrlError::Decode(format!("CRL is neither PEM nor base64 DER: {e}")))
}
