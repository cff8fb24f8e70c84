//! Google Identity Directory Implementation
//!
//! Directory client backed by Firebase projects on Google Identity Platform:
//!
//! - Credentials are Firebase ID tokens, verified locally (RS256 against the
//!   securetoken JWK set) — no network round trip per credential beyond the
//!   cached key fetch.
//! - Claims live in the account's `customAttributes` (Identity Platform
//!   `accounts:lookup` / `accounts:update`).
//! - Attributes live in the `users/{uid}` Firestore document, written with a
//!   field-masked patch so the merge is atomic at the document level and
//!   unrelated fields survive.

use std::collections::HashMap;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use pv_core::clients::DirectoryClient;
use pv_core::errors::DirectoryError;
use pv_core::domain::Principal;

use crate::InfrastructureError;

use super::google_token::{ServiceAccountKey, TokenSource};

const IDENTITY_API_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";
const SECURETOKEN_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// How long a fetched JWK set is trusted before re-fetching.
const JWKS_TTL_SECS: i64 = 3600;

/// Firestore collection holding per-principal attribute documents.
const USERS_COLLECTION: &str = "users";

/// Firebase directory configuration
#[derive(Debug, Clone)]
pub struct FirebaseDirectoryConfig {
    /// Firebase / GCP project id (also the ID token audience)
    pub project_id: String,
    /// Path to the service-account key JSON
    pub credentials_path: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl FirebaseDirectoryConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| InfrastructureError::Config("FIREBASE_PROJECT_ID not set".to_string()))?;
        let credentials_path = std::env::var("GOOGLE_APPLICATION_CREDENTIALS").map_err(|_| {
            InfrastructureError::Config("GOOGLE_APPLICATION_CREDENTIALS not set".to_string())
        })?;

        Ok(Self {
            project_id,
            credentials_path,
            request_timeout_secs: std::env::var("FIREBASE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

struct CachedJwks {
    keys: HashMap<String, Jwk>,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountRecord {
    local_id: String,
    custom_attributes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

/// Identity directory backed by a Firebase project.
pub struct FirebaseDirectory {
    config: FirebaseDirectoryConfig,
    http: reqwest::Client,
    tokens: TokenSource,
    jwks: RwLock<Option<CachedJwks>>,
}

impl FirebaseDirectory {
    /// Create a new directory client
    pub fn new(config: FirebaseDirectoryConfig) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InfrastructureError::Http(e.to_string()))?;
        let key = ServiceAccountKey::from_file(&config.credentials_path)?;

        info!(project_id = %config.project_id, "Firebase directory client initialized");

        Ok(Self {
            tokens: TokenSource::new(key, http.clone()),
            config,
            http,
            jwks: RwLock::new(None),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(FirebaseDirectoryConfig::from_env()?)
    }

    async fn signing_key(&self, kid: &str) -> Result<Jwk, DirectoryError> {
        if let Some(cached) = self.jwks.read().await.as_ref() {
            if cached.fetched_at + Duration::seconds(JWKS_TTL_SECS) > Utc::now() {
                if let Some(key) = cached.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        // Cache miss, expiry, or key rotation: re-fetch the set.
        let set: JwkSet = self
            .http
            .get(SECURETOKEN_JWKS_URL)
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable {
                message: format!("cannot fetch token signing keys: {e}"),
            })?
            .json()
            .await
            .map_err(|e| DirectoryError::Unavailable {
                message: format!("unexpected signing key response: {e}"),
            })?;

        let keys: HashMap<String, Jwk> =
            set.keys.into_iter().map(|k| (k.kid.clone(), k)).collect();
        let key = keys.get(kid).cloned();
        *self.jwks.write().await = Some(CachedJwks {
            keys,
            fetched_at: Utc::now(),
        });

        key.ok_or_else(|| DirectoryError::InvalidCredential {
            reason: format!("unknown signing key {kid}"),
        })
    }

    fn identity_url(&self, operation: &str) -> String {
        format!(
            "{}/projects/{}/accounts:{}",
            IDENTITY_API_BASE, self.config.project_id, operation
        )
    }

    async fn identity_post(
        &self,
        operation: &str,
        body: Value,
    ) -> Result<reqwest::Response, DirectoryError> {
        let bearer = self
            .tokens
            .bearer()
            .await
            .map_err(|e| DirectoryError::Unavailable {
                message: e.to_string(),
            })?;

        let response = self
            .http
            .post(self.identity_url(operation))
            .bearer_auth(bearer)
            .json(&body)
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable {
                message: format!("directory request failed: {e}"),
            })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn error_from_response(response: reqwest::Response) -> DirectoryError {
        let status = response.status();
        let message = match response.json::<GoogleErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => format!("directory returned HTTP {status}"),
        };
        DirectoryError::Unavailable { message }
    }

    /// Encode a JSON value as a Firestore typed value.
    fn firestore_value(value: &Value) -> Value {
        match value {
            Value::Null => json!({ "nullValue": null }),
            Value::Bool(b) => json!({ "booleanValue": b }),
            Value::Number(n) if n.is_i64() => {
                json!({ "integerValue": n.to_string() })
            }
            Value::Number(n) => json!({ "doubleValue": n }),
            Value::String(s) => json!({ "stringValue": s }),
            // Nested structures do not occur in binding attributes; encode
            // anything else as its JSON text.
            other => json!({ "stringValue": other.to_string() }),
        }
    }

    fn parse_custom_attributes(raw: Option<&str>) -> HashMap<String, Value> {
        raw.and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DirectoryClient for FirebaseDirectory {
    async fn resolve_credential(&self, credential: &str) -> Result<Principal, DirectoryError> {
        let header =
            decode_header(credential).map_err(|e| DirectoryError::InvalidCredential {
                reason: format!("malformed token: {e}"),
            })?;
        let kid = header.kid.ok_or_else(|| DirectoryError::InvalidCredential {
            reason: "token has no key id".to_string(),
        })?;
        let jwk = self.signing_key(&kid).await?;

        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| {
            DirectoryError::Unavailable {
                message: format!("invalid signing key material: {e}"),
            }
        })?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.config.project_id
        )]);

        let token = decode::<IdTokenClaims>(credential, &decoding_key, &validation).map_err(
            |e| {
                warn!(error = %e, "ID token rejected");
                DirectoryError::InvalidCredential {
                    reason: e.to_string(),
                }
            },
        )?;

        if token.claims.sub.is_empty() {
            return Err(DirectoryError::InvalidCredential {
                reason: "token has no subject".to_string(),
            });
        }

        Ok(Principal::new(token.claims.sub))
    }

    async fn get_claims(
        &self,
        principal: &Principal,
    ) -> Result<HashMap<String, Value>, DirectoryError> {
        let response = self
            .identity_post("lookup", json!({ "localId": [principal.as_str()] }))
            .await?;
        let lookup: LookupResponse =
            response.json().await.map_err(|e| DirectoryError::Unavailable {
                message: format!("unexpected lookup response: {e}"),
            })?;

        let account = lookup
            .users
            .into_iter()
            .find(|u| u.local_id == principal.as_str())
            .ok_or_else(|| DirectoryError::Unavailable {
                message: format!("no account record for principal {principal}"),
            })?;

        Ok(Self::parse_custom_attributes(
            account.custom_attributes.as_deref(),
        ))
    }

    async fn merge_attributes(
        &self,
        principal: &Principal,
        attributes: Map<String, Value>,
    ) -> Result<(), DirectoryError> {
        let url = format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            FIRESTORE_API_BASE, self.config.project_id, USERS_COLLECTION, principal
        );
        // The field mask limits the patch to exactly the merged keys, which
        // is what makes this an upsert that leaves unrelated fields alone.
        let mask: Vec<(&str, String)> = attributes
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.clone()))
            .collect();
        let fields: Map<String, Value> = attributes
            .iter()
            .map(|(k, v)| (k.clone(), Self::firestore_value(v)))
            .collect();

        let bearer = self
            .tokens
            .bearer()
            .await
            .map_err(|e| DirectoryError::Unavailable {
                message: e.to_string(),
            })?;

        let response = self
            .http
            .patch(&url)
            .query(&mask)
            .bearer_auth(bearer)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable {
                message: format!("attribute write failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        debug!(principal = %principal, "Merged attributes into directory record");
        Ok(())
    }

    async fn merge_claims(
        &self,
        principal: &Principal,
        claims: HashMap<String, Value>,
    ) -> Result<(), DirectoryError> {
        let serialized =
            serde_json::to_string(&claims).map_err(|e| DirectoryError::Unavailable {
                message: format!("cannot serialize claims: {e}"),
            })?;

        self.identity_post(
            "update",
            json!({
                "localId": principal.as_str(),
                "customAttributes": serialized,
            }),
        )
        .await?;

        debug!(principal = %principal, "Wrote merged claim set");
        Ok(())
    }
}
