//! Mock clients for coordinator tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::clients::{DirectoryClient, VerificationProvider};
use crate::domain::{AttemptStatus, Channel, PhoneNumber, Principal};
use crate::errors::{DirectoryError, ProviderError};

/// Mock identity directory recording every call and its order.
pub struct MockDirectory {
    /// Principal returned on resolve; `None` makes resolution fail.
    pub principal: Option<Principal>,
    pub attributes: Mutex<Map<String, Value>>,
    pub claims: Mutex<HashMap<String, Value>>,
    pub fail_merge_attributes: bool,
    pub fail_get_claims: bool,
    pub fail_merge_claims: bool,
    pub resolve_calls: AtomicUsize,
    pub merge_attribute_calls: AtomicUsize,
    pub merge_claim_calls: AtomicUsize,
    /// Ordered log of directory operations, for asserting write ordering.
    pub op_log: Mutex<Vec<&'static str>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            principal: Some(Principal::new("uid-1")),
            attributes: Mutex::new(Map::new()),
            claims: Mutex::new(HashMap::new()),
            fail_merge_attributes: false,
            fail_get_claims: false,
            fail_merge_claims: false,
            resolve_calls: AtomicUsize::new(0),
            merge_attribute_calls: AtomicUsize::new(0),
            merge_claim_calls: AtomicUsize::new(0),
            op_log: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_credentials() -> Self {
        Self {
            principal: None,
            ..Self::new()
        }
    }

    pub fn with_claims(claims: HashMap<String, Value>) -> Self {
        let mock = Self::new();
        *mock.claims.lock().unwrap() = claims;
        mock
    }

    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.attributes.lock().unwrap().get(key).cloned()
    }

    pub fn claim(&self, key: &str) -> Option<Value> {
        self.claims.lock().unwrap().get(key).cloned()
    }

    fn log(&self, op: &'static str) {
        self.op_log.lock().unwrap().push(op);
    }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn resolve_credential(&self, _credential: &str) -> Result<Principal, DirectoryError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.log("resolve_credential");
        self.principal
            .clone()
            .ok_or(DirectoryError::InvalidCredential {
                reason: "token expired".to_string(),
            })
    }

    async fn get_claims(
        &self,
        _principal: &Principal,
    ) -> Result<HashMap<String, Value>, DirectoryError> {
        self.log("get_claims");
        if self.fail_get_claims {
            return Err(DirectoryError::Unavailable {
                message: "directory error".to_string(),
            });
        }
        Ok(self.claims.lock().unwrap().clone())
    }

    async fn merge_attributes(
        &self,
        _principal: &Principal,
        attributes: Map<String, Value>,
    ) -> Result<(), DirectoryError> {
        self.merge_attribute_calls.fetch_add(1, Ordering::SeqCst);
        self.log("merge_attributes");
        if self.fail_merge_attributes {
            return Err(DirectoryError::Unavailable {
                message: "directory error".to_string(),
            });
        }
        // Merge semantics: overwrite given keys, keep everything else.
        let mut stored = self.attributes.lock().unwrap();
        for (key, value) in attributes {
            stored.insert(key, value);
        }
        Ok(())
    }

    async fn merge_claims(
        &self,
        _principal: &Principal,
        claims: HashMap<String, Value>,
    ) -> Result<(), DirectoryError> {
        self.merge_claim_calls.fetch_add(1, Ordering::SeqCst);
        self.log("merge_claims");
        if self.fail_merge_claims {
            return Err(DirectoryError::Unavailable {
                message: "directory error".to_string(),
            });
        }
        *self.claims.lock().unwrap() = claims;
        Ok(())
    }
}

/// Mock verification provider with programmable statuses.
pub struct MockProvider {
    /// Status returned from start; `None` makes the call fail.
    pub start_status: Option<AttemptStatus>,
    /// Status returned from check; `None` makes the call fail.
    pub check_status: Option<AttemptStatus>,
    pub start_calls: AtomicUsize,
    pub check_calls: AtomicUsize,
    pub last_channel: Mutex<Option<Channel>>,
    pub last_phone: Mutex<Option<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            start_status: Some(AttemptStatus::Pending),
            check_status: Some(AttemptStatus::Approved),
            start_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
            last_channel: Mutex::new(None),
            last_phone: Mutex::new(None),
        }
    }

    pub fn checking_as(status: AttemptStatus) -> Self {
        Self {
            check_status: Some(status),
            ..Self::new()
        }
    }
}

#[async_trait]
impl VerificationProvider for MockProvider {
    async fn start_attempt(
        &self,
        phone: &PhoneNumber,
        channel: Channel,
    ) -> Result<AttemptStatus, ProviderError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_channel.lock().unwrap() = Some(channel);
        *self.last_phone.lock().unwrap() = Some(phone.as_str().to_string());
        self.start_status
            .clone()
            .ok_or_else(|| ProviderError::new("Invalid parameter `To`"))
    }

    async fn check_attempt(
        &self,
        phone: &PhoneNumber,
        _code: &str,
    ) -> Result<AttemptStatus, ProviderError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_phone.lock().unwrap() = Some(phone.as_str().to_string());
        self.check_status
            .clone()
            .ok_or_else(|| ProviderError::new("Service unavailable"))
    }
}
