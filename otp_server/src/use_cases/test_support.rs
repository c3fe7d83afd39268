use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::domain::entities::{GatewayReceipt, OtpMessage, OtpRecord};
use crate::domain::errors::GatewayError;
use crate::domain::ports::{Clock, CodeGenerator, OtpStore, SmsGateway};

pub(crate) type OtpTable = Arc<Mutex<HashMap<String, OtpRecord>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_millis(&self) -> u64 {
        self.0
    }
}

// Always hands out the same code.
pub(crate) struct FixedCode(pub(crate) &'static str);

impl CodeGenerator for FixedCode {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    records: OtpTable,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_record(&self, phone_number: impl Into<String>, record: OtpRecord) {
        let mut guard = self.records.lock().expect("records mutex poisoned");
        guard.insert(phone_number.into(), record);
    }

    pub(crate) fn get_test_record(&self, phone_number: &str) -> Option<OtpRecord> {
        let guard = self.records.lock().expect("records mutex poisoned");
        guard.get(phone_number).cloned()
    }
}

#[async_trait]
impl OtpStore for RecordingStore {
    async fn insert(&self, phone_number: String, record: OtpRecord) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.records.lock().expect("records mutex poisoned");
        guard.insert(phone_number, record);
        Ok(())
    }

    async fn get(&self, phone_number: &str) -> Result<Option<OtpRecord>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.records.lock().expect("records mutex poisoned");
        Ok(guard.get(phone_number).cloned())
    }

    async fn remove(&self, phone_number: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.records.lock().expect("records mutex poisoned");
        Ok(guard.remove(phone_number).is_some())
    }
}

// How the scripted gateway answers every dispatch.
#[derive(Clone, Copy)]
pub(crate) enum GatewayScript {
    Accept,
    Reject,
    Unreachable,
}

// Gateway fake that records every message it was asked to send.
#[derive(Clone)]
pub(crate) struct ScriptedGateway {
    script: GatewayScript,
    sent: Arc<Mutex<Vec<OtpMessage>>>,
}

impl ScriptedGateway {
    pub(crate) fn new(script: GatewayScript) -> Self {
        Self {
            script,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn sent(&self) -> Vec<OtpMessage> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }
}

#[async_trait]
impl SmsGateway for ScriptedGateway {
    async fn send_otp(&self, message: &OtpMessage) -> Result<GatewayReceipt, GatewayError> {
        self.sent
            .lock()
            .expect("sent mutex poisoned")
            .push(message.clone());

        match self.script {
            GatewayScript::Accept => Ok(GatewayReceipt {
                accepted: true,
                request_id: Some("req-1".to_string()),
                raw: json!({ "return": true, "request_id": "req-1" }),
            }),
            GatewayScript::Reject => Ok(GatewayReceipt {
                accepted: false,
                request_id: None,
                raw: json!({ "return": false, "message": ["Invalid Numbers"] }),
            }),
            GatewayScript::Unreachable => {
                Err(GatewayError::Transport("connection refused".to_string()))
            }
        }
    }
}
