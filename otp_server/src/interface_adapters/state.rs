use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::OtpRecord;
use crate::domain::ports::{Clock, CodeGenerator, OtpStore, SmsGateway};

pub type OtpTable = Arc<Mutex<HashMap<String, OtpRecord>>>;

// Application state shared by the OTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub otp_records: OtpTable,
    // Any gateway implementation can be plugged in here.
    pub gateway: Arc<dyn SmsGateway>,
    pub ttl_millis: u64,
    // Echo generated codes back to the caller instead of hiding them.
    pub dev_mode: bool,
}

impl AppState {
    pub fn new(gateway: Arc<dyn SmsGateway>, ttl_millis: u64, dev_mode: bool) -> Self {
        Self {
            otp_records: Arc::new(Mutex::new(HashMap::new())),
            gateway,
            ttl_millis,
            dev_mode,
        }
    }

    pub fn store(&self) -> InMemoryOtpStore {
        InMemoryOtpStore {
            records: self.otp_records.clone(),
        }
    }
}

// In-memory OTP store adapter.
#[derive(Clone)]
pub struct InMemoryOtpStore {
    pub records: OtpTable,
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn insert(&self, phone_number: String, record: OtpRecord) -> Result<(), String> {
        let mut records = self.records.lock().await;
        records.insert(phone_number, record);
        Ok(())
    }

    async fn get(&self, phone_number: &str) -> Result<Option<OtpRecord>, String> {
        let records = self.records.lock().await;
        Ok(records.get(phone_number).cloned())
    }

    async fn remove(&self, phone_number: &str) -> Result<bool, String> {
        let mut records = self.records.lock().await;
        Ok(records.remove(phone_number).is_some())
    }
}

// System clock adapter used by OTP use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

// Uniform six-digit codes from the thread-local RNG.
#[derive(Clone)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        rand::thread_rng().gen_range(100_000..=999_999u32).to_string()
    }
}
