use serde_json::Value;

// Pending one-time code for a single phone number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpRecord {
    pub otp: String,
    // Absolute expiry as epoch milliseconds.
    pub expires_at_ms: u64,
}

impl OtpRecord {
    // A record is still usable up to and including its expiry instant.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at_ms
    }
}

// Outbound SMS carrying a one-time code.
#[derive(Clone, Debug)]
pub struct OtpMessage {
    pub phone_number: String,
    pub otp: String,
    pub text: String,
}

impl OtpMessage {
    // The validity window is rounded up to whole minutes.
    pub fn new(phone_number: &str, otp: &str, ttl_millis: u64) -> Self {
        let minutes = ttl_millis.div_ceil(60_000).max(1);
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        Self {
            phone_number: phone_number.to_string(),
            otp: otp.to_string(),
            text: format!(
                "Your QuickCart OTP is: {otp}. Valid for {minutes} {unit}. Do not share with anyone."
            ),
        }
    }
}


// What the SMS gateway said about a dispatch attempt.
#[derive(Clone, Debug)]
pub struct GatewayReceipt {
    pub accepted: bool,
    pub request_id: Option<String>,
    // Raw gateway payload, echoed back to callers on rejection.
    pub raw: Value,
}
