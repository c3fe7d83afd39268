use std::{env, time::Duration};

use crate::interface_adapters::clients::fast2sms::DEFAULT_FAST2SMS_URL;

// Runtime settings for the OTP server, read from the environment.
#[derive(Clone, Debug)]
pub struct OtpServerConfig {
    pub port: u16,
    pub fast2sms_url: String,
    pub fast2sms_api_key: Option<String>,
    pub otp_ttl: Duration,
    pub sms_timeout: Duration,
    pub dev_mode: bool,
}

impl OtpServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: http_port(),
            fast2sms_url: fast2sms_url(),
            fast2sms_api_key: fast2sms_api_key(),
            otp_ttl: otp_ttl(),
            sms_timeout: sms_timeout(),
            dev_mode: dev_mode(),
        }
    }

    // Same settings with the console gateway and code echo switched on.
    pub fn development(port: u16) -> Self {
        Self {
            port,
            fast2sms_url: DEFAULT_FAST2SMS_URL.to_string(),
            fast2sms_api_key: None,
            otp_ttl: DEFAULT_OTP_TTL,
            sms_timeout: DEFAULT_SMS_TIMEOUT,
            dev_mode: true,
        }
    }
}

pub const DEFAULT_OTP_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_SMS_TIMEOUT: Duration = Duration::from_millis(5000);

pub fn http_port() -> u16 {
    env::var("OTP_SERVER_PORT")
        .or_else(|_| env::var("PORT"))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5002)
}

pub fn fast2sms_url() -> String {
    env::var("FAST2SMS_URL").unwrap_or_else(|_| DEFAULT_FAST2SMS_URL.to_string())
}

// The React app and the server historically shared one .env file.
pub fn fast2sms_api_key() -> Option<String> {
    env::var("FAST2SMS_API_KEY")
        .or_else(|_| env::var("REACT_APP_FAST2SMS_API_KEY"))
        .ok()
        .filter(|key| !key.trim().is_empty())
}

pub fn otp_ttl() -> Duration {
    env::var("OTP_TTL_SECONDS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_OTP_TTL)
}

pub fn sms_timeout() -> Duration {
    env::var("SMS_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_SMS_TIMEOUT)
}

pub fn dev_mode() -> bool {
    env::var("OTP_DEV_MODE")
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
