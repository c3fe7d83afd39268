// Outbound adapters for the SMS provider.
pub mod console;
pub mod fast2sms;

pub use console::ConsoleSmsGateway;
pub use fast2sms::Fast2SmsClient;
