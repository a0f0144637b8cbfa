//! Reply parsing for provider responses

pub mod redact;
pub mod responses;


pub use redact::sanitize_provider_error_text;
pub use responses::ResponseParser;
