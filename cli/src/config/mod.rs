pub mod capture_config;
pub mod facecap_config;
pub mod logging_config;

pub use capture_config::CaptureConfig;
pub use facecap_config::{ConfigOrigin, FacecapConfig};
pub use logging_config::LoggingConfig;
