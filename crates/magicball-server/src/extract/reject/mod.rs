//! Extractors that turn axum rejections into JSON error responses.

pub mod enhanced_form;
pub mod enhanced_json;
pub mod validated_json;

pub use self::enhanced_form::Form;
pub use self::enhanced_json::Json;
pub use self::validated_json::ValidateJson;
