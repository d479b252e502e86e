use thiserror::Error;

/// Errors raised while building a payment initiation message.
///
/// `Validation` is raised at construction time and never leaves a partially
/// built value behind. `SchemaVersion` and `BusinessRule` are raised during
/// rendering only, because they depend on message-level context that is not
/// known earlier. None of them is worth retrying with unchanged input.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Schema version error: {0}")]
    SchemaVersion(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
