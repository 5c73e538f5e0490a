use std::borrow::Cow;

/// Errors surfaced by the data layer facade.
///
/// Model and store failures keep the original error as `source`.
#[tdl_derive::tdl_error]
pub enum TodoliteError {
    #[error("Model error{}: {source}", format_context(.context))]
    Model { source: tdl_model::ModelError, context: Option<Cow<'static, str>> },

    #[error("Store error{}: {source}", format_context(.context))]
    Store { source: tdl_store::StoreError, context: Option<Cow<'static, str>> },

    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: tdl_kernel::config::ConfigError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
