use std::borrow::Cow;

/// A specialized [`ModelError`] enum of this crate.
#[tdl_derive::tdl_error]
pub enum ModelError {
    /// A descriptor or registration request is malformed.
    #[error("Model validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A raw row exposes no readable document properties.
    #[error("Invalid row{}: {message}", format_context(.context))]
    InvalidRow { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A model constructor rejected its input properties.
    #[error("Model construction failed{}: {message}", format_context(.context))]
    Construct { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A model definition with the same name is already registered.
    #[error("Duplicate model definition{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No model definition is registered under the requested name.
    #[error("Unknown model{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal model error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
