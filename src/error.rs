use custom_error::custom_error;

pub type Result<T> = std::result::Result<T, Error>;

custom_error! {pub Error
    Io{source: std::io::Error} = "I/O error: {source}",
    InvalidInput{field: String, reason: String} = "invalid {field}: {reason}",
    ConvergenceFailure{iterations: usize} = "geodesic solution did not converge after {iterations} iterations",
    UnknownCategory{kind: String, label: String} = "unknown {kind} '{label}'",
    NotFound{ident: String} = "identifier '{ident}' not found",
    MissingData{kind: String} = "no {kind} data file was given"
}

impl Error {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Error {
        Error::InvalidInput {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(e: derive_builder::UninitializedFieldError) -> Error {
        Error::invalid(e.field_name(), "is required")
    }
}
