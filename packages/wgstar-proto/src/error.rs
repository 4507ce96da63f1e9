use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FromUt8 error: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),

    #[error("Malformed document: content found before the first section header")]
    MalformedDocument,

    #[error("Malformed value for `{setting}`: {value:?}")]
    MalformedValue { setting: String, value: String },

    #[error("Section [{section}] is missing required field `{field}`")]
    MissingField {
        section: &'static str,
        field: &'static str,
    },

    #[error("Invalid configuration: no [Interface] section")]
    MissingInterface,

    #[error("Malformed preshared key entry: {line:?}")]
    MalformedEntry { line: String },

    #[error("Command `{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}
