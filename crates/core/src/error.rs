use thiserror::Error;

/// Error taxonomy surfaced to the request layer embedding the use cases.
#[derive(Error, Debug)]
pub enum PetsyncError {
    #[error("Internal server error")]
    InternalError,
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
}
