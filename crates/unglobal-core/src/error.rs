use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("destination collision: '{name}' and an existing export both map to {destination}")]
    DestinationCollision { name: String, destination: String },

    #[error("internal error: {0}")]
    Internal(String),
}
