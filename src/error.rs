use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuperlightError {
    #[error("protocol invariant violated: {0}")]
    ProtocolInvariantViolation(String),

    #[error("all provers are dishonest or unreachable")]
    AllProversDishonest,
}

pub type Result<T> = std::result::Result<T, SuperlightError>;
