use thiserror::Error;

#[derive(Error, Debug)]
pub enum SgpropError {
    #[error("Invalid orbital elements: {0}")]
    InvalidOrbitalElements(String),

    #[error("Invalid propagation parameter: {0}")]
    InvalidPropagationParameter(String),

    #[error("Invalid TLE epoch: {0}")]
    InvalidTleEpoch(String),

    #[error("Calendar conversion error: {0}")]
    Hifitime(#[from] hifitime::HifitimeError),
}

impl PartialEq for SgpropError {
    fn eq(&self, other: &Self) -> bool {
        use SgpropError::*;
        match (self, other) {
            (InvalidOrbitalElements(a), InvalidOrbitalElements(b)) => a == b,
            (InvalidPropagationParameter(a), InvalidPropagationParameter(b)) => a == b,
            (InvalidTleEpoch(a), InvalidTleEpoch(b)) => a == b,

            // hifitime errors only compare by variant
            (Hifitime(_), Hifitime(_)) => true,

            _ => false,
        }
    }
}
