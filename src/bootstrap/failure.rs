use thiserror::Error;

/// Fault raised before or while issuing the host call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupFault {
    #[error("display surface `{0}` not found")]
    SurfaceMissing(String),
    #[error("host function `{0}` is not defined")]
    UnknownFunction(String),
    #[error("host call could not be issued: {0}")]
    Invoke(String),
}

/// The host call was issued but settled to failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CallFailure {
    pub function: String,
    pub reason: String,
}

/// Any failure of one ready-handler run, whichever side it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapFailure {
    #[error(transparent)]
    Setup(#[from] SetupFault),
    #[error(transparent)]
    Call(#[from] CallFailure),
}

impl BootstrapFailure {
    /// Host function involved, when the failure came from an issued call.
    pub fn function(&self) -> Option<&str> {
        match self {
            BootstrapFailure::Call(failure) => Some(&failure.function),
            BootstrapFailure::Setup(SetupFault::UnknownFunction(function)) => Some(function),
            BootstrapFailure::Setup(_) => None,
        }
    }
}
