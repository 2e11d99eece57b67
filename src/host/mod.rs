//! Host call providers: named asynchronous functions the view can invoke
//! with a single argument.

pub mod host_fns;
pub mod threaded;

use std::fmt;

use futures::future::LocalBoxFuture;

use crate::bootstrap::failure::{CallFailure, SetupFault};

pub use host_fns::HostFunctions;
pub use threaded::ThreadedHost;

/// The single argument handed to a host function.
pub type HostArg = toml::Value;

/// Deferred result of a host call.
pub type HostCall = LocalBoxFuture<'static, Result<HostValue, CallFailure>>;

/// Opaque value produced by a host function. Only its display form is used.
#[derive(Debug, Clone, PartialEq)]
pub struct HostValue(pub toml::Value);

impl HostValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self(toml::Value::String(value.into()))
    }
}

impl From<toml::Value> for HostValue {
    fn from(value: toml::Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            toml::Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

/// Capability to issue a named host call.
///
/// `Err` means the call could not even be issued; a call that was issued and
/// later failed settles its [`HostCall`] with a [`CallFailure`] instead.
pub trait HostCallProvider {
    fn invoke(&self, function: &str, argument: HostArg) -> Result<HostCall, SetupFault>;
}
