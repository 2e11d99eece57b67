use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use futures::FutureExt;
use futures::channel::oneshot;

use super::{HostArg, HostCall, HostCallProvider, HostFunctions, HostValue};
use crate::bootstrap::failure::{CallFailure, SetupFault};
use crate::msg::Msg;

/// Runs host functions on worker threads and settles their results back on
/// the view's executor.
///
/// Each settled call posts [`Msg::HostSettled`] so the event loop wakes up and
/// polls the waiting task.
#[derive(Debug)]
pub struct ThreadedHost {
    functions: HostFunctions,
    latency: Duration,
    notify: mpsc::Sender<Msg>,
}

impl ThreadedHost {
    pub fn new(functions: HostFunctions, latency: Duration, notify: mpsc::Sender<Msg>) -> Self {
        Self {
            functions,
            latency,
            notify,
        }
    }
}

/// Owns the settling side of one call. Dropping it, on return or on unwind,
/// releases the sender before waking the event loop, so the loop always finds
/// the call settled or cancelled.
struct Settlement {
    tx: Option<oneshot::Sender<Result<HostValue, String>>>,
    notify: mpsc::Sender<Msg>,
}

impl Settlement {
    fn complete(mut self, outcome: Result<HostValue, String>) {
        if let Some(tx) = self.tx.take() {
            // The receiver may be gone if the view shut down first.
            let _ = tx.send(outcome);
        }
    }
}

impl Drop for Settlement {
    fn drop(&mut self) {
        drop(self.tx.take());
        let _ = self.notify.send(Msg::HostSettled);
    }
}

impl HostCallProvider for ThreadedHost {
    fn invoke(&self, function: &str, argument: HostArg) -> Result<HostCall, SetupFault> {
        let host_fn = self
            .functions
            .get(function)
            .ok_or_else(|| SetupFault::UnknownFunction(function.to_string()))?;

        let (tx, rx) = oneshot::channel();
        let settlement = Settlement {
            tx: Some(tx),
            notify: self.notify.clone(),
        };
        let latency = self.latency;

        thread::Builder::new()
            .name(format!("host-{function}"))
            .spawn(move || {
                if !latency.is_zero() {
                    thread::sleep(latency);
                }
                settlement.complete(host_fn(&argument));
            })
            .map_err(|err| SetupFault::Invoke(format!("spawning worker for {function}: {err}")))?;

        tracing::debug!("host call {function} issued");

        let function = function.to_string();
        Ok(async move {
            match rx.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(reason)) => Err(CallFailure { function, reason }),
                Err(oneshot::Canceled) => Err(CallFailure {
                    function,
                    reason: "host worker exited before settling".to_string(),
                }),
            }
        }
        .boxed_local())
    }
}
