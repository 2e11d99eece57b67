use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::failure::BootstrapFailure;
use super::sink::{DisplaySurface, ErrorSink};
use crate::host::HostCallProvider;
use crate::lifecycle::{LifecycleEvent, LifecycleHandler};
use crate::model::config::BootstrapConfig;

/// Startup routine bound to the view's ready event.
///
/// One run appends the greeting, issues one host call, and appends its
/// result once it settles. Every failure along the way ends in exactly one
/// [`ErrorSink::report`]; nothing escapes to the lifecycle dispatcher.
#[derive(Clone)]
pub struct ReadyHandler {
    config: BootstrapConfig,
    provider: Rc<dyn HostCallProvider>,
    surface: Rc<dyn DisplaySurface>,
    errors: Rc<dyn ErrorSink>,
}

impl ReadyHandler {
    pub fn new(
        config: BootstrapConfig,
        provider: Rc<dyn HostCallProvider>,
        surface: Rc<dyn DisplaySurface>,
        errors: Rc<dyn ErrorSink>,
    ) -> Self {
        Self {
            config,
            provider,
            surface,
            errors,
        }
    }

    pub async fn run(self, event: LifecycleEvent) {
        tracing::debug!("ready handler invoked for {event:?}");

        match self.bootstrap().await {
            Ok(()) => tracing::info!("bootstrap complete"),
            Err(failure) => self.errors.report(&failure),
        }
    }

    async fn bootstrap(&self) -> Result<(), BootstrapFailure> {
        let mut display = self.surface.locate(&self.config.display_target)?;
        display.append(&self.config.greeting);

        let call = self
            .provider
            .invoke(&self.config.host_function, self.config.argument.clone())?;
        let value = call.await?;

        display.append(&value.to_string());
        Ok(())
    }
}

impl LifecycleHandler for ReadyHandler {
    fn name(&self) -> &str {
        "ready-bootstrap"
    }

    fn handle(&self, event: LifecycleEvent) -> LocalBoxFuture<'static, ()> {
        self.clone().run(event).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::channel::oneshot;
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;

    use super::*;
    use crate::bootstrap::failure::{CallFailure, SetupFault};
    use crate::bootstrap::sink::DisplaySink;
    use crate::host::{HostArg, HostCall, HostValue};

    enum Outcome {
        Resolve(&'static str),
        Reject(&'static str),
        Throw(&'static str),
    }

    struct FakeProvider {
        outcome: Outcome,
        calls: Rc<RefCell<Vec<(String, HostArg)>>>,
    }

    impl HostCallProvider for FakeProvider {
        fn invoke(&self, function: &str, argument: HostArg) -> Result<HostCall, SetupFault> {
            self.calls.borrow_mut().push((function.to_string(), argument));
            let function = function.to_string();
            match self.outcome {
                Outcome::Resolve(value) => Ok(async move { Ok(HostValue::text(value)) }.boxed_local()),
                Outcome::Reject(reason) => Ok(async move {
                    Err(CallFailure {
                        function,
                        reason: reason.to_string(),
                    })
                }
                .boxed_local()),
                Outcome::Throw(reason) => Err(SetupFault::Invoke(reason.to_string())),
            }
        }
    }

    /// Hands out a call that settles only when the test says so.
    struct DeferredProvider {
        pending: RefCell<Option<oneshot::Receiver<Result<HostValue, CallFailure>>>>,
    }

    impl HostCallProvider for DeferredProvider {
        fn invoke(&self, _function: &str, _argument: HostArg) -> Result<HostCall, SetupFault> {
            let rx = self
                .pending
                .borrow_mut()
                .take()
                .ok_or_else(|| SetupFault::Invoke("called twice".into()))?;
            Ok(async move {
                rx.await.unwrap_or_else(|_| {
                    Err(CallFailure {
                        function: "deferred".into(),
                        reason: "dropped".into(),
                    })
                })
            }
            .boxed_local())
        }
    }

    struct RecordingSurface {
        log: Rc<RefCell<Vec<String>>>,
        available: bool,
    }

    struct RecordingSink(Rc<RefCell<Vec<String>>>);

    impl DisplaySink for RecordingSink {
        fn append(&mut self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    impl DisplaySurface for RecordingSurface {
        fn locate(&self, target: &str) -> Result<Box<dyn DisplaySink>, SetupFault> {
            if self.available {
                Ok(Box::new(RecordingSink(Rc::clone(&self.log))))
            } else {
                Err(SetupFault::SurfaceMissing(target.to_string()))
            }
        }
    }

    #[derive(Default)]
    struct RecordingErrors(RefCell<Vec<BootstrapFailure>>);

    impl ErrorSink for RecordingErrors {
        fn report(&self, failure: &BootstrapFailure) {
            self.0.borrow_mut().push(failure.clone());
        }
    }

    struct Harness {
        display: Rc<RefCell<Vec<String>>>,
        errors: Rc<RecordingErrors>,
        calls: Rc<RefCell<Vec<(String, HostArg)>>>,
    }

    fn config() -> BootstrapConfig {
        BootstrapConfig {
            display_target: "messages".into(),
            greeting: "Test!...?".into(),
            host_function: "helloWorld".into(),
            argument: toml::Value::Integer(195),
        }
    }

    fn build(provider: Rc<dyn HostCallProvider>, surface_available: bool) -> (ReadyHandler, Harness) {
        let display = Rc::new(RefCell::new(Vec::new()));
        let errors = Rc::new(RecordingErrors::default());
        let surface = RecordingSurface {
            log: Rc::clone(&display),
            available: surface_available,
        };
        let handler = ReadyHandler::new(config(), provider, Rc::new(surface), errors.clone());
        let harness = Harness {
            display,
            errors,
            calls: Rc::new(RefCell::new(Vec::new())),
        };
        (handler, harness)
    }

    fn with_fake(outcome: Outcome, surface_available: bool) -> (ReadyHandler, Harness) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let provider = FakeProvider {
            outcome,
            calls: Rc::clone(&calls),
        };
        let (handler, mut harness) = build(Rc::new(provider), surface_available);
        harness.calls = calls;
        (handler, harness)
    }

    #[test]
    fn success_appends_greeting_then_result() {
        let (handler, harness) = with_fake(Outcome::Resolve("ok:195"), true);

        block_on(handler.run(LifecycleEvent::Ready));

        assert_eq!(*harness.display.borrow(), ["Test!...?", "ok:195"]);
        assert!(harness.errors.0.borrow().is_empty());
        assert_eq!(
            *harness.calls.borrow(),
            [("helloWorld".to_string(), toml::Value::Integer(195))]
        );
    }

    #[test]
    fn rejection_reports_once_and_keeps_only_greeting() {
        let (handler, harness) = with_fake(Outcome::Reject("timeout"), true);

        block_on(handler.run(LifecycleEvent::Ready));

        assert_eq!(*harness.display.borrow(), ["Test!...?"]);
        let reports = harness.errors.0.borrow();
        assert_eq!(reports.len(), 1);
        assert!(matches!(reports[0], BootstrapFailure::Call(_)));
        assert_eq!(reports[0].to_string(), "timeout");
    }

    #[test]
    fn missing_surface_skips_the_host_call() {
        let (handler, harness) = with_fake(Outcome::Resolve("ok:195"), false);

        block_on(handler.run(LifecycleEvent::Ready));

        assert!(harness.display.borrow().is_empty());
        assert!(harness.calls.borrow().is_empty());
        assert_eq!(
            *harness.errors.0.borrow(),
            [BootstrapFailure::Setup(SetupFault::SurfaceMissing(
                "messages".into()
            ))]
        );
    }

    #[test]
    fn provider_throwing_while_issuing_is_reported_once() {
        let (handler, harness) = with_fake(Outcome::Throw("helloWorld is not defined"), true);

        block_on(handler.run(LifecycleEvent::Ready));

        assert_eq!(*harness.display.borrow(), ["Test!...?"]);
        let reports = harness.errors.0.borrow();
        assert_eq!(reports.len(), 1);
        assert!(matches!(reports[0], BootstrapFailure::Setup(SetupFault::Invoke(_))));
    }

    #[test]
    fn success_and_error_never_happen_together() {
        for outcome in [
            Outcome::Resolve("ok"),
            Outcome::Reject("nope"),
            Outcome::Throw("boom"),
        ] {
            let (handler, harness) = with_fake(outcome, true);
            block_on(handler.run(LifecycleEvent::Ready));

            let appended_result = harness.display.borrow().len() == 2;
            let reported = harness.errors.0.borrow().len();
            assert!(reported <= 1);
            assert!(appended_result != (reported == 1));
        }
    }

    #[test]
    fn suspended_call_leaves_executor_free() {
        let (tx, rx) = oneshot::channel();
        let provider = DeferredProvider {
            pending: RefCell::new(Some(rx)),
        };
        let (handler, harness) = build(Rc::new(provider), true);
        let other = Rc::new(RefCell::new(false));

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        spawner.spawn_local(handler.handle(LifecycleEvent::Ready)).unwrap();
        let flag = Rc::clone(&other);
        spawner
            .spawn_local(async move { *flag.borrow_mut() = true })
            .unwrap();

        pool.run_until_stalled();
        assert_eq!(*harness.display.borrow(), ["Test!...?"]);
        assert!(*other.borrow());

        tx.send(Ok(HostValue::text("late"))).unwrap();
        pool.run_until_stalled();
        assert_eq!(*harness.display.borrow(), ["Test!...?", "late"]);
        assert!(harness.errors.0.borrow().is_empty());
    }
}
