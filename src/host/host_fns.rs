use std::collections::HashMap;
use std::sync::Arc;

use super::{HostArg, HostValue};

/// A host function body. `Err` carries the rejection reason.
pub type HostFn = Arc<dyn Fn(&HostArg) -> Result<HostValue, String> + Send + Sync>;

/// Registry of host functions addressable by name.
#[derive(Default, Clone)]
pub struct HostFunctions {
    functions: HashMap<String, HostFn>,
}

impl HostFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in functions.
    pub fn register_all() -> Self {
        let mut functions = Self::new();
        functions.register("helloWorld", |arg| {
            Ok(HostValue::text(format!("Hello, World! ({})", HostValue::from(arg.clone()))))
        });
        functions.register("echo", |arg| Ok(HostValue::from(arg.clone())));
        functions.register("fail", |arg| Err(HostValue::from(arg.clone()).to_string()));
        functions
    }

    /// Binds `name`, replacing any earlier function of the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&HostArg) -> Result<HostValue, String> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.functions.insert(name.clone(), Arc::new(function)).is_some() {
            tracing::debug!("host function {name} replaced");
        }
    }

    pub fn get(&self, name: &str) -> Option<HostFn> {
        self.functions.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for HostFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFunctions")
            .field("functions", &self.names())
            .finish()
    }
}
