use crate::ast::Value;
use crate::error::BackendError;
use ahash::AHashMap;
use std::collections::HashMap;

pub mod reference;

pub use reference::ReferenceRenderer;

/// The runtime state a template reads through its accessor function.
pub trait VariableSource {
    /// Looks up a qualified path. `None` means the variable is undefined.
    fn get(&self, path: &str) -> Option<&Value>;
}

impl VariableSource for AHashMap<String, Value> {
    fn get(&self, path: &str) -> Option<&Value> {
        (**self).get(path).filter(|v| !v.is_undefined())
    }
}

impl VariableSource for HashMap<String, Value> {
    fn get(&self, path: &str) -> Option<&Value> {
        HashMap::get(self, path).filter(|v| !v.is_undefined())
    }
}

/// A text-templating engine able to execute generated template source.
///
/// The context supplies the values behind the accessor call; a backend must not
/// retain it past the call.
pub trait TemplateBackend {
    fn name(&self) -> &str;

    fn render(&self, template: &str, context: &dyn VariableSource) -> Result<String, BackendError>;
}
