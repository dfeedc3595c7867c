//! Pre-registered stand-ins for dictionary side modules.
//!
//! In the dictionary layout, a file named `my.dic` may come with a sibling
//! code module registered as `my_dic` (the file name with `.` replaced by
//! `_`). External-resolver formats (`exts`, `extw`) require the module to
//! provide a `corrector`; regex formats accept `@name` targets that call a
//! named function of the module.
//!
//! There is no runtime code loading here: callers register their resolvers
//! up front in a [`Resolvers`] registry and hand it to the `Corrector`
//! constructor. Resolution stays lazy: a module is only looked up when a
//! dictionary actually references it, at load time.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use regex::Captures;

use crate::error::{Error, Result};

/// Node-level replacement callback: the node's text in, the replacement out,
/// or `None` to leave the node untouched.
///
/// A resolver sees exactly the node's text and nothing else; that is the
/// whole contract. Resolvers that keep state (caches, counters, database
/// handles) own it themselves and must stay usable behind a shared reference.
pub trait NodeResolver: Send + Sync {
    fn resolve(&self, text: &str) -> Option<String>;
}

impl<F> NodeResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn resolve(&self, text: &str) -> Option<String> {
        self(text)
    }
}

impl std::fmt::Debug for dyn NodeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<resolver>")
    }
}

/// Per-match replacement callback for `@name` targets of regex dictionaries.
pub type MatchFn = dyn Fn(&Captures<'_>) -> String + Send + Sync;

/// Registry of side-module resolvers, keyed by module name.
#[derive(Default)]
pub struct Resolvers {
    correctors: HashMap<String, Arc<dyn NodeResolver>>,
    functions: HashMap<String, HashMap<String, Arc<MatchFn>>>,
}

impl Resolvers {
    /// Register the `corrector` of the side module `module`.
    pub fn register_corrector(&mut self, module: impl Into<String>, resolver: impl NodeResolver + 'static) {
        self.correctors.insert(module.into(), Arc::new(resolver));
    }

    /// Register a named function of the side module `module`, callable from
    /// regex dictionaries as `@name`.
    pub fn register_fn<F>(&mut self, module: impl Into<String>, name: impl Into<String>, f: F)
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        self.functions.entry(module.into()).or_default().insert(name.into(), Arc::new(f));
    }

    fn has_module(&self, module: &str) -> bool {
        self.correctors.contains_key(module) || self.functions.contains_key(module)
    }
}

impl std::fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolvers")
            .field("correctors", &self.correctors.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Lazy handle on the side module of one dictionary file.
#[derive(Debug)]
pub(crate) struct SideModule<'a> {
    module: String,
    resolvers: &'a Resolvers,
}

impl<'a> SideModule<'a> {
    pub(crate) fn new(path: &Path, resolvers: &'a Resolvers) -> Self {
        let module = path.file_name().map(|name| name.to_string_lossy().replace('.', "_")).unwrap_or_default();
        Self { module, resolvers }
    }

    pub(crate) fn corrector(&self) -> Result<Arc<dyn NodeResolver>> {
        match self.resolvers.correctors.get(&self.module) {
            Some(resolver) => Ok(Arc::clone(resolver)),
            None => Err(self.missing("corrector")),
        }
    }

    pub(crate) fn function(&self, name: &str) -> Result<Arc<MatchFn>> {
        match self.resolvers.functions.get(&self.module).and_then(|m| m.get(name)) {
            Some(f) => Ok(Arc::clone(f)),
            None => Err(self.missing(name)),
        }
    }

    fn missing(&self, name: &str) -> Error {
        if self.resolvers.has_module(&self.module) {
            Error::ResolverFnMissing { module: self.module.clone(), name: name.to_string() }
        } else {
            Error::ResolverModuleMissing { module: self.module.clone() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_follows_the_dictionary_file() {
        let resolvers = Resolvers::default();
        let side = SideModule::new(Path::new("ru/stress.dic"), &resolvers);
        assert_eq!(side.module, "stress_dic");
    }

    #[test]
    fn corrector_resolves_when_registered() {
        let mut resolvers = Resolvers::default();
        resolvers.register_corrector("stress_extw", |text: &str| Some(text.to_uppercase()));
        let side = SideModule::new(Path::new("stress.extw"), &resolvers);
        let corrector = side.corrector().unwrap();
        assert_eq!(corrector.resolve("да"), Some("ДА".to_string()));
    }

    #[test]
    fn missing_module_and_missing_entry_are_distinct() {
        let mut resolvers = Resolvers::default();
        resolvers.register_fn("num_rex", "frac", |caps: &Captures<'_>| caps[0].to_string());

        let absent = SideModule::new(Path::new("other.rex"), &resolvers);
        assert!(matches!(absent.function("frac"), Err(Error::ResolverModuleMissing { .. })));

        let present = SideModule::new(Path::new("num.rex"), &resolvers);
        assert!(present.function("frac").is_ok());
        assert!(matches!(present.function("int"), Err(Error::ResolverFnMissing { .. })));
        assert!(matches!(present.corrector(), Err(Error::ResolverFnMissing { .. })));
    }
}
