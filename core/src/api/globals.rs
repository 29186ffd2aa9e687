//! Builder for heterogeneous sets of globals.

use crate::stack::Marshal;

/// Named values of mixed types, bound together by
/// [`Interpreter::set_globals`](super::Interpreter::set_globals).
///
/// # Example
///
/// ```
/// use moonbridge_core::{Interpreter, api::Globals, bridge::HostFunction};
///
/// let mut globals = Globals::new();
/// globals
///     .register("pi", std::f64::consts::PI)
///     .register("name", "moon")
///     .register("double", HostFunction::new(|x: f64| x * 2.0));
///
/// let mut lua = Interpreter::new();
/// lua.set_globals(globals).unwrap();
/// assert_eq!(lua.eval("return double(pi) > 6").unwrap().as_bool(), Some(true));
/// ```
#[derive(Default)]
pub struct Globals {
    entries: Vec<(String, Box<dyn Marshal>)>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a global value. A later registration of the same name wins.
    pub fn register(&mut self, name: impl Into<String>, value: impl Marshal + 'static) -> &mut Self {
        self.entries.push((name.into(), Box::new(value)));
        self
    }

    /// Chaining form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, value: impl Marshal + 'static) -> Self {
        self.register(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for Globals {
    type Item = (String, Box<dyn Marshal>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
