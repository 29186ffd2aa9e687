//! Function bridge: exposes Rust closures to Lua as callable values.
//!
//! A [`HostFunction`] pairs a parameter [`Signature`] with a type-erased thunk.
//! When Lua calls it, the bridge:
//!
//! 1. resolves how many arguments to bind ([`resolve_arity`]),
//! 2. converts each one to its parameter type, substituting zero values
//!    for nil,
//! 3. runs the closure,
//! 4. writes every result back and returns them to Lua.
//!
//! Steps 2 to 4 run with panics contained ([`contain`]).
//!
//! Failures at any step are raised in Lua as runtime errors.
//!
//! # Example
//!
//! ```
//! use moonbridge_core::{Interpreter, bridge::{HostFunction, Variadic}};
//!
//! let mut lua = Interpreter::new();
//! lua.set_globals([
//!     ("add", HostFunction::new(|a: f64, b: f64| a + b)),
//!     ("sum", HostFunction::variadic(|xs: Variadic<f64>| xs.iter().sum::<f64>())),
//! ])
//! .unwrap();
//!
//! assert_eq!(lua.eval("return add(1, 2) + sum(3, 4)").unwrap().as_number(), Some(10.0));
//! ```

mod adapter;
mod arguments;
mod arity;
mod guard;
mod returns;

use std::fmt;
use std::rc::Rc;

use mlua::{MultiValue, Value};
use tracing::trace;

use crate::api::Result;
use crate::stack::{Marshal, Stack};

pub use adapter::{IntoHostFunction, IntoVariadicFunction};
pub use arguments::{Arguments, Variadic};
pub use arity::resolve_arity;
pub use guard::contain;
pub use returns::Returns;

/// Parameter kinds of a host function, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<String>,
    variadic: bool,
}

impl Signature {
    pub fn fixed(params: Vec<String>) -> Self {
        Signature {
            params,
            variadic: false,
        }
    }

    /// The last parameter is the element kind of the trailing arguments.
    pub fn variadic(params: Vec<String>) -> Self {
        Signature {
            params,
            variadic: true,
        }
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Declared parameter count, the variadic slot included.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if self.variadic && i + 1 == self.params.len() {
                write!(f, "...")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

type Thunk = dyn Fn(&mut Stack, usize) -> Result<usize>;

/// A Rust function callable from Lua.
///
/// Cloning is cheap; clones share the underlying closure.
#[derive(Clone)]
pub struct HostFunction {
    name: Option<String>,
    signature: Signature,
    thunk: Rc<Thunk>,
}

impl HostFunction {
    /// Bridge a closure with fixed parameters.
    ///
    /// Surplus arguments from Lua are ignored; missing ones fail the call.
    pub fn new<F, Args, Ret>(f: F) -> Self
    where
        F: IntoHostFunction<Args, Ret>,
    {
        f.into_host_function()
    }

    /// Bridge a closure whose last parameter is a [`Variadic`].
    pub fn variadic<F, Args, Var, Ret>(f: F) -> Self
    where
        F: IntoVariadicFunction<Args, Var, Ret>,
    {
        f.into_variadic_function()
    }

    /// Name reported in argument errors.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn from_thunk<F>(signature: Signature, thunk: F) -> Self
    where
        F: Fn(&mut Stack, usize) -> Result<usize> + 'static,
    {
        HostFunction {
            name: None,
            signature,
            thunk: Rc::new(thunk),
        }
    }

    /// Bind the arguments on `frame`, run the closure and collect its results.
    fn dispatch(&self, frame: &mut Stack) -> Result<MultiValue> {
        let supplied = frame.top();
        let count = resolve_arity(
            self.signature.arity(),
            self.signature.is_variadic(),
            supplied,
        )?;
        trace!(
            function = self.name().unwrap_or("<anonymous>"),
            signature = %self.signature,
            supplied,
            count,
            "calling host function"
        );

        let returned = contain(|| (self.thunk)(frame, count))??;
        Ok(frame.take_top(returned).into_iter().collect())
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Writes a Lua function that calls into the host on a fresh stack frame.
impl Marshal for HostFunction {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        let function = self.clone();
        let options = *stack.options();
        let callable = stack
            .lua()
            .create_function(move |lua, args: MultiValue| {
                let mut frame = Stack::frame(lua.clone(), options, args.into_iter().collect());
                function
                    .dispatch(&mut frame)
                    .map_err(|err| err.into_lua_error(function.name()))
            })?;
        stack.push_value(Value::Function(callable));
        Ok(())
    }
}

#[cfg(test)]
mod bridge_test;
