use std::fmt::Display;

use crate::api::{Error, Result};
use crate::stack::{Marshal, Stack};

/// What a host function's result pushes onto the frame.
///
/// A single value pushes one slot, `()` pushes none and a tuple pushes one
/// slot per element, so a Rust function can return multiple values to Lua.
/// `Err` aborts the call with [`Error::Host`].
pub trait Returns {
    /// Push the results and return how many slots were pushed.
    fn push_returns(self, stack: &mut Stack) -> Result<usize>;
}

impl<T: Marshal> Returns for T {
    fn push_returns(self, stack: &mut Stack) -> Result<usize> {
        stack.push_any(&self)?;
        Ok(1)
    }
}

impl Returns for () {
    fn push_returns(self, _stack: &mut Stack) -> Result<usize> {
        Ok(0)
    }
}

impl<T: Returns, E: Display> Returns for Result<T, E> {
    fn push_returns(self, stack: &mut Stack) -> Result<usize> {
        match self {
            Ok(value) => value.push_returns(stack),
            Err(err) => Err(Error::Host(err.to_string())),
        }
    }
}

macro_rules! impl_returns_tuple {
    ($($name:ident),+) => {
        impl<$($name: Marshal,)+> Returns for ($($name,)+) {
            #[allow(non_snake_case)]
            fn push_returns(self, stack: &mut Stack) -> Result<usize> {
                let ($($name,)+) = self;
                let mut count = 0;
                $(
                    stack.push_any(&$name)?;
                    count += 1;
                )+
                Ok(count)
            }
        }
    };
}

impl_returns_tuple!(A, B);
impl_returns_tuple!(A, B, C);
impl_returns_tuple!(A, B, C, D);
impl_returns_tuple!(A, B, C, D, E);
impl_returns_tuple!(A, B, C, D, E, F);
