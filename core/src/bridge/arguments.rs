use std::ops::{Deref, DerefMut};

use crate::api::{Error, Result};
use crate::stack::Stack;
use crate::values::{FromDynamic, coerce};

/// Trailing arguments of a variadic host function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variadic<T>(pub Vec<T>);

impl<T> Variadic<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for Variadic<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Variadic<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> IntoIterator for Variadic<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Cursor binding the arguments of one call, in order.
pub struct Arguments<'s> {
    stack: &'s Stack,
    position: usize,
    count: usize,
}

impl<'s> Arguments<'s> {
    /// Bind the first `count` slots of `stack`.
    pub fn new(stack: &'s Stack, count: usize) -> Self {
        Arguments {
            stack,
            position: 1,
            count,
        }
    }

    /// Convert the next argument into `T`.
    pub fn arg<T: FromDynamic>(&mut self) -> Result<T> {
        let position = self.position;
        self.position += 1;

        let value = self.stack.read_index(position)?;
        coerce(value).map_err(|mismatch| Error::ArgumentType {
            position,
            got: mismatch.got,
            wanted: T::kind(),
        })
    }

    /// Convert every remaining argument into `T`.
    pub fn rest<T: FromDynamic>(&mut self) -> Result<Variadic<T>> {
        let mut items = Vec::with_capacity(self.count.saturating_sub(self.position - 1));
        while self.position <= self.count {
            items.push(self.arg()?);
        }
        Ok(Variadic(items))
    }
}
