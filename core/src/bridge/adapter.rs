//! Adapters from plain Rust closures to [`HostFunction`]s.
//!
//! The parameter list is taken from the closure's signature: every parameter
//! type implements [`FromDynamic`] and the return type implements [`Returns`].
//! Closures ending in a [`Variadic`] parameter go through
//! [`IntoVariadicFunction`] instead.

use super::{Arguments, HostFunction, Returns, Signature, Variadic};
use crate::stack::Stack;
use crate::values::FromDynamic;

/// A closure with fixed parameters.
pub trait IntoHostFunction<Args, Ret> {
    fn into_host_function(self) -> HostFunction;
}

/// A closure whose last parameter collects the trailing arguments.
pub trait IntoVariadicFunction<Args, Var, Ret> {
    fn into_variadic_function(self) -> HostFunction;
}

macro_rules! impl_into_host_function {
    ($($param:ident),*) => {
        impl<Func, Ret, $($param,)*> IntoHostFunction<($($param,)*), Ret> for Func
        where
            Func: Fn($($param),*) -> Ret + 'static,
            Ret: Returns,
            $($param: FromDynamic,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_host_function(self) -> HostFunction {
                let signature = Signature::fixed(vec![$(<$param as FromDynamic>::kind()),*]);
                HostFunction::from_thunk(signature, move |frame: &mut Stack, count: usize| {
                    let mut args = Arguments::new(frame, count);
                    $(let $param = args.arg::<$param>()?;)*
                    (self)($($param),*).push_returns(frame)
                })
            }
        }

        impl<Func, Ret, Var, $($param,)*> IntoVariadicFunction<($($param,)*), Var, Ret> for Func
        where
            Func: Fn($($param,)* Variadic<Var>) -> Ret + 'static,
            Ret: Returns,
            Var: FromDynamic,
            $($param: FromDynamic,)*
        {
            #[allow(non_snake_case)]
            fn into_variadic_function(self) -> HostFunction {
                let mut params = vec![$(<$param as FromDynamic>::kind()),*];
                params.push(Var::kind());
                let signature = Signature::variadic(params);
                HostFunction::from_thunk(signature, move |frame: &mut Stack, count: usize| {
                    let mut args = Arguments::new(frame, count);
                    $(let $param = args.arg::<$param>()?;)*
                    let rest = args.rest::<Var>()?;
                    (self)($($param,)* rest).push_returns(frame)
                })
            }
        }
    };
}

impl_into_host_function!();
impl_into_host_function!(A);
impl_into_host_function!(A, B);
impl_into_host_function!(A, B, C);
impl_into_host_function!(A, B, C, D);
impl_into_host_function!(A, B, C, D, E);
impl_into_host_function!(A, B, C, D, E, F);
impl_into_host_function!(A, B, C, D, E, F, G);
impl_into_host_function!(A, B, C, D, E, F, G, H);
