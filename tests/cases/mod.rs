#![allow(dead_code, unused_macros)]

use moonbridge::{DynamicValue, Interpreter, InterpreterOptions, Marshal};

pub fn interpreter() -> Interpreter {
    Interpreter::new()
}

pub fn interpreter_marking_empty_arrays() -> Interpreter {
    Interpreter::with_options(InterpreterOptions {
        mark_empty_arrays: true,
        ..InterpreterOptions::default()
    })
}

/// Bind `value` as global `v`, run `script` and read global `out` back.
pub fn through_lua<T: Marshal>(lua: &mut Interpreter, value: T, script: &str) -> DynamicValue {
    lua.set_globals([("v", value)]).unwrap();
    lua.exec(script).unwrap();
    lua.get_globals(["out"]).unwrap().remove("out").unwrap()
}

/// Message of the error `source` raises, caught with `pcall` inside Lua.
pub fn raised(lua: &mut Interpreter, source: &str) -> String {
    let chunk = format!(
        "local ok, err = pcall(function() {} end)\nassert(not ok, 'expected an error')\nreturn tostring(err)",
        source
    );
    match lua.eval(&chunk).unwrap() {
        DynamicValue::String(message) => message,
        other => panic!("expected an error message, got {other:?}"),
    }
}

/// Every message along `err`'s source chain, outermost first.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(err) = source {
        messages.push(err.to_string());
        source = err.source();
    }
    messages.join(": ")
}

/// Write a host value, copy it inside Lua and read the copy back.
macro_rules! round_trip_case {
    ($name:ident, host: $value:expr, expect: $expected:expr $(,)?) => {
        #[test]
        fn $name() {
            let mut lua = $crate::cases::interpreter();
            let read = $crate::cases::through_lua(&mut lua, $value, "out = v");
            pretty_assertions::assert_eq!(read, $expected);
        }
    };
}
