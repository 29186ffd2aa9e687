use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use indoc::indoc;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};

use super::{HostFunction, Signature, Variadic};
use crate::api::Interpreter;
use crate::test_utils::init_test_logging;
use crate::values::{DynamicValue, Record, StructuredRecord};

fn interpreter_with(name: &str, function: HostFunction) -> Interpreter {
    init_test_logging();
    let mut lua = Interpreter::new();
    lua.set_globals([(name, function)]).unwrap();
    lua
}

/// Run `source` under pcall and return the error message it raised.
fn raised(lua: &mut Interpreter, source: &str) -> String {
    let chunk = format!(
        "local ok, err = pcall(function() {} end); assert(not ok); return tostring(err)",
        source
    );
    match lua.eval(&chunk).unwrap() {
        DynamicValue::String(message) => message,
        other => panic!("expected message, got {other:?}"),
    }
}

#[test]
fn test_signature_display() {
    let fixed = HostFunction::new(|_: f64, _: String| ());
    assert_eq!(fixed.signature().to_string(), "(f64, string)");
    assert!(!fixed.signature().is_variadic());

    let variadic = HostFunction::variadic(|_: bool, _: Variadic<i64>| ());
    assert_eq!(variadic.signature().to_string(), "(bool, ...i64)");
    assert_eq!(
        variadic.signature(),
        &Signature::variadic(vec!["bool".to_string(), "i64".to_string()])
    );
}

#[test]
fn test_fixed_arity_exact() {
    let mut lua = interpreter_with("add", HostFunction::new(|a: f64, b: f64| a + b));
    assert_eq!(lua.eval("return add(2, 3)").unwrap(), DynamicValue::Number(5.0));
}

#[test]
fn test_fixed_arity_too_few() {
    let mut lua = interpreter_with("add", HostFunction::new(|a: f64, b: f64| a + b));
    let message = raised(&mut lua, "add(1)");
    assert!(message.contains("got 2 arguments, needed 1"), "got {message}");
}

#[test]
fn test_fixed_arity_truncates_extra() {
    let mut lua = interpreter_with("add", HostFunction::new(|a: f64, b: f64| a + b));
    assert_eq!(lua.eval("return add(1, 2, 3)").unwrap(), DynamicValue::Number(3.0));
}

#[test]
fn test_variadic_with_no_trailing_arguments() {
    let join = HostFunction::variadic(|sep: String, parts: Variadic<String>| parts.join(&sep));
    let mut lua = interpreter_with("join", join);
    assert_eq!(lua.eval("return join('-')").unwrap(), DynamicValue::from(""));
}

#[test]
fn test_variadic_with_many_trailing_arguments() {
    let join = HostFunction::variadic(|sep: String, parts: Variadic<String>| parts.join(&sep));
    let mut lua = interpreter_with("join", join);
    assert_eq!(
        lua.eval("return join('-', 'a', 'b', 'c')").unwrap(),
        DynamicValue::from("a-b-c")
    );
}

#[test]
fn test_variadic_with_missing_fixed_arguments() {
    let f = HostFunction::variadic(|_: f64, _: f64, _: Variadic<f64>| ());
    let mut lua = interpreter_with("f", f);
    let message = raised(&mut lua, "f(1)");
    assert!(message.contains("got 3 arguments, needed 1"), "got {message}");
}

#[test]
fn test_nil_binds_zero_values() {
    let f = HostFunction::new(|n: i64, s: String, b: bool| format!("{n}|{s}|{b}"));
    let mut lua = interpreter_with("f", f);
    assert_eq!(lua.eval("return f(nil, nil, nil)").unwrap(), DynamicValue::from("0||false"));
}

#[test]
fn test_argument_type_error() {
    let f = HostFunction::new(|a: f64, _b: f64| a).named("f");
    let mut lua = interpreter_with("f", f);
    let message = raised(&mut lua, "f(1, 'two')");
    assert!(
        message.contains("wrong argument type: got string, wanted f64"),
        "got {message}"
    );
    assert!(message.contains("#2"), "got {message}");
}

#[test]
fn test_panic_is_contained() {
    let f = HostFunction::new(|| -> f64 { panic!("host exploded") });
    let mut lua = interpreter_with("f", f);
    let message = raised(&mut lua, "f()");
    assert!(message.contains("function panic: host exploded"), "got {message}");

    // The interpreter stays usable after a contained panic.
    assert_eq!(lua.eval("return 1 + 1").unwrap(), DynamicValue::Number(2.0));
}

#[derive(Serialize)]
struct Exploding;

impl StructuredRecord for Exploding {
    fn string_representation(&self) -> Option<String> {
        panic!("to_string blew up")
    }
}

#[test]
fn test_panic_while_writing_results_is_contained() {
    let f = HostFunction::new(|| Record(Exploding));
    let mut lua = interpreter_with("f", f);
    let message = raised(&mut lua, "f()");
    assert!(message.contains("function panic: to_string blew up"), "got {message}");

    let err = lua.eval("return f()").unwrap_err();
    let details = format!("{err:?}");
    assert!(details.contains("function panic: to_string blew up"), "got {details}");
    assert_eq!(lua.eval("return 1 + 1").unwrap(), DynamicValue::Number(2.0));
}

struct Touchy;

impl<'de> Deserialize<'de> for Touchy {
    fn deserialize<D: serde::Deserializer<'de>>(_: D) -> Result<Self, D::Error> {
        panic!("deserialize blew up")
    }
}

#[test]
fn test_panic_while_converting_arguments_is_contained() {
    let f = HostFunction::new(|_: Record<Touchy>| 1.0);
    let mut lua = interpreter_with("f", f);
    let message = raised(&mut lua, "f({})");
    assert!(message.contains("function panic: deserialize blew up"), "got {message}");
    assert!(lua.eval("return f({})").is_err());
}

#[test]
fn test_multiple_return_values() {
    let f = HostFunction::new(|x: f64| (x, x * 2.0, "three"));
    let mut lua = interpreter_with("f", f);
    lua.exec("a, b, c = f(1)").unwrap();
    let globals = lua.get_globals(["a", "b", "c"]).unwrap();
    assert_eq!(
        globals,
        BTreeMap::from([
            ("a".to_string(), DynamicValue::Number(1.0)),
            ("b".to_string(), DynamicValue::Number(2.0)),
            ("c".to_string(), DynamicValue::from("three")),
        ])
    );
}

#[test]
fn test_no_return_values() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let seen = seen.clone();
        HostFunction::new(move |s: String| seen.borrow_mut().push(s))
    };
    let mut lua = interpreter_with("sink", sink);
    assert_eq!(
        lua.eval("return select('#', sink('x'))").unwrap(),
        DynamicValue::Number(0.0)
    );
    assert_eq!(*seen.borrow(), vec!["x".to_string()]);
}

#[test]
fn test_error_result_raises() {
    let f = HostFunction::new(|x: f64| -> Result<f64, String> {
        if x < 0.0 {
            Err(format!("negative input {x}"))
        } else {
            Ok(x.sqrt())
        }
    });
    let mut lua = interpreter_with("sqrt", f);
    assert_eq!(lua.eval("return sqrt(9)").unwrap(), DynamicValue::Number(3.0));
    let message = raised(&mut lua, "sqrt(-1)");
    assert!(message.contains("negative input -1"), "got {message}");
}

#[test]
fn test_collection_parameters() {
    let total = HostFunction::new(|xs: Vec<f64>| xs.iter().sum::<f64>());
    let mut lua = interpreter_with("total", total);
    assert_eq!(lua.eval("return total({1, 2, 3})").unwrap(), DynamicValue::Number(6.0));
    assert_eq!(lua.eval("return total({})").unwrap(), DynamicValue::Number(0.0));
}

#[derive(Debug, Deserialize)]
struct Config {
    name: String,
    retries: u32,
}

#[test]
fn test_record_parameter() {
    let describe =
        HostFunction::new(|Record(config): Record<Config>| format!("{}x{}", config.name, config.retries));
    let mut lua = interpreter_with("describe", describe);
    assert_eq!(
        lua.eval("return describe({name = 'job', retries = 3})").unwrap(),
        DynamicValue::from("jobx3")
    );
}

#[test]
fn test_host_function_calls_back_into_lua() {
    init_test_logging();
    let mut lua = Interpreter::new();
    let callback_lua = lua.lua().clone();
    let twice = HostFunction::new(move |name: String| -> Result<f64, mlua::Error> {
        let function: mlua::Function = callback_lua.globals().get(name)?;
        let once: f64 = function.call(1.0)?;
        function.call(once)
    });
    lua.set_globals([("twice", twice)]).unwrap();
    lua.exec(indoc! {"
        function inc(x) return x + 1 end
        result = twice('inc')
    "})
    .unwrap();
    assert_eq!(lua.get_globals(["result"]).unwrap()["result"], DynamicValue::Number(3.0));
}
