mod cases;

use std::cell::Cell;
use std::rc::Rc;

use indoc::indoc;
use moonbridge::{DynamicValue, HostFunction, Variadic};
use pretty_assertions::assert_eq;

use cases::{interpreter, raised};

fn pair() -> HostFunction {
    HostFunction::new(|a: String, b: String| format!("{a}+{b}")).named("pair")
}

#[test]
fn two_parameters_with_one_argument_is_an_arity_error() {
    let mut lua = interpreter();
    lua.set_globals([("pair", pair())]).unwrap();
    let message = raised(&mut lua, "pair('x')");
    assert!(message.contains("got 2 arguments, needed 1"), "got {message}");
}

#[test]
fn two_parameters_with_two_arguments() {
    let mut lua = interpreter();
    lua.set_globals([("pair", pair())]).unwrap();
    assert_eq!(lua.eval("return pair('x', 'y')").unwrap(), DynamicValue::from("x+y"));
}

#[test]
fn two_parameters_with_three_arguments_drops_the_third() {
    let mut lua = interpreter();
    lua.set_globals([("pair", pair())]).unwrap();
    assert_eq!(
        lua.eval("return pair('x', 'y', 'z')").unwrap(),
        DynamicValue::from("x+y")
    );
}

#[test]
fn arity_is_checked_before_conversion() {
    let mut lua = interpreter();
    lua.set_globals([("pair", pair())]).unwrap();
    let message = raised(&mut lua, "pair({})");
    assert!(message.contains("got 2 arguments, needed 1"), "got {message}");
}

fn head_and_rest() -> HostFunction {
    HostFunction::variadic(|head: String, rest: Variadic<f64>| {
        format!("{head}:{}:{}", rest.len(), rest.iter().sum::<f64>())
    })
}

#[test]
fn variadic_with_no_arguments_needs_the_fixed_one() {
    let mut lua = interpreter();
    lua.set_globals([("f", head_and_rest())]).unwrap();
    let message = raised(&mut lua, "f()");
    assert!(message.contains("got 2 arguments, needed 0"), "got {message}");
}

#[test]
fn variadic_collects_every_trailing_argument() {
    let mut lua = interpreter();
    lua.set_globals([("f", head_and_rest())]).unwrap();
    assert_eq!(
        lua.eval("return f('sum', 1, 2, 3)").unwrap(),
        DynamicValue::from("sum:3:6")
    );
    assert_eq!(lua.eval("return f('none')").unwrap(), DynamicValue::from("none:0:0"));
}

#[test]
fn variadic_trailing_type_error_names_position() {
    let mut lua = interpreter();
    lua.set_globals([("f", head_and_rest().named("f"))]).unwrap();
    let message = raised(&mut lua, "f('x', 1, true)");
    assert!(
        message.contains("wrong argument type: got bool, wanted f64"),
        "got {message}"
    );
    assert!(message.contains("#3"), "got {message}");
}

#[test]
fn panics_surface_as_runtime_errors() {
    let mut lua = interpreter();
    let divide = HostFunction::new(|a: i64, b: i64| a.checked_div(b).expect("division by zero"));
    lua.set_globals([("divide", divide)]).unwrap();

    assert_eq!(lua.eval("return divide(7, 2)").unwrap(), DynamicValue::Number(3.0));
    let message = raised(&mut lua, "divide(1, 0)");
    assert!(message.contains("panic"), "got {message}");
    assert!(message.contains("division by zero"), "got {message}");
}

#[test]
fn errors_are_catchable_by_scripts() {
    let mut lua = interpreter();
    let calls = Rc::new(Cell::new(0));
    let counter = {
        let calls = calls.clone();
        HostFunction::new(move |n: f64| -> Result<f64, String> {
            calls.set(calls.get() + 1);
            if n < 0.0 {
                Err("negative".to_string())
            } else {
                Ok(n)
            }
        })
    };
    lua.set_globals([("check", counter)]).unwrap();
    lua.exec(indoc! {"
        ok_good = pcall(check, 1)
        ok_bad = pcall(check, -1)
    "})
    .unwrap();

    let globals = lua.get_globals(["ok_good", "ok_bad"]).unwrap();
    assert_eq!(globals["ok_good"], DynamicValue::Bool(true));
    assert_eq!(globals["ok_bad"], DynamicValue::Bool(false));
    assert_eq!(calls.get(), 2);
}

#[test]
fn tuples_return_multiple_values() {
    let mut lua = interpreter();
    let divmod = HostFunction::new(|a: i64, b: i64| (a / b, a % b));
    lua.set_globals([("divmod", divmod)]).unwrap();
    assert_eq!(
        lua.eval("local q, r = divmod(17, 5); return q * 10 + r").unwrap(),
        DynamicValue::Number(32.0)
    );
}

#[test]
fn host_functions_accept_and_return_tables() {
    let mut lua = interpreter();
    let keys = HostFunction::new(|table: DynamicValue| -> Vec<String> {
        table
            .as_table()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    });
    lua.set_globals([("keys", keys)]).unwrap();
    assert_eq!(
        lua.eval("return keys({b = 1, a = 2})").unwrap(),
        DynamicValue::array(["a", "b"])
    );
}

#[test]
fn host_functions_can_be_passed_around_in_lua() {
    let mut lua = interpreter();
    lua.set_globals([("double", HostFunction::new(|x: f64| x * 2.0))])
        .unwrap();
    lua.exec(indoc! {"
        local function map(f, xs)
            local out = {}
            for i, x in ipairs(xs) do out[i] = f(x) end
            return out
        end
        result = map(double, {1, 2, 3})
    "})
    .unwrap();
    assert_eq!(
        lua.get_globals(["result"]).unwrap()["result"],
        DynamicValue::array([2.0, 4.0, 6.0])
    );
}
