use mlua::{Lua, Value};

use super::{Stack, TypeTag};
use crate::api::{Error, InterpreterOptions};

fn stack() -> Stack {
    Stack::new(Lua::new(), InterpreterOptions::default())
}

#[test]
fn test_positions_are_one_based_and_relative() {
    let mut stack = stack();
    stack.push_number(1.0);
    stack.push_bool(true);
    stack.push_nil();

    assert_eq!(stack.top(), 3);
    assert_eq!(stack.absolute(1), Some(1));
    assert_eq!(stack.absolute(3), Some(3));
    assert_eq!(stack.absolute(-1), Some(3));
    assert_eq!(stack.absolute(-3), Some(1));
    assert_eq!(stack.absolute(0), None);
    assert_eq!(stack.absolute(4), None);
    assert_eq!(stack.absolute(-4), None);
}

#[test]
fn test_type_tags() {
    let mut stack = stack();
    stack.push_number(1.0);
    stack.push_string("s").unwrap();
    stack.create_table(0, 0).unwrap();
    stack.push_value(Value::Integer(3));

    assert_eq!(stack.type_tag(1), TypeTag::Number);
    assert_eq!(stack.type_tag(2), TypeTag::String);
    assert_eq!(stack.type_tag(3), TypeTag::Table);
    assert_eq!(stack.type_tag(-1), TypeTag::Number);
    assert_eq!(stack.type_tag(9), TypeTag::None);
}

#[test]
fn test_pop_saturates() {
    let mut stack = stack();
    stack.push_nil();
    stack.push_nil();
    stack.pop(1);
    assert_eq!(stack.top(), 1);
    stack.pop(10);
    assert_eq!(stack.top(), 0);
}

#[test]
fn test_raw_set_pops_key_and_value() {
    let mut stack = stack();
    stack.create_table(0, 1).unwrap();
    stack.push_string("answer").unwrap();
    stack.push_number(42.0);
    stack.raw_set(-3).unwrap();

    assert_eq!(stack.top(), 1);
    let table = stack.table_at(1).unwrap();
    let answer: f64 = table.raw_get("answer").unwrap();
    assert_eq!(answer, 42.0);
}

#[test]
fn test_raw_seti_and_border() {
    let mut stack = stack();
    stack.create_table(2, 0).unwrap();
    stack.push_string("a").unwrap();
    stack.raw_seti(-2, 1).unwrap();
    stack.push_string("b").unwrap();
    stack.raw_seti(-2, 2).unwrap();

    assert_eq!(stack.top(), 1);
    assert_eq!(stack.border_len(-1).unwrap(), 2);
    assert_eq!(stack.pairs(-1).unwrap().len(), 2);
}

#[test]
fn test_table_primitives_reject_non_tables() {
    let mut stack = stack();
    stack.push_number(1.0);

    let err = stack.border_len(1).unwrap_err();
    assert!(matches!(err, Error::Stack(_)), "got {err:?}");

    let err = stack.border_len(5).unwrap_err();
    assert!(err.to_string().contains("out of range"), "got {err}");
}

#[test]
fn test_raw_set_underflow() {
    let mut stack = stack();
    stack.create_table(0, 0).unwrap();
    let err = stack.raw_set(1).unwrap_err();
    assert_eq!(err.to_string(), "stack error: stack underflow");
}

#[test]
fn test_globals_round_trip() {
    let mut stack = stack();
    stack.push_string("hello").unwrap();
    stack.set_global("greeting").unwrap();
    assert_eq!(stack.top(), 0);

    stack.get_global("greeting").unwrap();
    stack.get_global("missing").unwrap();
    assert_eq!(stack.top(), 2);
    assert_eq!(stack.type_tag(1), TypeTag::String);
    assert_eq!(stack.type_tag(2), TypeTag::Nil);
}

#[test]
fn test_take_top_keeps_order() {
    let mut stack = stack();
    stack.push_number(1.0);
    stack.push_number(2.0);
    stack.push_number(3.0);

    let taken = stack.take_top(2);
    assert_eq!(stack.top(), 1);
    assert!(matches!(
        taken.as_slice(),
        [Value::Number(a), Value::Number(b)] if *a == 2.0 && *b == 3.0
    ));
}
