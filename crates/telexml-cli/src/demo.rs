//! The built-in `demo` target.
//!
//! Small enough to explore by hand, but covering every value kind: scalars,
//! nested objects for dotted paths, shared and cyclic graphs, and functions
//! that fail.

use telexml::{Args, Fault, Mapping, Module, Record, Sequence, Value};

/// Builds the `demo` module.
pub fn demo_module() -> Module {
    let owner = Record::new("Owner")
        .with_field("name", "ada")
        .with_field("email", "ada@example.org")
        .with_private_field("token", "s3cr3t");
    let settings = Record::new("Settings")
        .with_field("retries", 3)
        .with_field("timeout", 2.5)
        .with_field("owner", owner)
        .with_method("reload");

    Module::new("demo")
        .with_attribute("answer", 42)
        .with_attribute("pi", std::f64::consts::PI)
        .with_attribute("greeting", "hello")
        .with_attribute("settings", settings)
        .with_attribute("nothing", Value::None)
        .with_function("echo", echo)
        .with_function("pair", pair)
        .with_function("describe", describe)
        .with_function("divide", divide)
        .with_function("shared", shared)
        .with_function("cycle", cycle)
        .with_function("fail", fail)
}

fn echo(args: &Args) -> Result<Value, Fault> {
    Ok(args.require(0)?.clone())
}

fn pair(args: &Args) -> Result<Value, Fault> {
    let first = args.require(0)?.clone();
    let second = args.require(1)?.clone();
    Ok(Sequence::tuple(vec![first, second]).into())
}

/// Returns the named arguments as a mapping.
fn describe(args: &Args) -> Result<Value, Fault> {
    let mapping = Mapping::new();
    for (key, value) in args.named_args() {
        mapping.insert(key.as_str(), value.clone());
    }
    Ok(mapping.into())
}

fn divide(args: &Args) -> Result<Value, Fault> {
    let dividend = args.integer(0)?;
    let divisor = args.integer(1)?;
    if divisor == 0 {
        return Err(Fault::new("ZeroDivision", "division by zero"));
    }
    Ok(Value::Float(dividend as f64 / divisor as f64))
}

/// A list holding the same mapping twice.
fn shared(_: &Args) -> Result<Value, Fault> {
    let entry = Mapping::from_entries([("k", 1)]);
    Ok(Sequence::list(vec![entry.clone().into(), entry.into()]).into())
}

/// A list containing itself. The cycle is never collected.
fn cycle(_: &Args) -> Result<Value, Fault> {
    let list = Sequence::list(vec![Value::Integer(1)]);
    list.push(list.clone());
    Ok(list.into())
}

fn fail(args: &Args) -> Result<Value, Fault> {
    let message = args.get(0).cloned().unwrap_or_else(|| "failure".into());
    Err(Fault::new("DemoFailure", message))
}
