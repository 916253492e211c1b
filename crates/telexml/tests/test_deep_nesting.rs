//! Conversion of very deep acyclic graphs.
//!
//! Conversion recurses once per nesting level, so without a depth bound a
//! long enough chain of lists overflows the thread stack. These tests run on
//! threads with explicit stack sizes to check that the default bound keeps
//! conversion and serialization on the stack.

use std::thread;

use telexml::{DEFAULT_MAX_DEPTH, Element, ExportOptions, Exporter, Module, Sequence, Value};

const SMALL_STACK: usize = 2 * 1024 * 1024;
const LARGE_STACK: usize = 16 * 1024 * 1024;

/// Builds `levels` nested lists iteratively, innermost empty.
fn chain(levels: usize) -> Value {
    let mut current = Value::from(Sequence::list(Vec::new()));
    for _ in 0..levels {
        current = Value::from(Sequence::list(vec![current]));
    }
    current
}

fn depth_of(root: &Element) -> usize {
    let mut depth = 1;
    let mut current = root;
    while let Some(child) = current.children().first() {
        depth += 1;
        current = child;
    }
    depth
}

#[test]
fn test_default_bound_survives_small_stack() {
    let handle = thread::Builder::new()
        .stack_size(SMALL_STACK)
        .spawn(|| {
            let root = chain(50_000);
            let mut exporter = Exporter::new(Module::new("deep"));
            let document = exporter.convert(&root);

            // Bound-many levels expanded, plus the truncated one.
            assert_eq!(depth_of(document.root()), DEFAULT_MAX_DEPTH + 1);
            let xml = document.to_xml_string().expect("serialization failed");
            assert!(xml.starts_with(r#"<?xml version="1.0"?><list id="1">"#));

            // Dropping the chain recurses once per level.
            std::mem::forget(root);
        })
        .expect("failed to spawn thread");

    handle.join().expect("conversion overflowed the stack");
}

#[test]
fn test_truncated_level_is_registered() {
    let handle = thread::Builder::new()
        .stack_size(SMALL_STACK)
        .spawn(|| {
            let root = chain(1_000);
            let mut exporter = Exporter::new(Module::new("deep"));
            let document = exporter.convert(&root);

            let mut truncated = document.root();
            while let Some(child) = truncated.children().first() {
                truncated = child;
            }
            let token = truncated.attribute("id").expect("truncated list has an id");

            // Looking the truncated value up continues the export from there.
            let resumed = exporter.lookup_by_id(token).expect("token was issued");
            assert_eq!(resumed.root().tag(), "list");
            assert_eq!(resumed.root().children().len(), 1);

            std::mem::forget(root);
        })
        .expect("failed to spawn thread");

    handle.join().expect("conversion overflowed the stack");
}

#[test]
fn test_unbounded_conversion_of_moderate_depth() {
    let handle = thread::Builder::new()
        .stack_size(LARGE_STACK)
        .spawn(|| {
            let root = chain(1_000);
            let mut exporter =
                Exporter::new(Module::new("deep")).with_options(ExportOptions::unbounded());
            let document = exporter.convert(&root);
            assert_eq!(depth_of(document.root()), 1_001);
        })
        .expect("failed to spawn thread");

    handle.join().expect("conversion overflowed the stack");
}
