//! Faults and their `raise` documents.
//!
//! A [`Fault`] is an error captured as a value. It is a complex value in its
//! own right (an object whose type name is the fault's type name and whose
//! only field is `message`), so it gets an identity token like any other
//! object and can be looked up again by id.
//!
//! [`adapt`] renders a fault as
//!
//! ```xml
//! <raise exception="ZeroDivision" id="4"><message><str value="division by zero"/></message></raise>
//! ```
//!
//! using the same converter as regular values for the message payload.

use std::fmt;
use std::rc::Rc;

use crate::convert::Converter;
use crate::error::InvokeError;
use crate::value::{Identity, Introspect, Member, Object, Value};
use crate::xml::Element;

struct FaultBody {
    type_name: String,
    message: Value,
}

impl Introspect for FaultBody {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn members(&self) -> Vec<Member> {
        vec![Member::field("message", self.message.clone())]
    }
}

/// An error condition captured as a value.
#[derive(Clone)]
pub struct Fault {
    body: Rc<FaultBody>,
    object: Object,
}

impl Fault {
    /// Creates a fault with the given type name and message payload.
    pub fn new(type_name: impl Into<String>, message: impl Into<Value>) -> Self {
        let body = Rc::new(FaultBody {
            type_name: type_name.into(),
            message: message.into(),
        });
        let object = Object::from_shared(body.clone());
        Self { body, object }
    }

    pub fn type_name(&self) -> &str {
        &self.body.type_name
    }

    pub fn message(&self) -> &Value {
        &self.body.message
    }

    pub fn identity(&self) -> Identity {
        self.object.identity()
    }

    /// The fault as an object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.object.clone())
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("type_name", &self.type_name())
            .field("identity", &self.identity())
            .finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Value::Text(text) => write!(f, "{}: {}", self.type_name(), text),
            Value::Integer(i) => write!(f, "{}: {}", self.type_name(), i),
            Value::None => f.write_str(self.type_name()),
            other => write!(f, "{}: <{}>", self.type_name(), other.type_name()),
        }
    }
}

impl std::error::Error for Fault {}

impl From<Fault> for Value {
    fn from(fault: Fault) -> Self {
        fault.to_value()
    }
}

impl From<InvokeError> for Fault {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::Raised(fault) => fault,
            other => Fault::new(other.kind(), other.to_string()),
        }
    }
}

/// Builds the `raise` element for `fault`.
///
/// The fault itself is registered; the message is converted with
/// `converter`, so it shares the conversion's cycle guard.
pub fn adapt(converter: &mut Converter<'_>, fault: &Fault) -> Element {
    let value = fault.to_value();
    let token = converter.token(fault.identity(), &value);
    let message = Element::new("message").with_child(converter.convert(fault.message()));

    Element::new("raise")
        .with_attribute("exception", fault.type_name())
        .with_attribute("id", token)
        .with_child(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::IdentityRegistry;
    use crate::value::Sequence;

    #[test]
    fn test_raise_element_shape() {
        let mut registry = IdentityRegistry::new();
        let fault = Fault::new("ValueError", "boom");
        let element = adapt(&mut Converter::new(&mut registry), &fault);

        assert_eq!(element.tag(), "raise");
        assert_eq!(element.attribute("exception"), Some("ValueError"));
        assert_eq!(element.attribute("id"), Some("1"));
        assert_eq!(element.children().len(), 1);

        let message = &element.children()[0];
        assert_eq!(message.tag(), "message");
        assert_eq!(
            message.children()[0],
            Element::new("str").with_attribute("value", "boom")
        );
    }

    #[test]
    fn test_fault_is_registered_and_resolvable() {
        let mut registry = IdentityRegistry::new();
        let fault = Fault::new("ValueError", "boom");
        adapt(&mut Converter::new(&mut registry), &fault);

        let resolved = registry.resolve("1").unwrap();
        assert_eq!(resolved, fault.to_value());
        assert_eq!(resolved.type_name(), "ValueError");
    }

    #[test]
    fn test_complex_message_is_converted() {
        let mut registry = IdentityRegistry::new();
        let payload = Sequence::tuple(vec![Value::from("bad"), Value::Integer(3)]);
        let fault = Fault::new("ArgumentError", payload);
        let element = adapt(&mut Converter::new(&mut registry), &fault);

        let converted = &element.children()[0].children()[0];
        assert_eq!(converted.tag(), "tuple");
        assert_eq!(converted.attribute("id"), Some("2"));
        assert_eq!(converted.children().len(), 2);
    }

    #[test]
    fn test_fault_as_object_value() {
        let fault = Fault::new("NotFound", "gone");
        let value = fault.to_value();
        assert_eq!(value.type_name(), "NotFound");
        assert_eq!(value.attribute("message").ok(), Some(Value::from("gone")));
    }

    #[test]
    fn test_invoke_error_into_fault() {
        let fault = Fault::from(InvokeError::NotCallable {
            name: "answer".to_string(),
        });
        assert_eq!(fault.type_name(), "NotCallable");
        assert_eq!(fault.message(), &Value::from("'answer' is not callable"));

        let original = Fault::new("Custom", "x");
        let passed = Fault::from(InvokeError::Raised(original.clone()));
        assert_eq!(passed.identity(), original.identity());
    }

    #[test]
    fn test_display() {
        assert_eq!(Fault::new("ZeroDivision", "division by zero").to_string(), "ZeroDivision: division by zero");
        assert_eq!(Fault::new("Empty", Value::None).to_string(), "Empty");
    }
}
