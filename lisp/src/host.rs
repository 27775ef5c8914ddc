//! Narrow bridge to values owned by the embedding program.
//!
//! The evaluator only ever asks a host object for a named attribute (`.`)
//! or to be invoked with plain data (`!`). Arguments and results cross the
//! boundary as [`HostValue`]s.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

#[derive(Clone, Debug)]
pub enum HostValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<HostValue>),
    Object(Rc<dyn HostBridge>),
}

impl PartialEq for HostValue {
    fn eq(&self, other: &HostValue) -> bool {
        match (self, other) {
            (HostValue::Nil, HostValue::Nil) => true,
            (HostValue::Bool(l), HostValue::Bool(r)) => l == r,
            (HostValue::Int(l), HostValue::Int(r)) => l == r,
            (HostValue::Float(l), HostValue::Float(r)) => l == r,
            (HostValue::Str(l), HostValue::Str(r)) => l == r,
            (HostValue::List(l), HostValue::List(r)) => l == r,
            (HostValue::Object(l), HostValue::Object(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

pub trait HostBridge: fmt::Debug {
    fn type_name(&self) -> &str { "object" }

    fn get_attribute(&self, name: &str) -> Result<HostValue, HostError> {
        Err(HostError(format!("{} has no attribute '{}'", self.type_name(), name)))
    }

    fn invoke(&self, _args: Vec<HostValue>) -> Result<HostValue, HostError> {
        Err(HostError(format!("{} is not invocable", self.type_name())))
    }
}

/// A host object that is just a table of named attributes.
#[derive(Debug)]
pub struct HostRecord {
    name: String,
    fields: HashMap<String, HostValue>,
}

impl HostRecord {
    pub fn new<S: Into<String>>(name: S) -> Self {
        HostRecord{name: name.into(), fields: HashMap::new()}
    }

    pub fn with<S: Into<String>>(mut self, field: S, value: HostValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }
}

impl HostBridge for HostRecord {
    fn type_name(&self) -> &str { &self.name }

    fn get_attribute(&self, name: &str) -> Result<HostValue, HostError> {
        self.fields.get(name)
            .cloned()
            .ok_or_else(|| HostError(format!("{} has no attribute '{}'", self.name, name)))
    }
}

pub type HostFp = Box<dyn Fn(Vec<HostValue>) -> Result<HostValue, HostError>>;

/// A native closure exposed as an invocable host object.
pub struct HostFn {
    name: String,
    fp: HostFp,
}

impl HostFn {
    pub fn new<S, F>(name: S, fp: F) -> Self
            where S: Into<String>,
                  F: Fn(Vec<HostValue>) -> Result<HostValue, HostError> + 'static {
        HostFn{name: name.into(), fp: Box::new(fp)}
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HostFn({})", self.name)
    }
}

impl HostBridge for HostFn {
    fn type_name(&self) -> &str { &self.name }

    fn invoke(&self, args: Vec<HostValue>) -> Result<HostValue, HostError> {
        (self.fp)(args)
    }
}
