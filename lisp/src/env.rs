use crate::value::Value;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Binding table handle. Clones share the table (that's how closures hold
/// their defining scope), `extend` copies it so the child can't touch the base.
#[derive(Clone, Default)]
pub struct Environment {
    bindings: Rc<RefCell<HashMap<String, Value>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&self) -> Self {
        Self {
            bindings: Rc::new(RefCell::new(self.bindings.borrow().clone())),
        }
    }

    pub fn lookup(&self, sym: &str) -> Option<Value> {
        self.bindings.borrow().get(sym).cloned()
    }

    pub fn bind<S: Into<String>>(&self, sym: S, value: Value) -> Value {
        self.bindings.borrow_mut().insert(sym.into(), value.clone());
        value
    }

    pub fn contains(&self, sym: &str) -> bool {
        self.bindings.borrow().contains_key(sym)
    }

    pub fn len(&self) -> usize {
        self.bindings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// closures live inside the table they capture, don't walk it
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Environment({} bindings)", self.len())
    }
}
