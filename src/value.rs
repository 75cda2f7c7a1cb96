//! Runtime values as the array engine sees them.
//!
//! Lists and reactive values are shared and never mutated once built, so
//! cloning a `Value` is always cheap.

use std::fmt;
use std::rc::Rc;

use crate::reactive::ReactiveValue;

/// Number of booleans in a packed 32-bit boolean list.
pub const BOOL32_SIZE: usize = 32;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Num(f64),
    Bool(bool),
    /// An ordered list; its size is fixed at construction.
    List(Rc<[Value]>),
    /// A value whose content is only known to generated code.
    Reactive(Rc<ReactiveValue>),
}

impl Value {
    /// Builds a list value from its elements.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(items.into_iter().collect())
    }

    pub fn is_num(&self) -> bool {
        matches!(self, Value::Num(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Rc<[Value]>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_reactive(&self) -> Option<&Rc<ReactiveValue>> {
        match self {
            Value::Reactive(r) => Some(r),
            _ => None,
        }
    }

    /// Packs a list of exactly 32 booleans into a word, element `i` at bit `i`.
    ///
    /// Returns `None` for anything else; never raises.
    pub fn to_bool32(&self) -> Option<u32> {
        let items = self.as_list()?;
        if items.len() != BOOL32_SIZE {
            return None;
        }
        let mut word = 0u32;
        for (i, item) in items.iter().enumerate() {
            if item.as_bool()? {
                word |= 1 << i;
            }
        }
        Some(word)
    }

    /// Unpacks a word into a list of 32 booleans, bit `i` to element `i`.
    pub fn from_bool32(word: u32) -> Value {
        Value::list((0..BOOL32_SIZE).map(|i| Value::Bool(word & (1 << i) != 0)))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Reactive(a), Value::Reactive(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", n),
            Value::Bool(true) => f.write_str("#true"),
            Value::Bool(false) => f.write_str("#false"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Reactive(r) => write!(f, "{}", r),
        }
    }
}
