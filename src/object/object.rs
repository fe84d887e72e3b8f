use std::{
    fmt::{self, Debug, Display},
    rc::Rc,
};

use indexmap::IndexMap;

use crate::{
    ast::{expressions::IdentifierExpr, statements::BlockStmt},
    evaluator::evaluator::Evaluator,
};

use super::environment::Env;

pub const INTEGER_OBJ: &str = "INTEGER";
pub const BOOLEAN_OBJ: &str = "BOOLEAN";
pub const NULL_OBJ: &str = "NULL";
pub const RETURN_VALUE_OBJ: &str = "RETURN_VALUE";
pub const ERROR_OBJ: &str = "ERROR";
pub const FUNCTION_OBJ: &str = "FUNCTION";
pub const STRING_OBJ: &str = "STRING";
pub const BUILTIN_OBJ: &str = "BUILTIN";
pub const ARRAY_OBJ: &str = "ARRAY";
pub const HASH_OBJ: &str = "HASH";

thread_local! {
    static TRUE: Object = Object::new(ObjectKind::Boolean(true));
    static FALSE: Object = Object::new(ObjectKind::Boolean(false));
    static NULL: Object = Object::new(ObjectKind::Null);
}

pub type BuiltinFunction = fn(&Evaluator, Vec<Object>) -> Object;

/// A runtime value.
///
/// Cloning is cheap and shares the underlying value. `true`, `false` and
/// `null` are singletons, so [`Object::is`] can compare them by identity.
#[derive(Clone)]
pub struct Object(Rc<ObjectKind>);

pub enum ObjectKind {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Object>),
    Hash(IndexMap<HashKey, HashPair>),
    Function(Function),
    Builtin(Builtin),
    Error(String),
    /// Carries a `return` out of nested blocks up to the enclosing call.
    ReturnValue(Object),
}

/// A user-defined function together with the environment it closes over.
pub struct Function {
    pub parameters: Vec<IdentifierExpr>,
    pub body: Rc<BlockStmt>,
    pub env: Env,
}

pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFunction,
}

/// A hash entry keeps the original key object for display.
#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Identity of a hashable value: its type tag plus its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub object_type: &'static str,
    pub value: String,
}

impl Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.object_type, self.value)
    }
}

impl Object {
    fn new(kind: ObjectKind) -> Self {
        Object(Rc::new(kind))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(ObjectKind::Integer(value))
    }

    pub fn boolean(value: bool) -> Self {
        if value {
            TRUE.with(Object::clone)
        } else {
            FALSE.with(Object::clone)
        }
    }

    pub fn null() -> Self {
        NULL.with(Object::clone)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ObjectKind::String(value.into()))
    }

    pub fn array(elements: Vec<Object>) -> Self {
        Self::new(ObjectKind::Array(elements))
    }

    pub fn hash(pairs: IndexMap<HashKey, HashPair>) -> Self {
        Self::new(ObjectKind::Hash(pairs))
    }

    pub fn function(parameters: Vec<IdentifierExpr>, body: Rc<BlockStmt>, env: Env) -> Self {
        Self::new(ObjectKind::Function(Function {
            parameters,
            body,
            env,
        }))
    }

    pub fn builtin(name: &'static str, func: BuiltinFunction) -> Self {
        Self::new(ObjectKind::Builtin(Builtin { name, func }))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ObjectKind::Error(message.into()))
    }

    pub fn return_value(value: Object) -> Self {
        Self::new(ObjectKind::ReturnValue(value))
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.0
    }

    /// Identity comparison: true only for two handles to the same value.
    pub fn is(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn object_type(&self) -> &'static str {
        match self.kind() {
            ObjectKind::Integer(_) => INTEGER_OBJ,
            ObjectKind::Boolean(_) => BOOLEAN_OBJ,
            ObjectKind::String(_) => STRING_OBJ,
            ObjectKind::Null => NULL_OBJ,
            ObjectKind::Array(_) => ARRAY_OBJ,
            ObjectKind::Hash(_) => HASH_OBJ,
            ObjectKind::Function(_) => FUNCTION_OBJ,
            ObjectKind::Builtin(_) => BUILTIN_OBJ,
            ObjectKind::Error(_) => ERROR_OBJ,
            ObjectKind::ReturnValue(_) => RETURN_VALUE_OBJ,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind(), ObjectKind::Error(_))
    }

    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !(self.is(&Object::null()) || self.is(&Object::boolean(false)))
    }

    /// Returns the key this value indexes a hash with, or `None` if the
    /// value is not hashable.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self.kind() {
            ObjectKind::Integer(_) | ObjectKind::Boolean(_) | ObjectKind::String(_) => {
                Some(HashKey {
                    object_type: self.object_type(),
                    value: self.inspect(),
                })
            }
            _ => None,
        }
    }

    /// The display form printed by the REPL.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ObjectKind::Integer(value) => write!(f, "{}", value),
            ObjectKind::Boolean(value) => write!(f, "{}", value),
            ObjectKind::String(value) => write!(f, "{}", value),
            ObjectKind::Null => write!(f, "null"),
            ObjectKind::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            ObjectKind::Hash(pairs) => {
                write!(f, "{{")?;
                for (i, pair) in pairs.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            ObjectKind::Function(function) => {
                write!(f, "fn(")?;
                for (i, parameter) in function.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, ") {{\n{}\n}}", function.body)
            }
            ObjectKind::Builtin(_) => write!(f, "builtin function"),
            ObjectKind::Error(message) => write!(f, "ERROR: {}", message),
            ObjectKind::ReturnValue(value) => write!(f, "{}", value),
        }
    }
}

// Functions print without their environment, which may refer back to them.
impl Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.object_type(), self)
    }
}
