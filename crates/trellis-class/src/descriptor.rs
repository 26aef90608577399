//! Class descriptors: the member mapping handed to the factory
//!
//! A descriptor is an ordered name → value mapping with four reserved keys
//! (`extend`, `construct`, `destruct`, `toString`); the builder methods are
//! sugar that write plain entries into the same mapping. The member name
//! `bind` is always system-owned and is silently dropped at build time.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::class::Class;
use crate::dispatch::Call;
use crate::error::{ClassError, ClassResult};
use crate::instance::Instance;
use crate::method::Method;
use crate::template::Template;
use crate::value::Value;

/// The member mapping a class is declared from
#[derive(Default)]
pub struct ClassDescriptor {
    entries: Vec<(Rc<str>, Value)>,
}

/// Reserved keys pulled out of a descriptor, ready for template linking
#[derive(Debug)]
pub(crate) struct DescriptorParts {
    pub(crate) parent: Option<Class>,
    pub(crate) members: Vec<(Rc<str>, Value)>,
    pub(crate) construct: Option<Method>,
    pub(crate) destruct: Option<Method>,
    pub(crate) to_string: Option<Value>,
}

impl ClassDescriptor {
    pub fn new() -> ClassDescriptor {
        ClassDescriptor::default()
    }

    /// Sugar for a literal `toString` member
    pub fn name(self, name: &str) -> ClassDescriptor {
        self.field("toString", Value::from(name))
    }

    /// Declare the parent class (the `extend` reserved key)
    pub fn extend(self, parent: &Class) -> ClassDescriptor {
        self.field("extend", Value::Class(parent.clone()))
    }

    /// Declare the class's own constructor callback
    pub fn construct(
        self,
        f: impl Fn(&Call<'_>) -> ClassResult<Value> + 'static,
    ) -> ClassDescriptor {
        self.field("construct", Value::Method(Method::new(f)))
    }

    /// Declare the class's own destructor callback
    pub fn destruct(
        self,
        f: impl Fn(&Call<'_>) -> ClassResult<Value> + 'static,
    ) -> ClassDescriptor {
        self.field("destruct", Value::Method(Method::new(f)))
    }

    /// Declare a callable member
    pub fn method(
        self,
        name: &str,
        f: impl Fn(&Call<'_>) -> ClassResult<Value> + 'static,
    ) -> ClassDescriptor {
        self.field(name, Value::Method(Method::new(f)))
    }

    /// Write a raw entry into the mapping. Later entries win over earlier
    /// ones of the same name, reserved keys included.
    pub fn field(mut self, name: &str, value: Value) -> ClassDescriptor {
        self.entries.push((Rc::from(name), value));
        self
    }

    /// Split the mapping into reserved keys and ordinary members, enforcing
    /// the `extend` invariant.
    pub(crate) fn into_parts(self) -> ClassResult<DescriptorParts> {
        let mut mapping: FxHashMap<Rc<str>, Value> = FxHashMap::default();
        for (name, value) in self.entries {
            mapping.insert(name, value);
        }

        let to_string = mapping.remove("toString");

        let parent = match mapping.remove("extend") {
            None => None,
            Some(value) if !value.is_truthy() => {
                return Err(ClassError::NonTruthyExtend {
                    class: stringified_name(to_string.as_ref()),
                });
            }
            Some(Value::Class(parent)) => Some(parent),
            Some(other) => {
                return Err(ClassError::Raised(format!(
                    "{}: extend must name a class, got a {}",
                    stringified_name(to_string.as_ref()),
                    other.type_name()
                )));
            }
        };

        let construct = take_callback(&mut mapping, "construct", to_string.as_ref())?;
        let destruct = take_callback(&mut mapping, "destruct", to_string.as_ref())?;

        // `bind` is system-owned; a declared member of that name never
        // reaches the template.
        mapping.remove("bind");

        Ok(DescriptorParts {
            parent,
            members: mapping.into_iter().collect(),
            construct,
            destruct,
            to_string,
        })
    }
}

fn take_callback(
    mapping: &mut FxHashMap<Rc<str>, Value>,
    key: &str,
    to_string: Option<&Value>,
) -> ClassResult<Option<Method>> {
    match mapping.remove(key) {
        None => Ok(None),
        Some(Value::Method(method)) => Ok(Some(method)),
        Some(other) => Err(ClassError::Raised(format!(
            "{}: {} must be a function, got a {}",
            stringified_name(to_string),
            key,
            other.type_name()
        ))),
    }
}

/// Best-effort stringification of a descriptor's `toString` entry for error
/// messages raised before any template exists. A function entry is invoked
/// against a scratch instance; a body that needs real receiver state falls
/// back to `"Object"`.
fn stringified_name(to_string: Option<&Value>) -> String {
    match to_string {
        None => "Object".to_string(),
        Some(Value::Method(method)) => {
            let scratch = Instance::bare(Template::link(None, Vec::new(), None, None, None));
            match method.invoke(Some(&scratch), &[]) {
                Ok(value) => value.to_string(),
                Err(_) => "Object".to_string(),
            }
        }
        Some(literal) => literal.to_string(),
    }
}
