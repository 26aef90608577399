//! Instances: per-construction objects delegating to a shared template

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::class::Class;
use crate::error::{ClassError, ClassResult};
use crate::method::Method;
use crate::template::Template;
use crate::value::Value;

pub(crate) struct InstanceInner {
    pub(crate) template: Rc<Template>,
    pub(crate) fields: RefCell<FxHashMap<Rc<str>, Value>>,
}

/// A constructed object.
///
/// Owns its field map; shares (never owns) its template. Cloning is cheap
/// and yields another handle to the same object. `destruct()` is an explicit
/// caller-invoked lifecycle hook, not automatic collection.
#[derive(Clone)]
pub struct Instance(pub(crate) Rc<InstanceInner>);

impl Instance {
    /// Allocate an instance without running any constructor
    pub(crate) fn bare(template: Rc<Template>) -> Instance {
        Instance(Rc::new(InstanceInner {
            template,
            fields: RefCell::new(FxHashMap::default()),
        }))
    }

    pub fn template(&self) -> &Rc<Template> {
        &self.0.template
    }

    /// The generator that declared this instance's class
    pub fn class(&self) -> Option<Class> {
        self.0.template.generator()
    }

    /// Member lookup: own fields first, then the template delegation chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.0.fields.borrow().get(name) {
            return Some(value.clone());
        }
        self.0.template.member(name)
    }

    /// Set an instance field, shadowing any template member of the same name
    pub fn set(&self, name: &str, value: Value) {
        self.0.fields.borrow_mut().insert(Rc::from(name), value);
    }

    /// Look up and invoke a callable member
    pub fn call(&self, name: &str, args: &[Value]) -> ClassResult<Value> {
        match self.get(name) {
            Some(Value::Method(method)) => method.invoke(Some(self), args),
            Some(other) => Err(ClassError::Raised(format!(
                "member {} of {} is a {}, not a method",
                name,
                self.display_name(),
                other.type_name()
            ))),
            None => Err(ClassError::Raised(format!(
                "{} has no member {}",
                self.display_name(),
                name
            ))),
        }
    }

    /// Run the composite constructor chain, base-to-derived. When called
    /// with no arguments an empty configuration map is synthesized, so
    /// constructor bodies may always assume at least one argument.
    pub fn construct(&self, args: &[Value]) -> ClassResult<()> {
        if args.is_empty() {
            self.0.template.run_construct(self, &[Value::map()])
        } else {
            self.0.template.run_construct(self, args)
        }
    }

    /// Run the composite destructor chain, derived-to-base
    pub fn destruct(&self) -> ClassResult<()> {
        self.0.template.run_destruct(self)
    }

    /// Produce a copy of `method` permanently bound to this instance.
    ///
    /// `method` must be a tagged method from this instance's template chain.
    /// The bound copy is stored back under the method's declared name, so
    /// subsequent member access returns the bound version, and is returned
    /// for registration elsewhere (the returned copy keeps the instance
    /// alive while it exists).
    pub fn bind(&self, method: &Method) -> ClassResult<Method> {
        let tag = method.tag().ok_or_else(|| ClassError::MissingCallee {
            instance: self.display_name(),
        })?;
        let name = tag.name_rc();
        let stored = method.bound_stored(self);
        self.0.fields.borrow_mut().insert(name, Value::Method(stored));
        Ok(method.bound_owned(self))
    }

    /// The instance's display name: the resolved `toString` callback invoked
    /// on this receiver, falling back to `"Object"` when no class on the
    /// chain declares one (or the callback itself fails — the display name
    /// feeds error messages and must be infallible).
    pub fn display_name(&self) -> String {
        let callback = match self.0.template.display_callback() {
            Some(callback) => callback.clone(),
            None => return "Object".to_string(),
        };
        match callback.invoke(Some(self), &[]) {
            Ok(value) => value.to_string(),
            Err(_) => "Object".to_string(),
        }
    }

    pub(crate) fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[instance {}]", self.display_name())
    }
}
