//! Templates: the shared, chain-linked definition objects
//!
//! One [`Template`] exists per declared class and is immutable after
//! creation. Member lookup that misses locally falls through to the parent
//! template, transitively — delegation, not copying, so every instance of
//! every descendant class reads the same definition objects.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::class::{Class, ClassInner};
use crate::error::ClassResult;
use crate::instance::Instance;
use crate::method::Method;
use crate::value::Value;

/// The shared definition object of a class
pub struct Template {
    members: FxHashMap<Rc<str>, Value>,
    parent: Option<Rc<Template>>,
    construct: Option<Method>,
    destruct: Option<Method>,
    to_string: Option<Method>,
    generator: RefCell<Weak<ClassInner>>,
}

impl Template {
    /// Build a template linked to `parent` and tag every declared callable
    /// with its name and this template as owner.
    ///
    /// `to_string` is resolved here: a method value is retagged to this
    /// template; any other value is wrapped in a generated method returning
    /// its stringified form; when absent, the parent's own resolved callback
    /// is carried over.
    pub(crate) fn link(
        parent: Option<Rc<Template>>,
        members: Vec<(Rc<str>, Value)>,
        construct: Option<Method>,
        destruct: Option<Method>,
        to_string: Option<Value>,
    ) -> Rc<Template> {
        Rc::new_cyclic(|weak: &Weak<Template>| {
            let mut tagged = FxHashMap::default();
            for (name, value) in members {
                let value = match value {
                    Value::Method(m) => Value::Method(m.tagged(name.clone(), weak.clone())),
                    other => other,
                };
                tagged.insert(name, value);
            }

            let construct = construct.map(|m| m.tagged(Rc::from("construct"), weak.clone()));
            let destruct = destruct.map(|m| m.tagged(Rc::from("destruct"), weak.clone()));

            let to_string = match to_string {
                Some(Value::Method(m)) => Some(m.tagged(Rc::from("toString"), weak.clone())),
                Some(literal) => {
                    let text: Rc<str> = Rc::from(literal.to_string().as_str());
                    let wrapped = Method::new(move |_| Ok(Value::Str(text.clone())));
                    Some(wrapped.tagged(Rc::from("toString"), weak.clone()))
                }
                None => parent.as_ref().and_then(|p| p.to_string.clone()),
            };

            Template {
                members: tagged,
                parent,
                construct,
                destruct,
                to_string,
                generator: RefCell::new(Weak::new()),
            }
        })
    }

    pub fn parent(&self) -> Option<&Rc<Template>> {
        self.parent.as_ref()
    }

    /// Member lookup through the delegation chain
    pub fn member(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.local_member(name) {
            return Some(value);
        }
        self.parent.as_ref().and_then(|p| p.member(name))
    }

    /// Member lookup on this template only. The lifecycle callbacks count as
    /// local members so super-dispatch can resolve `construct`, `destruct`
    /// and `toString` overrides.
    pub(crate) fn local_member(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.members.get(name) {
            return Some(value.clone());
        }
        match name {
            "construct" => self.construct.clone().map(Value::Method),
            "destruct" => self.destruct.clone().map(Value::Method),
            "toString" => self.to_string.clone().map(Value::Method),
            _ => None,
        }
    }

    /// The resolved `toString` callback, if any class on the chain declared one
    pub(crate) fn display_callback(&self) -> Option<&Method> {
        self.to_string.as_ref()
    }

    /// Run the composite constructor chain: every ancestor's callback first,
    /// strictly base-to-derived, then this class's own. An error from any
    /// callback aborts construction and propagates unmodified.
    pub(crate) fn run_construct(&self, instance: &Instance, args: &[Value]) -> ClassResult<()> {
        if let Some(parent) = &self.parent {
            parent.run_construct(instance, args)?;
        }
        if let Some(callback) = &self.construct {
            callback.invoke(Some(instance), args)?;
        }
        Ok(())
    }

    /// Run the composite destructor chain: this class's own callback first,
    /// then the ancestors', derived-to-base.
    pub(crate) fn run_destruct(&self, instance: &Instance) -> ClassResult<()> {
        if let Some(callback) = &self.destruct {
            callback.invoke(Some(instance), &[])?;
        }
        if let Some(parent) = &self.parent {
            parent.run_destruct(instance)?;
        }
        Ok(())
    }

    pub(crate) fn attach_generator(&self, class: &Rc<ClassInner>) {
        *self.generator.borrow_mut() = Rc::downgrade(class);
    }

    /// The generator this template was built for, if it is still alive
    pub fn generator(&self) -> Option<Class> {
        self.generator.borrow().upgrade().map(Class)
    }
}
