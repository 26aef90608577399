//! The class factory and generator handles
//!
//! [`build`] turns a descriptor into a [`Class`] — the generator callers
//! construct instances from and subclass via [`Class::extend`]. No global
//! registry exists: a declared class lives exactly as long as handles to it
//! (or to its subclasses and instances) do.

use std::fmt;
use std::rc::Rc;

use crate::descriptor::ClassDescriptor;
use crate::error::ClassResult;
use crate::instance::Instance;
use crate::template::Template;
use crate::value::Value;

pub(crate) struct ClassInner {
    pub(crate) template: Rc<Template>,
}

/// A generator: the handle a class declaration returns
#[derive(Clone)]
pub struct Class(pub(crate) Rc<ClassInner>);

/// Declare a class from a descriptor.
///
/// The descriptor's reserved keys are split out, the remaining members are
/// copied onto a fresh template linked to the parent's (or to the implicit
/// universal base, which declares no `construct` or `destruct`), and every
/// callable member is tagged with its name and the new template. Side
/// effects are confined to the new template/generator pair.
pub fn build(descriptor: ClassDescriptor) -> ClassResult<Class> {
    let parts = descriptor.into_parts()?;
    let parent = parts.parent.map(|class| class.0.template.clone());
    let template = Template::link(
        parent,
        parts.members,
        parts.construct,
        parts.destruct,
        parts.to_string,
    );
    let inner = Rc::new(ClassInner { template });
    inner.template.attach_generator(&inner);
    Ok(Class(inner))
}

impl Class {
    /// Declare a subclass: inserts `extend = self` into the descriptor
    /// mapping and delegates to [`build`].
    pub fn extend(&self, descriptor: ClassDescriptor) -> ClassResult<Class> {
        build(descriptor.field("extend", Value::Class(self.clone())))
    }

    /// Construct an instance: allocate it over the shared template, then run
    /// the composite constructor chain. With no arguments, an empty
    /// configuration map is synthesized for the constructors.
    pub fn create(&self, args: &[Value]) -> ClassResult<Instance> {
        let instance = Instance::bare(self.0.template.clone());
        instance.construct(args)?;
        Ok(instance)
    }

    /// The class's shared template
    pub fn template(&self) -> &Rc<Template> {
        &self.0.template
    }

    /// The class's `toString`, evaluated against a bare instance; `"Object"`
    /// when no class on the chain declares one
    pub fn display_name(&self) -> String {
        Instance::bare(self.0.template.clone()).display_name()
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Class) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[class {}]", self.display_name())
    }
}
