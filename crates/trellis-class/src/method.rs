//! Callable members: method tags, native bodies, and receiver binding
//!
//! A [`Method`] is a native Rust closure plus two pieces of metadata: an
//! optional [`MethodTag`] recording the name it was declared under and the
//! template that owns the declaration (what super-dispatch walks from), and
//! an optional fixed receiver installed by `bind`.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::dispatch::Call;
use crate::error::{ClassError, ClassResult};
use crate::instance::{Instance, InstanceInner};
use crate::template::Template;
use crate::value::Value;

/// Native body of a class method
pub type NativeFn = Rc<dyn Fn(&Call<'_>) -> ClassResult<Value>>;

/// Identity of a declared method: its name and the template that declared it.
///
/// Inherited (non-overridden) methods keep the tag of the template that
/// originally defined them, so super-dispatch always starts from the true
/// definition site rather than from the receiver's own class.
#[derive(Clone)]
pub struct MethodTag {
    name: Rc<str>,
    owner: Weak<Template>,
}

impl MethodTag {
    pub(crate) fn new(name: Rc<str>, owner: Weak<Template>) -> MethodTag {
        MethodTag { name, owner }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_rc(&self) -> Rc<str> {
        self.name.clone()
    }

    /// The declaring template, if it is still alive
    pub(crate) fn owner(&self) -> Option<Rc<Template>> {
        self.owner.upgrade()
    }
}

/// Fixed receiver of a bound method.
///
/// The copy handed back to the caller owns its instance so a bare callback
/// keeps the receiver alive; the copy stored on the instance's own field map
/// holds it weakly, since a strong handle there would be an unreclaimable
/// `Rc` cycle through the instance's fields.
#[derive(Clone)]
enum Receiver {
    Owned(Instance),
    Stored(Weak<InstanceInner>),
}

impl Receiver {
    fn resolve(&self) -> ClassResult<Instance> {
        match self {
            Receiver::Owned(instance) => Ok(instance.clone()),
            Receiver::Stored(weak) => weak
                .upgrade()
                .map(Instance)
                .ok_or_else(|| ClassError::Raised("receiver of bound method was dropped".into())),
        }
    }
}

/// A callable member value
#[derive(Clone)]
pub struct Method {
    tag: Option<MethodTag>,
    func: NativeFn,
    receiver: Option<Receiver>,
}

impl Method {
    /// Wrap a native closure as an untagged, unbound method
    pub fn new(f: impl Fn(&Call<'_>) -> ClassResult<Value> + 'static) -> Method {
        Method {
            tag: None,
            func: Rc::new(f),
            receiver: None,
        }
    }

    pub fn tag(&self) -> Option<&MethodTag> {
        self.tag.as_ref()
    }

    /// A copy of this method carrying a fresh tag (declaration time)
    pub(crate) fn tagged(&self, name: Rc<str>, owner: Weak<Template>) -> Method {
        Method {
            tag: Some(MethodTag::new(name, owner)),
            func: self.func.clone(),
            receiver: self.receiver.clone(),
        }
    }

    /// A copy permanently bound to `instance`, owning it
    pub(crate) fn bound_owned(&self, instance: &Instance) -> Method {
        Method {
            tag: self.tag.clone(),
            func: self.func.clone(),
            receiver: Some(Receiver::Owned(instance.clone())),
        }
    }

    /// A copy permanently bound to `instance`, holding it weakly
    pub(crate) fn bound_stored(&self, instance: &Instance) -> Method {
        Method {
            tag: self.tag.clone(),
            func: self.func.clone(),
            receiver: Some(Receiver::Stored(Rc::downgrade(&instance.0))),
        }
    }

    /// Invoke with an explicit receiver. A receiver fixed by `bind` wins over
    /// the one supplied at the call site.
    pub fn invoke(&self, this: Option<&Instance>, args: &[Value]) -> ClassResult<Value> {
        let this = match &self.receiver {
            Some(receiver) => receiver.resolve()?,
            None => match this {
                Some(this) => this.clone(),
                None => {
                    return Err(ClassError::Raised(
                        "method invoked without a receiver".into(),
                    ))
                }
            },
        };
        let call = Call::new(&this, self, args);
        (self.func)(&call)
    }

    /// Invoke a bound method with no receiver at the call site, the way an
    /// event system fires a registered handler.
    pub fn call_bound(&self, args: &[Value]) -> ClassResult<Value> {
        self.invoke(None, args)
    }

    /// Identity comparison: same body and same fixed receiver
    pub(crate) fn ptr_eq(&self, other: &Method) -> bool {
        if !Rc::ptr_eq(&self.func, &other.func) {
            return false;
        }
        match (&self.receiver, &other.receiver) {
            (None, None) => true,
            (Some(a), Some(b)) => match (a.resolve(), b.resolve()) {
                (Ok(a), Ok(b)) => a.ptr_eq(&b),
                _ => false,
            },
            _ => false,
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "[method {}]", tag.name()),
            None => write!(f, "[function]"),
        }
    }
}
