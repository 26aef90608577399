//! Per-invocation call frames and super-dispatch
//!
//! Every native method body receives a [`Call`] frame: the receiver, the
//! method object being executed, and the argument list. The frame is also
//! the capture handed to [`Call::inherited`] — super-dispatch resolves from
//! the executing method's tag, so resolution state never lives on the
//! instance and nested super-calls are naturally reentrancy-safe: the
//! ancestor body runs under its own frame, built from its own tag, and a
//! further `inherited()` from there walks one level higher, never back.

use crate::error::{ClassError, ClassResult};
use crate::instance::Instance;
use crate::method::Method;
use crate::value::Value;

/// The frame of a single method invocation
pub struct Call<'a> {
    this: &'a Instance,
    method: &'a Method,
    args: &'a [Value],
}

impl<'a> Call<'a> {
    pub(crate) fn new(this: &'a Instance, method: &'a Method, args: &'a [Value]) -> Call<'a> {
        Call { this, method, args }
    }

    /// The receiver of this invocation
    pub fn this(&self) -> &Instance {
        self.this
    }

    /// The full argument list
    pub fn args(&self) -> &[Value] {
        self.args
    }

    /// Argument by position; `Null` when absent
    pub fn arg(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or(Value::Null)
    }

    /// Invoke the nearest ancestor definition of the currently executing
    /// method, forwarding this frame's arguments.
    ///
    /// Resolution starts strictly above the template that owns the executing
    /// method's tag and walks parent links until some template locally
    /// defines a member of the same name. Both failure kinds are permanent
    /// programmer errors and are never retried:
    ///
    /// * the executing method carries no tag (it was attached dynamically
    ///   rather than declared through a descriptor) — [`ClassError::MissingCallee`]
    /// * no ancestor defines the member — [`ClassError::InheritedMethodNotFound`]
    pub fn inherited(&self) -> ClassResult<Value> {
        let tag = self.method.tag().ok_or_else(|| ClassError::MissingCallee {
            instance: self.this.display_name(),
        })?;

        let mut cursor = tag.owner().and_then(|owner| owner.parent().cloned());
        while let Some(template) = cursor {
            if let Some(member) = template.local_member(tag.name()) {
                return match member {
                    Value::Method(method) => method.invoke(Some(self.this), self.args),
                    other => Err(ClassError::Raised(format!(
                        "inherited member {} of {} is a {}, not a method",
                        tag.name(),
                        self.this.display_name(),
                        other.type_name()
                    ))),
                };
            }
            cursor = template.parent().cloned();
        }

        Err(ClassError::InheritedMethodNotFound {
            instance: self.this.display_name(),
            method: tag.name().to_string(),
        })
    }
}
