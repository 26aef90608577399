//! trellis-class — the object runtime every Trellis widget is built from
//!
//! A small single-inheritance class system with name-based dynamic dispatch,
//! implemented with explicit data structures rather than any host-language
//! delegation primitive:
//!
//! * [`build`] turns a [`ClassDescriptor`] into a [`Class`] (a generator);
//!   [`Class::extend`] declares subclasses.
//! * Each class owns one immutable [`Template`](template::Template); member
//!   lookup walks explicit parent links (delegation, not copying).
//! * Constructing an instance runs every ancestor constructor callback
//!   base-to-derived; [`Instance::destruct`] runs destructors
//!   derived-to-base.
//! * Every declared method is tagged with its name and owning template;
//!   [`Call::inherited`] uses the tag to invoke the nearest ancestor
//!   override.
//! * [`Instance::bind`] fixes a method's receiver so it can be registered
//!   as a bare callback.
//!
//! ```
//! use trellis_class::{build, ClassDescriptor, Value};
//!
//! let widget = build(
//!     ClassDescriptor::new()
//!         .name("Widget")
//!         .construct(|call| {
//!             call.this().set("visible", Value::Bool(false));
//!             Ok(Value::Null)
//!         })
//!         .method("show", |call| {
//!             call.this().set("visible", Value::Bool(true));
//!             Ok(Value::Null)
//!         }),
//! )?;
//!
//! let modal = widget.extend(ClassDescriptor::new().name("Modal"))?;
//! let instance = modal.create(&[])?;
//! instance.call("show", &[])?;
//! assert_eq!(instance.get("visible"), Some(Value::Bool(true)));
//! # Ok::<(), trellis_class::ClassError>(())
//! ```

pub mod class;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod instance;
pub mod method;
pub mod template;
pub mod value;

pub use class::{build, Class};
pub use descriptor::ClassDescriptor;
pub use dispatch::Call;
pub use error::{ClassError, ClassResult};
pub use instance::Instance;
pub use method::{Method, MethodTag, NativeFn};
pub use value::Value;
