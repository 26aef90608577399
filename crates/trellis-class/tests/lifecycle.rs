//! Constructor and destructor chaining tests.
//!
//! Construction runs every ancestor's constructor callback before the
//! declaring class's own, strictly base-to-derived, exactly once each;
//! destruction mirrors it derived-to-base. Chaining is automatic and
//! entirely separate from the `inherited()` super-call mechanism.

use std::cell::RefCell;
use std::rc::Rc;

use trellis_class::{build, ClassDescriptor, ClassError, Value};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn log_entry(log: &Log, entry: &'static str) {
    log.borrow_mut().push(entry);
}

// ============================================================================
// 1. Constructor ordering
// ============================================================================

#[test]
fn test_constructors_run_base_to_derived() {
    let log: Log = Rc::default();

    let base = {
        let log = log.clone();
        build(ClassDescriptor::new().construct(move |_| {
            log_entry(&log, "base");
            Ok(Value::Null)
        }))
        .unwrap()
    };
    let derived = {
        let log = log.clone();
        base.extend(ClassDescriptor::new().construct(move |_| {
            log_entry(&log, "derived");
            Ok(Value::Null)
        }))
        .unwrap()
    };

    derived.create(&[]).unwrap();
    assert_eq!(*log.borrow(), vec!["base", "derived"]);
}

#[test]
fn test_three_level_chain_runs_each_exactly_once() {
    let log: Log = Rc::default();

    let a = {
        let log = log.clone();
        build(ClassDescriptor::new().construct(move |_| {
            log_entry(&log, "a");
            Ok(Value::Null)
        }))
        .unwrap()
    };
    // b declares no constructor of its own; the chain skips it
    let b = a.extend(ClassDescriptor::new()).unwrap();
    let c = {
        let log = log.clone();
        b.extend(ClassDescriptor::new().construct(move |_| {
            log_entry(&log, "c");
            Ok(Value::Null)
        }))
        .unwrap()
    };

    c.create(&[]).unwrap();
    assert_eq!(*log.borrow(), vec!["a", "c"]);
}

#[test]
fn test_derived_constructor_sees_base_initialized_state() {
    // Base seeds a log list on the instance; Derived appends to it.
    let base = build(ClassDescriptor::new().name("Base").construct(|call| {
        call.this()
            .set("log", Value::list_of([Value::from("base")]));
        Ok(Value::Null)
    }))
    .unwrap();
    let derived = base
        .extend(ClassDescriptor::new().name("Derived").construct(|call| {
            let log = call.this().get("log").unwrap();
            log.as_list().unwrap().borrow_mut().push(Value::from("derived"));
            Ok(Value::Null)
        }))
        .unwrap();

    let instance = derived.create(&[]).unwrap();
    assert_eq!(
        instance.get("log").unwrap(),
        Value::list_of([Value::from("base"), Value::from("derived")])
    );
}

#[test]
fn test_constructor_error_aborts_construction() {
    let log: Log = Rc::default();

    let base = build(ClassDescriptor::new().construct(|_| Err("base failed".into()))).unwrap();
    let derived = {
        let log = log.clone();
        base.extend(ClassDescriptor::new().construct(move |_| {
            log_entry(&log, "derived");
            Ok(Value::Null)
        }))
        .unwrap()
    };

    let err = derived.create(&[]).unwrap_err();
    assert!(matches!(err, ClassError::Raised(_)));
    assert_eq!(err.to_string(), "base failed");
    // The descendant constructor never ran
    assert!(log.borrow().is_empty());
}

// ============================================================================
// 2. Configuration argument
// ============================================================================

#[test]
fn test_missing_options_are_synthesized() {
    let class = build(ClassDescriptor::new().construct(|call| {
        // Constructors may always assume at least one argument
        let options = call.arg(0);
        assert!(options.as_map().is_some());
        call.this().set("count", Value::Int(call.args().len() as i64));
        Ok(Value::Null)
    }))
    .unwrap();

    let instance = class.create(&[]).unwrap();
    assert_eq!(instance.get("count").unwrap(), Value::Int(1));
}

#[test]
fn test_options_reach_every_constructor_in_the_chain() {
    let options = Value::map();
    options
        .as_map()
        .unwrap()
        .borrow_mut()
        .insert(Rc::from("title"), Value::from("Settings"));

    let base = build(ClassDescriptor::new().construct(|call| {
        let title = call.arg(0).as_map().unwrap().borrow()["title"].clone();
        call.this().set("base_title", title);
        Ok(Value::Null)
    }))
    .unwrap();
    let derived = base
        .extend(ClassDescriptor::new().construct(|call| {
            let title = call.arg(0).as_map().unwrap().borrow()["title"].clone();
            call.this().set("derived_title", title);
            Ok(Value::Null)
        }))
        .unwrap();

    let instance = derived.create(&[options]).unwrap();
    assert_eq!(instance.get("base_title").unwrap(), Value::from("Settings"));
    assert_eq!(
        instance.get("derived_title").unwrap(),
        Value::from("Settings")
    );
}

// ============================================================================
// 3. Destructor ordering
// ============================================================================

#[test]
fn test_destructors_run_derived_to_base() {
    let log: Log = Rc::default();

    let base = {
        let log = log.clone();
        build(ClassDescriptor::new().destruct(move |_| {
            log_entry(&log, "base");
            Ok(Value::Null)
        }))
        .unwrap()
    };
    let derived = {
        let log = log.clone();
        base.extend(ClassDescriptor::new().destruct(move |_| {
            log_entry(&log, "derived");
            Ok(Value::Null)
        }))
        .unwrap()
    };

    let instance = derived.create(&[]).unwrap();
    assert!(log.borrow().is_empty());

    instance.destruct().unwrap();
    assert_eq!(*log.borrow(), vec!["derived", "base"]);
}

#[test]
fn test_destruct_without_callbacks_is_a_no_op() {
    let class = build(ClassDescriptor::new()).unwrap();
    let instance = class.create(&[]).unwrap();
    instance.destruct().unwrap();
}

#[test]
fn test_destruct_is_explicit_not_automatic() {
    let log: Log = Rc::default();

    let class = {
        let log = log.clone();
        build(ClassDescriptor::new().destruct(move |_| {
            log_entry(&log, "destructed");
            Ok(Value::Null)
        }))
        .unwrap()
    };

    {
        let _instance = class.create(&[]).unwrap();
        // dropped here without destruct()
    }
    assert!(log.borrow().is_empty());
}
