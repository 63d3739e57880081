//! Collaborator traits for the model layer under test.
//!
//! modelspec never runs validations or touches storage itself; everything a
//! generated case observes goes through these seams. The object-relational
//! layer adapts its classes and instances to `ModelClass` / `ModelInstance`,
//! and the checks stay generic over attribute and association names.

use std::collections::HashMap;
use std::rc::Rc;

use crate::reflect::Association;
use crate::value::Value;

/// Dynamic attribute access by name.
///
/// This is a capability, not reflection: implementors decide which names
/// exist. An unknown attribute name is a misconfigured suite, and
/// implementations are expected to panic with the offending name rather
/// than answer silently.
pub trait Attributes {
    /// Read the named attribute.
    fn get(&self, attribute: &str) -> Value;

    /// Assign the named attribute.
    fn set(&mut self, attribute: &str, value: Value);
}

/// Per-instance surface of the model collaborator.
pub trait ModelInstance: Attributes {
    /// Run validations and report whether the instance is valid.
    ///
    /// Takes `&mut self` because validation repopulates the error state
    /// read back through [`errors_on`](ModelInstance::errors_on).
    fn is_valid(&mut self) -> bool;

    /// Validate and persist. Returns whether the save went through.
    fn save(&mut self) -> bool;

    /// Mass-assignment update: assign the named attribute honoring the
    /// model's protection rules, then save. Protected attributes are
    /// skipped silently and the update still reports success.
    fn update(&mut self, attribute: &str, value: Value) -> bool;

    /// Error text recorded against one attribute by the last validation.
    fn errors_on(&self, attribute: &str) -> Vec<String>;

    /// Whole-record error sentences, for diagnostics.
    fn full_messages(&self) -> Vec<String>;
}

/// Per-class surface of the model collaborator.
pub trait ModelClass {
    /// The class name, as it appears in suite names and diagnostics.
    fn name(&self) -> &str;

    /// A fresh, unsaved instance with default attribute values.
    fn build(&self) -> Box<dyn ModelInstance>;

    /// The first persisted record, if any exist.
    fn find_first(&self) -> Option<Box<dyn ModelInstance>>;

    /// Declared relationship metadata for one association name.
    fn reflect_on_association(&self, association: &str) -> Option<Association>;
}

/// Resolves a class name to a live class handle.
pub trait ClassResolver {
    fn resolve(&self, class_name: &str) -> Option<Rc<dyn ModelClass>>;
}

/// Stock resolver backed by a name-to-class map.
#[derive(Default)]
pub struct ClassRegistry {
    classes: HashMap<String, Rc<dyn ModelClass>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        ClassRegistry {
            classes: HashMap::new(),
        }
    }

    /// Register a class under its own name.
    pub fn insert(&mut self, class: Rc<dyn ModelClass>) {
        self.classes.insert(class.name().to_string(), class);
    }
}

impl ClassResolver for ClassRegistry {
    fn resolve(&self, class_name: &str) -> Option<Rc<dyn ModelClass>> {
        self.classes.get(class_name).cloned()
    }
}

/// The subject class name for a suite: the suite name minus one trailing
/// `Test` token. A name without the suffix is passed through unchanged and
/// left to the resolver to reject.
pub(crate) fn subject_name(suite_name: &str) -> &str {
    suite_name.strip_suffix("Test").unwrap_or(suite_name)
}
