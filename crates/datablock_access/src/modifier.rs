//! Handles onto modifiers in an object's stack.

use datablock_foundation::Result;
use datablock_storage::ModifierValue;

use crate::handle::ObjectHandle;

/// A handle onto one modifier of one object.
///
/// Carries the owning [`ObjectHandle`], so input access keeps working
/// after the object is renamed.
#[derive(Clone, Debug)]
pub struct ModifierHandle {
    object: ObjectHandle,
    name: String,
}

impl ModifierHandle {
    pub(crate) fn new(object: ObjectHandle, name: String) -> Self {
        Self { object, name }
    }

    /// The modifier's name on the stack.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning object.
    #[must_use]
    pub fn object(&self) -> &ObjectHandle {
        &self.object
    }

    /// Reads one input value.
    pub fn get(&self, key: &str) -> Result<ModifierValue> {
        let id = self.object.resolve()?;
        self.object
            .store()
            .borrow()
            .modifier_input(id, &self.name, key)
    }

    /// Sets one input value, creating the key if absent.
    pub fn set(&self, key: &str, value: impl Into<ModifierValue>) -> Result<()> {
        let id = self.object.resolve()?;
        self.object
            .store()
            .borrow_mut()
            .set_modifier_input(id, &self.name, key, value)
    }

    /// Input keys, in name order.
    pub fn keys(&self) -> Result<Vec<String>> {
        let id = self.object.resolve()?;
        self.object
            .store()
            .borrow()
            .modifier_input_keys(id, &self.name)
    }
}
