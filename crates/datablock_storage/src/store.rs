//! The scene store: slot-allocated objects with a name index.
//!
//! The store is the process-wide mutable database the access layer talks
//! to. Objects are addressed by generational [`ObjectId`]s; display names
//! are unique and reusable, so they are only ever a lookup hint. Scans
//! iterate in name order for deterministic results.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::cell::RefCell;
use std::rc::Rc;

use im::{OrdMap, OrdSet};
use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use datablock_foundation::{
    AttributeData, AttributeDomain, AttributeMeta, ElementType, Error, IdentityTag, ObjectId,
    Result,
};

use crate::modifier::{ModifierValue, NodeModifier};
use crate::object::{DataBlock, SceneObject, StoredAttribute};

/// Shared handle to a scene store.
///
/// The store assumes a single logical thread of control; `Rc<RefCell<_>>`
/// gives handles and arrays shared access without locking.
pub type SharedStore = Rc<RefCell<SceneStore>>;

/// Name of the collection every store starts with.
pub const SCENE_COLLECTION: &str = "Scene";

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Slot {
    /// Even generations are free, odd generations are alive.
    generation: u32,
    object: Option<SceneObject>,
    /// Creation sequence number, for newest-object queries.
    created: u64,
}

/// Mutable database of scene objects.
///
/// Slots are reused through a free list; generations detect stale ids.
/// All attribute writes are validated before any mutation, so a rejected
/// write leaves the store untouched.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneStore {
    slots: Vec<Slot>,
    free_list: Vec<u64>,
    names: OrdMap<String, ObjectId>,
    collections: OrdMap<String, OrdSet<ObjectId>>,
    created_counter: u64,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Creates an empty store with the default scene collection.
    #[must_use]
    pub fn new() -> Self {
        let mut collections = OrdMap::new();
        collections.insert(SCENE_COLLECTION.to_string(), OrdSet::new());
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            names: OrdMap::new(),
            collections,
            created_counter: 0,
        }
    }

    /// Creates an empty store wrapped in a shared handle.
    #[must_use]
    pub fn shared() -> SharedStore {
        Rc::new(RefCell::new(Self::new()))
    }

    // ----- objects ---------------------------------------------------------

    /// Inserts a new object, deduplicating its name if taken.
    ///
    /// Returns the id of the inserted object; the name actually assigned
    /// is readable through [`SceneStore::get`].
    pub fn insert_object(&mut self, name: &str, data: DataBlock) -> ObjectId {
        let assigned = unique_name(|candidate| self.names.contains_key(candidate), name);
        if assigned != name {
            debug!("object name {name:?} taken, assigned {assigned:?}");
        }

        self.created_counter += 1;
        let object = SceneObject::new(assigned.clone(), data);

        let id = if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            // Reuse a freed slot (was even/free, now odd/alive)
            self.slots[idx].generation += 1;
            self.slots[idx].object = Some(object);
            self.slots[idx].created = self.created_counter;
            ObjectId::new(index, self.slots[idx].generation)
        } else {
            let index = self.slots.len() as u64;
            self.slots.push(Slot {
                generation: 1,
                object: Some(object),
                created: self.created_counter,
            });
            ObjectId::new(index, 1)
        };

        self.names.insert(assigned, id);
        id
    }

    /// Removes an object, freeing its slot and unlinking it everywhere.
    ///
    /// Returns `Err` if the id is stale or was never allocated.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<()> {
        self.validate(id)?;

        let idx = id.index as usize;
        let Some(object) = self.slots[idx].object.take() else {
            return Err(Error::object_not_found(id));
        };
        // Was odd/alive, now even/free
        self.slots[idx].generation += 1;
        self.free_list.push(id.index);
        self.names.remove(object.name());

        let collection_names: Vec<String> = self.collections.keys().cloned().collect();
        for name in collection_names {
            if let Some(members) = self.collections.get_mut(&name) {
                members.remove(&id);
            }
        }
        Ok(())
    }

    /// Validates that an id names a live object.
    pub fn validate(&self, id: ObjectId) -> Result<()> {
        let idx = id.index as usize;

        if idx >= self.slots.len() {
            return Err(Error::object_not_found(id));
        }

        let current = self.slots[idx].generation;

        if current != id.generation {
            // Generation mismatch - object was removed and possibly reused
            return Err(Error::stale_object(id));
        }

        if current % 2 == 0 {
            // Even generation means the slot is free
            return Err(Error::object_not_found(id));
        }

        Ok(())
    }

    /// Checks if an id names a live object.
    #[must_use]
    pub fn exists(&self, id: ObjectId) -> bool {
        self.validate(id).is_ok()
    }

    /// Returns a live object by id.
    pub fn get(&self, id: ObjectId) -> Result<&SceneObject> {
        self.validate(id)?;
        self.slots[id.index as usize]
            .object
            .as_ref()
            .ok_or_else(|| Error::object_not_found(id))
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.validate(id)?;
        self.slots[id.index as usize]
            .object
            .as_mut()
            .ok_or_else(|| Error::object_not_found(id))
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Looks an object up by display name.
    pub fn find_by_name(&self, name: &str) -> Result<ObjectId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| Error::name_not_found(name))
    }

    /// Iterates over all live objects in name order.
    pub fn scan_all(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.names
            .iter()
            .filter_map(|(_, id)| self.get(*id).ok().map(|object| (*id, object)))
    }

    /// Renames an object, deduplicating the new name if taken.
    ///
    /// Returns the name actually assigned. Renaming to the current name
    /// is a no-op.
    pub fn rename(&mut self, id: ObjectId, new_name: &str) -> Result<String> {
        self.validate(id)?;
        let current = self.get(id)?.name().to_string();
        if current == new_name {
            return Ok(current);
        }

        let assigned = unique_name(|candidate| self.names.contains_key(candidate), new_name);
        if assigned != new_name {
            debug!("object name {new_name:?} taken, assigned {assigned:?}");
        }

        self.names.remove(&current);
        self.names.insert(assigned.clone(), id);
        self.object_mut(id)?.set_name(assigned.clone());
        Ok(assigned)
    }

    /// Creation sequence number of an object (higher is newer).
    pub fn creation_index(&self, id: ObjectId) -> Result<u64> {
        self.validate(id)?;
        Ok(self.slots[id.index as usize].created)
    }

    /// Snapshot of all live ids.
    #[must_use]
    pub fn live_ids(&self) -> OrdSet<ObjectId> {
        self.names.values().copied().collect()
    }

    // ----- identity tags ---------------------------------------------------

    /// Returns the identity tag stamped onto an object, if any.
    pub fn identity_tag(&self, id: ObjectId) -> Result<Option<&IdentityTag>> {
        Ok(self.get(id)?.identity_tag())
    }

    /// Stamps an identity tag onto an object.
    ///
    /// Stamping the tag an object already carries is a no-op; a different
    /// tag replaces the old one.
    pub fn set_identity_tag(&mut self, id: ObjectId, tag: &IdentityTag) -> Result<()> {
        let object = self.object_mut(id)?;
        if object.identity_tag() == Some(tag) {
            return Ok(());
        }
        object.set_identity_tag(tag.clone());
        trace!("stamped identity tag {tag} onto {id:?}");
        Ok(())
    }

    // ----- attributes ------------------------------------------------------

    /// Reads an attribute's payload and metadata as a materialized copy.
    pub fn read_attribute(
        &self,
        id: ObjectId,
        name: &str,
    ) -> Result<(AttributeData, AttributeMeta)> {
        let object = self.get(id)?;
        let stored = object
            .data()
            .attribute(name)
            .ok_or_else(|| Error::attribute_missing(name))?;
        Ok((stored.data.clone(), stored.meta))
    }

    /// Writes an attribute, creating or replacing it.
    ///
    /// Validation precedes any mutation: the payload family must match
    /// the element type, the payload length must be divisible by the
    /// element width, the domain must be defined by the object's
    /// geometry, and the row count must equal the domain's element count.
    pub fn write_attribute(
        &mut self,
        id: ObjectId,
        name: &str,
        data: AttributeData,
        element_type: ElementType,
        domain: AttributeDomain,
    ) -> Result<()> {
        self.validate(id)?;

        if data.family() != element_type.family() {
            return Err(Error::store_write(
                name,
                format!(
                    "{} payload cannot store {element_type:?} elements",
                    data.family()
                ),
            ));
        }

        let width = element_type.width();
        let Some(rows) = data.row_count(width) else {
            return Err(Error::store_write(
                name,
                format!(
                    "payload of {} values is not divisible by element width {width}",
                    data.len()
                ),
            ));
        };

        let block = self.get(id)?.data();
        let Some(expected) = block.domain_len(domain) else {
            return Err(Error::store_write(
                name,
                format!(
                    "domain {domain} undefined for {}",
                    block.geometry().kind_name()
                ),
            ));
        };
        if rows != expected {
            return Err(Error::row_count_mismatch(name, expected, rows));
        }

        let meta = AttributeMeta::new(element_type, domain);
        self.object_mut(id)?
            .data_mut()
            .insert_attribute(name, StoredAttribute::new(meta, data));
        trace!("wrote attribute {name:?} ({rows} rows, width {width}) on {id:?}");
        Ok(())
    }

    /// Stores an attribute under `name`, or under a fresh deduplicated
    /// name when `overwrite` is false and `name` is taken.
    ///
    /// Returns the name actually used.
    pub fn store_attribute(
        &mut self,
        id: ObjectId,
        name: &str,
        data: AttributeData,
        element_type: ElementType,
        domain: AttributeDomain,
        overwrite: bool,
    ) -> Result<String> {
        self.validate(id)?;

        let assigned = if overwrite {
            name.to_string()
        } else {
            let block = self.get(id)?.data();
            unique_name(|candidate| block.has_attribute(candidate), name)
        };
        self.write_attribute(id, &assigned, data, element_type, domain)?;
        Ok(assigned)
    }

    /// Removes an attribute.
    pub fn remove_attribute(&mut self, id: ObjectId, name: &str) -> Result<()> {
        self.object_mut(id)?
            .data_mut()
            .remove_attribute(name)
            .map(|_| ())
            .ok_or_else(|| Error::attribute_missing(name))
    }

    /// Attribute names on an object, in name order.
    pub fn attribute_names(&self, id: ObjectId, skip_hidden: bool) -> Result<Vec<String>> {
        Ok(self.get(id)?.data().attribute_names(skip_hidden))
    }

    /// Returns true if the object has an attribute with this name.
    pub fn has_attribute(&self, id: ObjectId, name: &str) -> Result<bool> {
        Ok(self.get(id)?.data().has_attribute(name))
    }

    /// Element count of a domain on an object's geometry.
    pub fn domain_len(&self, id: ObjectId, domain: AttributeDomain) -> Result<Option<usize>> {
        Ok(self.get(id)?.data().domain_len(domain))
    }

    // ----- collections -----------------------------------------------------

    /// Creates a collection, deduplicating its name if taken.
    ///
    /// Returns the name actually assigned.
    pub fn create_collection(&mut self, name: &str) -> String {
        let assigned = unique_name(|candidate| self.collections.contains_key(candidate), name);
        self.collections.insert(assigned.clone(), OrdSet::new());
        assigned
    }

    /// Returns true if a collection with this name exists.
    #[must_use]
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Links an object into a collection, creating the collection on
    /// first use.
    pub fn link(&mut self, collection: &str, id: ObjectId) -> Result<()> {
        self.validate(id)?;
        if !self.collections.contains_key(collection) {
            debug!("creating collection {collection:?} on first link");
            self.collections.insert(collection.to_string(), OrdSet::new());
        }
        if let Some(members) = self.collections.get_mut(collection) {
            members.insert(id);
        }
        Ok(())
    }

    /// Unlinks an object from a collection.
    pub fn unlink(&mut self, collection: &str, id: ObjectId) -> Result<()> {
        self.validate(id)?;
        let Some(members) = self.collections.get_mut(collection) else {
            return Err(Error::name_not_found(collection));
        };
        members.remove(&id);
        Ok(())
    }

    /// Ids linked into a collection, in id order.
    pub fn collection_objects(&self, name: &str) -> Result<Vec<ObjectId>> {
        self.collections
            .get(name)
            .map(|members| members.iter().copied().collect())
            .ok_or_else(|| Error::name_not_found(name))
    }

    /// All collection names, in name order.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    // ----- modifiers -------------------------------------------------------

    /// Adds a modifier to an object, deduplicating its name within the
    /// object's stack.
    ///
    /// Returns the name actually assigned.
    pub fn add_modifier(&mut self, id: ObjectId, name: &str) -> Result<String> {
        self.validate(id)?;
        let assigned = {
            let object = self.get(id)?;
            unique_name(
                |candidate| object.modifiers().iter().any(|m| m.name() == candidate),
                name,
            )
        };
        self.object_mut(id)?
            .modifiers_mut()
            .push(NodeModifier::new(assigned.clone()));
        Ok(assigned)
    }

    fn modifier_ref(&self, id: ObjectId, modifier: &str) -> Result<&NodeModifier> {
        self.get(id)?
            .modifiers()
            .iter()
            .find(|m| m.name() == modifier)
            .ok_or_else(|| Error::modifier_not_found(modifier))
    }

    /// Reads one modifier input value.
    pub fn modifier_input(&self, id: ObjectId, modifier: &str, key: &str) -> Result<ModifierValue> {
        Ok(self.modifier_ref(id, modifier)?.input(key)?.clone())
    }

    /// Sets one modifier input value, creating the key if absent.
    pub fn set_modifier_input(
        &mut self,
        id: ObjectId,
        modifier: &str,
        key: &str,
        value: impl Into<ModifierValue>,
    ) -> Result<()> {
        let object = self.object_mut(id)?;
        let Some(found) = object
            .modifiers_mut()
            .iter_mut()
            .find(|m| m.name() == modifier)
        else {
            return Err(Error::modifier_not_found(modifier));
        };
        found.set_input(key, value);
        Ok(())
    }

    /// Modifier names on an object, in stack order.
    pub fn modifier_names(&self, id: ObjectId) -> Result<Vec<String>> {
        Ok(self
            .get(id)?
            .modifiers()
            .iter()
            .map(|m| m.name().to_string())
            .collect())
    }

    /// Input keys of one modifier, in name order.
    pub fn modifier_input_keys(&self, id: ObjectId, modifier: &str) -> Result<Vec<String>> {
        Ok(self.modifier_ref(id, modifier)?.input_keys())
    }
}

/// Resolves a requested name against taken names, appending `.001`-style
/// suffixes until free.
fn unique_name(taken: impl Fn(&str) -> bool, want: &str) -> String {
    if !taken(want) {
        return want.to_string();
    }
    let mut counter = 1u32;
    loop {
        let candidate = format!("{want}.{counter:03}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
