//! Scene objects and their data blocks.

use im::OrdMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use datablock_foundation::{AttributeData, AttributeDomain, AttributeMeta, IdentityTag};

use crate::geometry::Geometry;
use crate::modifier::NodeModifier;

/// One stored attribute: metadata plus its typed payload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredAttribute {
    /// Element type and domain of the attribute.
    pub meta: AttributeMeta,
    /// Flat typed payload.
    pub data: AttributeData,
}

impl StoredAttribute {
    /// Creates a stored attribute from metadata and payload.
    #[must_use]
    pub fn new(meta: AttributeMeta, data: AttributeData) -> Self {
        Self { meta, data }
    }
}

/// Geometry plus the attribute table defined on it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataBlock {
    geometry: Geometry,
    attributes: OrdMap<String, StoredAttribute>,
}

impl DataBlock {
    /// Creates an empty data block over the given geometry.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attributes: OrdMap::new(),
        }
    }

    /// Returns the geometry description.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Element count of `domain`, or `None` if the geometry does not
    /// define it.
    #[must_use]
    pub fn domain_len(&self, domain: AttributeDomain) -> Option<usize> {
        self.geometry.domain_len(domain)
    }

    /// Returns a stored attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&StoredAttribute> {
        self.attributes.get(name)
    }

    /// Returns true if an attribute with this name exists.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Inserts or replaces an attribute.
    pub fn insert_attribute(&mut self, name: impl Into<String>, attribute: StoredAttribute) {
        self.attributes.insert(name.into(), attribute);
    }

    /// Removes an attribute, returning it if it existed.
    pub fn remove_attribute(&mut self, name: &str) -> Option<StoredAttribute> {
        self.attributes.remove(name)
    }

    /// Attribute names in name order.
    ///
    /// Hidden attributes (names starting with `.`) are skipped when
    /// `skip_hidden` is set.
    #[must_use]
    pub fn attribute_names(&self, skip_hidden: bool) -> Vec<String> {
        self.attributes
            .keys()
            .filter(|name| !(skip_hidden && name.starts_with('.')))
            .cloned()
            .collect()
    }

    /// Number of stored attributes, hidden included.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// One object in the scene store.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneObject {
    name: String,
    identity_tag: Option<IdentityTag>,
    data: DataBlock,
    modifiers: Vec<NodeModifier>,
}

impl SceneObject {
    /// Creates an untagged object with the given name and data block.
    #[must_use]
    pub fn new(name: impl Into<String>, data: DataBlock) -> Self {
        Self {
            name: name.into(),
            identity_tag: None,
            data,
            modifiers: Vec::new(),
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stamped identity tag, if any.
    #[must_use]
    pub fn identity_tag(&self) -> Option<&IdentityTag> {
        self.identity_tag.as_ref()
    }

    /// Returns the data block.
    #[must_use]
    pub fn data(&self) -> &DataBlock {
        &self.data
    }

    /// Returns the modifier stack in stack order.
    #[must_use]
    pub fn modifiers(&self) -> &[NodeModifier] {
        &self.modifiers
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_identity_tag(&mut self, tag: IdentityTag) {
        self.identity_tag = Some(tag);
    }

    pub(crate) fn data_mut(&mut self) -> &mut DataBlock {
        &mut self.data
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut Vec<NodeModifier> {
        &mut self.modifiers
    }
}
