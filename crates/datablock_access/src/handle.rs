//! Identity-stable object handles.
//!
//! A handle remembers an object by its immutable identity tag and keeps
//! the display name only as a lookup hint. Resolution checks the hint
//! first and falls back to a full scan when the name was changed or
//! reused, so a handle survives renames and slot reshuffling for as long
//! as the object itself is alive. The scan path is O(n) in the number of
//! live objects and runs only on a name miss or a tag mismatch.

// Allow usize to f64 casts - row counts are far below 2^53
#![allow(clippy::cast_precision_loss)]

use std::cell::RefCell;
use std::fmt;

use log::debug;
use ndarray::Array2;

use datablock_foundation::{
    AttributeData, AttributeDomain, DataFamily, ElementType, Error, IdentityTag, ObjectId, Result,
};
use datablock_storage::{POSITION_ATTRIBUTE, SharedStore};

use crate::array::AttributeArray;
use crate::modifier::ModifierHandle;

/// How [`ObjectHandle::centroid`] weighs the position rows.
#[derive(Clone, Debug, PartialEq)]
pub enum CentroidWeight {
    /// Plain mean over all rows.
    Uniform,
    /// Weigh each row by a scalar attribute of this name.
    Attribute(String),
    /// Weigh each row by an explicit factor.
    Weights(Vec<f64>),
    /// Plain mean over a subset of rows.
    Indices(Vec<usize>),
}

/// A long-lived reference to one scene object.
///
/// The handle is independent of the object's display name: callers can
/// rename the object through any path and the handle still resolves to
/// it. Cloning a handle yields another reference to the same logical
/// object over the same store.
#[derive(Clone)]
pub struct ObjectHandle {
    store: SharedStore,
    tag: IdentityTag,
    cached_name: RefCell<String>,
}

impl ObjectHandle {
    /// Wraps an existing object.
    ///
    /// Adopts the object's identity tag when it already carries one;
    /// otherwise mints a fresh tag and stamps it onto the object.
    pub fn wrap(store: &SharedStore, id: ObjectId) -> Result<Self> {
        let (tag, name) = adopt_or_stamp(store, id)?;
        Ok(Self {
            store: store.clone(),
            tag,
            cached_name: RefCell::new(name),
        })
    }

    /// Wraps the object currently holding a display name.
    pub fn from_name(store: &SharedStore, name: &str) -> Result<Self> {
        let id = store.borrow().find_by_name(name)?;
        Self::wrap(store, id)
    }

    /// The immutable identity tag this handle tracks.
    #[must_use]
    pub fn tag(&self) -> &IdentityTag {
        &self.tag
    }

    /// The name hint from the last successful resolution.
    #[must_use]
    pub fn cached_name(&self) -> String {
        self.cached_name.borrow().clone()
    }

    /// The store this handle resolves against.
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Resolves to the live object carrying this handle's tag.
    ///
    /// Fast path: the cached name still names an object with the right
    /// tag. Otherwise every live object is scanned for the tag and the
    /// cached name is updated from the match. Fails when no live object
    /// carries the tag; a handle that failed to resolve stays failed
    /// until the caller rebinds it.
    pub fn resolve(&self) -> Result<ObjectId> {
        let store = self.store.borrow();
        let cached = self.cached_name.borrow().clone();

        if let Ok(id) = store.find_by_name(&cached) {
            if store.identity_tag(id)? == Some(&self.tag) {
                return Ok(id);
            }
        }

        // Name miss or a reused name: fall back to the identity scan
        debug!(
            "cached name {cached:?} no longer matches tag {}, scanning",
            self.tag
        );
        for (id, object) in store.scan_all() {
            if object.identity_tag() == Some(&self.tag) {
                *self.cached_name.borrow_mut() = object.name().to_string();
                return Ok(id);
            }
        }
        Err(Error::identity_not_found(self.tag.clone()))
    }

    /// Returns true if the handle currently resolves.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.resolve().is_ok()
    }

    /// Points this handle at a different object.
    ///
    /// Adopts the object's existing tag, or mints and stamps one when it
    /// is untagged. Stamping is idempotent.
    pub fn rebind(&mut self, id: ObjectId) -> Result<()> {
        let (tag, name) = adopt_or_stamp(&self.store, id)?;
        self.tag = tag;
        self.cached_name.replace(name);
        Ok(())
    }

    /// The object's current display name, read fresh from the store.
    pub fn name(&self) -> Result<String> {
        let id = self.resolve()?;
        Ok(self.store.borrow().get(id)?.name().to_string())
    }

    /// Renames the object, leaving the identity tag untouched.
    ///
    /// The store deduplicates taken names, so the returned name may
    /// carry a numeric suffix; the handle's cache adopts whatever name
    /// was actually assigned.
    pub fn rename(&self, new_name: &str) -> Result<String> {
        let id = self.resolve()?;
        let assigned = self.store.borrow_mut().rename(id, new_name)?;
        self.cached_name.replace(assigned.clone());
        Ok(assigned)
    }

    /// Removes the object from the store, consuming the handle.
    pub fn remove(self) -> Result<()> {
        let id = self.resolve()?;
        self.store.borrow_mut().remove_object(id)
    }

    // ----- attributes ------------------------------------------------------

    /// Binds a live-syncing array onto one of the object's attributes.
    pub fn attribute(&self, name: &str) -> Result<AttributeArray> {
        AttributeArray::bind(self.clone(), name)
    }

    /// Binds a live-syncing array onto the `position` attribute.
    pub fn position(&self) -> Result<AttributeArray> {
        self.attribute(POSITION_ATTRIBUTE)
    }

    /// Replaces the object's positions.
    pub fn set_position(&self, positions: Array2<f64>) -> Result<()> {
        self.position()?.assign(positions)
    }

    /// Reads an attribute into a detached matrix copy.
    pub fn attribute_matrix(&self, name: &str) -> Result<Array2<f64>> {
        let id = self.resolve()?;
        let (data, meta) = self.store.borrow().read_attribute(id, name)?;
        data.to_matrix(meta.width())
    }

    /// Stores a float matrix as an attribute.
    ///
    /// When `element_type` is `None` the type is inferred from the
    /// matrix width, preferring color over quaternion at width 4. With
    /// `overwrite` off, a taken name gets a fresh suffixed name; the
    /// name actually used is returned.
    pub fn store_matrix(
        &self,
        name: &str,
        matrix: &Array2<f64>,
        element_type: Option<ElementType>,
        domain: AttributeDomain,
        overwrite: bool,
    ) -> Result<String> {
        let element_type = match element_type {
            Some(explicit) => explicit,
            None => ElementType::infer(DataFamily::Float, matrix.ncols()).ok_or_else(|| {
                Error::store_write(
                    name,
                    format!("no element type has width {}", matrix.ncols()),
                )
            })?,
        };
        let data = AttributeData::from_matrix(matrix, element_type.family());
        let id = self.resolve()?;
        self.store
            .borrow_mut()
            .store_attribute(id, name, data, element_type, domain, overwrite)
    }

    /// Stores a typed payload as an attribute.
    pub fn store_data(
        &self,
        name: &str,
        data: AttributeData,
        element_type: ElementType,
        domain: AttributeDomain,
        overwrite: bool,
    ) -> Result<String> {
        let id = self.resolve()?;
        self.store
            .borrow_mut()
            .store_attribute(id, name, data, element_type, domain, overwrite)
    }

    /// Removes an attribute from the object.
    pub fn remove_attribute(&self, name: &str) -> Result<()> {
        let id = self.resolve()?;
        self.store.borrow_mut().remove_attribute(id, name)
    }

    /// Attribute names on the object, optionally without hidden ones.
    pub fn attribute_names(&self, skip_hidden: bool) -> Result<Vec<String>> {
        let id = self.resolve()?;
        self.store.borrow().attribute_names(id, skip_hidden)
    }

    /// Returns true if the object carries an attribute with this name.
    pub fn has_attribute(&self, name: &str) -> Result<bool> {
        let id = self.resolve()?;
        self.store.borrow().has_attribute(id, name)
    }

    /// Element count of a domain on the object's geometry, for bounds
    /// checks by callers.
    pub fn domain_len(&self, domain: AttributeDomain) -> Result<Option<usize>> {
        let id = self.resolve()?;
        self.store.borrow().domain_len(id, domain)
    }

    /// Weighted or plain centroid of the object's positions.
    ///
    /// Weights must carry one value per position row and must not sum
    /// to zero.
    pub fn centroid(&self, weight: &CentroidWeight) -> Result<Vec<f64>> {
        let positions = self.attribute_matrix(POSITION_ATTRIBUTE)?;
        match weight {
            CentroidWeight::Uniform => Ok(column_means(&positions)),
            CentroidWeight::Attribute(name) => {
                let weights = self.attribute_matrix(name)?;
                if weights.ncols() != 1 {
                    return Err(Error::width_mismatch(name.clone(), 1, weights.ncols()));
                }
                // An attribute on another domain carries the wrong row count
                if weights.nrows() != positions.nrows() {
                    return Err(Error::row_count_mismatch(
                        name.clone(),
                        positions.nrows(),
                        weights.nrows(),
                    ));
                }
                let factors = weights.column(0).to_vec();
                weighted_means(&positions, &factors)
            }
            CentroidWeight::Weights(factors) => {
                if factors.len() != positions.nrows() {
                    return Err(Error::row_count_mismatch(
                        POSITION_ATTRIBUTE,
                        positions.nrows(),
                        factors.len(),
                    ));
                }
                weighted_means(&positions, factors)
            }
            CentroidWeight::Indices(indices) => {
                for &index in indices {
                    if index >= positions.nrows() {
                        return Err(Error::index_out_of_bounds(index, positions.nrows()));
                    }
                }
                Ok(subset_means(&positions, indices))
            }
        }
    }

    // ----- modifiers -------------------------------------------------------

    /// Adds a modifier to the object's stack and hands back its handle.
    ///
    /// Modifier names are deduplicated within the object.
    pub fn add_modifier(&self, name: &str) -> Result<ModifierHandle> {
        let id = self.resolve()?;
        let assigned = self.store.borrow_mut().add_modifier(id, name)?;
        Ok(ModifierHandle::new(self.clone(), assigned))
    }

    /// Hands back a handle onto an existing modifier.
    pub fn modifier(&self, name: &str) -> Result<ModifierHandle> {
        let id = self.resolve()?;
        let known = self.store.borrow().modifier_names(id)?;
        if !known.iter().any(|m| m == name) {
            return Err(Error::modifier_not_found(name));
        }
        Ok(ModifierHandle::new(self.clone(), name.to_string()))
    }

    /// Names of the modifiers on the object's stack, in stack order.
    pub fn modifier_names(&self) -> Result<Vec<String>> {
        let id = self.resolve()?;
        self.store.borrow().modifier_names(id)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ObjectHandle({:?}, {})",
            self.cached_name.borrow(),
            self.tag
        )
    }
}

fn adopt_or_stamp(store: &SharedStore, id: ObjectId) -> Result<(IdentityTag, String)> {
    let mut store = store.borrow_mut();
    let name = store.get(id)?.name().to_string();
    if let Some(existing) = store.identity_tag(id)? {
        return Ok((existing.clone(), name));
    }
    let tag = IdentityTag::mint();
    store.set_identity_tag(id, &tag)?;
    Ok((tag, name))
}

fn column_means(matrix: &Array2<f64>) -> Vec<f64> {
    let rows = matrix.nrows() as f64;
    (0..matrix.ncols())
        .map(|c| matrix.column(c).sum() / rows)
        .collect()
}

fn weighted_means(matrix: &Array2<f64>, factors: &[f64]) -> Result<Vec<f64>> {
    let total: f64 = factors.iter().sum();
    if total == 0.0 {
        return Err(Error::degenerate_weights());
    }
    Ok((0..matrix.ncols())
        .map(|c| {
            matrix
                .column(c)
                .iter()
                .zip(factors)
                .map(|(value, factor)| value * factor)
                .sum::<f64>()
                / total
        })
        .collect())
}

fn subset_means(matrix: &Array2<f64>, indices: &[usize]) -> Vec<f64> {
    let count = indices.len() as f64;
    (0..matrix.ncols())
        .map(|c| {
            indices
                .iter()
                .map(|&row| matrix[[row, c]])
                .sum::<f64>()
                / count
        })
        .collect()
}
