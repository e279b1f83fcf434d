//! Inventory: slot lookup and remove-one, the only operations launching needs.
//!
//! A slot is a stack of interchangeable item entities. Taking one pops the top of the
//! stack; the popped entity is the one that leaves the inventory (and gets fired).

use bevy::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("invalid slot index: {index}")]
    InvalidSlot { index: usize },
    #[error("slot {index} is empty")]
    EmptySlot { index: usize },
}

#[derive(Component, Debug, Default, Clone)]
pub struct Inventory {
    slots: Vec<Vec<Entity>>,
    selected: usize,
}

impl Inventory {
    pub fn with_slots(count: usize) -> Self {
        Self {
            slots: vec![Vec::new(); count],
            selected: 0,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Add `item` to the top of `slot`.
    pub fn push(&mut self, slot: usize, item: Entity) -> Result<(), InventoryError> {
        self.slots
            .get_mut(slot)
            .ok_or(InventoryError::InvalidSlot { index: slot })?
            .push(item);
        Ok(())
    }

    /// Slot whose stack contains `item`.
    pub fn slot_with_item(&self, item: Entity) -> Option<usize> {
        self.slots.iter().position(|stack| stack.contains(&item))
    }

    /// Remove exactly one item from `slot`, returning the removed entity.
    pub fn remove_one(&mut self, slot: usize) -> Result<Entity, InventoryError> {
        self.slots
            .get_mut(slot)
            .ok_or(InventoryError::InvalidSlot { index: slot })?
            .pop()
            .ok_or(InventoryError::EmptySlot { index: slot })
    }

    pub fn count(&self, slot: usize) -> usize {
        self.slots.get(slot).map_or(0, Vec::len)
    }

    pub fn select(&mut self, slot: usize) -> Result<(), InventoryError> {
        if slot >= self.slots.len() {
            return Err(InventoryError::InvalidSlot { index: slot });
        }
        self.selected = slot;
        Ok(())
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Top item of the selected slot.
    pub fn held(&self) -> Option<Entity> {
        self.slots.get(self.selected)?.last().copied()
    }
}
