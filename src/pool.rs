//! Fixed-capacity entity pool.
//!
//! Every slot is allocated up front; acquire and release only move slot
//! indices between the free list and the active set. Saturation is an
//! expected steady state: `acquire` on a full pool returns `None` and the
//! request is simply dropped.

use crate::entities::{Category, Entity};
use crate::vec2::{Aabb, Vec2};

/// Reference to an acquired slot.
///
/// The generation is bumped on release, so a handle kept past its release no
/// longer matches and every operation through it is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
pub struct EntityPool {
    slots: Vec<Entity>,
    generations: Vec<u32>,
    /// Inactive slot indices, used as a stack.
    free: Vec<u32>,
}

impl EntityPool {
    pub fn new(category: Category, capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Entity {
                category,
                position: Vec2::ZERO,
                velocity: Vec2::ZERO,
                active: false,
            })
            .collect();
        // Reversed so the lowest index is handed out first.
        let free = (0..capacity as u32).rev().collect();
        Self {
            slots,
            generations: vec![0; capacity],
            free,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Activate a free slot at `position` moving with `velocity`.
    pub fn acquire(&mut self, position: Vec2, velocity: Vec2) -> Option<Handle> {
        let index = self.free.pop()?;
        let slot = &mut self.slots[index as usize];
        slot.position = position;
        slot.velocity = velocity;
        slot.active = true;
        Some(Handle {
            index,
            generation: self.generations[index as usize],
        })
    }

    /// Deactivate the slot behind `handle`. Stale handles are ignored.
    pub fn release(&mut self, handle: Handle) {
        if !self.is_live(handle) {
            return;
        }
        self.release_index(handle.index as usize);
    }

    fn release_index(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if !slot.active {
            return;
        }
        slot.active = false;
        slot.velocity = Vec2::ZERO;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free.push(index as u32);
    }

    #[inline]
    pub fn is_live(&self, handle: Handle) -> bool {
        let index = handle.index as usize;
        index < self.slots.len()
            && self.slots[index].active
            && self.generations[index] == handle.generation
    }

    pub fn get(&self, handle: Handle) -> Option<&Entity> {
        if self.is_live(handle) {
            Some(&self.slots[handle.index as usize])
        } else {
            None
        }
    }

    /// Active slots in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = (Handle, &Entity)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.active)
            .map(move |(i, e)| {
                (
                    Handle {
                        index: i as u32,
                        generation: self.generations[i],
                    },
                    e,
                )
            })
    }

    /// Advance every active entity by its velocity.
    pub fn translate(&mut self, dt: f32) {
        for slot in self.slots.iter_mut().filter(|e| e.active) {
            slot.position += slot.velocity * dt;
        }
    }

    /// Release every active entity whose position lies outside `bounds`.
    /// Returns how many were culled.
    pub fn retain_within(&mut self, bounds: &Aabb) -> usize {
        let mut culled = 0;
        for index in 0..self.slots.len() {
            let slot = &self.slots[index];
            if slot.active && !bounds.contains(slot.position) {
                self.release_index(index);
                culled += 1;
            }
        }
        culled
    }

    /// Deactivate everything.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            self.release_index(index);
        }
    }
}
