//! The hitbox contract
//!
//! Anything a room moves and collides implements [`Hitbox2`] (or
//! [`Hitbox3`]). The room owns the contact bookkeeping: it updates the
//! entity's [`ContactState`] and then invokes the matching `touch_*` or
//! `leave_*` hook, so implementors only decide what a contact *does*
//! (damage, sound, footstep dust), never whether it happened.

use crate::foundation::math::{Vec2, Vec3};
use crate::physics::collision::{CollisionResult2, CollisionResult3, Shape2, Shape3};
use crate::physics::material::MaterialId;

/// The three contact groups tracked across ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contact {
    /// Standing on something
    Floor,
    /// Head against something
    Ceiling,
    /// Pressed against something sideways
    Wall,
}

/// Per-group contact flags plus the material last touched in each group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    on_ground: bool,
    on_ceiling: bool,
    on_wall: bool,
    floor_material: MaterialId,
    ceiling_material: MaterialId,
    wall_material: MaterialId,
}

impl ContactState {
    /// Whether the group is currently in contact
    pub fn is_touching(&self, contact: Contact) -> bool {
        match contact {
            Contact::Floor => self.on_ground,
            Contact::Ceiling => self.on_ceiling,
            Contact::Wall => self.on_wall,
        }
    }

    /// Material remembered for the group (kept after leaving)
    pub fn material(&self, contact: Contact) -> MaterialId {
        match contact {
            Contact::Floor => self.floor_material,
            Contact::Ceiling => self.ceiling_material,
            Contact::Wall => self.wall_material,
        }
    }

    /// Mark the group as touching `material`
    pub fn touch(&mut self, contact: Contact, material: MaterialId) {
        let (flag, remembered) = self.slot_mut(contact);
        *flag = true;
        *remembered = material;
    }

    /// Mark the group as no longer touching; the material is remembered
    pub fn leave(&mut self, contact: Contact) {
        *self.slot_mut(contact).0 = false;
    }

    fn slot_mut(&mut self, contact: Contact) -> (&mut bool, &mut MaterialId) {
        match contact {
            Contact::Floor => (&mut self.on_ground, &mut self.floor_material),
            Contact::Ceiling => (&mut self.on_ceiling, &mut self.ceiling_material),
            Contact::Wall => (&mut self.on_wall, &mut self.wall_material),
        }
    }
}

/// Contact state access plus the touch/leave callbacks
///
/// All callbacks default to doing nothing.
pub trait ContactHooks {
    /// Current contact state
    fn contact_state(&self) -> &ContactState;

    /// Mutable contact state, written by the room's collision pass
    fn contact_state_mut(&mut self) -> &mut ContactState;

    /// Material of the entity itself
    fn material(&self) -> MaterialId {
        MaterialId::NONE
    }

    /// Standing on something
    fn is_on_ground(&self) -> bool {
        self.contact_state().is_touching(Contact::Floor)
    }

    /// Head against something
    fn is_on_ceiling(&self) -> bool {
        self.contact_state().is_touching(Contact::Ceiling)
    }

    /// Pressed against a wall
    fn is_on_wall(&self) -> bool {
        self.contact_state().is_touching(Contact::Wall)
    }

    /// Fired every tick the entity is on a floor
    fn touch_floor(&mut self, _material: MaterialId) {}

    /// Fired once when the entity leaves the floor
    fn leave_floor(&mut self) {}

    /// Fired every tick the entity is against a ceiling
    fn touch_ceiling(&mut self, _material: MaterialId) {}

    /// Fired once when the entity leaves the ceiling
    fn leave_ceiling(&mut self) {}

    /// Fired every tick the entity is against a wall
    fn touch_wall(&mut self, _material: MaterialId) {}

    /// Fired once when the entity leaves the wall
    fn leave_wall(&mut self) {}
}

/// A movable 2D entity
pub trait Hitbox2: ContactHooks {
    /// Current bounds snapshot
    fn shape(&self) -> Shape2;

    /// Position (top-left of the bounds)
    fn position(&self) -> Vec2;

    /// Move to `position`
    fn set_position(&mut self, position: Vec2);

    /// Movement step run by the room before collision. Default: stand still.
    fn advance(&mut self, _dt: f32) {}

    /// Apply one collision result. The default moves by the displacement;
    /// override to also react (e.g. cancel velocity into the surface).
    fn collide(&mut self, result: &CollisionResult2) {
        if result.is_collided() {
            let position = self.position() + result.displacement();
            self.set_position(position);
        }
    }
}

/// A movable 3D entity
pub trait Hitbox3: ContactHooks {
    /// Current bounds snapshot
    fn shape(&self) -> Shape3;

    /// Position (minimum corner of the bounds)
    fn position(&self) -> Vec3;

    /// Move to `position`
    fn set_position(&mut self, position: Vec3);

    /// Movement step run by the room before collision. Default: stand still.
    fn advance(&mut self, _dt: f32) {}

    /// Apply one collision result
    fn collide(&mut self, result: &CollisionResult3) {
        if result.is_collided() {
            let position = self.position() + result.displacement();
            self.set_position(position);
        }
    }
}

impl<T: ContactHooks + ?Sized> ContactHooks for Box<T> {
    fn contact_state(&self) -> &ContactState {
        (**self).contact_state()
    }

    fn contact_state_mut(&mut self) -> &mut ContactState {
        (**self).contact_state_mut()
    }

    fn material(&self) -> MaterialId {
        (**self).material()
    }

    fn is_on_ground(&self) -> bool {
        (**self).is_on_ground()
    }

    fn is_on_ceiling(&self) -> bool {
        (**self).is_on_ceiling()
    }

    fn is_on_wall(&self) -> bool {
        (**self).is_on_wall()
    }

    fn touch_floor(&mut self, material: MaterialId) {
        (**self).touch_floor(material);
    }

    fn leave_floor(&mut self) {
        (**self).leave_floor();
    }

    fn touch_ceiling(&mut self, material: MaterialId) {
        (**self).touch_ceiling(material);
    }

    fn leave_ceiling(&mut self) {
        (**self).leave_ceiling();
    }

    fn touch_wall(&mut self, material: MaterialId) {
        (**self).touch_wall(material);
    }

    fn leave_wall(&mut self) {
        (**self).leave_wall();
    }
}

impl<T: Hitbox2 + ?Sized> Hitbox2 for Box<T> {
    fn shape(&self) -> Shape2 {
        (**self).shape()
    }

    fn position(&self) -> Vec2 {
        (**self).position()
    }

    fn set_position(&mut self, position: Vec2) {
        (**self).set_position(position);
    }

    fn advance(&mut self, dt: f32) {
        (**self).advance(dt);
    }

    fn collide(&mut self, result: &CollisionResult2) {
        (**self).collide(result);
    }
}

impl<T: Hitbox3 + ?Sized> Hitbox3 for Box<T> {
    fn shape(&self) -> Shape3 {
        (**self).shape()
    }

    fn position(&self) -> Vec3 {
        (**self).position()
    }

    fn set_position(&mut self, position: Vec3) {
        (**self).set_position(position);
    }

    fn advance(&mut self, dt: f32) {
        (**self).advance(dt);
    }

    fn collide(&mut self, result: &CollisionResult3) {
        (**self).collide(result);
    }
}
