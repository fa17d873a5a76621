//! Contact bookkeeping
//!
//! [`Contacts`] gathers what one collision pass touched. After the pass,
//! [`update_contacts`] turns it into per-group transitions on the entity's
//! [`ContactState`](crate::physics::ContactState) and fires the callbacks:
//!
//! ```text
//!   touched this tick                 -> touch(material)
//!   in contact, position unchanged    -> touch(remembered material)
//!   in contact, position changed      -> leave()
//!   otherwise                         -> nothing
//! ```
//!
//! Floor and ceiling watch the vertical coordinate; walls watch the
//! horizontal ones. The unchanged-position rule keeps an entity that rests
//! exactly on a surface (touching, not overlapping) in contact.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{SVector, VERTICAL_AXIS};
use crate::physics::collision::{CollisionResult, Sides};
use crate::physics::hitbox::{Contact, ContactHooks};
use crate::physics::material::MaterialId;

/// Which floor material is reported when one pass lands on several floors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorMaterialPolicy {
    /// The floor resolved last (tiles in row order, then boundary walls)
    #[default]
    Last,
    /// The floor resolved first
    First,
}

/// Everything one collision pass touched
#[derive(Debug, Clone, Copy)]
pub struct Contacts<const D: usize> {
    policy: FloorMaterialPolicy,
    combined: CollisionResult<D>,
    floor: Option<MaterialId>,
    ceiling: Option<MaterialId>,
    wall: Option<MaterialId>,
}

impl<const D: usize> Contacts<D> {
    /// Nothing touched yet
    pub fn new(policy: FloorMaterialPolicy) -> Self {
        Self {
            policy,
            combined: CollisionResult::none(),
            floor: None,
            ceiling: None,
            wall: None,
        }
    }

    /// Fold in one applied result
    pub fn record(&mut self, result: &CollisionResult<D>) {
        if !result.is_collided() {
            return;
        }
        let material = result.material();
        if result.floor() {
            self.floor = match (self.policy, self.floor) {
                (FloorMaterialPolicy::First, Some(first)) => Some(first),
                _ => Some(material),
            };
        }
        if result.ceiling() {
            self.ceiling = Some(material);
        }
        if result.sides().intersects(Sides::WALLS) {
            self.wall = Some(material);
        }
        self.combined.accumulate(result);
    }

    /// Material touched in `contact` during the pass, if any
    pub fn touched(&self, contact: Contact) -> Option<MaterialId> {
        match contact {
            Contact::Floor => self.floor,
            Contact::Ceiling => self.ceiling,
            Contact::Wall => self.wall,
        }
    }

    /// Summed correction of the pass. The material is the floor's when a
    /// floor was touched.
    pub fn result(&self) -> CollisionResult<D> {
        match self.floor {
            Some(floor) => self.combined.with_material(floor),
            None => self.combined,
        }
    }
}

/// Run the floor, ceiling and wall transitions for one entity.
///
/// `before` is the position at the start of the tick (before movement),
/// `after` the position once every correction has been applied.
pub fn update_contacts<H, const D: usize>(
    entity: &mut H,
    contacts: &Contacts<D>,
    before: &SVector<f32, D>,
    after: &SVector<f32, D>,
) where
    H: ContactHooks + ?Sized,
{
    let vertical_still = before[VERTICAL_AXIS] == after[VERTICAL_AXIS];
    let horizontal_still = (0..D)
        .filter(|axis| *axis != VERTICAL_AXIS)
        .all(|axis| before[axis] == after[axis]);

    transition(entity, Contact::Floor, contacts.touched(Contact::Floor), vertical_still);
    transition(entity, Contact::Ceiling, contacts.touched(Contact::Ceiling), vertical_still);
    transition(entity, Contact::Wall, contacts.touched(Contact::Wall), horizontal_still);
}

fn transition<H: ContactHooks + ?Sized>(
    entity: &mut H,
    contact: Contact,
    touched: Option<MaterialId>,
    still: bool,
) {
    let state = *entity.contact_state();
    let was_touching = state.is_touching(contact);
    let material = touched.or_else(|| (was_touching && still).then_some(state.material(contact)));

    match material {
        Some(material) => {
            if !was_touching {
                log::debug!("{:?} contact begins ({:?})", contact, material);
            }
            entity.contact_state_mut().touch(contact, material);
            match contact {
                Contact::Floor => entity.touch_floor(material),
                Contact::Ceiling => entity.touch_ceiling(material),
                Contact::Wall => entity.touch_wall(material),
            }
        }
        None if was_touching => {
            log::debug!("{:?} contact ends", contact);
            entity.contact_state_mut().leave(contact);
            match contact {
                Contact::Floor => entity.leave_floor(),
                Contact::Ceiling => entity.leave_ceiling(),
                Contact::Wall => entity.leave_wall(),
            }
        }
        None => {}
    }
}
