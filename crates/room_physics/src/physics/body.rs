//! Ready-made entity bodies
//!
//! [`Body`] is a plain moving shape with velocity and gravity that counts
//! the contact callbacks it receives and keeps the most recent ones. The demo
//! drives rooms with it and the tests use the counts and the log.

use std::collections::HashMap;

use crate::foundation::math::{SVector, Vec2, Vec3, VERTICAL_AXIS};
use crate::physics::collision::{Bounds, CollisionResult, Shape2, Shape3, Sides};
use crate::physics::hitbox::{Contact, ContactHooks, ContactState, Hitbox2, Hitbox3};
use crate::physics::material::MaterialId;

/// Callbacks kept in a body's recent event log
pub const EVENT_LOG_CAPACITY: usize = 64;

/// One contact callback as received by a [`Body`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactEvent {
    /// `touch_*` fired with the given material
    Touch(Contact, MaterialId),
    /// `leave_*` fired
    Leave(Contact),
}

/// Simple moving body over any shape type
#[derive(Debug, Clone)]
pub struct Body<S, const D: usize> {
    shape: S,
    /// Velocity in units per second (+y is down)
    pub velocity: SVector<f32, D>,
    /// Downward acceleration in units per second squared
    pub gravity: f32,
    material: MaterialId,
    contact: ContactState,
    events: Vec<ContactEvent>,
    counts: HashMap<ContactEvent, usize>,
}

/// 2D body
pub type Body2 = Body<Shape2, 2>;

/// 3D body
pub type Body3 = Body<Shape3, 3>;

impl<S: Bounds<D> + Copy, const D: usize> Body<S, D> {
    /// Body at rest with no gravity
    pub fn new(shape: impl Into<S>) -> Self {
        Self {
            shape: shape.into(),
            velocity: SVector::<f32, D>::zeros(),
            gravity: 0.0,
            material: MaterialId::NONE,
            contact: ContactState::default(),
            events: Vec::new(),
            counts: HashMap::new(),
        }
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: SVector<f32, D>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the gravity acceleration
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the body's own material
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = material;
        self
    }

    /// Current shape
    pub fn bounds(&self) -> S {
        self.shape
    }

    /// The last [`EVENT_LOG_CAPACITY`] callbacks, oldest first
    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Drain the callback log and reset the counts
    pub fn take_events(&mut self) -> Vec<ContactEvent> {
        self.counts.clear();
        std::mem::take(&mut self.events)
    }

    /// How many times `event` was received since the last [`take_events`](Self::take_events)
    pub fn count(&self, event: ContactEvent) -> usize {
        self.counts.get(&event).copied().unwrap_or(0)
    }

    /// How many `touch` callbacks were received for `contact`, any material
    pub fn touch_count(&self, contact: Contact) -> usize {
        self.counts
            .iter()
            .filter(|(event, _)| matches!(event, ContactEvent::Touch(c, _) if *c == contact))
            .map(|(_, n)| n)
            .sum()
    }

    fn min_corner(&self) -> SVector<f32, D> {
        self.shape.bounding_box().min
    }

    fn move_to(&mut self, position: SVector<f32, D>) {
        let delta = position - self.min_corner();
        self.shape.translate(delta);
    }

    fn integrate(&mut self, dt: f32) {
        self.velocity[VERTICAL_AXIS] += self.gravity * dt;
        let delta = self.velocity * dt;
        self.shape.translate(delta);
    }

    /// Cancel velocity pointing into whatever was struck
    fn stop_against(&mut self, sides: Sides) {
        let blocked = [
            (Sides::LEFT, 0, -1.0),
            (Sides::RIGHT, 0, 1.0),
            (Sides::CEILING, 1, -1.0),
            (Sides::FLOOR, 1, 1.0),
            (Sides::FRONT, 2, -1.0),
            (Sides::BACK, 2, 1.0),
        ];
        for (side, axis, into) in blocked {
            if axis < D && sides.contains(side) && self.velocity[axis] * into > 0.0 {
                self.velocity[axis] = 0.0;
            }
        }
    }

    fn apply(&mut self, result: &CollisionResult<D>) {
        if result.is_collided() {
            self.shape.translate(result.displacement());
            self.stop_against(result.sides());
        }
    }
}

impl<S, const D: usize> Body<S, D> {
    fn record(&mut self, event: ContactEvent) {
        *self.counts.entry(event).or_insert(0) += 1;
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}

impl<S, const D: usize> ContactHooks for Body<S, D> {
    fn contact_state(&self) -> &ContactState {
        &self.contact
    }

    fn contact_state_mut(&mut self) -> &mut ContactState {
        &mut self.contact
    }

    fn material(&self) -> MaterialId {
        self.material
    }

    fn touch_floor(&mut self, material: MaterialId) {
        self.record(ContactEvent::Touch(Contact::Floor, material));
    }

    fn leave_floor(&mut self) {
        self.record(ContactEvent::Leave(Contact::Floor));
    }

    fn touch_ceiling(&mut self, material: MaterialId) {
        self.record(ContactEvent::Touch(Contact::Ceiling, material));
    }

    fn leave_ceiling(&mut self) {
        self.record(ContactEvent::Leave(Contact::Ceiling));
    }

    fn touch_wall(&mut self, material: MaterialId) {
        self.record(ContactEvent::Touch(Contact::Wall, material));
    }

    fn leave_wall(&mut self) {
        self.record(ContactEvent::Leave(Contact::Wall));
    }
}

impl Hitbox2 for Body2 {
    fn shape(&self) -> Shape2 {
        self.shape
    }

    fn position(&self) -> Vec2 {
        self.min_corner()
    }

    fn set_position(&mut self, position: Vec2) {
        self.move_to(position);
    }

    fn advance(&mut self, dt: f32) {
        self.integrate(dt);
    }

    fn collide(&mut self, result: &CollisionResult<2>) {
        self.apply(result);
    }
}

impl Hitbox3 for Body3 {
    fn shape(&self) -> Shape3 {
        self.shape
    }

    fn position(&self) -> Vec3 {
        self.min_corner()
    }

    fn set_position(&mut self, position: Vec3) {
        self.move_to(position);
    }

    fn advance(&mut self, dt: f32) {
        self.integrate(dt);
    }

    fn collide(&mut self, result: &CollisionResult<3>) {
        self.apply(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::{Rect, Sphere};

    #[test]
    fn test_body_falls_under_gravity() {
        let mut body = Body2::new(Rect::rect(0.0, 0.0, 4.0, 4.0)).with_gravity(10.0);
        body.advance(0.5);
        assert_eq!(body.velocity, Vec2::new(0.0, 5.0));
        assert_eq!(body.position(), Vec2::new(0.0, 2.5));
    }

    #[test]
    fn test_collide_stops_velocity_into_surface() {
        let mut body = Body2::new(Rect::rect(0.0, 0.0, 4.0, 4.0)).with_velocity(Vec2::new(3.0, 6.0));
        body.collide(&CollisionResult::<2>::new(0.0, -1.0, Sides::FLOOR, MaterialId::NONE));
        assert_eq!(body.velocity, Vec2::new(3.0, 0.0));
        assert_eq!(body.position(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_event_log_stays_bounded_while_counts_grow() {
        let mut body = Body2::new(Rect::rect(0.0, 0.0, 4.0, 4.0));
        let ticks = EVENT_LOG_CAPACITY * 100;
        for _ in 0..ticks {
            body.touch_floor(MaterialId::NONE);
        }
        body.leave_floor();

        assert_eq!(body.events().len(), EVENT_LOG_CAPACITY);
        assert_eq!(body.events().last(), Some(&ContactEvent::Leave(Contact::Floor)));
        assert_eq!(body.touch_count(Contact::Floor), ticks);
        assert_eq!(body.count(ContactEvent::Leave(Contact::Floor)), 1);

        assert_eq!(body.take_events().len(), EVENT_LOG_CAPACITY);
        assert_eq!(body.touch_count(Contact::Floor), 0);
        assert!(body.events().is_empty());
    }

    #[test]
    fn test_set_position_moves_sphere_by_min_corner() {
        let mut body = Body3::new(Sphere::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(Hitbox3::position(&body), Vec3::zeros());
        body.set_position(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(body.bounds(), Shape3::Sphere(Sphere::new(3.0, 1.0, 1.0, 1.0)));
    }
}
