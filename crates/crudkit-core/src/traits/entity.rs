//! Entity identity trait.

/// A persisted record identified by an integer key.
///
/// An entity whose [`id`](Entity::id) is `None` has not been saved yet;
/// stores assign a key on its first save through [`set_id`](Entity::set_id).
pub trait Entity: Send + Sync + 'static {
    /// The entity's key, if it has one.
    fn id(&self) -> Option<i64>;

    /// Assign the entity's key.
    fn set_id(&mut self, id: i64);
}
