//! Attribute observation for viewer widgets

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Observable widget attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Center of a HiPS view
    Target,
    /// Field of view of a HiPS view
    Fov,
    /// Rotation of a HiPS view
    Rotation,
    /// Front-end projection, filled in on first render
    Wcs,
    /// Pixel limits of an image view
    Limits,
}

impl Attribute {
    /// Attributes describing a HiPS viewport
    pub const VIEWPORT: [Attribute; 3] = [Attribute::Fov, Attribute::Target, Attribute::Rotation];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Target => "_target",
            Attribute::Fov => "_fov",
            Attribute::Rotation => "_rotation",
            Attribute::Wcs => "_wcs",
            Attribute::Limits => "limits",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Notification delivered to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeChange {
    /// Widget whose attribute changed
    pub viewer_id: Uuid,
    pub attribute: Attribute,
}

/// Observer callback
pub type ChangeCallback = Arc<dyn Fn(&AttributeChange) + Send + Sync>;

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

struct Observer {
    id: ObserverId,
    attributes: Vec<Attribute>,
    callback: ChangeCallback,
}

/// Registered observers of a widget
///
/// Callbacks are handed out as a snapshot so the owner can release its locks
/// before invoking them.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Observer>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for changes of any of `attributes`
    pub fn observe(&mut self, attributes: &[Attribute], callback: ChangeCallback) -> ObserverId {
        let id = ObserverId::new();
        self.observers.push(Observer {
            id,
            attributes: attributes.to_vec(),
            callback,
        });
        id
    }

    /// Unregister an observer; returns false if it was not registered
    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        if let Some(pos) = self.observers.iter().position(|o| o.id == id) {
            self.observers.remove(pos);
            true
        } else {
            false
        }
    }

    /// Callbacks interested in `attribute`, in registration order
    pub fn callbacks_for(&self, attribute: Attribute) -> Vec<ChangeCallback> {
        self.observers
            .iter()
            .filter(|o| o.attributes.contains(&attribute))
            .map(|o| Arc::clone(&o.callback))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Invoke a snapshot of callbacks with one change
pub fn dispatch(callbacks: &[ChangeCallback], change: &AttributeChange) {
    for callback in callbacks {
        callback(change);
    }
}
