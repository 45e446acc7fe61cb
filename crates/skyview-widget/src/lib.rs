//! Sky Viewer Widgets
//!
//! The rendering widgets are external collaborators. This crate defines the
//! small surface the rest of the system relies on:
//!
//! - [`HipsWidget`] - a HiPS sky browser (target, fov, rotation, commands)
//! - [`ImageWidget`] - an image viewer with a pixel frame and a WCS
//! - [`ObserverSet`] - attribute-change observation shared by both
//! - [`aid`] - the Astro Image Display viewport API over a [`HipsWidget`]
//! - [`DeferredCall`] - one-shot calls delayed until a widget has rendered
//!
//! Headless implementations of both widgets are provided for tests and for
//! running without a front end.

pub mod aid;
pub mod deferred;
pub mod headless;
pub mod observer;
pub mod widget;

pub use deferred::DeferredCall;
pub use headless::{HeadlessHipsWidget, HeadlessImageWidget};
pub use observer::{Attribute, AttributeChange, ChangeCallback, ObserverId, ObserverSet};
pub use widget::{HipsWidget, ImageWidget, SharedHipsWidget, SharedImageWidget};
