//! Domain events shared by the cart and its dispatcher.

pub mod event;

pub use event::Event;
