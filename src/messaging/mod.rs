/// Messaging module
///
/// Events are notifications of controller state changes (past tense,
/// broadcast). Settings screens subscribe through the [`EventBus`] instead
/// of polling the controller.
///
/// ## Usage
///
/// ```rust,ignore
/// let (rx, _id) = controller.subscribe();
///
/// while let Ok(event) = rx.try_recv() {
///     match event {
///         AudioEvent::VolumeChanged { category, value } => { /* update slider */ },
///         _ => {}
///     }
/// }
/// ```
pub mod bus;
pub mod events;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use events::AudioEvent;
