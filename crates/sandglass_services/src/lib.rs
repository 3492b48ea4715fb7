//! Sandglass Services Layer
//!
//! Everything around the simulation that is not drawing: the countdown that
//! paces it, the event bus it reports on, and settings loading.

pub mod countdown;
pub mod events;
pub mod settings;

pub use countdown::{Countdown, CountdownEvent, CountdownEventKind};
pub use events::{Event, EventBus, SubscriptionId};
pub use settings::{CountdownSettings, Settings, SettingsError, WindowSettings, SETTINGS_ENV};
