pub mod geocoding;
pub mod locator;
pub mod messaging;
pub mod notification;
pub mod slots;
pub mod stats;
pub mod validation;
