pub mod booking;
pub mod home;

pub use booking::{Booking, BookingStatus, NewBooking};
pub use home::{Facility, Home, HomeCatalog};
