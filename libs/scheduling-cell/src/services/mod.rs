pub mod booking;
pub mod catalog;
pub mod clock;
pub mod slots;
pub mod store;
pub mod validator;

pub use booking::AppointmentBookingService;
pub use catalog::ScheduleCatalog;
pub use clock::{Clock, SystemClock};
pub use slots::SlotGrid;
pub use store::AppointmentStore;
