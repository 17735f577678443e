mod registry;
mod rsvp;

pub use registry::{list_items_handler, record_gift_handler, RegistryServiceType};
pub use rsvp::{submit_rsvp_handler, RsvpServiceType};
