mod registry;
mod rsvp;

pub use registry::{
    GiftRecord, GiftRequest, GiftResponse, Quantity, RegistryItem, RegistryItemResponse,
    RegistryItemsResponse,
};
pub use rsvp::{Guest, RsvpRequest, RsvpResponse, RsvpUpdate};
