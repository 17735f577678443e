mod registry;
mod rsvp;

pub use registry::{RegistryRepository, RegistryRepositoryTrait};
pub use rsvp::{RsvpRepository, RsvpRepositoryTrait};

#[cfg(test)]
pub use registry::MockRegistryRepositoryTrait;
#[cfg(test)]
pub use rsvp::MockRsvpRepositoryTrait;
