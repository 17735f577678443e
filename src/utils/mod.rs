mod normalize;

pub use normalize::{normalize_email, normalize_name, normalize_phone};
