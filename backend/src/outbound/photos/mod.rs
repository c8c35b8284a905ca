//! Photo storage adapters.

mod cap_std_photo_store;

pub use cap_std_photo_store::CapStdPhotoStore;
