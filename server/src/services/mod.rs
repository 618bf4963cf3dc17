//! Data-access and upload services called by the route handlers.

pub mod apparel;
pub mod cloudinary;
pub mod outfit;
pub mod upload;

pub use apparel::ApparelService;
pub use cloudinary::CloudinaryHost;
pub use outfit::OutfitService;
pub use upload::{HostedImage, ImageFile, ImageHost, UploadError, UploadService};
