pub mod fetcher;
pub mod krea;
pub mod traits;

#[cfg(test)]
pub(crate) mod stub;

pub use fetcher::HttpImageFetcher;
pub use krea::KreaClient;
pub use traits::{ImageFetcher, ImageProvider};
