//! Photo API client: endpoint selection, HTTP fetching and record decoding.
mod decode;
mod endpoint;
mod fetch;
mod types;

pub use decode::decode_photos;
pub use endpoint::{OrderBy, ParseOrderByError, PhotosEndpoint};
pub use fetch::{ApiSettings, PhotoService, ReqwestPhotoService};
pub use types::{FailureKind, NetworkError, Photo, PhotoUrls, PhotoUser};
