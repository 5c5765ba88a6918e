pub mod gateway;
pub mod instaloader;
pub mod models;
pub mod traits;
pub mod ytdlp;

pub use gateway::{format_selector, FetchGateway};
pub use instaloader::InstaloaderFetcher;
pub use models::{
    DownloadOutcome, FailureKind, FetchFailure, FetchRequest, FetchedMedia, MediaInfo, PostInfo,
    PostRequest,
};
pub use traits::{MediaFetcher, MissingTool, PostError, PostFetcher};
pub use ytdlp::YtDlpFetcher;
