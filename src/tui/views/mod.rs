// Dashboard views - the example compositions the demo binary ships
//
// Each view owns its widgets and implements the component traits; the App
// only routes input and asks for clipboard content.

pub mod feed;
pub mod gallery;

pub use feed::FeedView;
pub use gallery::GalleryView;
