mod options;
pub mod selector;
mod types;
mod upload;
pub mod viewer;

pub use options::*;
pub use selector::{SourceChange, SourceLabel, SourceSelector};
pub use types::*;
pub use upload::FileUpload;
pub use viewer::{
    LoadRequest, LoadState, PagePlaceholder, PageRenderOptions, PageStatus, PdfViewer,
    RenderRequest, ViewerEvent,
};
