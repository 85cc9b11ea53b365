// Collaborator backends

pub mod memory;
pub mod ytdlp;

pub use memory::{DownloadCall, InMemoryCollaborator, SearchCall};
pub use ytdlp::YtDlpBackend;
