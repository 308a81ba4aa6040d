// Stream-extraction backends
//
// Python yt_dlp module and native yt-dlp binary behind one trait,
// with an orchestrator that falls back from one to the other.

pub mod diagnostics;
mod orchestrator;
mod traits;
mod ytdlp;

pub use diagnostics::{diagnose_error, BlockingReason};
pub use orchestrator::{status, BackendStatus, ExtractorChain};
pub use traits::{watch_url, ExtractionRequest, ExtractorMode, MediaExtractor};
pub use ytdlp::{Launcher, YtDlpExtractor};
