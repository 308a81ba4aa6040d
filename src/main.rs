use clap::{Parser, Subcommand};
use serde_json::json;
use std::error::Error;
use std::sync::Arc;
use tracing::debug;

use ytmusic_resolver::config::{LyricsConfig, ResolverConfig};
use ytmusic_resolver::logging::init_logging;
use ytmusic_resolver::{
    status, ArtworkResolver, AudioQuality, AudioResolver, ExtractorChain, ExtractorMode, KugouProvider,
    LyricsResolver, LyricsResponse, MediaExtractor, ThumbnailCandidate, ThumbnailQuality,
};

/// Resolve audio streams, artwork and synced lyrics for YouTube Music items
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Verbose logging to stderr
    #[arg(long, global = true)]
    debug: bool,
    /// SOCKS5/HTTP proxy URL (overrides YTMUSIC_PROXY)
    #[arg(long, global = true)]
    proxy: Option<String>,
    /// Catalog region (overrides YTMUSIC_COUNTRY)
    #[arg(long, global = true)]
    country: Option<String>,
    /// yt-dlp backend selection
    #[arg(long, global = true, value_enum)]
    mode: Option<ExtractorMode>,
    /// yt-dlp binary (overrides YTDLP_PATH)
    #[arg(long, global = true)]
    ytdlp_path: Option<String>,
    /// Python interpreter with the yt_dlp module (overrides YTDLP_PYTHON)
    #[arg(long, global = true)]
    python: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Direct audio stream URL for a video id
    Audio {
        video_id: String,
        #[arg(long, value_enum, default_value_t = AudioQuality::High)]
        quality: AudioQuality,
    },
    /// Square artwork URL for a video id
    Artwork {
        video_id: String,
        #[arg(long, value_enum, default_value_t = ThumbnailQuality::VeryHigh)]
        quality: ThumbnailQuality,
        /// Thumbnail URLs of the catalog record, smallest first
        #[arg(long = "hint")]
        hints: Vec<String>,
    },
    /// Time-synced lyrics from KuGou
    Lyrics {
        #[arg(long)]
        title: String,
        #[arg(long)]
        artist: String,
        /// Song length in seconds, narrows the match
        #[arg(long)]
        duration: Option<u32>,
        /// Lines scanned from each end when trimming credits
        #[arg(long)]
        trim_window: Option<usize>,
    },
    /// Report whether the yt-dlp backends are usable
    Status,
}

impl Cli {
    fn resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::from_env();
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(Some(proxy.clone()));
        }
        if let Some(country) = &self.country {
            config = config.with_country(country);
        }
        if let Some(mode) = self.mode {
            config = config.with_mode(mode);
        }
        if let Some(path) = &self.ytdlp_path {
            config = config.with_ytdlp_path(Some(path.clone()));
        }
        if let Some(python) = &self.python {
            config = config.with_python(Some(python.clone()));
        }
        config
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let config = Arc::new(cli.resolver_config());
    debug!(mode = %config.mode, country = %config.country, "[CLI] Configuration loaded");

    match &cli.command {
        Command::Audio { video_id, quality } => {
            let extractor: Arc<dyn MediaExtractor> = Arc::new(ExtractorChain::from_config(&config).await);
            let resolver = AudioResolver::new(extractor, config.clone());
            let url = resolver.resolve_audio(video_id, *quality).await;
            print_json(&json!({
                "success": url.is_some(),
                "videoId": video_id,
                "audioUrl": url,
            }))
        }
        Command::Artwork {
            video_id,
            quality,
            hints,
        } => {
            let extractor: Arc<dyn MediaExtractor> = Arc::new(ExtractorChain::from_config(&config).await);
            let resolver = ArtworkResolver::new(extractor, config.clone());
            let hint_thumbnails: Vec<ThumbnailCandidate> =
                hints.iter().map(|url| ThumbnailCandidate::new(url.as_str(), 0, 0)).collect();

            // The catalog is an external service; without one the chain starts at yt-dlp
            let url = resolver
                .resolve_artwork(None, video_id, &hint_thumbnails, *quality)
                .await;
            print_json(&json!({
                "success": !url.is_empty(),
                "videoId": video_id,
                "albumArt": url,
            }))
        }
        Command::Lyrics {
            title,
            artist,
            duration,
            trim_window,
        } => {
            let mut lyrics_config = LyricsConfig::default().with_proxy(config.proxy.clone());
            if let Some(lines) = trim_window {
                lyrics_config = lyrics_config.with_trim_window(*lines);
            }

            let provider = Arc::new(KugouProvider::new(&lyrics_config)?);
            let resolver = LyricsResolver::new(provider, lyrics_config);
            let result = resolver.resolve_lyrics(title, artist, *duration).await;
            print_json(&LyricsResponse::from(result))
        }
        Command::Status => print_json(&status(&config).await),
    }
}
