use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cloudenc",
    version,
    about = "Cloudenc - CLI workflows for the cloudenc remote video-encoding API"
)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override a configuration value, e.g. --set HTTP_INPUT_HOST=my-storage.biz.
    /// Takes precedence over properties files and environment variables.
    #[arg(long = "set", value_name = "KEY=VALUE", global = true, action = ArgAction::Append)]
    pub set: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a fixed batch of encodings while keeping the remote queue bounded
    Batch,

    /// Per-title encoding with a server-computed bitrate ladder
    PerTitle,

    /// Protect fMP4 output with CENC DRM (Widevine, PlayReady, FairPlay)
    CencDrm,

    /// Protect fMP4 output with keys obtained from a SPEKE provider
    SpekeDrm,

    /// Convert between Dolby Vision, HDR10, HLG and SDR dynamic ranges
    HdrConversion,

    /// Apply watermark, text and deinterlace filters to the video stream
    Filters,

    /// Concatenate a bumper, the main feature and a promo clip
    Concatenation,

    /// Encode H.264, H.265 and VP9 renditions concurrently with combined manifests
    MultiCodec,

    /// Start a live encoding from the account's RTMP ingest point
    RtmpLive,

    /// Prepare an HLS output with ad-insertion cue tags at keyframes
    Ssai,

    /// Downmix a 5.1 input to stereo with per-channel gains
    ChannelMixing,
}
