//! One module per workflow subcommand. Each builds the remote resources it
//! needs, starts the encoding and polls it to a terminal state.

pub mod batch;
pub mod cenc_drm;
pub mod channel_mixing;
mod common;
pub mod concatenation;
pub mod filters;
pub mod hdr_conversion;
pub mod multi_codec;
pub mod per_title;
pub mod rtmp_live;
pub mod speke_drm;
pub mod ssai;
