//! Wire models for the remote encoding API. All request/response bodies are
//! camelCase JSON; enums use screaming-snake wire names.

pub mod common;
pub mod configurations;
pub mod drm;
pub mod filters;
pub mod inputs;
pub mod live;
pub mod manifests;
pub mod muxings;
pub mod outputs;
pub mod streams;

pub use common::{
    AclEntry, AclPermission, EncodingOutput, Message, MessageType, Page, RetryHint, Task,
    TaskError, TaskStatus,
};
pub use configurations::{
    AacAudioConfiguration, AacChannelLayout, CodecConfigType, CodecConfigTypeResponse,
    H264VideoConfiguration,
    H265DynamicRangeFormat, H265VideoConfiguration, PresetConfiguration, ProfileH265,
    VorbisAudioConfiguration, Vp9VideoConfiguration,
};
pub use drm::{
    CencDrm, CencFairPlay, CencPlayReady, CencWidevine, FAIRPLAY_SYSTEM_ID, PLAYREADY_SYSTEM_ID,
    SpekeDrm, SpekeDrmProvider, WIDEVINE_SYSTEM_ID,
};
pub use filters::{DeinterlaceFilter, StreamFilter, TextFilter, WatermarkFilter};
pub use inputs::{HttpInput, RtmpInput};
pub use live::{LiveDashManifest, LiveEncoding, LiveHlsManifest, StartLiveEncodingRequest};
pub use manifests::{
    AudioAdaptationSet, AudioMediaInfo, AutoRepresentation, CustomTag, DashFmp4Representation,
    DashManifest, DashManifestDefault, DashManifestDefaultVersion, DashRepresentationType,
    DashWebmRepresentation,
    H264PerTitleConfiguration, HlsManifest, HlsManifestDefault, HlsManifestDefaultVersion,
    ManifestGenerator, ManifestResource, PerTitle, Period, PositionMode, StartEncodingRequest,
    StreamInfo, VideoAdaptationSet,
};
pub use muxings::{Fmp4Muxing, Mp4Muxing, MuxingStream, TsMuxing, WebmMuxing};
pub use outputs::S3Output;
pub use streams::{
    AudioMixChannelLayout, AudioMixChannelType, AudioMixInputStream, AudioMixInputStreamChannel,
    AudioMixInputStreamSourceChannel, AudioMixSourceChannelType, ConcatenationInputConfiguration,
    ConcatenationInputStream, DolbyVisionInputStream, Encoding, EncodingListQueryParams,
    IngestInputStream, Keyframe, Stream, StreamInput, StreamMode, StreamSelectionMode,
    TimeBasedTrimmingInputStream,
};
