//! Layered configuration lookup.
//!
//! Values are resolved in fixed priority order: `--set KEY=VALUE` overrides,
//! a local `examples.properties`, process environment variables, then
//! `~/.cloudenc/examples.properties`. The first source with a non-empty
//! value wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub const PROPERTIES_FILE_NAME: &str = "examples.properties";
const HOME_CONFIG_DIR: &str = ".cloudenc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration parameter '{key}': {description}")]
    Missing { key: String, description: String },

    #[error("error reading properties file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

struct ConfigSource {
    name: &'static str,
    values: HashMap<String, String>,
}

pub struct ConfigProvider {
    sources: Vec<ConfigSource>,
}

impl ConfigProvider {
    /// Load all config sources. `overrides` come from `--set` flags and take
    /// the highest priority.
    pub fn load(overrides: Vec<(String, String)>) -> Result<Self, ConfigError> {
        let mut sources = vec![
            ConfigSource {
                name: "command line arguments",
                values: overrides.into_iter().collect(),
            },
            ConfigSource {
                name: "local properties file",
                values: read_properties_file(Path::new(PROPERTIES_FILE_NAME))?,
            },
            ConfigSource {
                name: "environment variables",
                values: std::env::vars().collect(),
            },
        ];

        if let Some(home) = dirs::home_dir() {
            sources.push(ConfigSource {
                name: "user properties file",
                values: read_properties_file(
                    &home.join(HOME_CONFIG_DIR).join(PROPERTIES_FILE_NAME),
                )?,
            });
        }

        Ok(Self { sources })
    }

    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        for source in &self.sources {
            if let Some(value) = source.values.get(key).filter(|v| !v.is_empty()) {
                debug!("retrieved '{key}' from {}", source.name);
                return Ok(value.clone());
            }
        }

        Err(ConfigError::Missing {
            key: key.to_string(),
            description: describe(key).to_string(),
        })
    }

    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.get("CLOUDENC_API_KEY")
    }

    /// Optional multi-tenant organisation id.
    pub fn tenant_org_id(&self) -> Option<String> {
        self.get("CLOUDENC_TENANT_ORG_ID").ok()
    }

    pub fn http_input_host(&self) -> Result<String, ConfigError> {
        self.get("HTTP_INPUT_HOST")
    }

    pub fn http_input_file_path(&self) -> Result<String, ConfigError> {
        self.get("HTTP_INPUT_FILE_PATH")
    }

    pub fn http_input_file_path_with_surround_sound(&self) -> Result<String, ConfigError> {
        self.get("HTTP_INPUT_FILE_PATH_SURROUND_SOUND")
    }

    pub fn http_input_bumper_file_path(&self) -> Result<String, ConfigError> {
        self.get("HTTP_INPUT_BUMPER_FILE_PATH")
    }

    pub fn http_input_promo_file_path(&self) -> Result<String, ConfigError> {
        self.get("HTTP_INPUT_PROMO_FILE_PATH")
    }

    pub fn http_audio_file_path(&self) -> Result<String, ConfigError> {
        self.get("HTTP_INPUT_AUDIO_FILE_PATH")
    }

    pub fn http_dolby_vision_metadata_file_path(&self) -> Result<String, ConfigError> {
        self.get("HTTP_INPUT_DOLBY_VISION_METADATA_FILE_PATH")
    }

    pub fn hdr_conversion_input_format(&self) -> Result<String, ConfigError> {
        self.get("HDR_CONVERSION_INPUT_FORMAT")
    }

    pub fn hdr_conversion_output_format(&self) -> Result<String, ConfigError> {
        self.get("HDR_CONVERSION_OUTPUT_FORMAT")
    }

    pub fn s3_output_bucket_name(&self) -> Result<String, ConfigError> {
        self.get("S3_OUTPUT_BUCKET_NAME")
    }

    pub fn s3_output_access_key(&self) -> Result<String, ConfigError> {
        self.get("S3_OUTPUT_ACCESS_KEY")
    }

    pub fn s3_output_secret_key(&self) -> Result<String, ConfigError> {
        self.get("S3_OUTPUT_SECRET_KEY")
    }

    /// Base path on the output bucket, normalized to no leading slash and
    /// exactly one trailing slash.
    pub fn s3_output_base_path(&self) -> Result<String, ConfigError> {
        let raw = self.get("S3_OUTPUT_BASE_PATH")?;
        let trimmed = raw.trim_start_matches('/').trim_end_matches('/');
        Ok(format!("{trimmed}/"))
    }

    pub fn watermark_image_path(&self) -> Result<String, ConfigError> {
        self.get("WATERMARK_IMAGE_PATH")
    }

    pub fn text_filter_text(&self) -> Result<String, ConfigError> {
        self.get("TEXT_FILTER_TEXT")
    }

    pub fn drm_key(&self) -> Result<String, ConfigError> {
        self.get("DRM_KEY")
    }

    pub fn drm_fairplay_iv(&self) -> Result<String, ConfigError> {
        self.get("DRM_FAIRPLAY_IV")
    }

    pub fn drm_fairplay_uri(&self) -> Result<String, ConfigError> {
        self.get("DRM_FAIRPLAY_URI")
    }

    pub fn drm_widevine_kid(&self) -> Result<String, ConfigError> {
        self.get("DRM_WIDEVINE_KID")
    }

    pub fn drm_widevine_pssh(&self) -> Result<String, ConfigError> {
        self.get("DRM_WIDEVINE_PSSH")
    }

    pub fn speke_url(&self) -> Result<String, ConfigError> {
        self.get("SPEKE_URL")
    }

    pub fn speke_username(&self) -> Option<String> {
        self.get("SPEKE_USERNAME").ok()
    }

    pub fn speke_password(&self) -> Option<String> {
        self.get("SPEKE_PASSWORD").ok()
    }

    /// Content id announced to the SPEKE provider; defaults to a fixed value.
    pub fn drm_content_id(&self) -> String {
        self.get("DRM_CONTENT_ID")
            .unwrap_or_else(|_| "cloudenc-example-content".to_string())
    }
}

/// Human-readable meaning of a known key, used in missing-parameter errors.
fn describe(key: &str) -> &'static str {
    match key {
        "CLOUDENC_API_KEY" => "your API key for the cloudenc API",
        "CLOUDENC_TENANT_ORG_ID" => {
            "the id of the organisation in which to perform the encodings"
        }
        "HTTP_INPUT_HOST" => {
            "hostname or IP of the HTTP server hosting your input files, e.g. my-storage.biz"
        }
        "HTTP_INPUT_FILE_PATH" => "the path to your HTTP input file, e.g. videos/1080p_Sintel.mp4",
        "HTTP_INPUT_FILE_PATH_SURROUND_SOUND" => {
            "the path to a file containing a video with a 5.1 audio stream"
        }
        "HTTP_INPUT_BUMPER_FILE_PATH" => {
            "the path to the clip concatenated before HTTP_INPUT_FILE_PATH, e.g. videos/bumper.mp4"
        }
        "HTTP_INPUT_PROMO_FILE_PATH" => {
            "the path to the clip concatenated after HTTP_INPUT_FILE_PATH, e.g. videos/promo.mp4"
        }
        "HTTP_INPUT_AUDIO_FILE_PATH" => "the path to a separate audio input file",
        "HTTP_INPUT_DOLBY_VISION_METADATA_FILE_PATH" => {
            "the path to the Dolby Vision sidecar metadata file; omit when metadata is embedded"
        }
        "HDR_CONVERSION_INPUT_FORMAT" => {
            "the dynamic range of the input file: DolbyVision, HDR10, HLG or SDR"
        }
        "HDR_CONVERSION_OUTPUT_FORMAT" => {
            "the dynamic range to convert to: DolbyVision, HDR10, HLG or SDR"
        }
        "S3_OUTPUT_BUCKET_NAME" => "the name of your S3 output bucket, e.g. my-bucket-name",
        "S3_OUTPUT_ACCESS_KEY" => "the access key of your S3 output bucket",
        "S3_OUTPUT_SECRET_KEY" => "the secret key of your S3 output bucket",
        "S3_OUTPUT_BASE_PATH" => "the base path on your S3 output bucket, e.g. /outputs",
        "WATERMARK_IMAGE_PATH" => {
            "the URL of the watermark image, e.g. http://my-storage.biz/logo.png"
        }
        "TEXT_FILTER_TEXT" => "the text to be rendered by the text filter",
        "DRM_KEY" => "16 byte encryption key as 32 hexadecimal characters",
        "DRM_FAIRPLAY_IV" => "16 byte initialization vector as 32 hexadecimal characters",
        "DRM_FAIRPLAY_URI" => "URI of the FairPlay licensing server, e.g. skd://...",
        "DRM_WIDEVINE_KID" => "16 byte encryption key id as 32 hexadecimal characters",
        "DRM_WIDEVINE_PSSH" => "base64 encoded PSSH payload",
        "SPEKE_URL" => "the URL of the SPEKE server, e.g. https://my-speke-server.com/v1.0/vod",
        "SPEKE_USERNAME" => "the username to access the SPEKE server",
        "SPEKE_PASSWORD" => "the password to access the SPEKE server",
        "DRM_CONTENT_ID" => "the content id identifying your content within the SPEKE provider",
        _ => "configuration parameter",
    }
}

/// Parse `KEY=VALUE` lines; '#' starts a comment, blank lines and empty
/// values are skipped.
fn parse_properties(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(_, v)| !v.is_empty())
        .collect()
}

fn read_properties_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(parse_properties(&content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(err) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn provider(sources: Vec<(&'static str, Vec<(&str, &str)>)>) -> ConfigProvider {
        ConfigProvider {
            sources: sources
                .into_iter()
                .map(|(name, values)| ConfigSource {
                    name,
                    values: values
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let values = parse_properties(
            "# credentials\n\nCLOUDENC_API_KEY = abc123\nHTTP_INPUT_HOST=my-storage.biz\nEMPTY=\n",
        );
        assert_eq!(values.len(), 2);
        assert_eq!(values["CLOUDENC_API_KEY"], "abc123");
        assert_eq!(values["HTTP_INPUT_HOST"], "my-storage.biz");
    }

    #[test]
    fn first_source_with_a_value_wins() {
        let p = provider(vec![
            ("cli", vec![("HTTP_INPUT_HOST", "from-cli")]),
            ("file", vec![("HTTP_INPUT_HOST", "from-file")]),
        ]);
        assert_eq!(p.get("HTTP_INPUT_HOST").unwrap(), "from-cli");
    }

    #[test]
    fn empty_values_fall_through_to_the_next_source() {
        let p = provider(vec![
            ("cli", vec![("HTTP_INPUT_HOST", "")]),
            ("file", vec![("HTTP_INPUT_HOST", "from-file")]),
        ]);
        assert_eq!(p.get("HTTP_INPUT_HOST").unwrap(), "from-file");
    }

    #[test]
    fn missing_key_names_the_parameter_and_its_meaning() {
        let p = provider(vec![("cli", vec![])]);
        let err = p.api_key().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("CLOUDENC_API_KEY"));
        assert!(text.contains("API key"));
    }

    #[rstest]
    #[case("/outputs", "outputs/")]
    #[case("outputs", "outputs/")]
    #[case("/outputs/", "outputs/")]
    #[case("outputs/nested", "outputs/nested/")]
    fn s3_base_path_is_normalized(#[case] raw: &str, #[case] expected: &str) {
        let p = provider(vec![("cli", vec![("S3_OUTPUT_BASE_PATH", raw)])]);
        assert_eq!(p.s3_output_base_path().unwrap(), expected);
    }
}
