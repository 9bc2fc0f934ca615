use axum::extract::Multipart;

use crate::error::{Result, SttError};

/// Multipart field carrying the recorded audio
const AUDIO_FIELD: &str = "audio_file";

/// Body limit for audio uploads (32 MiB)
pub(crate) const BODY_LIMIT_BYTES: usize = 32 << 20;

/// Audio payload extracted from the multipart form
#[derive(Debug)]
pub(crate) struct AudioUpload {
    pub data: Vec<u8>,
}

/// Pull the `audio_file` field out of a multipart form
///
/// Unknown fields are skipped; a form without the audio field is a client
/// error.
pub(crate) async fn extract_audio(mut multipart: Multipart) -> Result<AudioUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SttError::InvalidRequest(format!("Failed to parse multipart form: {e}")))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| SttError::InvalidRequest(format!("Failed to read audio data: {e}")))?
            .to_vec();

        return Ok(AudioUpload { data });
    }

    Err(SttError::MissingAudio)
}
