use jiff::Zoned;
use sha2::{Digest, Sha256};

/// Derive a collision-resistant file name for a generated image
///
/// Combines a second-resolution timestamp with a short prompt digest, so
/// repeated generations of the same prompt within one second still collide
/// only with themselves.
pub(crate) fn generated_file_name(prompt: &str, now: &Zoned) -> String {
    let timestamp = now.strftime("%Y%m%d%H%M%S");

    let digest = Sha256::digest(prompt.as_bytes());
    let hash: String = digest.iter().take(4).map(|byte| format!("{byte:02x}")).collect();

    format!("image_{timestamp}_{hash}.png")
}
