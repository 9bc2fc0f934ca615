/// Infer a content type from a file name extension
///
/// Unrecognized extensions fall back to the generic binary type, matching
/// how the artifacts were originally served.
pub fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
