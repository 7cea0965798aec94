//! Container image reference parsing

/// Version reported for an untagged image
pub const UNTAGGED_VERSION: &str = "latest";

/// Derive an app name and version from a container image reference
///
/// The registry and repository path (everything up to the last `/`) and any
/// `@<digest>` suffix are dropped. The remainder is split on `:`; the first
/// field is the name and the second the tag, and any further fields are
/// ignored. An untagged image reports [`UNTAGGED_VERSION`].
///
/// ```
/// use cluster_reflector::discovery::parse_image_reference;
///
/// assert_eq!(
///     parse_image_reference("registry.io/team/app:1.2.3"),
///     ("app".to_string(), "1.2.3".to_string())
/// );
/// ```
pub fn parse_image_reference(image: &str) -> (String, String) {
    let image = image.trim();
    let last_segment = image.rsplit('/').next().unwrap_or(image);
    let without_digest = last_segment
        .split_once('@')
        .map_or(last_segment, |(name_tag, _digest)| name_tag);

    let mut fields = without_digest.split(':');
    let name = fields.next().unwrap_or_default();
    let tag = fields.next().unwrap_or(UNTAGGED_VERSION);
    (name.to_string(), tag.to_string())
}
