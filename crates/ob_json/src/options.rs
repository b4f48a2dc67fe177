use serde::{Deserialize, Serialize};

/// Runtime options shared by [`EnvelopeSerializer`] and [`EnvelopeDeserializer`].
///
/// Deserializable, so hosts can embed it in their own configuration:
///
/// ```
/// use ob_json::CodecOptions;
///
/// let options: CodecOptions = serde_json::from_str(r#"{ "max_depth": 8 }"#).unwrap();
/// assert_eq!(options.max_depth, 8);
///
/// let options: CodecOptions = serde_json::from_str("{}").unwrap();
/// assert_eq!(options, CodecOptions::default());
/// ```
///
/// [`EnvelopeSerializer`]: crate::EnvelopeSerializer
/// [`EnvelopeDeserializer`]: crate::EnvelopeDeserializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Maximum number of nested object and list levels.
    ///
    /// The root object is level 0, so `max_depth = 1` only admits flat objects.
    pub max_depth: usize,
}

impl CodecOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    #[inline]
    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for CodecOptions {
    /// See [`CodecOptions::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
