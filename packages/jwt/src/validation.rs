//! Decode options

/// Options for [`crate::decode`].
///
/// The default verifies the signature. Skipping it needs the explicitly named
/// [`DecodeOptions::insecure_skip_signature_check`] constructor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    skip_signature_check: bool,
}

impl DecodeOptions {
    /// Verify the signature (same as `default()`)
    #[must_use]
    pub fn verified() -> Self {
        Self::default()
    }

    /// Decode structure and claims without checking the signature.
    ///
    /// Only for displaying a token whose origin is already trusted.
    #[must_use]
    pub fn insecure_skip_signature_check() -> Self {
        Self {
            skip_signature_check: true,
        }
    }

    /// Whether signature verification is skipped
    #[must_use]
    pub fn skips_signature_check(&self) -> bool {
        self.skip_signature_check
    }
}
