//! Runtime encoder capability probe.

use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::encode::{encode_surface, sniff_format};
use crate::format::OutputFormat;
use crate::surface::Surface;

/// Check whether this build can actually produce `format`.
///
/// Encodes a single transparent pixel and confirms the output is
/// recognizably in the requested container. Never panics and never
/// errors; any failure reads as "unsupported". Results are not cached.
pub fn is_format_supported(format: OutputFormat) -> bool {
    let Ok(surface) = Surface::new(1, 1) else {
        return false;
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| encode_surface(&surface, format, 0.5)));
    match outcome {
        Ok(Ok(bytes)) => sniff_format(&bytes) == Some(format),
        Ok(Err(err)) => {
            warn!(%format, error = %err, "format probe failed");
            false
        }
        Err(_) => {
            warn!(%format, "format probe panicked");
            false
        }
    }
}

/// Every format [`is_format_supported`] accepts, in picker order.
pub fn supported_formats() -> Vec<OutputFormat> {
    OutputFormat::ALL
        .into_iter()
        .filter(|&f| is_format_supported(f))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_formats_supported() {
        assert!(is_format_supported(OutputFormat::Png));
        assert!(is_format_supported(OutputFormat::Jpeg));
        assert!(is_format_supported(OutputFormat::WebP));
    }

    #[test]
    fn test_avif_probe_matches_build() {
        assert_eq!(
            is_format_supported(OutputFormat::Avif),
            cfg!(feature = "avif")
        );
    }

    #[test]
    fn test_probe_is_repeatable() {
        for _ in 0..3 {
            assert!(is_format_supported(OutputFormat::Png));
        }
    }

    #[test]
    fn test_supported_formats_order() {
        let formats = supported_formats();
        assert_eq!(
            &formats[..3],
            &[OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP]
        );
    }
}
