use sha2::{Digest, Sha256};

/// Brand colors for specific articles, matched on the uppercased id.
const ARTICLE_COLORS: &[(&str, &str)] = &[
    ("SF0125", "#614701"),
    ("SF0250", "#80651b"),
    ("SF0500", "#b38c24"),
    ("SF2500", "#b38c24"),
    ("SM0250", "#78011b"),
    ("SM0500", "#78011b"),
    ("FSF300", "#015054"),
];

/// Product-line colors by article prefix. `FSF` must precede `SF`.
const PREFIX_COLORS: &[(&str, &str)] = &[("FSF", "#015054"), ("SF", "#80651b"), ("SM", "#78011b")];

const FALLBACK_PALETTE: [&str; 5] = ["#6366f1", "#14b8a6", "#f97316", "#ef4444", "#22c55e"];

/// Display color for an article id.
///
/// Exact overrides win, then prefixes; anything else is placed in the
/// fallback palette by the first 8 bytes of SHA-256(article), big-endian.
/// The same id always maps to the same color.
#[must_use]
pub fn color_for(article: &str) -> &'static str {
    let upper = article.to_uppercase();

    if let Some((_, color)) = ARTICLE_COLORS.iter().find(|(id, _)| *id == upper) {
        return *color;
    }
    if let Some((_, color)) = PREFIX_COLORS.iter().find(|(p, _)| upper.starts_with(p)) {
        return *color;
    }

    let hash = Sha256::digest(article.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    let bucket = u64::from_be_bytes(bytes) % FALLBACK_PALETTE.len() as u64;
    FALLBACK_PALETTE[usize::try_from(bucket).unwrap_or_default()]
}
