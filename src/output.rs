use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Set by `UMLSTORE_QUIET=1`; suppresses banners and summaries in human output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("UMLSTORE_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
