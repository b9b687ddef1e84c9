use std::path::Path;

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout
/// stays clean for JSON output.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Media type declared for a picked file, derived from its extension.
/// Unknown extensions return `None`; content sniffing decides downstream.
pub fn media_type_for_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" | "md" | "log" => "text/plain",
        _ => return None,
    };
    Some(media_type.to_string())
}
