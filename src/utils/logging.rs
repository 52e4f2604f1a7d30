/// Logging helpers
///
/// Subscriber initialisation plus the banner lines printed around long actions
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when `verbose` is on.
/// Calling it twice is harmless.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log program startup
pub fn log_startup(command: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 Teaching Hub - {}", command);
    info!("{}", "=".repeat(60));
}

/// Log a finished export
///
/// # Parameters
/// - `title`: quiz title
/// - `template`: export template id
/// - `bytes`: size of the generated file
pub fn log_export_complete(title: &str, template: &str, bytes: usize) {
    info!("{}", "─".repeat(60));
    info!("📄 Export completato: {}", truncate_text(title, 60));
    info!("🧩 Template: {} | 📦 {} byte", template, bytes);
    info!("{}", "─".repeat(60));
}

/// Log batch export totals
pub fn print_final_stats(success: usize, failed: usize, total: usize, output_folder: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Export completati");
    info!(
        "Ora di fine: {}",
        chrono::Local::now().format("%d/%m/%Y %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ Riusciti: {}/{}", success, total);
    info!("❌ Falliti: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\nFile salvati in: {}", output_folder);
}

/// Truncate long text for display, appending `...`
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
