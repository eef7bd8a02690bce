//! Attachment progress display.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress over the attachments of one message
pub struct AttachmentProgress {
    bar: ProgressBar,
}

impl AttachmentProgress {
    /// Create a progress tracker for `total` attachments
    #[must_use]
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);

        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }

        Self { bar }
    }

    /// Record an added attachment
    pub fn added(&self, file_name: &str, size: u64) {
        self.bar
            .set_message(format!("Added: {file_name} ({})", format_bytes(size)));
        self.bar.inc(1);
    }

    /// Finish with custom message
    pub fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }

    /// Abandon the progress bar (for errors)
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Format bytes in human-readable format
///
/// # Example
///
/// ```ignore
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(25 * 1024 * 1024), "25.00 MB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{size:.2} {}", UNITS[unit_idx])
}
