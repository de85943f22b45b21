//! Terminal rendering of the dashboard's toast notices.

use std::sync::atomic::{AtomicUsize, Ordering};

use colored::Colorize;
use healthsurvey_client::{Notice, NoticeLevel, Notifier};

/// Prints notices to stderr and counts how many were shown.
#[derive(Debug, Default)]
pub struct BannerNotifier {
    shown: AtomicUsize,
}

impl BannerNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error notices printed so far.
    pub fn errors_shown(&self) -> usize {
        self.shown.load(Ordering::Relaxed)
    }
}

impl Notifier for BannerNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                self.shown.fetch_add(1, Ordering::Relaxed);
                eprintln!("{} {}", "✗".red(), notice.message.red());
            }
            NoticeLevel::Success => eprintln!("{} {}", "✓".green(), notice.message),
            NoticeLevel::Info => eprintln!("{} {}", "•".cyan(), notice.message),
        }
    }
}
