/// Cross-platform notification support
/// Currently only implements macOS notifications

#[cfg(target_os = "macos")]
use std::process::Command;

#[cfg(target_os = "macos")]
fn display_notification(title: &str, message: &str) {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        message.replace('"', "\\\""),
        title.replace('"', "\\\"")
    );

    if let Err(err) = Command::new("osascript").arg("-e").arg(&script).output() {
        log::warn!("Could not send notification: {}", err);
    }
}

/// Send a notification when a task is due to start
pub fn notify_task_starting(task_title: &str, time_range: &str) {
    log::info!("Task starting: {} ({})", task_title, time_range);

    #[cfg(target_os = "macos")]
    display_notification(
        "Dayfocus - Time to start",
        &format!("{} ({})", task_title, time_range),
    );

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = (task_title, time_range);
    }
}

/// Send a notification when the focus countdown begins for a task
pub fn notify_countdown_started(task_title: &str, end: &str) {
    #[cfg(target_os = "macos")]
    display_notification("Dayfocus - Focus", &format!("{} until {}", task_title, end));

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = (task_title, end);
    }
}

/// Send a notification when the focus countdown runs out
pub fn notify_countdown_finished(task_title: &str) {
    #[cfg(target_os = "macos")]
    display_notification("Dayfocus - Time's up", &format!("⏰ {}", task_title));

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = task_title;
    }
}
