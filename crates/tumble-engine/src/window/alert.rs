use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Shows a modal error dialog and blocks until the user dismisses it.
pub(crate) fn show_blocking_alert(title: &str, message: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
