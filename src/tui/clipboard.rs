//! System clipboard writes.
//!
//! Copies run on their own thread: on Linux the X11/Wayland selection is
//! served by the process that set it, so the write blocks until another
//! client takes ownership. Failures come back as `Action::CopyFailed`.

use std::sync::mpsc;

use log::{debug, warn};

use crate::core::action::Action;

pub fn spawn_copy(text: String, tx: mpsc::Sender<Action>) {
    std::thread::spawn(move || {
        if let Err(reason) = copy_text(&text) {
            warn!("Clipboard copy failed: {}", reason);
            let _ = tx.send(Action::CopyFailed(reason));
        }
    });
}

fn copy_text(text: &str) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    debug!("Writing {} bytes to clipboard", text.len());

    #[cfg(target_os = "linux")]
    {
        use arboard::SetExtLinux;
        clipboard
            .set()
            .wait()
            .text(text.to_owned())
            .map_err(|e| e.to_string())
    }

    #[cfg(not(target_os = "linux"))]
    {
        clipboard.set_text(text.to_owned()).map_err(|e| e.to_string())
    }
}
