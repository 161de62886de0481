// Clipboard access via arboard
//
// A fresh handle per copy: keeping one open can hold the X11 selection
// hostage on Linux.

use anyhow::{Context, Result};

pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("write clipboard")?;
    Ok(())
}
