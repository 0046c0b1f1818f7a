//! User-facing strings.

use asciify_imaging::Palette;

pub const WELCOME: &str = "Send me an image, and I'll provide options for you!";

pub const HELP: &str = "Send me a photo. I'll ask which characters to draw ASCII art with, \
then let you pick: Pixelate, ASCII Art or Negative.\n\n\
/cancel drops the photo you're working on.";

pub const PALETTE_EMPTY: &str =
    "The character set can't be empty. Please send at least one character to use for ASCII art.";

pub const CANCELLED: &str = "Cancelled. Send a new photo whenever you like.";

pub const NOTHING_TO_CANCEL: &str = "There's nothing to cancel. Send me a photo to start.";

pub fn photo_received(seed: &Palette) -> String {
    format!(
        "I got your photo! Please enter the characters you want to use for ASCII art. \
         If you want to use a standard set of characters, copy {seed}"
    )
}

pub fn palette_set(palette: &Palette) -> String {
    format!(
        "Characters set to: {palette}\nNow, please choose what you'd like to do with the image."
    )
}

pub fn truncated(rows: usize, total_rows: usize) -> String {
    format!("The picture was too tall for one message: showing the first {rows} of {total_rows} rows.")
}

pub fn failed(reason: &str) -> String {
    format!("Sorry, that didn't work. {reason}")
}
