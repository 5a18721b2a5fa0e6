use crate::cli::ColorMode;
use nu_ansi_term::Color;
use std::error::Error as StdError;
use std::sync::atomic::{AtomicBool, Ordering};

pub const DEFAULT_EXIT_CODE: i32 = 1;

static USE_COLOR: AtomicBool = AtomicBool::new(true);

pub(crate) fn configure_color(cmode: ColorMode) {
    match cmode {
        ColorMode::On => USE_COLOR.store(true, Ordering::Relaxed),
        ColorMode::Off => USE_COLOR.store(false, Ordering::Relaxed),
    }
}

fn use_color() -> ColorMode {
    match USE_COLOR.load(Ordering::Relaxed) {
        true => ColorMode::On,
        false => ColorMode::Off,
    }
}

pub(crate) fn error_internal(text: &str) {
    match use_color() {
        ColorMode::On => {
            let style = Color::Red.bold();
            let text_style = Color::Default.bold();

            eprintln!("{} {}", style.paint("error:"), text_style.paint(text));
        }
        ColorMode::Off => {
            eprintln!("error: {}", text);
        }
    }
}

pub(crate) fn warn_internal(text: &str) {
    match use_color() {
        ColorMode::On => {
            let style = Color::Yellow.bold();
            let text_style = Color::Default.bold();

            eprintln!("{} {}", style.paint("warning:"), text_style.paint(text));
        }
        ColorMode::Off => {
            eprintln!("warning: {}", text);
        }
    }
}

/// Joins an error with its source chain for terminal display.
pub(crate) fn fmt_error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());

        source = err.source();
    }

    message
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::warn_internal(&formatted);
    })
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::error_internal(&formatted);
    })
}

#[macro_export]
macro_rules! die {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::error_internal(&formatted);
        ::std::process::exit($crate::utils::errors::DEFAULT_EXIT_CODE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Leaf;

    impl fmt::Display for Leaf {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "quota crossed")
        }
    }

    impl StdError for Leaf {}

    #[derive(Debug)]
    struct Wrapper(Leaf);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "model failed")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn chains_join_with_colons() {
        assert_eq!(fmt_error_chain(&Wrapper(Leaf)), "model failed: quota crossed");
        assert_eq!(fmt_error_chain(&Leaf), "quota crossed");
    }
}
