use indicatif::{ProgressBar, ProgressStyle};
use std::{future::Future, io::IsTerminal, time::Duration};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn spinner(msg: String) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(TICK_CHARS);
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Awaits `fut` while a spinner with `msg` runs on stderr, then clears the line.
/// Does nothing visible when stderr isn't a TTY.
pub(crate) async fn with_spinner<Fut, T>(msg: impl Into<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    // Clears the spinner even if the future is dropped midway.
    struct Guard(Option<ProgressBar>);
    impl Drop for Guard {
        fn drop(&mut self) {
            if let Some(pb) = self.0.take() {
                pb.finish_and_clear();
            }
        }
    }
    let _g = Guard(spinner(msg.into()));

    fut.await
}
