use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

// The panic hook is process-wide; swaps must not interleave.
static HOOK_SWAP: Mutex<()> = Mutex::new(());

/// HTML to Markdown conversion of a post body.
pub trait HtmlConverter {
    fn convert(&self, html: &str) -> Result<String, ConvertError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "html to markdown conversion failed: {}", self.message)
    }
}

impl std::error::Error for ConvertError {}

/// Converter backed by the `html2md` crate.
///
/// `html2md` has no error channel and panics on some malformed markup;
/// such a panic is reported as a [`ConvertError`] for that post only.
/// Surrounding whitespace is trimmed from the output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2Md;

impl HtmlConverter for Html2Md {
    fn convert(&self, html: &str) -> Result<String, ConvertError> {
        catch_conversion(|| html2md::parse_html(html).trim().to_string())
    }
}

/// Run a conversion, turning a panic into a [`ConvertError`].
///
/// The panic hook is silenced for the duration so the caller's error log is
/// the only report of the failure.
fn catch_conversion(f: impl FnOnce() -> String) -> Result<String, ConvertError> {
    let _guard = HOOK_SWAP.lock().unwrap_or_else(|e| e.into_inner());
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);

    result.map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "converter panicked".to_string());
        ConvertError::new(message)
    })
}
