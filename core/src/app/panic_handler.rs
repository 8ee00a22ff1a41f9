use std::any::Any;
use std::sync::Once;

use crate::fault;

/// Installs a panic hook that understands faults raised through [`fault`].
///
/// - Recoverable faults raised with [`fault::raise`] are data, and are usually captured right away. They are only
///   reported as `debug` events through `tracing`.
/// - Defects raised with [`fault::raise_defect`] are rendered by their `Display` implementation on standard error.
/// - Every other panic is handed to the previously installed hook (`console_error_panic_hook` on the web).
///
/// Installing more than once has no further effect.
pub fn install_panic_handler() {
  static INSTALL: Once = Once::new();
  INSTALL.call_once(|| {
    #[cfg(not(target_arch = "wasm32"))] let previous = std::panic::take_hook();
    #[cfg(target_arch = "wasm32")] let previous: Box<dyn Fn(&std::panic::PanicHookInfo<'_>) + Send + Sync> =
      Box::new(console_error_panic_hook::hook);

    std::panic::set_hook(Box::new(move |info| {
      let location = info.location().map(|l| l.to_string()).unwrap_or_default();
      match classify(info.payload()) {
        PanicKind::Raised(message) => tracing::debug!(%location, fault = %message, "fault raised"),
        PanicKind::Defect(message) => {
          let rendered = render_defect(std::thread::current().name(), &location, &message);
          tracing::error!(%location, defect = %message, "defect raised");
          eprintln!("{rendered}");
        }
        PanicKind::Other => previous(info),
      }
    }));
  });
}

#[derive(Eq, PartialEq, Debug)]
enum PanicKind {
  Raised(String),
  Defect(String),
  Other,
}

fn classify(payload: &(dyn Any + Send)) -> PanicKind {
  if fault::is_raised(payload) {
    PanicKind::Raised(fault::panic_message(payload).unwrap_or_default())
  } else if let Some(defect) = fault::defect_of(payload) {
    PanicKind::Defect(defect.to_string())
  } else {
    PanicKind::Other
  }
}

fn render_defect(thread: Option<&str>, location: &str, message: &str) -> String {
  format!("thread '{}' raised a defect at {}:\n{}", thread.unwrap_or("<unnamed>"), location, message)
}
