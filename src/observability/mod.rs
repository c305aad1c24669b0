//! Logging setup, crash reports and per-thread analysis context.
//!
//! Install the subscriber and panic hook at startup:
//!
//! ```ignore
//! use unitymap::observability::{init_logging, install_panic_hook};
//!
//! fn main() {
//!     init_logging(0, false);
//!     install_panic_hook();
//! }
//! ```
//!
//! Stages and the extractor record what they are working on so a crash
//! report can name the stage and file:
//!
//! ```ignore
//! let _phase = set_phase(AnalysisPhase::ScriptExtraction);
//! for file in files {
//!     let _file = set_current_file(&file);
//!     extract(&file);
//! }
//! ```

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_file,
    set_current_type, set_phase, set_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use logging::init_logging;
pub use panic_hook::install_panic_hook;
