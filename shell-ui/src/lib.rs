//! Front-end glue for the solar data desktop shell.
//!
//! Forwards backend events into the DOM, feeds CSV files to the backend,
//! manages theme and class state, and keeps canvases sized to their containers.

pub mod app;
pub mod bridge;
pub mod canvas;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod files;
pub mod theme;

pub use app::{App, LiveCanvas};
pub use canvas::{
    apply_size, canvas_size, derive_and_apply_size, CanvasBinding, CanvasRegistry, CanvasSubscription,
    SharedCanvasRegistry,
};
pub use config::{shell_config, ShellConfig};
pub use error::{BridgeError, FileError};
pub use events::{forward_backend_events, BackendEventForwarding};
pub use files::{ingest_file, ingest_files, IngestReport};
pub use theme::{get_theme, set_detected_theme, set_theme, ThemeKind};
