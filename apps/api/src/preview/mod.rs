// Live preview: a pure Document → Markup renderer and the focus highlight that
// links form controls to preview regions.

pub mod highlight;
pub mod render;

pub use highlight::{HighlightCoordinator, HighlightChange};
pub use render::{container_class, preview_subtree, render, Markup, PreviewTarget};
