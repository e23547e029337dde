mod canvas;
mod format;
mod summary;

pub use summary::SummaryRenderer;
