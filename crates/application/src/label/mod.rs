//! Badge label rendering: text normalization, wrapping, layout and ZPL output.

pub mod builder;
pub mod generator;
pub mod normalize;
pub mod wrap;

pub use builder::ZplBuilder;
pub use generator::{BadgeLabelGenerator, LABEL_HEIGHT, LABEL_WIDTH, LabelLayout};
pub use normalize::normalize;
pub use wrap::{Font, MAX_LINES, wrap};
