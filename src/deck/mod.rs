// In-memory presentation model driven by the generator.

pub mod element;
pub mod presentation;
pub mod slide;
pub mod text;

pub use element::{Crop, Group, Image, OtherElement, PageElement, Rect, Shape, Size, Transform};
pub use presentation::{MediaBlob, Presentation};
pub use slide::{Slide, StackOrder};
pub use text::{TextBody, TextRun, TextStyle, ZERO_WIDTH_SPACE};
