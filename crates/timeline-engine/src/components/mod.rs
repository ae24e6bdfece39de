pub mod item;
pub mod material;
pub mod section;

pub use item::{Caption, Item, ItemUniforms, Quadrant};
pub use material::{MaterialKind, Materials, TextMaterial};
pub use section::{ContactSection, Section, SectionExtent, SectionLayout, SectionTitle, WhooshCluster};
