//! Agreement document rendering.

mod agreement_document;
mod layout;

pub use agreement_document::{
    agreement_file_name, render_agreement, Page, PlacedBlock, RenderedDocument,
};
pub use layout::{wrap, PageLayout};
