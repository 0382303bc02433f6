// ResourceArc wrapper for a previewed text
//
// Keeps the text and its line spans alive across NIF calls so callers can
// pull individual lines without re-scanning. Nothing changes after
// construction, so no lock is needed.

use rustler::ResourceArc;

use crate::import::{preview, Preview, PreviewOptions};

pub struct PreviewResource {
    text: String,
    preview: Preview,
}

#[rustler::resource_impl]
impl rustler::Resource for PreviewResource {}

impl PreviewResource {
    /// Preview `text` with line spans recorded.
    pub fn new(text: String, options: PreviewOptions) -> Self {
        let preview = preview(&text, &options.store_line_spans(true));
        PreviewResource { text, preview }
    }

    pub fn row_count(&self) -> usize {
        self.preview.row_count()
    }

    pub fn header_names(&self) -> &[String] {
        self.preview.header_names()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.preview.line(&self.text, index)
    }
}

pub type PreviewRef = ResourceArc<PreviewResource>;
