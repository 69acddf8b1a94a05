//! Layout metrics for the document view.

/// Spacing and sizes used when rendering blocks.
pub struct DocumentStyle {
    pub page_padding: f32,
    pub block_spacing: f32,
    pub quote_bar_width: f32,
    pub quote_indent: f32,
    pub list_indent: f32,
    pub image_max_height: f32,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            page_padding: 24.0,
            block_spacing: 8.0,
            quote_bar_width: 3.0,
            quote_indent: 12.0,
            list_indent: 24.0,
            image_max_height: 320.0,
        }
    }
}
